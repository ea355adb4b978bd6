use std::{future::Future, time::Duration};

use serde_json::Value;

use crate::error::UpstreamError;

pub use self::http::{parse_body, HTTP, USER_AGENT};

#[cfg(test)]
pub(crate) mod fake;
mod http;

/// Per-call overrides for a fetch.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Falls back to the client default when unset.
    pub timeout: Option<Duration>,
    /// Applied after the default headers, replacing any with the same name.
    pub headers: Vec<(String, String)>,
    /// Relaxed certificate validation.
    pub insecure: bool,
}

impl FetchOptions {
    pub fn insecure() -> Self {
        FetchOptions {
            insecure: true,
            ..FetchOptions::default()
        }
    }
}

/// A source of JSON documents addressed by URL.
pub trait Upstream: Send + Sync + 'static {
    fn fetch(
        &self,
        url: &str,
        options: FetchOptions,
    ) -> impl Future<Output = Result<Value, UpstreamError>> + Send;
}
