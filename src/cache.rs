use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use serde_json::Value;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::{
    error::UpstreamError,
    provider::{FetchOptions, Upstream},
};

type Refresh = Shared<BoxFuture<'static, Result<Value, UpstreamError>>>;

/// The single cached upstream value and the fetch currently replacing it.
#[derive(Default)]
pub struct CacheEntry {
    value: Option<Value>,
    fetched_at: Option<Instant>,
    in_flight: Option<Refresh>,
}

impl CacheEntry {
    fn fresh_value(&self, ttl: Duration) -> Option<Value> {
        match (&self.value, self.fetched_at) {
            (Some(value), Some(fetched_at)) if fetched_at.elapsed() <= ttl => {
                Some(value.clone())
            },
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Empty,
    Fresh,
    Stale,
    Refreshing,
}

/// Stale-while-revalidate cache in front of one upstream URL.
///
/// At most one fetch runs at a time: callers arriving while the entry is
/// refreshing await the same shared future. A failed refresh falls back to
/// the previous value and leaves `fetched_at` untouched, so the entry stays
/// stale and the next caller tries again.
pub struct PriceCache<U> {
    upstream: Arc<U>,
    url: String,
    options: FetchOptions,
    ttl: Duration,
    entry: Arc<Mutex<CacheEntry>>,
}

impl<U: Upstream> PriceCache<U> {
    pub fn new(upstream: Arc<U>, url: String, ttl: Duration) -> Self {
        Self {
            upstream,
            url,
            options: FetchOptions::default(),
            ttl,
            entry: Arc::new(Mutex::new(CacheEntry::default())),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn state(&self) -> CacheState {
        let entry = lock(&self.entry);

        if entry.in_flight.is_some() {
            return CacheState::Refreshing;
        }

        match entry.fetched_at {
            None => CacheState::Empty,
            Some(fetched_at) if fetched_at.elapsed() <= self.ttl => {
                CacheState::Fresh
            },
            Some(_) => CacheState::Stale,
        }
    }

    pub async fn get(&self) -> Result<Value, UpstreamError> {
        let (refresh, started) = {
            let mut entry = lock(&self.entry);

            if let Some(value) = entry.fresh_value(self.ttl) {
                debug!("Cache hit for {}", self.url);
                return Ok(value);
            }

            match &entry.in_flight {
                Some(refresh) => (refresh.clone(), false),
                None => {
                    let refresh = self.refresh();
                    entry.in_flight = Some(refresh.clone());
                    (refresh, true)
                },
            }
        };

        if started {
            // Drive the fetch even if every waiter goes away.
            tokio::spawn(refresh.clone());
        }

        refresh.await
    }

    fn refresh(&self) -> Refresh {
        let upstream = Arc::clone(&self.upstream);
        let entry = Arc::clone(&self.entry);
        let url = self.url.clone();
        let options = self.options.clone();

        debug!("Refreshing {}", url);

        async move {
            let result = upstream.fetch(&url, options).await;
            let mut entry = lock(&entry);
            entry.in_flight = None;

            match result {
                Ok(value) => {
                    entry.value = Some(value.clone());
                    entry.fetched_at = Some(Instant::now());
                    Ok(value)
                },
                Err(e) => match &entry.value {
                    Some(stale) => {
                        warn!("{}, serving stale value", e);
                        Ok(stale.clone())
                    },
                    None => Err(e),
                },
            }
        }
        .boxed()
        .shared()
    }
}

fn lock(entry: &Mutex<CacheEntry>) -> MutexGuard<'_, CacheEntry> {
    entry.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<U> std::fmt::Debug for PriceCache<U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriceCache")
            .field("url", &self.url)
            .field("ttl", &self.ttl)
            .finish()
    }
}
