use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, ACCEPT},
    Client,
};
use serde_json::Value;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

use crate::{
    configuration::Config,
    error::{Error, UpstreamCode, UpstreamError},
    provider::{FetchOptions, Upstream},
};

pub const USER_AGENT: &str = "status-aggregator/1.0";

#[derive(Debug)]
pub struct HTTP {
    pub http: Client,
    pub insecure_http: Client,
}

impl HTTP {
    pub fn new(config: &Config) -> Result<HTTP, Error> {
        let timeout = Duration::from_millis(config.timeout);

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        let insecure_http = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(true)
            .build()?;

        Ok(HTTP {
            http,
            insecure_http,
        })
    }

    fn headers(
        url: &str,
        overrides: &[(String, String)],
    ) -> Result<HeaderMap, UpstreamError> {
        let mut header_map = HeaderMap::new();
        header_map.insert(ACCEPT, HeaderValue::from_static("application/json"));
        header_map.insert(
            reqwest::header::USER_AGENT,
            HeaderValue::from_static(USER_AGENT),
        );

        for (name, value) in overrides {
            let invalid = || {
                UpstreamError::new(
                    url,
                    UpstreamCode::Transport(String::from("invalid_header")),
                )
            };
            let name = HeaderName::from_str(name).map_err(|_| invalid())?;
            let value = HeaderValue::from_str(value).map_err(|_| invalid())?;
            header_map.insert(name, value);
        }

        Ok(header_map)
    }
}

impl Upstream for HTTP {
    async fn fetch(
        &self,
        url: &str,
        options: FetchOptions,
    ) -> Result<Value, UpstreamError> {
        let client = if options.insecure {
            &self.insecure_http
        } else {
            &self.http
        };

        let headers = Self::headers(url, &options.headers)?;
        let mut request = client.get(url).headers(headers);
        if let Some(timeout) = options.timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::new(
                url,
                UpstreamCode::Status(status.as_u16()),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| UpstreamError::from_reqwest(url, &e))?;
        debug!("{} responded with {} bytes", url, body.len());

        Ok(parse_body(body))
    }
}

/// Decodes a response body, unwrapping JSON that was delivered as a JSON
/// string. A body that is not JSON at all comes back as a raw string.
pub fn parse_body(body: String) -> Value {
    match serde_json::from_str::<Value>(&body) {
        Ok(Value::String(inner)) => {
            serde_json::from_str(&inner).unwrap_or(Value::String(inner))
        },
        Ok(value) => value,
        Err(_) => Value::String(body),
    }
}
