use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use reqwest::Error as REQWEST_ERROR;
use std::fmt;
use std::{
    env::VarError, io::Error as IO_ERROR, num::ParseIntError,
    str::ParseBoolError as PARSE_BOOL_ERROR,
};
use thiserror::Error;
use tokio::task::JoinError;
use tracing::subscriber::SetGlobalDefaultError as TRACING_GLOBAL_DEFAULT_ERROR;

/// Reason an upstream call failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamCode {
    Status(u16),
    Timeout,
    Connect,
    Transport(String),
}

impl fmt::Display for UpstreamCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamCode::Status(status) => write!(f, "status {}", status),
            UpstreamCode::Timeout => write!(f, "timeout"),
            UpstreamCode::Connect => write!(f, "connection failed"),
            UpstreamCode::Transport(code) => write!(f, "transport {}", code),
        }
    }
}

/// Uniform failure of a single fetch. Cloneable so one failed refresh can
/// be handed to every caller waiting on it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Upstream {url} failed: {code}")]
pub struct UpstreamError {
    pub url: String,
    pub code: UpstreamCode,
}

impl UpstreamError {
    pub fn new(url: &str, code: UpstreamCode) -> Self {
        UpstreamError {
            url: url.to_owned(),
            code,
        }
    }

    pub fn from_reqwest(url: &str, error: &REQWEST_ERROR) -> Self {
        let code = if error.is_timeout() {
            UpstreamCode::Timeout
        } else if let Some(status) = error.status() {
            UpstreamCode::Status(status.as_u16())
        } else if error.is_connect() {
            UpstreamCode::Connect
        } else if error.is_body() || error.is_decode() {
            UpstreamCode::Transport(String::from("body"))
        } else if error.is_request() {
            UpstreamCode::Transport(String::from("request"))
        } else {
            UpstreamCode::Transport(String::from("unknown"))
        };

        UpstreamError::new(url, code)
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Io(#[from] IO_ERROR),

    #[error("{0}")]
    INT(#[from] ParseIntError),

    #[error("{0}")]
    VAR(#[from] VarError),

    #[error("{0}")]
    ParseBoolError(#[from] PARSE_BOOL_ERROR),

    #[error("{0}")]
    TokioJoinError(#[from] JoinError),

    #[error("{0}")]
    ReqwestError(#[from] REQWEST_ERROR),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Tracing error: {0}")]
    SetGlobalDefaultError(#[from] TRACING_GLOBAL_DEFAULT_ERROR),

    #[error("Required upstream {upstream} unavailable: {source}")]
    Aggregation {
        upstream: &'static str,
        #[source]
        source: UpstreamError,
    },
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            Error::Aggregation { .. } => {
                serde_json::json!({ "error": "upstream_failed" })
            },
            _ => serde_json::json!({ "error": "internal_error" }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
