use thiserror::Error;

use crate::chat::GENERIC_ERROR_REPLY;

/// Errors from a single chat exchange with the webhook endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExchangeError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid JSON response: {0}")]
    Decode(String),

    #[error("request cancelled")]
    Cancelled,

    /// The body parsed but is JSON-falsy (`null`, `false`, `0`, `""`, `[]`, `{}`).
    #[error("empty response body")]
    EmptyResponse,
}

impl ExchangeError {
    /// Banner text shown next to the transcript when this error occurs.
    ///
    /// Decode failures get their own wording and an empty body repeats the
    /// generic reply. Every other failure is reported as a connection problem
    /// carrying the underlying detail.
    pub fn banner(&self) -> String {
        match self {
            ExchangeError::Decode(_) => "Error: API returned invalid JSON response".to_string(),
            ExchangeError::EmptyResponse => GENERIC_ERROR_REPLY.to_string(),
            other => format!("Error connecting to API: {other}"),
        }
    }
}

/// Errors from the out-of-band refresh call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshError {
    #[error("refresh endpoint is not configured")]
    NotConfigured,

    #[error("refresh request failed: {0}")]
    Transport(String),

    #[error("refresh request timed out after {0}s")]
    Timeout(u64),

    #[error("refresh returned HTTP {0}")]
    Status(u16),
}

/// Errors from chat session operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("session not found")]
    NotFound,

    #[error("message must not be empty")]
    EmptyMessage,

    #[error("a request is already in flight for this session")]
    Busy,
}

/// Errors raised while resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("chat endpoint URL is not configured")]
    MissingEndpoint,

    #[error("invalid URL for {field}: {message}")]
    InvalidUrl { field: &'static str, message: String },

    #[error("request timeout must be greater than zero")]
    InvalidTimeout,

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}
