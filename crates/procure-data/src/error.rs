//! HTTP client error types.

use thiserror::Error;

/// Errors that can occur when talking to a remote endpoint.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Failed to send the request or read the response.
    #[error("Request failed: {0}")]
    RequestError(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTTP error response.
    #[error("HTTP {status}: {message}")]
    HttpError { status: u16, message: String },

    /// Failed to parse response body.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// The response parsed but did not expose the expected field.
    #[error("Unexpected response shape: missing `{0}` array")]
    MissingField(String),

    /// The service answered with an `{"error": ...}` body.
    #[error("Service error: {0}")]
    ServiceError(String),

    /// Request timeout.
    #[error("Request timed out")]
    Timeout,

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(String),
}

impl FetchError {
    /// HTTP status, for errors that carry one.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the failure happened before any response was received.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            FetchError::RequestError(_) | FetchError::Timeout | FetchError::InvalidUrl(_)
        )
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::JsonError(e.to_string())
    }
}

impl From<procure_core::ProcureError> for FetchError {
    fn from(e: procure_core::ProcureError) -> Self {
        FetchError::JsonError(e.to_string())
    }
}
