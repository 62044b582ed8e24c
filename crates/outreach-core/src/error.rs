use std::time::Duration;

use thiserror::Error;

/// Application-wide error types for Outreach.
#[derive(Error, Debug)]
pub enum AppError {
    /// HTTP request failed (fetching a page or calling a remote API).
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// The server answered but the body carried nothing to extract.
    #[error("Empty response from {0}")]
    EmptyResponse(String),

    /// No headless browser executable could be found or launched.
    #[error("Renderer unavailable: {0}")]
    RendererUnavailable(String),

    /// LLM API call failed.
    #[error("LLM error (HTTP {status_code}): {message}")]
    LlmError {
        message: String,
        status_code: u16,
        retryable: bool,
    },

    /// HTML-to-Markdown conversion failed.
    #[error("Cleaner error: {0}")]
    CleanerError(String),

    /// The LLM reply could not be turned into an email.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// JSON serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Request timed out.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Network/connection error.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// An email could not be built or handed to the mail server.
    #[error("Delivery error: {0}")]
    DeliveryError(String),

    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Generic error.
    #[error("{0}")]
    Generic(String),
}

impl AppError {
    /// Returns true if this error is transient and worth retrying.
    ///
    /// Nothing in this workspace retries; the flag is for callers that do.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::NetworkError(_) | AppError::Timeout(_) | AppError::RateLimitExceeded => true,
            AppError::LlmError { retryable, .. } => *retryable,
            AppError::HttpError(msg) => {
                msg.contains("timeout") || msg.contains("connect") || msg.contains("reset")
            }
            _ => false,
        }
    }
}

/// Reasons an LLM completion cannot be turned into a subject/body pair.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("missing subject marker")]
    MissingSubject,

    #[error("empty subject")]
    EmptySubject,

    #[error("empty body")]
    EmptyBody,
}
