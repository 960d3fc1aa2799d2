//! Error types for vimeo-scope

use thiserror::Error;

/// Main error type for vimeo-scope operations
#[derive(Debug, Error)]
pub enum ScopeError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decompress response body: {0}")]
    Decompression(#[source] std::io::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Malformed JSON response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Transport is stopped")]
    TransportStopped,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScopeError {
    /// Check if the operation was aborted through the cancellation flag
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ScopeError::Cancelled)
    }

    /// Check if the server answered with a non-ok status
    pub fn is_api_error(&self) -> bool {
        matches!(self, ScopeError::Api { .. })
    }
}
