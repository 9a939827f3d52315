//! Error types for the backcard crate

use thiserror::Error;

/// Result type for backcard operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for backcard operations
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("unexpected status {status_code} for {url}")]
    Status {
        /// HTTP status code
        status_code: u16,
        /// URL that produced the response
        url: String,
    },

    /// Review extraction error
    #[error("extraction error: {0}")]
    Extract(String),

    /// URL parsing error
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Other errors
    #[error("{0}")]
    Other(String),
}
