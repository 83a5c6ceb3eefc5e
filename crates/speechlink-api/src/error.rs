//! Internal error types for catalog requests.
//!
//! Mapped to `CatalogError` at the port boundary.

use thiserror::Error;

/// Result type alias for catalog requests.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors from catalog HTTP requests.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The service answered with a non-success status.
    #[error("API request failed with status {status}: {url}")]
    ApiRequestFailed {
        /// HTTP status code
        status: u16,
        /// The URL that was requested
        url: String,
    },

    #[error("Invalid response from API: {message}")]
    InvalidResponse { message: String },

    #[error("Voice '{voice_id}' not found")]
    VoiceNotFound { voice_id: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),
}
