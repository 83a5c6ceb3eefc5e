//! Error types for voice catalog operations.

use thiserror::Error;

/// Errors from voice catalog operations.
///
/// Transport-level failures (HTTP status, JSON) are mapped to these by the
/// adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The voice does not exist.
    #[error("Voice not found: {voice_id}")]
    VoiceNotFound {
        /// The voice ID that wasn't found
        voice_id: String,
    },

    /// The voice lookup itself failed.
    #[error("Voice lookup failed: {message}")]
    VoiceLookupFailed {
        /// Underlying failure
        message: String,
    },

    /// The model cannot synthesize with this voice.
    #[error("Model '{model_id}' is not supported by voice '{voice_id}'")]
    ModelNotSupported {
        /// The voice ID
        voice_id: String,
        /// The rejected model ID
        model_id: String,
    },

    #[error("Authentication required or rejected")]
    AuthRequired,

    #[error("Rate limit exceeded, try again later")]
    RateLimited,

    #[error("Network error: {message}")]
    Network {
        /// Description of the network error
        message: String,
    },

    #[error("Invalid API response: {message}")]
    InvalidResponse {
        /// What was invalid
        message: String,
    },

    #[error("Configuration error: {message}")]
    Configuration {
        /// What's wrong with the configuration
        message: String,
    },
}

/// Result type alias for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;
