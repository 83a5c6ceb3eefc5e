//! Error types for streaming sessions.

use speechlink_core::{AdmissionError, CatalogError, FrameError};
use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Result type alias for streaming operations.
pub type StreamResult<T> = Result<T, StreamError>;

/// Transport-level failures of the duplex connection.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The connection is closed.
    #[error("Connection closed")]
    Closed,

    /// WebSocket protocol or I/O failure.
    #[error("WebSocket error: {0}")]
    WebSocket(Box<tungstenite::Error>),

    /// The connection target URL is invalid.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A request header could not be encoded.
    #[error("Invalid header '{name}': {message}")]
    InvalidHeader { name: String, message: String },

    #[error("{0}")]
    Other(String),
}

impl From<tungstenite::Error> for TransportError {
    fn from(err: tungstenite::Error) -> Self {
        Self::WebSocket(Box::new(err))
    }
}

/// Session-level errors.
#[derive(Debug, Error)]
pub enum StreamError {
    /// The connection could not be opened.
    #[error("Connection failed: {0}")]
    Connection(#[source] TransportError),

    /// A frame could not be written during the handshake, or an inbound
    /// frame is malformed or undecodable.
    #[error("Protocol error: {message}")]
    Protocol { message: String },

    /// Context admission was refused.
    #[error(transparent)]
    Capacity(#[from] AdmissionError),

    /// The caller cancelled before the session was established.
    #[error("Session cancelled")]
    Cancelled,

    #[error("Write failed: {0}")]
    Write(#[source] TransportError),

    #[error("Read failed: {0}")]
    Read(#[source] TransportError),

    /// The service sent an error frame.
    #[error("Service reported an error: {message}")]
    Remote { message: String },

    /// The audio sink failed and sink failures are configured fatal.
    #[error("Audio sink failed: {0}")]
    Sink(#[source] std::io::Error),

    /// Voice/model pre-flight validation failed.
    #[error("Voice validation failed: {0}")]
    Validation(#[from] CatalogError),

    /// A pump task panicked or was aborted.
    #[error("Pump task failed: {0}")]
    TaskFailed(String),
}

impl From<FrameError> for StreamError {
    fn from(err: FrameError) -> Self {
        Self::Protocol {
            message: err.to_string(),
        }
    }
}
