//! Bidirectional streaming speech synthesis.
//!
//! Text fragments go out over one WebSocket connection while audio and
//! per-character alignment come back. A [`StreamClient`] opens a
//! [`StreamSession`]: it optionally validates the voice/model pair through
//! a [`speechlink_core::VoiceCatalogPort`], admits the handshake context,
//! dials and writes the handshake. [`StreamSession::run`] then pumps
//! fragments out and audio in until the producer finishes, the caller
//! cancels or a fatal error occurs.
//!
//! ```no_run
//! use speechlink_stream::{Fragment, StreamClient, StreamConfig, StreamRequest};
//! use tokio::sync::mpsc;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let client = StreamClient::new(StreamConfig::new().with_api_key("xi-key"));
//! let cancel = CancellationToken::new();
//! let session = client
//!     .connect(&StreamRequest::new("voice-id", "eleven_flash_v2_5"), &cancel)
//!     .await?;
//!
//! let (text_tx, text_rx) = mpsc::channel(16);
//! let (audio_tx, mut audio_rx) = mpsc::channel::<Vec<u8>>(16);
//! let (results_tx, _results_rx) = mpsc::channel(16);
//!
//! tokio::spawn(async move {
//!     let _ = text_tx.send(Fragment::from("Hello there. ")).await;
//! });
//! tokio::spawn(async move { while audio_rx.recv().await.is_some() {} });
//!
//! session.run(text_rx, audio_tx, results_tx, &cancel).await?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used only by integration tests
#[cfg(test)]
use tracing_subscriber as _;

mod client;
mod config;
mod error;
mod establish;
mod fragment;
mod query;
mod request;
mod session;
mod sink;
mod transport;

#[cfg(test)]
mod testing;

// ============================================================================
// Public API
// ============================================================================

pub use client::{SessionFor, StreamClient};
pub use config::{DEFAULT_BASE_URL, DEFAULT_INACTIVITY_TIMEOUT, StreamConfig};
pub use error::{StreamError, StreamResult, TransportError};
pub use establish::{API_KEY_HEADER, build_target};
pub use fragment::Fragment;
pub use query::QueryOption;
pub use request::StreamRequest;
pub use session::{SessionHandle, SessionState, StreamSession};
pub use sink::{AudioSink, WriterSink};
pub use transport::{
    ConnectTarget, Connector, FrameReader, FrameWriter, WsConnector, WsReader, WsWriter,
};
