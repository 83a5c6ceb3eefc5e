//! Duplex text-frame transport.
//!
//! The driver talks to the service through three small traits so the pumps
//! can run over a real WebSocket or an in-memory pair. Frames are whole JSON
//! documents; the transport never looks inside them.

mod ws;

use async_trait::async_trait;
use url::Url;

use crate::error::TransportError;

pub use ws::{WsConnector, WsReader, WsWriter};

/// Where and how to open a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectTarget {
    pub url: Url,
    /// Request headers, in order
    pub headers: Vec<(String, String)>,
}

/// Write half of a connection.
#[async_trait]
pub trait FrameWriter: Send + 'static {
    async fn send(&mut self, frame: String) -> Result<(), TransportError>;

    /// Close the connection. Called at most once per session.
    async fn close(&mut self) -> Result<(), TransportError>;
}

/// Read half of a connection.
#[async_trait]
pub trait FrameReader: Send + 'static {
    /// Next text frame. `None` once the remote has closed the connection.
    async fn recv(&mut self) -> Option<Result<String, TransportError>>;
}

/// Opens connections.
#[async_trait]
pub trait Connector: Send + Sync {
    type Writer: FrameWriter;
    type Reader: FrameReader;

    async fn connect(
        &self,
        target: &ConnectTarget,
    ) -> Result<(Self::Writer, Self::Reader), TransportError>;
}
