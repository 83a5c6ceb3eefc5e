//! In-memory duplex connection for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::error::TransportError;
use crate::transport::{ConnectTarget, Connector, FrameReader, FrameWriter};

/// Client write half. Frames land in [`RemoteEnd::sent`].
#[derive(Debug)]
pub struct MemoryWriter {
    tx: Option<mpsc::UnboundedSender<String>>,
    fail_writes: bool,
    closes: Arc<AtomicUsize>,
}

impl MemoryWriter {
    /// Make every subsequent send fail.
    pub fn fail_writes(&mut self) {
        self.fail_writes = true;
    }
}

/// Client read half. Fed from [`RemoteEnd::replies`].
#[derive(Debug)]
pub struct MemoryReader {
    rx: mpsc::UnboundedReceiver<Result<String, TransportError>>,
}

/// The service side of an in-memory connection.
#[derive(Debug)]
pub struct RemoteEnd {
    /// Frames the client wrote; yields `None` once the client closed.
    pub sent: mpsc::UnboundedReceiver<String>,
    /// Frames to deliver to the client; drop to close the connection.
    pub replies: mpsc::UnboundedSender<Result<String, TransportError>>,
    /// How many times the client closed its write half.
    pub closes: Arc<AtomicUsize>,
}

impl RemoteEnd {
    pub fn reply(&self, frame: serde_json::Value) {
        let _ = self.replies.send(Ok(frame.to_string()));
    }

    /// Collect every frame the client writes until it closes.
    pub async fn drain_sent(&mut self) -> Vec<serde_json::Value> {
        let mut frames = Vec::new();
        while let Some(raw) = self.sent.recv().await {
            frames.push(serde_json::from_str(&raw).unwrap());
        }
        frames
    }
}

pub fn memory_pair() -> (MemoryWriter, MemoryReader, RemoteEnd) {
    let (sent_tx, sent_rx) = mpsc::unbounded_channel();
    let (reply_tx, reply_rx) = mpsc::unbounded_channel();
    let closes = Arc::default();
    (
        MemoryWriter {
            tx: Some(sent_tx),
            fail_writes: false,
            closes: Arc::clone(&closes),
        },
        MemoryReader { rx: reply_rx },
        RemoteEnd {
            sent: sent_rx,
            replies: reply_tx,
            closes,
        },
    )
}

#[async_trait]
impl FrameWriter for MemoryWriter {
    async fn send(&mut self, frame: String) -> Result<(), TransportError> {
        if self.fail_writes {
            return Err(TransportError::Other("injected write failure".to_string()));
        }
        let tx = self.tx.as_ref().ok_or(TransportError::Closed)?;
        tx.send(frame).map_err(|_| TransportError::Closed)
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        self.tx = None;
        Ok(())
    }
}

#[async_trait]
impl FrameReader for MemoryReader {
    async fn recv(&mut self) -> Option<Result<String, TransportError>> {
        self.rx.recv().await
    }
}

/// Hands out one prepared connection, or refuses.
#[derive(Debug)]
pub struct MemoryConnector {
    halves: Mutex<Option<(MemoryWriter, MemoryReader)>>,
    targets: Mutex<Vec<ConnectTarget>>,
}

impl MemoryConnector {
    /// A connector plus the remote end of the connection it will hand out.
    pub fn new() -> (Self, RemoteEnd) {
        let (writer, reader, remote) = memory_pair();
        (
            Self {
                halves: Mutex::new(Some((writer, reader))),
                targets: Mutex::new(Vec::new()),
            },
            remote,
        )
    }

    pub fn refusing() -> Self {
        Self {
            halves: Mutex::new(None),
            targets: Mutex::new(Vec::new()),
        }
    }

    pub fn targets(&self) -> Vec<ConnectTarget> {
        self.targets.lock().clone()
    }
}

#[async_trait]
impl Connector for MemoryConnector {
    type Writer = MemoryWriter;
    type Reader = MemoryReader;

    async fn connect(
        &self,
        target: &ConnectTarget,
    ) -> Result<(MemoryWriter, MemoryReader), TransportError> {
        self.targets.lock().push(target.clone());
        self.halves
            .lock()
            .take()
            .ok_or_else(|| TransportError::Other("connection refused".to_string()))
    }
}
