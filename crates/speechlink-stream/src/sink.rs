//! Audio sink port.
//!
//! The output pump hands every decoded audio chunk to an [`AudioSink`], in
//! arrival order.

use std::io;

use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

/// Destination for decoded audio bytes.
#[async_trait]
pub trait AudioSink: Send + 'static {
    async fn write_audio(&mut self, chunk: &[u8]) -> io::Result<()>;

    /// Called once when the output pump stops.
    async fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Forwards each chunk as one message. Fails once the receiver is gone.
#[async_trait]
impl AudioSink for mpsc::Sender<Vec<u8>> {
    async fn write_audio(&mut self, chunk: &[u8]) -> io::Result<()> {
        self.send(chunk.to_vec())
            .await
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "audio receiver dropped"))
    }
}

/// Adapts any [`AsyncWrite`] (file, pipe, socket) into a sink.
#[derive(Debug)]
pub struct WriterSink<W> {
    inner: W,
}

impl<W> WriterSink<W> {
    pub const fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

#[async_trait]
impl<W> AudioSink for WriterSink<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    async fn write_audio(&mut self, chunk: &[u8]) -> io::Result<()> {
        self.inner.write_all(chunk).await
    }

    async fn finish(&mut self) -> io::Result<()> {
        self.inner.flush().await
    }
}
