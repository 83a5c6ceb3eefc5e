//! WebSocket transport over `tokio-tungstenite`.

use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::{HeaderName, HeaderValue};
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, trace};

use super::{ConnectTarget, Connector, FrameReader, FrameWriter};
use crate::error::TransportError;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Opens `ws://` and `wss://` connections.
#[derive(Debug, Clone, Copy, Default)]
pub struct WsConnector;

pub struct WsWriter {
    sink: SplitSink<WsStream, Message>,
}

pub struct WsReader {
    stream: SplitStream<WsStream>,
}

#[async_trait]
impl Connector for WsConnector {
    type Writer = WsWriter;
    type Reader = WsReader;

    async fn connect(&self, target: &ConnectTarget) -> Result<(WsWriter, WsReader), TransportError> {
        let mut request = target.url.as_str().into_client_request()?;
        for (name, value) in &target.headers {
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| TransportError::InvalidHeader {
                    name: name.clone(),
                    message: e.to_string(),
                })?;
            let header_value =
                HeaderValue::from_str(value).map_err(|e| TransportError::InvalidHeader {
                    name: name.clone(),
                    message: e.to_string(),
                })?;
            request.headers_mut().insert(header_name, header_value);
        }

        let (stream, response) = connect_async(request).await?;
        debug!(status = response.status().as_u16(), "WebSocket handshake complete");

        let (sink, stream) = stream.split();
        Ok((WsWriter { sink }, WsReader { stream }))
    }
}

const fn is_closed(err: &tungstenite::Error) -> bool {
    matches!(
        err,
        tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed
    )
}

#[async_trait]
impl FrameWriter for WsWriter {
    async fn send(&mut self, frame: String) -> Result<(), TransportError> {
        self.sink.send(Message::Text(frame)).await.map_err(|e| {
            if is_closed(&e) {
                TransportError::Closed
            } else {
                e.into()
            }
        })
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        match self.sink.close().await {
            Err(e) if !is_closed(&e) => Err(e.into()),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl FrameReader for WsReader {
    async fn recv(&mut self) -> Option<Result<String, TransportError>> {
        loop {
            match self.stream.next().await? {
                Ok(Message::Text(text)) => return Some(Ok(text)),
                Ok(Message::Binary(bytes)) => {
                    return Some(
                        String::from_utf8(bytes)
                            .map_err(|e| TransportError::Other(format!("non-UTF-8 frame: {e}"))),
                    );
                }
                Ok(Message::Close(frame)) => {
                    debug!(?frame, "Remote closed the connection");
                    return None;
                }
                // Ping/pong are answered by tungstenite itself
                Ok(other) => trace!(len = other.len(), "Skipping control frame"),
                Err(e) if is_closed(&e) => return None,
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}
