//! A local stand-in for the synthesis service.
//!
//! Accepts one WebSocket connection, records the upgrade request and every
//! inbound frame, and answers according to a [`Behaviour`].

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};

/// What the upgrade request looked like.
#[derive(Debug, Clone)]
pub struct Upgrade {
    pub path: String,
    pub query: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub enum Behaviour {
    /// One audio frame with this base64 payload per non-blank text frame.
    /// A close-socket frame gets a final frame and a close.
    Echo(&'static str),
    /// Close right after the handshake frame.
    CloseAfterHandshake,
    /// Record frames, never answer.
    Silent,
}

pub struct FakeService {
    /// Base URL to configure the client with.
    pub base_url: String,
    pub upgrade: oneshot::Receiver<Upgrade>,
    /// Resolves to every frame the client sent, once the connection ends.
    pub frames: JoinHandle<Vec<Value>>,
}

pub async fn spawn(behaviour: Behaviour) -> FakeService {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (upgrade_tx, upgrade_rx) = oneshot::channel();

    let frames = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        // The callback signature is fixed by tungstenite
        #[allow(clippy::result_large_err)]
        let record = move |req: &Request, resp: Response| -> Result<Response, ErrorResponse> {
            let _ = upgrade_tx.send(Upgrade {
                path: req.uri().path().to_string(),
                query: req.uri().query().unwrap_or_default().to_string(),
                api_key: req
                    .headers()
                    .get("xi-api-key")
                    .and_then(|v| v.to_str().ok())
                    .map(String::from),
            });
            Ok(resp)
        };
        let mut ws = accept_hdr_async(stream, record).await.unwrap();

        let mut frames = Vec::new();
        while let Some(Ok(message)) = ws.next().await {
            let Message::Text(raw) = message else {
                continue;
            };
            let frame: Value = serde_json::from_str(&raw).unwrap();
            frames.push(frame.clone());

            match behaviour {
                Behaviour::Echo(audio) => {
                    if frame["close_socket"] == true {
                        let done = json!({"isFinal": true}).to_string();
                        let _ = ws.send(Message::Text(done)).await;
                        let _ = ws.close(None).await;
                        continue;
                    }
                    let blank = frame["text"].as_str().is_none_or(|t| t.trim().is_empty());
                    if !blank {
                        let reply = json!({
                            "audio": audio,
                            "isFinal": false,
                            "contextId": frame["context_id"],
                        });
                        let _ = ws.send(Message::Text(reply.to_string())).await;
                    }
                }
                Behaviour::CloseAfterHandshake => {
                    let _ = ws.close(None).await;
                }
                Behaviour::Silent => {}
            }
        }
        frames
    });

    FakeService {
        base_url: format!("ws://{addr}/v1"),
        upgrade: upgrade_rx,
        frames,
    }
}
