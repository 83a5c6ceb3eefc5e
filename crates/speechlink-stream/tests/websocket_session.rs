//! End-to-end sessions over a real WebSocket against a local fake service.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::service::{Behaviour, spawn};
use speechlink_core::{AdmissionController, AlignmentResult, ContextId, ContextMode};
use speechlink_stream::{
    Fragment, StreamClient, StreamConfig, StreamError, StreamRequest, StreamResult,
};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

// ── Helpers ───────────────────────────────────────────────────────────────────

const RUN_LIMIT: Duration = Duration::from_secs(5);

fn request() -> StreamRequest {
    StreamRequest::new("voice-1", "eleven_flash_v2_5")
}

struct Outcome {
    result: StreamResult<()>,
    audio: Vec<u8>,
    results: Vec<AlignmentResult>,
}

/// Run a session to completion, collecting everything it delivers.
async fn run_collecting(
    session: speechlink_stream::SessionFor<speechlink_stream::WsConnector>,
    fragments: mpsc::Receiver<Fragment>,
    cancel: &CancellationToken,
) -> Outcome {
    let (audio_tx, mut audio_rx) = mpsc::channel::<Vec<u8>>(16);
    let (results_tx, mut results_rx) = mpsc::channel(16);

    let audio = tokio::spawn(async move {
        let mut bytes = Vec::new();
        while let Some(chunk) = audio_rx.recv().await {
            bytes.extend(chunk);
        }
        bytes
    });
    let results = tokio::spawn(async move {
        let mut all = Vec::new();
        while let Some(r) = results_rx.recv().await {
            all.push(r);
        }
        all
    });

    let result = tokio::time::timeout(RUN_LIMIT, session.run(fragments, audio_tx, results_tx, cancel))
        .await
        .expect("session must finish");

    Outcome {
        result,
        audio: audio.await.unwrap(),
        results: results.await.unwrap(),
    }
}

fn feed(items: Vec<Fragment>) -> mpsc::Receiver<Fragment> {
    let (tx, rx) = mpsc::channel(items.len().max(1));
    for item in items {
        tx.try_send(item).unwrap();
    }
    rx
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn audio_is_concatenated_in_arrival_order() {
    common::init_tracing();
    let mut service = spawn(Behaviour::Echo("AAE=")).await;
    let client = StreamClient::new(
        StreamConfig::new()
            .with_base_url(&service.base_url)
            .with_api_key("test-key"),
    );
    let cancel = CancellationToken::new();

    let session = client.connect(&request(), &cancel).await.unwrap();
    let context = session.context_id().clone();
    let outcome = run_collecting(
        session,
        feed(vec!["Hello ".into(), "world.".into()]),
        &cancel,
    )
    .await;

    assert!(outcome.result.is_ok(), "{:?}", outcome.result);
    assert_eq!(outcome.audio, vec![0, 1, 0, 1]);
    assert_eq!(outcome.results.iter().filter(|r| r.is_final).count(), 1);
    assert_eq!(client.admission().count(), 0);

    let upgrade = service.upgrade.try_recv().unwrap();
    assert_eq!(upgrade.path, "/v1/text-to-speech/voice-1/multi-stream-input");
    assert!(upgrade.query.contains("model_id=eleven_flash_v2_5"));
    assert!(upgrade.query.contains("inactivity_timeout=180"));
    assert!(upgrade.query.contains("sync_alignment=true"));
    assert_eq!(upgrade.api_key.as_deref(), Some("test-key"));

    let frames = service.frames.await.unwrap();
    assert_eq!(frames[0]["text"], " ");
    assert_eq!(frames[0]["context_id"], context.as_str());
    assert_eq!(frames[1]["text"], "Hello ");
    assert_eq!(frames[2]["text"], "world.");
    assert_eq!(frames.last().unwrap()["close_socket"], true);
}

#[tokio::test]
async fn remote_close_after_handshake_is_a_read_error() {
    common::init_tracing();
    let service = spawn(Behaviour::CloseAfterHandshake).await;
    let client = StreamClient::new(StreamConfig::new().with_base_url(&service.base_url));
    let cancel = CancellationToken::new();

    let session = client.connect(&request(), &cancel).await.unwrap();
    // Producer stays open; only the remote close can end the run.
    let (_tx, rx) = mpsc::channel(1);
    let outcome = run_collecting(session, rx, &cancel).await;

    assert!(matches!(outcome.result, Err(StreamError::Read(_))));
    assert!(outcome.audio.is_empty());
    assert_eq!(client.admission().count(), 0);
}

#[tokio::test]
async fn cancel_before_any_text_finishes_cleanly() {
    common::init_tracing();
    let service = spawn(Behaviour::Silent).await;
    let client = StreamClient::new(StreamConfig::new().with_base_url(&service.base_url));
    let cancel = CancellationToken::new();

    let session = client.connect(&request(), &cancel).await.unwrap();
    cancel.cancel();
    let (_tx, rx) = mpsc::channel(1);
    let outcome = run_collecting(session, rx, &cancel).await;

    assert!(outcome.result.is_ok(), "{:?}", outcome.result);
    assert!(outcome.audio.is_empty());

    let frames = service.frames.await.unwrap();
    assert!(frames.iter().all(|f| f["close_socket"] != true));
    assert!(
        frames
            .iter()
            .skip(1)
            .all(|f| f["text"].as_str().is_none_or(str::is_empty))
    );
}

#[tokio::test]
async fn padding_heavy_audio_decodes_exactly() {
    common::init_tracing();
    let service = spawn(Behaviour::Echo("////")).await;
    let client = StreamClient::new(StreamConfig::new().with_base_url(&service.base_url));
    let cancel = CancellationToken::new();

    let session = client.connect(&request(), &cancel).await.unwrap();
    let outcome = run_collecting(session, feed(vec!["x".into()]), &cancel).await;

    assert!(outcome.result.is_ok(), "{:?}", outcome.result);
    assert_eq!(outcome.audio, vec![0xFF; 3]);
    assert!(
        outcome
            .results
            .iter()
            .all(|r| r.alignment.is_empty() && r.normalized_alignment.is_empty())
    );
}

#[tokio::test]
async fn second_session_on_shared_single_admission_is_refused() {
    common::init_tracing();
    let service = spawn(Behaviour::Silent).await;
    let admission = Arc::new(AdmissionController::for_mode(ContextMode::Single));
    let config = StreamConfig::new().with_base_url(&service.base_url);
    let first = StreamClient::new(config.clone()).with_admission(Arc::clone(&admission));
    let second = StreamClient::new(config).with_admission(Arc::clone(&admission));
    let cancel = CancellationToken::new();

    let session = first.connect(&request(), &cancel).await.unwrap();
    let refused = second.connect(&request(), &cancel).await;
    assert!(matches!(refused, Err(StreamError::Capacity(_))));
    assert_eq!(admission.count(), 1);

    drop(session);
    assert_eq!(admission.count(), 0);
}

#[tokio::test]
async fn multi_context_audio_is_tagged_per_context() {
    common::init_tracing();
    let service = spawn(Behaviour::Echo("AAE=")).await;
    let client = StreamClient::new(
        StreamConfig::new()
            .with_base_url(&service.base_url)
            .with_mode(ContextMode::Multi),
    );
    let cancel = CancellationToken::new();

    let session = client.connect(&request(), &cancel).await.unwrap();
    let handle = session.handle();
    let side = handle.open_context_with_id(ContextId::from("side")).unwrap();
    let main = handle.default_context().clone();

    let outcome = run_collecting(
        session,
        feed(vec![
            Fragment::text_for(side.clone(), "aside"),
            Fragment::close(side.clone()),
            Fragment::text("main line"),
        ]),
        &cancel,
    )
    .await;

    assert!(outcome.result.is_ok(), "{:?}", outcome.result);
    let tagged: Vec<_> = outcome
        .results
        .iter()
        .filter_map(|r| r.context_id.clone())
        .collect();
    assert_eq!(tagged, vec![side, main]);
    assert_eq!(client.admission().count(), 0);
}

#[tokio::test]
async fn dial_to_closed_port_is_a_connection_error() {
    common::init_tracing();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = StreamClient::new(StreamConfig::new().with_base_url(format!("ws://{addr}/v1")));
    let result = client
        .connect(&request(), &CancellationToken::new())
        .await;

    assert!(matches!(result, Err(StreamError::Connection(_))));
    assert_eq!(client.admission().count(), 0);
}
