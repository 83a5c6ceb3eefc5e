//! Output pump: inbound frames to the audio sink and the results queue.

use std::sync::Arc;

use speechlink_core::{AlignmentResult, InboundFrame};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use super::error_slot::ErrorSlot;
use crate::error::{StreamError, TransportError};
use crate::sink::AudioSink;
use crate::transport::FrameReader;

/// Record a fatal error and stop the rest of the session.
fn fail(errors: &ErrorSlot, shutdown: &CancellationToken, err: StreamError) {
    errors.record(err);
    shutdown.cancel();
}

/// Read frames until the connection ends, a frame is fatal, or `shutdown`
/// fires. Audio and results are forwarded in arrival order.
///
/// The connection ending is a read error unless the coordinator has
/// already begun draining.
///
/// A dropped results receiver only stops result delivery; audio keeps
/// flowing.
pub async fn run<R: FrameReader, S: AudioSink>(
    mut reader: R,
    mut sink: S,
    results: mpsc::Sender<AlignmentResult>,
    errors: Arc<ErrorSlot>,
    shutdown: CancellationToken,
    fail_on_sink_error: bool,
) {
    let mut results_open = true;
    let mut total_bytes = 0usize;

    loop {
        let next = tokio::select! {
            biased;
            () = shutdown.cancelled() => break,
            next = reader.recv() => next,
        };

        let raw = match next {
            Some(Ok(raw)) => raw,
            None | Some(Err(TransportError::Closed)) if errors.is_draining() => {
                debug!("Service closed the connection after close-socket");
                break;
            }
            Some(Err(err)) => {
                fail(&errors, &shutdown, StreamError::Read(err));
                break;
            }
            None => {
                fail(&errors, &shutdown, StreamError::Read(TransportError::Closed));
                break;
            }
        };

        let frame = match InboundFrame::parse(&raw) {
            Ok(frame) => frame,
            Err(err) => {
                fail(&errors, &shutdown, err.into());
                break;
            }
        };
        if let Some(message) = frame.remote_error.clone() {
            fail(&errors, &shutdown, StreamError::Remote { message });
            break;
        }

        let audio = match frame.decode_audio() {
            Ok(audio) => audio,
            Err(err) => {
                fail(&errors, &shutdown, err.into());
                break;
            }
        };
        if !audio.is_empty() {
            match sink.write_audio(&audio).await {
                Ok(()) => total_bytes += audio.len(),
                Err(err) if fail_on_sink_error => {
                    fail(&errors, &shutdown, StreamError::Sink(err));
                    break;
                }
                Err(err) => warn!(bytes = audio.len(), error = %err, "Dropping audio chunk"),
            }
        }
        trace!(
            context_id = ?frame.context_id,
            bytes = audio.len(),
            is_final = frame.is_final,
            "Frame received"
        );

        if results_open {
            tokio::select! {
                biased;
                () = shutdown.cancelled() => break,
                sent = results.send(frame.into_result()) => {
                    if sent.is_err() {
                        debug!("Results receiver dropped; discarding further alignment");
                        results_open = false;
                    }
                }
            }
        }
    }

    if let Err(err) = sink.finish().await {
        warn!(error = %err, "Audio sink failed to finish");
    }
    debug!(bytes = total_bytes, "Output pump stopped");
}
