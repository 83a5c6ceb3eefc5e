//! Input pump: producer fragments to outbound frames.

use std::sync::Arc;

use speechlink_core::{ContextId, OutboundFrame};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::contexts::ContextLedger;
use super::error_slot::ErrorSlot;
use crate::error::{StreamError, StreamResult};
use crate::fragment::Fragment;
use crate::transport::FrameWriter;

/// Why the input pump stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputExit {
    /// The producer closed its end.
    Exhausted,
    /// Caller cancellation or a fatal error elsewhere.
    Cancelled,
    /// A write failed.
    Failed,
}

/// Encode and write one frame.
pub async fn send_frame<W: FrameWriter>(
    writer: &mut W,
    frame: &OutboundFrame,
) -> StreamResult<()> {
    let encoded = frame.encode()?;
    writer.send(encoded).await.map_err(StreamError::Write)
}

/// Turn a fragment into a frame, admitting its context on first use.
///
/// Returns the frame and, for close frames, the context to release once the
/// frame is written. `None` means the fragment is dropped.
fn frame_for(
    fragment: Fragment,
    contexts: &ContextLedger,
) -> Option<(OutboundFrame, Option<ContextId>)> {
    match fragment {
        Fragment::Text { context, text } => {
            let id = contexts.resolve(context);
            admit(contexts, &id).then(|| (OutboundFrame::text(id, text), None))
        }
        Fragment::Flush { context } => {
            let id = contexts.resolve(context);
            admit(contexts, &id).then(|| (OutboundFrame::flush(id), None))
        }
        Fragment::CloseContext(id) => {
            if !contexts.owns(&id) {
                warn!(context_id = %id, "Ignoring close for a context this session does not hold");
                return None;
            }
            Some((OutboundFrame::close_context(id.clone()), Some(id)))
        }
    }
}

fn admit(contexts: &ContextLedger, id: &ContextId) -> bool {
    match contexts.ensure(id) {
        Ok(()) => true,
        Err(err) => {
            warn!(context_id = %id, error = %err, "Dropping fragment for unadmitted context");
            false
        }
    }
}

/// Drain `fragments` into `writer` until the producer closes, either token
/// fires, or a write fails. Then write the end-of-utterance frame for the
/// default context unless a fatal error has been recorded.
///
/// Hands the writer back so the coordinator can close it exactly once.
pub async fn run<W: FrameWriter>(
    mut writer: W,
    mut fragments: mpsc::Receiver<Fragment>,
    contexts: Arc<ContextLedger>,
    errors: Arc<ErrorSlot>,
    shutdown: CancellationToken,
    cancel: CancellationToken,
) -> (W, InputExit) {
    let exit = loop {
        let fragment = tokio::select! {
            biased;
            () = shutdown.cancelled() => break InputExit::Cancelled,
            () = cancel.cancelled() => break InputExit::Cancelled,
            next = fragments.recv() => match next {
                Some(fragment) => fragment,
                None => break InputExit::Exhausted,
            },
        };

        let Some((frame, release)) = frame_for(fragment, &contexts) else {
            continue;
        };
        if let Err(err) = send_frame(&mut writer, &frame).await {
            errors.record(err);
            shutdown.cancel();
            break InputExit::Failed;
        }
        if let Some(id) = release {
            contexts.close(&id);
            debug!(context_id = %id, "Context closed");
        }
    };
    debug!(?exit, "Input pump stopped");

    // No end-of-utterance frame once either pump has failed
    if exit != InputExit::Failed && !errors.has_error() {
        let default = contexts.default_context().clone();
        if contexts.owns(&default) {
            if let Err(err) = send_frame(&mut writer, &OutboundFrame::flush(default)).await {
                if cancel.is_cancelled() || shutdown.is_cancelled() {
                    debug!(error = %err, "Final flush failed during shutdown");
                } else {
                    errors.record(err);
                    shutdown.cancel();
                }
            }
        }
    }

    (writer, exit)
}
