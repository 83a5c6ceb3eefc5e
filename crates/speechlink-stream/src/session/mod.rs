//! Lifecycle coordinator.
//!
//! A [`StreamSession`] is an established connection whose handshake has
//! been written. [`StreamSession::run`] starts the input and output pumps,
//! waits for the input side to stop, drains, closes the connection once
//! and reports the first fatal error, if any.
//!
//! ```text
//! Connecting -> Handshaking -> Streaming -> Draining -> Closed
//! ```
//!
//! Draining has two shapes. When the producer simply ran out, the
//! coordinator sends a close-socket frame and lets the output pump read
//! until the service closes, so trailing audio is delivered. On
//! cancellation or a fatal error it stops the output pump and closes
//! immediately. Errors raised while draining, such as an error frame or
//! undecodable trailing audio, still fail the session.

mod contexts;
mod error_slot;
mod input;
mod output;

use std::fmt;
use std::sync::Arc;

use speechlink_core::{AdmissionError, AlignmentResult, ContextId, ContextMode, OutboundFrame};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::{StreamError, StreamResult};
use crate::fragment::Fragment;
use crate::sink::AudioSink;
use crate::transport::{FrameReader, FrameWriter};

pub use contexts::ContextLedger;
use error_slot::ErrorSlot;
use input::{InputExit, send_frame};

/// Coordinator state, observable through [`StreamSession::subscribe_state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Handshaking,
    Streaming,
    Draining,
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Connecting => "connecting",
            Self::Handshaking => "handshaking",
            Self::Streaming => "streaming",
            Self::Draining => "draining",
            Self::Closed => "closed",
        };
        f.write_str(name)
    }
}

pub fn set_state(state: &watch::Sender<SessionState>, next: SessionState) {
    let previous = state.send_replace(next);
    debug!(from = %previous, to = %next, "Session state changed");
}

/// Caller-side handle for opening and inspecting contexts while a session
/// runs.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    contexts: Arc<ContextLedger>,
}

impl SessionHandle {
    /// The context opened by the handshake.
    pub fn default_context(&self) -> &ContextId {
        self.contexts.default_context()
    }

    /// Admit a new context with a fresh id.
    ///
    /// Fails with [`StreamError::Capacity`] when the connection is full. In
    /// single-context mode the handshake context already holds the only
    /// slot.
    pub fn open_context(&self) -> StreamResult<ContextId> {
        self.open_context_with_id(ContextId::generate())
    }

    /// Admit a new context under a caller-chosen id.
    pub fn open_context_with_id(&self, id: ContextId) -> StreamResult<ContextId> {
        if self.contexts.mode() == ContextMode::Single && !self.contexts.owns(&id) {
            return Err(StreamError::Capacity(AdmissionError::AtCapacity {
                capacity: ContextMode::Single.capacity(),
            }));
        }
        self.contexts.ensure(&id)?;
        debug!(context_id = %id, "Context opened");
        Ok(id)
    }

    pub fn is_open(&self, id: &ContextId) -> bool {
        self.contexts.owns(id)
    }

    /// Contexts this session currently holds.
    pub fn open_contexts(&self) -> Vec<ContextId> {
        self.contexts.held()
    }
}

/// An established connection, ready to stream.
pub struct StreamSession<W, R> {
    writer: W,
    reader: R,
    contexts: Arc<ContextLedger>,
    state: watch::Sender<SessionState>,
    fail_on_sink_error: bool,
}

impl<W, R> fmt::Debug for StreamSession<W, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamSession")
            .field("context", self.contexts.default_context())
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl<W: FrameWriter, R: FrameReader> StreamSession<W, R> {
    pub(crate) const fn new(
        writer: W,
        reader: R,
        contexts: Arc<ContextLedger>,
        state: watch::Sender<SessionState>,
        fail_on_sink_error: bool,
    ) -> Self {
        Self {
            writer,
            reader,
            contexts,
            state,
            fail_on_sink_error,
        }
    }

    /// The context opened by the handshake.
    pub fn context_id(&self) -> &ContextId {
        self.contexts.default_context()
    }

    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            contexts: Arc::clone(&self.contexts),
        }
    }

    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Stream `fragments` until the producer closes or `cancel` fires.
    ///
    /// Decoded audio goes to `sink`, per-frame alignment to `results`.
    /// Returns after both pumps have stopped and the connection is closed.
    /// Cancellation by the caller is not an error. Audio already written to
    /// the sink stays valid even when an error is returned.
    pub async fn run<S: AudioSink>(
        self,
        fragments: mpsc::Receiver<Fragment>,
        sink: S,
        results: mpsc::Sender<AlignmentResult>,
        cancel: &CancellationToken,
    ) -> StreamResult<()> {
        let Self {
            writer,
            reader,
            contexts,
            state,
            fail_on_sink_error,
        } = self;

        let errors = Arc::new(ErrorSlot::default());
        let shutdown = cancel.child_token();

        let input = tokio::spawn(input::run(
            writer,
            fragments,
            Arc::clone(&contexts),
            Arc::clone(&errors),
            shutdown.clone(),
            cancel.clone(),
        ));
        let output = tokio::spawn(output::run(
            reader,
            sink,
            results,
            Arc::clone(&errors),
            shutdown.clone(),
            fail_on_sink_error,
        ));

        let (mut writer, exit) = match input.await {
            Ok((writer, exit)) => (Some(writer), exit),
            Err(join) => {
                errors.record_task_failure(StreamError::TaskFailed(join.to_string()));
                (None, InputExit::Failed)
            }
        };
        set_state(&state, SessionState::Draining);

        let mut graceful =
            exit == InputExit::Exhausted && !errors.has_error() && !cancel.is_cancelled();
        if graceful {
            if let Some(w) = writer.as_mut() {
                errors.begin_drain();
                if let Err(err) = send_frame(w, &OutboundFrame::close_socket()).await {
                    errors.record(err);
                    graceful = false;
                }
            }
        }

        if graceful {
            debug!("Draining until the service closes");
            join_output(output, &errors).await;
            errors.begin_shutdown();
            close_writer(writer).await;
        } else {
            // From here on, failures are consequences of the shutdown
            errors.begin_shutdown();
            shutdown.cancel();
            close_writer(writer).await;
            join_output(output, &errors).await;
        }

        contexts.release_all();
        set_state(&state, SessionState::Closed);

        if let Some(err) = errors.take() {
            return Err(err);
        }
        info!(context_id = %contexts.default_context(), "Session finished");
        Ok(())
    }
}

async fn join_output(output: tokio::task::JoinHandle<()>, errors: &ErrorSlot) {
    if let Err(join) = output.await {
        errors.record_task_failure(StreamError::TaskFailed(join.to_string()));
    }
}

async fn close_writer<W: FrameWriter>(writer: Option<W>) {
    if let Some(mut writer) = writer {
        match writer.close().await {
            Ok(()) => info!("Connection closed"),
            Err(err) => debug!(error = %err, "Close after shutdown failed"),
        }
    }
}
