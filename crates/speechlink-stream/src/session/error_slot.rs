//! First-error capture shared by the pumps and the coordinator.

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::error::StreamError;

#[derive(Debug, Default)]
struct Slot {
    error: Option<StreamError>,
    draining: bool,
    shutting_down: bool,
}

/// Holds the first fatal error of a session.
///
/// Only the first write is kept. While draining, errors are still
/// recorded; only the service closing the connection becomes expected.
/// Once intentional shutdown has begun, further errors are discarded:
/// they are consequences of the shutdown, not its cause.
#[derive(Debug, Default)]
pub struct ErrorSlot {
    inner: Mutex<Slot>,
}

impl ErrorSlot {
    /// Record `error` if it is the first and shutdown has not begun.
    /// Returns whether it was kept.
    pub fn record(&self, error: StreamError) -> bool {
        let mut slot = self.inner.lock();
        let suppressed = if slot.shutting_down {
            Some("raised during shutdown")
        } else if slot.error.is_some() {
            Some("after first fatal error")
        } else {
            None
        };
        if let Some(reason) = suppressed {
            drop(slot);
            debug!(%error, reason, "Suppressing error");
            return false;
        }
        warn!(%error, "Session failed");
        slot.error = Some(error);
        drop(slot);
        true
    }

    /// Record a task failure even during shutdown, unless an error is
    /// already held.
    pub fn record_task_failure(&self, error: StreamError) {
        let mut slot = self.inner.lock();
        if slot.error.is_none() {
            warn!(%error, "Pump task failed");
            slot.error = Some(error);
        }
    }

    /// The close-socket frame is about to go out; a clean close by the
    /// service is no longer an error.
    pub fn begin_drain(&self) {
        self.inner.lock().draining = true;
    }

    pub fn is_draining(&self) -> bool {
        self.inner.lock().draining
    }

    pub fn begin_shutdown(&self) {
        self.inner.lock().shutting_down = true;
    }

    pub fn has_error(&self) -> bool {
        self.inner.lock().error.is_some()
    }

    pub fn take(&self) -> Option<StreamError> {
        self.inner.lock().error.take()
    }
}
