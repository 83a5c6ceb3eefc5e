//! Per-session bookkeeping of the contexts a session has admitted.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;
use speechlink_core::{AdmissionController, AdmissionError, ContextId, ContextMode};
use tracing::debug;

/// The contexts one session holds against a (possibly shared)
/// [`AdmissionController`].
///
/// Dropping the ledger releases everything it still holds, so a session
/// that is abandoned before or after running never leaks admission slots.
#[derive(Debug)]
pub struct ContextLedger {
    admission: Arc<AdmissionController>,
    mode: ContextMode,
    default: ContextId,
    owned: Mutex<HashSet<ContextId>>,
}

impl ContextLedger {
    /// Admit `default` and start tracking it.
    pub fn open(
        admission: Arc<AdmissionController>,
        mode: ContextMode,
        default: ContextId,
    ) -> Result<Self, AdmissionError> {
        let ledger = Self {
            admission,
            mode,
            default,
            owned: Mutex::new(HashSet::new()),
        };
        ledger.ensure(&ledger.default)?;
        Ok(ledger)
    }

    pub const fn default_context(&self) -> &ContextId {
        &self.default
    }

    pub const fn mode(&self) -> ContextMode {
        self.mode
    }

    /// The context a fragment addresses.
    pub fn resolve(&self, requested: Option<ContextId>) -> ContextId {
        match (self.mode, requested) {
            (ContextMode::Multi, Some(id)) => id,
            _ => self.default.clone(),
        }
    }

    pub fn owns(&self, id: &ContextId) -> bool {
        self.owned.lock().contains(id)
    }

    /// Admit `id` unless this session already holds it.
    pub fn ensure(&self, id: &ContextId) -> Result<(), AdmissionError> {
        let mut owned = self.owned.lock();
        if owned.contains(id) {
            return Ok(());
        }
        self.admission.try_admit(id)?;
        owned.insert(id.clone());
        drop(owned);
        Ok(())
    }

    /// Stop tracking `id` and free its slot.
    pub fn close(&self, id: &ContextId) {
        if self.owned.lock().remove(id) {
            self.admission.release(id);
        }
    }

    pub fn held(&self) -> Vec<ContextId> {
        self.owned.lock().iter().cloned().collect()
    }

    pub fn release_all(&self) {
        let drained: Vec<ContextId> = self.owned.lock().drain().collect();
        for id in &drained {
            self.admission.release(id);
        }
        if !drained.is_empty() {
            debug!(released = drained.len(), "Released session contexts");
        }
    }
}

impl Drop for ContextLedger {
    fn drop(&mut self) {
        self.release_all();
    }
}
