//! Admission control for synthesis contexts.
//!
//! The service caps how many contexts may be open on one connection. The
//! [`AdmissionController`] is the single authority for that cap: callers
//! ask it to admit a context before any frame addressing the context is
//! sent, and release the context once it is closed.

use std::collections::HashSet;

use parking_lot::RwLock;
use thiserror::Error;
use tracing::debug;

use crate::domain::ContextId;

/// Capacity of a single-context connection.
pub const SINGLE_CONTEXT_CAPACITY: usize = 1;

/// Capacity of a multi-context connection.
pub const MULTI_CONTEXT_CAPACITY: usize = 5;

/// Whether a connection carries one context or several.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ContextMode {
    #[default]
    Single,
    Multi,
}

impl ContextMode {
    /// Maximum number of concurrently open contexts in this mode.
    #[must_use]
    pub const fn capacity(self) -> usize {
        match self {
            Self::Single => SINGLE_CONTEXT_CAPACITY,
            Self::Multi => MULTI_CONTEXT_CAPACITY,
        }
    }
}

/// Admission refusal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdmissionError {
    #[error("Context capacity reached ({capacity} open)")]
    AtCapacity { capacity: usize },
}

/// Bounds the number of concurrently open contexts.
///
/// Safe to share between tasks behind an `Arc`. Admission checks and
/// inserts under one write lock, so concurrent callers can never push the
/// open count past the capacity.
#[derive(Debug)]
pub struct AdmissionController {
    capacity: usize,
    open: RwLock<HashSet<ContextId>>,
}

impl AdmissionController {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            open: RwLock::new(HashSet::with_capacity(capacity)),
        }
    }

    pub fn for_mode(mode: ContextMode) -> Self {
        Self::new(mode.capacity())
    }

    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of currently open contexts.
    pub fn count(&self) -> usize {
        self.open.read().len()
    }

    pub fn is_open(&self, id: &ContextId) -> bool {
        self.open.read().contains(id)
    }

    /// Admit `id`.
    ///
    /// Admitting an id that is already open is a no-op and succeeds.
    pub fn try_admit(&self, id: &ContextId) -> Result<(), AdmissionError> {
        let mut open = self.open.write();
        if open.contains(id) {
            return Ok(());
        }
        if open.len() >= self.capacity {
            drop(open);
            debug!(context_id = %id, capacity = self.capacity, "Context admission refused");
            return Err(AdmissionError::AtCapacity {
                capacity: self.capacity,
            });
        }
        open.insert(id.clone());
        let count = open.len();
        drop(open);
        debug!(context_id = %id, open = count, "Context admitted");
        Ok(())
    }

    /// Release `id`. Releasing an id that is not open does nothing.
    pub fn release(&self, id: &ContextId) {
        let remaining = {
            let mut open = self.open.write();
            open.remove(id).then(|| open.len())
        };
        if let Some(count) = remaining {
            debug!(context_id = %id, open = count, "Context released");
        }
    }
}
