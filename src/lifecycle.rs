//! # Worker Lifecycle
//!
//! Tracks the set of currently-active workers for observability and
//! drain detection. Membership changes are mutually exclusive; the run
//! is drained once the set empties while the request budget is stopped.
//! This is not a correctness dependency of the budget.

use std::collections::HashSet;
use std::sync::Mutex;
use tracing::info;
use uuid::Uuid;

/// Registry of live worker identities.
#[derive(Debug, Default)]
pub struct WorkerLifecycle {
    active: Mutex<HashSet<Uuid>>,
}

impl WorkerLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a worker; returns the active count including it.
    pub fn register(&self, id: Uuid) -> usize {
        let mut active = self.active.lock().unwrap();
        active.insert(id);
        active.len()
    }

    /// Deregister a worker; returns the count still active.
    pub fn deregister(&self, id: Uuid) -> usize {
        let mut active = self.active.lock().unwrap();
        active.remove(&id);
        active.len()
    }

    pub fn active_count(&self) -> usize {
        self.active.lock().unwrap().len()
    }

    /// Log the end-of-run banner when the last worker leaves.
    pub fn log_drained(&self, total_requests: u64) {
        info!(
            "*** all workers stopped *** total requests: {}",
            total_requests
        );
    }
}
