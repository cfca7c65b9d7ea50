//! # Run State
//!
//! The shared coordinators for one run, constructed once and handed to
//! every worker by `Arc`. Each coordinator guards its own state with its
//! own lock; no critical section ever spans two of them, which rules out
//! lock-ordering deadlock at the cost of one documented race (a budget
//! slot consumed just before an empty-pool check).

use crate::budget::RequestBudget;
use crate::config::Config;
use crate::lifecycle::WorkerLifecycle;
use crate::payload::PayloadPool;
use crate::rotor::PayloadRotor;
use crate::sender::RequestSender;
use crate::stats::RunTimings;
use std::sync::Arc;
use std::time::Duration;

/// Everything a worker needs, shared across the run.
pub struct RunState {
    pub pool: PayloadPool,
    pub budget: RequestBudget,
    pub rotor: PayloadRotor,
    pub lifecycle: WorkerLifecycle,
    pub timings: RunTimings,
    pub sender: Arc<dyn RequestSender>,
    pub completions_path: String,
    pub request_timeout: Duration,
    pub request_label: String,
}

impl RunState {
    /// Assemble the run state from configuration plus the two injected
    /// capabilities (media discovery lives inside the pool, transport in
    /// the sender).
    pub fn new(config: &Config, pool: PayloadPool, sender: Arc<dyn RequestSender>) -> Self {
        Self {
            pool,
            budget: RequestBudget::new(config.max_requests),
            rotor: PayloadRotor::new(),
            lifecycle: WorkerLifecycle::new(),
            timings: RunTimings::new(),
            sender,
            completions_path: config.completions_path.clone(),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            request_label: config.request_label.clone(),
        }
    }
}
