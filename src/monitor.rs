//! # Status Monitor
//!
//! Periodic progress reporting, independent of the workers. Reads the
//! shared coordinators through their public accessors only and exits on
//! its own once the run has drained.

use crate::state::RunState;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::info;

/// Spawns the periodic status reporter.
pub struct StatusMonitor;

impl StatusMonitor {
    /// Start reporting every `period`. Returns the task handle; the
    /// task finishes by itself when all workers are gone and the budget
    /// has stopped, so joining it is optional.
    pub fn spawn(state: Arc<RunState>, period: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = interval(period);
            // The first tick fires immediately; skip it so the opening
            // log lines are not drowned in a zero-progress report.
            ticker.tick().await;

            loop {
                ticker.tick().await;

                let active = state.lifecycle.active_count();
                let completed = state.budget.completed();
                let stopped = state.budget.is_stopped();

                info!(
                    "status: active workers: {}, completed requests: {}/{}, stop sending: {}",
                    active,
                    completed,
                    state.budget.max_requests(),
                    stopped
                );

                if stopped && active == 0 {
                    break;
                }
            }
        })
    }
}
