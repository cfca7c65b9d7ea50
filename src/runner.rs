//! # Runner
//!
//! The in-process scheduler driving the workers. Spawns one tokio task
//! per virtual user; each task runs the worker's start hook, invokes the
//! task entry point until it asks to terminate, then runs the stop hook.
//! Any other driver with the same start/task/stop contract can replace
//! this one.

use crate::stats::RunSummary;
use crate::state::RunState;
use crate::worker::{LoadWorker, TaskOutcome};
use futures_util::future::join_all;
use std::sync::Arc;
use tracing::info;

/// Drives a fixed number of workers against the shared run state.
pub struct Runner {
    state: Arc<RunState>,
}

impl Runner {
    pub fn new(state: Arc<RunState>) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &Arc<RunState> {
        &self.state
    }

    /// Run `workers` concurrent virtual users to completion and return
    /// the end-of-run summary. Returns once every worker has exited its
    /// stop hook, i.e. once the run has fully drained.
    pub async fn run(&self, workers: usize) -> RunSummary {
        info!(
            "starting run: {} workers, {} total requests",
            workers,
            self.state.budget.max_requests()
        );

        let handles: Vec<_> = (0..workers)
            .map(|_| {
                let state = Arc::clone(&self.state);
                tokio::spawn(async move {
                    let worker = LoadWorker::new(state);
                    worker.on_start().await;
                    loop {
                        match worker.run_once().await {
                            TaskOutcome::Continue => {}
                            TaskOutcome::Terminate => break,
                        }
                    }
                    worker.on_stop();
                })
            })
            .collect();

        // A panicked worker task is a bug, not a load result; surface it.
        for result in join_all(handles).await {
            result.expect("worker task panicked");
        }

        RunSummary::new(
            self.state.budget.completed(),
            self.state.timings.real_duration(),
        )
    }
}
