//! # Load Worker
//!
//! One concurrent virtual user. The external scheduler calls
//! [`on_start`](LoadWorker::on_start) once, [`run_once`](LoadWorker::run_once)
//! repeatedly until it returns [`TaskOutcome::Terminate`], then
//! [`on_stop`](LoadWorker::on_stop) once. Per invocation the worker asks
//! the budget for permission, pulls the next payload through the rotor,
//! issues one request, and decides whether to keep going.

use crate::budget::Acquisition;
use crate::schemas::ChatCompletionResponse;
use crate::sender::json_headers;
use crate::state::RunState;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};
use uuid::Uuid;

/// What the scheduler should do with this worker next.
///
/// Self-termination is a value, not an exception: the task entry point
/// returns `Terminate` and the scheduler stops invoking it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    /// Eligible for another invocation.
    Continue,
    /// Done; the scheduler must call `on_stop` and drop this worker.
    Terminate,
}

/// A single load-generating worker.
pub struct LoadWorker {
    id: Uuid,
    state: Arc<RunState>,
}

impl LoadWorker {
    pub fn new(state: Arc<RunState>) -> Self {
        Self {
            id: Uuid::new_v4(),
            state,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Start hook: register with the lifecycle and make sure the shared
    /// payload pool is loaded. Only the first worker to arrive pays for
    /// the preload; the rest wait on it or return immediately.
    pub async fn on_start(&self) {
        let active = self.state.lifecycle.register(self.id);
        info!("worker {} starting (active workers: {})", self.id, active);

        let loaded = self.state.pool.ensure_loaded().await;
        if loaded == 0 {
            error!("worker {} has no preloaded payloads", self.id);
        } else {
            info!("worker {} ready with {} preloaded payloads", self.id, loaded);
        }
    }

    /// Task entry point: issue at most one request.
    pub async fn run_once(&self) -> TaskOutcome {
        let (sequence, is_final) = match self.state.budget.try_acquire() {
            Acquisition::Denied => {
                debug!(
                    "worker {} stopping - budget exhausted at {} requests",
                    self.id,
                    self.state.budget.completed()
                );
                return TaskOutcome::Terminate;
            }
            Acquisition::Granted { sequence, is_final } => (sequence, is_final),
        };

        // The grant above already consumed a budget slot; an empty pool
        // terminates this worker without refunding it (accepted one-off
        // discrepancy, see RequestBudget docs).
        if self.state.pool.is_empty() {
            error!(
                "no payloads available for request #{}; worker {} stopping",
                sequence, self.id
            );
            return TaskOutcome::Terminate;
        }

        let index = match self.state.rotor.next(self.state.pool.len()) {
            Ok(index) => index,
            Err(e) => {
                error!("worker {} rotor failure: {}", self.id, e);
                return TaskOutcome::Terminate;
            }
        };

        let payload = match self.state.pool.get(index) {
            Ok(payload) => payload,
            Err(e) => {
                error!("worker {} payload lookup failure: {}", self.id, e);
                return TaskOutcome::Terminate;
            }
        };

        debug!(
            "request #{} using payload index {} ({})",
            sequence,
            index,
            payload.source_name()
        );

        if is_final {
            info!("request #{}: this is the final request", sequence);
        }

        let started = Instant::now();
        let result = self
            .state
            .sender
            .send(
                &self.state.completions_path,
                payload.body(),
                json_headers(),
                self.state.request_timeout,
                &self.state.request_label,
            )
            .await;
        let ended = Instant::now();
        self.state.timings.record(started, ended);

        // All outcomes funnel through here; nothing is retried and the
        // lifecycle decision below is identical for success and failure.
        match result {
            Ok(outcome) if outcome.is_success() => {
                info!(
                    "request #{} completed in {:.2}s with status {}",
                    sequence,
                    outcome.elapsed.as_secs_f64(),
                    outcome.status
                );
                if let Ok(parsed) = serde_json::from_str::<ChatCompletionResponse>(&outcome.body) {
                    if let Some(usage) = parsed.usage {
                        debug!(
                            "request #{} usage: {} prompt + {} completion = {} tokens",
                            sequence,
                            usage.prompt_tokens,
                            usage.completion_tokens,
                            usage.total_tokens
                        );
                    }
                }
            }
            Ok(outcome) => {
                error!(
                    "request #{} failed with status {} after {:.2}s: {}",
                    sequence,
                    outcome.status,
                    outcome.elapsed.as_secs_f64(),
                    truncate(&outcome.body, 300)
                );
            }
            Err(e) => {
                error!(
                    "request #{} failed after {:.2}s: {}",
                    sequence,
                    ended.duration_since(started).as_secs_f64(),
                    e
                );
            }
        }

        if is_final {
            info!(
                "final request completed; total requests sent: {}",
                sequence
            );
            return TaskOutcome::Terminate;
        }

        TaskOutcome::Continue
    }

    /// Stop hook: deregister and, as the last one out after the stop
    /// condition latched, announce the drain.
    pub fn on_stop(&self) {
        let remaining = self.state.lifecycle.deregister(self.id);
        info!(
            "worker {} stopped (remaining active workers: {})",
            self.id, remaining
        );

        if remaining == 0 && self.state.budget.is_stopped() {
            self.state
                .lifecycle
                .log_drained(self.state.budget.completed());
        }
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
