//! # Run Timing
//!
//! Wall-clock bookkeeping for the requests themselves, excluding the
//! preload pass, so the reported req/s reflects server throughput and
//! not encode time. First-start and last-end instants are recorded
//! under one lock after each request completes.

use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{info, warn};

#[derive(Debug, Default)]
struct TimingState {
    first_start: Option<Instant>,
    last_end: Option<Instant>,
}

/// Shared first/last request timestamps across all workers.
#[derive(Debug, Default)]
pub struct RunTimings {
    state: Mutex<TimingState>,
}

impl RunTimings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one completed request's start and end instants. The first
    /// recorded start wins; the last recorded end wins.
    pub fn record(&self, started: Instant, ended: Instant) {
        let mut state = self.state.lock().unwrap();
        if state.first_start.is_none() {
            state.first_start = Some(started);
        }
        state.last_end = Some(ended);
    }

    /// Duration from the first request's start to the last request's
    /// end, if any request completed.
    pub fn real_duration(&self) -> Option<Duration> {
        let state = self.state.lock().unwrap();
        match (state.first_start, state.last_end) {
            (Some(first), Some(last)) => Some(last.duration_since(first)),
            _ => None,
        }
    }
}

/// End-of-run figures derived from the budget and timings.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub total_requests: u64,
    pub duration: Option<Duration>,
}

impl RunSummary {
    pub fn new(total_requests: u64, duration: Option<Duration>) -> Self {
        Self {
            total_requests,
            duration,
        }
    }

    /// Requests per second over the measured window, when computable.
    pub fn requests_per_second(&self) -> Option<f64> {
        let duration = self.duration?;
        let secs = duration.as_secs_f64();
        if secs > 0.0 {
            Some(self.total_requests as f64 / secs)
        } else {
            None
        }
    }

    /// Log the summary. Excludes preload time by construction.
    pub fn log(&self) {
        match (self.duration, self.requests_per_second()) {
            (Some(duration), Some(rps)) => {
                info!("total requests sent: {}", self.total_requests);
                info!("real testing duration: {:.2}s", duration.as_secs_f64());
                info!("real req/s (excluding preload): {:.2}", rps);
            }
            _ => {
                warn!("unable to calculate req/s - no timing data available");
            }
        }
    }
}
