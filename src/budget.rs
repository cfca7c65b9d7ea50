//! # Request Budget
//!
//! The shared counter enforcing the global request cap. Every decision
//! (compare, increment, final-request detection, stop latch) happens in
//! one critical section so that exactly `max` acquisitions are granted
//! and exactly one of them is marked final, no matter how many workers
//! race at the boundary.

use std::sync::Mutex;

/// Outcome of a [`RequestBudget::try_acquire`] call.
///
/// Workers translate `Denied` into self-termination; the scheduler never
/// sees an exception-style control flow, just this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acquisition {
    /// Permission to issue one request. `sequence` is 1-based and
    /// unique; `is_final` is true for exactly one grant per run.
    Granted { sequence: u64, is_final: bool },
    /// The budget is exhausted; the caller must stop.
    Denied,
}

impl Acquisition {
    pub fn is_granted(&self) -> bool {
        matches!(self, Acquisition::Granted { .. })
    }
}

#[derive(Debug)]
struct BudgetState {
    count: u64,
    stopped: bool,
}

/// # Request Budget
///
/// `{count, max, stopped}` with the invariants: `count` never exceeds
/// `max`, `stopped` latches exactly once when `count` first reaches
/// `max`, and the counter is monotonic for the lifetime of the run.
#[derive(Debug)]
pub struct RequestBudget {
    max: u64,
    state: Mutex<BudgetState>,
}

impl RequestBudget {
    /// Create a budget for `max` total requests.
    ///
    /// # Panics
    ///
    /// Panics if `max` is zero; a zero-request run is a configuration
    /// error caught by [`Config::validate`](crate::config::Config::validate).
    pub fn new(max: u64) -> Self {
        assert!(max > 0, "request budget must be greater than zero");
        Self {
            max,
            state: Mutex::new(BudgetState {
                count: 0,
                stopped: false,
            }),
        }
    }

    /// Attempt to claim one request slot.
    ///
    /// A single atomic transaction: if stopped, deny. Otherwise if the
    /// counter is below the cap, increment it, hand out the post-
    /// increment value as the sequence number, and latch the stop flag
    /// when the cap is reached. The remaining arm guards the narrow race
    /// where the counter hit the cap but the flag was not yet observed.
    pub fn try_acquire(&self) -> Acquisition {
        let mut state = self.state.lock().unwrap();

        if state.stopped {
            return Acquisition::Denied;
        }

        if state.count < self.max {
            state.count += 1;
            let sequence = state.count;
            let is_final = sequence >= self.max;
            if is_final {
                state.stopped = true;
            }
            Acquisition::Granted { sequence, is_final }
        } else {
            state.stopped = true;
            Acquisition::Denied
        }
    }

    /// Requests granted so far.
    pub fn completed(&self) -> u64 {
        self.state.lock().unwrap().count
    }

    /// Whether the stop flag has latched.
    pub fn is_stopped(&self) -> bool {
        self.state.lock().unwrap().stopped
    }

    pub fn max_requests(&self) -> u64 {
        self.max
    }
}
