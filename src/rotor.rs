//! # Payload Rotor
//!
//! Round-robin selection of the next payload index, shared by all
//! workers. An unbounded atomic counter taken modulo the pool size
//! spreads requests maximally across the pool; when the request count is
//! not a multiple of the pool size the last partial cycle favors low
//! indices, which is accepted behavior.

use crate::error::BenchError;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Shared rotating cursor over the payload pool.
#[derive(Debug, Default)]
pub struct PayloadRotor {
    next_index: AtomicUsize,
}

impl PayloadRotor {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next payload index in `[0, pool_size)`.
    ///
    /// Atomic fetch-and-increment: no two concurrent calls observe the
    /// same pre-increment counter value. Callers must have already
    /// verified the pool is non-empty; a zero `pool_size` is a contract
    /// violation.
    pub fn next(&self, pool_size: usize) -> Result<usize, BenchError> {
        if pool_size == 0 {
            return Err(BenchError::InvalidState(
                "rotor called with empty pool".to_string(),
            ));
        }
        let raw = self.next_index.fetch_add(1, Ordering::Relaxed);
        Ok(raw % pool_size)
    }

    /// Total indices handed out so far.
    pub fn issued(&self) -> usize {
        self.next_index.load(Ordering::Relaxed)
    }
}
