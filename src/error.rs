//! # Error Types
//!
//! The error taxonomy for the load driver. Failures are deliberately
//! coarse-grained: per-unit preload failures are skipped, per-request
//! transport failures are logged and never retried, and contract
//! violations terminate only the worker that hit them.

use thiserror::Error;

/// Errors produced by the load driver.
#[derive(Debug, Error)]
pub enum BenchError {
    /// A single source unit failed to load or encode. The preload pass
    /// logs these and continues with the remaining units.
    #[error("preload failure: {0}")]
    Preload(String),

    /// The payload pool finished loading with zero entries. Fatal to
    /// every worker; the run drains with zero throughput.
    #[error("payload pool is empty")]
    EmptyPool,

    /// An outbound request failed at the transport level (connect,
    /// timeout, body read). Caught and logged by the issuing worker,
    /// never retried, never refunds the request budget.
    #[error("transport failure: {0}")]
    Transport(String),

    /// A contract violation, e.g. asking the rotor for an index over an
    /// empty pool. Fatal to the calling worker only.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Invalid configuration detected at startup.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for BenchError {
    /// Categorize reqwest errors into the transport variant with a
    /// message that distinguishes timeouts from connection failures.
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            BenchError::Transport("request timeout - server did not respond in time".to_string())
        } else if err.is_connect() {
            BenchError::Transport("connection failed - unable to reach server".to_string())
        } else {
            BenchError::Transport(format!("HTTP client error: {}", err))
        }
    }
}

impl From<serde_json::Error> for BenchError {
    fn from(err: serde_json::Error) -> Self {
        BenchError::Preload(format!("JSON error: {}", err))
    }
}

impl From<url::ParseError> for BenchError {
    fn from(err: url::ParseError) -> Self {
        BenchError::Config(format!("invalid URL: {}", err))
    }
}
