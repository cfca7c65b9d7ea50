//! # vlm-loadgen - Multimodal Inference Benchmark Driver
//!
//! A bounded concurrent load generator for multimodal (image/video
//! understanding) chat-completions endpoints such as vLLM serving
//! Qwen2.5-VL. The driver preloads a pool of fully-encoded request
//! payloads once, round-robins through it across any number of
//! concurrent virtual users, enforces an exact global request cap, and
//! reports throughput excluding preload time.
//!
//! ## Architecture
//!
//! - [`payload`] - payload construction and the load-once shared pool
//! - [`budget`] - the global request cap with exact-once final-request detection
//! - [`rotor`] - round-robin payload index selection
//! - [`lifecycle`] - active-worker tracking and drain detection
//! - [`worker`] - the per-user unit driven by the scheduler
//! - [`runner`] - the in-process scheduler spawning workers as tasks
//! - [`sender`] - the outbound HTTP transport capability
//! - [`media`] - filesystem discovery of frame directories and images
//! - [`monitor`] - periodic status reporting
//! - [`config`] - CLI and environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vlm_loadgen::{
//!     Config, FsFrameSource, HttpSender, PayloadPool, PayloadSpec, Runner, RunState,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::for_test();
//!     let source = FsFrameSource::new(&config.media_root, config.media_kind, config.max_frames);
//!     let pool = PayloadPool::new(Box::new(source), PayloadSpec::from_config(&config));
//!     let sender = Arc::new(HttpSender::from_config(&config)?);
//!     let state = Arc::new(RunState::new(&config, pool, sender));
//!
//!     let summary = Runner::new(state).run(config.workers).await;
//!     summary.log();
//!     Ok(())
//! }
//! ```

// Core infrastructure
pub mod core;
pub mod config;
pub mod error;
pub mod schemas;

// Load-driver coordinators
pub mod budget;
pub mod lifecycle;
pub mod payload;
pub mod rotor;

// Execution
pub mod runner;
pub mod state;
pub mod worker;

// Capabilities and observability
pub mod media;
pub mod monitor;
pub mod sender;
pub mod stats;

// Re-export commonly used types for convenience
pub use budget::{Acquisition, RequestBudget};
pub use config::{Config, MediaKind};
pub use self::core::http_client::{HttpClientBuilder, HttpClientConfig};
pub use error::BenchError;
pub use lifecycle::WorkerLifecycle;
pub use media::{Frame, FrameSource, FsFrameSource, SourceUnit};
pub use monitor::StatusMonitor;
pub use payload::{Payload, PayloadPool, PayloadSpec};
pub use rotor::PayloadRotor;
pub use runner::Runner;
pub use sender::{json_headers, HttpSender, RequestSender, SendOutcome};
pub use state::RunState;
pub use stats::{RunSummary, RunTimings};
pub use worker::{LoadWorker, TaskOutcome};

/// The result type used throughout the library
pub type Result<T> = std::result::Result<T, BenchError>;
