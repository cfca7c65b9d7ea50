//! # vlm-loadgen
//!
//! Command-line entry point: parse configuration, preload the payload
//! pool, drive the configured number of concurrent workers until the
//! request budget drains, and report throughput.

use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use vlm_loadgen::{
    Config, FsFrameSource, HttpSender, PayloadPool, PayloadSpec, Runner, RunState, StatusMonitor,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse configuration from CLI args and .env file
    let config = Config::parse_args();

    info!("target: {}{}", config.target_url, config.completions_path);
    info!("model: {}", config.model_id);
    info!(
        "media root: {} ({:?}, up to {} frames per unit)",
        config.media_root, config.media_kind, config.max_frames
    );

    let source = FsFrameSource::new(&config.media_root, config.media_kind, config.max_frames);
    let pool = PayloadPool::new(Box::new(source), PayloadSpec::from_config(&config));
    let sender = Arc::new(HttpSender::from_config(&config)?);
    let state = Arc::new(RunState::new(&config, pool, sender));

    if config.status_interval_secs > 0 {
        // The monitor exits on its own once the run drains; no need to join it.
        let _ = StatusMonitor::spawn(
            Arc::clone(&state),
            Duration::from_secs(config.status_interval_secs),
        );
    }

    let summary = Runner::new(state).run(config.workers).await;
    summary.log();

    Ok(())
}
