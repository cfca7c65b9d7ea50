use clap::Parser;
use std::env;
use url::Url;

/// Which shape of source units the media root contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum MediaKind {
    /// Subdirectories of pre-extracted video frames; one payload per
    /// directory, frames ordered by file name.
    Frames,
    /// Standalone image files; one payload per image.
    Images,
}

/// # vlm-loadgen Configuration
///
/// Configuration from command-line arguments, environment variables, and
/// an optional .env file. Every knob that shapes a run lives here so a
/// benchmark invocation is reproducible from its command line alone.
#[derive(Debug, Clone, Parser)]
#[command(name = "vlm-loadgen")]
#[command(about = "Bounded concurrent load generator for multimodal chat-completions endpoints")]
#[command(version)]
pub struct Config {
    // =============================================================================
    // TARGET SERVER
    // =============================================================================
    /// Base URL of the inference server under test
    #[arg(long, env = "LOADGEN_TARGET_URL", default_value = "http://localhost:8000")]
    pub target_url: String,

    /// Request path appended to the base URL
    #[arg(long, env = "LOADGEN_COMPLETIONS_PATH", default_value = "/v1/chat/completions")]
    pub completions_path: String,

    /// Model identifier placed in every request body
    #[arg(long, env = "LOADGEN_MODEL", default_value = "Qwen2.5-VL")]
    pub model_id: String,

    // =============================================================================
    // MEDIA SOURCE
    // =============================================================================
    /// Root directory containing the media to benchmark with
    #[arg(long, env = "LOADGEN_MEDIA_ROOT", default_value = "./processed_videos")]
    pub media_root: String,

    /// Shape of the media root: frame directories or standalone images
    #[arg(long, env = "LOADGEN_MEDIA_KIND", value_enum, default_value = "frames")]
    pub media_kind: MediaKind,

    /// Maximum frames taken from each frame directory
    #[arg(long, env = "LOADGEN_MAX_FRAMES", default_value = "8")]
    pub max_frames: usize,

    // =============================================================================
    // REQUEST SHAPE
    // =============================================================================
    /// Instruction text sent with every payload
    #[arg(long, env = "LOADGEN_PROMPT", default_value = "Please describe the content of the video.")]
    pub prompt_text: String,

    /// max_tokens for each completion
    #[arg(long, env = "LOADGEN_MAX_TOKENS", default_value = "200")]
    pub max_tokens: u32,

    /// Sampling temperature for each completion
    #[arg(long, env = "LOADGEN_TEMPERATURE", default_value = "0.2")]
    pub temperature: f32,

    // =============================================================================
    // LOAD SHAPE
    // =============================================================================
    /// Total number of requests to issue across all workers
    #[arg(long, env = "LOADGEN_MAX_REQUESTS", default_value = "584")]
    pub max_requests: u64,

    /// Number of concurrent virtual users
    #[arg(long, env = "LOADGEN_WORKERS", default_value = "8")]
    pub workers: usize,

    /// Per-request timeout in seconds
    #[arg(long, env = "LOADGEN_REQUEST_TIMEOUT", default_value = "300")]
    pub request_timeout_secs: u64,

    /// Label attached to every request for log correlation
    #[arg(long, env = "LOADGEN_REQUEST_LABEL", default_value = "vlm_completion")]
    pub request_label: String,

    // =============================================================================
    // OBSERVABILITY
    // =============================================================================
    /// Seconds between periodic status reports (0 disables the monitor)
    #[arg(long, env = "LOADGEN_STATUS_INTERVAL", default_value = "30")]
    pub status_interval_secs: u64,

    /// Log level filter (error, warn, info, debug, trace)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Enable backtrace on panic
    #[arg(long, env = "RUST_BACKTRACE")]
    pub rust_backtrace: Option<String>,
}

impl Config {
    /// Parse configuration from command line arguments and environment.
    ///
    /// Loads a `.env` file if one exists, parses arguments, initializes
    /// logging, and validates. Exits with a message on invalid
    /// configuration so a bad run never starts issuing requests.
    pub fn parse_args() -> Self {
        let _ = dotenv::dotenv();

        let config = Self::parse();
        config.setup_logging();

        if let Err(err) = config.validate() {
            eprintln!("Configuration validation failed: {}", err);
            std::process::exit(1);
        }

        config
    }

    /// Create a test configuration with minimal required fields.
    /// This is used for testing purposes only.
    pub fn for_test() -> Self {
        Self {
            target_url: "http://localhost:8000".to_string(),
            completions_path: "/v1/chat/completions".to_string(),
            model_id: "Qwen2.5-VL".to_string(),
            media_root: "./processed_videos".to_string(),
            media_kind: MediaKind::Frames,
            max_frames: 8,
            prompt_text: "Please describe the content of the video.".to_string(),
            max_tokens: 200,
            temperature: 0.2,
            max_requests: 5,
            workers: 2,
            request_timeout_secs: 300,
            request_label: "vlm_completion".to_string(),
            status_interval_secs: 0,
            log_level: "info".to_string(),
            rust_backtrace: None,
        }
    }

    /// Set up the tracing subscriber from the configured log level.
    fn setup_logging(&self) {
        if let Some(backtrace) = &self.rust_backtrace {
            env::set_var("RUST_BACKTRACE", backtrace);
        }

        let _ = tracing_subscriber::fmt()
            .with_env_filter(self.log_level.as_str())
            .with_target(false)
            .try_init();
    }

    /// Validate configuration values and provide helpful error messages.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_requests == 0 {
            return Err("--max-requests must be greater than 0.".to_string());
        }

        if self.workers == 0 {
            return Err("--workers must be greater than 0.".to_string());
        }

        if self.max_frames == 0 {
            return Err("--max-frames must be greater than 0.".to_string());
        }

        if self.request_timeout_secs == 0 {
            return Err("--request-timeout must be greater than 0 seconds.".to_string());
        }

        if self.target_url.is_empty() {
            return Err("Target URL cannot be empty.".to_string());
        }

        match Url::parse(&self.target_url) {
            Ok(url) => {
                if !["http", "https"].contains(&url.scheme()) {
                    return Err(format!(
                        "Invalid URL scheme '{}'. Only 'http' and 'https' are supported.",
                        url.scheme()
                    ));
                }
                if url.host().is_none() {
                    return Err(
                        "Target URL must include a host (e.g. 'http://localhost:8000')."
                            .to_string(),
                    );
                }
            }
            Err(err) => {
                return Err(format!("Invalid target URL '{}': {}", self.target_url, err));
            }
        }

        if !self.completions_path.starts_with('/') {
            return Err(format!(
                "Completions path '{}' must start with '/'.",
                self.completions_path
            ));
        }

        Ok(())
    }
}
