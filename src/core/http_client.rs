//! # HTTP Client Factory
//!
//! Centralized HTTP client creation and configuration so every sender
//! uses the same pooling, keepalive, and TLS settings.

use crate::config::Config;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// HTTP client configuration errors
#[derive(Debug, Error)]
pub enum HttpClientError {
    #[error("Failed to build HTTP client: {0}")]
    BuildError(#[from] reqwest::Error),
}

/// HTTP client pool configuration
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub max_idle_per_host: usize,
    pub idle_timeout: Duration,
    pub keepalive: Option<Duration>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_idle_per_host: 10,
            idle_timeout: Duration::from_secs(90),
            keepalive: Some(Duration::from_secs(60)),
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub pool: PoolConfig,
    pub compression: bool,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(300),
            connect_timeout: Duration::from_secs(10),
            pool: PoolConfig::default(),
            compression: true,
        }
    }
}

impl From<&Config> for HttpClientConfig {
    fn from(config: &Config) -> Self {
        Self {
            timeout: Duration::from_secs(config.request_timeout_secs),
            connect_timeout: Duration::from_secs(10),
            pool: PoolConfig {
                // One warm connection per virtual user keeps the pool
                // from churning under full concurrency.
                max_idle_per_host: config.workers.max(1),
                idle_timeout: Duration::from_secs(120),
                keepalive: Some(Duration::from_secs(60)),
            },
            compression: true,
        }
    }
}

/// HTTP client builder with configurable options
pub struct HttpClientBuilder {
    config: HttpClientConfig,
}

impl HttpClientBuilder {
    /// Create a new HTTP client builder with default configuration
    pub fn new() -> Self {
        Self {
            config: HttpClientConfig::default(),
        }
    }

    /// Create HTTP client builder from application configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            config: HttpClientConfig::from(config),
        }
    }

    /// Set request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set connection timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set pool configuration
    pub fn pool_config(mut self, pool: PoolConfig) -> Self {
        self.config.pool = pool;
        self
    }

    /// Enable or disable compression
    pub fn compression(mut self, enabled: bool) -> Self {
        self.config.compression = enabled;
        self
    }

    /// Build the HTTP client
    pub fn build(self) -> Result<Client, HttpClientError> {
        let mut builder = Client::builder()
            .timeout(self.config.timeout)
            .connect_timeout(self.config.connect_timeout)
            .pool_max_idle_per_host(self.config.pool.max_idle_per_host)
            .pool_idle_timeout(self.config.pool.idle_timeout);

        if let Some(keepalive) = self.config.pool.keepalive {
            builder = builder.tcp_keepalive(keepalive);
        }

        if self.config.compression {
            builder = builder.gzip(true).brotli(true);
        }

        builder.build().map_err(HttpClientError::from)
    }
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
