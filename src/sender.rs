//! # Request Sender
//!
//! The outbound transport capability consumed by workers. The trait
//! keeps the load driver independent of the HTTP stack: workers hand a
//! serialized body to [`RequestSender::send`] and get back status, body
//! text, and elapsed time, or a transport error they log and move past.

use crate::config::Config;
use crate::core::http_client::HttpClientBuilder;
use crate::error::BenchError;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

/// Result of one completed request, successful or not at the HTTP level.
#[derive(Debug, Clone)]
pub struct SendOutcome {
    pub status: u16,
    pub body: String,
    pub elapsed: Duration,
}

impl SendOutcome {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The injected transport capability.
///
/// Implementations must surface transport-level failures (connect,
/// timeout, body read) as [`BenchError::Transport`]; HTTP error statuses
/// are not errors here, they come back in the outcome.
#[async_trait]
pub trait RequestSender: Send + Sync {
    async fn send(
        &self,
        path: &str,
        body: Bytes,
        headers: HeaderMap,
        timeout: Duration,
        label: &str,
    ) -> Result<SendOutcome, BenchError>;
}

/// Default JSON request headers.
pub fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}

/// # HTTP Sender
///
/// reqwest-backed implementation with connection pooling and keepalive
/// from the shared client factory.
pub struct HttpSender {
    client: Client,
    base_url: Url,
}

impl HttpSender {
    /// Build a sender from application configuration.
    pub fn from_config(config: &Config) -> Result<Self, BenchError> {
        let client = HttpClientBuilder::from_config(config)
            .build()
            .map_err(|e| BenchError::Config(e.to_string()))?;
        let base_url = Url::parse(&config.target_url)?;
        Ok(Self { client, base_url })
    }

    /// Build a sender for an explicit base URL with default client
    /// settings. Used by tests and embedding callers.
    pub fn new(base_url: &str) -> Result<Self, BenchError> {
        let client = HttpClientBuilder::new()
            .build()
            .map_err(|e| BenchError::Config(e.to_string()))?;
        let base_url = Url::parse(base_url)?;
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl RequestSender for HttpSender {
    async fn send(
        &self,
        path: &str,
        body: Bytes,
        headers: HeaderMap,
        timeout: Duration,
        label: &str,
    ) -> Result<SendOutcome, BenchError> {
        let url = self.base_url.join(path)?;
        let started = Instant::now();

        let response = self
            .client
            .post(url)
            .headers(headers)
            .timeout(timeout)
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        // Read the body inside the same measurement window; a failure
        // here is still a transport failure for the whole request.
        let body = response.text().await?;
        let elapsed = started.elapsed();

        debug!(
            "{}: status {} in {:.2}s ({} response bytes)",
            label,
            status,
            elapsed.as_secs_f64(),
            body.len()
        );

        Ok(SendOutcome {
            status,
            body,
            elapsed,
        })
    }
}
