//! # Payload Pool
//!
//! Preloads and caches the finite, ordered collection of request
//! payloads exactly once per run, shared read-only by every worker
//! thereafter. The expensive discovery-and-encode pass runs behind a
//! single-execution guard: the first caller performs it, concurrent
//! callers wait for it to finish, later callers return immediately.

use crate::error::BenchError;
use crate::media::{Frame, FrameSource, SourceUnit};
use crate::schemas::{ChatCompletionRequest, ContentPart, Message, MessageContent};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use bytes::Bytes;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tokio::sync::OnceCell;
use tracing::{error, info};

/// Shape of every request the pool builds: the fixed instruction text
/// and generation parameters shared by all payloads in a run.
#[derive(Debug, Clone)]
pub struct PayloadSpec {
    pub model: String,
    pub prompt_text: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl PayloadSpec {
    /// The payload shape a run's configuration implies.
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self {
            model: config.model_id.clone(),
            prompt_text: config.prompt_text.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

/// # Payload
///
/// One immutable, fully-built request body. The serialized bytes are
/// produced once during preload so workers never re-serialize on the
/// hot path; cloning the [`Bytes`] handle is reference-counted.
#[derive(Debug, Clone)]
pub struct Payload {
    request: ChatCompletionRequest,
    body: Bytes,
    source_name: String,
    frame_count: usize,
}

impl Payload {
    fn build(unit: &SourceUnit, frames: &[Frame], spec: &PayloadSpec) -> Result<Self, BenchError> {
        let mut parts = Vec::with_capacity(frames.len() + 1);
        parts.push(ContentPart::text(spec.prompt_text.clone()));
        for frame in frames {
            let encoded = BASE64.encode(&frame.bytes);
            parts.push(ContentPart::image_data_uri(format!(
                "data:{};base64,{}",
                frame.mime, encoded
            )));
        }

        let request = ChatCompletionRequest {
            model: spec.model.clone(),
            messages: vec![Message {
                role: "user".to_string(),
                content: MessageContent::Parts(parts),
            }],
            max_tokens: spec.max_tokens,
            temperature: spec.temperature,
        };

        let body = Bytes::from(serde_json::to_vec(&request)?);

        Ok(Self {
            request,
            body,
            source_name: unit.name(),
            frame_count: frames.len(),
        })
    }

    /// The serialized request body, ready to send.
    pub fn body(&self) -> Bytes {
        self.body.clone()
    }

    pub fn request(&self) -> &ChatCompletionRequest {
        &self.request
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }
}

/// # Payload Pool
///
/// The ordered, append-only-then-frozen sequence of payloads. Population
/// happens exactly once regardless of how many workers call
/// [`ensure_loaded`](PayloadPool::ensure_loaded) concurrently; a unit
/// that fails to load is logged and skipped rather than aborting the
/// pass, and zero discovered units leaves the pool complete but empty.
pub struct PayloadPool {
    source: Box<dyn FrameSource>,
    spec: PayloadSpec,
    payloads: OnceCell<Vec<Payload>>,
    load_passes: AtomicUsize,
}

impl PayloadPool {
    pub fn new(source: Box<dyn FrameSource>, spec: PayloadSpec) -> Self {
        Self {
            source,
            spec,
            payloads: OnceCell::new(),
            load_passes: AtomicUsize::new(0),
        }
    }

    /// Idempotent, concurrency-safe preload. The first caller runs the
    /// discovery-and-encode pass; everyone else either waits for that
    /// pass or returns immediately once it has completed.
    pub async fn ensure_loaded(&self) -> usize {
        let payloads = self
            .payloads
            .get_or_init(|| async {
                self.load_passes.fetch_add(1, Ordering::SeqCst);
                self.load_all()
            })
            .await;
        payloads.len()
    }

    fn load_all(&self) -> Vec<Payload> {
        info!("starting payload preloading (shared across all workers)");
        let started = Instant::now();

        let units = match self.source.discover() {
            Ok(units) => units,
            Err(e) => {
                error!("media discovery failed: {}", e);
                Vec::new()
            }
        };

        if units.is_empty() {
            error!("no source units found; pool will be empty");
            return Vec::new();
        }

        let mut payloads = Vec::with_capacity(units.len());
        let mut total_frames = 0usize;
        let mut total_bytes = 0usize;

        for unit in &units {
            match self.load_unit(unit) {
                Ok(payload) => {
                    total_frames += payload.frame_count();
                    total_bytes += payload.body.len();
                    payloads.push(payload);
                }
                Err(e) => {
                    error!("failed to preload {}: {}", unit.name(), e);
                }
            }
        }

        let elapsed = started.elapsed();
        info!(
            "preloaded {} payloads ({} frames, {:.1}MB serialized) in {:.2}s",
            payloads.len(),
            total_frames,
            total_bytes as f64 / (1024.0 * 1024.0),
            elapsed.as_secs_f64()
        );
        payloads
    }

    fn load_unit(&self, unit: &SourceUnit) -> Result<Payload, BenchError> {
        let frames = self.source.frames(unit)?;
        Payload::build(unit, &frames, &self.spec)
    }

    /// The payload at `index`. Valid only after `ensure_loaded`.
    pub fn get(&self, index: usize) -> Result<&Payload, BenchError> {
        let payloads = self
            .payloads
            .get()
            .ok_or_else(|| BenchError::InvalidState("pool read before ensure_loaded".into()))?;
        if payloads.is_empty() {
            return Err(BenchError::EmptyPool);
        }
        payloads
            .get(index)
            .ok_or_else(|| BenchError::InvalidState(format!("payload index {} out of range", index)))
    }

    pub fn len(&self) -> usize {
        self.payloads.get().map_or(0, |p| p.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How many times the underlying load pass has started. Stays at 1
    /// no matter how many workers race `ensure_loaded`.
    pub fn load_passes(&self) -> usize {
        self.load_passes.load(Ordering::SeqCst)
    }
}
