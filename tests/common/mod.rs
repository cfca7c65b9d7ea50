//! Shared fixtures for integration tests: an in-memory frame source and
//! a recording mock sender.

#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::HeaderMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use vlm_loadgen::{
    BenchError, Config, Frame, FrameSource, PayloadPool, PayloadSpec, RequestSender, SendOutcome,
    SourceUnit,
};

/// Frame source serving `units` synthetic single-frame units, each with
/// distinct bytes so payloads are distinguishable in assertions.
pub struct StaticSource {
    units: usize,
    failing_unit: Option<usize>,
    discover_calls: Arc<AtomicUsize>,
}

impl StaticSource {
    pub fn new(units: usize) -> (Self, Arc<AtomicUsize>) {
        let discover_calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                units,
                failing_unit: None,
                discover_calls: Arc::clone(&discover_calls),
            },
            discover_calls,
        )
    }

    /// Like `new`, but `frames()` fails for the unit at `bad_index`.
    pub fn with_failing_unit(units: usize, bad_index: usize) -> Self {
        Self {
            units,
            failing_unit: Some(bad_index),
            discover_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn unit_path(i: usize) -> PathBuf {
        PathBuf::from(format!("unit_{:03}.jpg", i))
    }
}

impl FrameSource for StaticSource {
    fn discover(&self) -> Result<Vec<SourceUnit>, BenchError> {
        self.discover_calls.fetch_add(1, Ordering::SeqCst);
        Ok((0..self.units)
            .map(|i| SourceUnit::ImageFile(Self::unit_path(i)))
            .collect())
    }

    fn frames(&self, unit: &SourceUnit) -> Result<Vec<Frame>, BenchError> {
        if let Some(bad) = self.failing_unit {
            if *unit == SourceUnit::ImageFile(Self::unit_path(bad)) {
                return Err(BenchError::Preload(format!(
                    "synthetic decode failure for {}",
                    unit.name()
                )));
            }
        }
        Ok(vec![Frame {
            bytes: Bytes::from(unit.name().into_bytes()),
            mime: "image/jpeg",
        }])
    }
}

/// Build a pool over `units` synthetic payloads.
pub fn static_pool(units: usize) -> PayloadPool {
    let (source, _) = StaticSource::new(units);
    PayloadPool::new(Box::new(source), test_spec())
}

pub fn test_spec() -> PayloadSpec {
    PayloadSpec::from_config(&Config::for_test())
}

/// One call observed by [`MockSender`].
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub path: String,
    pub body: Bytes,
    pub label: String,
}

/// How the mock sender answers each request.
#[derive(Debug, Clone, Copy)]
pub enum MockBehavior {
    /// Answer every request with this HTTP status.
    Status(u16),
    /// Fail every request with a transport error.
    TransportError,
}

/// A [`RequestSender`] that records calls and answers per its behavior.
pub struct MockSender {
    behavior: MockBehavior,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockSender {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl RequestSender for MockSender {
    async fn send(
        &self,
        path: &str,
        body: Bytes,
        _headers: HeaderMap,
        _timeout: Duration,
        label: &str,
    ) -> Result<SendOutcome, BenchError> {
        self.calls.lock().unwrap().push(RecordedCall {
            path: path.to_string(),
            body,
            label: label.to_string(),
        });

        match self.behavior {
            MockBehavior::Status(status) => Ok(SendOutcome {
                status,
                body: String::new(),
                elapsed: Duration::from_millis(1),
            }),
            MockBehavior::TransportError => Err(BenchError::Transport(
                "connection refused by mock".to_string(),
            )),
        }
    }
}
