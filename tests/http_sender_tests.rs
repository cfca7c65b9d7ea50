//! # HTTP Sender Integration Tests
//!
//! The reqwest-backed sender against a wiremock server: wire format,
//! status propagation, timeout behavior, and a small end-to-end run.

mod common;

use common::static_pool;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use vlm_loadgen::{json_headers, Config, HttpSender, RequestSender, Runner, RunState};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completion_response() -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "model": "Qwen2.5-VL",
        "choices": [{"index": 0, "finish_reason": "length"}],
        "usage": {"prompt_tokens": 512, "completion_tokens": 64, "total_tokens": 576}
    })
}

#[tokio::test]
async fn sender_posts_json_and_returns_outcome() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_response()))
        .expect(1)
        .mount(&server)
        .await;

    let sender = HttpSender::new(&server.uri()).unwrap();
    let outcome = sender
        .send(
            "/v1/chat/completions",
            bytes::Bytes::from_static(b"{\"model\":\"Qwen2.5-VL\",\"messages\":[]}"),
            json_headers(),
            Duration::from_secs(10),
            "vlm_completion",
        )
        .await
        .unwrap();

    assert!(outcome.is_success());
    assert_eq!(outcome.status, 200);
    assert!(outcome.body.contains("chatcmpl-1"));
    assert!(outcome.elapsed > Duration::ZERO);
}

#[tokio::test]
async fn non_2xx_status_is_an_outcome_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(400).set_body_string("image tokens exceed server limit"),
        )
        .mount(&server)
        .await;

    let sender = HttpSender::new(&server.uri()).unwrap();
    let outcome = sender
        .send(
            "/v1/chat/completions",
            bytes::Bytes::from_static(b"{}"),
            json_headers(),
            Duration::from_secs(10),
            "vlm_completion",
        )
        .await
        .unwrap();

    assert!(!outcome.is_success());
    assert_eq!(outcome.status, 400);
    assert!(outcome.body.contains("exceed"));
}

#[tokio::test]
async fn slow_server_times_out_as_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let sender = HttpSender::new(&server.uri()).unwrap();
    let result = sender
        .send(
            "/v1/chat/completions",
            bytes::Bytes::from_static(b"{}"),
            json_headers(),
            Duration::from_millis(100),
            "vlm_completion",
        )
        .await;

    assert!(matches!(result, Err(vlm_loadgen::BenchError::Transport(_))));
}

#[tokio::test]
async fn full_run_sends_exactly_the_budget_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_response()))
        .expect(8)
        .mount(&server)
        .await;

    let config = Config {
        target_url: server.uri(),
        max_requests: 8,
        workers: 4,
        ..Config::for_test()
    };
    let sender = Arc::new(HttpSender::from_config(&config).unwrap());
    let state = Arc::new(RunState::new(&config, static_pool(3), sender));

    let summary = Runner::new(Arc::clone(&state)).run(config.workers).await;

    assert_eq!(summary.total_requests, 8);
    assert_eq!(state.lifecycle.active_count(), 0);
    assert!(state.budget.is_stopped());
    // The .expect(8) on the mock verifies the exact request count on drop.
}
