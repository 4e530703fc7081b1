//! API surface tests: validation, polling errors, health and metrics.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::TestFixture;
use postpick_core::TaskFilter;
use postpick_core::TaskStore;

#[tokio::test]
async fn test_empty_batch_is_rejected_without_a_task() {
    let fixture = TestFixture::new();

    let response = fixture.post("/api/v1/content", json!({ "urls": [] })).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["error"]
        .as_str()
        .unwrap()
        .contains("at least 1 URL"));

    assert_eq!(fixture.store.count(&TaskFilter::new()).unwrap(), 0);
}

#[tokio::test]
async fn test_oversized_batch_is_rejected_without_a_task() {
    let fixture = TestFixture::new();
    let urls: Vec<String> = (0..11).map(|i| format!("https://x.com/user{}", i)).collect();

    let response = fixture.post("/api/v1/content", json!({ "urls": urls })).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["error"]
        .as_str()
        .unwrap()
        .contains("maximum 10 URLs"));

    assert_eq!(fixture.store.count(&TaskFilter::new()).unwrap(), 0);
}

#[tokio::test]
async fn test_unknown_task_id_is_not_found() {
    let fixture = TestFixture::new();

    let response = fixture.get("/api/v1/content/task_20250101_000000_deadbeef").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.body["error"]
        .as_str()
        .unwrap()
        .contains("Task not found"));
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    let fixture = TestFixture::new();

    let response = fixture.post("/api/v1/content", json!({ "wrong": true })).await;
    // Missing `urls` field fails axum's JSON extraction.
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_health_is_independent_of_task_state() {
    let fixture = TestFixture::new();

    let response = fixture.get("/api/v1/health").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "healthy");
}

#[tokio::test]
async fn test_config_endpoint_returns_sanitized_config() {
    let fixture = TestFixture::new();

    let response = fixture.get("/api/v1/config").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["orchestrator"]["target_posts"], 9);
}

#[tokio::test]
async fn test_metrics_endpoint_exposes_task_counters() {
    let fixture = TestFixture::new();

    let (status, body) = fixture.get_text("/api/v1/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("postpick_tasks_by_state"));
}
