//! Common test utilities for E2E testing with mocks.
//!
//! Provides a test fixture that builds the full router in-process with a
//! mock scraper backend, enabling end-to-end submit/poll testing without
//! external infrastructure.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use postpick_core::testing::MockScraper;
use postpick_core::{
    Config, InMemoryTaskStore, OrchestratorConfig, TaskOrchestrator, TaskStore,
};
use postpick_server::state::AppState;

/// Re-export fixtures for test convenience
pub use postpick_core::testing::fixtures;

/// Test fixture for E2E testing with a mock scraper.
///
/// # Example
///
/// ```rust,ignore
/// let fixture = TestFixture::new();
///
/// let response = fixture
///     .post("/api/v1/content", json!({ "urls": ["https://x.com/rustlang"] }))
///     .await;
/// assert_eq!(response.status, StatusCode::ACCEPTED);
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock scraper - configure raw items and failures
    pub scraper: Arc<MockScraper>,
    /// The task registry behind the router
    pub store: Arc<InMemoryTaskStore>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with short pipeline timeouts.
    pub fn new() -> Self {
        let scraper = Arc::new(MockScraper::new());
        let store = Arc::new(InMemoryTaskStore::new());

        let orchestrator_config = OrchestratorConfig {
            scrape_timeout_secs: 2,
            normalize_timeout_secs: 2,
            selection_timeout_secs: 2,
            ..Default::default()
        };

        let config = Config {
            server: Default::default(),
            scrapers: None,
            orchestrator: orchestrator_config.clone(),
            storage: Default::default(),
        };

        let orchestrator = Arc::new(TaskOrchestrator::new(
            orchestrator_config,
            Arc::clone(&store) as Arc<dyn TaskStore>,
            Arc::clone(&scraper) as Arc<dyn postpick_core::Scraper>,
        ));

        let state = Arc::new(AppState::new(
            config,
            Arc::clone(&store) as Arc<dyn TaskStore>,
            orchestrator,
        ));

        let router = postpick_server::api::create_router(state);

        Self {
            router,
            scraper,
            store,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Poll a task until it reaches a terminal state.
    pub async fn wait_for_terminal(&self, task_id: &str) -> TestResponse {
        for _ in 0..500 {
            let response = self.get(&format!("/api/v1/content/{}", task_id)).await;
            assert_eq!(response.status, StatusCode::OK, "poll failed: {:?}", response.body);
            let status = response.body["status"].as_str().unwrap_or_default();
            if status == "completed" || status == "error" {
                return response;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("task {} never reached a terminal state", task_id);
    }

    /// Send a GET request and return the raw body as text.
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");
        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();
        (status, String::from_utf8_lossy(&body_bytes).to_string())
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let request = match body {
            Some(json) => {
                request_builder = request_builder.header("Content-Type", "application/json");
                request_builder
                    .body(Body::from(serde_json::to_vec(&json).unwrap()))
                    .unwrap()
            }
            None => request_builder.body(Body::empty()).unwrap(),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}
