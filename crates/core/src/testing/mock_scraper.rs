//! Mock scraper for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::platform::Platform;
use crate::scraper::{RawItem, RawScrapeResult, ScrapeError, ScrapeRequest, Scraper};

/// Mock implementation of the Scraper trait.
///
/// Provides controllable behavior for testing:
/// - Canned raw items per (platform, url) pair
/// - Injected per-platform failures
/// - Optional artificial delay (for timeout tests)
/// - Records every request for assertions
///
/// # Example
///
/// ```rust,ignore
/// use postpick_core::testing::MockScraper;
///
/// let scraper = MockScraper::new();
/// scraper.set_items(Platform::Tiktok, "https://www.tiktok.com/@a", vec![
///     serde_json::json!({ "text": "hi", "playCount": 100 }),
/// ]);
/// scraper.fail_platform(Platform::Twitter, "rate limited");
/// ```
#[derive(Debug, Default)]
pub struct MockScraper {
    /// Canned items keyed by platform and url_group.
    items: Mutex<HashMap<Platform, HashMap<String, Vec<serde_json::Value>>>>,
    /// Platforms whose jobs fail, with the error message to use.
    failures: Mutex<HashMap<Platform, String>>,
    /// Artificial delay applied to every job.
    delay: Mutex<Option<Duration>>,
    /// Every request seen, in call order.
    requests: Mutex<Vec<ScrapeRequest>>,
}

impl MockScraper {
    /// Create a mock scraper with no canned data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the raw items returned for one (platform, url) pair.
    pub fn set_items(&self, platform: Platform, url: &str, items: Vec<serde_json::Value>) {
        self.items
            .lock()
            .unwrap()
            .entry(platform)
            .or_default()
            .insert(url.to_string(), items);
    }

    /// Make every job for a platform fail with the given message.
    pub fn fail_platform(&self, platform: Platform, error: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(platform, error.to_string());
    }

    /// Delay every job by the given duration.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    /// Requests recorded so far.
    pub fn recorded_requests(&self) -> Vec<ScrapeRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Scraper for MockScraper {
    fn name(&self) -> &str {
        "mock"
    }

    async fn scrape(&self, request: &ScrapeRequest) -> Result<RawScrapeResult, ScrapeError> {
        self.requests.lock().unwrap().push(request.clone());

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(error) = self.failures.lock().unwrap().get(&request.platform) {
            return Err(ScrapeError::ApiError(error.clone()));
        }

        let items = self.items.lock().unwrap();
        let by_url = items.get(&request.platform);
        let mut result_items = Vec::new();
        for url in &request.urls {
            if let Some(payloads) = by_url.and_then(|m| m.get(url)) {
                result_items.extend(payloads.iter().map(|payload| RawItem {
                    url_group: url.clone(),
                    payload: payload.clone(),
                }));
            }
        }

        Ok(RawScrapeResult {
            platform: request.platform,
            items: result_items,
        })
    }
}
