//! Types for the platform scraping system.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::platform::Platform;

/// One scraping job: a platform plus every submitted URL for that platform.
///
/// A batch produces exactly one request per distinct platform; the backend
/// is responsible for working through the URL list itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeRequest {
    /// Platform to scrape.
    pub platform: Platform,
    /// All submitted URLs belonging to that platform, in submission order.
    pub urls: Vec<String>,
}

/// A single raw item returned by a scraper backend.
///
/// The payload is opaque platform JSON; the normalizer gives it shape later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawItem {
    /// The submitted URL this item was scraped for.
    pub url_group: String,
    /// Raw platform item, untouched.
    pub payload: serde_json::Value,
}

/// Raw output of one platform job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawScrapeResult {
    /// Platform the items came from.
    pub platform: Platform,
    /// Items in the order the backend returned them.
    pub items: Vec<RawItem>,
}

/// Errors that can occur while running a scraper job.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("scraper backend connection failed: {0}")]
    ConnectionFailed(String),

    #[error("scraper backend API error: {0}")]
    ApiError(String),

    #[error("scraper request timeout")]
    Timeout,

    #[error("no scraper actor configured for platform: {0}")]
    ActorNotConfigured(Platform),

    #[error("internal scraper error: {0}")]
    Internal(String),
}

/// Trait for platform scraper backends.
///
/// Implementations are opaque to the rest of the system: one call runs one
/// platform job and returns raw items or an error. The invoker layers
/// timeouts and cross-platform fan-out on top.
#[async_trait]
pub trait Scraper: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Run one platform job over the given URL list.
    async fn scrape(&self, request: &ScrapeRequest) -> Result<RawScrapeResult, ScrapeError>;
}
