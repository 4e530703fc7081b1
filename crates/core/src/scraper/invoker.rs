//! Concurrent fan-out of platform scraper jobs.
//!
//! One job per distinct platform in the batch, each bounded by its own
//! timeout. A failing or timed-out job is captured as a per-platform
//! failure marker and never aborts its siblings.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, warn};

use crate::platform::Platform;

use super::types::{RawScrapeResult, ScrapeRequest, Scraper};

/// Outcome of a single platform job: raw items, or a failure marker.
#[derive(Debug)]
pub enum PlatformOutcome {
    /// The job completed and returned raw items (possibly zero).
    Success(RawScrapeResult),
    /// The job failed or timed out; the error is kept for reporting.
    Failed { error: String },
}

impl PlatformOutcome {
    /// Returns the raw result if the job succeeded.
    pub fn as_success(&self) -> Option<&RawScrapeResult> {
        match self {
            PlatformOutcome::Success(result) => Some(result),
            PlatformOutcome::Failed { .. } => None,
        }
    }
}

/// Collected outcomes of every platform job in a batch.
#[derive(Debug, Default)]
pub struct BatchScrapeOutcome {
    /// Per-platform outcome, one entry per requested platform.
    pub results: HashMap<Platform, PlatformOutcome>,
}

impl BatchScrapeOutcome {
    /// Successful platform results, in `Platform::ALL` order.
    pub fn successes(&self) -> Vec<&RawScrapeResult> {
        Platform::ALL
            .iter()
            .filter_map(|p| self.results.get(p))
            .filter_map(|o| o.as_success())
            .collect()
    }

    /// Consume the outcome, keeping successful results in `Platform::ALL`
    /// order.
    pub fn into_successes(mut self) -> Vec<RawScrapeResult> {
        Platform::ALL
            .iter()
            .filter_map(|p| self.results.remove(p))
            .filter_map(|o| match o {
                PlatformOutcome::Success(result) => Some(result),
                PlatformOutcome::Failed { .. } => None,
            })
            .collect()
    }

    /// Platforms whose jobs failed, in `Platform::ALL` order.
    pub fn failed_platforms(&self) -> Vec<Platform> {
        Platform::ALL
            .iter()
            .filter(|p| matches!(self.results.get(p), Some(PlatformOutcome::Failed { .. })))
            .copied()
            .collect()
    }

    /// True when at least one job was requested and every job failed.
    pub fn all_failed(&self) -> bool {
        !self.results.is_empty()
            && self
                .results
                .values()
                .all(|o| matches!(o, PlatformOutcome::Failed { .. }))
    }
}

/// Run every platform job concurrently, each under `timeout`.
///
/// Jobs run on their own tokio tasks; a timed-out job is abandoned and its
/// eventual result discarded. The returned outcome has exactly one entry
/// per requested platform.
pub async fn invoke_scrapers(
    scraper: Arc<dyn Scraper>,
    jobs: Vec<ScrapeRequest>,
    timeout: Duration,
) -> BatchScrapeOutcome {
    let handles: Vec<_> = jobs
        .into_iter()
        .map(|request| {
            let scraper = Arc::clone(&scraper);
            tokio::spawn(async move {
                let platform = request.platform;
                debug!(platform = %platform, urls = request.urls.len(), "Starting scraper job");

                let outcome = match tokio::time::timeout(timeout, scraper.scrape(&request)).await {
                    Ok(Ok(result)) => {
                        debug!(platform = %platform, items = result.items.len(), "Scraper job complete");
                        PlatformOutcome::Success(result)
                    }
                    Ok(Err(e)) => {
                        warn!(platform = %platform, error = %e, "Scraper job failed");
                        PlatformOutcome::Failed { error: e.to_string() }
                    }
                    Err(_) => {
                        warn!(
                            platform = %platform,
                            timeout_secs = timeout.as_secs(),
                            "Scraper job timed out"
                        );
                        PlatformOutcome::Failed {
                            error: format!("timed out after {}s", timeout.as_secs()),
                        }
                    }
                };

                (platform, outcome)
            })
        })
        .collect();

    let mut outcome = BatchScrapeOutcome::default();
    for joined in join_all(handles).await {
        match joined {
            Ok((platform, result)) => {
                outcome.results.insert(platform, result);
            }
            Err(e) => {
                // A panicking job is treated like any other failed job; the
                // platform is unknown at this point only if the task died
                // before reporting, which join errors make visible here.
                warn!(error = %e, "Scraper job task failed to join");
            }
        }
    }
    outcome
}
