//! Types for the task orchestrator.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::platform::Platform;
use crate::task::{ProcessingStage, TaskError, UrlAnalysis};

/// Errors surfaced synchronously at submission time. No task exists when
/// one of these is returned.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The submission itself is invalid (URL count out of bounds, nothing
    /// scrapeable in the batch).
    #[error("invalid submission: {0}")]
    Validation(String),

    /// Task registry failure.
    #[error("task store error: {0}")]
    TaskStore(#[from] TaskError),
}

/// Errors that end a running pipeline; recorded on the task as Error state.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Every platform scraper job failed or timed out.
    #[error("all scrapers failed")]
    AllScrapersFailed { failed: Vec<Platform> },

    /// No submitted URL mapped to a supported platform, so there was
    /// nothing to scrape.
    #[error("no supported platforms in batch")]
    NoSupportedPlatforms,

    /// A whole stage exceeded its deadline.
    #[error("{stage} stage timed out after {timeout_secs}s")]
    StageTimeout {
        stage: ProcessingStage,
        timeout_secs: u64,
    },

    /// Task registry failure mid-pipeline.
    #[error("task store error: {0}")]
    TaskStore(#[from] TaskError),

    /// Anything else (worker join failures and the like).
    #[error("internal pipeline error: {0}")]
    Internal(String),
}

impl PipelineError {
    /// Platforms to report as failed alongside the error message.
    pub fn failed_platforms(&self) -> Vec<Platform> {
        match self {
            PipelineError::AllScrapersFailed { failed } => failed.clone(),
            _ => Vec::new(),
        }
    }
}

/// Response returned immediately on submission, before any scraping runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    /// Id to poll with.
    pub task_id: String,
    /// Initial task status, always "started".
    pub status: String,
    /// Human-readable summary.
    pub message: String,
    /// Per-URL classification, including unsupported URLs.
    pub urls_detected: Vec<UrlAnalysis>,
    /// Distinct platforms whose scrapers will run.
    pub platforms_needed: Vec<Platform>,
}
