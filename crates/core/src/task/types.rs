//! Task record types and the task state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::platform::Platform;
use crate::selection::ScoredPost;

/// Classification result for one submitted URL.
///
/// Unsupported URLs are kept here with `platform: None`; they are
/// reported back to the client but never abort the batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UrlAnalysis {
    /// 1-based position in the submitted batch.
    pub index: usize,
    /// The URL as submitted.
    pub url: String,
    /// Detected platform, None when no platform matched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
    /// Account handle extracted from the URL, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
}

/// Pipeline stage a processing task is currently in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStage {
    /// Platform scraper jobs are running.
    Scraping,
    /// Raw items are being mapped to the common schema.
    Normalizing,
    /// Scoring and distribution are running.
    Selecting,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::Scraping => write!(f, "scraping"),
            ProcessingStage::Normalizing => write!(f, "normalizing"),
            ProcessingStage::Selecting => write!(f, "selecting"),
        }
    }
}

/// Current state of a task.
///
/// State machine flow:
/// ```text
/// Started -> Processing -> Completed
///                 |
///                 v
///               Error
/// ```
/// Completed and Error are terminal; a terminal record never changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskState {
    /// Task created, the worker has not begun yet.
    Started,

    /// The worker is driving the pipeline.
    Processing {
        /// Current pipeline stage.
        stage: ProcessingStage,
    },

    /// Pipeline finished; zero selected posts is still a completion.
    Completed {
        completed_at: DateTime<Utc>,
        /// Final selected posts, ordered and numbered.
        posts: Vec<ScoredPost>,
    },

    /// Pipeline failed with no usable data (terminal).
    Error {
        failed_at: DateTime<Utc>,
        /// Which stage failed and why.
        message: String,
        /// Platforms whose scraper jobs failed, when that caused the error.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        failed_platforms: Vec<Platform>,
    },
}

impl TaskState {
    /// Returns true if no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskState::Completed { .. } | TaskState::Error { .. })
    }

    /// Lowercase state tag, matching the serialized form.
    pub fn state_type(&self) -> &'static str {
        match self {
            TaskState::Started => "started",
            TaskState::Processing { .. } => "processing",
            TaskState::Completed { .. } => "completed",
            TaskState::Error { .. } => "error",
        }
    }

    /// Human-readable status line for polling clients.
    pub fn status_message(&self) -> String {
        match self {
            TaskState::Started => "Task created, processing will start shortly.".to_string(),
            TaskState::Processing { stage } => {
                format!("Processing URLs through the pipeline ({})...", stage)
            }
            TaskState::Completed { posts, .. } => format!(
                "Content processing completed successfully with {} selected posts.",
                posts.len()
            ),
            TaskState::Error { message, .. } => {
                format!("An error occurred during processing: {}", message)
            }
        }
    }
}

/// One submitted batch's end-to-end processing record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    /// Opaque unique id.
    pub id: String,
    /// When the batch was submitted.
    pub created_at: DateTime<Utc>,
    /// When the record last changed.
    pub updated_at: DateTime<Utc>,
    /// URLs as submitted, in order.
    pub urls: Vec<String>,
    /// Per-URL classification results.
    pub analyses: Vec<UrlAnalysis>,
    /// Distinct platforms detected in the batch.
    pub platforms: Vec<Platform>,
    /// Current state.
    pub state: TaskState,
}

/// Generate a new task id: time-based prefix plus a random suffix.
pub fn new_task_id() -> String {
    let uuid = Uuid::new_v4().simple().to_string();
    format!(
        "task_{}_{}",
        Utc::now().format("%Y%m%d_%H%M%S"),
        &uuid[..8]
    )
}
