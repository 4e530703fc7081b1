//! Task storage trait.
//!
//! The registry is the only state shared between the HTTP surface and the
//! per-task workers; every read and write goes through this interface.

use thiserror::Error;

use crate::platform::Platform;

use super::types::{Task, TaskState, UrlAnalysis};

/// Error type for task registry operations.
#[derive(Debug, Error)]
pub enum TaskError {
    /// No task with that id (possibly expired externally).
    #[error("task not found: {0}")]
    NotFound(String),

    /// The task already reached a terminal state; its record is immutable.
    #[error("cannot update task {task_id}: state {state} is terminal")]
    TerminalState { task_id: String, state: String },

    /// Backing storage failure.
    #[error("task storage error: {0}")]
    Storage(String),
}

/// Request to create a new task record.
#[derive(Debug, Clone)]
pub struct CreateTaskRequest {
    /// URLs as submitted, in order.
    pub urls: Vec<String>,
    /// Per-URL classification results.
    pub analyses: Vec<UrlAnalysis>,
    /// Distinct platforms detected in the batch.
    pub platforms: Vec<Platform>,
}

/// Filter for listing tasks.
#[derive(Debug, Clone)]
pub struct TaskFilter {
    /// Filter by state type ("started", "processing", "completed", "error").
    pub state: Option<String>,
    /// Maximum number of results.
    pub limit: usize,
    /// Offset for pagination.
    pub offset: usize,
}

impl Default for TaskFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskFilter {
    /// Create a new filter with defaults.
    pub fn new() -> Self {
        Self {
            state: None,
            limit: 100,
            offset: 0,
        }
    }

    /// Filter by state type.
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Set limit.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Set offset.
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
}

/// Trait for task registry backends.
///
/// Implementations must be safe under concurrent polling reads and a
/// single writer per task (the task's own worker). State transitions are
/// monotonic: `update_state` on a terminal task must fail.
pub trait TaskStore: Send + Sync {
    /// Create a new task in the Started state.
    fn create(&self, request: CreateTaskRequest) -> Result<Task, TaskError>;

    /// Get a task by id.
    fn get(&self, id: &str) -> Result<Option<Task>, TaskError>;

    /// List tasks matching the filter, newest first.
    fn list(&self, filter: &TaskFilter) -> Result<Vec<Task>, TaskError>;

    /// Count tasks matching the filter.
    fn count(&self, filter: &TaskFilter) -> Result<usize, TaskError>;

    /// Update a task's state, enforcing terminal-state immutability.
    fn update_state(&self, id: &str, new_state: TaskState) -> Result<Task, TaskError>;
}
