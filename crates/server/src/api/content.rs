//! Content pipeline API handlers: submission and result polling.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use postpick_core::{
    Platform, ScoredPost, SubmissionReceipt, SubmitError, Task, TaskFilter, TaskState, UrlAnalysis,
};

use crate::metrics::{SUBMISSIONS_REJECTED_TOTAL, TASKS_CREATED_TOTAL};
use crate::state::AppState;

/// Maximum allowed limit for task listing
const MAX_LIMIT: usize = 1000;

/// Default limit for task listing
const DEFAULT_LIMIT: usize = 100;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for submitting a batch of URLs
#[derive(Debug, Deserialize)]
pub struct SubmitContentBody {
    /// 1 to 10 social media URLs
    pub urls: Vec<String>,
}

/// Query parameters for listing tasks
#[derive(Debug, Deserialize)]
pub struct ListTasksParams {
    /// Filter by state type
    pub state: Option<String>,
    /// Maximum number of tasks to return
    pub limit: Option<usize>,
    /// Pagination offset
    pub offset: Option<usize>,
}

/// Response for polling a task
#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub task_id: String,
    pub status: String,
    pub message: String,
    pub started_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    pub urls_processed: Vec<UrlAnalysis>,
    pub platforms_needed: Vec<Platform>,
    /// Present only when the task completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_data: Option<Vec<ScoredPost>>,
    /// Present only when the task errored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Platforms whose scraper jobs failed, when that caused the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_platforms: Option<Vec<Platform>>,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        let status = task.state.state_type().to_string();
        let message = task.state.status_message();

        let (completed_at, result_data, error, failed_platforms) = match task.state {
            TaskState::Completed {
                completed_at,
                posts,
            } => (Some(completed_at.to_rfc3339()), Some(posts), None, None),
            TaskState::Error {
                failed_at,
                message,
                failed_platforms,
            } => (
                Some(failed_at.to_rfc3339()),
                None,
                Some(message),
                if failed_platforms.is_empty() {
                    None
                } else {
                    Some(failed_platforms)
                },
            ),
            _ => (None, None, None, None),
        };

        Self {
            task_id: task.id,
            status,
            message,
            started_at: task.created_at.to_rfc3339(),
            completed_at,
            urls_processed: task.analyses,
            platforms_needed: task.platforms,
            result_data,
            error,
            failed_platforms,
        }
    }
}

/// One row in the task listing
#[derive(Debug, Serialize)]
pub struct TaskSummary {
    pub task_id: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
    pub url_count: usize,
    pub platforms: Vec<Platform>,
}

impl From<Task> for TaskSummary {
    fn from(task: Task) -> Self {
        Self {
            task_id: task.id,
            status: task.state.state_type().to_string(),
            created_at: task.created_at.to_rfc3339(),
            updated_at: task.updated_at.to_rfc3339(),
            url_count: task.urls.len(),
            platforms: task.platforms,
        }
    }
}

/// Response for listing tasks
#[derive(Debug, Serialize)]
pub struct ListTasksResponse {
    pub tasks: Vec<TaskSummary>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ContentErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// Submit a batch of URLs for processing.
///
/// Returns 202 with the submission receipt; processing continues in the
/// background and is observed by polling.
pub async fn submit_content(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SubmitContentBody>,
) -> Result<(StatusCode, Json<SubmissionReceipt>), impl IntoResponse> {
    match state.orchestrator().submit(body.urls) {
        Ok(receipt) => {
            TASKS_CREATED_TOTAL.inc();
            Ok((StatusCode::ACCEPTED, Json(receipt)))
        }
        Err(SubmitError::Validation(message)) => {
            SUBMISSIONS_REJECTED_TOTAL.inc();
            Err((
                StatusCode::BAD_REQUEST,
                Json(ContentErrorResponse { error: message }),
            ))
        }
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ContentErrorResponse {
                error: e.to_string(),
            }),
        )),
    }
}

/// Poll a task by id.
pub async fn get_results(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TaskResponse>, impl IntoResponse> {
    match state.task_store().get(&id) {
        Ok(Some(task)) => Ok(Json(TaskResponse::from(task))),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ContentErrorResponse {
                error: format!("Task not found: {}", id),
            }),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ContentErrorResponse {
                error: e.to_string(),
            }),
        )),
    }
}

/// List tasks with optional filters.
pub async fn list_tasks(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListTasksParams>,
) -> Result<Json<ListTasksResponse>, impl IntoResponse> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = params.offset.unwrap_or(0);

    let mut filter = TaskFilter::new().with_limit(limit).with_offset(offset);
    if let Some(ref state_filter) = params.state {
        filter = filter.with_state(state_filter);
    }

    let tasks = match state.task_store().list(&filter) {
        Ok(tasks) => tasks,
        Err(e) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ContentErrorResponse {
                    error: e.to_string(),
                }),
            ));
        }
    };

    let count_filter = TaskFilter {
        limit: usize::MAX,
        offset: 0,
        ..filter
    };
    let total = match state.task_store().count(&count_filter) {
        Ok(count) => count,
        Err(e) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ContentErrorResponse {
                    error: e.to_string(),
                }),
            ));
        }
    };

    Ok(Json(ListTasksResponse {
        tasks: tasks.into_iter().map(TaskSummary::from).collect(),
        total,
        limit,
        offset,
    }))
}
