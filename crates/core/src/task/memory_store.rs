//! In-memory task registry.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;

use super::store::{CreateTaskRequest, TaskError, TaskFilter, TaskStore};
use super::types::{new_task_id, Task, TaskState};

/// Process-wide task registry backed by a guarded map.
///
/// Records are never deleted; expiry is an external concern.
#[derive(Debug, Default)]
pub struct InMemoryTaskStore {
    tasks: RwLock<HashMap<String, Task>>,
}

impl InMemoryTaskStore {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Apply a filter to a snapshot of tasks, newest first.
pub(super) fn filter_tasks(mut tasks: Vec<Task>, filter: &TaskFilter) -> Vec<Task> {
    if let Some(state) = &filter.state {
        tasks.retain(|t| t.state.state_type() == state);
    }
    tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
    tasks.into_iter().skip(filter.offset).take(filter.limit).collect()
}

impl TaskStore for InMemoryTaskStore {
    fn create(&self, request: CreateTaskRequest) -> Result<Task, TaskError> {
        let now = Utc::now();
        let task = Task {
            id: new_task_id(),
            created_at: now,
            updated_at: now,
            urls: request.urls,
            analyses: request.analyses,
            platforms: request.platforms,
            state: TaskState::Started,
        };

        let mut tasks = self
            .tasks
            .write()
            .map_err(|e| TaskError::Storage(e.to_string()))?;
        tasks.insert(task.id.clone(), task.clone());
        Ok(task)
    }

    fn get(&self, id: &str) -> Result<Option<Task>, TaskError> {
        let tasks = self
            .tasks
            .read()
            .map_err(|e| TaskError::Storage(e.to_string()))?;
        Ok(tasks.get(id).cloned())
    }

    fn list(&self, filter: &TaskFilter) -> Result<Vec<Task>, TaskError> {
        let tasks = self
            .tasks
            .read()
            .map_err(|e| TaskError::Storage(e.to_string()))?;
        Ok(filter_tasks(tasks.values().cloned().collect(), filter))
    }

    fn count(&self, filter: &TaskFilter) -> Result<usize, TaskError> {
        let tasks = self
            .tasks
            .read()
            .map_err(|e| TaskError::Storage(e.to_string()))?;
        Ok(match &filter.state {
            Some(state) => tasks
                .values()
                .filter(|t| t.state.state_type() == state)
                .count(),
            None => tasks.len(),
        })
    }

    fn update_state(&self, id: &str, new_state: TaskState) -> Result<Task, TaskError> {
        let mut tasks = self
            .tasks
            .write()
            .map_err(|e| TaskError::Storage(e.to_string()))?;
        let task = tasks
            .get_mut(id)
            .ok_or_else(|| TaskError::NotFound(id.to_string()))?;

        if task.state.is_terminal() {
            return Err(TaskError::TerminalState {
                task_id: id.to_string(),
                state: task.state.state_type().to_string(),
            });
        }

        task.state = new_state;
        task.updated_at = Utc::now();
        Ok(task.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Platform;
    use crate::task::types::ProcessingStage;

    fn request() -> CreateTaskRequest {
        CreateTaskRequest {
            urls: vec!["https://x.com/rustlang".to_string()],
            analyses: vec![],
            platforms: vec![Platform::Twitter],
        }
    }

    #[test]
    fn test_create_and_get() {
        let store = InMemoryTaskStore::new();
        let task = store.create(request()).unwrap();
        assert_eq!(task.state, TaskState::Started);

        let fetched = store.get(&task.id).unwrap().unwrap();
        assert_eq!(fetched.id, task.id);
        assert_eq!(fetched.platforms, vec![Platform::Twitter]);
    }

    #[test]
    fn test_get_unknown_id_is_none() {
        let store = InMemoryTaskStore::new();
        assert!(store.get("task_nope").unwrap().is_none());
    }

    #[test]
    fn test_update_state_walks_the_machine() {
        let store = InMemoryTaskStore::new();
        let task = store.create(request()).unwrap();

        let task = store
            .update_state(
                &task.id,
                TaskState::Processing {
                    stage: ProcessingStage::Scraping,
                },
            )
            .unwrap();
        assert_eq!(task.state.state_type(), "processing");

        let task = store
            .update_state(
                &task.id,
                TaskState::Completed {
                    completed_at: Utc::now(),
                    posts: vec![],
                },
            )
            .unwrap();
        assert!(task.state.is_terminal());
    }

    #[test]
    fn test_terminal_task_is_immutable() {
        let store = InMemoryTaskStore::new();
        let task = store.create(request()).unwrap();
        store
            .update_state(
                &task.id,
                TaskState::Error {
                    failed_at: Utc::now(),
                    message: "all scrapers failed".to_string(),
                    failed_platforms: vec![Platform::Twitter],
                },
            )
            .unwrap();

        let err = store
            .update_state(
                &task.id,
                TaskState::Completed {
                    completed_at: Utc::now(),
                    posts: vec![],
                },
            )
            .unwrap_err();
        assert!(matches!(err, TaskError::TerminalState { .. }));

        // The record still holds the error state.
        let task = store.get(&task.id).unwrap().unwrap();
        assert_eq!(task.state.state_type(), "error");
    }

    #[test]
    fn test_update_unknown_id() {
        let store = InMemoryTaskStore::new();
        let err = store
            .update_state("task_nope", TaskState::Started)
            .unwrap_err();
        assert!(matches!(err, TaskError::NotFound(_)));
    }

    #[test]
    fn test_list_filters_by_state() {
        let store = InMemoryTaskStore::new();
        let a = store.create(request()).unwrap();
        let _b = store.create(request()).unwrap();
        store
            .update_state(
                &a.id,
                TaskState::Completed {
                    completed_at: Utc::now(),
                    posts: vec![],
                },
            )
            .unwrap();

        let completed = store
            .list(&TaskFilter::new().with_state("completed"))
            .unwrap();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].id, a.id);

        assert_eq!(store.count(&TaskFilter::new()).unwrap(), 2);
        assert_eq!(
            store.count(&TaskFilter::new().with_state("started")).unwrap(),
            1
        );
    }

    #[test]
    fn test_list_pagination() {
        let store = InMemoryTaskStore::new();
        for _ in 0..5 {
            store.create(request()).unwrap();
        }
        let page = store
            .list(&TaskFilter::new().with_limit(2).with_offset(2))
            .unwrap();
        assert_eq!(page.len(), 2);
    }
}
