//! JSON-file-backed task registry.
//!
//! Same in-memory map as `InMemoryTaskStore`, plus one JSON file per task
//! written through on every mutation. Survives restarts; a missing or
//! unreadable file simply reads as "task not found".

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::Utc;
use tracing::{debug, warn};

use super::memory_store::filter_tasks;
use super::store::{CreateTaskRequest, TaskError, TaskFilter, TaskStore};
use super::types::{new_task_id, Task, TaskState};

/// Task registry persisted as `<dir>/<task_id>.json` files.
#[derive(Debug)]
pub struct JsonFileTaskStore {
    dir: PathBuf,
    tasks: RwLock<HashMap<String, Task>>,
}

impl JsonFileTaskStore {
    /// Open a store on the given directory, loading any existing records.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, TaskError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| TaskError::Storage(e.to_string()))?;

        let mut tasks = HashMap::new();
        let entries = fs::read_dir(&dir).map_err(|e| TaskError::Storage(e.to_string()))?;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match Self::read_task_file(&path) {
                Ok(task) => {
                    tasks.insert(task.id.clone(), task);
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping unreadable task file");
                }
            }
        }
        debug!(dir = %dir.display(), loaded = tasks.len(), "Task store loaded from disk");

        Ok(Self {
            dir,
            tasks: RwLock::new(tasks),
        })
    }

    fn task_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    fn read_task_file(path: &Path) -> Result<Task, TaskError> {
        let data = fs::read_to_string(path).map_err(|e| TaskError::Storage(e.to_string()))?;
        serde_json::from_str(&data).map_err(|e| TaskError::Storage(e.to_string()))
    }

    fn write_task_file(&self, task: &Task) -> Result<(), TaskError> {
        let data = serde_json::to_string_pretty(task)
            .map_err(|e| TaskError::Storage(e.to_string()))?;
        fs::write(self.task_path(&task.id), data).map_err(|e| TaskError::Storage(e.to_string()))
    }
}

impl TaskStore for JsonFileTaskStore {
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

        self.write_task_file(&task)?;
        let mut tasks = self
            .tasks
            .write()
            .map_err(|e| TaskError::Storage(e.to_string()))?;
        tasks.insert(task.id.clone(), task.clone());
        Ok(task)
    }

    fn get(&self, id: &str) -> Result<Option<Task>, TaskError> {
        {
            let tasks = self
                .tasks
                .read()
                .map_err(|e| TaskError::Storage(e.to_string()))?;
            if let Some(task) = tasks.get(id) {
                return Ok(Some(task.clone()));
            }
        }

        // Fall back to disk: another process may have written the record.
        let path = self.task_path(id);
        if !path.exists() {
            return Ok(None);
        }
        let task = Self::read_task_file(&path)?;
        let mut tasks = self
            .tasks
            .write()
            .map_err(|e| TaskError::Storage(e.to_string()))?;
        tasks.insert(task.id.clone(), task.clone());
        Ok(Some(task))
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
        let task = task.clone();
        drop(tasks);

        self.write_task_file(&task)?;
        Ok(task)
    }
}
