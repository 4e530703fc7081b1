//! Task registry: state machine and storage for submitted batches.

mod json_store;
mod memory_store;
mod store;
mod types;

pub use json_store::JsonFileTaskStore;
pub use memory_store::InMemoryTaskStore;
pub use store::{CreateTaskRequest, TaskError, TaskFilter, TaskStore};
pub use types::{new_task_id, ProcessingStage, Task, TaskState, UrlAnalysis};
