use std::sync::Arc;

use postpick_core::{Config, SanitizedConfig, TaskOrchestrator, TaskStore};

/// Shared application state
pub struct AppState {
    config: Config,
    task_store: Arc<dyn TaskStore>,
    orchestrator: Arc<TaskOrchestrator>,
}

impl AppState {
    pub fn new(
        config: Config,
        task_store: Arc<dyn TaskStore>,
        orchestrator: Arc<TaskOrchestrator>,
    ) -> Self {
        Self {
            config,
            task_store,
            orchestrator,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn task_store(&self) -> &dyn TaskStore {
        self.task_store.as_ref()
    }

    pub fn orchestrator(&self) -> &TaskOrchestrator {
        self.orchestrator.as_ref()
    }
}
