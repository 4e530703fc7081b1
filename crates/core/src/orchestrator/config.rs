//! Orchestrator configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the task orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Per-platform scraper job timeout (seconds).
    /// Each platform's job is bounded individually.
    #[serde(default = "default_scrape_timeout")]
    pub scrape_timeout_secs: u64,

    /// Overall normalization stage timeout (seconds).
    #[serde(default = "default_normalize_timeout")]
    pub normalize_timeout_secs: u64,

    /// Overall selection stage timeout (seconds).
    #[serde(default = "default_selection_timeout")]
    pub selection_timeout_secs: u64,

    /// Total number of posts to select per batch.
    #[serde(default = "default_target_posts")]
    pub target_posts: usize,

    /// Maximum number of URLs accepted in one submission.
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,
}

fn default_scrape_timeout() -> u64 {
    300 // 5 minutes per scraper
}

fn default_normalize_timeout() -> u64 {
    120
}

fn default_selection_timeout() -> u64 {
    60
}

fn default_target_posts() -> usize {
    9
}

fn default_max_batch_size() -> usize {
    10
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            scrape_timeout_secs: default_scrape_timeout(),
            normalize_timeout_secs: default_normalize_timeout(),
            selection_timeout_secs: default_selection_timeout(),
            target_posts: default_target_posts(),
            max_batch_size: default_max_batch_size(),
        }
    }
}
