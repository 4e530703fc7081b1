//! Task orchestrator implementation.
//!
//! Owns the end-to-end sequence for one submitted batch:
//! classify -> scrape -> normalize -> select. Submission returns a receipt
//! immediately; one spawned worker per task drives the pipeline and writes
//! every stage change into the task registry. Tasks never interact with
//! each other beyond sharing the registry.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use crate::normalizer::normalize_batch;
use crate::platform::{classify, Platform};
use crate::scraper::{invoke_scrapers, ScrapeRequest, Scraper};
use crate::selection::{select_top_posts, ScoredPost};
use crate::task::{CreateTaskRequest, ProcessingStage, Task, TaskState, TaskStore, UrlAnalysis};

use super::config::OrchestratorConfig;
use super::types::{PipelineError, SubmissionReceipt, SubmitError};

/// The task orchestrator - accepts batches and drives them to completion.
pub struct TaskOrchestrator {
    config: OrchestratorConfig,
    store: Arc<dyn TaskStore>,
    scraper: Arc<dyn Scraper>,
}

impl TaskOrchestrator {
    /// Create a new orchestrator.
    pub fn new(
        config: OrchestratorConfig,
        store: Arc<dyn TaskStore>,
        scraper: Arc<dyn Scraper>,
    ) -> Self {
        Self {
            config,
            store,
            scraper,
        }
    }

    /// Orchestrator configuration.
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Validate and accept a batch of URLs.
    ///
    /// On success a task exists in the Started state, a background worker
    /// owns it, and the receipt is returned without waiting for any
    /// scraping. Validation failures create no task.
    pub fn submit(&self, urls: Vec<String>) -> Result<SubmissionReceipt, SubmitError> {
        if urls.is_empty() {
            return Err(SubmitError::Validation(
                "at least 1 URL is required".to_string(),
            ));
        }
        if urls.len() > self.config.max_batch_size {
            return Err(SubmitError::Validation(format!(
                "maximum {} URLs allowed",
                self.config.max_batch_size
            )));
        }

        // Classify every URL; unsupported ones are recorded, not rejected.
        let analyses: Vec<UrlAnalysis> = urls
            .iter()
            .enumerate()
            .map(|(i, url)| match classify(url) {
                Ok(m) => {
                    info!(index = i + 1, url = url.as_str(), platform = %m.platform, "URL classified");
                    UrlAnalysis {
                        index: i + 1,
                        url: url.clone(),
                        platform: Some(m.platform),
                        handle: m.handle,
                    }
                }
                Err(e) => {
                    warn!(index = i + 1, url = url.as_str(), error = %e, "URL not classified");
                    UrlAnalysis {
                        index: i + 1,
                        url: url.clone(),
                        platform: None,
                        handle: None,
                    }
                }
            })
            .collect();

        let platforms: Vec<Platform> = Platform::ALL
            .into_iter()
            .filter(|p| analyses.iter().any(|a| a.platform == Some(*p)))
            .collect();

        let task = self.store.create(CreateTaskRequest {
            urls: urls.clone(),
            analyses: analyses.clone(),
            platforms: platforms.clone(),
        })?;

        info!(
            task_id = task.id.as_str(),
            urls = urls.len(),
            platforms = ?platforms,
            "Task created, spawning worker"
        );

        let config = self.config.clone();
        let store = Arc::clone(&self.store);
        let scraper = Arc::clone(&self.scraper);
        tokio::spawn(Self::run_task(config, store, scraper, task.clone()));

        Ok(SubmissionReceipt {
            task_id: task.id,
            status: "started".to_string(),
            message: format!("Started processing {} URLs", urls.len()),
            urls_detected: analyses,
            platforms_needed: platforms,
        })
    }

    /// Worker entry point: drives one task to a terminal state.
    async fn run_task(
        config: OrchestratorConfig,
        store: Arc<dyn TaskStore>,
        scraper: Arc<dyn Scraper>,
        task: Task,
    ) {
        let task_id = task.id.clone();
        info!(task_id = task_id.as_str(), "Pipeline worker started");

        let outcome = Self::run_pipeline(&config, &store, &scraper, &task).await;

        let final_state = match outcome {
            Ok(posts) => {
                info!(
                    task_id = task_id.as_str(),
                    selected = posts.len(),
                    "Pipeline completed"
                );
                TaskState::Completed {
                    completed_at: Utc::now(),
                    posts,
                }
            }
            Err(e) => {
                warn!(task_id = task_id.as_str(), error = %e, "Pipeline failed");
                TaskState::Error {
                    failed_at: Utc::now(),
                    message: e.to_string(),
                    failed_platforms: e.failed_platforms(),
                }
            }
        };

        if let Err(e) = store.update_state(&task_id, final_state) {
            warn!(task_id = task_id.as_str(), error = %e, "Failed to record terminal state");
        }
    }

    /// The pipeline proper: scrape -> normalize -> select.
    async fn run_pipeline(
        config: &OrchestratorConfig,
        store: &Arc<dyn TaskStore>,
        scraper: &Arc<dyn Scraper>,
        task: &Task,
    ) -> Result<Vec<ScoredPost>, PipelineError> {
        store.update_state(
            &task.id,
            TaskState::Processing {
                stage: ProcessingStage::Scraping,
            },
        )?;

        // One job per distinct platform; a platform's job carries every
        // URL submitted for it, in submission order.
        let jobs: Vec<ScrapeRequest> = task
            .platforms
            .iter()
            .map(|platform| ScrapeRequest {
                platform: *platform,
                urls: task
                    .analyses
                    .iter()
                    .filter(|a| a.platform == Some(*platform))
                    .map(|a| a.url.clone())
                    .collect(),
            })
            .collect();

        if jobs.is_empty() {
            return Err(PipelineError::NoSupportedPlatforms);
        }

        let outcome = invoke_scrapers(
            Arc::clone(scraper),
            jobs,
            Duration::from_secs(config.scrape_timeout_secs),
        )
        .await;

        if outcome.all_failed() {
            return Err(PipelineError::AllScrapersFailed {
                failed: outcome.failed_platforms(),
            });
        }

        let failed = outcome.failed_platforms();
        if !failed.is_empty() {
            warn!(
                task_id = task.id.as_str(),
                failed = ?failed,
                "Continuing with partial scraper results"
            );
        }

        store.update_state(
            &task.id,
            TaskState::Processing {
                stage: ProcessingStage::Normalizing,
            },
        )?;

        let results = outcome.into_successes();
        let posts = Self::bounded_stage(
            ProcessingStage::Normalizing,
            config.normalize_timeout_secs,
            move || normalize_batch(results.iter()),
        )
        .await?;

        info!(
            task_id = task.id.as_str(),
            posts = posts.len(),
            "Normalization complete"
        );

        store.update_state(
            &task.id,
            TaskState::Processing {
                stage: ProcessingStage::Selecting,
            },
        )?;

        let target = config.target_posts;
        let selected = Self::bounded_stage(
            ProcessingStage::Selecting,
            config.selection_timeout_secs,
            move || select_top_posts(&posts, target),
        )
        .await?;

        Ok(selected)
    }

    /// Run a CPU-bound stage on a blocking thread under a deadline.
    async fn bounded_stage<T, F>(
        stage: ProcessingStage,
        timeout_secs: u64,
        f: F,
    ) -> Result<T, PipelineError>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        match tokio::time::timeout(
            Duration::from_secs(timeout_secs),
            tokio::task::spawn_blocking(f),
        )
        .await
        {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(join_err)) => Err(PipelineError::Internal(join_err.to_string())),
            Err(_) => Err(PipelineError::StageTimeout {
                stage,
                timeout_secs,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{InMemoryTaskStore, TaskError};
    use crate::testing::MockScraper;

    fn orchestrator_with(scraper: MockScraper) -> (TaskOrchestrator, Arc<InMemoryTaskStore>) {
        let store = Arc::new(InMemoryTaskStore::new());
        let orchestrator = TaskOrchestrator::new(
            OrchestratorConfig {
                scrape_timeout_secs: 2,
                normalize_timeout_secs: 2,
                selection_timeout_secs: 2,
                ..Default::default()
            },
            store.clone() as Arc<dyn TaskStore>,
            Arc::new(scraper),
        );
        (orchestrator, store)
    }

    async fn wait_terminal(store: &Arc<InMemoryTaskStore>, id: &str) -> Task {
        for _ in 0..500 {
            let task = store.get(id).unwrap().expect("task must exist");
            if task.state.is_terminal() {
                return task;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("task {} never reached a terminal state", id);
    }

    #[tokio::test]
    async fn test_submit_rejects_empty_batch() {
        let (orchestrator, store) = orchestrator_with(MockScraper::new());
        let err = orchestrator.submit(vec![]).unwrap_err();
        assert!(matches!(err, SubmitError::Validation(_)));
        assert_eq!(store.count(&Default::default()).unwrap(), 0);
    }

    #[tokio::test]
    async fn test_submit_rejects_oversized_batch() {
        let (orchestrator, store) = orchestrator_with(MockScraper::new());
        let urls = (0..11).map(|i| format!("https://x.com/user{}", i)).collect();
        let err = orchestrator.submit(urls).unwrap_err();
        assert!(matches!(err, SubmitError::Validation(_)));
        assert_eq!(store.count(&Default::default()).unwrap(), 0);
    }

    #[tokio::test]
    async fn test_submit_returns_receipt_immediately() {
        let scraper = MockScraper::new();
        scraper.fail_platform(Platform::Twitter, "down");
        let (orchestrator, _store) = orchestrator_with(scraper);

        let receipt = orchestrator
            .submit(vec![
                "https://x.com/rustlang".to_string(),
                "https://not-social.example/page".to_string(),
            ])
            .unwrap();

        assert_eq!(receipt.status, "started");
        assert_eq!(receipt.platforms_needed, vec![Platform::Twitter]);
        assert_eq!(receipt.urls_detected.len(), 2);
        assert_eq!(receipt.urls_detected[1].platform, None);
    }

    #[tokio::test]
    async fn test_all_scrapers_failed_reaches_error() {
        let scraper = MockScraper::new();
        scraper.fail_platform(Platform::Twitter, "blocked");
        scraper.fail_platform(Platform::Tiktok, "blocked");
        let (orchestrator, store) = orchestrator_with(scraper);

        let receipt = orchestrator
            .submit(vec![
                "https://x.com/rustlang".to_string(),
                "https://www.tiktok.com/@someone".to_string(),
            ])
            .unwrap();

        let task = wait_terminal(&store, &receipt.task_id).await;
        match task.state {
            TaskState::Error {
                message,
                failed_platforms,
                ..
            } => {
                assert!(message.contains("all scrapers failed"));
                assert_eq!(failed_platforms, vec![Platform::Twitter, Platform::Tiktok]);
            }
            other => panic!("expected error state, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_partial_failure_still_completes() {
        let scraper = MockScraper::new();
        scraper.set_items(
            Platform::Tiktok,
            "https://www.tiktok.com/@someone",
            vec![
                serde_json::json!({ "text": "a", "playCount": 100 }),
                serde_json::json!({ "text": "b", "playCount": 50 }),
            ],
        );
        scraper.fail_platform(Platform::Twitter, "blocked");
        let (orchestrator, store) = orchestrator_with(scraper);

        let receipt = orchestrator
            .submit(vec![
                "https://x.com/rustlang".to_string(),
                "https://www.tiktok.com/@someone".to_string(),
            ])
            .unwrap();

        let task = wait_terminal(&store, &receipt.task_id).await;
        match task.state {
            TaskState::Completed { posts, .. } => {
                assert_eq!(posts.len(), 2);
                assert!(posts.iter().all(|p| p.post.platform == Platform::Tiktok));
                assert_eq!(posts[0].post_number, "post_1");
            }
            other => panic!("expected completed state, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_zero_items_still_completes_empty() {
        let scraper = MockScraper::new();
        scraper.set_items(Platform::Youtube, "https://www.youtube.com/@c", vec![]);
        let (orchestrator, store) = orchestrator_with(scraper);

        let receipt = orchestrator
            .submit(vec!["https://www.youtube.com/@c".to_string()])
            .unwrap();

        let task = wait_terminal(&store, &receipt.task_id).await;
        match task.state {
            TaskState::Completed { posts, .. } => assert!(posts.is_empty()),
            other => panic!("expected completed state, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_batch_of_only_unsupported_urls_errors() {
        let (orchestrator, store) = orchestrator_with(MockScraper::new());

        let receipt = orchestrator
            .submit(vec!["https://example.com/a".to_string()])
            .unwrap();
        assert!(receipt.platforms_needed.is_empty());

        let task = wait_terminal(&store, &receipt.task_id).await;
        match task.state {
            TaskState::Error { message, .. } => {
                assert!(message.contains("no supported platforms"));
            }
            other => panic!("expected error state, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_scraper_timeout_is_a_platform_failure() {
        let scraper = MockScraper::new();
        scraper.set_delay(Duration::from_secs(30));
        scraper.set_items(
            Platform::Instagram,
            "https://www.instagram.com/nasa/",
            vec![serde_json::json!({ "type": "Video", "videoPlayCount": 10 })],
        );
        let store = Arc::new(InMemoryTaskStore::new());
        let orchestrator = TaskOrchestrator::new(
            OrchestratorConfig {
                scrape_timeout_secs: 1,
                ..Default::default()
            },
            store.clone() as Arc<dyn TaskStore>,
            Arc::new(scraper),
        );

        let receipt = orchestrator
            .submit(vec!["https://www.instagram.com/nasa/".to_string()])
            .unwrap();

        let task = wait_terminal(&store, &receipt.task_id).await;
        match task.state {
            TaskState::Error {
                failed_platforms, ..
            } => assert_eq!(failed_platforms, vec![Platform::Instagram]),
            other => panic!("expected error state, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_worker_is_sole_writer_after_terminal() {
        let scraper = MockScraper::new();
        scraper.set_items(
            Platform::Tiktok,
            "https://www.tiktok.com/@someone",
            vec![serde_json::json!({ "text": "a", "playCount": 1 })],
        );
        let (orchestrator, store) = orchestrator_with(scraper);

        let receipt = orchestrator
            .submit(vec!["https://www.tiktok.com/@someone".to_string()])
            .unwrap();
        let task = wait_terminal(&store, &receipt.task_id).await;

        // Once terminal, any further write is refused by the registry.
        let err = store.update_state(&task.id, TaskState::Started).unwrap_err();
        assert!(matches!(err, TaskError::TerminalState { .. }));
    }
}
