pub mod config;
pub mod normalizer;
pub mod orchestrator;
pub mod platform;
pub mod scraper;
pub mod selection;
pub mod task;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, ApifyActors, ApifyConfig, Config,
    ConfigError, SanitizedConfig, ScraperBackend, ScrapersConfig, ServerConfig, StorageConfig,
};
pub use normalizer::{normalize_batch, normalize_result, Author, EngagementStats, NormalizedPost};
pub use orchestrator::{
    OrchestratorConfig, PipelineError, SubmissionReceipt, SubmitError, TaskOrchestrator,
};
pub use platform::{classify, extract_handle, ClassifyError, Platform, PlatformMatch};
pub use scraper::{
    invoke_scrapers, ApifyScraper, BatchScrapeOutcome, PlatformOutcome, RawItem, RawScrapeResult,
    ScrapeError, ScrapeRequest, Scraper,
};
pub use selection::{engagement_score, select_top_posts, ScoredPost, DEFAULT_TARGET};
pub use task::{
    CreateTaskRequest, InMemoryTaskStore, JsonFileTaskStore, ProcessingStage, Task, TaskError,
    TaskFilter, TaskState, TaskStore, UrlAnalysis,
};
