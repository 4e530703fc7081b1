//! Task orchestration for submitted URL batches.
//!
//! Submission validates and classifies synchronously, then hands the task
//! to a background worker that walks scrape -> normalize -> select and
//! records every stage in the task registry.

mod config;
mod runner;
mod types;

pub use config::OrchestratorConfig;
pub use runner::TaskOrchestrator;
pub use types::{PipelineError, SubmissionReceipt, SubmitError};
