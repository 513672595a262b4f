//! Concurrency engine for the crawl pipeline
//!
//! This module contains the core fan-out/fan-in machinery:
//! - Stage-priority scheduling of pending page requests
//! - The consume-once blocking response store
//! - The fixed-size fetch worker pool
//! - The orchestrator that drives the staged crawl

mod fetcher;
mod orchestrator;
mod scheduler;
mod store;
mod worker;

pub use fetcher::{build_http_client, fetch_page, FetchError};
pub use orchestrator::{Orchestrator, RunReport, SkipRecord, SkipUnit};
pub use scheduler::{PageRequest, Scheduler, StagePriority};
pub use store::{FetchOutcome, ResponseStore};
pub use worker::WorkerPool;

use crate::config::Config;
use crate::ScoutError;

/// Runs a complete crawl with the given configuration.
///
/// Spawns the worker pool, drives the staged crawl to completion, joins the
/// workers, and returns the run report.
pub async fn run_crawl(config: Config) -> Result<RunReport, ScoutError> {
    let orchestrator = Orchestrator::new(config)?;
    orchestrator.run().await
}
