//! Pipeline module for fetching and processing a batch of URLs
//!
//! This module contains the core batch logic, including:
//! - HTTP fetching with retry logic
//! - Content extraction (raw, re-serialized HTML, or title records)
//! - Task dispatch, unbounded or through a bounded worker pool
//! - Completion signaling via a latch or a results channel

mod coordinator;
mod extractor;
mod fetcher;
mod latch;
mod pool;

pub use coordinator::{BatchOutcome, Coordinator, ResultStream, TaskContext, TaskReport};
pub use extractor::{extract, reserialize, ExtractedContent, PageRecord};
pub use fetcher::{
    build_http_client, fetch_url, fetch_with_retry, FetchError, FetchResult, RetryPolicy,
};
pub use latch::{LatchGuard, TaskLatch};
pub use pool::WorkerPool;

use crate::config::Config;
use crate::HarvestError;

/// Runs a complete batch
///
/// This is the main entry point for a run. It will:
/// 1. Create the output directory
/// 2. Build the HTTP client
/// 3. Dispatch one task per URL
/// 4. Wait until every task has reached a terminal state
///
/// # Arguments
///
/// * `config` - The batch configuration
/// * `urls` - Target URLs, used exactly as supplied
///
/// # Returns
///
/// * `Ok(BatchOutcome)` - Every task finished; individual failures are inside
/// * `Err(HarvestError)` - Startup failed before any task ran
///
/// # Example
///
/// ```no_run
/// use harvest::config::Config;
/// use harvest::pipeline::run_batch;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let urls = vec!["https://example.com/".to_string()];
/// let outcome = run_batch(Config::default(), urls).await?;
/// println!("{} succeeded", outcome.statistics().succeeded);
/// # Ok(())
/// # }
/// ```
pub async fn run_batch(config: Config, urls: Vec<String>) -> Result<BatchOutcome, HarvestError> {
    let coordinator = Coordinator::new(config)?;
    coordinator.run(urls).await
}
