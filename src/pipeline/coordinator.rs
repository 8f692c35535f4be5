//! Batch coordinator - dispatch and completion logic
//!
//! This module runs one task per URL and signals when the whole batch is done:
//! - Dispatching tasks, either all at once or through a bounded worker pool
//! - Running fetch → extract → persist → summarize inside each task
//! - Barrier mode: waiting on a latch until every task has finished
//! - Collector mode: delivering one report per task on a channel that a
//!   separate closer unit closes after the last send
//!
//! A failing task never affects any other task or the batch result.

use crate::config::{BatchConfig, Config, CoordinationMode, DispatchMode, ExtractMode};
use crate::output::{
    format_statistics, BatchCounters, BatchStatistics, PersistError, Persister, SummaryReporter,
};
use crate::pipeline::extractor::{extract, ExtractedContent};
use crate::pipeline::fetcher::{build_http_client, fetch_with_retry, RetryPolicy};
use crate::pipeline::latch::{LatchGuard, TaskLatch};
use crate::pipeline::pool::WorkerPool;
use crate::state::{Task, TaskError, TaskState};
use crate::url::NamingOptions;
use crate::HarvestError;
use reqwest::Client;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::Instrument;

/// Outcome of one task as seen by the consumer
#[derive(Debug)]
pub struct TaskReport {
    /// The URL exactly as supplied
    pub url: String,

    /// HTTP attempts made
    pub attempts: u32,

    /// Terminal state, SUCCEEDED or FAILED
    pub state: TaskState,

    /// Extracted content, or the error that ended the task
    pub result: Result<ExtractedContent, TaskError>,
}

impl TaskReport {
    pub fn is_success(&self) -> bool {
        self.state.is_success()
    }
}

/// Read-only state shared by every task of a coordinator
#[derive(Debug)]
pub struct TaskContext {
    client: Client,
    policy: RetryPolicy,
    extract: ExtractMode,
    persister: Option<Persister>,
    summary: Option<SummaryReporter>,
}

impl TaskContext {
    /// Builds the task context from configuration
    ///
    /// Files are only written in barrier mode; collector mode delivers content
    /// on the results channel instead.
    pub fn from_config(config: &Config) -> Result<Self, HarvestError> {
        let output_dir = PathBuf::from(&config.output.directory);

        let persister = (config.batch.mode == CoordinationMode::Barrier).then(|| {
            Persister::new(
                &output_dir,
                NamingOptions {
                    strip_query: config.output.strip_query,
                    hash_suffix: config.output.hash_suffix,
                },
            )
        });

        let summary = config
            .output
            .summary
            .then(|| SummaryReporter::new(&output_dir, &config.output.summary_file));

        Ok(Self {
            client: build_http_client(&config.fetch)?,
            policy: RetryPolicy::from_config(&config.fetch),
            extract: config.batch.extract,
            persister,
            summary,
        })
    }
}

/// Aggregate result of a finished batch
#[derive(Debug)]
pub enum BatchOutcome {
    /// Barrier mode: everything was persisted as a side effect
    Completed(BatchStatistics),

    /// Collector mode: every report drained from the channel
    Collected {
        reports: Vec<TaskReport>,
        stats: BatchStatistics,
    },
}

impl BatchOutcome {
    pub fn statistics(&self) -> &BatchStatistics {
        match self {
            Self::Completed(stats) => stats,
            Self::Collected { stats, .. } => stats,
        }
    }
}

/// Receiving end of a collector-mode batch
///
/// The channel closes exactly once, after every task has sent its report.
pub struct ResultStream {
    receiver: UnboundedReceiver<TaskReport>,
    closer: JoinHandle<BatchStatistics>,
}

impl ResultStream {
    /// Receives the next report, or `None` once the batch is complete
    pub async fn recv(&mut self) -> Option<TaskReport> {
        self.receiver.recv().await
    }

    /// Waits for the closer and returns the batch statistics
    pub async fn finish(self) -> Result<BatchStatistics, HarvestError> {
        Ok(self.closer.await?)
    }

    /// Drains every report, then returns them with the statistics
    pub async fn collect(mut self) -> Result<(Vec<TaskReport>, BatchStatistics), HarvestError> {
        let mut reports = Vec::new();
        while let Some(report) = self.receiver.recv().await {
            reports.push(report);
        }
        let stats = self.finish().await?;
        Ok((reports, stats))
    }
}

/// Main batch coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    context: Arc<TaskContext>,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// The output directory is created here; failing to create it is fatal
    /// and no task is dispatched.
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(HarvestError)` - Output directory or HTTP client setup failed
    pub fn new(config: Config) -> Result<Self, HarvestError> {
        let output_dir = PathBuf::from(&config.output.directory);
        std::fs::create_dir_all(&output_dir).map_err(|source| HarvestError::OutputDir {
            path: output_dir.clone(),
            source,
        })?;

        let context = TaskContext::from_config(&config)?;

        Ok(Self {
            config: Arc::new(config),
            context: Arc::new(context),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs the batch in the configured coordination mode
    pub async fn run(&self, urls: Vec<String>) -> Result<BatchOutcome, HarvestError> {
        match self.config.batch.mode {
            CoordinationMode::Barrier => Ok(BatchOutcome::Completed(self.run_barrier(urls).await)),
            CoordinationMode::Collector => {
                let (reports, stats) = self.start_collector(urls).collect().await?;
                Ok(BatchOutcome::Collected { reports, stats })
            }
        }
    }

    /// Dispatches every URL and waits on the latch until all tasks finish
    pub async fn run_barrier(&self, urls: Vec<String>) -> BatchStatistics {
        tracing::info!("Dispatching {} URLs", urls.len());

        let latch = TaskLatch::new();
        let counters = Arc::new(BatchCounters::new());
        {
            // Keeps the latch above zero while the pool is still being fed
            let _dispatching = latch.add();
            dispatch(
                Arc::clone(&self.context),
                Arc::clone(&counters),
                &self.config.batch,
                urls,
                &latch,
                None,
            )
            .await;
        }
        latch.wait().await;

        let stats = counters.snapshot();
        tracing::info!("{}", format_statistics(&stats));
        stats
    }

    /// Dispatches every URL and returns the stream of task reports
    ///
    /// A separate coordinating task waits for all tasks to finish and then
    /// drops the last sender, closing the channel.
    pub fn start_collector(&self, urls: Vec<String>) -> ResultStream {
        tracing::info!("Dispatching {} URLs (collector mode)", urls.len());

        let (sender, receiver) = mpsc::unbounded_channel();
        let context = Arc::clone(&self.context);
        let batch = self.config.batch.clone();

        let closer = tokio::spawn(async move {
            let latch = TaskLatch::new();
            let counters = Arc::new(BatchCounters::new());
            {
                let _dispatching = latch.add();
                dispatch(
                    context,
                    Arc::clone(&counters),
                    &batch,
                    urls,
                    &latch,
                    Some(sender.clone()),
                )
                .await;
            }
            latch.wait().await;

            drop(sender);
            tracing::debug!("All tasks reported, results channel closed");

            let stats = counters.snapshot();
            tracing::info!("{}", format_statistics(&stats));
            stats
        });

        ResultStream { receiver, closer }
    }
}

/// A URL queued for a pool worker, holding its latch count
struct Job {
    url: String,
    guard: LatchGuard,
}

/// Starts one task per URL using the configured dispatch mode
async fn dispatch(
    context: Arc<TaskContext>,
    counters: Arc<BatchCounters>,
    batch: &BatchConfig,
    urls: Vec<String>,
    latch: &TaskLatch,
    sink: Option<UnboundedSender<TaskReport>>,
) {
    match batch.dispatch {
        DispatchMode::Unbounded => {
            for url in urls {
                counters.record_dispatch();
                let guard = latch.add();
                let context = Arc::clone(&context);
                let counters = Arc::clone(&counters);
                let sink = sink.clone();

                tokio::spawn(async move {
                    let _guard = guard;
                    let report = run_task(&context, &counters, url).await;
                    deliver(sink.as_ref(), report);
                });
            }
        }
        DispatchMode::Pool => {
            let pool = {
                let context = Arc::clone(&context);
                let counters = Arc::clone(&counters);
                let sink = sink.clone();
                WorkerPool::spawn(batch.workers, batch.queue_capacity, move |job: Job| {
                    let context = Arc::clone(&context);
                    let counters = Arc::clone(&counters);
                    let sink = sink.clone();
                    async move {
                        let Job { url, guard } = job;
                        let report = run_task(&context, &counters, url).await;
                        deliver(sink.as_ref(), report);
                        drop(guard);
                    }
                })
            };
            tracing::debug!(
                "Worker pool started: {} workers, queue of {}",
                pool.size(),
                batch.queue_capacity
            );

            for url in urls {
                counters.record_dispatch();
                let job = Job {
                    url,
                    guard: latch.add(),
                };

                if let Err(job) = pool.submit(job).await {
                    // Every worker is gone; run it here so the URL still gets an outcome
                    tracing::error!("Worker pool closed, running {} inline", job.url);
                    let Job { url, guard } = job;
                    let report = run_task(&context, &counters, url).await;
                    deliver(sink.as_ref(), report);
                    drop(guard);
                }
            }

            pool.join().await;
        }
    }
}

/// Sends a report to the consumer, if there is one
fn deliver(sink: Option<&UnboundedSender<TaskReport>>, report: TaskReport) {
    if let Some(sender) = sink {
        if sender.send(report).is_err() {
            tracing::debug!("Results receiver dropped, report discarded");
        }
    }
}

/// Runs one task inside a span carrying its URL
async fn run_task(context: &TaskContext, counters: &BatchCounters, url: String) -> TaskReport {
    let span = tracing::info_span!("task", url = %url);
    execute(context, counters, url).instrument(span).await
}

/// Drives a task to a terminal state and records its outcome
///
/// Exactly one summary line is written per call.
async fn execute(context: &TaskContext, counters: &BatchCounters, url: String) -> TaskReport {
    let mut task = Task::new(url);
    let result = process(context, &mut task).await;

    let terminal = match &result {
        Ok(_) => TaskState::Succeeded,
        Err(e) => {
            tracing::warn!("Could not process {}: {}", task.url(), e);
            TaskState::Failed
        }
    };
    if let Err(e) = task.advance(terminal) {
        tracing::error!("{}", e);
    }

    if let Some(summary) = &context.summary {
        summary.record(task.url(), task.state().is_success()).await;
    }
    counters.record(&task);

    TaskReport {
        url: task.url().to_string(),
        attempts: task.attempts(),
        state: task.state(),
        result,
    }
}

/// Fetch → extract → persist for a single task
async fn process(context: &TaskContext, task: &mut Task) -> Result<ExtractedContent, TaskError> {
    task.advance(TaskState::Fetching)?;
    let fetched = fetch_with_retry(&context.client, task.url(), &context.policy).await;
    task.set_attempts(fetched.attempts);
    let body = fetched.outcome?;

    task.advance(TaskState::Extracting)?;
    let content = extract(&body, context.extract, task.url());

    task.advance(TaskState::Persisting)?;
    if let Some(persister) = &context.persister {
        let document = content
            .as_document()
            .ok_or_else(|| PersistError::NotADocument(task.url().to_string()))?;
        let path = persister.persist(task.url(), document).await?;
        tracing::info!("Saved {} to {}", task.url(), path.display());
    }

    Ok(content)
}
