//! Harvest main entry point
//!
//! This is the command-line interface for the Harvest batch fetcher.

use anyhow::Context;
use clap::Parser;
use harvest::config::{
    load_config_with_hash, validate, Config, CoordinationMode, DispatchMode, ExtractMode, Profile,
};
use harvest::input::UrlSource;
use harvest::pipeline::{Coordinator, ExtractedContent, TaskReport};
use harvest::serve::serve_directory;
use harvest::url::{derive_filename_with, NamingOptions};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Harvest: fetch a list of pages concurrently and save them to disk
///
/// Every URL gets its own task. Pages are written to the output directory under
/// names derived from their URL, and a SUCCESS/FAILED line per URL is appended
/// to the summary file.
#[derive(Parser, Debug)]
#[command(name = "harvest")]
#[command(version = "1.0.0")]
#[command(about = "Concurrent fetch-and-persist for a fixed URL list", long_about = None)]
struct Cli {
    /// File with one URL per line
    #[arg(short, long, value_name = "FILE", default_value = "links.txt")]
    input: PathBuf,

    /// Read a single line of whitespace-separated URLs from stdin instead
    #[arg(long)]
    stdin: bool,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Preset used for every setting the config file does not give
    #[arg(long, value_enum)]
    profile: Option<Profile>,

    /// Directory receiving saved pages and the summary
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<String>,

    /// Attempts per URL (0 is treated as 1)
    #[arg(long)]
    retries: Option<u32>,

    /// Completion signaling: barrier (write files) or collector (channel)
    #[arg(long, value_enum)]
    mode: Option<CoordinationMode>,

    /// What to keep from each page
    #[arg(long, value_enum)]
    extract: Option<ExtractMode>,

    /// Use a bounded pool of this many workers instead of one task per URL
    #[arg(long)]
    workers: Option<usize>,

    /// Queue size for the worker pool
    #[arg(long, requires = "workers")]
    queue_capacity: Option<usize>,

    /// Do not write the summary file
    #[arg(long)]
    no_summary: bool,

    /// Keep query strings in file names
    #[arg(long)]
    keep_query: bool,

    /// Add a short URL hash to file names to avoid collisions
    #[arg(long)]
    hash_suffix: bool,

    /// Serve the output directory over HTTP after the batch
    #[arg(long)]
    serve: bool,

    /// Port for --serve
    #[arg(long)]
    port: Option<u16>,

    /// Append diagnostics to this file instead of stderr
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show the resolved configuration and target files without fetching
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    /// Layers command-line overrides on top of the loaded configuration
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(dir) = &self.output_dir {
            config.output.directory = dir.clone();
        }
        if let Some(retries) = self.retries {
            config.fetch.max_retries = retries;
        }
        if let Some(mode) = self.mode {
            config.batch.mode = mode;
        }
        if let Some(extract) = self.extract {
            config.batch.extract = extract;
        }
        if let Some(workers) = self.workers {
            config.batch.dispatch = DispatchMode::Pool;
            config.batch.workers = workers;
        }
        if let Some(capacity) = self.queue_capacity {
            config.batch.queue_capacity = capacity;
        }
        if self.no_summary {
            config.output.summary = false;
        }
        if self.keep_query {
            config.output.strip_query = false;
        }
        if self.hash_suffix {
            config.output.hash_suffix = true;
        }
        if self.serve {
            config.serve.enabled = true;
        }
        if let Some(port) = self.port {
            config.serve.port = port;
        }
    }

    fn url_source(&self) -> UrlSource {
        if self.stdin {
            UrlSource::Stdin
        } else {
            UrlSource::File(self.input.clone())
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    let config = resolve_config(&cli)?;

    let source = cli.url_source();
    if source == UrlSource::Stdin {
        eprintln!("Enter URLs separated by spaces:");
    }
    let urls = source.read().context("Failed to read URL list")?;
    tracing::info!("Loaded {} URLs", urls.len());

    if cli.dry_run {
        handle_dry_run(&config, &urls);
        return Ok(());
    }

    handle_batch(config, urls).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Called exactly once, before anything logs.
fn setup_logging(verbose: u8, quiet: bool, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("harvest=info,warn"),
            1 => EnvFilter::new("harvest=debug,info"),
            2 => EnvFilter::new("harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false);

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }

    Ok(())
}

/// Loads the config file (if any), applies CLI overrides, and validates
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let default_profile = cli.profile.unwrap_or_default();

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path, default_profile)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::for_profile(default_profile),
    };

    cli.apply_overrides(&mut config);
    validate(&config).context("Invalid configuration")?;

    Ok(config)
}

/// Handles the --dry-run mode: shows what would be fetched
fn handle_dry_run(config: &Config, urls: &[String]) {
    println!("=== Harvest Dry Run ===\n");

    println!("Profile: {}", config.profile);
    println!("\nFetch:");
    println!("  Attempts per URL: {}", config.attempts());
    println!("  User agent: {}", config.fetch.user_agent);
    println!("  Timeout: {}s", config.fetch.timeout_secs);

    println!("\nBatch:");
    println!("  Mode: {:?}", config.batch.mode);
    println!("  Dispatch: {:?}", config.batch.dispatch);
    if config.batch.dispatch == DispatchMode::Pool {
        println!(
            "  Workers: {} (queue {})",
            config.batch.workers, config.batch.queue_capacity
        );
    }
    println!("  Extract: {:?}", config.batch.extract);

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory);
    if config.output.summary {
        println!("  Summary: {}", config.output.summary_file);
    } else {
        println!("  Summary: disabled");
    }

    let naming = NamingOptions {
        strip_query: config.output.strip_query,
        hash_suffix: config.output.hash_suffix,
    };
    println!("\nTargets ({}):", urls.len());
    for url in urls {
        if config.batch.mode == CoordinationMode::Barrier {
            println!("  {} -> {}", url, derive_filename_with(url, naming));
        } else {
            println!("  {}", url);
        }
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main batch operation
async fn handle_batch(config: Config, urls: Vec<String>) -> anyhow::Result<()> {
    let serve = config.serve.clone();
    let output_dir = PathBuf::from(&config.output.directory);

    let coordinator = Coordinator::new(config).context("Failed to start batch")?;

    let stats = match coordinator.config().batch.mode {
        CoordinationMode::Barrier => coordinator.run_barrier(urls).await,
        CoordinationMode::Collector => {
            let mut stream = coordinator.start_collector(urls);
            while let Some(report) = stream.recv().await {
                print_report(&report);
            }
            stream.finish().await?
        }
    };

    println!("All pages have been processed.");
    tracing::debug!(
        "{} of {} pages saved or collected",
        stats.succeeded,
        stats.total
    );

    if serve.enabled {
        serve_directory(&output_dir, &serve.host, serve.port).await?;
    }

    Ok(())
}

/// Prints a successful collector-mode report to stdout
///
/// Failures are already in the log and the summary.
fn print_report(report: &TaskReport) {
    match &report.result {
        Ok(ExtractedContent::Record(record)) => println!("{}\t{}", record.title, record.url),
        Ok(ExtractedContent::Document(bytes)) => {
            println!("{}\t{} bytes", report.url, bytes.len())
        }
        Err(_) => {}
    }
}
