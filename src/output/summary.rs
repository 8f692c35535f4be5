//! Append-only per-URL summary artifact
//!
//! Each finished task appends exactly one line:
//!
//! ```text
//! URL: https://example.com/ - SUCCESS
//! URL: https://example.com/missing - FAILED
//! ```
//!
//! The file is never truncated, so it accumulates across runs.

use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Formats one summary line, including the trailing newline
pub fn format_record(url: &str, success: bool) -> String {
    let status = if success { "SUCCESS" } else { "FAILED" };
    format!("URL: {} - {}\n", url, status)
}

/// Appends SUCCESS/FAILED lines to the summary artifact
///
/// The file is opened and closed for every record; no handle outlives a call.
/// Appends are serialized in-process so lines never interleave even where the
/// filesystem does not make small appends atomic.
#[derive(Debug)]
pub struct SummaryReporter {
    path: PathBuf,
    lock: Mutex<()>,
}

impl SummaryReporter {
    /// Creates a reporter writing `file_name` inside `output_dir`
    pub fn new(output_dir: &Path, file_name: &str) -> Self {
        Self {
            path: output_dir.join(file_name),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records the outcome for `url`
    ///
    /// Failures are logged and otherwise ignored.
    pub async fn record(&self, url: &str, success: bool) {
        let line = format_record(url, success);
        if let Err(e) = self.append(&line).await {
            tracing::error!("Error writing summary {}: {}", self.path.display(), e);
        }
    }

    async fn append(&self, line: &str) -> std::io::Result<()> {
        let _held = self.lock.lock().await;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await
    }
}
