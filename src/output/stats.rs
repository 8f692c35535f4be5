//! Batch statistics
//!
//! Tasks update shared counters as they finish; the coordinator takes a
//! snapshot once the batch is complete.

use crate::state::Task;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters shared by every task of one batch
#[derive(Debug)]
pub struct BatchCounters {
    started_at: DateTime<Utc>,
    dispatched: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
    attempts: AtomicU64,
}

impl BatchCounters {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            dispatched: AtomicU64::new(0),
            succeeded: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            attempts: AtomicU64::new(0),
        }
    }

    pub fn record_dispatch(&self) {
        self.dispatched.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts a finished task by its terminal state
    pub fn record(&self, task: &Task) {
        if task.state().is_success() {
            self.succeeded.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
        self.attempts
            .fetch_add(u64::from(task.attempts()), Ordering::Relaxed);
    }

    /// Takes a snapshot, stamping the finish time
    pub fn snapshot(&self) -> BatchStatistics {
        BatchStatistics {
            started_at: self.started_at,
            finished_at: Utc::now(),
            total: self.dispatched.load(Ordering::Acquire),
            succeeded: self.succeeded.load(Ordering::Acquire),
            failed: self.failed.load(Ordering::Acquire),
            attempts: self.attempts.load(Ordering::Acquire),
        }
    }
}

impl Default for BatchCounters {
    fn default() -> Self {
        Self::new()
    }
}

/// Batch statistics summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchStatistics {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// URLs dispatched
    pub total: u64,

    pub succeeded: u64,
    pub failed: u64,

    /// HTTP attempts across all tasks
    pub attempts: u64,
}

impl BatchStatistics {
    /// Tasks that reached a terminal state
    pub fn finished(&self) -> u64 {
        self.succeeded + self.failed
    }

    /// Returns the success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.succeeded as f64 / self.total as f64) * 100.0
    }

    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

/// Formats statistics for the diagnostic log
pub fn format_statistics(stats: &BatchStatistics) -> String {
    format!(
        "Batch finished in {}ms: {} URLs, {} succeeded, {} failed, {} attempts ({:.1}% success)",
        stats.duration_ms(),
        stats.total,
        stats.succeeded,
        stats.failed,
        stats.attempts,
        stats.success_rate()
    )
}
