//! Output module for persisted pages and batch reporting
//!
//! This module handles:
//! - Writing fetched documents under derived file names
//! - Appending the per-URL SUCCESS/FAILED summary
//! - Recording batch statistics

mod persister;
pub mod stats;
mod summary;

pub use persister::{PersistError, Persister};
pub use stats::{format_statistics, BatchCounters, BatchStatistics};
pub use summary::{format_record, SummaryReporter};
