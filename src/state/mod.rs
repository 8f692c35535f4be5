//! State module for tracking task progress
//!
//! This module provides the per-URL task record that travels through the
//! fetch → extract → persist → summarize pipeline.
//!
//! # Components
//!
//! - `TaskState`: The lifecycle state of a single task (pending, fetching, succeeded, ...)
//! - `Task`: The URL, attempt count, and current state owned by one executing unit

mod task;
mod task_state;

// Re-export main types
pub use task::{Task, TaskError};
pub use task_state::TaskState;
