//! Per-URL task record and task-level errors

use crate::output::PersistError;
use crate::pipeline::FetchError;
use crate::state::TaskState;
use thiserror::Error;

/// Errors that end a single task
///
/// These never escape the task boundary: the coordinator converts them into a
/// log line and a FAILED summary record.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("persist failed: {0}")]
    Persist(#[from] PersistError),

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidTransition { from: TaskState, to: TaskState },
}

/// One unit of work for a single URL
///
/// A task is created when the coordinator dispatches a URL and is owned by
/// exactly one executing unit until it reaches a terminal state.
#[derive(Debug, Clone)]
pub struct Task {
    url: String,
    attempts: u32,
    state: TaskState,
}

impl Task {
    /// Creates a pending task for the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            attempts: 0,
            state: TaskState::Pending,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Number of HTTP attempts made so far
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    pub fn set_attempts(&mut self, attempts: u32) {
        self.attempts = attempts;
    }

    /// Moves the task to `next`, rejecting illegal transitions
    pub fn advance(&mut self, next: TaskState) -> Result<(), TaskError> {
        if !self.state.can_transition_to(next) {
            return Err(TaskError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        tracing::trace!("{}: {} -> {}", self.url, self.state, next);
        self.state = next;
        Ok(())
    }

    /// Returns true once the task has reached SUCCESS or FAILED
    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }
}
