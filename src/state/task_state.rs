/// Task state definitions for tracking pipeline progress
///
/// This module defines all possible states a task can be in while its URL
/// moves through the pipeline.
use std::fmt;

/// Represents the current state of a task in the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskState {
    // ===== Active States =====
    /// Task has been dispatched but has not started fetching
    Pending,

    /// Task is performing HTTP attempts
    Fetching,

    /// Task is transforming the fetched body
    Extracting,

    /// Task is writing content to disk or to the results channel
    Persisting,

    // ===== Terminal States =====
    /// Every step completed
    Succeeded,

    /// A step failed; the failure was logged and recorded
    Failed,
}

impl TaskState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    /// Returns true if this represents a successful completion
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }

    /// Checks whether moving from this state to `next` is a legal transition
    ///
    /// The pipeline only moves forward. Any active state may fail, and
    /// terminal states never change.
    pub fn can_transition_to(&self, next: TaskState) -> bool {
        use TaskState::*;
        match (self, next) {
            (Pending, Fetching) => true,
            (Fetching, Extracting) => true,
            (Extracting, Persisting) => true,
            (Persisting, Succeeded) => true,
            (Pending | Fetching | Extracting | Persisting, Failed) => true,
            _ => false,
        }
    }

    /// Lowercase name used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fetching => "fetching",
            Self::Extracting => "extracting",
            Self::Persisting => "persisting",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
