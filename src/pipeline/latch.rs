//! Countdown latch for tracking outstanding tasks
//!
//! The latch is incremented once per dispatched task and decremented when the
//! task's guard is dropped, including when the task panics. Waiters resume
//! once the count reaches zero.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct LatchInner {
    outstanding: AtomicUsize,
    zero: Notify,
}

/// Shared counter of unfinished tasks
#[derive(Debug, Clone, Default)]
pub struct TaskLatch {
    inner: Arc<LatchInner>,
}

/// Holds one count on a [`TaskLatch`] until dropped
#[derive(Debug)]
#[must_use = "the count is released as soon as the guard is dropped"]
pub struct LatchGuard {
    inner: Arc<LatchInner>,
}

impl TaskLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one outstanding task
    pub fn add(&self) -> LatchGuard {
        self.inner.outstanding.fetch_add(1, Ordering::AcqRel);
        LatchGuard {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Number of guards currently alive
    pub fn outstanding(&self) -> usize {
        self.inner.outstanding.load(Ordering::Acquire)
    }

    /// Waits until every guard has been dropped
    ///
    /// Returns immediately if nothing is outstanding.
    pub async fn wait(&self) {
        loop {
            // Register interest before checking so a release in between is not missed
            let notified = self.inner.zero.notified();
            if self.outstanding() == 0 {
                return;
            }
            notified.await;
        }
    }
}

impl Drop for LatchGuard {
    fn drop(&mut self) {
        if self.inner.outstanding.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.inner.zero.notify_waiters();
        }
    }
}
