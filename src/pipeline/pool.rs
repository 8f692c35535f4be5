//! Bounded worker pool
//!
//! A fixed number of workers drain a fixed-size queue. Submitting waits while
//! the queue is full, which gives the dispatcher backpressure instead of
//! spawning one task per URL up front.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

/// Fixed-size pool of workers running the same handler
pub struct WorkerPool<T> {
    sender: mpsc::Sender<T>,
    workers: Vec<JoinHandle<()>>,
}

impl<T: Send + 'static> WorkerPool<T> {
    /// Spawns `workers` workers sharing a queue of `capacity` jobs
    ///
    /// Both sizes are clamped to at least 1.
    pub fn spawn<F, Fut>(workers: usize, capacity: usize, handler: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let receiver = Arc::new(Mutex::new(receiver));
        let handler = Arc::new(handler);

        let workers = (0..workers.max(1))
            .map(|id| {
                let receiver = Arc::clone(&receiver);
                let handler = Arc::clone(&handler);
                tokio::spawn(async move {
                    loop {
                        let job = {
                            let mut queue = receiver.lock().await;
                            queue.recv().await
                        };
                        let Some(job) = job else { break };
                        handler(job).await;
                    }
                    tracing::trace!("Worker {} exiting, queue closed", id);
                })
            })
            .collect();

        Self { sender, workers }
    }

    /// Number of workers in the pool
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Queues a job, waiting for space if the queue is full
    ///
    /// Returns the job back if every worker has stopped.
    pub async fn submit(&self, job: T) -> Result<(), T> {
        self.sender.send(job).await.map_err(|e| e.0)
    }

    /// Closes the queue and waits for the workers to drain it
    pub async fn join(self) {
        let Self { sender, workers } = self;
        drop(sender);

        for worker in workers {
            if let Err(e) = worker.await {
                tracing::error!("Worker stopped abnormally: {}", e);
            }
        }
    }
}
