// src/worker/pool.rs

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::{timeout_at, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::worker::backend::TaskSource;
use crate::worker::worker_loop::run_worker;
use crate::worker::WorkerOptions;

/// A set of worker loops sharing one source and one cancellation token.
pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
    cancel: CancellationToken,
    options: WorkerOptions,
}

impl WorkerPool {
    /// Spawn `options.workers` loops on the current Tokio runtime.
    ///
    /// The pool cancels a child of `cancel`, so cancelling the parent stops
    /// the pool while [`WorkerPool::shutdown`] leaves the parent untouched.
    pub fn spawn(
        source: Arc<dyn TaskSource>,
        options: WorkerOptions,
        cancel: &CancellationToken,
    ) -> Self {
        let cancel = cancel.child_token();
        let handles = (0..options.workers)
            .map(|worker| {
                tokio::spawn(run_worker(
                    worker,
                    Arc::clone(&source),
                    options.clone(),
                    cancel.clone(),
                ))
            })
            .collect();

        info!(workers = options.workers, "worker pool started");

        Self {
            handles,
            cancel,
            options,
        }
    }

    pub fn size(&self) -> usize {
        self.handles.len()
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Cancel every loop and wait up to the grace period for them to exit.
    ///
    /// Loops still running after the deadline are aborted. Returns the number
    /// of loops that had to be aborted.
    pub async fn shutdown(self) -> usize {
        self.cancel.cancel();
        let deadline = Instant::now() + self.options.shutdown_grace;
        let mut aborted = 0;

        for (worker, mut handle) in self.handles.into_iter().enumerate() {
            match timeout_at(deadline, &mut handle).await {
                Ok(Ok(())) => debug!(worker, "worker joined"),
                Ok(Err(e)) => warn!(worker, error = %e, "worker task panicked"),
                Err(_) => {
                    warn!(worker, "worker did not stop within grace period; aborting");
                    handle.abort();
                    aborted += 1;
                }
            }
        }

        info!(aborted, "worker pool stopped");
        aborted
    }
}
