// src/engine/runtime.rs

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::ConfigFile;
use crate::dag::{Expression, ExpressionId, Scheduler};
use crate::errors::Result;
use crate::store::{InMemoryStore, Store};
use crate::worker::{LocalTaskSource, TaskSource, WorkerOptions, WorkerPool};

/// Scheduler + worker pool + client poll loop in one process.
pub struct Runtime<S: Store + 'static = InMemoryStore> {
    scheduler: Arc<Scheduler<S>>,
    pool: Option<WorkerPool>,
    options: WorkerOptions,
    poll_interval: Duration,
    cancel: CancellationToken,
}

impl<S: Store + 'static> fmt::Debug for Runtime<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("options", &self.options)
            .field("poll_interval", &self.poll_interval)
            .field("started", &self.pool.is_some())
            .finish_non_exhaustive()
    }
}

impl Runtime<InMemoryStore> {
    /// In-memory runtime configured from a validated [`ConfigFile`].
    pub fn from_config(cfg: &ConfigFile, cancel: CancellationToken) -> Self {
        Self::new(
            Arc::new(Scheduler::in_memory()),
            WorkerOptions::from_config(cfg),
            cfg.poll_interval,
            cancel,
        )
    }
}

impl<S: Store + 'static> Runtime<S> {
    pub fn new(
        scheduler: Arc<Scheduler<S>>,
        options: WorkerOptions,
        poll_interval: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            scheduler,
            pool: None,
            options,
            poll_interval,
            cancel,
        }
    }

    pub fn scheduler(&self) -> &Arc<Scheduler<S>> {
        &self.scheduler
    }

    pub fn is_started(&self) -> bool {
        self.pool.is_some()
    }

    /// Spawn the worker pool. Calling it again is a no-op.
    pub fn start(&mut self) {
        if self.pool.is_some() {
            return;
        }
        let source: Arc<dyn TaskSource> =
            Arc::new(LocalTaskSource::new(Arc::clone(&self.scheduler)));
        self.pool = Some(WorkerPool::spawn(
            source,
            self.options.clone(),
            &self.cancel,
        ));
    }

    pub fn submit(&self, text: &str) -> Result<ExpressionId> {
        self.scheduler.submit_expression(text)
    }

    /// Poll until every expression in `ids` is terminal or the runtime is
    /// cancelled. Returns the latest snapshot either way, in `ids` order.
    pub async fn wait_for(&self, ids: &[ExpressionId]) -> Result<Vec<Expression>> {
        loop {
            let snapshot = ids
                .iter()
                .map(|id| self.scheduler.get_expression(id))
                .collect::<Result<Vec<_>>>()?;

            let pending = snapshot.iter().filter(|e| !e.status.is_terminal()).count();
            if pending == 0 {
                return Ok(snapshot);
            }
            debug!(pending, "waiting for expressions");

            tokio::select! {
                _ = self.cancel.cancelled() => {
                    info!(pending, "wait cancelled");
                    return Ok(snapshot);
                }
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }
    }

    /// Stop the pool, if started. Returns the number of aborted loops.
    pub async fn shutdown(mut self) -> usize {
        match self.pool.take() {
            Some(pool) => pool.shutdown().await,
            None => 0,
        }
    }
}
