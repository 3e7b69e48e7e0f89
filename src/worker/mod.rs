// src/worker/mod.rs

//! Worker pool.
//!
//! - [`backend`] provides the `TaskSource` trait workers pull from, and
//!   `LocalTaskSource`, which talks to an in-process [`Scheduler`].
//! - [`compute`] applies one operation with the worker-side guards.
//! - [`worker_loop`] is the pull / compute / submit loop.
//! - [`pool`] spawns N loops and drains them on shutdown.
//!
//! [`Scheduler`]: crate::dag::Scheduler

pub mod backend;
pub mod compute;
pub mod pool;
pub mod worker_loop;

use std::time::Duration;

use crate::config::{ConfigFile, OperationLatencies};

pub use backend::{LocalTaskSource, TaskAssignment, TaskSource};
pub use compute::compute;
pub use pool::WorkerPool;
pub use worker_loop::run_worker;

/// Knobs shared by every loop in a pool.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerOptions {
    pub workers: usize,
    pub idle_backoff: Duration,
    pub shutdown_grace: Duration,
    pub latencies: OperationLatencies,
}

impl WorkerOptions {
    pub fn from_config(cfg: &ConfigFile) -> Self {
        Self {
            workers: cfg.workers.count,
            idle_backoff: cfg.workers.idle_backoff,
            shutdown_grace: cfg.workers.shutdown_grace,
            latencies: cfg.latencies.clone(),
        }
    }
}

impl Default for WorkerOptions {
    fn default() -> Self {
        Self::from_config(&ConfigFile::default())
    }
}
