// src/worker/backend.rs

//! Pluggable task source abstraction.
//!
//! Worker loops talk to a `TaskSource` instead of the scheduler directly.
//! A transport collaborator (HTTP, gRPC) would implement it over the wire;
//! tests provide sources that inject failures or record submissions.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::dag::{Scheduler, Task, TaskId};
use crate::errors::{CalcdagError, Result};
use crate::store::Store;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// What a worker receives for one dispatched task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskAssignment {
    pub id: TaskId,
    pub expression_id: String,
    /// Operator symbol, e.g. `"+"`.
    pub operation: String,
    pub arguments: (f64, f64),
}

impl TryFrom<&Task> for TaskAssignment {
    type Error = CalcdagError;

    fn try_from(task: &Task) -> std::result::Result<Self, Self::Error> {
        let arguments = task.arguments().ok_or_else(|| {
            CalcdagError::InvariantViolation(format!(
                "task '{}' dispatched with unresolved operands",
                task.id
            ))
        })?;

        Ok(Self {
            id: task.id.clone(),
            expression_id: task.expression_id.clone(),
            operation: task.operator.symbol().to_string(),
            arguments,
        })
    }
}

/// Where workers get tasks from and report results to.
pub trait TaskSource: Send + Sync {
    /// Next ready task, or `None` when nothing is ready.
    fn pull_task(&self) -> BoxFuture<'_, Result<Option<TaskAssignment>>>;

    fn submit_result(&self, task_id: TaskId, value: f64) -> BoxFuture<'_, Result<()>>;

    /// Report a local compute failure for a dispatched task.
    fn report_failure(&self, task_id: TaskId, message: String) -> BoxFuture<'_, Result<()>>;
}

/// In-process source backed by a shared [`Scheduler`].
pub struct LocalTaskSource<S: Store> {
    scheduler: Arc<Scheduler<S>>,
}

impl<S: Store> LocalTaskSource<S> {
    pub fn new(scheduler: Arc<Scheduler<S>>) -> Self {
        Self { scheduler }
    }
}

impl<S: Store> TaskSource for LocalTaskSource<S> {
    fn pull_task(&self) -> BoxFuture<'_, Result<Option<TaskAssignment>>> {
        Box::pin(async move {
            match self.scheduler.dispatch()? {
                Some(task) => Ok(Some(TaskAssignment::try_from(&task)?)),
                None => Ok(None),
            }
        })
    }

    fn submit_result(&self, task_id: TaskId, value: f64) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            self.scheduler.submit_result(&task_id, value)?;
            Ok(())
        })
    }

    fn report_failure(&self, task_id: TaskId, message: String) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            self.scheduler.fail(&task_id, &message)?;
            Ok(())
        })
    }
}
