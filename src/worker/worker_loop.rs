// src/worker/worker_loop.rs

//! One worker's pull / compute / submit loop.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::worker::backend::{TaskAssignment, TaskSource};
use crate::worker::compute::compute;
use crate::worker::WorkerOptions;

/// Run until `cancel` fires.
///
/// Source errors are logged and retried on the next iteration; they never end
/// the loop. A task already pulled when cancellation arrives is abandoned in
/// its `Running` state.
pub async fn run_worker(
    worker: usize,
    source: Arc<dyn TaskSource>,
    options: WorkerOptions,
    cancel: CancellationToken,
) {
    info!(worker, "worker started");

    while !cancel.is_cancelled() {
        let assignment = match source.pull_task().await {
            Ok(Some(assignment)) => assignment,
            Ok(None) => {
                if !sleep_or_cancel(options.idle_backoff, &cancel).await {
                    break;
                }
                continue;
            }
            Err(e) => {
                if e.is_transient() {
                    warn!(worker, error = %e, "failed to pull task; retrying");
                } else {
                    error!(worker, error = %e, "unexpected error pulling task; retrying");
                }
                if !sleep_or_cancel(options.idle_backoff, &cancel).await {
                    break;
                }
                continue;
            }
        };

        let latency = options.latencies.for_operation(&assignment.operation);
        if !sleep_or_cancel(latency, &cancel).await {
            info!(
                worker,
                task = %assignment.id,
                "cancelled mid-task; leaving task running"
            );
            break;
        }

        execute(worker, source.as_ref(), assignment).await;
    }

    info!(worker, "worker stopped");
}

/// Compute one assignment and report the outcome.
async fn execute(worker: usize, source: &dyn TaskSource, assignment: TaskAssignment) {
    let task_id = assignment.id.clone();

    match compute(&assignment) {
        Ok(value) => {
            debug!(
                worker,
                task = %task_id,
                op = %assignment.operation,
                lhs = assignment.arguments.0,
                rhs = assignment.arguments.1,
                result = value,
                "task computed"
            );
            if let Err(e) = source.submit_result(task_id.clone(), value).await {
                warn!(worker, task = %task_id, error = %e, "failed to submit result");
            }
        }
        Err(compute_err) => {
            warn!(worker, task = %task_id, error = %compute_err, "task failed");
            if let Err(e) = source
                .report_failure(task_id.clone(), compute_err.to_string())
                .await
            {
                warn!(worker, task = %task_id, error = %e, "failed to report failure");
            }
        }
    }
}

/// Sleep for `duration`; returns `false` if cancelled first.
async fn sleep_or_cancel(duration: Duration, cancel: &CancellationToken) -> bool {
    tokio::select! {
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(duration) => true,
    }
}
