use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use calcdag::dag::TaskId;
use calcdag::errors::{CalcdagError, Result};
use calcdag::worker::backend::BoxFuture;
use calcdag::worker::{TaskAssignment, TaskSource};

/// Wraps another source and fails the first `failing_pulls` pulls and the
/// first `failing_submits` submissions with a transient error.
pub struct FlakyTaskSource {
    inner: Arc<dyn TaskSource>,
    failing_pulls: AtomicUsize,
    failing_submits: AtomicUsize,
    pub injected: AtomicUsize,
}

impl FlakyTaskSource {
    pub fn new(inner: Arc<dyn TaskSource>, failing_pulls: usize, failing_submits: usize) -> Self {
        Self {
            inner,
            failing_pulls: AtomicUsize::new(failing_pulls),
            failing_submits: AtomicUsize::new(failing_submits),
            injected: AtomicUsize::new(0),
        }
    }

    fn should_fail(&self, counter: &AtomicUsize) -> bool {
        let failed = counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            self.injected.fetch_add(1, Ordering::SeqCst);
        }
        failed
    }
}

impl TaskSource for FlakyTaskSource {
    fn pull_task(&self) -> BoxFuture<'_, Result<Option<TaskAssignment>>> {
        if self.should_fail(&self.failing_pulls) {
            return Box::pin(async {
                Err(CalcdagError::TransientIo("injected pull failure".to_string()))
            });
        }
        self.inner.pull_task()
    }

    fn submit_result(&self, task_id: TaskId, value: f64) -> BoxFuture<'_, Result<()>> {
        if self.should_fail(&self.failing_submits) {
            return Box::pin(async {
                Err(CalcdagError::TransientIo("injected submit failure".to_string()))
            });
        }
        self.inner.submit_result(task_id, value)
    }

    fn report_failure(&self, task_id: TaskId, message: String) -> BoxFuture<'_, Result<()>> {
        self.inner.report_failure(task_id, message)
    }
}

/// Serves a fixed list of assignments and records what workers report.
#[derive(Default)]
pub struct RecordingTaskSource {
    queue: Mutex<VecDeque<TaskAssignment>>,
    pub results: Arc<Mutex<Vec<(TaskId, f64)>>>,
    pub failures: Arc<Mutex<Vec<(TaskId, String)>>>,
    pub pulls: AtomicUsize,
}

impl RecordingTaskSource {
    pub fn new(assignments: impl IntoIterator<Item = TaskAssignment>) -> Self {
        Self {
            queue: Mutex::new(assignments.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Number of results plus failures reported so far.
    pub fn reported(&self) -> usize {
        self.results.lock().unwrap().len() + self.failures.lock().unwrap().len()
    }
}

/// Convenience constructor for assignments with literal arguments.
pub fn assignment(id: &str, operation: &str, lhs: f64, rhs: f64) -> TaskAssignment {
    TaskAssignment {
        id: id.to_string(),
        expression_id: "expr".to_string(),
        operation: operation.to_string(),
        arguments: (lhs, rhs),
    }
}

impl TaskSource for RecordingTaskSource {
    fn pull_task(&self) -> BoxFuture<'_, Result<Option<TaskAssignment>>> {
        self.pulls.fetch_add(1, Ordering::SeqCst);
        let next = self.queue.lock().unwrap().pop_front();
        Box::pin(async move { Ok(next) })
    }

    fn submit_result(&self, task_id: TaskId, value: f64) -> BoxFuture<'_, Result<()>> {
        self.results.lock().unwrap().push((task_id, value));
        Box::pin(async { Ok(()) })
    }

    fn report_failure(&self, task_id: TaskId, message: String) -> BoxFuture<'_, Result<()>> {
        self.failures.lock().unwrap().push((task_id, message));
        Box::pin(async { Ok(()) })
    }
}
