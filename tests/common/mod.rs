#![allow(dead_code)]

use calcdag::dag::{Expression, Scheduler};
use calcdag::errors::Result;
use calcdag::store::Store;
use calcdag::worker::{compute, TaskAssignment};

pub use calcdag_test_utils::init_tracing;

/// Synchronously dispatch, compute and report every ready task until the
/// scheduler has nothing left to hand out. Returns the number of tasks run.
pub fn drive<S: Store>(scheduler: &Scheduler<S>) -> usize {
    let mut executed = 0;
    while let Some(task) = scheduler.dispatch().expect("dispatch failed") {
        let assignment = TaskAssignment::try_from(&task).expect("dispatched task unresolved");
        match compute(&assignment) {
            Ok(value) => {
                scheduler
                    .submit_result(&task.id, value)
                    .expect("submit_result failed");
            }
            Err(e) => {
                scheduler
                    .fail(&task.id, &e.to_string())
                    .expect("fail failed");
            }
        }
        executed += 1;
    }
    executed
}

/// Submit `text` to a fresh in-memory scheduler and drive it to the end.
pub fn evaluate_distributed(text: &str) -> Result<Expression> {
    let scheduler = Scheduler::in_memory();
    let id = scheduler.submit_expression(text)?;
    drive(&scheduler);
    scheduler.get_expression(&id)
}
