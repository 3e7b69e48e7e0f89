// src/dag/scheduler_step.rs

//! Step-by-step result type for the scheduler.

use crate::dag::{ExpressionId, TaskId};
use crate::types::ExpressionStatus;

/// Structured result of one `submit_result` / `fail` call.
///
/// Tests use it to assert exactly what changed without re-reading the store.
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulerStep {
    /// Expression owning the task that was reported.
    pub expression_id: ExpressionId,
    /// Dependents whose last unresolved operand was filled by this step, in
    /// the order they were queued.
    pub newly_ready: Vec<TaskId>,
    /// Expression status after the step.
    pub expression_status: ExpressionStatus,
    /// Whether this step moved the expression into a terminal state.
    pub expression_finished: bool,
}
