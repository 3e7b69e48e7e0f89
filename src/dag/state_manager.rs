// src/dag/state_manager.rs

//! Result propagation and expression roll-up.
//!
//! A [`StateManager`] borrows the store for the length of one scheduler
//! critical section; it never takes a lock of its own.

use tracing::{debug, info, warn};

use crate::dag::TaskId;
use crate::errors::{CalcdagError, Result};
use crate::store::Store;
use crate::types::{ExpressionStatus, TaskStatus};

pub struct StateManager<'a, S: Store + ?Sized> {
    store: &'a mut S,
}

impl<'a, S: Store + ?Sized> StateManager<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    /// Substitute `value` into every dependent of `producer` and queue the
    /// ones that have no unresolved operands left.
    ///
    /// Returns the newly queued task ids.
    pub fn resolve_dependents(&mut self, producer: &str, value: f64) -> Result<Vec<TaskId>> {
        let mut ready = Vec::new();

        for dependent in self.store.get_dependents(producer)? {
            let task = self.store.resolve_dependency(&dependent, producer, value)?;
            debug!(
                task = %task.id,
                producer = %producer,
                remaining = task.unresolved_count(),
                "operand resolved"
            );

            if task.is_ready() {
                self.store.mark_ready(&task.id)?;
                ready.push(task.id);
            }
        }

        Ok(ready)
    }

    /// Queue every task of `expression_id` that is ready at decomposition
    /// time, in creation order.
    pub fn queue_initially_ready(&mut self, expression_id: &str) -> Result<Vec<TaskId>> {
        let mut ready = Vec::new();
        for task in self.store.tasks_for_expression(expression_id)? {
            if task.is_ready() {
                self.store.mark_ready(&task.id)?;
                ready.push(task.id);
            }
        }
        Ok(ready)
    }

    /// Re-derive the expression's status from its tasks.
    ///
    /// - any task in `Error`: the expression fails with that task's message;
    /// - every task `Done`: the expression completes with the root's result;
    /// - otherwise, or if already terminal, nothing changes.
    ///
    /// Returns the status after the update.
    pub fn refresh_expression(&mut self, expression_id: &str) -> Result<ExpressionStatus> {
        let expression = self.store.get_expression(expression_id)?;
        if expression.status.is_terminal() {
            return Ok(expression.status);
        }

        let tasks = self.store.tasks_for_expression(expression_id)?;

        if let Some(failed) = tasks.iter().find(|t| t.status == TaskStatus::Error) {
            let message = failed
                .error
                .clone()
                .unwrap_or_else(|| format!("task '{}' failed", failed.id));
            warn!(
                expression = %expression_id,
                task = %failed.id,
                error = %message,
                "expression failed"
            );
            self.store.update_expression_error(expression_id, &message)?;
            return Ok(ExpressionStatus::Error);
        }

        if !tasks.is_empty() && self.store.are_all_tasks_done(expression_id)? {
            let root_id = expression.root_task.ok_or_else(|| {
                CalcdagError::InvariantViolation(format!(
                    "expression '{expression_id}' has no root task"
                ))
            })?;
            let value = self.store.get_task(&root_id)?.result.ok_or_else(|| {
                CalcdagError::InvariantViolation(format!(
                    "root task '{root_id}' is Done without a result"
                ))
            })?;

            info!(expression = %expression_id, result = value, "expression complete");
            self.store.update_expression_result(expression_id, value)?;
            return Ok(ExpressionStatus::Complete);
        }

        Ok(expression.status)
    }
}
