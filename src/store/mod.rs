// src/store/mod.rs

//! Persistence boundary for expressions and tasks.
//!
//! The scheduler is the only writer and serializes every call behind its own
//! lock, so implementations take `&mut self` and need no internal locking.
//! [`memory::InMemoryStore`] is the in-process implementation.

pub mod memory;

use crate::dag::{Expression, Task, TaskId};
use crate::errors::Result;
use crate::types::{ExpressionStatus, TaskStatus};

pub use memory::InMemoryStore;

pub trait Store: Send {
    // --- expressions ---

    fn save_expression(&mut self, expression: Expression) -> Result<()>;
    fn get_expression(&self, id: &str) -> Result<Expression>;
    fn update_expression_status(&mut self, id: &str, status: ExpressionStatus) -> Result<()>;
    /// Record the final value and move to `Complete`.
    fn update_expression_result(&mut self, id: &str, value: f64) -> Result<()>;
    /// Record the failure message and move to `Error`.
    fn update_expression_error(&mut self, id: &str, message: &str) -> Result<()>;
    fn set_root_task(&mut self, id: &str, root: &str) -> Result<()>;
    /// All expressions in submission order.
    fn list_expressions(&self) -> Result<Vec<Expression>>;

    // --- tasks ---

    fn save_task(&mut self, task: Task) -> Result<()>;

    fn save_tasks(&mut self, tasks: Vec<Task>) -> Result<()> {
        for task in tasks {
            self.save_task(task)?;
        }
        Ok(())
    }

    fn get_task(&self, id: &str) -> Result<Task>;
    fn update_task_status(&mut self, id: &str, status: TaskStatus) -> Result<()>;
    /// Record the computed value and move `Running -> Done`.
    fn update_task_result(&mut self, id: &str, value: f64) -> Result<()>;
    /// Record the failure message and move to `Error`.
    fn update_task_error(&mut self, id: &str, message: &str) -> Result<()>;

    /// Substitute `value` for every reference to `producer` in `dependent`.
    /// Returns the updated dependent.
    fn resolve_dependency(&mut self, dependent: &str, producer: &str, value: f64) -> Result<Task>;

    /// Append a task to the ready queue. Queuing the same task twice is a
    /// no-op.
    fn mark_ready(&mut self, id: &str) -> Result<()>;
    /// Pop the oldest ready task, if any. Does not change its status.
    fn next_ready_task(&mut self) -> Result<Option<Task>>;

    /// Tasks that read the output of `id`.
    fn get_dependents(&self, id: &str) -> Result<Vec<TaskId>>;
    /// Tasks of one expression in creation order.
    fn tasks_for_expression(&self, expression_id: &str) -> Result<Vec<Task>>;

    fn are_all_tasks_done(&self, expression_id: &str) -> Result<bool> {
        Ok(self
            .tasks_for_expression(expression_id)?
            .iter()
            .all(|t| t.status == TaskStatus::Done))
    }
}
