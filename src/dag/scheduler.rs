// src/dag/scheduler.rs

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::dag::expression::Expression;
use crate::dag::graph::TaskGraph;
use crate::dag::scheduler_step::SchedulerStep;
use crate::dag::state_manager::StateManager;
use crate::dag::task::Task;
use crate::dag::ExpressionId;
use crate::errors::{CalcdagError, Result};
use crate::expr;
use crate::store::{InMemoryStore, Store};
use crate::types::{ExpressionStatus, TaskStatus};

/// The single logical scheduler.
///
/// It is responsible for:
/// - turning submitted text into an expression plus its task graph
/// - handing each ready task to exactly one caller (`dispatch`)
/// - resolving dependents when a result arrives (`submit_result`)
/// - failing the owning expression when a task fails (`fail`)
///
/// Every public operation holds the store lock for its whole duration, so
/// dispatch, result propagation and completion detection never interleave.
#[derive(Debug, Default)]
pub struct Scheduler<S: Store = InMemoryStore> {
    store: Mutex<S>,
}

impl Scheduler<InMemoryStore> {
    pub fn in_memory() -> Self {
        Self::new(InMemoryStore::new())
    }
}

impl<S: Store> Scheduler<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    /// Validate, decompose and persist `text`.
    ///
    /// Invalid text is rejected with [`CalcdagError::Validation`] before
    /// anything is stored. On success the expression is `InProgress` and its
    /// dependency-free tasks are queued.
    pub fn submit_expression(&self, text: &str) -> Result<ExpressionId> {
        let expression = Expression::new(text);
        let graph = expr::parse(text)
            .and_then(|postfix| TaskGraph::build(&expression.id, &postfix))
            .map_err(|err| {
                warn!(expression = %text, error = %err, "rejected expression");
                CalcdagError::from(err)
            })?;

        let id = expression.id.clone();
        let root = graph.root_id().to_string();
        let task_count = graph.len();

        let mut store = self.store.lock();
        store.save_expression(expression)?;
        store.save_tasks(graph.into_tasks())?;
        store.set_root_task(&id, &root)?;
        store.update_expression_status(&id, ExpressionStatus::InProgress)?;
        let ready = StateManager::new(&mut *store).queue_initially_ready(&id)?;

        info!(
            expression = %id,
            text = %text,
            tasks = task_count,
            ready = ready.len(),
            "expression accepted"
        );
        Ok(id)
    }

    /// Hand out the oldest ready task and mark it `Running`.
    ///
    /// `Ok(None)` means nothing is ready right now. Ready tasks whose
    /// expression has already reached a terminal state are dropped from the
    /// queue and stay `Pending`.
    pub fn dispatch(&self) -> Result<Option<Task>> {
        let mut store = self.store.lock();

        while let Some(task) = store.next_ready_task()? {
            let expression = store.get_expression(&task.expression_id)?;
            if expression.status.is_terminal() {
                debug!(
                    task = %task.id,
                    expression = %task.expression_id,
                    status = %expression.status,
                    "skipping ready task of finished expression"
                );
                continue;
            }

            if task.unresolved_count() > 0 {
                return Err(CalcdagError::InvariantViolation(format!(
                    "task '{}' was queued with unresolved operands",
                    task.id
                )));
            }

            store.update_task_status(&task.id, TaskStatus::Running)?;
            let task = store.get_task(&task.id)?;
            debug!(
                task = %task.id,
                expression = %task.expression_id,
                op = %task.operator,
                "dispatched task"
            );
            return Ok(Some(task));
        }

        Ok(None)
    }

    /// Record a computed value for a `Running` task.
    ///
    /// Fills the value into every dependent, queues those that became ready
    /// and completes the expression once all of its tasks are `Done`.
    pub fn submit_result(&self, task_id: &str, value: f64) -> Result<SchedulerStep> {
        let mut store = self.store.lock();

        let task = store.get_task(task_id)?;
        let before = store.get_expression(&task.expression_id)?.status;

        store.update_task_result(task_id, value)?;
        debug!(task = %task_id, result = value, "task done");

        let mut manager = StateManager::new(&mut *store);
        let newly_ready = manager.resolve_dependents(task_id, value)?;
        let expression_status = manager.refresh_expression(&task.expression_id)?;

        Ok(SchedulerStep {
            expression_id: task.expression_id,
            newly_ready,
            expression_status,
            expression_finished: !before.is_terminal() && expression_status.is_terminal(),
        })
    }

    /// Mark a task failed and fail its expression with the same message.
    ///
    /// Dependents are left unresolved and are never dispatched.
    pub fn fail(&self, task_id: &str, message: &str) -> Result<SchedulerStep> {
        let mut store = self.store.lock();

        let task = store.get_task(task_id)?;
        let before = store.get_expression(&task.expression_id)?.status;

        store.update_task_error(task_id, message)?;
        warn!(task = %task_id, error = %message, "task failed");

        let expression_status =
            StateManager::new(&mut *store).refresh_expression(&task.expression_id)?;

        Ok(SchedulerStep {
            expression_id: task.expression_id,
            newly_ready: Vec::new(),
            expression_status,
            expression_finished: !before.is_terminal() && expression_status.is_terminal(),
        })
    }

    pub fn get_expression(&self, id: &str) -> Result<Expression> {
        self.store.lock().get_expression(id)
    }

    /// All expressions in submission order.
    pub fn list_expressions(&self) -> Result<Vec<Expression>> {
        self.store.lock().list_expressions()
    }

    pub fn get_task(&self, id: &str) -> Result<Task> {
        self.store.lock().get_task(id)
    }

    /// Tasks of one expression in creation order.
    pub fn tasks_for_expression(&self, expression_id: &str) -> Result<Vec<Task>> {
        self.store.lock().tasks_for_expression(expression_id)
    }
}
