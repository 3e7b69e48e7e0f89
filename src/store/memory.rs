// src/store/memory.rs

use std::collections::{HashMap, HashSet, VecDeque};

use crate::dag::{Expression, ExpressionId, Task, TaskId};
use crate::errors::{CalcdagError, Result};
use crate::store::Store;
use crate::types::{ExpressionStatus, TaskStatus};

/// Process-local [`Store`] backed by hash maps.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    expressions: HashMap<ExpressionId, Expression>,
    expression_order: Vec<ExpressionId>,
    tasks: HashMap<TaskId, Task>,
    tasks_by_expression: HashMap<ExpressionId, Vec<TaskId>>,
    /// Reverse edges: producer -> tasks reading its output.
    dependents: HashMap<TaskId, Vec<TaskId>>,
    ready: VecDeque<TaskId>,
    queued: HashSet<TaskId>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tasks currently waiting in the ready queue.
    pub fn ready_len(&self) -> usize {
        self.ready.len()
    }

    fn expression_mut(&mut self, id: &str) -> Result<&mut Expression> {
        self.expressions
            .get_mut(id)
            .ok_or_else(|| CalcdagError::ExpressionNotFound(id.to_string()))
    }

    fn task_mut(&mut self, id: &str) -> Result<&mut Task> {
        self.tasks
            .get_mut(id)
            .ok_or_else(|| CalcdagError::TaskNotFound(id.to_string()))
    }
}

fn require_id(kind: &str, id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(CalcdagError::InvariantViolation(format!(
            "{kind} id must not be empty"
        )));
    }
    Ok(())
}

impl Store for InMemoryStore {
    fn save_expression(&mut self, expression: Expression) -> Result<()> {
        require_id("expression", &expression.id)?;
        if self.expressions.contains_key(&expression.id) {
            return Err(CalcdagError::InvariantViolation(format!(
                "expression '{}' already exists",
                expression.id
            )));
        }
        self.expression_order.push(expression.id.clone());
        self.tasks_by_expression
            .entry(expression.id.clone())
            .or_default();
        self.expressions.insert(expression.id.clone(), expression);
        Ok(())
    }

    fn get_expression(&self, id: &str) -> Result<Expression> {
        self.expressions
            .get(id)
            .cloned()
            .ok_or_else(|| CalcdagError::ExpressionNotFound(id.to_string()))
    }

    fn update_expression_status(&mut self, id: &str, status: ExpressionStatus) -> Result<()> {
        self.expression_mut(id)?.transition(status)
    }

    fn update_expression_result(&mut self, id: &str, value: f64) -> Result<()> {
        self.expression_mut(id)?.complete(value)
    }

    fn update_expression_error(&mut self, id: &str, message: &str) -> Result<()> {
        self.expression_mut(id)?.fail(message)
    }

    fn set_root_task(&mut self, id: &str, root: &str) -> Result<()> {
        require_id("task", root)?;
        self.expression_mut(id)?.root_task = Some(root.to_string());
        Ok(())
    }

    fn list_expressions(&self) -> Result<Vec<Expression>> {
        self.expression_order
            .iter()
            .map(|id| self.get_expression(id))
            .collect()
    }

    fn save_task(&mut self, task: Task) -> Result<()> {
        require_id("task", &task.id)?;
        require_id("expression", &task.expression_id)?;
        if self.tasks.contains_key(&task.id) {
            return Err(CalcdagError::InvariantViolation(format!(
                "task '{}' already exists",
                task.id
            )));
        }
        let Some(owned) = self.tasks_by_expression.get_mut(&task.expression_id) else {
            return Err(CalcdagError::ExpressionNotFound(task.expression_id.clone()));
        };
        owned.push(task.id.clone());

        for producer in &task.depends_on {
            let readers = self.dependents.entry(producer.clone()).or_default();
            if !readers.contains(&task.id) {
                readers.push(task.id.clone());
            }
        }
        self.tasks.insert(task.id.clone(), task);
        Ok(())
    }

    fn get_task(&self, id: &str) -> Result<Task> {
        self.tasks
            .get(id)
            .cloned()
            .ok_or_else(|| CalcdagError::TaskNotFound(id.to_string()))
    }

    fn update_task_status(&mut self, id: &str, status: TaskStatus) -> Result<()> {
        self.task_mut(id)?.transition(status)
    }

    fn update_task_result(&mut self, id: &str, value: f64) -> Result<()> {
        self.task_mut(id)?.complete(value)
    }

    fn update_task_error(&mut self, id: &str, message: &str) -> Result<()> {
        self.task_mut(id)?.fail(message)
    }

    fn resolve_dependency(&mut self, dependent: &str, producer: &str, value: f64) -> Result<Task> {
        let task = self.task_mut(dependent)?;
        if task.resolve(producer, value) == 0 {
            return Err(CalcdagError::InvariantViolation(format!(
                "task '{dependent}' has no operand referencing '{producer}'"
            )));
        }
        Ok(task.clone())
    }

    fn mark_ready(&mut self, id: &str) -> Result<()> {
        if !self.tasks.contains_key(id) {
            return Err(CalcdagError::TaskNotFound(id.to_string()));
        }
        if self.queued.insert(id.to_string()) {
            self.ready.push_back(id.to_string());
        }
        Ok(())
    }

    fn next_ready_task(&mut self) -> Result<Option<Task>> {
        while let Some(id) = self.ready.pop_front() {
            self.queued.remove(&id);
            match self.tasks.get(&id) {
                // Stale entries (task failed while queued) are dropped.
                Some(task) if task.status == TaskStatus::Pending => {
                    return Ok(Some(task.clone()));
                }
                Some(_) => continue,
                None => return Err(CalcdagError::TaskNotFound(id)),
            }
        }
        Ok(None)
    }

    fn get_dependents(&self, id: &str) -> Result<Vec<TaskId>> {
        if !self.tasks.contains_key(id) {
            return Err(CalcdagError::TaskNotFound(id.to_string()));
        }
        Ok(self.dependents.get(id).cloned().unwrap_or_default())
    }

    fn tasks_for_expression(&self, expression_id: &str) -> Result<Vec<Task>> {
        let ids = self
            .tasks_by_expression
            .get(expression_id)
            .ok_or_else(|| CalcdagError::ExpressionNotFound(expression_id.to_string()))?;
        ids.iter().map(|id| self.get_task(id)).collect()
    }
}
