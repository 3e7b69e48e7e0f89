// src/dag/task.rs

//! Task records: one binary operation each, wired to earlier tasks through
//! [`Operand::Reference`].

use chrono::{DateTime, Utc};

use crate::dag::{ExpressionId, TaskId};
use crate::errors::{CalcdagError, Result};
use crate::expr::Operator;
use crate::types::TaskStatus;

/// One input slot of a task.
///
/// A `Reference` is resolved in place into a `Literal` once the producing
/// task is `Done`. Whether a slot is resolved is decided by the variant,
/// never by the numeric value, so a legitimate `0.0` result is a resolved
/// operand like any other.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Literal(f64),
    Reference(TaskId),
}

impl Operand {
    pub fn literal(&self) -> Option<f64> {
        match self {
            Operand::Literal(value) => Some(*value),
            Operand::Reference(_) => None,
        }
    }

    pub fn reference(&self) -> Option<&str> {
        match self {
            Operand::Literal(_) => None,
            Operand::Reference(id) => Some(id.as_str()),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Operand::Literal(_))
    }
}

#[derive(Debug, Clone)]
pub struct Task {
    pub id: TaskId,
    pub expression_id: ExpressionId,
    pub operator: Operator,
    /// `[lhs, rhs]`, in the order they were popped from the postfix stack.
    pub operands: [Operand; 2],
    /// Ids of the tasks this one reads from. Fixed at construction; operands
    /// are resolved but this list is never rewritten.
    pub depends_on: Vec<TaskId>,
    pub status: TaskStatus,
    pub result: Option<f64>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn new(
        id: TaskId,
        expression_id: ExpressionId,
        operator: Operator,
        lhs: Operand,
        rhs: Operand,
    ) -> Self {
        let depends_on = [&lhs, &rhs]
            .iter()
            .filter_map(|op| op.reference().map(str::to_string))
            .collect();
        let now = Utc::now();

        Self {
            id,
            expression_id,
            operator,
            operands: [lhs, rhs],
            depends_on,
            status: TaskStatus::Pending,
            result: None,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Number of operand slots still waiting on another task.
    pub fn unresolved_count(&self) -> usize {
        self.operands.iter().filter(|op| !op.is_resolved()).count()
    }

    /// `Pending` with every operand resolved.
    pub fn is_ready(&self) -> bool {
        self.status == TaskStatus::Pending && self.unresolved_count() == 0
    }

    /// Both operand values, if fully resolved.
    pub fn arguments(&self) -> Option<(f64, f64)> {
        Some((self.operands[0].literal()?, self.operands[1].literal()?))
    }

    /// Replace every reference to `producer` with `value`.
    ///
    /// Returns the number of slots substituted.
    pub fn resolve(&mut self, producer: &str, value: f64) -> usize {
        let mut substituted = 0;
        for slot in self.operands.iter_mut() {
            if slot.reference() == Some(producer) {
                *slot = Operand::Literal(value);
                substituted += 1;
            }
        }
        if substituted > 0 {
            self.updated_at = Utc::now();
        }
        substituted
    }

    /// Move to `next`, rejecting any edge outside the task state machine.
    pub fn transition(&mut self, next: TaskStatus) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(CalcdagError::InvalidTransition {
                entity: "task",
                id: self.id.clone(),
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// `Running -> Done` with the computed value.
    pub fn complete(&mut self, value: f64) -> Result<()> {
        self.transition(TaskStatus::Done)?;
        self.result = Some(value);
        Ok(())
    }

    /// `Pending | Running -> Error` with the worker's message.
    pub fn fail(&mut self, message: &str) -> Result<()> {
        self.transition(TaskStatus::Error)?;
        self.error = Some(message.to_string());
        Ok(())
    }
}
