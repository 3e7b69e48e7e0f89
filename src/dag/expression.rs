// src/dag/expression.rs

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::dag::{ExpressionId, TaskId};
use crate::errors::{CalcdagError, Result};
use crate::types::ExpressionStatus;

/// A submitted expression and its lifecycle.
///
/// `result` is set only together with `Complete`, `error` only together with
/// `Error`; both are written exclusively through [`Expression::complete`] and
/// [`Expression::fail`].
#[derive(Debug, Clone)]
pub struct Expression {
    pub id: ExpressionId,
    pub text: String,
    pub status: ExpressionStatus,
    pub result: Option<f64>,
    pub error: Option<String>,
    /// The task with no dependents; its result becomes the expression's.
    pub root_task: Option<TaskId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Expression {
    pub fn new(text: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            status: ExpressionStatus::Pending,
            result: None,
            error: None,
            root_task: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Move to `next`. Re-applying the current status is a no-op; any other
    /// edge outside the state machine is rejected and leaves `self` intact.
    pub fn transition(&mut self, next: ExpressionStatus) -> Result<()> {
        if self.status == next {
            return Ok(());
        }
        if !self.status.can_transition_to(next) {
            return Err(self.rejected(next));
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn complete(&mut self, value: f64) -> Result<()> {
        if self.status == ExpressionStatus::Complete {
            return Err(self.rejected(ExpressionStatus::Complete));
        }
        self.transition(ExpressionStatus::Complete)?;
        self.result = Some(value);
        Ok(())
    }

    pub fn fail(&mut self, message: &str) -> Result<()> {
        if self.status == ExpressionStatus::Error {
            return Err(self.rejected(ExpressionStatus::Error));
        }
        self.transition(ExpressionStatus::Error)?;
        self.error = Some(message.to_string());
        Ok(())
    }

    fn rejected(&self, next: ExpressionStatus) -> CalcdagError {
        CalcdagError::InvalidTransition {
            entity: "expression",
            id: self.id.clone(),
            from: self.status.to_string(),
            to: next.to_string(),
        }
    }
}
