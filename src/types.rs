// src/types.rs

//! Status vocabularies shared by the scheduler, the store and the CLI.

use std::fmt;
use std::str::FromStr;

/// Lifecycle of a submitted expression.
///
/// `Pending -> InProgress -> Complete`, with `Error` reachable from either
/// non-terminal state. `Complete` and `Error` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpressionStatus {
    Pending,
    InProgress,
    Complete,
    Error,
}

impl ExpressionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, ExpressionStatus::Complete | ExpressionStatus::Error)
    }

    /// Whether `self -> next` is an edge of the expression state machine.
    pub fn can_transition_to(self, next: ExpressionStatus) -> bool {
        use ExpressionStatus::*;
        match self {
            Pending => matches!(next, InProgress | Error),
            InProgress => matches!(next, Complete | Error),
            Complete | Error => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ExpressionStatus::Pending => "PENDING",
            ExpressionStatus::InProgress => "IN_PROGRESS",
            ExpressionStatus::Complete => "COMPLETE",
            ExpressionStatus::Error => "ERROR",
        }
    }
}

impl Default for ExpressionStatus {
    fn default() -> Self {
        ExpressionStatus::Pending
    }
}

impl fmt::Display for ExpressionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpressionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PENDING" => Ok(ExpressionStatus::Pending),
            "IN_PROGRESS" => Ok(ExpressionStatus::InProgress),
            "COMPLETE" => Ok(ExpressionStatus::Complete),
            "ERROR" => Ok(ExpressionStatus::Error),
            other => Err(format!(
                "invalid expression status: {other} (expected PENDING, IN_PROGRESS, COMPLETE or ERROR)"
            )),
        }
    }
}

/// Lifecycle of a single binary-operation task.
///
/// `Pending -> Running -> Done`, with `Error` reachable from `Pending` or
/// `Running`. `Done` and `Error` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    Pending,
    Running,
    Done,
    Error,
}

impl TaskStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Done | TaskStatus::Error)
    }

    pub fn can_transition_to(self, next: TaskStatus) -> bool {
        use TaskStatus::*;
        match self {
            Pending => matches!(next, Running | Error),
            Running => matches!(next, Done | Error),
            Done | Error => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::Running => "RUNNING",
            TaskStatus::Done => "DONE",
            TaskStatus::Error => "ERROR",
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Pending
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PENDING" => Ok(TaskStatus::Pending),
            "RUNNING" => Ok(TaskStatus::Running),
            "DONE" => Ok(TaskStatus::Done),
            "ERROR" => Ok(TaskStatus::Error),
            other => Err(format!(
                "invalid task status: {other} (expected PENDING, RUNNING, DONE or ERROR)"
            )),
        }
    }
}
