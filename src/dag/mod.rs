// src/dag/mod.rs

//! Task decomposition and scheduling.
//!
//! - [`expression`] is the submitted-expression record and its lifecycle.
//! - [`task`] is one binary operation plus its operand slots.
//! - [`graph`] decomposes a postfix stream into a task DAG.
//! - [`scheduler`] owns the store and exposes dispatch / result / failure.
//! - [`scheduler_step`] defines the result type for scheduler steps.
//! - [`state_manager`] propagates results to dependents and rolls task
//!   state up into expression state.

pub mod expression;
pub mod graph;
pub mod scheduler;
pub mod scheduler_step;
pub mod state_manager;
pub mod task;

/// Identifier of a submitted expression (UUID v4 string).
pub type ExpressionId = String;
/// Identifier of a task (UUID v4 string).
pub type TaskId = String;

pub use expression::Expression;
pub use graph::TaskGraph;
pub use scheduler::Scheduler;
pub use scheduler_step::SchedulerStep;
pub use task::{Operand, Task};
