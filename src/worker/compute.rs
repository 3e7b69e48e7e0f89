// src/worker/compute.rs

use crate::errors::ComputeError;
use crate::expr::Operator;
use crate::worker::backend::TaskAssignment;

/// Execute one assignment.
///
/// The operation arrives as a symbol, so an unknown one is a compute failure
/// rather than a parse failure.
pub fn compute(assignment: &TaskAssignment) -> Result<f64, ComputeError> {
    let op = Operator::from_symbol(&assignment.operation)
        .ok_or_else(|| ComputeError::UnsupportedOperator(assignment.operation.clone()))?;
    let (lhs, rhs) = assignment.arguments;
    op.apply(lhs, rhs)
}
