// src/dag/graph.rs

use std::collections::HashMap;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use uuid::Uuid;

use crate::dag::task::{Operand, Task};
use crate::dag::TaskId;
use crate::errors::{CalcdagError, Result, ValidationError, ValidationErrorKind};
use crate::expr::PostfixToken;

/// Entry on the builder's evaluation stack.
#[derive(Debug, Clone)]
enum StackEntry {
    Literal(f64),
    Placeholder(TaskId),
}

impl From<StackEntry> for Operand {
    fn from(entry: StackEntry) -> Self {
        match entry {
            StackEntry::Literal(value) => Operand::Literal(value),
            StackEntry::Placeholder(id) => Operand::Reference(id),
        }
    }
}

/// Tasks decomposed from one expression, in creation order.
///
/// Built in a single left-to-right pass over the postfix stream where every
/// reference points at a task created earlier in the same pass, so the graph
/// is acyclic by construction and `tasks` is already a valid execution order.
#[derive(Debug, Clone)]
pub struct TaskGraph {
    tasks: Vec<Task>,
    root: TaskId,
}

impl TaskGraph {
    /// Decompose `postfix` into tasks owned by `expression_id`.
    pub fn build(
        expression_id: &str,
        postfix: &[PostfixToken],
    ) -> std::result::Result<Self, ValidationError> {
        Self::build_with_ids(expression_id, postfix, || Uuid::new_v4().to_string())
    }

    /// Same as [`TaskGraph::build`] with a caller-supplied id generator.
    pub fn build_with_ids(
        expression_id: &str,
        postfix: &[PostfixToken],
        mut next_id: impl FnMut() -> TaskId,
    ) -> std::result::Result<Self, ValidationError> {
        let mut stack: Vec<StackEntry> = Vec::new();
        let mut tasks: Vec<Task> = Vec::new();

        for token in postfix {
            match token {
                PostfixToken::Number(value) => stack.push(StackEntry::Literal(*value)),
                PostfixToken::Operator(op) => {
                    let (Some(rhs), Some(lhs)) = (stack.pop(), stack.pop()) else {
                        return Err(ValidationError::new(ValidationErrorKind::TooFewOperands));
                    };

                    let task = Task::new(
                        next_id(),
                        expression_id.to_string(),
                        *op,
                        lhs.into(),
                        rhs.into(),
                    );
                    stack.push(StackEntry::Placeholder(task.id.clone()));
                    tasks.push(task);
                }
            }
        }

        if stack.len() > 1 {
            return Err(ValidationError::new(ValidationErrorKind::TooManyOperands));
        }

        match stack.pop() {
            Some(StackEntry::Placeholder(root)) => Ok(Self { tasks, root }),
            // A bare number has no operation to distribute.
            Some(StackEntry::Literal(_)) => {
                Err(ValidationError::new(ValidationErrorKind::TooFewTokens))
            }
            None => Err(ValidationError::new(ValidationErrorKind::TooFewOperands)),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// The single task nothing depends on.
    pub fn root_id(&self) -> &str {
        &self.root
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Tasks that read the output of `id`.
    pub fn dependents_of(&self, id: &str) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| t.depends_on.iter().any(|dep| dep == id))
            .collect()
    }

    /// Tasks with no unresolved operands at decomposition time.
    pub fn initially_ready(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| t.is_ready())
    }

    /// Tasks ordered so every dependency precedes its dependents.
    ///
    /// Edge direction: dependency -> dependent.
    pub fn topological_order(&self) -> Result<Vec<&Task>> {
        let index: HashMap<&str, usize> = self
            .tasks
            .iter()
            .enumerate()
            .map(|(i, t)| (t.id.as_str(), i))
            .collect();

        let mut graph: DiGraphMap<usize, ()> = DiGraphMap::new();
        for (i, task) in self.tasks.iter().enumerate() {
            graph.add_node(i);
            for dep in &task.depends_on {
                let Some(&from) = index.get(dep.as_str()) else {
                    return Err(CalcdagError::InvariantViolation(format!(
                        "task '{}' depends on unknown task '{}'",
                        task.id, dep
                    )));
                };
                graph.add_edge(from, i, ());
            }
        }

        match toposort(&graph, None) {
            Ok(order) => Ok(order.into_iter().map(|i| &self.tasks[i]).collect()),
            Err(cycle) => Err(CalcdagError::InvariantViolation(format!(
                "cycle detected in task graph involving task '{}'",
                self.tasks[cycle.node_id()].id
            ))),
        }
    }
}
