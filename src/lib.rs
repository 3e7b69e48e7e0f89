// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod expr;
pub mod logging;
pub mod store;
pub mod types;
pub mod worker;

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::load_optional;
use crate::dag::{Expression, Operand, TaskGraph};
use crate::engine::Runtime;
use crate::types::ExpressionStatus;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (file, env, CLI overrides)
/// - an in-memory scheduler and worker pool
/// - Ctrl-C handling
/// - printing one line per expression once it is terminal
pub async fn run(args: CliArgs) -> Result<()> {
    let mut cfg = load_optional(args.config.as_deref())?;
    if let Some(workers) = args.workers {
        cfg.workers.count = usize::from(workers);
    }

    if args.dry_run {
        for text in &args.expressions {
            print_dry_run(text);
        }
        return Ok(());
    }

    let cancel = CancellationToken::new();

    // Ctrl-C → stop polling and drain workers.
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            info!("Ctrl+C received; shutting down");
            cancel.cancel();
        });
    }

    let mut runtime = Runtime::from_config(&cfg, cancel.clone());

    let mut accepted = Vec::new();
    for text in &args.expressions {
        match runtime.submit(text) {
            Ok(id) => accepted.push(id),
            Err(e) => println!("{text}\trejected\t{e}"),
        }
    }

    runtime.start();
    let finished = runtime.wait_for(&accepted).await?;
    for expression in &finished {
        print_expression(expression);
    }

    let aborted = runtime.shutdown().await;
    if aborted > 0 {
        warn!(aborted, "some workers had to be aborted");
    }
    cancel.cancel();
    Ok(())
}

fn print_expression(expression: &Expression) {
    let outcome = match expression.status {
        ExpressionStatus::Complete => expression
            .result
            .map(|v| v.to_string())
            .unwrap_or_default(),
        ExpressionStatus::Error => expression.error.clone().unwrap_or_default(),
        _ => String::new(),
    };
    println!(
        "{}\t{}\t{}\t{}",
        expression.id, expression.text, expression.status, outcome
    );
}

/// Dry-run output: tokens, postfix order, tasks and the direct value.
fn print_dry_run(text: &str) {
    println!("calcdag dry-run: {text}");

    let tokens = match expr::tokenize(text) {
        Ok(tokens) => tokens,
        Err(e) => {
            println!("  rejected: {e}");
            return;
        }
    };
    println!("  tokens:  {}", join(tokens.iter()));

    let postfix = match expr::to_postfix(&tokens) {
        Ok(postfix) => postfix,
        Err(e) => {
            println!("  rejected: {e}");
            return;
        }
    };
    println!("  postfix: {}", join(postfix.iter()));

    let mut next = 0;
    let graph = match TaskGraph::build_with_ids("dry-run", &postfix, || {
        next += 1;
        format!("t{next}")
    }) {
        Ok(graph) => graph,
        Err(e) => {
            println!("  rejected: {e}");
            return;
        }
    };

    match graph.topological_order() {
        Ok(order) => {
            println!("  tasks ({}):", order.len());
            for task in order {
                let marker = if task.id == graph.root_id() { " (root)" } else { "" };
                println!(
                    "    - {} = {} {} {}{}",
                    task.id,
                    operand_label(&task.operands[0]),
                    task.operator,
                    operand_label(&task.operands[1]),
                    marker
                );
            }
        }
        Err(e) => println!("  graph error: {e}"),
    }

    match expr::evaluate_postfix(&postfix) {
        Ok(value) => println!("  value:   {value}"),
        Err(e) => println!("  value:   error: {e}"),
    }

    debug!("dry-run complete (no execution)");
}

fn operand_label(operand: &Operand) -> String {
    match operand {
        Operand::Literal(value) => value.to_string(),
        Operand::Reference(id) => format!("@{id}"),
    }
}

fn join<T: std::fmt::Display>(items: impl Iterator<Item = T>) -> String {
    items.map(|t| t.to_string()).collect::<Vec<_>>().join(" ")
}
