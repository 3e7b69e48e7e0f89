// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `calcdag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "calcdag",
    version,
    about = "Evaluate arithmetic expressions by scheduling their operations across a worker pool.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// If omitted, `Calcdag.toml` is used when present, else built-in defaults.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Number of worker loops; overrides `[workers].count` and `COMPUTING_POWER`.
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    pub workers: Option<u16>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `CALCDAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Validate and print tokens, postfix order and tasks without running workers.
    #[arg(long)]
    pub dry_run: bool,

    /// Expressions to evaluate, e.g. "(2+3)*4".
    #[arg(value_name = "EXPRESSION", required = true)]
    pub expressions: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
