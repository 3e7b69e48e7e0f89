// src/config/mod.rs

//! Configuration loading and validation for calcdag.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk and apply environment overrides
//!   (`loader.rs`).
//! - Turn the raw strings into typed settings (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, load_optional};
pub use model::{ConfigFile, OperationLatencies, RawConfigFile, WorkerSettings};
pub use validate::parse_duration;
