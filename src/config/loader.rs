// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{CalcdagError, Result};

/// Environment variables that override values from the file.
pub const ENV_COMPUTING_POWER: &str = "COMPUTING_POWER";
pub const ENV_TIME_ADDITION_MS: &str = "TIME_ADDITION_MS";
pub const ENV_TIME_SUBTRACTION_MS: &str = "TIME_SUBTRACTION_MS";
pub const ENV_TIME_MULTIPLICATIONS_MS: &str = "TIME_MULTIPLICATIONS_MS";
pub const ENV_TIME_DIVISIONS_MS: &str = "TIME_DIVISIONS_MS";

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; durations are not parsed and no
/// environment overrides are applied.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file, apply environment overrides and validate.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let mut raw_config = load_from_path(&path)?;
    apply_env_overrides(&mut raw_config)?;
    ConfigFile::try_from(raw_config)
}

/// Load from an explicit path, or from [`default_config_path`] if present.
///
/// A missing default file is not an error: defaults plus environment
/// overrides apply. A missing *explicit* path is.
pub fn load_optional(path: Option<&Path>) -> Result<ConfigFile> {
    if let Some(path) = path {
        return load_and_validate(path);
    }

    let default_path = default_config_path();
    if default_path.is_file() {
        return load_and_validate(&default_path);
    }

    debug!(path = %default_path.display(), "no config file found; using defaults");
    let mut raw_config = RawConfigFile::default();
    apply_env_overrides(&mut raw_config)?;
    ConfigFile::try_from(raw_config)
}

/// Apply overrides from the process environment.
pub fn apply_env_overrides(raw: &mut RawConfigFile) -> Result<()> {
    apply_overrides_from(raw, |key| std::env::var(key).ok())
}

/// Apply overrides using `lookup` as the variable source.
pub fn apply_overrides_from(
    raw: &mut RawConfigFile,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    if let Some(value) = lookup(ENV_COMPUTING_POWER) {
        raw.workers.count = parse_env_number(ENV_COMPUTING_POWER, &value)? as usize;
    }

    let latency_overrides = [
        (ENV_TIME_ADDITION_MS, &mut raw.latency.addition),
        (ENV_TIME_SUBTRACTION_MS, &mut raw.latency.subtraction),
        (ENV_TIME_MULTIPLICATIONS_MS, &mut raw.latency.multiplication),
        (ENV_TIME_DIVISIONS_MS, &mut raw.latency.division),
    ];
    for (key, slot) in latency_overrides {
        if let Some(value) = lookup(key) {
            let millis = parse_env_number(key, &value)?;
            *slot = format!("{millis}ms");
        }
    }

    Ok(())
}

fn parse_env_number(key: &str, value: &str) -> Result<u64> {
    value.trim().parse().map_err(|_| {
        CalcdagError::ConfigError(format!(
            "environment variable {key} must be a non-negative integer (got '{value}')"
        ))
    })
}

/// Config file looked up when `--config` is not given.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Calcdag.toml")
}
