// src/config/validate.rs

use std::time::Duration;

use crate::config::model::{
    ConfigFile, LatencySection, OperationLatencies, RawConfigFile, WorkerSettings,
};
use crate::errors::{CalcdagError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = CalcdagError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        if raw.workers.count == 0 {
            return Err(CalcdagError::ConfigError(
                "[workers].count must be >= 1 (got 0)".to_string(),
            ));
        }

        let workers = WorkerSettings {
            count: raw.workers.count,
            idle_backoff: field_duration("workers.idle_backoff", &raw.workers.idle_backoff)?,
            shutdown_grace: field_duration("workers.shutdown_grace", &raw.workers.shutdown_grace)?,
        };

        Ok(ConfigFile {
            workers,
            latencies: validate_latencies(&raw.latency)?,
            poll_interval: field_duration("client.poll_interval", &raw.client.poll_interval)?,
        })
    }
}

fn validate_latencies(section: &LatencySection) -> Result<OperationLatencies> {
    Ok(OperationLatencies {
        addition: field_duration("latency.addition", &section.addition)?,
        subtraction: field_duration("latency.subtraction", &section.subtraction)?,
        multiplication: field_duration("latency.multiplication", &section.multiplication)?,
        division: field_duration("latency.division", &section.division)?,
        default: field_duration("latency.default", &section.default)?,
    })
}

fn field_duration(field: &str, value: &str) -> Result<Duration> {
    parse_duration(value)
        .map_err(|e| CalcdagError::ConfigError(format!("[{field}] invalid duration: {e}")))
}

/// Parse a duration such as `"250ms"`, `"3s"`, `"2m"` or `"1h"`.
pub fn parse_duration(s: &str) -> std::result::Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| "duration missing unit suffix".to_string())?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;

    let seconds_per_unit = match unit_part.trim().to_lowercase().as_str() {
        "ms" => return Ok(Duration::from_millis(value)),
        "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        unit => {
            return Err(format!(
                "unsupported duration unit '{}'; expected ms, s, m, or h",
                unit
            ));
        }
    };

    value
        .checked_mul(seconds_per_unit)
        .map(Duration::from_secs)
        .ok_or_else(|| format!("duration '{}' is too large", s))
}
