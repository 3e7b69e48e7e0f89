// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [workers]
/// count = 4
/// idle_backoff = "100ms"
/// shutdown_grace = "5s"
///
/// [latency]
/// addition = "200ms"
/// division = "1s"
///
/// [client]
/// poll_interval = "50ms"
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub workers: WorkersSection,

    /// Simulated per-operation cost from `[latency]`.
    #[serde(default)]
    pub latency: LatencySection,

    #[serde(default)]
    pub client: ClientSection,
}

/// `[workers]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkersSection {
    /// Number of concurrent worker loops ("computing power").
    #[serde(default = "default_worker_count")]
    pub count: usize,

    /// Sleep between polls when no task is ready.
    #[serde(default = "default_idle_backoff")]
    pub idle_backoff: String,

    /// How long shutdown waits for loops to exit before aborting them.
    #[serde(default = "default_shutdown_grace")]
    pub shutdown_grace: String,
}

fn default_worker_count() -> usize {
    1
}

fn default_idle_backoff() -> String {
    "100ms".to_string()
}

fn default_shutdown_grace() -> String {
    "5s".to_string()
}

fn default_latency() -> String {
    "100ms".to_string()
}

fn default_poll_interval() -> String {
    "50ms".to_string()
}

impl Default for WorkersSection {
    fn default() -> Self {
        Self {
            count: default_worker_count(),
            idle_backoff: default_idle_backoff(),
            shutdown_grace: default_shutdown_grace(),
        }
    }
}

/// `[latency]` section. Each value is a duration string such as `"250ms"`.
#[derive(Debug, Clone, Deserialize)]
pub struct LatencySection {
    #[serde(default = "default_latency")]
    pub addition: String,
    #[serde(default = "default_latency")]
    pub subtraction: String,
    #[serde(default = "default_latency")]
    pub multiplication: String,
    #[serde(default = "default_latency")]
    pub division: String,
    /// Used for any operator without its own entry.
    #[serde(default = "default_latency")]
    pub default: String,
}

impl Default for LatencySection {
    fn default() -> Self {
        Self {
            addition: default_latency(),
            subtraction: default_latency(),
            multiplication: default_latency(),
            division: default_latency(),
            default: default_latency(),
        }
    }
}

/// `[client]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSection {
    #[serde(default = "default_poll_interval")]
    pub poll_interval: String,
}

impl Default for ClientSection {
    fn default() -> Self {
        Self {
            poll_interval: default_poll_interval(),
        }
    }
}

/// Validated configuration.
///
/// Build it from a [`RawConfigFile`] via `TryFrom`; `Default` is equivalent
/// to converting an empty file.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub workers: WorkerSettings,
    pub latencies: OperationLatencies,
    pub poll_interval: Duration,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            workers: WorkerSettings::default(),
            latencies: OperationLatencies::uniform(Duration::from_millis(100)),
            poll_interval: Duration::from_millis(50),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkerSettings {
    pub count: usize,
    pub idle_backoff: Duration,
    pub shutdown_grace: Duration,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            count: 1,
            idle_backoff: Duration::from_millis(100),
            shutdown_grace: Duration::from_secs(5),
        }
    }
}

/// Per-operation simulated latency.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationLatencies {
    pub addition: Duration,
    pub subtraction: Duration,
    pub multiplication: Duration,
    pub division: Duration,
    pub default: Duration,
}

impl OperationLatencies {
    /// Same latency for every operation.
    pub fn uniform(latency: Duration) -> Self {
        Self {
            addition: latency,
            subtraction: latency,
            multiplication: latency,
            division: latency,
            default: latency,
        }
    }

    /// Latency for an operation symbol; unknown symbols get `default`.
    pub fn for_operation(&self, symbol: &str) -> Duration {
        match symbol {
            "+" => self.addition,
            "-" => self.subtraction,
            "*" => self.multiplication,
            "/" => self.division,
            _ => self.default,
        }
    }
}
