#![allow(dead_code)]

use calcdag::config::model::{ClientSection, LatencySection, WorkersSection};
use calcdag::config::{ConfigFile, RawConfigFile};
use calcdag::worker::WorkerOptions;

/// Builder for `ConfigFile` to simplify test setup.
///
/// Starts from the built-in defaults; [`ConfigBuilder::fast`] shrinks every
/// duration so end-to-end tests finish in milliseconds.
pub struct ConfigBuilder {
    config: RawConfigFile,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                workers: WorkersSection::default(),
                latency: LatencySection::default(),
                client: ClientSection::default(),
            },
        }
    }

    /// 1ms latencies, 2ms idle backoff, 5ms poll interval, 1s grace.
    pub fn fast() -> Self {
        Self::new()
            .with_latency("1ms")
            .with_idle_backoff("2ms")
            .with_poll_interval("5ms")
            .with_shutdown_grace("1s")
    }

    pub fn with_workers(mut self, count: usize) -> Self {
        self.config.workers.count = count;
        self
    }

    pub fn with_idle_backoff(mut self, value: &str) -> Self {
        self.config.workers.idle_backoff = value.to_string();
        self
    }

    pub fn with_shutdown_grace(mut self, value: &str) -> Self {
        self.config.workers.shutdown_grace = value.to_string();
        self
    }

    /// Same latency for every operation.
    pub fn with_latency(mut self, value: &str) -> Self {
        let latency = &mut self.config.latency;
        for slot in [
            &mut latency.addition,
            &mut latency.subtraction,
            &mut latency.multiplication,
            &mut latency.division,
            &mut latency.default,
        ] {
            *slot = value.to_string();
        }
        self
    }

    pub fn with_division_latency(mut self, value: &str) -> Self {
        self.config.latency.division = value.to_string();
        self
    }

    pub fn with_poll_interval(mut self, value: &str) -> Self {
        self.config.client.poll_interval = value.to_string();
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }

    pub fn worker_options(self) -> WorkerOptions {
        WorkerOptions::from_config(&self.build())
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
