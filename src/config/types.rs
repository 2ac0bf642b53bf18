use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

/// Tracing subscriber settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set (default: "info").
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Prefix log lines with RFC 3339 UTC timestamps (default: true).
    #[serde(default = "default_timestamps")]
    pub timestamps: bool,
}

/// State holder settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Log every commit with the committed state at debug level (default: false).
    #[serde(default)]
    pub trace_commits: bool,
}

/// Runtime that guarded operations are dispatched onto.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Worker threads of the multi-threaded runtime (default: 2).
    #[serde(default = "default_worker_threads")]
    pub worker_threads: usize,
    /// How long to wait for in-flight operations when a scope ends (default: 1000).
    #[serde(default = "default_drain_timeout_ms")]
    pub drain_timeout_ms: u64,
}

impl RuntimeConfig {
    pub fn drain_timeout(&self) -> Duration {
        Duration::from_millis(self.drain_timeout_ms)
    }
}

fn default_log_filter() -> String {
    "info".to_string()
}

fn default_timestamps() -> bool {
    true
}

fn default_worker_threads() -> usize {
    2
}

fn default_drain_timeout_ms() -> u64 {
    1000
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            timestamps: default_timestamps(),
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            worker_threads: default_worker_threads(),
            drain_timeout_ms: default_drain_timeout_ms(),
        }
    }
}
