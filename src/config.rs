//! Runtime configuration.
//!
//! The host passes a [`RuntimeConfig`] into the runtime at construction.
//! Debug verbosity and the worker index are read once at startup and are
//! read-only for the lifetime of the runtime; there is no ambient global
//! state.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Runtime configuration supplied by the host.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RuntimeConfig {
    /// Emit "no handler" and "skipping disabled module" notices.
    /// When false, dispatch is silent on those conditions.
    #[serde(default)]
    pub debug: bool,
    /// Index of the worker this runtime instance belongs to.
    /// -1 when the host runs a single undifferentiated worker.
    #[serde(default = "default_worker_index")]
    pub worker_index: i32,
}

fn default_worker_index() -> i32 {
    -1
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            debug: false,
            worker_index: default_worker_index(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: RuntimeConfig = toml::from_str(&content)?;
        Ok(config)
    }
}
