//! Configuration management
//!
//! Optional TOML file read when the module is loaded. Every section and
//! field has a default, so partial files work. `config/default.toml`
//! documents the full format.

use crate::constants::{DEFAULT_GET_COUNT, DEFAULT_MAX_QUEUE_SIZE};
use crate::error::{BridgeError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

// =============================================================================
// Configuration
// =============================================================================

/// Module configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listener: ListenerConfig,
    pub diagnostics: DiagnosticsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Maximum number of captured messages kept in memory
    pub max_queue_size: usize,
    /// Number of messages `Get()` drains when called without a count
    pub default_get_count: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Debug-level internal tracing
    pub verbose: bool,
    /// Explicit tracing filter directive (overrides `verbose`)
    pub filter: Option<String>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            max_queue_size: DEFAULT_MAX_QUEUE_SIZE,
            default_get_count: DEFAULT_GET_COUNT,
        }
    }
}

impl Config {
    /// Check values that parse but make no sense
    pub fn validate(&self) -> Result<()> {
        if self.listener.max_queue_size == 0 {
            return Err(BridgeError::ConfigValidation {
                field: "listener.max_queue_size",
                reason: "must be greater than 0".into(),
            });
        }
        if let Some(filter) = &self.diagnostics.filter {
            if filter.trim().is_empty() {
                return Err(BridgeError::ConfigValidation {
                    field: "diagnostics.filter",
                    reason: "must not be empty".into(),
                });
            }
        }
        Ok(())
    }
}

/// Read, parse and validate a config file
pub fn load_from(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|e| BridgeError::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config: Config = toml::from_str(&content).map_err(|e| BridgeError::ConfigParse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    config.validate()?;
    Ok(config)
}

/// Load config from `path`, falling back to defaults on any failure
pub fn load(path: Option<&Path>) -> Config {
    let path = match path {
        Some(p) => p,
        None => return Config::default(),
    };

    match load_from(path) {
        Ok(config) => config,
        Err(e) => {
            warn!("{}, using defaults", e);
            Config::default()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
