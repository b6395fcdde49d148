//! Configuration for the assignment engine.
//!
//! Supports YAML file and environment variable overrides.

use serde::Deserialize;
use std::path::Path;

/// Engine configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Command handler settings.
    pub engine: EngineSettings,
    /// In-process bus settings.
    pub bus: BusSettings,
}

/// Command handler settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Attempts for the optimistic save loop before a version conflict
    /// is surfaced to the caller.
    pub save_retry_attempts: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            save_retry_attempts: 3,
        }
    }
}

/// In-process bus settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BusSettings {
    /// Broadcast channel capacity for the channel event bus.
    pub channel_capacity: usize,
}

impl Default for BusSettings {
    fn default() -> Self {
        Self {
            channel_capacity: 1024,
        }
    }
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables
    /// 2. Config file
    /// 3. Defaults
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("HANDOVER_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());

        let mut config = if Path::new(&config_path).exists() {
            Self::from_file(&config_path)?
        } else {
            Self::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Load configuration from a YAML file.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;

        serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(attempts) = std::env::var("SAVE_RETRY_ATTEMPTS") {
            if let Ok(n) = attempts.parse() {
                self.engine.save_retry_attempts = n;
            }
        }

        if let Ok(capacity) = std::env::var("BUS_CHANNEL_CAPACITY") {
            if let Ok(n) = capacity.parse() {
                self.bus.channel_capacity = n;
            }
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{0}': {1}")]
    FileRead(String, String),

    #[error("Failed to parse config: {0}")]
    Parse(String),
}
