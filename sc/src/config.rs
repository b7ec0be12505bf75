//! schoolscope configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main schoolscope configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the scheduling backend
    pub api_server: String,

    /// Path of the menu endpoint, relative to `api_server`
    pub menu_path: String,

    /// HTTP request timeout in milliseconds
    pub timeout_ms: u64,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_server: "http://localhost:8080".to_string(),
            menu_path: "/web/menu".to_string(),
            timeout_ms: 10_000,
            log_level: None,
        }
    }
}

impl Config {
    /// Validate configuration before use
    pub fn validate(&self) -> Result<()> {
        if !(self.api_server.starts_with("http://") || self.api_server.starts_with("https://")) {
            return Err(eyre::eyre!(
                "api_server must be an http(s) URL, got '{}'",
                self.api_server
            ));
        }
        if self.timeout_ms == 0 {
            return Err(eyre::eyre!("timeout_ms must be greater than zero"));
        }
        Ok(())
    }

    /// Full URL of the menu endpoint
    pub fn menu_url(&self) -> String {
        format!(
            "{}/{}",
            self.api_server.trim_end_matches('/'),
            self.menu_path.trim_start_matches('/')
        )
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .schoolscope.yml
        let local_config = PathBuf::from(".schoolscope.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/schoolscope/schoolscope.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("schoolscope").join("schoolscope.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        Ok(Self::default())
    }

    /// Read only the log level, before logging is initialised
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        Self::load(config_path).ok().and_then(|c| c.log_level)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config YAML")?;
        Ok(config)
    }
}
