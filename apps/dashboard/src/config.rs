//! Dashboard configuration.
//!
//! Read from `~/.config/partcount/config.json` (`%APPDATA%\partcount` on
//! Windows). Every field is optional; `PARTCOUNT_ENDPOINT` overrides the
//! station address.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use partcount_protocol::constants::{DEFAULT_ENDPOINT, RECONNECT_DELAY};
use partcount_stream::{ReconnectConfig, StreamError};

/// Environment variable overriding the configured endpoint.
pub const ENDPOINT_ENV: &str = "PARTCOUNT_ENDPOINT";

/// Errors from loading the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Endpoint(#[from] StreamError),
}

/// On-disk shape of the config file.
#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    endpoint: Option<String>,
    #[serde(default)]
    reconnect_delay_ms: Option<u64>,
}

/// Resolved dashboard configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// WebSocket address of the station.
    pub endpoint: String,
    /// Wait between a closed connection and the next attempt.
    pub reconnect_delay: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            reconnect_delay: RECONNECT_DELAY,
        }
    }
}

impl DashboardConfig {
    /// Loads the config file, applies the environment override and
    /// validates the endpoint.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(&config_path())?;
        config.apply_endpoint_override(std::env::var(ENDPOINT_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    /// Reads `path`. A missing file yields defaults; an unparseable one is
    /// logged and also yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)?;
        match serde_json::from_str::<ConfigFile>(&content) {
            Ok(file) => {
                if let Some(endpoint) = file.endpoint.filter(|e| !e.trim().is_empty()) {
                    config.endpoint = endpoint.trim().to_string();
                }
                if let Some(ms) = file.reconnect_delay_ms.filter(|ms| *ms > 0) {
                    config.reconnect_delay = Duration::from_millis(ms);
                }
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config, using defaults"
                );
            }
        }
        Ok(config)
    }

    /// Replaces the endpoint with a non-empty override.
    pub fn apply_endpoint_override(&mut self, value: Option<String>) {
        if let Some(endpoint) = value.filter(|e| !e.trim().is_empty()) {
            tracing::debug!(endpoint = %endpoint, "endpoint overridden from {ENDPOINT_ENV}");
            self.endpoint = endpoint.trim().to_string();
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        partcount_stream::client::validate_endpoint(&self.endpoint)?;
        Ok(())
    }

    pub fn reconnect_config(&self) -> ReconnectConfig {
        ReconnectConfig::with_delay(self.reconnect_delay)
    }
}

fn config_path() -> PathBuf {
    config_base_dir().join("partcount").join("config.json")
}

fn config_base_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        PathBuf::from(appdata)
    }

    #[cfg(not(target_os = "windows"))]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        PathBuf::from(home).join(".config")
    }
}
