//! Runtime settings: prediction endpoint, request timeout, log file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Environment variable overriding [`Settings::endpoint`].
pub const ENDPOINT_VAR: &str = "OXO_ENDPOINT";
/// Environment variable overriding [`Settings::timeout_ms`].
pub const TIMEOUT_VAR: &str = "OXO_TIMEOUT_MS";

/// Resolved application settings.
///
/// Layered as defaults, then an optional TOML file, then environment
/// variables, then command-line flags.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[serde(default)]
#[setters(prefix = "with_")]
pub struct Settings {
    /// URL of the prediction endpoint.
    endpoint: String,

    /// Milliseconds to wait for the AI before giving up.
    timeout_ms: u64,

    /// File the terminal UI writes its log to.
    log_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3001/api".to_string(),
            timeout_ms: 10_000,
            log_file: PathBuf::from("oxo.log"),
        }
    }
}

impl Settings {
    /// Loads settings from a TOML file. Missing keys keep their defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading settings from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let settings: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(endpoint = %settings.endpoint, "Settings loaded");
        Ok(settings)
    }

    /// Loads `path` if it exists, otherwise starts from defaults, then
    /// applies the process environment.
    #[instrument(skip(path), fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let settings = if path.exists() {
            Self::from_file(path)?
        } else {
            debug!("Config file not found, using defaults");
            Self::default()
        };
        settings.with_env(|key| std::env::var(key).ok())
    }

    /// Applies `OXO_ENDPOINT` / `OXO_TIMEOUT_MS` as returned by `lookup`.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(endpoint) = lookup(ENDPOINT_VAR) {
            debug!(%endpoint, "Endpoint overridden by environment");
            self.endpoint = endpoint;
        }
        if let Some(raw) = lookup(TIMEOUT_VAR) {
            self.timeout_ms = raw
                .trim()
                .parse()
                .map_err(|e| ConfigError::new(format!("{} must be an integer: {}", TIMEOUT_VAR, e)))?;
        }
        self.validate()
    }

    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Rejects settings that cannot work.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(ConfigError::new(format!(
                "Endpoint must be an http(s) URL, got {:?}",
                self.endpoint
            )));
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::new("Timeout must be greater than zero".to_string()));
        }
        Ok(self)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_overrides() {
        let settings = Settings::default()
            .with_env(|key| match key {
                ENDPOINT_VAR => Some("https://ai.example/api".to_string()),
                TIMEOUT_VAR => Some("2500".to_string()),
                _ => None,
            })
            .expect("valid overrides");
        assert_eq!(settings.endpoint(), "https://ai.example/api");
        assert_eq!(settings.timeout(), Duration::from_millis(2500));
    }

    #[test]
    fn test_bad_timeout_rejected() {
        let err = Settings::default()
            .with_env(|key| (key == TIMEOUT_VAR).then(|| "soon".to_string()))
            .unwrap_err();
        assert!(err.message.contains(TIMEOUT_VAR));
    }

    #[test]
    fn test_non_http_endpoint_rejected() {
        let err = Settings::default()
            .with_endpoint("ftp://nope".to_string())
            .validate()
            .unwrap_err();
        assert!(err.message.contains("http"));
    }
}
