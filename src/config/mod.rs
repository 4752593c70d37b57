//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file (default
//! `~/.decanter/config.toml`) with an environment variable override for
//! the API base URL. A missing file falls back to defaults so the CLI
//! works out of the box against a configured endpoint.

pub mod logging;
pub mod paths;

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::error::{ConfigError, Result};
use logging::LoggingConfig;

/// Environment variable that overrides `[api] base_url`.
pub const API_URL_ENV: &str = "DECANTER_API_URL";

/// Remote API settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the catalog service, without a trailing path.
    pub base_url: String,
    /// Per-request timeout in seconds. Timeouts surface as a remote
    /// error with status 0.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_secs: 15,
        }
    }
}

/// Session behavior settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Minimum settle delay during startup recovery, in milliseconds.
    /// Purely cosmetic (avoids a UI flash in interactive frontends);
    /// defaults to zero.
    pub settle_delay_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { settle_delay_ms: 0 }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from `path`, falling back to defaults when the
    /// file does not exist, then apply environment overrides and
    /// validate.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] on unreadable or unparseable files, or
    /// when no API base URL is configured at all.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let raw = fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
            toml::from_str(&raw).map_err(ConfigError::Parse)?
        } else {
            Self::default()
        };

        if let Ok(url) = std::env::var(API_URL_ENV) {
            config.api.base_url = url;
        }
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.api.base_url.is_empty() {
            return Err(ConfigError::MissingField {
                field: "api.base_url",
            }
            .into());
        }
        Url::parse(&self.api.base_url).map_err(|err| ConfigError::InvalidValue {
            field: "api.base_url",
            reason: err.to_string(),
        })?;

        if self.api.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "api.timeout_secs",
                reason: "must be at least 1".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Initialize the tracing subscriber with this configuration.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.session.settle_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let config: Config = toml::from_str(
            r#"
            [api]
            base_url = "https://api.example.com"
            timeout_secs = 10

            [session]
            settle_delay_ms = 800

            [logging]
            level = "debug"
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "https://api.example.com");
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.settle_delay(), Duration::from_millis(800));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn defaults_apply_to_missing_tables() {
        let config: Config = toml::from_str(
            r#"
            [api]
            base_url = "https://api.example.com"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.timeout_secs, 15);
        assert_eq!(config.session.settle_delay_ms, 0);
    }

    #[test]
    fn missing_base_url_is_rejected() {
        let config = Config::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let mut config = Config::default();
        config.api.base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut config = Config::default();
        config.api.base_url = "https://api.example.com".to_string();
        config.api.timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
