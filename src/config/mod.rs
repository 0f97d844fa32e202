//! Configuration management.
//!
//! This module handles:
//! - Environment variable loading
//! - Configuration validation
//! - Default value handling
//! - Secure API key storage via [`SecretString`]
//!
//! # Example
//!
//! ```
//! use mcp_brain::config::{Config, LogFormat, SecretString, DEFAULT_MODEL};
//!
//! // Create a config directly (use Config::from_env() in production)
//! let config = Config {
//!     api_key: SecretString::new("sk-ant-example-key"),
//!     model: DEFAULT_MODEL.to_string(),
//!     log_level: "info".to_string(),
//!     log_format: LogFormat::Text,
//!     request_timeout_ms: 30_000,
//!     max_retries: 3,
//!     pacing_delay_ms: 150,
//!     session_max_age_secs: 3600,
//!     session_sweep_interval_secs: 300,
//! };
//!
//! // API key is protected from accidental logging
//! let debug = format!("{:?}", config);
//! assert!(debug.contains("<REDACTED>"));
//! assert!(!debug.contains("sk-ant-example-key"));
//! ```

mod secret;
mod validation;

pub use secret::SecretString;
pub use validation::{
    validate_config, MAX_PACING_DELAY_MS, MAX_RETRIES, MAX_SESSION_AGE_SECS,
    MAX_SWEEP_INTERVAL_SECS, MAX_TIMEOUT_MS, MIN_SESSION_AGE_SECS, MIN_SWEEP_INTERVAL_SECS,
    MIN_TIMEOUT_MS,
};

use std::time::Duration;

use crate::error::ConfigError;

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default request timeout in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Default maximum retry attempts.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default Anthropic model.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Default pause inserted after each generator call.
pub const DEFAULT_PACING_DELAY_MS: u64 = 150;

/// Default idle age after which a sequential-thinking session is swept.
pub const DEFAULT_SESSION_MAX_AGE_SECS: u64 = 3600;

/// Default period of the session sweeper task.
pub const DEFAULT_SESSION_SWEEP_INTERVAL_SECS: u64 = 300;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::InvalidValue {
                var: "LOG_FORMAT".into(),
                reason: format!("unknown format '{other}', expected text or json"),
            }),
        }
    }
}

/// Application configuration.
///
/// Use [`Config::from_env`] to load configuration from environment variables.
/// The `api_key` field uses [`SecretString`] to prevent accidental logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Anthropic API key (protected from logging via [`SecretString`]).
    pub api_key: SecretString,
    /// Anthropic model to use.
    pub model: String,
    /// Log level filter (error, warn, info, debug, trace).
    pub log_level: String,
    /// Log output format.
    pub log_format: LogFormat,
    /// Request timeout in milliseconds.
    pub request_timeout_ms: u64,
    /// Maximum retry attempts.
    pub max_retries: u32,
    /// Pause after each generator call, in milliseconds.
    pub pacing_delay_ms: u64,
    /// Idle age after which a sequential-thinking session is dropped.
    pub session_max_age_secs: u64,
    /// How often the host sweeps expired sessions.
    pub session_sweep_interval_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `ANTHROPIC_API_KEY`: Anthropic API key
    ///
    /// Optional environment variables (with defaults):
    /// - `ANTHROPIC_MODEL`: Model to use (default: `claude-sonnet-4-20250514`)
    /// - `LOG_LEVEL`: Logging level (default: `info`)
    /// - `LOG_FORMAT`: `text` or `json` (default: `text`)
    /// - `REQUEST_TIMEOUT_MS`: Request timeout (default: `30000`)
    /// - `MAX_RETRIES`: Maximum retry attempts (default: `3`)
    /// - `PACING_DELAY_MS`: Pause after each generator call (default: `150`)
    /// - `SESSION_MAX_AGE_SECS`: Idle session lifetime (default: `3600`)
    /// - `SESSION_SWEEP_INTERVAL_SECS`: Sweeper period (default: `300`)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `ANTHROPIC_API_KEY` is missing, a numeric
    /// variable does not parse, or any value fails [`validate_config`].
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors)
        let _ = dotenvy::dotenv();

        let api_key =
            std::env::var("ANTHROPIC_API_KEY").map_err(|_| ConfigError::MissingRequired {
                var: "ANTHROPIC_API_KEY".into(),
            })?;

        let model = std::env::var("ANTHROPIC_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());
        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.into());
        let log_format = match std::env::var("LOG_FORMAT") {
            Ok(value) => value.parse()?,
            Err(_) => LogFormat::default(),
        };

        let config = Self {
            api_key: SecretString::new(api_key),
            model,
            log_level,
            log_format,
            request_timeout_ms: env_number("REQUEST_TIMEOUT_MS", DEFAULT_REQUEST_TIMEOUT_MS)?,
            max_retries: env_number("MAX_RETRIES", DEFAULT_MAX_RETRIES)?,
            pacing_delay_ms: env_number("PACING_DELAY_MS", DEFAULT_PACING_DELAY_MS)?,
            session_max_age_secs: env_number(
                "SESSION_MAX_AGE_SECS",
                DEFAULT_SESSION_MAX_AGE_SECS,
            )?,
            session_sweep_interval_secs: env_number(
                "SESSION_SWEEP_INTERVAL_SECS",
                DEFAULT_SESSION_SWEEP_INTERVAL_SECS,
            )?,
        };

        validate_config(&config)?;
        Ok(config)
    }

    /// Configuration with every optional value at its default.
    #[must_use]
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key),
            model: DEFAULT_MODEL.into(),
            log_level: DEFAULT_LOG_LEVEL.into(),
            log_format: LogFormat::default(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            max_retries: DEFAULT_MAX_RETRIES,
            pacing_delay_ms: DEFAULT_PACING_DELAY_MS,
            session_max_age_secs: DEFAULT_SESSION_MAX_AGE_SECS,
            session_sweep_interval_secs: DEFAULT_SESSION_SWEEP_INTERVAL_SECS,
        }
    }

    /// Pause inserted after each generator call.
    #[must_use]
    pub const fn pacing_delay(&self) -> Duration {
        Duration::from_millis(self.pacing_delay_ms)
    }

    /// Idle lifetime of a registry session.
    #[must_use]
    pub const fn session_max_age(&self) -> Duration {
        Duration::from_secs(self.session_max_age_secs)
    }

    /// Period of the registry sweeper.
    #[must_use]
    pub const fn session_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.session_sweep_interval_secs)
    }
}

/// Read `name` as a number, falling back to `default` when unset.
fn env_number<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Err(_) => Ok(default),
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            var: name.into(),
            reason: format!("'{raw}' is not a non-negative integer"),
        }),
    }
}
