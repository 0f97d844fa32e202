//! Configuration validation.
//!
//! Range checks for every numeric knob in [`Config`].

use super::Config;
use crate::error::ConfigError;

/// Minimum allowed timeout in milliseconds (1 second).
pub const MIN_TIMEOUT_MS: u64 = 1000;

/// Maximum allowed timeout in milliseconds (5 minutes).
pub const MAX_TIMEOUT_MS: u64 = 300_000;

/// Maximum allowed retry count.
pub const MAX_RETRIES: u32 = 10;

/// Maximum pacing delay in milliseconds.
pub const MAX_PACING_DELAY_MS: u64 = 5000;

/// Shortest idle lifetime of a registry session.
pub const MIN_SESSION_AGE_SECS: u64 = 60;

/// Longest idle lifetime of a registry session (one day).
pub const MAX_SESSION_AGE_SECS: u64 = 86_400;

/// Shortest sweeper period.
pub const MIN_SWEEP_INTERVAL_SECS: u64 = 10;

/// Longest sweeper period.
pub const MAX_SWEEP_INTERVAL_SECS: u64 = 3600;

/// Validate configuration values.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] naming the first variable that is
/// out of range.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.api_key.is_empty() {
        return Err(invalid("ANTHROPIC_API_KEY", "must not be empty".into()));
    }

    if !(MIN_TIMEOUT_MS..=MAX_TIMEOUT_MS).contains(&config.request_timeout_ms) {
        return Err(invalid(
            "REQUEST_TIMEOUT_MS",
            format!("must be between {MIN_TIMEOUT_MS} and {MAX_TIMEOUT_MS} ms"),
        ));
    }

    if config.max_retries > MAX_RETRIES {
        return Err(invalid(
            "MAX_RETRIES",
            format!("must be between 0 and {MAX_RETRIES}"),
        ));
    }

    if config.pacing_delay_ms > MAX_PACING_DELAY_MS {
        return Err(invalid(
            "PACING_DELAY_MS",
            format!("must be between 0 and {MAX_PACING_DELAY_MS}"),
        ));
    }

    if !(MIN_SESSION_AGE_SECS..=MAX_SESSION_AGE_SECS).contains(&config.session_max_age_secs) {
        return Err(invalid(
            "SESSION_MAX_AGE_SECS",
            format!("must be between {MIN_SESSION_AGE_SECS} and {MAX_SESSION_AGE_SECS}"),
        ));
    }

    if !(MIN_SWEEP_INTERVAL_SECS..=MAX_SWEEP_INTERVAL_SECS)
        .contains(&config.session_sweep_interval_secs)
    {
        return Err(invalid(
            "SESSION_SWEEP_INTERVAL_SECS",
            format!("must be between {MIN_SWEEP_INTERVAL_SECS} and {MAX_SWEEP_INTERVAL_SECS}"),
        ));
    }

    Ok(())
}

fn invalid(var: &str, reason: String) -> ConfigError {
    ConfigError::InvalidValue {
        var: var.into(),
        reason,
    }
}
