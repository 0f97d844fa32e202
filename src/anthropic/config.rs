//! Connection and retry settings for [`AnthropicClient`](super::AnthropicClient).

use std::time::Duration;

use crate::error::AnthropicError;

/// Messages API root.
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
/// Output limit used when a prompt does not set one.
pub const DEFAULT_MAX_TOKENS: u32 = 2048;

/// How failed calls are retried.
///
/// Waits double from `initial_backoff` up to `max_backoff`. A rate-limit
/// answer waits at least as long as the API asked, within the same cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Wait before the first retry.
    pub initial_backoff: Duration,
    /// Upper bound for any single wait.
    pub max_backoff: Duration,
}

impl RetryPolicy {
    /// Wait before retry number `retry` (1-based) after `error`.
    #[must_use]
    pub fn wait_before(&self, retry: u32, error: &AnthropicError) -> Duration {
        let exponent = retry.saturating_sub(1).min(16);
        let backoff = self.initial_backoff.saturating_mul(1 << exponent);
        let wait = match error {
            AnthropicError::RateLimited {
                retry_after_seconds,
            } => backoff.max(Duration::from_secs(*retry_after_seconds)),
            _ => backoff,
        };
        wait.min(self.max_backoff)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: crate::config::DEFAULT_MAX_RETRIES,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(30),
        }
    }
}

/// Where and how the client talks to the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API root, without the `/messages` suffix.
    pub base_url: String,
    /// Model used for every generator call.
    pub model: String,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
    /// Output limit for prompts that do not carry one.
    pub default_max_tokens: u32,
    /// Retry behavior.
    pub retry: RetryPolicy,
}

impl ClientConfig {
    /// Point the client at another API root (used by tests and proxies).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Select the model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the HTTP timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set how many times a retryable failure is retried.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.retry.max_retries = max_retries;
        self
    }

    /// Set the first and the largest retry wait.
    #[must_use]
    pub const fn with_backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.retry.initial_backoff = initial;
        self.retry.max_backoff = max;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: crate::config::DEFAULT_MODEL.to_string(),
            timeout: Duration::from_millis(crate::config::DEFAULT_REQUEST_TIMEOUT_MS),
            default_max_tokens: DEFAULT_MAX_TOKENS,
            retry: RetryPolicy::default(),
        }
    }
}
