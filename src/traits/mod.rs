//! Seams between the reasoning core and the outside world.
//!
//! - [`AnthropicClientTrait`]: turns a [`Prompt`] into a [`Completion`]
//! - [`TimeProvider`]: the clock behind session timestamps and idle sweeps
//!
//! Both carry `#[cfg_attr(test, mockall::automock)]`, so unit tests get
//! `MockAnthropicClientTrait` and `MockTimeProvider` for free.
//!
//! ```
//! use mcp_brain::traits::{FixedTimeProvider, TimeProvider};
//!
//! let clock = FixedTimeProvider::new("2026-01-01T00:00:00Z".parse().unwrap());
//! clock.advance(chrono::Duration::minutes(5));
//! assert_eq!(clock.now().to_rfc3339(), "2026-01-01T00:05:00+00:00");
//! ```

mod types;

pub use types::{Completion, Prompt, StopReason, Usage};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::ModeError;

/// Model client used by [`LlmGenerator`](crate::generator::LlmGenerator).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnthropicClientTrait: Send + Sync {
    /// Run one prompt.
    ///
    /// # Errors
    ///
    /// Returns [`ModeError::ApiUnavailable`] when the model cannot be reached
    /// or answers with an error.
    async fn complete(&self, prompt: Prompt) -> Result<Completion, ModeError>;
}

/// Source of wall-clock time.
#[cfg_attr(test, mockall::automock)]
pub trait TimeProvider: Send + Sync {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealTimeProvider;

impl TimeProvider for RealTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that always returns the same instant until moved.
///
/// Useful for hosts that drive the session registry from their own
/// scheduler and for tests.
#[derive(Debug)]
pub struct FixedTimeProvider {
    now: std::sync::RwLock<DateTime<Utc>>,
}

impl FixedTimeProvider {
    /// Create a clock frozen at `now`.
    #[must_use]
    pub const fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: std::sync::RwLock::new(now),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: chrono::Duration) {
        if let Ok(mut guard) = self.now.write() {
            *guard += by;
        }
    }
}

impl TimeProvider for FixedTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        self.now.read().map_or_else(|poisoned| *poisoned.into_inner(), |guard| *guard)
    }
}
