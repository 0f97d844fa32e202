//! Test utilities and mock factories.
//!
//! This module provides shared testing infrastructure:
//! - Mock Anthropic clients and clocks
//! - Scripted generators for the control loop
//! - Session fixtures
//!
//! Only compiled for tests (`#[cfg(test)]`).

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::ModeError;
use crate::generator::{GeneratedThought, MockGenerator, Synthesis};
use crate::session::{ProcessingOptions, ReasoningContext, SessionManager, ThinkingStyle};
use crate::traits::{
    Completion, FixedTimeProvider, MockAnthropicClientTrait, MockTimeProvider, Usage,
};

/// Create a mock Anthropic client that returns a fixed response.
///
/// # Example
///
/// ```ignore
/// let mock = mock_anthropic_success(r#"{"thought": "x", "confidence": 0.7}"#, 10, 20);
/// ```
#[must_use]
pub fn mock_anthropic_success(
    response: impl Into<String>,
    input_tokens: u32,
    output_tokens: u32,
) -> MockAnthropicClientTrait {
    let response = response.into();
    let mut mock = MockAnthropicClientTrait::new();
    mock.expect_complete().returning(move |_prompt| {
        Ok(Completion::new(
            response.clone(),
            Usage::new(input_tokens, output_tokens),
        ))
    });
    mock
}

/// Create a mock Anthropic client that always fails with `error`.
#[must_use]
pub fn mock_anthropic_error(error: ModeError) -> MockAnthropicClientTrait {
    let mut mock = MockAnthropicClientTrait::new();
    mock.expect_complete()
        .returning(move |_prompt| Err(error.clone()));
    mock
}

/// Create a mock time provider that returns a fixed timestamp.
#[must_use]
pub fn mock_time(time: DateTime<Utc>) -> MockTimeProvider {
    let mut mock = MockTimeProvider::new();
    mock.expect_now().return_const(time);
    mock
}

/// Create an advanceable clock from an RFC 3339 timestamp.
///
/// # Panics
///
/// Panics if the timestamp string is invalid.
#[must_use]
pub fn fixed_clock(timestamp: &str) -> Arc<FixedTimeProvider> {
    let time = timestamp
        .parse::<DateTime<Utc>>()
        .expect("Invalid timestamp format");
    Arc::new(FixedTimeProvider::new(time))
}

/// Synthesis with one recommendation and one next step.
#[must_use]
pub fn test_synthesis(analysis: &str) -> Synthesis {
    Synthesis {
        analysis: analysis.to_string(),
        confidence: 0.85,
        recommendations: vec!["Ship it".to_string()],
        next_steps: vec!["Measure".to_string()],
    }
}

/// Generator that emits `"thought N"` at a constant confidence and
/// synthesizes `"final"`.
#[must_use]
pub fn mock_generator_steady(confidence: f64) -> MockGenerator {
    let mut generator = MockGenerator::new();
    generator
        .expect_generate_thought()
        .returning(move |_, _, _, seq, _, _| {
            Ok(GeneratedThought::new(format!("thought {seq}"), confidence))
        });
    generator
        .expect_synthesize()
        .returning(|_, _, _, _, _| Ok(test_synthesis("final")));
    generator
}

/// Session over `problem` with the given options, on the system clock.
#[must_use]
pub fn test_session(problem: &str, options: ProcessingOptions) -> SessionManager {
    SessionManager::create(
        problem,
        ThinkingStyle::Analytical,
        ReasoningContext::default(),
        options,
    )
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::Generator;
    use crate::traits::{AnthropicClientTrait, Prompt, TimeProvider};
    use chrono::Datelike;

    #[tokio::test]
    async fn test_mock_anthropic_success() {
        let mock = mock_anthropic_success("Test response", 100, 50);
        let completion = mock.complete(Prompt::user("Hello")).await.unwrap();
        assert_eq!(completion.text, "Test response");
        assert_eq!(completion.usage, Usage::new(100, 50));
    }

    #[tokio::test]
    async fn test_mock_anthropic_error() {
        let mock = mock_anthropic_error(ModeError::ApiUnavailable {
            message: "Service down".to_string(),
        });
        let result = mock.complete(Prompt::user("Hello")).await;
        assert!(matches!(result, Err(ModeError::ApiUnavailable { .. })));
    }

    #[test]
    fn test_mock_time() {
        let fixed_time = Utc::now() - chrono::Duration::days(1);
        assert_eq!(mock_time(fixed_time).now(), fixed_time);
    }

    #[test]
    fn test_fixed_clock() {
        let clock = fixed_clock("2026-01-15T12:00:00Z");
        let now = clock.now();
        assert_eq!((now.year(), now.month(), now.day()), (2026, 1, 15));
    }

    #[tokio::test]
    async fn test_mock_generator_steady() {
        let generator = mock_generator_steady(0.6);
        let thought = generator
            .generate_thought(
                "p",
                &[],
                ThinkingStyle::Creative,
                4,
                &ReasoningContext::default(),
                None,
            )
            .await
            .unwrap();
        assert_eq!(thought.content, "thought 4");
        assert!((thought.confidence - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn test_test_session() {
        let session = test_session("p", ProcessingOptions::default().with_max_thoughts(4));
        assert_eq!(session.thought_count(), 0);
        assert_eq!(session.session().options.max_thoughts, 4);
    }
}
