//! Content generation.
//!
//! The control loop never writes thought text itself. It asks a
//! [`Generator`] for content and confidence, then records the result through
//! the session manager. [`LlmGenerator`] is the production implementation
//! backed by any [`AnthropicClientTrait`](crate::traits::AnthropicClientTrait).
//!
//! Every method may fail; callers treat a failure as "skip this step".

mod json;
mod llm;

pub use json::{extract_json, field_confidence, field_str, field_string_list};
pub use llm::LlmGenerator;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ModeError;
use crate::session::{Hypothesis, HypothesisResult, ReasoningContext, ThinkingStyle, Thought};

/// Generated thought text with a confidence estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedThought {
    /// Thought text.
    pub content: String,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
}

impl GeneratedThought {
    /// Create a generated thought.
    #[must_use]
    pub fn new(content: impl Into<String>, confidence: f64) -> Self {
        Self {
            content: content.into(),
            confidence,
        }
    }
}

/// A proposed hypothesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedHypothesis {
    /// The claim.
    pub statement: String,
    /// Supporting evidence.
    pub evidence: Vec<String>,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
}

/// Verdict of a hypothesis test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HypothesisVerdict {
    /// Outcome.
    pub result: HypothesisResult,
    /// Evidence behind the verdict.
    pub evidence: Vec<String>,
    /// Explanation.
    pub reasoning: String,
}

/// Final answer for a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Synthesis {
    /// The final answer.
    pub analysis: String,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
    /// Actionable recommendations.
    pub recommendations: Vec<String>,
    /// Concrete next steps.
    pub next_steps: Vec<String>,
}

/// How serious an identified issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Undermines the text.
    High,
    /// Weakens the text.
    Medium,
    /// Cosmetic.
    Low,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        })
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" | "critical" | "major" => Ok(Self::High),
            "medium" | "moderate" => Ok(Self::Medium),
            "low" | "minor" => Ok(Self::Low),
            other => Err(format!("unknown severity: {other}")),
        }
    }
}

/// A problem found while reflecting on a text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// What is wrong.
    pub description: String,
    /// How serious it is.
    pub severity: Severity,
    /// Suggested fix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Producer of thought, hypothesis and synthesis content.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Generator: Send + Sync {
    /// Produce the thought at `target_sequence`, optionally steered by `focus`.
    async fn generate_thought(
        &self,
        problem: &str,
        prior: &[Thought],
        style: ThinkingStyle,
        target_sequence: u32,
        context: &ReasoningContext,
        focus: Option<String>,
    ) -> Result<GeneratedThought, ModeError>;

    /// Rewrite a weak thought.
    async fn generate_revision(
        &self,
        original: &Thought,
        all: &[Thought],
        problem: &str,
    ) -> Result<String, ModeError>;

    /// Propose a hypothesis from the thoughts so far.
    async fn generate_hypothesis(
        &self,
        problem: &str,
        prior: &[Thought],
        style: ThinkingStyle,
    ) -> Result<GeneratedHypothesis, ModeError>;

    /// Judge a hypothesis against the thoughts so far.
    async fn test_hypothesis(
        &self,
        hypothesis: &Hypothesis,
        prior: &[Thought],
        extra_context: Option<String>,
    ) -> Result<HypothesisVerdict, ModeError>;

    /// Combine the full history into a final answer.
    async fn synthesize(
        &self,
        problem: &str,
        thoughts: &[Thought],
        hypotheses: &[Hypothesis],
        style: ThinkingStyle,
        context: &ReasoningContext,
    ) -> Result<Synthesis, ModeError>;

    /// Reflect on `subject` through one focus area.
    async fn reflect(
        &self,
        subject: &str,
        focus: &str,
        style: ThinkingStyle,
    ) -> Result<GeneratedThought, ModeError>;

    /// Turn a reflection into concrete issues.
    async fn identify_issues(
        &self,
        subject: &str,
        reflection: &str,
        focus: &str,
    ) -> Result<Vec<Issue>, ModeError>;

    /// Rewrite `subject` to resolve `issues`.
    async fn improve_text(&self, subject: &str, issues: &[Issue]) -> Result<String, ModeError>;
}
