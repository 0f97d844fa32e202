//! Session data model.
//!
//! Every type here is plain data with serde support. Mutation happens only
//! through [`SessionManager`](super::SessionManager); the query methods on
//! [`ReasoningSession`] are pure.

#![allow(clippy::missing_const_for_fn)]

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// Default `maxThoughts`.
pub const DEFAULT_MAX_THOUGHTS: u32 = 10;
/// Largest accepted `maxThoughts`.
pub const MAX_THOUGHTS_LIMIT: u32 = 50;
/// Default `confidenceThreshold`.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.7;
/// Default `timeLimit` in seconds.
pub const DEFAULT_TIME_LIMIT_SECS: u64 = 60;
/// Smallest accepted `timeLimit` in seconds.
pub const MIN_TIME_LIMIT_SECS: u64 = 5;
/// Largest accepted `timeLimit` in seconds.
pub const MAX_TIME_LIMIT_SECS: u64 = 300;
/// Confidence given to a thought when the caller supplies none.
pub const DEFAULT_THOUGHT_CONFIDENCE: f64 = 0.7;
/// Initial aggregate confidence of a new branch.
pub const BRANCH_SEED_CONFIDENCE: f64 = 0.5;
/// Thoughts below this confidence are revision candidates.
pub const REVISION_CONFIDENCE_FLOOR: f64 = 0.6;
/// Confidence added to a revised thought's confidence.
pub const REVISION_CONFIDENCE_BOOST: f64 = 0.2;

/// Clamp a confidence value into `[0, 1]`. NaN becomes 0.
#[must_use]
pub fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Reasoning style requested by the caller.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ThinkingStyle {
    /// Break the problem into parts and reason over each.
    #[default]
    Analytical,
    /// Follow an explicit, ordered procedure.
    Systematic,
    /// Favor novel and lateral ideas.
    Creative,
    /// Form hypotheses and test them against evidence.
    Scientific,
    /// Look for flaws, gaps and counterarguments.
    Critical,
    /// Reason about goals, trade-offs and long-term positioning.
    Strategic,
    /// Lean on pattern recognition and quick judgement.
    Intuitive,
    /// Weigh several viewpoints as if in a group discussion.
    Collaborative,
}

impl ThinkingStyle {
    /// Lowercase name used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Analytical => "analytical",
            Self::Systematic => "systematic",
            Self::Creative => "creative",
            Self::Scientific => "scientific",
            Self::Critical => "critical",
            Self::Strategic => "strategic",
            Self::Intuitive => "intuitive",
            Self::Collaborative => "collaborative",
        }
    }
}

impl fmt::Display for ThinkingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordinal complexity of a problem statement.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    /// Short, plain question.
    #[default]
    Simple,
    /// Moderate length or light technical content.
    Medium,
    /// Long or technically dense.
    Complex,
    /// Very long, jargon heavy, or expert vocabulary.
    Expert,
}

impl Complexity {
    /// Suggested number of thoughts for a problem of this complexity.
    #[must_use]
    pub const fn suggested_thoughts(self) -> u32 {
        match self {
            Self::Simple => 3,
            Self::Medium => 5,
            Self::Complex => 8,
            Self::Expert => 12,
        }
    }
}

/// How much of the finalized session the result carries.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputDetail {
    /// Answer, confidence, recommendations, next steps and statistics.
    Summary,
    /// Summary plus thoughts and hypotheses.
    #[default]
    Detailed,
    /// The full finalized session.
    Complete,
}

/// Processing options bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessingOptions {
    /// Thought budget (1-50).
    pub max_thoughts: u32,
    /// Whether thoughts may be revised.
    pub allow_revision: bool,
    /// Whether branches may be created.
    pub enable_branching: bool,
    /// Whether a hypothesis phase with evidence is required.
    pub require_evidence: bool,
    /// Mean confidence at which the session may stop (0-1).
    pub confidence_threshold: f64,
    /// Wall-clock limit in seconds (5-300).
    #[serde(rename = "timeLimit")]
    pub time_limit_secs: u64,
    /// Result shape.
    pub output_detail: OutputDetail,
}

impl Default for ProcessingOptions {
    fn default() -> Self {
        Self {
            max_thoughts: DEFAULT_MAX_THOUGHTS,
            allow_revision: true,
            enable_branching: true,
            require_evidence: false,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            output_detail: OutputDetail::default(),
        }
    }
}

impl ProcessingOptions {
    /// Set the thought budget.
    #[must_use]
    pub const fn with_max_thoughts(mut self, max_thoughts: u32) -> Self {
        self.max_thoughts = max_thoughts;
        self
    }

    /// Enable or disable revisions.
    #[must_use]
    pub const fn with_allow_revision(mut self, allow: bool) -> Self {
        self.allow_revision = allow;
        self
    }

    /// Enable or disable branching.
    #[must_use]
    pub const fn with_enable_branching(mut self, enable: bool) -> Self {
        self.enable_branching = enable;
        self
    }

    /// Require evidence-backed hypotheses.
    #[must_use]
    pub const fn with_require_evidence(mut self, require: bool) -> Self {
        self.require_evidence = require;
        self
    }

    /// Set the confidence threshold.
    #[must_use]
    pub const fn with_confidence_threshold(mut self, threshold: f64) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    /// Set the time limit in seconds.
    #[must_use]
    pub const fn with_time_limit_secs(mut self, secs: u64) -> Self {
        self.time_limit_secs = secs;
        self
    }

    /// Set the output detail.
    #[must_use]
    pub const fn with_output_detail(mut self, detail: OutputDetail) -> Self {
        self.output_detail = detail;
        self
    }

    /// Check every field against its accepted range.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidOption`] naming the first bad field.
    pub fn validate(&self) -> Result<(), SessionError> {
        if !(1..=MAX_THOUGHTS_LIMIT).contains(&self.max_thoughts) {
            return Err(SessionError::InvalidOption {
                field: "maxThoughts".to_string(),
                reason: format!(
                    "must be between 1 and {MAX_THOUGHTS_LIMIT}, got {}",
                    self.max_thoughts
                ),
            });
        }
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(SessionError::InvalidOption {
                field: "confidenceThreshold".to_string(),
                reason: format!(
                    "must be between 0.0 and 1.0, got {}",
                    self.confidence_threshold
                ),
            });
        }
        if !(MIN_TIME_LIMIT_SECS..=MAX_TIME_LIMIT_SECS).contains(&self.time_limit_secs) {
            return Err(SessionError::InvalidOption {
                field: "timeLimit".to_string(),
                reason: format!(
                    "must be between {MIN_TIME_LIMIT_SECS} and {MAX_TIME_LIMIT_SECS} seconds, got {}",
                    self.time_limit_secs
                ),
            });
        }
        Ok(())
    }
}

/// Free-form problem context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ReasoningContext {
    /// Problem domain, e.g. "healthcare".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Background narrative.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    /// Hard constraints.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<String>,
    /// Requirements the answer must meet.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub requirements: Vec<String>,
    /// Parties affected by the outcome.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stakeholders: Vec<String>,
    /// Time horizon.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeframe: Option<String>,
    /// Available resources.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<String>,
}

impl ReasoningContext {
    /// True when no field carries information.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// One step in the reasoning chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thought {
    /// 1-based position, assigned at insertion.
    pub sequence: u32,
    /// Generated text.
    pub content: String,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
    /// Whether this thought revises an earlier one.
    pub is_revision: bool,
    /// Sequence of the revised thought.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revises_sequence: Option<u32>,
    /// Branch this thought belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<String>,
    /// Main-line thought the branch forked from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_from_sequence: Option<u32>,
    /// Grouping labels.
    pub tags: BTreeSet<String>,
    /// Insertion time.
    pub timestamp: DateTime<Utc>,
}

impl Thought {
    /// Whether the thought carries `tag`.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Whether the thought sits on a branch.
    #[must_use]
    pub fn is_branch(&self) -> bool {
        self.branch_id.is_some()
    }
}

/// A forked side-sequence of thoughts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    /// Branch identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Main-line thought the branch forked from.
    pub from_sequence: u32,
    /// Member thought sequences in insertion order.
    pub thoughts: Vec<u32>,
    /// Whether the branch is still being explored.
    pub is_active: bool,
    /// Mean confidence of member thoughts, seeded low.
    pub confidence: f64,
}

/// Outcome of testing a hypothesis.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum HypothesisResult {
    /// Evidence supports the claim.
    Confirmed,
    /// Evidence contradicts the claim.
    Rejected,
    /// Evidence is insufficient either way.
    Inconclusive,
}

impl HypothesisResult {
    /// Lowercase name used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Rejected => "rejected",
            Self::Inconclusive => "inconclusive",
        }
    }

    /// Apply the confidence update rule to `prior`.
    #[must_use]
    pub fn apply(self, prior: f64) -> f64 {
        match self {
            Self::Confirmed => (prior + 0.3).min(1.0),
            Self::Rejected => (prior - 0.4).max(0.0),
            Self::Inconclusive => prior,
        }
    }
}

impl fmt::Display for HypothesisResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HypothesisResult {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "confirmed" | "supported" | "true" => Ok(Self::Confirmed),
            "rejected" | "refuted" | "false" => Ok(Self::Rejected),
            "inconclusive" | "uncertain" | "unknown" => Ok(Self::Inconclusive),
            other => Err(format!("unknown hypothesis result: {other}")),
        }
    }
}

/// A falsifiable claim generated mid-session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hypothesis {
    /// Hypothesis identifier.
    pub id: String,
    /// The claim.
    pub statement: String,
    /// Supporting evidence in insertion order.
    pub evidence: Vec<String>,
    /// Contradicting evidence in insertion order.
    pub counter_evidence: Vec<String>,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
    /// Whether a test has been applied.
    pub tested: bool,
    /// Verdict of the last test.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<HypothesisResult>,
    /// Thought count when the hypothesis was added.
    pub generated_at_sequence: u32,
}

/// A terminal statement derived from the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conclusion {
    /// Conclusion identifier.
    pub id: String,
    /// The concluding statement.
    pub statement: String,
    /// Sequences of supporting thoughts.
    pub supporting_thoughts: BTreeSet<u32>,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
    /// How the statement was reached.
    pub reasoning: String,
    /// Other conclusions considered.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub alternatives: Vec<String>,
}

/// Session bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMetadata {
    /// Creation time.
    pub start_time: DateTime<Utc>,
    /// Set by finalize.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    /// Set by finalize.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_duration_ms: Option<u64>,
    /// Style at creation.
    pub thinking_style: ThinkingStyle,
    /// Classifier output at creation.
    pub complexity: Complexity,
    /// Domain copied from the context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Number of revision thoughts.
    pub revisions_count: u32,
    /// Number of branches created.
    pub branches_count: u32,
    /// Number of hypotheses added.
    pub hypotheses_count: u32,
}

/// Aggregate root for one reasoning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReasoningSession {
    /// Session identifier.
    pub id: String,
    /// Problem text, fixed at creation.
    pub problem: String,
    /// Style, fixed at creation.
    pub thinking_style: ThinkingStyle,
    /// Caller context.
    #[serde(skip_serializing_if = "ReasoningContext::is_empty", default)]
    pub context: ReasoningContext,
    /// Validated options.
    pub options: ProcessingOptions,
    /// Thoughts in sequence order.
    pub thoughts: Vec<Thought>,
    /// Branches in creation order.
    pub branches: Vec<Branch>,
    /// Hypotheses in creation order.
    pub hypotheses: Vec<Hypothesis>,
    /// Conclusions in creation order.
    pub conclusions: Vec<Conclusion>,
    /// Last assigned sequence.
    pub current_sequence: u32,
    /// Expected number of thoughts.
    pub total_thoughts_estimate: u32,
    /// Bookkeeping.
    pub metadata: SessionMetadata,
}

impl ReasoningSession {
    /// Number of recorded thoughts.
    #[must_use]
    pub fn thought_count(&self) -> u32 {
        self.current_sequence
    }

    /// Thought by sequence.
    #[must_use]
    pub fn thought(&self, sequence: u32) -> Option<&Thought> {
        let index = usize::try_from(sequence.checked_sub(1)?).ok()?;
        self.thoughts.get(index)
    }

    /// Thoughts carrying `tag`.
    pub fn thoughts_by_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Thought> {
        self.thoughts.iter().filter(move |t| t.has_tag(tag))
    }

    /// Thoughts not on any branch.
    pub fn main_line(&self) -> impl Iterator<Item = &Thought> {
        self.thoughts.iter().filter(|t| !t.is_branch())
    }

    /// Branch by id.
    #[must_use]
    pub fn branch(&self, id: &str) -> Option<&Branch> {
        self.branches.iter().find(|b| b.id == id)
    }

    /// Hypothesis by id.
    #[must_use]
    pub fn hypothesis(&self, id: &str) -> Option<&Hypothesis> {
        self.hypotheses.iter().find(|h| h.id == id)
    }

    /// Arithmetic mean of thought confidences, 0 when empty.
    #[must_use]
    pub fn average_confidence(&self) -> f64 {
        if self.thoughts.is_empty() {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let count = self.thoughts.len() as f64;
        self.thoughts.iter().map(|t| t.confidence).sum::<f64>() / count
    }

    /// Whether the loop should keep producing thoughts.
    ///
    /// A session without conclusions always wants more thoughts until the
    /// budget is spent, even when confidence is already high.
    #[must_use]
    pub fn needs_more_thoughts(&self) -> bool {
        self.thought_count() < self.options.max_thoughts
            && (self.average_confidence() < self.options.confidence_threshold
                || self.conclusions.is_empty())
    }

    /// Whether the next step should revise rather than add.
    #[must_use]
    pub fn should_revise(&self) -> bool {
        if !self.options.allow_revision || self.thoughts.len() < 3 {
            return false;
        }
        let has_weak = self
            .thoughts
            .iter()
            .any(|t| t.confidence < REVISION_CONFIDENCE_FLOOR);
        let recent_revision = self.thoughts.iter().rev().take(2).any(|t| t.is_revision);
        has_weak && !recent_revision
    }

    /// Lowest-confidence thought below the revision floor that nothing
    /// revises yet, ties to the lowest sequence.
    #[must_use]
    pub fn revision_target(&self) -> Option<&Thought> {
        let revised: BTreeSet<u32> = self
            .thoughts
            .iter()
            .filter_map(|t| t.revises_sequence)
            .collect();
        self.thoughts
            .iter()
            .filter(|t| {
                t.confidence < REVISION_CONFIDENCE_FLOOR && !revised.contains(&t.sequence)
            })
            .fold(None, |best: Option<&Thought>, t| match best {
                Some(b) if b.confidence <= t.confidence => Some(b),
                _ => Some(t),
            })
    }

    /// Number of hypotheses that have been tested.
    #[must_use]
    pub fn tested_hypotheses(&self) -> u32 {
        u32::try_from(self.hypotheses.iter().filter(|h| h.tested).count()).unwrap_or(u32::MAX)
    }
}
