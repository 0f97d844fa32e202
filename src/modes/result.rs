//! Run results.
//!
//! A finished run is reported as a [`ReasoningResult`]. How much of the
//! session it carries depends on the requested [`OutputDetail`].

use serde::{Deserialize, Serialize};

use crate::generator::{Issue, Severity, Synthesis};
use crate::session::{
    Branch, Conclusion, Hypothesis, OutputDetail, ReasoningSession, Thought,
};

/// Counters collected during a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingStats {
    /// Thoughts recorded, revisions and branch thoughts included.
    pub total_thoughts: u32,
    /// Wall-clock time spent in the run.
    pub elapsed_ms: u64,
    /// Revision thoughts recorded.
    pub revisions: u32,
    /// Branches created.
    pub branches_explored: u32,
    /// Hypotheses that received a verdict.
    pub hypotheses_tested: u32,
    /// Generator calls that failed and were skipped.
    pub skipped_steps: u32,
    /// Whether the run stopped at its time limit.
    pub timed_out: bool,
}

/// Review of one focus area in reflect mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusReflection {
    /// Lens name.
    pub focus: String,
    /// Reflection text.
    pub reflection: String,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
    /// Issues found through this lens.
    pub issues: Vec<Issue>,
}

/// Reflect-mode findings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflectionOutcome {
    /// One entry per reviewed focus area.
    pub reflections: Vec<FocusReflection>,
    /// Improvements derived from the issues, deduplicated.
    pub improvements: Vec<String>,
    /// Rewritten text, when requested and there was something to fix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub improved_version: Option<String>,
}

impl ReflectionOutcome {
    /// All issues across focus areas.
    pub fn issues(&self) -> impl Iterator<Item = &Issue> {
        self.reflections.iter().flat_map(|r| r.issues.iter())
    }

    /// Issue count at `severity`.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.issues().filter(|i| i.severity == severity).count()
    }

    /// Overall confidence: starts at 0.8, drops 0.2 per high and 0.1 per
    /// medium issue, gains 0.1 when improvements exist, and stays in
    /// `[0.1, 1.0]`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn confidence(&self) -> f64 {
        let high = self.count(Severity::High) as f64;
        let medium = self.count(Severity::Medium) as f64;
        let bonus = if self.improvements.is_empty() { 0.0 } else { 0.1 };
        (0.8 - 0.2 * high - 0.1 * medium + bonus).clamp(0.1, 1.0)
    }
}

/// Outcome of a reasoning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReasoningResult {
    /// Session identifier.
    pub session_id: String,
    /// Mode that produced the result.
    pub mode: String,
    /// Synthesized answer.
    pub final_answer: String,
    /// Overall confidence in `[0, 1]`.
    pub confidence: f64,
    /// Actionable recommendations.
    pub recommendations: Vec<String>,
    /// Concrete next steps.
    pub next_steps: Vec<String>,
    /// Run counters.
    pub statistics: ProcessingStats,
    /// Thoughts in sequence order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thoughts: Option<Vec<Thought>>,
    /// Branches in creation order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branches: Option<Vec<Branch>>,
    /// Hypotheses in creation order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hypotheses: Option<Vec<Hypothesis>>,
    /// Conclusions in creation order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conclusions: Option<Vec<Conclusion>>,
    /// Full finalized session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<ReasoningSession>,
    /// Reflect-mode findings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reflection: Option<ReflectionOutcome>,
}

impl ReasoningResult {
    /// Assemble a result shaped by the session's output detail.
    ///
    /// `summary` carries only the answer and counters, `detailed` adds the
    /// session lists, `complete` adds the whole session.
    #[must_use]
    pub fn assemble(
        mode: &str,
        session: ReasoningSession,
        synthesis: Synthesis,
        statistics: ProcessingStats,
        reflection: Option<ReflectionOutcome>,
    ) -> Self {
        let detail = session.options.output_detail;
        let mut result = Self {
            session_id: session.id.clone(),
            mode: mode.to_string(),
            final_answer: synthesis.analysis,
            confidence: crate::session::clamp_confidence(synthesis.confidence),
            recommendations: synthesis.recommendations,
            next_steps: synthesis.next_steps,
            statistics,
            thoughts: None,
            branches: None,
            hypotheses: None,
            conclusions: None,
            session: None,
            reflection,
        };

        match detail {
            OutputDetail::Summary => {}
            OutputDetail::Detailed => {
                result.thoughts = Some(session.thoughts);
                result.branches = Some(session.branches);
                result.hypotheses = Some(session.hypotheses);
                result.conclusions = Some(session.conclusions);
            }
            OutputDetail::Complete => {
                result.thoughts = Some(session.thoughts.clone());
                result.branches = Some(session.branches.clone());
                result.hypotheses = Some(session.hypotheses.clone());
                result.conclusions = Some(session.conclusions.clone());
                result.session = Some(session);
            }
        }
        result
    }
}
