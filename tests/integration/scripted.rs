//! Deterministic generator for workflow tests.

use std::sync::Mutex;

use async_trait::async_trait;
use mcp_brain::error::ModeError;
use mcp_brain::generator::{
    GeneratedHypothesis, GeneratedThought, Generator, HypothesisVerdict, Issue, Severity, Synthesis,
};
use mcp_brain::session::{Hypothesis, HypothesisResult, ReasoningContext, ThinkingStyle, Thought};

/// One recorded generator call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Thought { sequence: u32, focus: Option<String> },
    Revision { of: u32 },
    Hypothesis,
    Test { extra: Option<String> },
    Synthesis,
    Reflect { focus: String },
    Issues { focus: String },
    Improve { issues: usize },
}

/// Generator answering from a fixed script and recording every call.
pub struct ScriptedGenerator {
    confidences: Vec<f64>,
    verdicts: Vec<HypothesisResult>,
    hypothesis_evidence: Vec<String>,
    issues: Vec<Issue>,
    fail_thoughts_from: Option<u32>,
    fail_synthesis: bool,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self {
            confidences: vec![0.8],
            verdicts: vec![HypothesisResult::Confirmed],
            hypothesis_evidence: vec!["benchmark data".to_string()],
            issues: Vec::new(),
            fail_thoughts_from: None,
            fail_synthesis: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Thought confidences, cycled by target sequence.
    pub fn with_confidences(mut self, confidences: &[f64]) -> Self {
        self.confidences = confidences.to_vec();
        self
    }

    /// Hypothesis verdicts, cycled by test order.
    pub fn with_verdicts(mut self, verdicts: &[HypothesisResult]) -> Self {
        self.verdicts = verdicts.to_vec();
        self
    }

    pub fn without_evidence(mut self) -> Self {
        self.hypothesis_evidence.clear();
        self
    }

    /// Issues reported for every focus area.
    pub fn with_issues(mut self, issues: Vec<Issue>) -> Self {
        self.issues = issues;
        self
    }

    /// Fail every thought whose target sequence is `sequence` or later.
    pub fn failing_thoughts_from(mut self, sequence: u32) -> Self {
        self.fail_thoughts_from = Some(sequence);
        self
    }

    pub fn failing_synthesis(mut self) -> Self {
        self.fail_synthesis = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| matches(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn unavailable(what: &str) -> ModeError {
        ModeError::ApiUnavailable {
            message: format!("scripted {what} failure"),
        }
    }
}

pub fn issue(description: &str, severity: Severity, suggestion: Option<&str>) -> Issue {
    Issue {
        description: description.to_string(),
        severity,
        suggestion: suggestion.map(ToString::to_string),
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn generate_thought(
        &self,
        _problem: &str,
        _prior: &[Thought],
        _style: ThinkingStyle,
        target_sequence: u32,
        _context: &ReasoningContext,
        focus: Option<String>,
    ) -> Result<GeneratedThought, ModeError> {
        self.record(Call::Thought {
            sequence: target_sequence,
            focus: focus.clone(),
        });
        if self.fail_thoughts_from.is_some_and(|from| target_sequence >= from) {
            return Err(Self::unavailable("thought"));
        }
        let index = (target_sequence as usize - 1) % self.confidences.len();
        let content = match focus {
            Some(focus) => format!("thought {target_sequence}: {focus}"),
            None => format!("thought {target_sequence}"),
        };
        Ok(GeneratedThought::new(content, self.confidences[index]))
    }

    async fn generate_revision(
        &self,
        original: &Thought,
        _all: &[Thought],
        _problem: &str,
    ) -> Result<String, ModeError> {
        self.record(Call::Revision {
            of: original.sequence,
        });
        Ok(format!("revised {}", original.content))
    }

    async fn generate_hypothesis(
        &self,
        _problem: &str,
        prior: &[Thought],
        _style: ThinkingStyle,
    ) -> Result<GeneratedHypothesis, ModeError> {
        self.record(Call::Hypothesis);
        Ok(GeneratedHypothesis {
            statement: format!("Claim after {} thoughts", prior.len()),
            evidence: self.hypothesis_evidence.clone(),
            confidence: 0.5,
        })
    }

    async fn test_hypothesis(
        &self,
        _hypothesis: &Hypothesis,
        _prior: &[Thought],
        extra_context: Option<String>,
    ) -> Result<HypothesisVerdict, ModeError> {
        let tested = self.count(|c| matches!(c, Call::Test { .. }));
        self.record(Call::Test {
            extra: extra_context,
        });
        Ok(HypothesisVerdict {
            result: self.verdicts[tested % self.verdicts.len()],
            evidence: vec!["load test".to_string()],
            reasoning: "scripted".to_string(),
        })
    }

    async fn synthesize(
        &self,
        _problem: &str,
        thoughts: &[Thought],
        _hypotheses: &[Hypothesis],
        _style: ThinkingStyle,
        _context: &ReasoningContext,
    ) -> Result<Synthesis, ModeError> {
        self.record(Call::Synthesis);
        if self.fail_synthesis {
            return Err(Self::unavailable("synthesis"));
        }
        Ok(Synthesis {
            analysis: format!("synthesized answer from {} thoughts", thoughts.len()),
            confidence: 0.82,
            recommendations: vec!["Roll out gradually".to_string()],
            next_steps: vec!["Write the migration plan".to_string()],
        })
    }

    async fn reflect(
        &self,
        _subject: &str,
        focus: &str,
        _style: ThinkingStyle,
    ) -> Result<GeneratedThought, ModeError> {
        self.record(Call::Reflect {
            focus: focus.to_string(),
        });
        Ok(GeneratedThought::new(format!("{focus} looks uneven"), 0.7))
    }

    async fn identify_issues(
        &self,
        _subject: &str,
        _reflection: &str,
        focus: &str,
    ) -> Result<Vec<Issue>, ModeError> {
        self.record(Call::Issues {
            focus: focus.to_string(),
        });
        Ok(self.issues.clone())
    }

    async fn improve_text(&self, _subject: &str, issues: &[Issue]) -> Result<String, ModeError> {
        self.record(Call::Improve {
            issues: issues.len(),
        });
        Ok("improved text".to_string())
    }
}
