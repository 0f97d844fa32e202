//! Session manager.
//!
//! [`SessionManager`] owns one [`ReasoningSession`] and is the only way to
//! change it. Each operation validates first, then appends and updates the
//! metadata counters in the same step, so the counters always match the
//! live lists.

use std::collections::BTreeSet;
use std::sync::Arc;

use super::complexity::classify_complexity;
use super::types::{
    clamp_confidence, Branch, Conclusion, Hypothesis, HypothesisResult, ProcessingOptions,
    ReasoningContext, ReasoningSession, SessionMetadata, ThinkingStyle, Thought,
    BRANCH_SEED_CONFIDENCE,
};
use crate::error::SessionError;
use crate::traits::{RealTimeProvider, TimeProvider};

/// Generate a unique session ID.
#[must_use]
pub fn generate_session_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Generate a unique branch ID.
#[must_use]
pub fn generate_branch_id() -> String {
    format!("branch_{}", uuid::Uuid::new_v4())
}

/// Generate a unique hypothesis ID.
#[must_use]
pub fn generate_hypothesis_id() -> String {
    format!("hyp_{}", uuid::Uuid::new_v4())
}

/// Generate a unique conclusion ID.
#[must_use]
pub fn generate_conclusion_id() -> String {
    format!("concl_{}", uuid::Uuid::new_v4())
}

/// Optional attributes of a new thought.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThoughtOptions {
    /// Marks the thought as a revision.
    pub is_revision: bool,
    /// Sequence being revised.
    pub revises_sequence: Option<u32>,
    /// Branch the thought belongs to.
    pub branch_id: Option<String>,
    /// Fork point of that branch.
    pub branch_from_sequence: Option<u32>,
    /// Grouping labels.
    pub tags: Vec<String>,
}

impl ThoughtOptions {
    /// Options for a plain main-line thought.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for a revision of `sequence`.
    #[must_use]
    pub fn revision_of(sequence: u32) -> Self {
        Self {
            is_revision: true,
            revises_sequence: Some(sequence),
            ..Self::default()
        }
    }

    /// Options for a thought on `branch_id`, forked at `from_sequence`.
    #[must_use]
    pub fn on_branch(branch_id: impl Into<String>, from_sequence: u32) -> Self {
        Self {
            branch_id: Some(branch_id.into()),
            branch_from_sequence: Some(from_sequence),
            ..Self::default()
        }
    }

    /// Add a tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
}

/// Owner of a single reasoning session.
#[derive(Clone)]
pub struct SessionManager {
    session: ReasoningSession,
    clock: Arc<dyn TimeProvider>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("session_id", &self.session.id)
            .field("thoughts", &self.session.thoughts.len())
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// Create a session on the system clock.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidOption`] if `options` fail validation.
    pub fn create(
        problem: impl Into<String>,
        style: ThinkingStyle,
        context: ReasoningContext,
        options: ProcessingOptions,
    ) -> Result<Self, SessionError> {
        Self::create_with_clock(problem, style, context, options, Arc::new(RealTimeProvider))
    }

    /// Create a session on an injected clock.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidOption`] if `options` fail validation.
    pub fn create_with_clock(
        problem: impl Into<String>,
        style: ThinkingStyle,
        context: ReasoningContext,
        options: ProcessingOptions,
        clock: Arc<dyn TimeProvider>,
    ) -> Result<Self, SessionError> {
        options.validate()?;
        let problem = problem.into();
        let complexity = classify_complexity(&problem);
        let id = generate_session_id();

        tracing::debug!(
            session_id = %id,
            style = %style,
            complexity = ?complexity,
            max_thoughts = options.max_thoughts,
            "Creating reasoning session"
        );

        let session = ReasoningSession {
            id,
            metadata: SessionMetadata {
                start_time: clock.now(),
                end_time: None,
                total_duration_ms: None,
                thinking_style: style,
                complexity,
                domain: context.domain.clone(),
                revisions_count: 0,
                branches_count: 0,
                hypotheses_count: 0,
            },
            problem,
            thinking_style: style,
            context,
            total_thoughts_estimate: options.max_thoughts,
            options,
            thoughts: Vec::new(),
            branches: Vec::new(),
            hypotheses: Vec::new(),
            conclusions: Vec::new(),
            current_sequence: 0,
        };

        Ok(Self { session, clock })
    }

    /// Replace the generated session id.
    #[must_use]
    pub fn with_session_id(mut self, id: impl Into<String>) -> Self {
        self.session.id = id.into();
        self
    }

    /// Read-only view of the session.
    #[must_use]
    pub const fn session(&self) -> &ReasoningSession {
        &self.session
    }

    /// Session identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.session.id
    }

    /// Number of recorded thoughts.
    #[must_use]
    pub fn thought_count(&self) -> u32 {
        self.session.thought_count()
    }

    /// Mean thought confidence.
    #[must_use]
    pub fn average_confidence(&self) -> f64 {
        self.session.average_confidence()
    }

    /// See [`ReasoningSession::needs_more_thoughts`].
    #[must_use]
    pub fn needs_more_thoughts(&self) -> bool {
        self.session.needs_more_thoughts()
    }

    /// See [`ReasoningSession::should_revise`].
    #[must_use]
    pub fn should_revise(&self) -> bool {
        self.session.should_revise()
    }

    /// See [`ReasoningSession::revision_target`].
    #[must_use]
    pub fn revision_target(&self) -> Option<&Thought> {
        self.session.revision_target()
    }

    /// Update the expected number of thoughts.
    pub fn set_total_thoughts_estimate(&mut self, estimate: u32) {
        self.session.total_thoughts_estimate = estimate;
    }

    /// Append a thought.
    ///
    /// # Errors
    ///
    /// - [`SessionError::InvalidRevision`] when revisions are disabled or the
    ///   target is missing or not yet created.
    /// - [`SessionError::BranchingDisabled`] when branch fields are given but
    ///   branching is off.
    /// - [`SessionError::InvalidBranchTarget`] when the branch fields are
    ///   incomplete, name an unknown branch, or disagree with its fork point.
    pub fn add_thought(
        &mut self,
        content: impl Into<String>,
        confidence: f64,
        options: ThoughtOptions,
    ) -> Result<Thought, SessionError> {
        let count = self.session.thought_count();
        self.check_revision(&options, count)?;
        let branch_index = self.check_branch(&options)?;

        let sequence = count + 1;
        let mut tags: BTreeSet<String> = options.tags.into_iter().collect();
        if options.is_revision {
            tags.insert("revision".to_string());
        }
        if options.branch_id.is_some() {
            tags.insert("branch".to_string());
        }

        let thought = Thought {
            sequence,
            content: content.into(),
            confidence: clamp_confidence(confidence),
            is_revision: options.is_revision,
            revises_sequence: options.revises_sequence,
            branch_id: options.branch_id,
            branch_from_sequence: options.branch_from_sequence,
            tags,
            timestamp: self.clock.now(),
        };

        self.session.thoughts.push(thought.clone());
        self.session.current_sequence = sequence;
        if thought.is_revision {
            self.session.metadata.revisions_count += 1;
        }
        if let Some(index) = branch_index {
            let members = self.branch_member_confidences(index, &thought);
            let branch = &mut self.session.branches[index];
            branch.thoughts.push(sequence);
            branch.confidence = members;
        }

        tracing::debug!(
            session_id = %self.session.id,
            sequence,
            confidence = thought.confidence,
            is_revision = thought.is_revision,
            branch = ?thought.branch_id,
            "Thought added"
        );

        Ok(thought)
    }

    fn check_revision(&self, options: &ThoughtOptions, count: u32) -> Result<(), SessionError> {
        if !options.is_revision {
            if options.revises_sequence.is_some() {
                return Err(SessionError::InvalidRevision {
                    reason: "revisesSequence given without isRevision".to_string(),
                });
            }
            return Ok(());
        }
        if !self.session.options.allow_revision {
            return Err(SessionError::InvalidRevision {
                reason: "revisions are disabled for this session".to_string(),
            });
        }
        match options.revises_sequence {
            None => Err(SessionError::InvalidRevision {
                reason: "revisesSequence is required".to_string(),
            }),
            Some(target) if target == 0 || target > count => Err(SessionError::InvalidRevision {
                reason: format!("thought {target} does not exist (have {count})"),
            }),
            Some(_) => Ok(()),
        }
    }

    fn check_branch(&self, options: &ThoughtOptions) -> Result<Option<usize>, SessionError> {
        match (&options.branch_id, options.branch_from_sequence) {
            (None, None) => Ok(None),
            (Some(_), None) | (None, Some(_)) => Err(SessionError::InvalidBranchTarget {
                reason: "branchId and branchFromSequence must be given together".to_string(),
            }),
            (Some(id), Some(from)) => {
                if !self.session.options.enable_branching {
                    return Err(SessionError::BranchingDisabled);
                }
                let index = self
                    .session
                    .branches
                    .iter()
                    .position(|b| &b.id == id)
                    .ok_or_else(|| SessionError::InvalidBranchTarget {
                        reason: format!("unknown branch {id}"),
                    })?;
                let expected = self.session.branches[index].from_sequence;
                if expected != from {
                    return Err(SessionError::InvalidBranchTarget {
                        reason: format!("branch {id} forks from {expected}, not {from}"),
                    });
                }
                Ok(Some(index))
            }
        }
    }

    fn branch_member_confidences(&self, index: usize, new_thought: &Thought) -> f64 {
        let branch = &self.session.branches[index];
        let existing = branch
            .thoughts
            .iter()
            .filter_map(|seq| self.session.thought(*seq))
            .map(|t| t.confidence);
        let (sum, count) = existing
            .chain(std::iter::once(new_thought.confidence))
            .fold((0.0, 0_u32), |(sum, count), c| (sum + c, count + 1));
        sum / f64::from(count)
    }

    /// Fork a branch from a main-line thought.
    ///
    /// # Errors
    ///
    /// - [`SessionError::BranchingDisabled`] when branching is off.
    /// - [`SessionError::InvalidBranchTarget`] when `from_sequence` is outside
    ///   `1..=current_sequence`.
    pub fn create_branch(
        &mut self,
        from_sequence: u32,
        name: impl Into<String>,
        initial_content: Option<String>,
    ) -> Result<Branch, SessionError> {
        self.create_branch_with_id(generate_branch_id(), from_sequence, name, initial_content)
    }

    /// Fork a branch under a caller-chosen id.
    ///
    /// # Errors
    ///
    /// As [`create_branch`](Self::create_branch), plus
    /// [`SessionError::InvalidBranchTarget`] if the id is already taken.
    pub fn create_branch_with_id(
        &mut self,
        id: impl Into<String>,
        from_sequence: u32,
        name: impl Into<String>,
        initial_content: Option<String>,
    ) -> Result<Branch, SessionError> {
        if !self.session.options.enable_branching {
            return Err(SessionError::BranchingDisabled);
        }
        let current = self.session.current_sequence;
        if from_sequence == 0 || from_sequence > current {
            return Err(SessionError::InvalidBranchTarget {
                reason: format!("fromSequence {from_sequence} is outside 1..={current}"),
            });
        }
        let id = id.into();
        if self.session.branch(&id).is_some() {
            return Err(SessionError::InvalidBranchTarget {
                reason: format!("branch {id} already exists"),
            });
        }

        self.session.branches.push(Branch {
            id: id.clone(),
            name: name.into(),
            from_sequence,
            thoughts: Vec::new(),
            is_active: true,
            confidence: BRANCH_SEED_CONFIDENCE,
        });
        self.session.metadata.branches_count += 1;

        tracing::debug!(session_id = %self.session.id, branch_id = %id, from_sequence, "Branch created");

        if let Some(content) = initial_content {
            self.add_thought(
                content,
                BRANCH_SEED_CONFIDENCE,
                ThoughtOptions::on_branch(id.clone(), from_sequence),
            )?;
        }

        self.session
            .branch(&id)
            .cloned()
            .ok_or_else(|| SessionError::InvalidBranchTarget {
                reason: format!("branch {id} vanished"),
            })
    }

    /// Mark a branch as no longer explored.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidBranchTarget`] for unknown ids.
    pub fn close_branch(&mut self, id: &str) -> Result<(), SessionError> {
        let branch = self
            .session
            .branches
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| SessionError::InvalidBranchTarget {
                reason: format!("unknown branch {id}"),
            })?;
        branch.is_active = false;
        Ok(())
    }

    /// Record an untested hypothesis.
    pub fn add_hypothesis(
        &mut self,
        statement: impl Into<String>,
        evidence: Vec<String>,
        counter_evidence: Vec<String>,
        confidence: f64,
    ) -> Hypothesis {
        let hypothesis = Hypothesis {
            id: generate_hypothesis_id(),
            statement: statement.into(),
            evidence,
            counter_evidence,
            confidence: clamp_confidence(confidence),
            tested: false,
            result: None,
            generated_at_sequence: self.session.thought_count(),
        };
        self.session.hypotheses.push(hypothesis.clone());
        self.session.metadata.hypotheses_count += 1;

        tracing::debug!(
            session_id = %self.session.id,
            hypothesis_id = %hypothesis.id,
            confidence = hypothesis.confidence,
            "Hypothesis added"
        );
        hypothesis
    }

    /// Apply a test verdict to a hypothesis.
    ///
    /// Confirmed adds 0.3 (capped at 1), rejected subtracts 0.4 (floored at
    /// 0), inconclusive leaves confidence alone. `additional_evidence` goes to
    /// `evidence` when confirmed and to `counter_evidence` when rejected.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::HypothesisNotFound`] for unknown ids.
    pub fn test_hypothesis(
        &mut self,
        id: &str,
        result: HypothesisResult,
        additional_evidence: Vec<String>,
    ) -> Result<Hypothesis, SessionError> {
        let hypothesis = self
            .session
            .hypotheses
            .iter_mut()
            .find(|h| h.id == id)
            .ok_or_else(|| SessionError::HypothesisNotFound { id: id.to_string() })?;

        hypothesis.confidence = result.apply(hypothesis.confidence);
        hypothesis.tested = true;
        hypothesis.result = Some(result);
        match result {
            HypothesisResult::Confirmed => hypothesis.evidence.extend(additional_evidence),
            HypothesisResult::Rejected => hypothesis.counter_evidence.extend(additional_evidence),
            HypothesisResult::Inconclusive => {}
        }

        tracing::debug!(
            hypothesis_id = %id,
            result = %result,
            confidence = hypothesis.confidence,
            "Hypothesis tested"
        );
        Ok(hypothesis.clone())
    }

    /// Record a conclusion.
    pub fn add_conclusion(
        &mut self,
        statement: impl Into<String>,
        supporting_thoughts: impl IntoIterator<Item = u32>,
        reasoning: impl Into<String>,
        confidence: f64,
        alternatives: Vec<String>,
    ) -> Conclusion {
        let conclusion = Conclusion {
            id: generate_conclusion_id(),
            statement: statement.into(),
            supporting_thoughts: supporting_thoughts.into_iter().collect(),
            confidence: clamp_confidence(confidence),
            reasoning: reasoning.into(),
            alternatives,
        };
        self.session.conclusions.push(conclusion.clone());
        conclusion
    }

    /// Stamp the end time and hand back the finished session.
    #[must_use]
    pub fn finalize(mut self) -> ReasoningSession {
        let end = self.clock.now();
        let elapsed = (end - self.session.metadata.start_time)
            .num_milliseconds()
            .max(0);
        self.session.metadata.end_time = Some(end);
        self.session.metadata.total_duration_ms = Some(u64::try_from(elapsed).unwrap_or(0));

        tracing::info!(
            session_id = %self.session.id,
            thoughts = self.session.thoughts.len(),
            revisions = self.session.metadata.revisions_count,
            branches = self.session.metadata.branches_count,
            hypotheses = self.session.metadata.hypotheses_count,
            duration_ms = elapsed,
            "Session finalized"
        );
        self.session
    }
}
