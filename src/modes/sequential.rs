//! Caller-driven sequential thinking.
//!
//! The caller supplies each thought; sessions live in a
//! [`SessionRegistry`] across calls and are addressed by id.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ModeError, SessionError};
use crate::session::{
    classify_complexity, ProcessingOptions, ReasoningContext, SessionManager, SessionRegistry,
    ThinkingStyle, ThoughtOptions, DEFAULT_THOUGHT_CONFIDENCE,
};
use crate::session::types::MAX_THOUGHTS_LIMIT;

/// One caller-supplied thought.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SequentialThought {
    /// The thought text.
    pub thought: String,
    /// The caller's idea of this thought's number.
    pub thought_number: u32,
    /// Estimated total thoughts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_thoughts: Option<u32>,
    /// Whether another thought will follow.
    pub next_thought_needed: bool,
    /// Whether this thought revises an earlier one.
    #[serde(default)]
    pub is_revision: bool,
    /// Thought number being revised.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revises_thought: Option<u32>,
    /// Thought number a branch forks from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_from_thought: Option<u32>,
    /// Branch identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<String>,
    /// Raise the estimate past the current count.
    #[serde(default)]
    pub needs_more_thoughts: bool,
    /// Confidence in `[0, 1]`, 0.7 when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Session to continue; a new one is created when unknown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl SequentialThought {
    /// A plain thought.
    #[must_use]
    pub fn new(thought: impl Into<String>, thought_number: u32, next_thought_needed: bool) -> Self {
        Self {
            thought: thought.into(),
            thought_number,
            next_thought_needed,
            ..Self::default()
        }
    }

    /// Continue `session_id`.
    #[must_use]
    pub fn in_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Mark as a revision of `thought_number`.
    #[must_use]
    pub const fn revising(mut self, thought_number: u32) -> Self {
        self.is_revision = true;
        self.revises_thought = Some(thought_number);
        self
    }

    /// Place on a branch.
    #[must_use]
    pub fn on_branch(mut self, branch_id: Option<String>, from_thought: Option<u32>) -> Self {
        self.branch_id = branch_id;
        self.branch_from_thought = from_thought;
        self
    }

    /// Set the confidence.
    #[must_use]
    pub const fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

/// State after recording a thought.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequentialStatus {
    /// Session identifier to pass back on the next call.
    pub session_id: String,
    /// Sequence assigned to the thought.
    pub thought_number: u32,
    /// Current estimate of the total.
    pub total_thoughts: u32,
    /// Echo of the caller's flag.
    pub next_thought_needed: bool,
    /// Branch ids in creation order.
    pub branches: Vec<String>,
    /// Thoughts recorded so far.
    pub thought_history_length: u32,
    /// Mean confidence so far.
    pub average_confidence: f64,
}

/// Record one caller-supplied thought.
///
/// # Errors
///
/// - [`ModeError::MissingField`] for blank thought text.
/// - [`ModeError::Session`] when the thought breaks a session contract
///   (bad revision target, branching disabled, branch mismatch).
pub fn record_thought(
    registry: &mut SessionRegistry,
    input: SequentialThought,
) -> Result<SequentialStatus, ModeError> {
    if input.thought.trim().is_empty() {
        return Err(ModeError::MissingField {
            field: "thought".to_string(),
        });
    }

    let (session_id, created) = match input.session_id.as_deref() {
        Some(id) if registry.get(id).is_some() => (id.to_string(), false),
        requested => {
            let estimate = input
                .total_thoughts
                .unwrap_or_else(|| classify_complexity(&input.thought).suggested_thoughts());
            let options = ProcessingOptions::default().with_max_thoughts(
                estimate.clamp(1, MAX_THOUGHTS_LIMIT),
            );
            let manager = registry.create(
                requested.map(ToString::to_string),
                input.thought.clone(),
                ThinkingStyle::default(),
                ReasoningContext::default(),
                options,
            )?;
            manager.set_total_thoughts_estimate(estimate);
            (manager.id().to_string(), true)
        }
    };

    // A rejected thought must leave the session as it was, so work on a copy.
    let mut staged = registry.require_mut(&session_id)?.clone();
    match apply_thought(&mut staged, session_id.clone(), input) {
        Ok(status) => {
            *registry.require_mut(&session_id)? = staged;
            Ok(status)
        }
        Err(err) => {
            if created {
                registry.remove(&session_id);
                debug!(
                    session_id = %session_id,
                    "Dropped session opened by a rejected thought"
                );
            }
            Err(err)
        }
    }
}

fn apply_thought(
    manager: &mut SessionManager,
    session_id: String,
    input: SequentialThought,
) -> Result<SequentialStatus, ModeError> {
    let mut options = ThoughtOptions {
        is_revision: input.is_revision,
        revises_sequence: input.revises_thought,
        ..ThoughtOptions::default()
    };

    match (input.branch_id, input.branch_from_thought) {
        (None, None) => {}
        (Some(id), from) if manager.session().branch(&id).is_some() => {
            let fork = manager.session().branch(&id).map(|b| b.from_sequence);
            options.branch_from_sequence = from.or(fork);
            options.branch_id = Some(id);
        }
        (id, Some(from)) => {
            let branch = match id {
                Some(id) => manager.create_branch_with_id(id, from, "Caller branch", None)?,
                None => manager.create_branch(from, "Caller branch", None)?,
            };
            options.branch_id = Some(branch.id);
            options.branch_from_sequence = Some(from);
        }
        (Some(id), None) => {
            return Err(SessionError::InvalidBranchTarget {
                reason: format!("branch {id} does not exist and no branchFromThought was given"),
            }
            .into());
        }
    }

    let confidence = input.confidence.unwrap_or(DEFAULT_THOUGHT_CONFIDENCE);
    let thought = manager.add_thought(input.thought, confidence, options)?;
    if thought.sequence != input.thought_number {
        debug!(
            session_id = %session_id,
            claimed = input.thought_number,
            assigned = thought.sequence,
            "Caller thought number differs from assigned sequence"
        );
    }

    let count = manager.thought_count();
    let mut total = input
        .total_thoughts
        .unwrap_or(manager.session().total_thoughts_estimate)
        .max(count);
    if input.needs_more_thoughts {
        total = total.max(count + 1);
    }
    manager.set_total_thoughts_estimate(total);

    let session = manager.session();
    Ok(SequentialStatus {
        session_id,
        thought_number: thought.sequence,
        total_thoughts: total,
        next_thought_needed: input.next_thought_needed,
        branches: session.branches.iter().map(|b| b.id.clone()).collect(),
        thought_history_length: count,
        average_confidence: session.average_confidence(),
    })
}
