//! Processing modes.
//!
//! Four generated modes share one control loop and differ only in their
//! [`PhasePlan`]:
//!
//! - **think**: open-ended thoughts, continued and revised until the budget
//!   or confidence threshold is reached
//! - **analyze**: one thought per analytical step, optionally followed by
//!   alternative stances on a branch
//! - **solve**: solution candidates, each checked with a tested hypothesis
//! - **reflect**: per-focus reflections, issues and an optional rewrite
//!
//! [`record_thought`] is the caller-driven variant: the caller writes every
//! thought and sessions persist in a [`SessionRegistry`](crate::session::SessionRegistry).
//!
//! # Example
//!
//! ```ignore
//! use mcp_brain::modes::{ControlLoop, ProcessingMode, ReasoningRequest};
//!
//! let control = ControlLoop::new(generator);
//! let result = control
//!     .run(ReasoningRequest::new("Should we shard the orders table?"), &ProcessingMode::Think)
//!     .await?;
//! println!("{} ({:.2})", result.final_answer, result.confidence);
//! ```

mod control;
mod plan;
mod result;
mod sequential;

pub use control::{ControlLoop, ReasoningRequest, MAX_CONSECUTIVE_FAILURES};
pub use plan::{
    AnalysisDepth, HypothesisPhase, PhasePlan, ProcessingMode, SeedPhase, BRANCH_STANCES,
    DEFAULT_FOCUS_AREAS, DEFAULT_MAX_ITERATIONS, MAX_ITERATIONS_LIMIT, THINK_SEED_THOUGHTS,
};
pub use result::{FocusReflection, ProcessingStats, ReasoningResult, ReflectionOutcome};
pub use sequential::{record_thought, SequentialStatus, SequentialThought};
