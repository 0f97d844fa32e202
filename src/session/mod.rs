//! Reasoning session state.
//!
//! - [`types`]: the session data model
//! - [`SessionManager`]: the only mutation path, enforcing sequence,
//!   revision, branch and counter invariants
//! - [`classify_complexity`]: the complexity heuristic used at creation
//! - [`SessionRegistry`]: id-keyed sessions for caller-driven thinking
//!
//! # Example
//!
//! ```
//! use mcp_brain::session::{
//!     ProcessingOptions, ReasoningContext, SessionManager, ThinkingStyle, ThoughtOptions,
//! };
//!
//! let mut manager = SessionManager::create(
//!     "Should we cache results?",
//!     ThinkingStyle::Analytical,
//!     ReasoningContext::default(),
//!     ProcessingOptions::default().with_max_thoughts(3),
//! )
//! .unwrap();
//!
//! let thought = manager.add_thought("Start with the hit rate", 0.8, ThoughtOptions::new()).unwrap();
//! assert_eq!(thought.sequence, 1);
//! assert!(manager.needs_more_thoughts());
//! ```

mod complexity;
mod manager;
mod registry;
pub mod types;

pub use complexity::{classify_complexity, count_technical_terms, question_complexity};
pub use manager::{
    generate_branch_id, generate_conclusion_id, generate_hypothesis_id, generate_session_id,
    SessionManager, ThoughtOptions,
};
pub use registry::SessionRegistry;
pub use types::{
    clamp_confidence, Branch, Complexity, Conclusion, Hypothesis, HypothesisResult, OutputDetail,
    ProcessingOptions, ReasoningContext, ReasoningSession, SessionMetadata, ThinkingStyle,
    Thought, BRANCH_SEED_CONFIDENCE, DEFAULT_THOUGHT_CONFIDENCE, REVISION_CONFIDENCE_BOOST,
    REVISION_CONFIDENCE_FLOOR,
};
