//! Phase plans.
//!
//! A [`ProcessingMode`] is turned into a [`PhasePlan`]: the seed phase to
//! run and which of the shared follow-up phases are switched on. The control
//! loop interprets the plan; modes carry no behavior of their own.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::session::{Complexity, ProcessingOptions, ThinkingStyle};

/// Seed thoughts generated up front in think mode.
pub const THINK_SEED_THOUGHTS: u32 = 3;
/// Default iteration count in solve mode.
pub const DEFAULT_MAX_ITERATIONS: u32 = 3;
/// Largest accepted iteration count in solve mode.
pub const MAX_ITERATIONS_LIMIT: u32 = 10;
/// Focus areas used by reflect mode when the caller names none.
pub const DEFAULT_FOCUS_AREAS: [&str; 4] = ["logic", "completeness", "clarity", "assumptions"];
/// Stances explored on an analysis branch.
pub const BRANCH_STANCES: [&str; 4] = ["contrarian", "optimistic", "pessimistic", "outsider"];

const BASIC_STEPS: [&str; 3] = [
    "Problem Definition",
    "Context Analysis",
    "Component Breakdown",
];
const DETAILED_STEPS: [&str; 3] = ["Stakeholder Analysis", "Constraint Analysis", "Impact Analysis"];
const COMPREHENSIVE_STEPS: [&str; 4] = [
    "Trend Analysis",
    "Risk Analysis",
    "Opportunity Analysis",
    "Competitive Analysis",
];

/// How many analytical steps analyze mode runs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisDepth {
    /// Definition, context and components.
    Basic,
    /// Basic plus stakeholders, constraints and impact.
    #[default]
    Detailed,
    /// Detailed plus trends, risks, opportunities and competition.
    Comprehensive,
}

impl AnalysisDepth {
    /// Expert problems never get the basic treatment.
    #[must_use]
    pub fn adjusted_for(self, complexity: Complexity) -> Self {
        if self == Self::Basic && complexity == Complexity::Expert {
            Self::Detailed
        } else {
            self
        }
    }

    /// Ordered step names for this depth.
    #[must_use]
    pub fn steps(self) -> Vec<&'static str> {
        let mut steps = BASIC_STEPS.to_vec();
        if matches!(self, Self::Detailed | Self::Comprehensive) {
            steps.extend(DETAILED_STEPS);
        }
        if self == Self::Comprehensive {
            steps.extend(COMPREHENSIVE_STEPS);
        }
        steps
    }
}

/// Processing mode selected by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingMode {
    /// Open-ended thinking with revision.
    Think,
    /// Named analytical steps, optionally with branch exploration.
    Analyze {
        /// Step set.
        depth: AnalysisDepth,
        /// Whether to explore alternative stances on a branch.
        explore_branches: bool,
    },
    /// Iterative solution candidates, each with a tested hypothesis.
    Solve {
        /// Candidate budget.
        max_iterations: u32,
    },
    /// Reflection over caller-supplied text.
    Reflect {
        /// Lenses to review the text through.
        focus_areas: Vec<String>,
        /// Whether to produce a rewritten text.
        generate_improved_version: bool,
    },
}

impl ProcessingMode {
    /// Lowercase mode name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Think => "think",
            Self::Analyze { .. } => "analyze",
            Self::Solve { .. } => "solve",
            Self::Reflect { .. } => "reflect",
        }
    }

    /// Check mode-specific parameters.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidOption`] for an out-of-range
    /// `maxIterations`.
    pub fn validate(&self) -> Result<(), SessionError> {
        if let Self::Solve { max_iterations } = self {
            if !(1..=MAX_ITERATIONS_LIMIT).contains(max_iterations) {
                return Err(SessionError::InvalidOption {
                    field: "maxIterations".to_string(),
                    reason: format!(
                        "must be between 1 and {MAX_ITERATIONS_LIMIT}, got {max_iterations}"
                    ),
                });
            }
        }
        Ok(())
    }
}

/// First phase of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedPhase {
    /// A fixed number of open-ended thoughts.
    OpenEnded {
        /// Thoughts to generate.
        count: u32,
    },
    /// One thought per named step, tagged with the step name.
    NamedSteps(Vec<&'static str>),
    /// Candidate solutions, one per iteration.
    SolutionIterations {
        /// Candidate budget.
        max_iterations: u32,
    },
    /// One reflection per focus area over the problem text.
    Reflection {
        /// Lenses in order.
        focus_areas: Vec<String>,
        /// Whether to produce a rewritten text.
        generate_improved_version: bool,
    },
}

/// Where hypotheses are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HypothesisPhase {
    /// No hypotheses.
    Off,
    /// One hypothesis after the thought chain.
    Single,
    /// One hypothesis per solution candidate.
    PerCandidate,
}

/// The phases a run executes, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhasePlan {
    /// Seed phase.
    pub seed: SeedPhase,
    /// Run the continuation loop after seeding.
    pub continuation: bool,
    /// Explore alternative stances on a branch.
    pub branch_exploration: bool,
    /// Hypothesis placement.
    pub hypothesis: HypothesisPhase,
    /// Finish with a synthesis call.
    pub synthesis: bool,
}

impl PhasePlan {
    /// Build the plan for `mode`.
    #[must_use]
    pub fn for_mode(
        mode: &ProcessingMode,
        style: ThinkingStyle,
        complexity: Complexity,
        options: &ProcessingOptions,
    ) -> Self {
        let evidence_hypothesis = if options.require_evidence {
            HypothesisPhase::Single
        } else {
            HypothesisPhase::Off
        };

        match mode {
            ProcessingMode::Think => Self {
                seed: SeedPhase::OpenEnded {
                    count: THINK_SEED_THOUGHTS.min(options.max_thoughts),
                },
                continuation: true,
                branch_exploration: false,
                hypothesis: if style == ThinkingStyle::Scientific {
                    HypothesisPhase::Single
                } else {
                    evidence_hypothesis
                },
                synthesis: true,
            },
            ProcessingMode::Analyze {
                depth,
                explore_branches,
            } => Self {
                seed: SeedPhase::NamedSteps(depth.adjusted_for(complexity).steps()),
                continuation: false,
                branch_exploration: *explore_branches && options.enable_branching,
                hypothesis: evidence_hypothesis,
                synthesis: true,
            },
            ProcessingMode::Solve { max_iterations } => Self {
                seed: SeedPhase::SolutionIterations {
                    max_iterations: *max_iterations,
                },
                continuation: false,
                branch_exploration: false,
                hypothesis: HypothesisPhase::PerCandidate,
                synthesis: true,
            },
            ProcessingMode::Reflect {
                focus_areas,
                generate_improved_version,
            } => Self {
                seed: SeedPhase::Reflection {
                    focus_areas: if focus_areas.is_empty() {
                        DEFAULT_FOCUS_AREAS.iter().map(ToString::to_string).collect()
                    } else {
                        focus_areas.clone()
                    },
                    generate_improved_version: *generate_improved_version,
                },
                continuation: false,
                branch_exploration: false,
                hypothesis: HypothesisPhase::Off,
                synthesis: false,
            },
        }
    }
}
