//! The reasoning control loop.
//!
//! [`ControlLoop::run`] creates a session, turns the requested mode into a
//! [`PhasePlan`] and executes it phase by phase:
//!
//! 1. seed (open-ended thoughts, named steps, solution candidates or
//!    reflections)
//! 2. continuation, revising weak thoughts or extending the chain
//! 3. branch exploration
//! 4. hypothesis generation and testing
//! 5. synthesis into a final answer
//!
//! Generator failures skip the step they belong to. Session contract
//! violations abort the run.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::plan::{HypothesisPhase, PhasePlan, ProcessingMode, SeedPhase, BRANCH_STANCES};
use super::result::{FocusReflection, ProcessingStats, ReasoningResult, ReflectionOutcome};
use crate::error::ModeError;
use crate::generator::{GeneratedThought, Generator, Issue, Severity, Synthesis};
use crate::session::{
    Hypothesis, HypothesisResult, ProcessingOptions, ReasoningContext, SessionManager,
    ThinkingStyle, Thought, ThoughtOptions, REVISION_CONFIDENCE_BOOST,
};
use crate::traits::{RealTimeProvider, TimeProvider};

/// Consecutive failed continuation steps after which the loop gives up.
pub const MAX_CONSECUTIVE_FAILURES: u32 = 3;

/// Input for one reasoning run.
#[derive(Debug, Clone, PartialEq)]
pub struct ReasoningRequest {
    /// Problem or subject text.
    pub problem: String,
    /// Thinking style.
    pub style: ThinkingStyle,
    /// Caller context.
    pub context: ReasoningContext,
    /// Processing options.
    pub options: ProcessingOptions,
}

impl ReasoningRequest {
    /// Request with default style, context and options.
    #[must_use]
    pub fn new(problem: impl Into<String>) -> Self {
        Self {
            problem: problem.into(),
            style: ThinkingStyle::default(),
            context: ReasoningContext::default(),
            options: ProcessingOptions::default(),
        }
    }

    /// Set the thinking style.
    #[must_use]
    pub const fn with_style(mut self, style: ThinkingStyle) -> Self {
        self.style = style;
        self
    }

    /// Set the context.
    #[must_use]
    pub fn with_context(mut self, context: ReasoningContext) -> Self {
        self.context = context;
        self
    }

    /// Set the options.
    #[must_use]
    pub fn with_options(mut self, options: ProcessingOptions) -> Self {
        self.options = options;
        self
    }
}

/// Executes phase plans against a [`Generator`].
pub struct ControlLoop<G: Generator + ?Sized = dyn Generator> {
    generator: Arc<G>,
    pacing_delay: Duration,
    clock: Arc<dyn TimeProvider>,
}

impl<G: Generator + ?Sized> std::fmt::Debug for ControlLoop<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlLoop")
            .field("pacing_delay", &self.pacing_delay)
            .finish_non_exhaustive()
    }
}

impl<G: Generator + ?Sized> ControlLoop<G> {
    /// Create a loop on the system clock with no pacing.
    #[must_use]
    pub fn new(generator: Arc<G>) -> Self {
        Self {
            generator,
            pacing_delay: Duration::ZERO,
            clock: Arc::new(RealTimeProvider),
        }
    }

    /// Pause for `delay` after every generator call.
    #[must_use]
    pub fn with_pacing_delay(mut self, delay: Duration) -> Self {
        self.pacing_delay = delay;
        self
    }

    /// Use an injected clock for session timestamps.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn TimeProvider>) -> Self {
        self.clock = clock;
        self
    }

    /// Run `mode` over `request`.
    ///
    /// # Errors
    ///
    /// - [`ModeError::Session`] for invalid options or mode parameters, and
    ///   for any session contract violation during the run.
    ///
    /// Generator failures never surface here; they shorten the run instead.
    pub async fn run(
        &self,
        request: ReasoningRequest,
        mode: &ProcessingMode,
    ) -> Result<ReasoningResult, ModeError> {
        mode.validate()?;
        let manager = SessionManager::create_with_clock(
            request.problem,
            request.style,
            request.context,
            request.options,
            Arc::clone(&self.clock),
        )?;

        let session = manager.session();
        let plan = PhasePlan::for_mode(
            mode,
            session.thinking_style,
            session.metadata.complexity,
            &session.options,
        );
        let started = Instant::now();
        let deadline = started + Duration::from_secs(session.options.time_limit_secs);

        info!(
            session_id = %session.id,
            mode = mode.as_str(),
            style = %session.thinking_style,
            complexity = ?session.metadata.complexity,
            max_thoughts = session.options.max_thoughts,
            "Starting reasoning run"
        );

        let run = Run {
            generator: self.generator.as_ref(),
            pacing: self.pacing_delay,
            manager,
            started,
            deadline,
            skipped: 0,
            timed_out: false,
        };
        run.execute(mode, plan).await
    }
}

/// State of one run in progress.
struct Run<'a, G: Generator + ?Sized> {
    generator: &'a G,
    pacing: Duration,
    manager: SessionManager,
    started: Instant,
    deadline: Instant,
    skipped: u32,
    timed_out: bool,
}

impl<G: Generator + ?Sized> Run<'_, G> {
    async fn execute(
        mut self,
        mode: &ProcessingMode,
        plan: PhasePlan,
    ) -> Result<ReasoningResult, ModeError> {
        let mut reflection = None;
        match &plan.seed {
            SeedPhase::OpenEnded { count } => self.seed_open_ended(*count).await?,
            SeedPhase::NamedSteps(steps) => self.seed_named_steps(steps).await?,
            SeedPhase::SolutionIterations { max_iterations } => {
                self.seed_solutions(
                    *max_iterations,
                    plan.hypothesis == HypothesisPhase::PerCandidate,
                )
                .await?;
            }
            SeedPhase::Reflection {
                focus_areas,
                generate_improved_version,
            } => {
                reflection = Some(
                    self.reflect(focus_areas, *generate_improved_version)
                        .await?,
                );
            }
        }

        if plan.continuation {
            self.continuation().await?;
        }
        if plan.branch_exploration {
            self.explore_branches().await?;
        }
        if plan.hypothesis == HypothesisPhase::Single {
            self.hypothesis_round(None).await?;
        }

        let synthesis = match &reflection {
            Some(outcome) => self.reflection_summary(outcome),
            None if plan.synthesis => self.synthesize().await?,
            None => self.fallback_synthesis(),
        };
        Ok(self.finish(mode, synthesis, reflection))
    }

    fn budget_left(&self) -> bool {
        self.manager.thought_count() < self.manager.session().options.max_thoughts
    }

    fn check_deadline(&mut self) -> bool {
        if !self.timed_out && Instant::now() >= self.deadline {
            self.timed_out = true;
            warn!(
                session_id = %self.manager.id(),
                thoughts = self.manager.thought_count(),
                "Time limit reached, wrapping up"
            );
        }
        self.timed_out
    }

    /// Pace, then turn a generator outcome into "value or skip".
    async fn settle<T: Send>(
        &mut self,
        phase: &'static str,
        outcome: Result<T, ModeError>,
    ) -> Result<Option<T>, ModeError> {
        if !self.pacing.is_zero() {
            tokio::time::sleep(self.pacing).await;
        }
        match outcome {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_structural() => Err(e),
            Err(e) => {
                self.skipped += 1;
                warn!(
                    session_id = %self.manager.id(),
                    phase,
                    error = %e,
                    "Generator step failed, skipping"
                );
                Ok(None)
            }
        }
    }

    async fn next_thought(&self, focus: Option<String>) -> Result<GeneratedThought, ModeError> {
        let s = self.manager.session();
        self.generator
            .generate_thought(
                &s.problem,
                &s.thoughts,
                s.thinking_style,
                s.thought_count() + 1,
                &s.context,
                focus,
            )
            .await
    }

    /// Generate and record one thought, or `None` if the generator failed.
    async fn extend(
        &mut self,
        phase: &'static str,
        focus: Option<String>,
        options: ThoughtOptions,
    ) -> Result<Option<Thought>, ModeError> {
        let outcome = self.next_thought(focus).await;
        let Some(generated) = self.settle(phase, outcome).await? else {
            return Ok(None);
        };
        let thought = self
            .manager
            .add_thought(generated.content, generated.confidence, options)?;
        Ok(Some(thought))
    }

    async fn seed_open_ended(&mut self, count: u32) -> Result<(), ModeError> {
        for _ in 0..count {
            if !self.budget_left() || self.check_deadline() {
                break;
            }
            self.extend("seed", None, ThoughtOptions::new().with_tag("initial"))
                .await?;
        }
        Ok(())
    }

    async fn seed_named_steps(&mut self, steps: &[&'static str]) -> Result<(), ModeError> {
        for step in steps {
            if !self.budget_left() || self.check_deadline() {
                break;
            }
            let options = ThoughtOptions::new().with_tag(*step).with_tag("analysis");
            self.extend("analysis", Some((*step).to_string()), options)
                .await?;
        }
        Ok(())
    }

    async fn seed_solutions(
        &mut self,
        max_iterations: u32,
        test_candidates: bool,
    ) -> Result<(), ModeError> {
        for iteration in 1..=max_iterations {
            if !self.budget_left() || self.check_deadline() {
                break;
            }
            let focus = if iteration == 1 {
                "Propose a concrete solution".to_string()
            } else {
                format!("Improve on the earlier candidates with solution candidate #{iteration}")
            };
            let options = ThoughtOptions::new()
                .with_tag("solution")
                .with_tag(format!("iteration-{iteration}"));
            let Some(candidate) = self.extend("solution", Some(focus), options).await? else {
                continue;
            };
            if !test_candidates {
                continue;
            }

            let extra = format!("Solution candidate #{iteration}: {}", candidate.content);
            let tested = self.hypothesis_round(Some(extra)).await?;
            let confirmed = tested
                .as_ref()
                .is_some_and(|h| h.result == Some(HypothesisResult::Confirmed));
            if confirmed
                && candidate.confidence >= self.manager.session().options.confidence_threshold
            {
                info!(
                    session_id = %self.manager.id(),
                    iteration,
                    confidence = candidate.confidence,
                    "Solution candidate accepted"
                );
                break;
            }
        }
        Ok(())
    }

    async fn continuation(&mut self) -> Result<(), ModeError> {
        let mut failures = 0;
        while self.manager.needs_more_thoughts() {
            if self.check_deadline() {
                break;
            }
            let target = if self.manager.should_revise() {
                self.manager.revision_target().cloned()
            } else {
                None
            };

            let recorded = match target {
                Some(target) => self.revise(&target).await?,
                None => self
                    .extend(
                        "continuation",
                        None,
                        ThoughtOptions::new().with_tag("continuation"),
                    )
                    .await?
                    .is_some(),
            };

            if recorded {
                failures = 0;
            } else {
                failures += 1;
                if failures >= MAX_CONSECUTIVE_FAILURES {
                    warn!(
                        session_id = %self.manager.id(),
                        failures,
                        "Giving up on continuation after repeated generator failures"
                    );
                    break;
                }
            }
        }
        Ok(())
    }

    async fn revise(&mut self, target: &Thought) -> Result<bool, ModeError> {
        let outcome = {
            let s = self.manager.session();
            self.generator
                .generate_revision(target, &s.thoughts, &s.problem)
                .await
        };
        let Some(content) = self.settle("revision", outcome).await? else {
            return Ok(false);
        };
        let confidence = (target.confidence + REVISION_CONFIDENCE_BOOST).min(1.0);
        let revision = self.manager.add_thought(
            content,
            confidence,
            ThoughtOptions::revision_of(target.sequence),
        )?;
        debug!(
            session_id = %self.manager.id(),
            revised = target.sequence,
            sequence = revision.sequence,
            "Revised weak thought"
        );
        Ok(true)
    }

    async fn explore_branches(&mut self) -> Result<(), ModeError> {
        let from = self.manager.thought_count();
        if from == 0 {
            debug!(session_id = %self.manager.id(), "Nothing to branch from");
            return Ok(());
        }
        let branch = self
            .manager
            .create_branch(from, "Alternative perspectives", None)?;

        for stance in BRANCH_STANCES {
            if self.check_deadline() {
                break;
            }
            let options = ThoughtOptions::on_branch(branch.id.clone(), from).with_tag(stance);
            let focus = format!("Take a {stance} stance on the analysis so far");
            self.extend("branch", Some(focus), options).await?;
        }
        self.manager.close_branch(&branch.id)?;
        Ok(())
    }

    /// Propose a hypothesis and test it. Returns the hypothesis as recorded,
    /// or `None` when nothing was recorded.
    async fn hypothesis_round(
        &mut self,
        extra_context: Option<String>,
    ) -> Result<Option<Hypothesis>, ModeError> {
        if self.check_deadline() {
            return Ok(None);
        }
        let outcome = {
            let s = self.manager.session();
            self.generator
                .generate_hypothesis(&s.problem, &s.thoughts, s.thinking_style)
                .await
        };
        let Some(proposed) = self.settle("hypothesis", outcome).await? else {
            return Ok(None);
        };
        if self.manager.session().options.require_evidence && proposed.evidence.is_empty() {
            warn!(
                session_id = %self.manager.id(),
                statement = %proposed.statement,
                "Discarding hypothesis without evidence"
            );
            return Ok(None);
        }

        let hypothesis = self.manager.add_hypothesis(
            proposed.statement,
            proposed.evidence,
            Vec::new(),
            proposed.confidence,
        );
        let outcome = self
            .generator
            .test_hypothesis(&hypothesis, &self.manager.session().thoughts, extra_context)
            .await;
        match self.settle("hypothesis-test", outcome).await? {
            Some(verdict) => Ok(Some(self.manager.test_hypothesis(
                &hypothesis.id,
                verdict.result,
                verdict.evidence,
            )?)),
            None => Ok(Some(hypothesis)),
        }
    }

    async fn reflect(
        &mut self,
        focus_areas: &[String],
        improve: bool,
    ) -> Result<ReflectionOutcome, ModeError> {
        let subject = self.manager.session().problem.clone();
        let style = self.manager.session().thinking_style;
        let mut outcome = ReflectionOutcome::default();

        for focus in focus_areas {
            if self.check_deadline() {
                break;
            }
            let reflected = self.generator.reflect(&subject, focus, style).await;
            let Some(reflection) = self.settle("reflection", reflected).await? else {
                continue;
            };
            self.manager.add_thought(
                reflection.content.clone(),
                reflection.confidence,
                ThoughtOptions::new()
                    .with_tag(focus.clone())
                    .with_tag("reflection"),
            )?;

            let found = self
                .generator
                .identify_issues(&subject, &reflection.content, focus)
                .await;
            let issues = self.settle("issues", found).await?.unwrap_or_default();
            outcome.reflections.push(FocusReflection {
                focus: focus.clone(),
                reflection: reflection.content,
                confidence: reflection.confidence,
                issues,
            });
        }

        let mut seen = HashSet::new();
        outcome.improvements = outcome
            .issues()
            .map(|i| {
                i.suggestion
                    .clone()
                    .unwrap_or_else(|| format!("Address: {}", i.description))
            })
            .filter(|s| seen.insert(s.clone()))
            .collect();

        if improve && !outcome.improvements.is_empty() && !self.check_deadline() {
            let issues: Vec<Issue> = outcome.issues().cloned().collect();
            let rewritten = self.generator.improve_text(&subject, &issues).await;
            outcome.improved_version = self.settle("improvement", rewritten).await?;
        }
        Ok(outcome)
    }

    fn reflection_summary(&mut self, outcome: &ReflectionOutcome) -> Synthesis {
        let total = outcome.issues().count();
        let analysis = format!(
            "Reviewed {} focus areas and found {total} issues ({} high, {} medium, {} low).",
            outcome.reflections.len(),
            outcome.count(Severity::High),
            outcome.count(Severity::Medium),
            outcome.count(Severity::Low),
        );
        let confidence = outcome.confidence();
        let next_steps = outcome
            .issues()
            .filter(|i| i.severity == Severity::High)
            .map(|i| format!("Resolve: {}", i.description))
            .collect();
        let support: Vec<u32> = self
            .manager
            .session()
            .thoughts_by_tag("reflection")
            .map(|t| t.sequence)
            .collect();
        self.manager.add_conclusion(
            analysis.clone(),
            support,
            "Aggregated from per-focus reflections",
            confidence,
            Vec::new(),
        );
        Synthesis {
            analysis,
            confidence,
            recommendations: outcome.improvements.clone(),
            next_steps,
        }
    }

    async fn synthesize(&mut self) -> Result<Synthesis, ModeError> {
        let outcome = {
            let s = self.manager.session();
            self.generator
                .synthesize(
                    &s.problem,
                    &s.thoughts,
                    &s.hypotheses,
                    s.thinking_style,
                    &s.context,
                )
                .await
        };
        let Some(synthesis) = self.settle("synthesis", outcome).await? else {
            return Ok(self.fallback_synthesis());
        };

        let s = self.manager.session();
        let support: Vec<u32> = s.main_line().map(|t| t.sequence).collect();
        let reasoning = format!(
            "Synthesized from {} thoughts and {} hypotheses",
            s.thoughts.len(),
            s.hypotheses.len()
        );
        self.manager.add_conclusion(
            synthesis.analysis.clone(),
            support,
            reasoning,
            synthesis.confidence,
            Vec::new(),
        );
        Ok(synthesis)
    }

    /// Deterministic answer built from the session alone.
    fn fallback_synthesis(&mut self) -> Synthesis {
        let s = self.manager.session();
        let count = s.thought_count();
        let average = s.average_confidence();
        let support: Vec<u32> = s.main_line().map(|t| t.sequence).collect();

        let mut strongest: Vec<&Thought> = s.main_line().collect();
        strongest.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        let recommendations: Vec<String> =
            strongest.iter().take(3).map(|t| t.content.clone()).collect();

        let analysis = if count == 0 {
            "No reasoning steps could be completed for this problem.".to_string()
        } else {
            format!(
                "Recorded {count} reasoning steps with average confidence {average:.2}. \
                 Automatic synthesis was unavailable; the strongest steps are listed as \
                 recommendations."
            )
        };

        self.manager.add_conclusion(
            analysis.clone(),
            support,
            "Summary of recorded session data",
            average,
            Vec::new(),
        );
        Synthesis {
            analysis,
            confidence: average,
            recommendations,
            next_steps: vec!["Review the recorded thoughts and retry synthesis".to_string()],
        }
    }

    fn finish(
        self,
        mode: &ProcessingMode,
        synthesis: Synthesis,
        reflection: Option<ReflectionOutcome>,
    ) -> ReasoningResult {
        let s = self.manager.session();
        let statistics = ProcessingStats {
            total_thoughts: s.thought_count(),
            elapsed_ms: u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX),
            revisions: s.metadata.revisions_count,
            branches_explored: s.metadata.branches_count,
            hypotheses_tested: s.tested_hypotheses(),
            skipped_steps: self.skipped,
            timed_out: self.timed_out,
        };
        info!(
            session_id = %s.id,
            mode = mode.as_str(),
            thoughts = statistics.total_thoughts,
            revisions = statistics.revisions,
            skipped = statistics.skipped_steps,
            timed_out = statistics.timed_out,
            confidence = synthesis.confidence,
            "Reasoning run complete"
        );
        ReasoningResult::assemble(
            mode.as_str(),
            self.manager.finalize(),
            synthesis,
            statistics,
            reflection,
        )
    }
}
