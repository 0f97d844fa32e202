//! Analyze workflow: named steps → stance branch → synthesize.

use std::sync::Arc;

use mcp_brain::modes::{AnalysisDepth, ProcessingMode, ReasoningRequest, BRANCH_STANCES};
use mcp_brain::session::ProcessingOptions;
use pretty_assertions::assert_eq;

use super::run;
use super::scripted::{Call, ScriptedGenerator};

const SUBJECT: &str = "Moving billing to a new vendor";

const fn analyze(depth: AnalysisDepth, explore_branches: bool) -> ProcessingMode {
    ProcessingMode::Analyze {
        depth,
        explore_branches,
    }
}

#[tokio::test]
async fn test_analyze_walks_named_steps() {
    for (depth, expected) in [
        (AnalysisDepth::Basic, 3),
        (AnalysisDepth::Detailed, 6),
        (AnalysisDepth::Comprehensive, 10),
    ] {
        let generator = Arc::new(ScriptedGenerator::new());
        let request = ReasoningRequest::new(SUBJECT)
            .with_options(ProcessingOptions::default().with_max_thoughts(20));

        let result = run(&generator, request, analyze(depth, false)).await;

        assert_eq!(result.statistics.total_thoughts, expected, "{depth:?}");
        let thoughts = result.thoughts.unwrap();
        for (thought, step) in thoughts.iter().zip(depth.steps()) {
            assert!(thought.has_tag(step));
            assert!(thought.has_tag("analysis"));
        }
        assert_eq!(
            result.final_answer,
            format!("synthesized answer from {expected} thoughts")
        );
    }
}

#[tokio::test]
async fn test_analyze_steps_are_passed_as_focus() {
    let generator = Arc::new(ScriptedGenerator::new());
    let _ = run(
        &generator,
        ReasoningRequest::new(SUBJECT),
        analyze(AnalysisDepth::Basic, false),
    )
    .await;

    let focuses: Vec<Option<String>> = generator
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            Call::Thought { focus, .. } => Some(focus),
            _ => None,
        })
        .collect();
    assert_eq!(
        focuses,
        AnalysisDepth::Basic
            .steps()
            .into_iter()
            .map(|s| Some(s.to_string()))
            .collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn test_analyze_steps_stop_at_thought_budget() {
    let generator = Arc::new(ScriptedGenerator::new());
    let request = ReasoningRequest::new(SUBJECT)
        .with_options(ProcessingOptions::default().with_max_thoughts(4));

    let result = run(&generator, request, analyze(AnalysisDepth::Comprehensive, false)).await;

    assert_eq!(result.statistics.total_thoughts, 4);
}

#[tokio::test]
async fn test_analyze_explores_stances_on_one_branch() {
    let generator = Arc::new(ScriptedGenerator::new());
    let request = ReasoningRequest::new(SUBJECT)
        .with_options(ProcessingOptions::default().with_max_thoughts(20));

    let result = run(&generator, request, analyze(AnalysisDepth::Detailed, true)).await;

    assert_eq!(result.statistics.total_thoughts, 10);
    assert_eq!(result.statistics.branches_explored, 1);

    let branches = result.branches.unwrap();
    assert_eq!(branches.len(), 1);
    let branch = &branches[0];
    assert_eq!(branch.from_sequence, 6);
    assert_eq!(branch.thoughts, vec![7, 8, 9, 10]);
    assert!(!branch.is_active);

    let thoughts = result.thoughts.unwrap();
    for (thought, stance) in thoughts[6..].iter().zip(BRANCH_STANCES) {
        assert!(thought.has_tag(stance));
        assert!(thought.has_tag("branch"));
        assert_eq!(thought.branch_id.as_deref(), Some(branch.id.as_str()));
        assert_eq!(thought.branch_from_sequence, Some(6));
    }

    // The conclusion is supported by the main line only.
    let conclusion = &result.conclusions.unwrap()[0];
    assert_eq!(
        conclusion.supporting_thoughts.iter().copied().collect::<Vec<_>>(),
        vec![1, 2, 3, 4, 5, 6]
    );
}

#[tokio::test]
async fn test_analyze_skips_branches_when_branching_disabled() {
    let generator = Arc::new(ScriptedGenerator::new());
    let request = ReasoningRequest::new(SUBJECT).with_options(
        ProcessingOptions::default()
            .with_max_thoughts(20)
            .with_enable_branching(false),
    );

    let result = run(&generator, request, analyze(AnalysisDepth::Detailed, true)).await;

    assert_eq!(result.statistics.total_thoughts, 6);
    assert!(result.branches.unwrap().is_empty());
}

#[tokio::test]
async fn test_analyze_discards_hypothesis_without_evidence() {
    let generator = Arc::new(ScriptedGenerator::new().without_evidence());
    let request = ReasoningRequest::new(SUBJECT)
        .with_options(ProcessingOptions::default().with_require_evidence(true));

    let result = run(&generator, request, analyze(AnalysisDepth::Basic, false)).await;

    assert_eq!(generator.count(|c| matches!(c, Call::Hypothesis)), 1);
    assert_eq!(generator.count(|c| matches!(c, Call::Test { .. })), 0);
    assert!(result.hypotheses.unwrap().is_empty());
    assert_eq!(result.statistics.hypotheses_tested, 0);
}

#[tokio::test]
async fn test_analyze_keeps_hypothesis_with_evidence() {
    let generator = Arc::new(ScriptedGenerator::new());
    let request = ReasoningRequest::new(SUBJECT)
        .with_options(ProcessingOptions::default().with_require_evidence(true));

    let result = run(&generator, request, analyze(AnalysisDepth::Basic, false)).await;

    assert_eq!(result.statistics.hypotheses_tested, 1);
    assert_eq!(result.hypotheses.unwrap()[0].statement, "Claim after 3 thoughts");
}
