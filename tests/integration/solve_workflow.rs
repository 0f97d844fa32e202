//! Solve workflow: candidate → tested hypothesis → accept or iterate.

use std::sync::Arc;

use mcp_brain::error::{ModeError, SessionError};
use mcp_brain::modes::{ControlLoop, ProcessingMode, ReasoningRequest};
use mcp_brain::session::{HypothesisResult, ProcessingOptions};
use pretty_assertions::assert_eq;

use super::run;
use super::scripted::{Call, ScriptedGenerator};

const PROBLEM: &str = "Reduce checkout latency below 200ms";

#[tokio::test]
async fn test_solve_accepts_confident_confirmed_candidate() {
    let generator = Arc::new(ScriptedGenerator::new().with_confidences(&[0.9]));

    let result = run(
        &generator,
        ReasoningRequest::new(PROBLEM),
        ProcessingMode::Solve { max_iterations: 3 },
    )
    .await;

    assert_eq!(result.mode, "solve");
    assert_eq!(result.statistics.total_thoughts, 1);
    assert_eq!(result.statistics.hypotheses_tested, 1);
    let thoughts = result.thoughts.unwrap();
    assert!(thoughts[0].has_tag("solution"));
    assert!(thoughts[0].has_tag("iteration-1"));

    let extra = generator.calls().into_iter().find_map(|c| match c {
        Call::Test { extra } => extra,
        _ => None,
    });
    assert_eq!(
        extra.as_deref(),
        Some("Solution candidate #1: thought 1: Propose a concrete solution")
    );
}

#[tokio::test]
async fn test_solve_iterates_while_candidates_are_rejected() {
    let generator = Arc::new(
        ScriptedGenerator::new()
            .with_confidences(&[0.9])
            .with_verdicts(&[HypothesisResult::Rejected]),
    );

    let result = run(
        &generator,
        ReasoningRequest::new(PROBLEM),
        ProcessingMode::Solve { max_iterations: 3 },
    )
    .await;

    assert_eq!(result.statistics.total_thoughts, 3);
    assert_eq!(result.statistics.hypotheses_tested, 3);
    let thoughts = result.thoughts.unwrap();
    for (i, thought) in thoughts.iter().enumerate() {
        assert!(thought.has_tag(&format!("iteration-{}", i + 1)));
    }
    let hypotheses = result.hypotheses.unwrap();
    assert!(hypotheses
        .iter()
        .all(|h| h.result == Some(HypothesisResult::Rejected)));
    assert!(hypotheses.iter().all(|h| h.counter_evidence == vec!["load test"]));
}

#[tokio::test]
async fn test_solve_keeps_going_when_confirmed_candidate_is_weak() {
    let generator = Arc::new(
        ScriptedGenerator::new()
            .with_confidences(&[0.5, 0.9])
            .with_verdicts(&[HypothesisResult::Confirmed]),
    );

    let result = run(
        &generator,
        ReasoningRequest::new(PROBLEM),
        ProcessingMode::Solve { max_iterations: 5 },
    )
    .await;

    // Candidate 1 is below the 0.7 threshold, candidate 2 is accepted.
    assert_eq!(result.statistics.total_thoughts, 2);
    assert_eq!(result.statistics.hypotheses_tested, 2);
}

#[tokio::test]
async fn test_solve_candidates_are_capped_by_thought_budget() {
    let generator = Arc::new(
        ScriptedGenerator::new().with_verdicts(&[HypothesisResult::Inconclusive]),
    );
    let request =
        ReasoningRequest::new(PROBLEM).with_options(ProcessingOptions::default().with_max_thoughts(2));

    let result = run(&generator, request, ProcessingMode::Solve { max_iterations: 10 }).await;

    assert_eq!(result.statistics.total_thoughts, 2);
}

#[tokio::test]
async fn test_solve_rejects_iteration_count_out_of_range() {
    for max_iterations in [0, 11] {
        let generator = Arc::new(ScriptedGenerator::new());
        let err = ControlLoop::new(Arc::clone(&generator))
            .run(
                ReasoningRequest::new(PROBLEM),
                &ProcessingMode::Solve { max_iterations },
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ModeError::Session(SessionError::InvalidOption { ref field, .. }) if field == "maxIterations"
        ));
        assert!(generator.calls().is_empty());
    }
}
