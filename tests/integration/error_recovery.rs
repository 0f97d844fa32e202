//! Error recovery: generator failures, invalid options and time limits.

use std::sync::Arc;
use std::time::Duration;

use mcp_brain::error::{ModeError, SessionError};
use mcp_brain::modes::{
    AnalysisDepth, ControlLoop, ProcessingMode, ReasoningRequest, MAX_CONSECUTIVE_FAILURES,
};
use mcp_brain::session::ProcessingOptions;
use pretty_assertions::assert_eq;

use super::run;
use super::scripted::{Call, ScriptedGenerator};

#[tokio::test]
async fn test_total_generator_outage_still_answers() {
    let generator = Arc::new(
        ScriptedGenerator::new()
            .failing_thoughts_from(1)
            .failing_synthesis(),
    );

    let result = run(&generator, ReasoningRequest::new("Pick a queue"), ProcessingMode::Think).await;

    assert_eq!(
        result.final_answer,
        "No reasoning steps could be completed for this problem."
    );
    assert_eq!(result.statistics.total_thoughts, 0);
    // Three seed attempts, three continuation attempts, one synthesis.
    assert_eq!(
        result.statistics.skipped_steps,
        3 + MAX_CONSECUTIVE_FAILURES + 1
    );
    assert!(result.recommendations.is_empty());
    assert_eq!(result.conclusions.unwrap().len(), 1);
}

#[tokio::test]
async fn test_partial_outage_summarizes_recorded_thoughts() {
    let generator = Arc::new(
        ScriptedGenerator::new()
            .with_confidences(&[0.8])
            .failing_thoughts_from(3)
            .failing_synthesis(),
    );
    let request = ReasoningRequest::new("Pick a queue")
        .with_options(ProcessingOptions::default().with_max_thoughts(5));

    let result = run(&generator, request, ProcessingMode::Think).await;

    assert_eq!(result.statistics.total_thoughts, 2);
    assert!(result
        .final_answer
        .starts_with("Recorded 2 reasoning steps with average confidence 0.80."));
    assert_eq!(result.recommendations, vec!["thought 1", "thought 2"]);
    assert!((result.confidence - 0.8).abs() < 1e-9);
    // The continuation phase gave up after repeated failures.
    assert_eq!(
        generator.count(|c| matches!(c, Call::Thought { sequence: 3, .. })),
        1 + MAX_CONSECUTIVE_FAILURES as usize
    );
}

#[tokio::test]
async fn test_invalid_options_fail_before_any_generation() {
    let generator = Arc::new(ScriptedGenerator::new());
    let request = ReasoningRequest::new("Pick a queue")
        .with_options(ProcessingOptions::default().with_time_limit_secs(1));

    let err = ControlLoop::new(Arc::clone(&generator))
        .run(request, &ProcessingMode::Think)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ModeError::Session(SessionError::InvalidOption { ref field, .. }) if field == "timeLimit"
    ));
    assert!(generator.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_time_limit_cuts_analysis_short() {
    let generator = Arc::new(ScriptedGenerator::new());
    let request = ReasoningRequest::new("Moving billing to a new vendor")
        .with_options(ProcessingOptions::default().with_time_limit_secs(30));

    let result = ControlLoop::new(Arc::clone(&generator))
        .with_pacing_delay(Duration::from_secs(20))
        .run(
            request,
            &ProcessingMode::Analyze {
                depth: AnalysisDepth::Detailed,
                explore_branches: true,
            },
        )
        .await
        .unwrap();

    assert!(result.statistics.timed_out);
    assert_eq!(result.statistics.total_thoughts, 2);
    // Synthesis still runs after the deadline.
    assert_eq!(result.final_answer, "synthesized answer from 2 thoughts");
    assert!(result.branches.unwrap()[0].thoughts.is_empty());
}
