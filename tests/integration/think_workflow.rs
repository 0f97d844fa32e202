//! Think workflow: seed → continue/revise → hypothesis → synthesize.

use std::sync::Arc;

use mcp_brain::modes::{ProcessingMode, ReasoningRequest, THINK_SEED_THOUGHTS};
use mcp_brain::session::{HypothesisResult, OutputDetail, ProcessingOptions, ThinkingStyle};
use pretty_assertions::assert_eq;

use super::run;
use super::scripted::{Call, ScriptedGenerator};

#[tokio::test]
async fn test_think_seeds_then_continues_to_budget() {
    let generator = Arc::new(ScriptedGenerator::new().with_confidences(&[0.9]));
    let request = ReasoningRequest::new("Pick a queue for order events").with_options(
        ProcessingOptions::default()
            .with_max_thoughts(5)
            .with_allow_revision(false),
    );

    let result = run(&generator, request, ProcessingMode::Think).await;

    assert_eq!(result.mode, "think");
    assert_eq!(result.statistics.total_thoughts, 5);
    assert_eq!(result.final_answer, "synthesized answer from 5 thoughts");
    let thoughts = result.thoughts.unwrap();
    let seeded = thoughts.iter().filter(|t| t.has_tag("initial")).count();
    let continued = thoughts.iter().filter(|t| t.has_tag("continuation")).count();
    assert_eq!(seeded, THINK_SEED_THOUGHTS as usize);
    assert_eq!(continued, 2);
    assert_eq!(
        thoughts.iter().map(|t| t.sequence).collect::<Vec<_>>(),
        vec![1, 2, 3, 4, 5]
    );
    assert_eq!(generator.count(|c| matches!(c, Call::Hypothesis)), 0);
    assert_eq!(generator.calls().last(), Some(&Call::Synthesis));
}

#[tokio::test]
async fn test_think_revises_the_weakest_thought() {
    let generator = Arc::new(ScriptedGenerator::new().with_confidences(&[0.8, 0.4, 0.8]));
    let request = ReasoningRequest::new("Pick a queue for order events")
        .with_options(ProcessingOptions::default().with_max_thoughts(5));

    let result = run(&generator, request, ProcessingMode::Think).await;

    assert_eq!(result.statistics.total_thoughts, 5);
    assert_eq!(result.statistics.revisions, 1);
    assert!(generator.calls().contains(&Call::Revision { of: 2 }));

    let thoughts = result.thoughts.unwrap();
    let revision = &thoughts[3];
    assert!(revision.is_revision);
    assert_eq!(revision.revises_sequence, Some(2));
    assert!((revision.confidence - 0.6).abs() < 1e-9);
    assert!(revision.content.starts_with("revised"));
    // A revision just happened, so the next step extends instead.
    assert!(!thoughts[4].is_revision);
}

#[tokio::test]
async fn test_think_scientific_style_tests_one_hypothesis() {
    let generator = Arc::new(ScriptedGenerator::new());
    let request = ReasoningRequest::new("Why does the nightly job slow down")
        .with_style(ThinkingStyle::Scientific)
        .with_options(ProcessingOptions::default().with_max_thoughts(3));

    let result = run(&generator, request, ProcessingMode::Think).await;

    assert_eq!(result.statistics.hypotheses_tested, 1);
    let hypotheses = result.hypotheses.unwrap();
    assert_eq!(hypotheses.len(), 1);
    assert_eq!(hypotheses[0].result, Some(HypothesisResult::Confirmed));
    assert!((hypotheses[0].confidence - 0.8).abs() < 1e-9);
    assert_eq!(hypotheses[0].evidence, vec!["benchmark data", "load test"]);
    assert!(generator.calls().contains(&Call::Test { extra: None }));
}

#[tokio::test]
async fn test_think_summary_detail_drops_lists() {
    let generator = Arc::new(ScriptedGenerator::new());
    let request = ReasoningRequest::new("Pick a queue").with_options(
        ProcessingOptions::default()
            .with_max_thoughts(2)
            .with_output_detail(OutputDetail::Summary),
    );

    let result = run(&generator, request, ProcessingMode::Think).await;

    assert!(result.thoughts.is_none());
    assert!(result.conclusions.is_none());
    assert!(result.session.is_none());
    assert_eq!(result.recommendations, vec!["Roll out gradually"]);
    assert_eq!(result.next_steps, vec!["Write the migration plan"]);
}

#[tokio::test]
async fn test_think_complete_detail_carries_finalized_session() {
    let generator = Arc::new(ScriptedGenerator::new());
    let request = ReasoningRequest::new("Pick a queue").with_options(
        ProcessingOptions::default()
            .with_max_thoughts(2)
            .with_output_detail(OutputDetail::Complete),
    );

    let result = run(&generator, request, ProcessingMode::Think).await;

    let session = result.session.unwrap();
    assert_eq!(session.id, result.session_id);
    assert_eq!(session.thoughts.len(), 2);
    assert_eq!(session.conclusions.len(), 1);
    assert!(session.metadata.end_time.is_some());
    assert!(session.metadata.total_duration_ms.is_some());
}

#[tokio::test]
async fn test_think_result_serializes_camel_case() {
    let generator = Arc::new(ScriptedGenerator::new());
    let request = ReasoningRequest::new("Pick a queue")
        .with_options(ProcessingOptions::default().with_max_thoughts(2));

    let result = run(&generator, request, ProcessingMode::Think).await;
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["finalAnswer"], "synthesized answer from 2 thoughts");
    assert_eq!(json["statistics"]["totalThoughts"], 2);
    assert_eq!(json["statistics"]["timedOut"], false);
    assert!(json.get("sessionId").is_some());
    assert!(json.get("reflection").is_none());
}
