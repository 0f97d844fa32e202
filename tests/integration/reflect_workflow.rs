//! Reflect workflow: focus reflections → issues → improved version.

use std::sync::Arc;

use mcp_brain::generator::Severity;
use mcp_brain::modes::{ProcessingMode, ReasoningRequest, DEFAULT_FOCUS_AREAS};
use mcp_brain::session::ThinkingStyle;
use pretty_assertions::assert_eq;

use super::run;
use super::scripted::{issue, Call, ScriptedGenerator};

const TEXT: &str = "Our new cache will make every page faster for all users.";

fn request() -> ReasoningRequest {
    ReasoningRequest::new(TEXT).with_style(ThinkingStyle::Critical)
}

#[tokio::test]
async fn test_reflect_uses_default_focus_areas() {
    let generator = Arc::new(ScriptedGenerator::new());

    let result = run(
        &generator,
        request(),
        ProcessingMode::Reflect {
            focus_areas: Vec::new(),
            generate_improved_version: true,
        },
    )
    .await;

    let reflected: Vec<String> = generator
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            Call::Reflect { focus } => Some(focus),
            _ => None,
        })
        .collect();
    assert_eq!(reflected, DEFAULT_FOCUS_AREAS.to_vec());

    let thoughts = result.thoughts.unwrap();
    assert_eq!(thoughts.len(), 4);
    assert!(thoughts.iter().all(|t| t.has_tag("reflection")));

    // No issues means nothing to improve, even when asked.
    let reflection = result.reflection.unwrap();
    assert!(reflection.improvements.is_empty());
    assert!(reflection.improved_version.is_none());
    assert_eq!(generator.count(|c| matches!(c, Call::Improve { .. })), 0);
    assert_eq!(generator.count(|c| matches!(c, Call::Synthesis)), 0);
    assert!((result.confidence - 0.8).abs() < 1e-9);
}

#[tokio::test]
async fn test_reflect_collects_issues_and_improves() {
    let generator = Arc::new(ScriptedGenerator::new().with_issues(vec![
        issue("Unsupported claim", Severity::High, Some("Cite the benchmark")),
        issue("Vague scope", Severity::Medium, None),
    ]));

    let result = run(
        &generator,
        request(),
        ProcessingMode::Reflect {
            focus_areas: vec!["logic".to_string()],
            generate_improved_version: true,
        },
    )
    .await;

    assert_eq!(result.mode, "reflect");
    assert_eq!(
        result.final_answer,
        "Reviewed 1 focus areas and found 2 issues (1 high, 1 medium, 0 low)."
    );
    assert_eq!(
        result.recommendations,
        vec!["Cite the benchmark", "Address: Vague scope"]
    );
    assert_eq!(result.next_steps, vec!["Resolve: Unsupported claim"]);
    // 0.8 - 0.2 (high) - 0.1 (medium) + 0.1 (improvements)
    assert!((result.confidence - 0.6).abs() < 1e-9);

    let reflection = result.reflection.unwrap();
    assert_eq!(reflection.improved_version.as_deref(), Some("improved text"));
    assert!(generator.calls().contains(&Call::Improve { issues: 2 }));

    let thought = &result.thoughts.unwrap()[0];
    assert!(thought.has_tag("logic"));
    assert_eq!(thought.content, "logic looks uneven");
}

#[tokio::test]
async fn test_reflect_deduplicates_improvements_across_focus_areas() {
    let generator = Arc::new(ScriptedGenerator::new().with_issues(vec![issue(
        "Unsupported claim",
        Severity::Low,
        Some("Cite the benchmark"),
    )]));

    let result = run(
        &generator,
        request(),
        ProcessingMode::Reflect {
            focus_areas: vec!["logic".to_string(), "clarity".to_string()],
            generate_improved_version: false,
        },
    )
    .await;

    let reflection = result.reflection.unwrap();
    assert_eq!(reflection.reflections.len(), 2);
    assert_eq!(reflection.improvements, vec!["Cite the benchmark"]);
    assert!(reflection.improved_version.is_none());
    assert_eq!(generator.count(|c| matches!(c, Call::Improve { .. })), 0);
}
