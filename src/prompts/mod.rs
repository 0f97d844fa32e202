//! Prompt templates.
//!
//! Each generator capability has a system prompt (a `&'static str` telling
//! the model what JSON to return) and a builder that renders the session
//! state into the user message.
//!
//! # Example
//!
//! ```
//! use mcp_brain::prompts::{style_guidance, thought_system_prompt};
//! use mcp_brain::session::ThinkingStyle;
//!
//! assert!(thought_system_prompt().contains("\"confidence\""));
//! assert!(style_guidance(ThinkingStyle::Scientific).contains("hypotheses"));
//! ```

#![allow(clippy::missing_const_for_fn)]

use std::fmt::Write as _;

use crate::generator::Issue;
use crate::session::{Hypothesis, ReasoningContext, ThinkingStyle, Thought};

/// Longest thought excerpt rendered into a prompt.
const MAX_THOUGHT_CHARS: usize = 1_200;

/// One-line guidance for a thinking style.
#[must_use]
pub fn style_guidance(style: ThinkingStyle) -> &'static str {
    match style {
        ThinkingStyle::Analytical => "Break the problem into parts and reason about each part precisely.",
        ThinkingStyle::Systematic => "Follow an explicit, ordered procedure and do not skip steps.",
        ThinkingStyle::Creative => "Look for unconventional angles and lateral connections.",
        ThinkingStyle::Scientific => "Form testable hypotheses and weigh them against evidence.",
        ThinkingStyle::Critical => "Hunt for flaws, hidden assumptions and counterarguments.",
        ThinkingStyle::Strategic => "Reason about goals, trade-offs and long-term consequences.",
        ThinkingStyle::Intuitive => "Trust pattern recognition, then sanity-check the hunch.",
        ThinkingStyle::Collaborative => "Voice several stakeholder viewpoints and reconcile them.",
    }
}

/// System prompt for a single reasoning step.
#[must_use]
pub fn thought_system_prompt() -> &'static str {
    r#"You are a careful reasoning engine producing one step of a longer chain of thought.

Your task is to:
1. Read the problem and the prior thoughts
2. Produce exactly one new reasoning step that moves the analysis forward
3. Rate your confidence in this step (0.0-1.0)

Respond with a JSON object in this exact format:
{
  "content": "The reasoning step",
  "confidence": 0.75
}

Important:
- Do not repeat earlier thoughts
- Lower your confidence when the step rests on assumptions"#
}

/// System prompt for revising a weak thought.
#[must_use]
pub fn revision_system_prompt() -> &'static str {
    r#"You are revising one weak step in a chain of thought.

Your task is to:
1. Identify what is wrong, vague or unsupported in the original step
2. Rewrite it so it is correct, specific and consistent with the other steps

Respond with a JSON object in this exact format:
{
  "content": "The revised reasoning step"
}"#
}

/// System prompt for proposing a hypothesis.
#[must_use]
pub fn hypothesis_system_prompt() -> &'static str {
    r#"You are forming a falsifiable hypothesis from an ongoing analysis.

Your task is to:
1. State one concrete, testable claim that would resolve the problem if true
2. List the evidence from the thoughts that supports it
3. Rate your confidence (0.0-1.0)

Respond with a JSON object in this exact format:
{
  "statement": "The hypothesis",
  "evidence": ["Supporting point 1", "Supporting point 2"],
  "confidence": 0.6
}"#
}

/// System prompt for testing a hypothesis.
#[must_use]
pub fn hypothesis_test_system_prompt() -> &'static str {
    r#"You are testing a hypothesis against the reasoning collected so far.

Your task is to:
1. Weigh the supporting and contradicting evidence
2. Decide whether the hypothesis is confirmed, rejected or inconclusive
3. List the new evidence your verdict relies on

Respond with a JSON object in this exact format:
{
  "result": "confirmed|rejected|inconclusive",
  "evidence": ["Evidence behind the verdict"],
  "reasoning": "Why the evidence leads to this verdict"
}

Important:
- Choose inconclusive when evidence is thin on both sides"#
}

/// System prompt for the final synthesis.
#[must_use]
pub fn synthesis_system_prompt() -> &'static str {
    r#"You are synthesizing a complete reasoning session into a final answer.

Your task is to:
1. Combine the thoughts and tested hypotheses into one coherent answer
2. Rate your overall confidence (0.0-1.0)
3. Give actionable recommendations and concrete next steps

Respond with a JSON object in this exact format:
{
  "analysis": "The final answer",
  "confidence": 0.8,
  "recommendations": ["Recommendation 1"],
  "next_steps": ["Next step 1"]
}"#
}

/// System prompt for reflecting on a text.
#[must_use]
pub fn reflection_system_prompt() -> &'static str {
    r#"You are reviewing a piece of text through one specific lens.

Your task is to:
1. Examine the text only for the requested focus area
2. Describe what works and what does not
3. Rate how well the text holds up on this focus area (0.0-1.0)

Respond with a JSON object in this exact format:
{
  "content": "Your reflection",
  "confidence": 0.7
}"#
}

/// System prompt for extracting issues from a reflection.
#[must_use]
pub fn issues_system_prompt() -> &'static str {
    r#"You are turning a review into a list of concrete issues.

Your task is to:
1. Extract each distinct problem the reflection identifies
2. Rate its severity as high, medium or low
3. Suggest a fix when one is clear

Respond with a JSON object in this exact format:
{
  "issues": [
    {"description": "The problem", "severity": "high|medium|low", "suggestion": "How to fix it"}
  ]
}

Important:
- Return an empty list when the reflection found no problems"#
}

/// System prompt for rewriting a text.
#[must_use]
pub fn improvement_system_prompt() -> &'static str {
    r#"You are rewriting a text to resolve a list of identified issues.

Your task is to:
1. Address every issue
2. Keep everything that already works

Respond with a JSON object in this exact format:
{
  "improved": "The full rewritten text"
}"#
}

fn excerpt(text: &str) -> String {
    if text.chars().count() <= MAX_THOUGHT_CHARS {
        text.to_string()
    } else {
        let cut: String = text.chars().take(MAX_THOUGHT_CHARS).collect();
        format!("{cut}...")
    }
}

/// Render thoughts as a numbered list.
#[must_use]
pub fn format_thoughts(thoughts: &[Thought]) -> String {
    if thoughts.is_empty() {
        return "(no thoughts yet)".to_string();
    }
    let mut out = String::new();
    for t in thoughts {
        let mut label = format!("[{}]", t.sequence);
        if let Some(target) = t.revises_sequence {
            let _ = write!(label, " (revises {target})");
        }
        if let Some(branch) = &t.branch_id {
            let _ = write!(label, " (branch {branch})");
        }
        let _ = writeln!(
            out,
            "{label} confidence {:.2}: {}",
            t.confidence,
            excerpt(&t.content)
        );
    }
    out
}

/// Render hypotheses with their verdicts.
#[must_use]
pub fn format_hypotheses(hypotheses: &[Hypothesis]) -> String {
    if hypotheses.is_empty() {
        return "(none)".to_string();
    }
    let mut out = String::new();
    for h in hypotheses {
        let verdict = h.result.map_or("untested", |r| r.as_str());
        let _ = writeln!(
            out,
            "- {} [{verdict}, confidence {:.2}]",
            h.statement, h.confidence
        );
    }
    out
}

/// Render the non-empty context fields.
#[must_use]
pub fn format_context(context: &ReasoningContext) -> String {
    let mut out = String::new();
    let mut line = |label: &str, value: &str| {
        let _ = writeln!(out, "{label}: {value}");
    };
    if let Some(domain) = &context.domain {
        line("Domain", domain);
    }
    if let Some(background) = &context.background {
        line("Background", background);
    }
    if !context.constraints.is_empty() {
        line("Constraints", &context.constraints.join("; "));
    }
    if !context.requirements.is_empty() {
        line("Requirements", &context.requirements.join("; "));
    }
    if !context.stakeholders.is_empty() {
        line("Stakeholders", &context.stakeholders.join("; "));
    }
    if let Some(timeframe) = &context.timeframe {
        line("Timeframe", timeframe);
    }
    if !context.resources.is_empty() {
        line("Resources", &context.resources.join("; "));
    }
    out
}

/// User message for the next thought.
#[must_use]
pub fn thought_message(
    problem: &str,
    prior: &[Thought],
    style: ThinkingStyle,
    target_sequence: u32,
    context: &ReasoningContext,
    focus: Option<&str>,
) -> String {
    let mut out = format!("Problem:\n{problem}\n\n");
    if !context.is_empty() {
        let _ = write!(out, "Context:\n{}\n", format_context(context));
    }
    let _ = write!(
        out,
        "Thinking style: {style}. {}\n\nPrior thoughts:\n{}\n",
        style_guidance(style),
        format_thoughts(prior)
    );
    if let Some(focus) = focus {
        let _ = writeln!(out, "Focus for this step: {focus}");
    }
    let _ = write!(out, "Write thought #{target_sequence}.");
    out
}

/// User message for revising `original`.
#[must_use]
pub fn revision_message(original: &Thought, all: &[Thought], problem: &str) -> String {
    format!(
        "Problem:\n{problem}\n\nAll thoughts:\n{}\nRevise thought #{} (confidence {:.2}):\n{}",
        format_thoughts(all),
        original.sequence,
        original.confidence,
        original.content
    )
}

/// User message for proposing a hypothesis.
#[must_use]
pub fn hypothesis_message(problem: &str, prior: &[Thought], style: ThinkingStyle) -> String {
    format!(
        "Problem:\n{problem}\n\nThinking style: {style}. {}\n\nThoughts so far:\n{}",
        style_guidance(style),
        format_thoughts(prior)
    )
}

/// User message for testing `hypothesis`.
#[must_use]
pub fn hypothesis_test_message(
    hypothesis: &Hypothesis,
    prior: &[Thought],
    extra_context: Option<&str>,
) -> String {
    let mut out = format!(
        "Hypothesis: {}\nSupporting evidence: {}\nContradicting evidence: {}\n\nThoughts:\n{}",
        hypothesis.statement,
        join_or_none(&hypothesis.evidence),
        join_or_none(&hypothesis.counter_evidence),
        format_thoughts(prior)
    );
    if let Some(extra) = extra_context {
        let _ = write!(out, "\nAdditional context: {extra}");
    }
    out
}

/// User message for the final synthesis.
#[must_use]
pub fn synthesis_message(
    problem: &str,
    thoughts: &[Thought],
    hypotheses: &[Hypothesis],
    style: ThinkingStyle,
    context: &ReasoningContext,
) -> String {
    let mut out = format!("Problem:\n{problem}\n\n");
    if !context.is_empty() {
        let _ = write!(out, "Context:\n{}\n", format_context(context));
    }
    let _ = write!(
        out,
        "Thinking style: {style}\n\nThoughts:\n{}\nHypotheses:\n{}",
        format_thoughts(thoughts),
        format_hypotheses(hypotheses)
    );
    out
}

/// User message for reflecting on `subject`.
#[must_use]
pub fn reflection_message(subject: &str, focus: &str, style: ThinkingStyle) -> String {
    format!(
        "Focus area: {focus}\nThinking style: {style}. {}\n\nText:\n{subject}",
        style_guidance(style)
    )
}

/// User message for extracting issues.
#[must_use]
pub fn issues_message(subject: &str, reflection: &str, focus: &str) -> String {
    format!("Focus area: {focus}\n\nText:\n{subject}\n\nReflection:\n{reflection}")
}

/// User message for rewriting `subject`.
#[must_use]
pub fn improvement_message(subject: &str, issues: &[Issue]) -> String {
    let mut out = format!("Text:\n{subject}\n\nIssues to resolve:\n");
    for issue in issues {
        let _ = write!(out, "- [{}] {}", issue.severity, issue.description);
        if let Some(suggestion) = &issue.suggestion {
            let _ = write!(out, " (suggested fix: {suggestion})");
        }
        out.push('\n');
    }
    out
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join("; ")
    }
}
