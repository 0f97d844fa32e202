//! Problem complexity heuristic.
//!
//! A pure function over the raw problem text. Bands are checked in order and
//! the first match wins:
//!
//! | Band | Length | Technical terms | Question complexity |
//! |---|---|---|---|
//! | simple | < 100 | < 2 | simple |
//! | medium | < 300 | < 5 | not expert |
//! | complex | < 800 | < 10 | not expert (added) |
//! | expert | otherwise | | |
//!
//! The plain band rule puts no question condition on `complex`, so a short
//! text such as "How should I architect this?" would stop there. The added
//! `not expert` guard makes any expert question vocabulary land in the expert
//! band, which is what "architect" classifying as expert requires.

use std::sync::LazyLock;

use regex::Regex;

use super::types::Complexity;

const TECHNICAL_VOCABULARY: &[&str] = &[
    "api",
    "algorithm",
    "architecture",
    "authentication",
    "authorization",
    "backend",
    "bandwidth",
    "cache",
    "cluster",
    "compiler",
    "concurrency",
    "container",
    "database",
    "deployment",
    "distributed",
    "docker",
    "encryption",
    "endpoint",
    "frontend",
    "framework",
    "infrastructure",
    "kubernetes",
    "latency",
    "load balancer",
    "microservice",
    "middleware",
    "network",
    "pipeline",
    "protocol",
    "query",
    "replication",
    "scalability",
    "schema",
    "server",
    "sharding",
    "throughput",
];

const EXPERT_QUESTION_TERMS: &[&str] = &["architect", "strategy", "paradigm", "methodology", "ecosystem"];

const COMPLEX_QUESTION_TERMS: &[&str] = &[
    "why",
    "how",
    "analyze",
    "compare",
    "evaluate",
    "design",
    "optimize",
    "troubleshoot",
];

const SOURCE_EXTENSIONS: &str =
    "rs|py|js|ts|tsx|jsx|go|java|c|h|cpp|hpp|cs|rb|php|swift|kt|scala|sql|sh|json|yaml|yml|toml|xml|html|css|md";

fn word_list(words: &[&str]) -> String {
    words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|")
}

// Whole words, optionally plural.
#[allow(clippy::expect_used)]
static TECHNICAL_TERM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\b(?:{})s?\b", word_list(TECHNICAL_VOCABULARY)))
        .expect("technical vocabulary regex")
});

#[allow(clippy::expect_used)]
static ALL_CAPS_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z]{2,}\b").expect("all-caps regex"));

#[allow(clippy::expect_used)]
static SOURCE_FILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\b[\w-]+\.(?:{SOURCE_EXTENSIONS})\b")).expect("source file regex")
});

// Word-start prefixes, so "architecture" hits "architect" but "show" misses "how".
#[allow(clippy::expect_used)]
static EXPERT_QUESTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\b(?:{})", word_list(EXPERT_QUESTION_TERMS)))
        .expect("expert vocabulary regex")
});

#[allow(clippy::expect_used)]
static COMPLEX_QUESTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\b(?:{})", word_list(COMPLEX_QUESTION_TERMS)))
        .expect("complex vocabulary regex")
});

#[allow(clippy::expect_used)]
static EXPLAIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bexplain").expect("explain regex"));

/// Count technical terms: vocabulary hits, ALL-CAPS tokens and source file names.
#[must_use]
pub fn count_technical_terms(text: &str) -> usize {
    TECHNICAL_TERM.find_iter(text).count()
        + ALL_CAPS_TOKEN.find_iter(text).count()
        + SOURCE_FILE.find_iter(text).count()
}

/// Classify how demanding the question itself is.
#[must_use]
pub fn question_complexity(text: &str) -> Complexity {
    if EXPERT_QUESTION.is_match(text) {
        Complexity::Expert
    } else if COMPLEX_QUESTION.is_match(text) {
        Complexity::Complex
    } else if text.contains('?') || EXPLAIN.is_match(text) {
        Complexity::Medium
    } else {
        Complexity::Simple
    }
}

/// Classify a problem statement.
///
/// # Example
///
/// ```
/// use mcp_brain::session::{classify_complexity, Complexity};
///
/// assert_eq!(classify_complexity("List three colors"), Complexity::Simple);
/// assert_eq!(
///     classify_complexity("Help me architect a billing system"),
///     Complexity::Expert
/// );
/// ```
#[must_use]
pub fn classify_complexity(text: &str) -> Complexity {
    let length = text.chars().count();
    let terms = count_technical_terms(text);
    let question = question_complexity(text);

    if length < 100 && terms < 2 && question == Complexity::Simple {
        Complexity::Simple
    } else if length < 300 && terms < 5 && question != Complexity::Expert {
        Complexity::Medium
    } else if length < 800 && terms < 10 && question != Complexity::Expert {
        Complexity::Complex
    } else {
        Complexity::Expert
    }
}
