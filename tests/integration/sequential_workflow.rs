//! Sequential workflow: caller-written thoughts across calls.

use std::sync::Arc;

use mcp_brain::error::{ModeError, SessionError};
use mcp_brain::modes::{record_thought, SequentialThought};
use mcp_brain::session::SessionRegistry;
use mcp_brain::traits::FixedTimeProvider;
use pretty_assertions::assert_eq;

#[test]
fn test_sequential_chain_with_revision_and_branch() {
    let mut registry = SessionRegistry::new();

    let first = record_thought(
        &mut registry,
        SequentialThought::new("The outage started after the deploy", 1, true),
    )
    .unwrap();
    let id = first.session_id.clone();
    assert_eq!(first.thought_number, 1);

    let second = record_thought(
        &mut registry,
        SequentialThought::new("The deploy changed the pool size", 2, true)
            .in_session(&id)
            .with_confidence(0.4),
    )
    .unwrap();
    assert_eq!(second.thought_history_length, 2);

    let revised = record_thought(
        &mut registry,
        SequentialThought::new("The deploy halved the pool size", 3, true)
            .in_session(&id)
            .revising(2),
    )
    .unwrap();
    assert_eq!(revised.thought_number, 3);

    let forked = record_thought(
        &mut registry,
        SequentialThought::new("Maybe the database was slow instead", 4, true)
            .in_session(&id)
            .on_branch(Some("db".to_string()), Some(1)),
    )
    .unwrap();
    assert_eq!(forked.branches, vec!["db"]);

    let continued = record_thought(
        &mut registry,
        SequentialThought::new("DB metrics look normal", 5, false)
            .in_session(&id)
            .on_branch(Some("db".to_string()), None),
    )
    .unwrap();
    assert_eq!(continued.thought_history_length, 5);
    assert!(!continued.next_thought_needed);

    let session = registry.get(&id).unwrap().session();
    assert_eq!(session.thoughts[2].revises_sequence, Some(2));
    assert_eq!(session.metadata.revisions_count, 1);
    let branch = session.branch("db").unwrap();
    assert_eq!(branch.from_sequence, 1);
    assert_eq!(branch.thoughts, vec![4, 5]);
    assert_eq!(session.thoughts[4].branch_from_sequence, Some(1));
}

#[test]
fn test_sequential_sessions_are_isolated() {
    let mut registry = SessionRegistry::new();
    let a = record_thought(&mut registry, SequentialThought::new("first problem", 1, true)).unwrap();
    let b = record_thought(&mut registry, SequentialThought::new("second problem", 1, true)).unwrap();

    assert_ne!(a.session_id, b.session_id);
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.get(&a.session_id).unwrap().thought_count(), 1);
}

#[test]
fn test_sequential_total_grows_with_needs_more() {
    let mut registry = SessionRegistry::new();
    let mut input = SequentialThought::new("Start", 1, true).in_session("caller-chosen");
    input.total_thoughts = Some(1);
    let status = record_thought(&mut registry, input).unwrap();
    assert_eq!(status.session_id, "caller-chosen");
    assert_eq!(status.total_thoughts, 1);

    let mut more = SequentialThought::new("Not done yet", 2, true).in_session("caller-chosen");
    more.needs_more_thoughts = true;
    let status = record_thought(&mut registry, more).unwrap();
    assert_eq!(status.total_thoughts, 3);
}

#[test]
fn test_sequential_rejects_unknown_branch_without_anchor() {
    let mut registry = SessionRegistry::new();
    let first = record_thought(&mut registry, SequentialThought::new("Start", 1, true)).unwrap();

    let err = record_thought(
        &mut registry,
        SequentialThought::new("Side idea", 2, true)
            .in_session(&first.session_id)
            .on_branch(Some("ghost".to_string()), None),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        ModeError::Session(SessionError::InvalidBranchTarget { .. })
    ));
    // The rejected thought leaves the session unchanged.
    assert_eq!(registry.get(&first.session_id).unwrap().thought_count(), 1);
}

#[test]
fn test_sequential_rejects_blank_thought() {
    let mut registry = SessionRegistry::new();
    let err = record_thought(&mut registry, SequentialThought::new("  ", 1, true)).unwrap_err();
    assert!(matches!(err, ModeError::MissingField { ref field } if field == "thought"));
    assert!(registry.is_empty());
}

#[test]
fn test_sequential_idle_sessions_are_swept() {
    let clock = Arc::new(FixedTimeProvider::new(
        "2026-05-01T08:00:00Z".parse().unwrap(),
    ));
    let mut registry = SessionRegistry::with_clock(clock.clone());
    let stale = record_thought(&mut registry, SequentialThought::new("old", 1, true)).unwrap();

    clock.advance(chrono::Duration::minutes(50));
    let fresh = record_thought(&mut registry, SequentialThought::new("new", 1, true)).unwrap();

    clock.advance(chrono::Duration::minutes(20));
    let removed = registry.sweep_expired(registry.now(), chrono::Duration::hours(1));

    assert_eq!(removed, 1);
    assert!(registry.get(&stale.session_id).is_none());
    assert!(registry.get(&fresh.session_id).is_some());
}
