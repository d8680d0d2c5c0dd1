use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use pretty_assertions::assert_eq;
use shapematch_patterns::{MatchErrorKind, Pattern};

use super::*;
use crate::case::CaseBuilder;

fn build<T>(builder: CaseBuilder<T>) -> Case<T> {
    match builder.build() {
        Ok(case) => case,
        Err(err) => panic!("case should build: {err}"),
    }
}

fn colors() -> Vec<Case<String>> {
    vec![
        build(CaseBuilder::with("0").pattern("red").then("h1".to_string())),
        build(CaseBuilder::with("1").pattern("green").then("h2".to_string())),
        build(
            CaseBuilder::otherwise("2")
                .handler(|sel, subject| format!("h3({})", sel.argument(subject))),
        ),
    ]
}

fn active_state<T>(subject: Value, cases: Vec<Case<T>>) -> EvaluationState<T> {
    let mut state = EvaluationState::new();
    for case in cases {
        if let Err(err) = state.register(case) {
            panic!("registration failed: {err}");
        }
    }
    if let Err(err) = state.set_subject(subject) {
        panic!("set_subject failed: {err}");
    }
    state
}

#[test]
fn test_starts_uninitialized_with_undefined_subject() {
    let state = EvaluationState::<()>::new();
    assert_eq!(state.lifecycle(), Lifecycle::Uninitialized);
    assert!(state.subject().is_undefined());
    assert!(state.id().is_detached());
    assert_eq!(state.evaluate(), Ok(None));
}

#[test]
fn test_first_registration_activates() {
    let mut state = EvaluationState::new();
    let case = build(CaseBuilder::otherwise("0").then(1));
    assert_eq!(state.register(case), Ok(Registration::Added));
    assert_eq!(state.lifecycle(), Lifecycle::Active);
    // Undefined subject hits the fallback.
    assert_eq!(state.evaluate(), Ok(Some(1)));
}

#[test]
fn test_fallback_receives_whole_subject() {
    let state = active_state(Value::from("blue"), colors());
    assert_eq!(state.evaluate(), Ok(Some("h3(\"blue\")".to_string())));
    assert_eq!(state.resolution().map(|r| r.index), Some(2));
}

#[test]
fn test_subject_change_recomputes() {
    let mut state = active_state(Value::from("blue"), colors());
    assert_eq!(state.set_subject(Value::from("green")), Ok(()));
    assert_eq!(state.evaluate(), Ok(Some("h2".to_string())));
}

#[test]
fn test_no_match_is_none() {
    let cases = vec![build(
        CaseBuilder::with("0")
            .pattern(Pattern::object([("status", Pattern::from("loading"))]))
            .then("h1"),
    )];
    let state = active_state(Value::object([("status", Value::from("idle"))]), cases);
    assert_eq!(state.evaluate(), Ok(None));
}

#[test]
fn test_exhaustive_miss_is_an_error() {
    let mut state = EvaluationState::with_config(MatchConfig::default().exhaustive(true));
    let case = build(CaseBuilder::with("0").pattern("red").then(1));
    assert!(state.register(case).is_ok());
    assert!(state.set_subject(Value::from("blue")).is_ok());
    assert_eq!(
        state.evaluate().map_err(|err| err.kind),
        Err(MatchErrorKind::NonExhaustive {
            value: "\"blue\"".to_string()
        })
    );
}

#[test]
fn test_recompute_is_idempotent() {
    let mut state = active_state(Value::from("red"), colors());
    let before = state.resolution().cloned();
    state.recompute();
    state.recompute();
    assert_eq!(state.resolution().cloned(), before);
}

#[test]
fn test_handler_runs_per_evaluate_not_per_recompute() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let case = build(CaseBuilder::otherwise("0").handler(move |_, _| {
        counter.fetch_add(1, Ordering::SeqCst);
    }));
    let mut state = active_state(Value::Null, vec![case]);
    state.recompute();
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(state.evaluate(), Ok(Some(())));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_guard_filters_after_structure() {
    let cases = vec![
        build(
            CaseBuilder::with("big")
                .pattern(Pattern::number())
                .guard(|v| v.as_number().is_some_and(|n| n > 10.0))
                .then("big"),
        ),
        build(CaseBuilder::with("num").pattern(Pattern::number()).then("small")),
    ];
    let mut state = active_state(Value::from(50), cases);
    assert_eq!(state.evaluate(), Ok(Some("big")));
    assert!(state.set_subject(Value::from(5)).is_ok());
    assert_eq!(state.evaluate(), Ok(Some("small")));
}

#[test]
fn test_fallible_handler_propagates() {
    let case = build(CaseBuilder::<Result<i32, String>>::otherwise("0").handler(|_, _| {
        Err("handler failed".to_string())
    }));
    let state = active_state(Value::Null, vec![case]);
    assert_eq!(state.evaluate(), Ok(Some(Err("handler failed".to_string()))));
}

#[test]
fn test_reset_returns_to_uninitialized() {
    let mut state = active_state(Value::from("red"), colors());
    assert_eq!(state.reset(), Ok(()));
    assert_eq!(state.lifecycle(), Lifecycle::Uninitialized);
    assert!(state.cases().is_empty());
    assert!(state.subject().is_undefined());
    assert_eq!(state.evaluate(), Ok(None));
}

#[test]
fn test_disposed_state_rejects_everything() {
    let mut state = active_state(Value::from("red"), colors());
    state.dispose();
    assert_eq!(state.lifecycle(), Lifecycle::Disposed);
    assert!(state.cases().is_empty());

    let late = build(CaseBuilder::with("late").pattern("red").then("late".to_string()));
    let disposed = MatchErrorKind::Disposed {
        id: StateId::DETACHED.raw(),
    };
    assert_eq!(state.register(late).map_err(|e| e.kind), Err(disposed.clone()));
    assert_eq!(
        state.set_subject(Value::Null).map_err(|e| e.kind),
        Err(disposed.clone())
    );
    assert_eq!(state.evaluate().map_err(|e| e.kind), Err(disposed.clone()));
    assert_eq!(state.reset().map_err(|e| e.kind), Err(disposed));

    // Disposing again is harmless.
    state.dispose();
    assert_eq!(state.lifecycle(), Lifecycle::Disposed);
}
