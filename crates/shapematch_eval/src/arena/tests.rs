use pretty_assertions::assert_eq;
use shapematch_patterns::{MatchErrorKind, Pattern};

use super::*;
use crate::case::CaseBuilder;

fn case(key: &str, pattern: impl Into<Pattern>, out: i32) -> Case<i32> {
    match CaseBuilder::with(key).pattern(pattern).then(out).build() {
        Ok(case) => case,
        Err(err) => panic!("case should build: {err}"),
    }
}

fn create(arena: &mut MatchArena<i32>, initial: Value) -> StateId {
    match arena.create(initial) {
        Ok(id) => id,
        Err(err) => panic!("create failed: {err}"),
    }
}

#[test]
fn test_state_id_debug() {
    assert_eq!(format!("{:?}", StateId::new(3, 0)), "StateId(3@0)");
    assert_eq!(format!("{:?}", StateId::new(3, 2)), "StateId(3@2)");
    assert_eq!(format!("{:?}", StateId::DETACHED), "StateId::DETACHED");
}

#[test]
fn test_create_issues_sequential_active_handles() {
    let mut arena = MatchArena::new();
    let a = create(&mut arena, Value::from(1));
    let b = create(&mut arena, Value::from(2));
    assert_eq!((a.raw(), b.raw()), (0, 1));
    assert_eq!(arena.len(), 2);
    assert!(arena.get(a).is_ok_and(|s| s.lifecycle() == Lifecycle::Active));
}

#[test]
fn test_states_are_independent() {
    let mut arena = MatchArena::new();
    let a = create(&mut arena, Value::from("red"));
    let b = create(&mut arena, Value::from("red"));
    assert!(arena.register_case(a, case("r", "red", 1)).is_ok());
    assert_eq!(arena.evaluate(a), Ok(Some(1)));
    assert_eq!(arena.evaluate(b), Ok(None));
}

#[test]
fn test_full_handle_flow() {
    let mut arena = MatchArena::new();
    let id = create(&mut arena, Value::from("blue"));
    assert_eq!(arena.register_case(id, case("r", "red", 1)), Ok(Registration::Added));
    assert_eq!(arena.register_case(id, case("b", "blue", 2)), Ok(Registration::Added));
    assert_eq!(arena.register_case(id, case("b", "blue", 2)), Ok(Registration::Duplicate));
    assert_eq!(arena.evaluate(id), Ok(Some(2)));
    assert_eq!(arena.set_subject(id, Value::from("red")), Ok(()));
    assert_eq!(arena.evaluate(id), Ok(Some(1)));
    assert_eq!(arena.reset(id), Ok(()));
    assert_eq!(arena.evaluate(id), Ok(None));
}

#[test]
fn test_unknown_handle() {
    let mut arena = MatchArena::<i32>::new();
    let ghost = StateId::new(7, 0);
    assert_eq!(
        arena.evaluate(ghost).map_err(|e| e.kind),
        Err(MatchErrorKind::UnknownState { id: 7 })
    );
    assert_eq!(
        arena.set_subject(ghost, Value::Null).map_err(|e| e.kind),
        Err(MatchErrorKind::UnknownState { id: 7 })
    );
}

#[test]
fn test_disposed_handle() {
    let mut arena = MatchArena::new();
    let id = create(&mut arena, Value::from("red"));
    assert!(arena.register_case(id, case("r", "red", 1)).is_ok());
    assert_eq!(arena.dispose(id), Ok(()));

    let disposed: Result<(), MatchErrorKind> = Err(MatchErrorKind::Disposed { id: id.raw() });
    assert_eq!(
        arena.register_case(id, case("late", "red", 2)).map_err(|e| e.kind),
        disposed.clone().map(|()| Registration::Added)
    );
    assert_eq!(arena.evaluate(id).map_err(|e| e.kind), disposed.clone().map(|()| None));
    assert_eq!(arena.dispose(id).map_err(|e| e.kind), disposed);
    assert_eq!((arena.len(), arena.slot_count()), (0, 1));
}

#[test]
fn test_disposed_slot_is_reused() {
    let mut arena = MatchArena::new();
    let old = create(&mut arena, Value::from("red"));
    assert!(arena.register_case(old, case("r", "red", 1)).is_ok());
    assert_eq!(arena.dispose(old), Ok(()));

    let new = create(&mut arena, Value::from("blue"));
    assert_eq!((new.raw(), new.generation()), (old.raw(), 1));
    assert_eq!(arena.slot_count(), 1);
    assert_eq!(arena.len(), 1);

    // The stale handle does not reach the new occupant.
    let stale: Result<(), MatchErrorKind> = Err(MatchErrorKind::Disposed { id: old.raw() });
    assert_eq!(arena.evaluate(old).map_err(|e| e.kind), stale.clone().map(|()| None));
    assert_eq!(
        arena.set_subject(old, Value::from("red")).map_err(|e| e.kind),
        stale.clone()
    );
    assert_eq!(arena.dispose(old).map_err(|e| e.kind), stale);

    assert!(arena.register_case(new, case("b", "blue", 2)).is_ok());
    assert_eq!(arena.evaluate(new), Ok(Some(2)));
}

#[test]
fn test_mount_unmount_cycles_do_not_grow() {
    let mut arena = MatchArena::<i32>::new();
    for _ in 0..1_000 {
        let id = create(&mut arena, Value::Null);
        assert_eq!(arena.dispose(id), Ok(()));
    }
    assert_eq!(arena.slot_count(), 1);
    assert!(arena.is_empty());
}

#[test]
fn test_future_generation_is_unknown() {
    let mut arena = MatchArena::<i32>::new();
    let id = create(&mut arena, Value::Null);
    let forged = StateId::new(id.raw(), id.generation() + 1);
    assert_eq!(
        arena.evaluate(forged).map_err(|e| e.kind),
        Err(MatchErrorKind::UnknownState { id: id.raw() })
    );
}

#[test]
fn test_exhaustive_arena_config() {
    let mut arena = MatchArena::with_config(MatchConfig::default().exhaustive(true));
    let id = create(&mut arena, Value::from("green"));
    assert!(arena.register_case(id, case("r", "red", 1)).is_ok());
    assert!(matches!(
        arena.evaluate(id).map_err(|e| e.kind),
        Err(MatchErrorKind::NonExhaustive { .. })
    ));
}
