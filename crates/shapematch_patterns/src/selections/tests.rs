use pretty_assertions::assert_eq;

use super::*;

#[test]
fn test_record_and_get() {
    let mut sel = Selections::new();
    sel.record(&SelectionKey::named("a"), Value::from(1));
    assert_eq!(sel.get("a"), Some(&Value::from(1)));
    assert_eq!(sel.anonymous(), None);
    assert_eq!(sel.len(), 1);
    assert!(sel.contains(&SelectionKey::named("a")));
    assert!(!sel.contains(&SelectionKey::Anonymous));
}

#[test]
fn test_last_write_wins() {
    let mut sel = Selections::new();
    let key = SelectionKey::named("a");
    sel.record(&key, Value::from(1));
    sel.record(&key, Value::from(2));
    assert_eq!(sel.get("a"), Some(&Value::from(2)));
    assert_eq!(sel.len(), 1);
}

#[test]
fn test_merge_prefers_other() {
    let mut left = Selections::new();
    left.record(&SelectionKey::named("a"), Value::from(1));
    left.record(&SelectionKey::named("b"), Value::from(1));
    let mut right = Selections::new();
    right.record(&SelectionKey::named("b"), Value::from(2));
    right.record(&SelectionKey::Anonymous, Value::Null);
    left.merge(right);
    assert_eq!(left.get("a"), Some(&Value::from(1)));
    assert_eq!(left.get("b"), Some(&Value::from(2)));
    assert_eq!(left.anonymous(), Some(&Value::Null));
    assert_eq!(left.len(), 3);
}

#[test]
fn test_take_removes() {
    let mut sel = Selections::new();
    sel.record(&SelectionKey::Anonymous, Value::from("x"));
    assert_eq!(sel.take(&SelectionKey::Anonymous), Some(Value::from("x")));
    assert!(sel.is_empty());
}

#[test]
fn test_argument_prefers_anonymous() {
    let mut sel = Selections::new();
    sel.record(&SelectionKey::Anonymous, Value::from("picked"));
    assert_eq!(sel.argument(&Value::from("subject")), Value::from("picked"));
}

#[test]
fn test_argument_builds_object_from_named() {
    let mut sel = Selections::new();
    sel.record(&SelectionKey::named("data"), Value::from(7));
    let arg = sel.argument(&Value::Null);
    assert_eq!(arg, Value::object([("data", Value::from(7))]));
}

#[test]
fn test_argument_falls_back_to_subject() {
    let subject = Value::object([("status", Value::from("idle"))]);
    let arg = Selections::new().argument(&subject);
    assert!(arg.strict_equals(&subject));
}
