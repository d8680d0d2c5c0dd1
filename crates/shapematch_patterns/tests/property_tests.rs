//! Property-based tests for the matcher.
//!
//! Random values and random patterns are generated and checked against the
//! algebraic laws of the combinators:
//! 1. The wildcard matches everything and selects nothing.
//! 2. `not(p)` matches exactly when `p` does not.
//! 3. `and`/`or` agree with `all`/`any` over their parts.
//! 4. A failed match never carries selections.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::redundant_closure_for_method_calls,
    clippy::redundant_closure,
    reason = "Proptest macros generate code with these patterns"
)]

use proptest::prelude::*;
use shapematch_patterns::{match_pattern, Pattern, Value, ValueKind};

// -- Value Generation Strategies --

fn key_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["a", "b", "c", "status", "data"]).prop_map(str::to_string)
}

fn primitive_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Undefined),
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        (-100i32..100).prop_map(Value::from),
        prop::sample::select(vec!["", "red", "blue", "idle"]).prop_map(Value::from),
    ]
}

fn value_strategy() -> impl Strategy<Value = Value> {
    primitive_strategy().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::array),
            prop::collection::vec((key_strategy(), inner), 0..4)
                .prop_map(|entries| Value::object(entries)),
        ]
    })
}

// -- Pattern Generation Strategies --

fn kind_strategy() -> impl Strategy<Value = ValueKind> {
    prop::sample::select(ValueKind::ALL.to_vec())
}

fn leaf_pattern_strategy() -> impl Strategy<Value = Pattern> {
    prop_oneof![
        Just(Pattern::Wildcard),
        primitive_strategy().prop_map(|value| Pattern::literal(value)),
        kind_strategy().prop_map(Pattern::kind),
        key_strategy().prop_map(|name| Pattern::select(&name)),
    ]
}

fn pattern_strategy() -> impl Strategy<Value = Pattern> {
    leaf_pattern_strategy().prop_recursive(3, 24, 3, |inner| {
        prop_oneof![
            prop::collection::vec((key_strategy(), inner.clone()), 0..3)
                .prop_map(|fields| Pattern::object(fields)),
            prop::collection::vec(inner.clone(), 0..3).prop_map(Pattern::tuple),
            inner.clone().prop_map(Pattern::each),
            inner.clone().prop_map(Pattern::not),
            inner.clone().prop_map(Pattern::optional),
            prop::collection::vec(inner.clone(), 0..3).prop_map(Pattern::and),
            prop::collection::vec(inner, 0..3).prop_map(Pattern::or),
        ]
    })
}

// -- Properties --

proptest! {
    #[test]
    fn wildcard_matches_any_value(value in value_strategy()) {
        let result = match_pattern(&Pattern::Wildcard, &value);
        prop_assert!(result.matched);
        prop_assert!(result.selections.is_empty());
    }

    #[test]
    fn literal_never_matches_other_primitive(
        a in primitive_strategy(),
        b in primitive_strategy(),
    ) {
        prop_assert_eq!(Pattern::literal(a.clone()).matches(&b), a.strict_equals(&b));
    }

    #[test]
    fn not_is_complement(pattern in pattern_strategy(), value in value_strategy()) {
        let positive = pattern.matches(&value);
        let negated = match_pattern(&Pattern::not(pattern), &value);
        prop_assert_eq!(negated.matched, !positive);
        prop_assert!(negated.selections.is_empty());
    }

    #[test]
    fn and_agrees_with_all(
        parts in prop::collection::vec(pattern_strategy(), 0..4),
        value in value_strategy(),
    ) {
        let expected = parts.iter().all(|p| p.matches(&value));
        prop_assert_eq!(Pattern::and(parts).matches(&value), expected);
    }

    #[test]
    fn or_agrees_with_any(
        parts in prop::collection::vec(pattern_strategy(), 0..4),
        value in value_strategy(),
    ) {
        let expected = parts.iter().any(|p| p.matches(&value));
        prop_assert_eq!(Pattern::or(parts).matches(&value), expected);
    }

    #[test]
    fn failed_match_has_no_selections(pattern in pattern_strategy(), value in value_strategy()) {
        let result = match_pattern(&pattern, &value);
        if !result.matched {
            prop_assert!(result.selections.is_empty());
        }
    }

    #[test]
    fn irrefutable_patterns_always_match(pattern in pattern_strategy(), value in value_strategy()) {
        if pattern.is_irrefutable() {
            prop_assert!(pattern.matches(&value));
        }
    }

    #[test]
    fn matching_is_deterministic(pattern in pattern_strategy(), value in value_strategy()) {
        prop_assert_eq!(match_pattern(&pattern, &value), match_pattern(&pattern, &value));
    }
}
