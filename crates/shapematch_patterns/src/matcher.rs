//! The matcher engine.
//!
//! Recursive descent over the pattern tree, mirrored by the shape of the
//! value. Every rule records into a caller-provided `Selections`; rules that
//! may discard work (`not`, each `or` branch, each array element) match into
//! scratch selections first and merge only on success.

use shapematch_value::Value;

use crate::pattern::{ArrayShape, Pattern};
use crate::selections::Selections;
use crate::stack::ensure_sufficient_stack;

/// Outcome of matching one pattern against one value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MatchResult {
    /// Whether the pattern matched.
    pub matched: bool,
    /// Captured values. Always empty when `matched` is false.
    pub selections: Selections,
}

/// Match `pattern` against `value`.
pub fn match_pattern(pattern: &Pattern, value: &Value) -> MatchResult {
    let mut selections = Selections::new();
    if match_into(pattern, value, &mut selections) {
        MatchResult {
            matched: true,
            selections,
        }
    } else {
        MatchResult::default()
    }
}

impl Pattern {
    /// Whether `value` matches, discarding selections.
    pub fn matches(&self, value: &Value) -> bool {
        match_into(self, value, &mut Selections::new())
    }
}

/// Match and record selections into `out`.
///
/// On failure `out` may hold partial selections; callers that keep going
/// after a failure must pass scratch selections.
pub(crate) fn match_into(pattern: &Pattern, value: &Value, out: &mut Selections) -> bool {
    ensure_sufficient_stack(|| match pattern {
        Pattern::Literal(literal) => literal.strict_equals(value),

        Pattern::Wildcard => true,

        Pattern::Kind(kind) => value.kind() == *kind,

        Pattern::When(predicate) => predicate.test(value),

        Pattern::Select { key, pattern } => {
            if let Some(inner) = pattern {
                if !match_into(inner, value, out) {
                    return false;
                }
            }
            out.record(key, value.clone());
            true
        }

        Pattern::Object(fields) => match_object(fields, value, out),

        Pattern::Array(ArrayShape::Tuple(patterns)) => match_tuple(patterns, value, out),

        Pattern::Array(ArrayShape::Each(inner)) => match_each(inner, value, out),

        Pattern::Not(inner) => !match_into(inner, value, &mut Selections::new()),

        Pattern::And(patterns) => patterns.iter().all(|p| match_into(p, value, out)),

        Pattern::Or(patterns) => match_or(patterns, value, out),

        Pattern::Optional(inner) => {
            if value.is_undefined() {
                record_undefined(inner, out);
                true
            } else {
                match_into(inner, value, out)
            }
        }
    })
}

/// Every listed property must match. An absent property only satisfies an
/// optional sub-pattern, which then sees `Undefined`.
fn match_object(fields: &[(String, Pattern)], value: &Value, out: &mut Selections) -> bool {
    let Some(props) = value.as_object() else {
        return false;
    };
    fields.iter().all(|(key, field)| match props.get(key.as_str()) {
        Some(prop) => match_into(field, prop, out),
        None => field.is_optional() && match_into(field, &Value::Undefined, out),
    })
}

fn match_tuple(patterns: &[Pattern], value: &Value, out: &mut Selections) -> bool {
    let Some(items) = value.as_array() else {
        return false;
    };
    items.len() == patterns.len()
        && patterns
            .iter()
            .zip(items)
            .all(|(pattern, item)| match_into(pattern, item, out))
}

/// Each element is matched into its own selections; per key, the captured
/// values are collected into one array (`Undefined` where an element did
/// not capture that key).
fn match_each(pattern: &Pattern, value: &Value, out: &mut Selections) -> bool {
    let Some(items) = value.as_array() else {
        return false;
    };
    let keys = pattern.selection_keys();
    let mut columns: Vec<Vec<Value>> = vec![Vec::with_capacity(items.len()); keys.len()];
    for item in items {
        let mut scratch = Selections::new();
        if !match_into(pattern, item, &mut scratch) {
            return false;
        }
        for (key, column) in keys.iter().zip(columns.iter_mut()) {
            column.push(scratch.take(key).unwrap_or_default());
        }
    }
    for (key, column) in keys.iter().zip(columns) {
        out.record(key, Value::array(column));
    }
    true
}

/// Branches are tried in order. Keys selected only by other branches read
/// as `Undefined`.
fn match_or(patterns: &[Pattern], value: &Value, out: &mut Selections) -> bool {
    for (index, pattern) in patterns.iter().enumerate() {
        let mut branch = Selections::new();
        if !match_into(pattern, value, &mut branch) {
            continue;
        }
        tracing::trace!(branch = index, "or-pattern branch matched");
        for other in patterns {
            for key in other.selection_keys() {
                if !branch.contains(&key) {
                    out.record(&key, Value::Undefined);
                }
            }
        }
        out.merge(branch);
        return true;
    }
    false
}

/// An optional pattern that saw `Undefined` still defines all its keys.
fn record_undefined(pattern: &Pattern, out: &mut Selections) {
    for key in pattern.selection_keys() {
        out.record(&key, Value::Undefined);
    }
}
