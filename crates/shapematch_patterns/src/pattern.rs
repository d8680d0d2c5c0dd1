//! Pattern definitions.
//!
//! A `Pattern` is an immutable description of the shape a value must have.
//! Plain data patterns (literals, object shapes, tuples) describe structure;
//! combinators (`not`, `and`, `or`, `optional`) compose them; `select`
//! markers capture parts of the matched value for the case handler.
//!
//! ```text
//! // { status: "error", error: select("error") }
//! Pattern::object([
//!     ("status", Pattern::from("error")),
//!     ("error", Pattern::select("error")),
//! ])
//! ```

use std::fmt;
use std::mem;
use std::sync::Arc;

use shapematch_value::{Value, ValueKind};
use smallvec::SmallVec;

use crate::errors::{mixed_selections, multiple_anonymous_selections, MatchError};
use crate::stack::ensure_sufficient_stack;

/// Key a selection is recorded under.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SelectionKey {
    /// `select()`: the single unnamed slot.
    Anonymous,
    /// `select("name")`.
    Named(Arc<str>),
}

impl SelectionKey {
    /// Create a named key.
    pub fn named(name: &str) -> Self {
        SelectionKey::Named(Arc::from(name))
    }
}

impl fmt::Display for SelectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionKey::Anonymous => f.write_str("<anonymous>"),
            SelectionKey::Named(name) => f.write_str(name),
        }
    }
}

/// Shared predicate over values, used by `when` patterns and case guards.
#[derive(Clone)]
pub struct Predicate(Arc<dyn Fn(&Value) -> bool + Send + Sync>);

impl Predicate {
    /// Wrap a closure.
    pub fn new(f: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        Predicate(Arc::new(f))
    }

    /// Run the predicate.
    #[inline]
    pub fn test(&self, value: &Value) -> bool {
        (self.0)(value)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

/// Shape of an array pattern.
#[derive(Clone, Debug)]
pub enum ArrayShape {
    /// Fixed-length, positional: `[p0, p1, ...]`.
    Tuple(Vec<Pattern>),
    /// Every element matches one pattern, any length.
    ///
    /// Selections are aggregated into one array per key.
    Each(Box<Pattern>),
}

/// A structural pattern.
#[derive(Clone, Debug)]
pub enum Pattern {
    /// Matches a value strictly equal (`===`) to this one.
    Literal(Value),
    /// Matches anything.
    Wildcard,
    /// Matches like `pattern` (anything when `None`) and records the value.
    Select {
        key: SelectionKey,
        pattern: Option<Box<Pattern>>,
    },
    /// Matches objects whose listed properties match. Extra properties are ignored.
    Object(Vec<(String, Pattern)>),
    /// Matches arrays.
    Array(ArrayShape),
    /// Matches iff the inner pattern does not. Never selects.
    Not(Box<Pattern>),
    /// Matches iff every sub-pattern matches. Selections merge left to right.
    And(Vec<Pattern>),
    /// Matches iff some sub-pattern matches. The first matching branch selects.
    Or(Vec<Pattern>),
    /// Matches `Undefined` (or an absent property) or the inner pattern.
    Optional(Box<Pattern>),
    /// Typed wildcard: matches any value of this kind.
    Kind(ValueKind),
    /// Matches when the predicate returns `true`.
    When(Predicate),
}

// Constructors

impl Pattern {
    /// Literal pattern.
    pub fn literal(value: impl Into<Value>) -> Self {
        Pattern::Literal(value.into())
    }

    /// `select("name")`: capture the value under `name`.
    pub fn select(name: &str) -> Self {
        Pattern::Select {
            key: SelectionKey::named(name),
            pattern: None,
        }
    }

    /// `select()`: capture the value in the anonymous slot.
    pub fn select_anonymous() -> Self {
        Pattern::Select {
            key: SelectionKey::Anonymous,
            pattern: None,
        }
    }

    /// `select("name", pattern)`: capture the value only if `pattern` matches.
    pub fn select_matching(name: &str, pattern: Pattern) -> Self {
        Pattern::Select {
            key: SelectionKey::named(name),
            pattern: Some(Box::new(pattern)),
        }
    }

    /// Object shape from `(key, pattern)` pairs.
    pub fn object<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Pattern)>,
    {
        Pattern::Object(fields.into_iter().map(|(k, p)| (k.into(), p)).collect())
    }

    /// Fixed-length array shape.
    pub fn tuple(elements: Vec<Pattern>) -> Self {
        Pattern::Array(ArrayShape::Tuple(elements))
    }

    /// Array whose every element matches `pattern`.
    pub fn each(pattern: Pattern) -> Self {
        Pattern::Array(ArrayShape::Each(Box::new(pattern)))
    }

    /// Negation.
    #[allow(clippy::should_implement_trait, reason = "pattern combinator, not boolean negation")]
    pub fn not(pattern: Pattern) -> Self {
        Pattern::Not(Box::new(pattern))
    }

    /// Conjunction.
    pub fn and(patterns: Vec<Pattern>) -> Self {
        Pattern::And(patterns)
    }

    /// Disjunction.
    pub fn or(patterns: Vec<Pattern>) -> Self {
        Pattern::Or(patterns)
    }

    /// Optional value.
    pub fn optional(pattern: Pattern) -> Self {
        Pattern::Optional(Box::new(pattern))
    }

    /// Typed wildcard.
    pub fn kind(kind: ValueKind) -> Self {
        Pattern::Kind(kind)
    }

    /// Any string.
    pub fn string() -> Self {
        Pattern::Kind(ValueKind::String)
    }

    /// Any number.
    pub fn number() -> Self {
        Pattern::Kind(ValueKind::Number)
    }

    /// Any boolean.
    pub fn boolean() -> Self {
        Pattern::Kind(ValueKind::Boolean)
    }

    /// `null` or `undefined`.
    pub fn nullish() -> Self {
        Pattern::Or(vec![
            Pattern::Kind(ValueKind::Null),
            Pattern::Kind(ValueKind::Undefined),
        ])
    }

    /// Predicate pattern.
    pub fn when(f: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        Pattern::When(Predicate::new(f))
    }
}

impl From<Value> for Pattern {
    fn from(value: Value) -> Self {
        Pattern::Literal(value)
    }
}

impl From<&str> for Pattern {
    fn from(s: &str) -> Self {
        Pattern::Literal(Value::from(s))
    }
}

impl From<bool> for Pattern {
    fn from(b: bool) -> Self {
        Pattern::Literal(Value::from(b))
    }
}

impl From<i32> for Pattern {
    fn from(n: i32) -> Self {
        Pattern::Literal(Value::from(n))
    }
}

impl From<f64> for Pattern {
    fn from(n: f64) -> Self {
        Pattern::Literal(Value::from(n))
    }
}

// Static Analysis

/// Findings of `Pattern::validate` that are not errors by themselves.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatternReport {
    /// Named selections captured more than once outside `or` alternatives.
    ///
    /// At match time the later capture wins.
    pub duplicate_selections: Vec<Arc<str>>,
}

impl Pattern {
    /// Whether this is an `optional(..)` pattern.
    ///
    /// An object shape accepts an absent property only for optional patterns.
    #[inline]
    pub fn is_optional(&self) -> bool {
        matches!(self, Pattern::Optional(_))
    }

    /// Whether this pattern matches every value.
    ///
    /// Conservative: `when` predicates and typed wildcards are never
    /// considered irrefutable.
    pub fn is_irrefutable(&self) -> bool {
        ensure_sufficient_stack(|| match self {
            Pattern::Wildcard | Pattern::Select { pattern: None, .. } => true,
            Pattern::Select {
                pattern: Some(inner),
                ..
            }
            | Pattern::Optional(inner) => inner.is_irrefutable(),
            Pattern::And(patterns) => patterns.iter().all(Pattern::is_irrefutable),
            Pattern::Or(patterns) => patterns.iter().any(Pattern::is_irrefutable),
            Pattern::Literal(_)
            | Pattern::Object(_)
            | Pattern::Array(_)
            | Pattern::Not(_)
            | Pattern::Kind(_)
            | Pattern::When(_) => false,
        })
    }

    /// Every key this pattern may record, in first-seen order.
    ///
    /// `not` contributes nothing: selections inside a negation are discarded.
    pub fn selection_keys(&self) -> SmallVec<[SelectionKey; 4]> {
        let mut keys = SmallVec::new();
        self.collect_selection_keys(&mut keys);
        keys
    }

    fn collect_selection_keys(&self, keys: &mut SmallVec<[SelectionKey; 4]>) {
        ensure_sufficient_stack(|| match self {
            Pattern::Select { key, pattern } => {
                if !keys.contains(key) {
                    keys.push(key.clone());
                }
                if let Some(inner) = pattern {
                    inner.collect_selection_keys(keys);
                }
            }
            Pattern::Object(fields) => {
                for (_, field) in fields {
                    field.collect_selection_keys(keys);
                }
            }
            Pattern::Array(ArrayShape::Tuple(patterns))
            | Pattern::And(patterns)
            | Pattern::Or(patterns) => {
                for pattern in patterns {
                    pattern.collect_selection_keys(keys);
                }
            }
            Pattern::Array(ArrayShape::Each(inner)) | Pattern::Optional(inner) => {
                inner.collect_selection_keys(keys);
            }
            Pattern::Literal(_)
            | Pattern::Wildcard
            | Pattern::Not(_)
            | Pattern::Kind(_)
            | Pattern::When(_) => {}
        });
    }

    /// Check selection rules.
    ///
    /// Fails when the pattern holds more than one anonymous selection, or
    /// mixes anonymous and named selections. Alternatives of an `or` are
    /// counted separately since only one of them ever selects.
    pub fn validate(&self) -> Result<PatternReport, MatchError> {
        let census = self.census();
        if census.anonymous > 1 {
            return Err(multiple_anonymous_selections());
        }
        if census.anonymous > 0 && !census.named.is_empty() {
            return Err(mixed_selections());
        }
        Ok(PatternReport {
            duplicate_selections: census.duplicates,
        })
    }

    fn census(&self) -> Census {
        ensure_sufficient_stack(|| match self {
            Pattern::Select { key, pattern } => {
                let mut census = pattern.as_deref().map(Pattern::census).unwrap_or_default();
                census.record(key);
                census
            }
            Pattern::Object(fields) => {
                Census::sequence(fields.iter().map(|(_, field)| field.census()))
            }
            Pattern::Array(ArrayShape::Tuple(patterns)) | Pattern::And(patterns) => {
                Census::sequence(patterns.iter().map(Pattern::census))
            }
            Pattern::Array(ArrayShape::Each(inner)) | Pattern::Optional(inner) => inner.census(),
            Pattern::Or(patterns) => Census::alternatives(patterns.iter().map(Pattern::census)),
            Pattern::Literal(_)
            | Pattern::Wildcard
            | Pattern::Not(_)
            | Pattern::Kind(_)
            | Pattern::When(_) => Census::default(),
        })
    }
}

/// Children are released under the stack guard, so dropping a deeply nested
/// pattern does not overflow either.
impl Drop for Pattern {
    fn drop(&mut self) {
        let children: SmallVec<[Pattern; 1]> = match self {
            Pattern::Select {
                pattern: Some(inner),
                ..
            }
            | Pattern::Array(ArrayShape::Each(inner))
            | Pattern::Not(inner)
            | Pattern::Optional(inner) => {
                SmallVec::from_buf([mem::replace(&mut **inner, Pattern::Wildcard)])
            }
            Pattern::Array(ArrayShape::Tuple(patterns))
            | Pattern::And(patterns)
            | Pattern::Or(patterns) => SmallVec::from_vec(mem::take(patterns)),
            Pattern::Object(fields) => mem::take(fields)
                .into_iter()
                .map(|(_, field)| field)
                .collect(),
            Pattern::Literal(_)
            | Pattern::Wildcard
            | Pattern::Select { pattern: None, .. }
            | Pattern::Kind(_)
            | Pattern::When(_) => return,
        };
        ensure_sufficient_stack(move || drop(children));
    }
}

/// Selection counts gathered by `Pattern::census`.
#[derive(Default)]
struct Census {
    anonymous: usize,
    named: Vec<Arc<str>>,
    duplicates: Vec<Arc<str>>,
}

impl Census {
    fn record(&mut self, key: &SelectionKey) {
        match key {
            SelectionKey::Anonymous => self.anonymous = self.anonymous.saturating_add(1),
            SelectionKey::Named(name) => self.add_named(name),
        }
    }

    fn add_named(&mut self, name: &Arc<str>) {
        if self.named.contains(name) {
            if !self.duplicates.contains(name) {
                self.duplicates.push(Arc::clone(name));
            }
        } else {
            self.named.push(Arc::clone(name));
        }
    }

    fn add_duplicate(&mut self, name: &Arc<str>) {
        if !self.duplicates.contains(name) {
            self.duplicates.push(Arc::clone(name));
        }
    }

    /// Parts that all select together.
    fn sequence(parts: impl Iterator<Item = Census>) -> Census {
        let mut total = Census::default();
        for part in parts {
            total.anonymous = total.anonymous.saturating_add(part.anonymous);
            for name in &part.named {
                total.add_named(name);
            }
            for name in &part.duplicates {
                total.add_duplicate(name);
            }
        }
        total
    }

    /// Parts of which at most one selects.
    fn alternatives(parts: impl Iterator<Item = Census>) -> Census {
        let mut total = Census::default();
        for part in parts {
            total.anonymous = total.anonymous.max(part.anonymous);
            for name in part.named {
                if !total.named.contains(&name) {
                    total.named.push(name);
                }
            }
            for name in &part.duplicates {
                total.add_duplicate(name);
            }
        }
        total
    }
}
