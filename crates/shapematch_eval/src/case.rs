//! Cases and the builder that validates them.
//!
//! A case is one `(patterns, guards, handler)` triple. Three kinds exist,
//! mirroring the declarative forms callers write:
//!
//! - `With`: one or more alternative patterns, optional guards.
//! - `When`: a predicate only; structurally it matches everything.
//! - `Otherwise`: the fallback, matching everything unconditionally.
//!
//! Cases are only obtainable through `CaseBuilder::build`, so every `Case`
//! in a list has already passed configuration checks.

use std::fmt;
use std::sync::Arc;

use shapematch_patterns::{
    handler_conflict, match_pattern, missing_handler, missing_pattern, missing_predicate,
    unexpected_pattern, MatchError, Pattern, Predicate, Selections,
};
use shapematch_value::Value;
use smallvec::SmallVec;

/// The declarative form a case was written in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CaseKind {
    With,
    When,
    Otherwise,
}

impl CaseKind {
    /// Get the name used in identities and error messages.
    pub const fn as_str(self) -> &'static str {
        match self {
            CaseKind::With => "With",
            CaseKind::When => "When",
            CaseKind::Otherwise => "Otherwise",
        }
    }
}

impl fmt::Display for CaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable identity of a case: its kind plus a caller-supplied key.
///
/// Registering two cases with the same identity keeps only the first.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CaseId {
    pub kind: CaseKind,
    pub key: String,
}

impl CaseId {
    pub fn new(kind: CaseKind, key: impl Into<String>) -> Self {
        CaseId {
            kind,
            key: key.into(),
        }
    }
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.kind, self.key)
    }
}

/// Computes a case's result from the selections and the subject.
pub struct Handler<T>(Arc<dyn Fn(&Selections, &Value) -> T + Send + Sync>);

impl<T> Handler<T> {
    pub fn new(f: impl Fn(&Selections, &Value) -> T + Send + Sync + 'static) -> Self {
        Handler(Arc::new(f))
    }

    /// A handler that ignores its inputs and returns a clone of `value`.
    pub fn constant(value: T) -> Self
    where
        T: Clone + Send + Sync + 'static,
    {
        Handler::new(move |_, _| value.clone())
    }

    #[inline]
    pub fn call(&self, selections: &Selections, subject: &Value) -> T {
        (self.0)(selections, subject)
    }
}

impl<T> Clone for Handler<T> {
    fn clone(&self) -> Self {
        Handler(Arc::clone(&self.0))
    }
}

impl<T> fmt::Debug for Handler<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Handler(..)")
    }
}

/// A validated case.
pub struct Case<T> {
    id: CaseId,
    patterns: Vec<Pattern>,
    guards: SmallVec<[Predicate; 1]>,
    handler: Handler<T>,
    duplicate_selections: Vec<Arc<str>>,
}

impl<T> Case<T> {
    pub fn id(&self) -> &CaseId {
        &self.id
    }

    /// Alternative patterns, tried in order.
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn guards(&self) -> &[Predicate] {
        &self.guards
    }

    pub fn handler(&self) -> &Handler<T> {
        &self.handler
    }

    /// Selection names captured more than once by one of the patterns.
    pub fn duplicate_selections(&self) -> &[Arc<str>] {
        &self.duplicate_selections
    }

    /// Whether this case matches every subject.
    pub fn is_fallback(&self) -> bool {
        self.guards.is_empty() && self.patterns.iter().any(Pattern::is_irrefutable)
    }

    /// Structural match over the alternatives, then the guards.
    ///
    /// Returns the selections of the first matching alternative. Guards
    /// run only once an alternative has matched, and see the whole subject.
    pub fn try_match(&self, subject: &Value) -> Option<Selections> {
        let selections = self.patterns.iter().find_map(|pattern| {
            let result = match_pattern(pattern, subject);
            result.matched.then_some(result.selections)
        })?;
        self.guards
            .iter()
            .all(|guard| guard.test(subject))
            .then_some(selections)
    }

    /// Invoke the handler.
    pub fn run(&self, selections: &Selections, subject: &Value) -> T {
        self.handler.call(selections, subject)
    }
}

impl<T> Clone for Case<T> {
    fn clone(&self) -> Self {
        Case {
            id: self.id.clone(),
            patterns: self.patterns.clone(),
            guards: self.guards.clone(),
            handler: self.handler.clone(),
            duplicate_selections: self.duplicate_selections.clone(),
        }
    }
}

impl<T> fmt::Debug for Case<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Case")
            .field("id", &self.id)
            .field("patterns", &self.patterns)
            .field("guards", &self.guards.len())
            .finish_non_exhaustive()
    }
}

/// Builder for `Case`.
///
/// ```text
/// CaseBuilder::with("error")
///     .pattern(Pattern::object([("status", "error".into()), ("error", Pattern::select_anonymous())]))
///     .handler(|sel, _| render(sel.anonymous()))
///     .build()?
/// ```
#[must_use]
pub struct CaseBuilder<T> {
    id: CaseId,
    patterns: Vec<Pattern>,
    guards: SmallVec<[Predicate; 1]>,
    handler: Option<Handler<T>>,
    then: Option<Handler<T>>,
}

impl<T> CaseBuilder<T> {
    fn new(kind: CaseKind, key: impl Into<String>) -> Self {
        CaseBuilder {
            id: CaseId::new(kind, key),
            patterns: Vec::new(),
            guards: SmallVec::new(),
            handler: None,
            then: None,
        }
    }

    /// A case matching any of its patterns.
    pub fn with(key: impl Into<String>) -> Self {
        Self::new(CaseKind::With, key)
    }

    /// A case matching whatever its predicate accepts.
    pub fn when(key: impl Into<String>) -> Self {
        Self::new(CaseKind::When, key)
    }

    /// The fallback case.
    pub fn otherwise(key: impl Into<String>) -> Self {
        Self::new(CaseKind::Otherwise, key)
    }

    /// Add one alternative pattern.
    pub fn pattern(mut self, pattern: impl Into<Pattern>) -> Self {
        self.patterns.push(pattern.into());
        self
    }

    /// Add several alternative patterns.
    pub fn patterns(mut self, patterns: impl IntoIterator<Item = Pattern>) -> Self {
        self.patterns.extend(patterns);
        self
    }

    /// Add a guard; for `When` cases this is the predicate.
    pub fn guard(self, f: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        self.guard_predicate(Predicate::new(f))
    }

    pub fn guard_predicate(mut self, predicate: Predicate) -> Self {
        self.guards.push(predicate);
        self
    }

    pub fn handler(mut self, f: impl Fn(&Selections, &Value) -> T + Send + Sync + 'static) -> Self {
        self.handler = Some(Handler::new(f));
        self
    }

    /// Use a constant result instead of a handler.
    pub fn then(mut self, value: T) -> Self
    where
        T: Clone + Send + Sync + 'static,
    {
        self.then = Some(Handler::constant(value));
        self
    }

    /// Check the declaration and produce the case.
    pub fn build(self) -> Result<Case<T>, MatchError> {
        let CaseBuilder {
            id,
            mut patterns,
            guards,
            handler,
            then,
        } = self;
        let kind = id.kind.as_str();

        match id.kind {
            CaseKind::With if patterns.is_empty() => {
                return Err(missing_pattern(kind).in_case(&id));
            }
            CaseKind::When if guards.is_empty() => {
                return Err(missing_predicate().in_case(&id));
            }
            CaseKind::Otherwise if !patterns.is_empty() || !guards.is_empty() => {
                return Err(unexpected_pattern().in_case(&id));
            }
            _ => {}
        }

        let handler = match (handler, then) {
            (Some(_), Some(_)) => return Err(handler_conflict(kind).in_case(&id)),
            (None, None) => return Err(missing_handler(kind).in_case(&id)),
            (Some(handler), None) | (None, Some(handler)) => handler,
        };

        let mut duplicate_selections = Vec::new();
        for pattern in &patterns {
            let report = pattern.validate().map_err(|err| err.in_case(&id))?;
            duplicate_selections.extend(report.duplicate_selections);
        }

        if patterns.is_empty() {
            patterns.push(Pattern::Wildcard);
        }

        Ok(Case {
            id,
            patterns,
            guards,
            handler,
            duplicate_selections,
        })
    }
}
