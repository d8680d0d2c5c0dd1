//! Error types for pattern and case configuration.
//!
//! # Structured Error Categories
//!
//! `MatchErrorKind` carries the structured data of each failure. Factory
//! functions (e.g., `fallback_not_last()`) are the public way to build
//! errors; they fill in the kind and leave the case context empty until
//! the caller attaches it with `MatchError::in_case`.
//!
//! Matching itself never fails. Every kind here is either a configuration
//! mistake caught at declaration time, a misuse of a state handle, or the
//! opt-in exhaustiveness check.

use std::fmt;

use thiserror::Error;

/// Typed error category.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MatchErrorKind {
    // Configuration
    #[error("<{kind}> requires a `pattern`")]
    MissingPattern { kind: &'static str },
    #[error("<When> requires a `predicate`")]
    MissingPredicate,
    #[error("<Otherwise> matches everything and takes neither a `pattern` nor a `guard`")]
    UnexpectedPattern,
    #[error("<{kind}> expects either a `handler` or a `then` value, not both")]
    HandlerConflict { kind: &'static str },
    #[error("<{kind}> expects either a `handler` or a `then` value")]
    MissingHandler { kind: &'static str },
    #[error("fallback case `{fallback}` must be the last case, but `{rejected}` was registered after it")]
    FallbackNotLast { fallback: String, rejected: String },
    #[error(
        "only a single anonymous selection is allowed in a pattern; give selections names with `select(<name>)` instead"
    )]
    MultipleAnonymousSelections,
    #[error(
        "mixing named selections and anonymous selections is forbidden; only use named selections"
    )]
    MixedSelections,
    #[error("selection `{name}` is captured more than once by the same pattern")]
    DuplicateSelection { name: String },

    // Lifecycle
    #[error("unknown evaluation state #{id}")]
    UnknownState { id: u32 },
    #[error("evaluation state #{id} has been disposed")]
    Disposed { id: u32 },
    #[error("state arena is full ({count} states)")]
    TooManyStates { count: usize },

    // Evaluation
    #[error("non-exhaustive match: no case matched {value}")]
    NonExhaustive { value: String },
}

impl MatchErrorKind {
    /// Whether this kind is raised at declaration or registration time.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingPattern { .. }
                | Self::MissingPredicate
                | Self::UnexpectedPattern
                | Self::HandlerConflict { .. }
                | Self::MissingHandler { .. }
                | Self::FallbackNotLast { .. }
                | Self::MultipleAnonymousSelections
                | Self::MixedSelections
                | Self::DuplicateSelection { .. }
        )
    }
}

/// Configuration, lifecycle or exhaustiveness error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchError {
    /// Structured error category.
    pub kind: MatchErrorKind,
    /// Display form of the case being declared when the error was raised.
    pub case: Option<String>,
}

impl MatchError {
    fn from_kind(kind: MatchErrorKind) -> Self {
        Self { kind, case: None }
    }

    /// Attach the case being declared, unless one is already attached.
    #[must_use]
    pub fn in_case(mut self, case: impl fmt::Display) -> Self {
        if self.case.is_none() {
            self.case = Some(case.to_string());
        }
        self
    }
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.case {
            Some(case) => write!(f, "{} (in case `{case}`)", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for MatchError {}

// Configuration Errors

/// A `With` case was declared without any pattern.
#[cold]
pub fn missing_pattern(kind: &'static str) -> MatchError {
    MatchError::from_kind(MatchErrorKind::MissingPattern { kind })
}

/// A `When` case was declared without a predicate.
#[cold]
pub fn missing_predicate() -> MatchError {
    MatchError::from_kind(MatchErrorKind::MissingPredicate)
}

/// An `Otherwise` case was given a pattern or a guard.
#[cold]
pub fn unexpected_pattern() -> MatchError {
    MatchError::from_kind(MatchErrorKind::UnexpectedPattern)
}

/// Both a handler and a constant result were supplied.
#[cold]
pub fn handler_conflict(kind: &'static str) -> MatchError {
    MatchError::from_kind(MatchErrorKind::HandlerConflict { kind })
}

/// Neither a handler nor a constant result was supplied.
#[cold]
pub fn missing_handler(kind: &'static str) -> MatchError {
    MatchError::from_kind(MatchErrorKind::MissingHandler { kind })
}

/// A case was registered after a case that matches everything.
#[cold]
pub fn fallback_not_last(fallback: impl fmt::Display, rejected: impl fmt::Display) -> MatchError {
    MatchError::from_kind(MatchErrorKind::FallbackNotLast {
        fallback: fallback.to_string(),
        rejected: rejected.to_string(),
    })
}

/// More than one anonymous `select()` in one pattern.
#[cold]
pub fn multiple_anonymous_selections() -> MatchError {
    MatchError::from_kind(MatchErrorKind::MultipleAnonymousSelections)
}

/// Anonymous and named selections in one pattern.
#[cold]
pub fn mixed_selections() -> MatchError {
    MatchError::from_kind(MatchErrorKind::MixedSelections)
}

/// The same selection name is captured twice outside `or` alternatives.
#[cold]
pub fn duplicate_selection(name: &str) -> MatchError {
    MatchError::from_kind(MatchErrorKind::DuplicateSelection {
        name: name.to_string(),
    })
}

// Lifecycle Errors

/// A handle that was never issued by the arena.
#[cold]
pub fn unknown_state(id: u32) -> MatchError {
    MatchError::from_kind(MatchErrorKind::UnknownState { id })
}

/// A handle whose state was disposed.
#[cold]
pub fn disposed_state(id: u32) -> MatchError {
    MatchError::from_kind(MatchErrorKind::Disposed { id })
}

/// No more handles can be issued.
#[cold]
pub fn too_many_states(count: usize) -> MatchError {
    MatchError::from_kind(MatchErrorKind::TooManyStates { count })
}

// Evaluation Errors

/// No case matched and the state requires exhaustiveness.
#[cold]
pub fn non_exhaustive(value: &shapematch_value::Value) -> MatchError {
    MatchError::from_kind(MatchErrorKind::NonExhaustive {
        value: value.to_string(),
    })
}
