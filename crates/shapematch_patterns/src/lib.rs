//! Shapematch Patterns - structural pattern matching over runtime values.
//!
//! This crate provides:
//! - `Pattern`, a closed sum type describing the shape of a value
//! - The matcher engine (`match_pattern`, `Pattern::matches`)
//! - `Selections`, the values captured by `select` markers during a match
//! - Configuration error types (`MatchError`, `MatchErrorKind`)
//!
//! # Architecture
//!
//! Matching is a pure recursive descent over the pattern tree, mirrored by
//! the shape of the value. Neither the pattern nor the value is mutated.
//! Absence of a match is a normal outcome, never an error: errors in this
//! crate describe malformed patterns and are raised by `Pattern::validate`
//! before any value is matched.

mod errors;
mod matcher;
mod pattern;
mod selections;
mod stack;

pub use errors::{MatchError, MatchErrorKind};
pub use matcher::{match_pattern, MatchResult};
pub use pattern::{ArrayShape, Pattern, PatternReport, Predicate, SelectionKey};
pub use selections::Selections;

// Re-export the value model so downstream crates need a single import
pub use shapematch_value::{Value, ValueKind};

// Re-export error constructors for use by other crates
pub use errors::{
    // Configuration errors
    duplicate_selection, fallback_not_last, handler_conflict, missing_handler, missing_pattern,
    missing_predicate, mixed_selections, multiple_anonymous_selections, unexpected_pattern,
    // Lifecycle errors
    disposed_state, too_many_states, unknown_state,
    // Evaluation errors
    non_exhaustive,
};
