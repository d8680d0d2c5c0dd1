//! Shapematch Eval - case lists and evaluation states.
//!
//! This crate layers first-match-wins case evaluation over the matcher in
//! `shapematch_patterns`:
//!
//! - `CaseBuilder` / `Case`: validated `(patterns, guards, handler)` triples
//! - `CaseList`: ordered, deduplicated registration with the
//!   fallback-must-be-last rule
//! - `CaseSnapshot`: the immutable view evaluation runs against
//! - `EvaluationState`: subject plus cases, recomputed on every change
//! - `MatchArena` / `StateId`: explicit handles over many states
//!
//! # Concurrency
//!
//! A state is mutated through `&mut self` only, so registration and
//! evaluation of one state never overlap. Handlers and predicates are
//! `Send + Sync`, so snapshots can be shared across threads.

mod arena;
mod case;
mod case_list;
mod config;
mod state;

pub use arena::{MatchArena, StateId};
pub use case::{Case, CaseBuilder, CaseId, CaseKind, Handler};
pub use case_list::{CaseList, CaseSnapshot, Registration, Resolution};
pub use config::MatchConfig;
pub use state::{EvaluationState, Lifecycle};

// Re-export the matching layer so most callers need this crate only
pub use shapematch_patterns::{
    match_pattern, MatchError, MatchErrorKind, MatchResult, Pattern, Predicate, SelectionKey,
    Selections,
};
pub use shapematch_value::{Value, ValueKind};
