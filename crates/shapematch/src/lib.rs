//! Shapematch - structural pattern matching over JS-like values.
//!
//! This is the facade crate. It re-exports the layered crates:
//!
//! - `shapematch_value`: the runtime value model
//! - `shapematch_patterns`: patterns, the matcher and selections
//! - `shapematch_eval`: cases, case lists, evaluation states and handles
//!
//! and adds JSON case documents (`CaseDocument`) plus logging setup for the
//! `shapematch` binary.
//!
//! # Example
//!
//! ```text
//! let mut state = EvaluationState::new();
//! state.register(CaseBuilder::with("red").pattern("red").then("stop").build()?)?;
//! state.register(CaseBuilder::otherwise("any").then("go").build()?)?;
//! state.set_subject(Value::from("green"))?;
//! assert_eq!(state.evaluate()?, Some("go"));
//! ```

pub mod document;
pub mod json;

use std::sync::Once;

pub use document::{decode_pattern, CaseDocument, CaseKindSpec, CaseSpec, DocumentError};
pub use shapematch_eval::{
    Case, CaseBuilder, CaseId, CaseKind, CaseList, CaseSnapshot, EvaluationState, Handler,
    Lifecycle, MatchArena, MatchConfig, Registration, Resolution, StateId,
};
pub use shapematch_patterns::{
    match_pattern, ArrayShape, MatchError, MatchErrorKind, MatchResult, Pattern, PatternReport,
    Predicate, SelectionKey, Selections,
};
pub use shapematch_value::{Value, ValueKind};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Does nothing unless `RUST_LOG` is set, e.g.
/// `RUST_LOG=shapematch_eval=trace`. With `SHAPEMATCH_LOG_TREE` set, spans
/// are rendered as an indented tree instead of flat lines.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_err() {
            return;
        }
        let filter = EnvFilter::from_default_env();
        if std::env::var_os("SHAPEMATCH_LOG_TREE").is_some() {
            tracing_subscriber::registry()
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_bracketed_fields(true),
                )
                .with(filter)
                .init();
        } else {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
