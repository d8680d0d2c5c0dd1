//! Shapematch Value - runtime values for the shapematch engine.
//!
//! This crate provides:
//! - `Value`, the dynamically typed value a pattern is matched against
//! - `Heap<T>`, the reference-counted wrapper behind every heap value
//! - `ValueKind`, the coarse kind used by typed wildcards
//!
//! # Identity vs. Structure
//!
//! Two equalities exist on purpose:
//! - `Value::strict_equals` is identity for heap values (`===`), which is
//!   what literal patterns use.
//! - `PartialEq` compares structurally and is meant for tests and
//!   diagnostics.

mod value;

pub use value::{Heap, Object, Value, ValueKind};
