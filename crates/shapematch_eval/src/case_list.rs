//! The ordered case list and its immutable snapshots.
//!
//! Registration is append-only and deduplicated by `CaseId`. Evaluation
//! never reads the list directly: it works on a `CaseSnapshot`, a shared
//! slice taken after the last registration.

use std::sync::Arc;

use shapematch_patterns::{duplicate_selection, fallback_not_last, MatchError, Selections};
use shapematch_value::Value;

use crate::case::{Case, CaseId};
use crate::config::MatchConfig;

/// Outcome of `CaseList::register`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Registration {
    /// The case was appended.
    Added,
    /// A case with the same identity was already present; nothing changed.
    Duplicate,
}

/// Ordered, deduplicated cases.
pub struct CaseList<T> {
    cases: Vec<Arc<Case<T>>>,
    config: MatchConfig,
}

impl<T> CaseList<T> {
    pub fn new() -> Self {
        Self::with_config(MatchConfig::default())
    }

    pub fn with_config(config: MatchConfig) -> Self {
        CaseList {
            cases: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn contains(&self, id: &CaseId) -> bool {
        self.cases.iter().any(|case| case.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Case<T>> {
        self.cases.iter().map(|case| &**case)
    }

    /// Append `case` unless its identity is already registered.
    ///
    /// Fails when the current last case is a fallback: anything after it
    /// could never be reached.
    pub fn register(&mut self, case: Case<T>) -> Result<Registration, MatchError> {
        if self.contains(case.id()) {
            tracing::debug!(case = %case.id(), "case already registered");
            return Ok(Registration::Duplicate);
        }

        if let Some(last) = self.cases.last() {
            if last.is_fallback() {
                return Err(fallback_not_last(last.id(), case.id()).in_case(case.id()));
            }
        }

        if let Some(name) = case.duplicate_selections().first() {
            if self.config.strict_selections {
                return Err(duplicate_selection(name).in_case(case.id()));
            }
            tracing::warn!(
                case = %case.id(),
                selection = %name,
                "selection captured more than once; the last capture wins"
            );
        }

        tracing::debug!(case = %case.id(), position = self.cases.len(), "case registered");
        self.cases.push(Arc::new(case));
        Ok(Registration::Added)
    }

    /// Drop every case.
    pub fn clear(&mut self) {
        self.cases.clear();
    }

    /// Immutable view of the current cases, in registration order.
    pub fn snapshot(&self) -> CaseSnapshot<T> {
        CaseSnapshot {
            cases: self.cases.iter().cloned().collect(),
        }
    }
}

impl<T> Default for CaseList<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The first matching case and what it captured.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Resolution {
    /// Position of the case in the snapshot.
    pub index: usize,
    pub selections: Selections,
}

/// Shared, immutable slice of cases.
pub struct CaseSnapshot<T> {
    cases: Arc<[Arc<Case<T>>]>,
}

impl<T> CaseSnapshot<T> {
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Case<T>> {
        self.cases.get(index).map(|case| &**case)
    }

    /// First-match-wins scan over the cases.
    pub fn resolve(&self, subject: &Value) -> Option<Resolution> {
        self.cases.iter().enumerate().find_map(|(index, case)| {
            let selections = case.try_match(subject);
            tracing::trace!(case = %case.id(), matched = selections.is_some());
            selections.map(|selections| Resolution { index, selections })
        })
    }

    /// Resolve and run the winning handler.
    pub fn evaluate(&self, subject: &Value) -> Option<T> {
        let resolution = self.resolve(subject)?;
        self.run(&resolution, subject)
    }

    /// Run the handler a resolution points at.
    pub fn run(&self, resolution: &Resolution, subject: &Value) -> Option<T> {
        self.get(resolution.index)
            .map(|case| case.run(&resolution.selections, subject))
    }
}

impl<T> Clone for CaseSnapshot<T> {
    fn clone(&self) -> Self {
        CaseSnapshot {
            cases: Arc::clone(&self.cases),
        }
    }
}

impl<T> Default for CaseSnapshot<T> {
    fn default() -> Self {
        CaseSnapshot {
            cases: Arc::from(Vec::new()),
        }
    }
}
