//! Evaluation state: a subject, its cases, and the current resolution.
//!
//! ```text
//! Uninitialized --set_subject / register--> Active --dispose--> Disposed
//!       ^                                     |
//!       +----------------reset----------------+
//! ```
//!
//! Every change to the subject or the case list recomputes the resolution
//! in full. `evaluate` only runs the handler the resolution points at.

use shapematch_patterns::{disposed_state, non_exhaustive, MatchError};
use shapematch_value::Value;

use crate::arena::StateId;
use crate::case::Case;
use crate::case_list::{CaseList, CaseSnapshot, Registration, Resolution};
use crate::config::MatchConfig;

/// Where a state is in its lifecycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Active,
    Disposed,
}

/// Owner of one subject value and the cases evaluated against it.
pub struct EvaluationState<T> {
    id: StateId,
    lifecycle: Lifecycle,
    subject: Value,
    cases: CaseList<T>,
    snapshot: CaseSnapshot<T>,
    resolution: Option<Resolution>,
}

impl<T> EvaluationState<T> {
    /// A detached state with the default configuration.
    pub fn new() -> Self {
        Self::with_config(MatchConfig::default())
    }

    pub fn with_config(config: MatchConfig) -> Self {
        Self::with_id(StateId::DETACHED, config)
    }

    pub(crate) fn with_id(id: StateId, config: MatchConfig) -> Self {
        EvaluationState {
            id,
            lifecycle: Lifecycle::Uninitialized,
            subject: Value::Undefined,
            cases: CaseList::with_config(config),
            snapshot: CaseSnapshot::default(),
            resolution: None,
        }
    }

    pub fn id(&self) -> StateId {
        self.id
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn config(&self) -> &MatchConfig {
        self.cases.config()
    }

    /// The subject; `Undefined` until one is set.
    pub fn subject(&self) -> &Value {
        &self.subject
    }

    pub fn cases(&self) -> &CaseList<T> {
        &self.cases
    }

    /// The case list as of the last recompute.
    pub fn snapshot(&self) -> &CaseSnapshot<T> {
        &self.snapshot
    }

    /// The first matching case as of the last recompute.
    pub fn resolution(&self) -> Option<&Resolution> {
        self.resolution.as_ref()
    }

    fn ensure_live(&self) -> Result<(), MatchError> {
        if self.lifecycle == Lifecycle::Disposed {
            return Err(disposed_state(self.id.raw()));
        }
        Ok(())
    }

    /// Replace the subject and recompute.
    pub fn set_subject(&mut self, subject: Value) -> Result<(), MatchError> {
        self.ensure_live()?;
        self.subject = subject;
        self.lifecycle = Lifecycle::Active;
        self.recompute();
        Ok(())
    }

    /// Register a case and, if it was added, recompute.
    pub fn register(&mut self, case: Case<T>) -> Result<Registration, MatchError> {
        self.ensure_live()?;
        let registration = self.cases.register(case)?;
        self.lifecycle = Lifecycle::Active;
        if registration == Registration::Added {
            self.recompute();
        }
        Ok(registration)
    }

    /// Rescan the cases against the subject.
    ///
    /// Idempotent: with unchanged inputs the resolution is unchanged.
    #[tracing::instrument(level = "trace", skip_all, fields(state = ?self.id, cases = self.cases.len()))]
    pub fn recompute(&mut self) {
        self.snapshot = self.cases.snapshot();
        self.resolution = self.snapshot.resolve(&self.subject);
        tracing::trace!(resolved = ?self.resolution.as_ref().map(|r| r.index));
    }

    /// Run the resolved handler.
    ///
    /// `Ok(None)` when nothing matched, unless the state is exhaustive.
    #[tracing::instrument(level = "debug", skip_all, fields(state = ?self.id))]
    pub fn evaluate(&self) -> Result<Option<T>, MatchError> {
        self.ensure_live()?;
        match &self.resolution {
            Some(resolution) => Ok(self.snapshot.run(resolution, &self.subject)),
            None if self.config().exhaustive => Err(non_exhaustive(&self.subject)),
            None => Ok(None),
        }
    }

    /// Drop cases and subject, back to `Uninitialized`.
    pub fn reset(&mut self) -> Result<(), MatchError> {
        self.ensure_live()?;
        self.clear();
        self.lifecycle = Lifecycle::Uninitialized;
        Ok(())
    }

    /// Tear the state down. Later calls other than `dispose` fail.
    pub fn dispose(&mut self) {
        if self.lifecycle != Lifecycle::Disposed {
            tracing::debug!(state = ?self.id, "state disposed");
        }
        self.clear();
        self.lifecycle = Lifecycle::Disposed;
    }

    fn clear(&mut self) {
        self.cases.clear();
        self.subject = Value::Undefined;
        self.snapshot = CaseSnapshot::default();
        self.resolution = None;
    }
}

impl<T> Default for EvaluationState<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
