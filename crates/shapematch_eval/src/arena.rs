//! Explicit handles for evaluation states.
//!
//! Callers never hold an `EvaluationState` directly; they hold a `StateId`
//! and pass it to every call. A handle is a slot index plus the generation
//! of the state it was issued for. Disposing frees the slot for reuse under
//! the next generation, so a stale handle still reports `Disposed` rather
//! than reaching the new occupant.

use std::cmp::Ordering;
use std::fmt;

use shapematch_patterns::{disposed_state, too_many_states, unknown_state, MatchError};
use shapematch_value::Value;

use crate::case::Case;
use crate::case_list::Registration;
use crate::config::MatchConfig;
use crate::state::{EvaluationState, Lifecycle};

/// Slot index and generation in a `MatchArena`.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct StateId {
    index: u32,
    generation: u32,
}

impl StateId {
    /// Handle of a state that does not live in an arena.
    pub const DETACHED: StateId = StateId {
        index: u32::MAX,
        generation: 0,
    };

    #[inline]
    pub const fn new(index: u32, generation: u32) -> Self {
        StateId { index, generation }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.index as usize
    }

    /// The slot index, as reported in errors.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.index
    }

    #[inline]
    pub const fn generation(self) -> u32 {
        self.generation
    }

    #[inline]
    pub const fn is_detached(self) -> bool {
        self.index == u32::MAX
    }
}

impl fmt::Debug for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_detached() {
            write!(f, "StateId::DETACHED")
        } else {
            write!(f, "StateId({}@{})", self.index, self.generation)
        }
    }
}

struct Slot<T> {
    generation: u32,
    state: EvaluationState<T>,
}

/// Owner of many evaluation states.
pub struct MatchArena<T> {
    slots: Vec<Slot<T>>,
    /// Indices of disposed slots, reused last-in first-out.
    free: Vec<u32>,
    active: usize,
    config: MatchConfig,
}

impl<T> MatchArena<T> {
    pub fn new() -> Self {
        Self::with_config(MatchConfig::default())
    }

    /// Every state created by this arena uses `config`.
    pub fn with_config(config: MatchConfig) -> Self {
        MatchArena {
            slots: Vec::new(),
            free: Vec::new(),
            active: 0,
            config,
        }
    }

    /// Number of states created and not yet disposed.
    pub fn len(&self) -> usize {
        self.active
    }

    pub fn is_empty(&self) -> bool {
        self.active == 0
    }

    /// Number of slots allocated, free ones included.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Allocate a state holding `initial`, reusing a disposed slot if any.
    pub fn create(&mut self, initial: Value) -> Result<StateId, MatchError> {
        let id = self.next_id()?;
        let mut state = EvaluationState::with_id(id, self.config);
        state.set_subject(initial)?;
        let slot = Slot {
            generation: id.generation(),
            state,
        };
        if let Some(reused) = self.slots.get_mut(id.index()) {
            self.free.pop();
            *reused = slot;
        } else {
            self.slots.push(slot);
        }
        self.active += 1;
        tracing::debug!(state = ?id, "state created");
        Ok(id)
    }

    fn next_id(&self) -> Result<StateId, MatchError> {
        if let Some(&index) = self.free.last() {
            if let Some(slot) = self.slots.get(index as usize) {
                return Ok(StateId::new(index, slot.generation + 1));
            }
        }
        let index = u32::try_from(self.slots.len())
            .ok()
            .filter(|index| *index != StateId::DETACHED.raw())
            .ok_or_else(|| too_many_states(self.slots.len()))?;
        Ok(StateId::new(index, 0))
    }

    /// Borrow a state, including a disposed one whose slot was not reused.
    pub fn get(&self, id: StateId) -> Result<&EvaluationState<T>, MatchError> {
        let slot = self
            .slots
            .get(id.index())
            .ok_or_else(|| unknown_state(id.raw()))?;
        check_generation(id, slot.generation)?;
        Ok(&slot.state)
    }

    fn live(&mut self, id: StateId) -> Result<&mut EvaluationState<T>, MatchError> {
        let slot = self
            .slots
            .get_mut(id.index())
            .ok_or_else(|| unknown_state(id.raw()))?;
        check_generation(id, slot.generation)?;
        if slot.state.lifecycle() == Lifecycle::Disposed {
            return Err(disposed_state(id.raw()));
        }
        Ok(&mut slot.state)
    }

    pub fn register_case(&mut self, id: StateId, case: Case<T>) -> Result<Registration, MatchError> {
        self.live(id)?.register(case)
    }

    pub fn set_subject(&mut self, id: StateId, subject: Value) -> Result<(), MatchError> {
        self.live(id)?.set_subject(subject)
    }

    pub fn evaluate(&self, id: StateId) -> Result<Option<T>, MatchError> {
        self.get(id)?.evaluate()
    }

    pub fn reset(&mut self, id: StateId) -> Result<(), MatchError> {
        self.live(id)?.reset()
    }

    /// Dispose a state and free its slot. Disposing twice is an error.
    ///
    /// A slot whose generation is exhausted is retired instead of freed.
    pub fn dispose(&mut self, id: StateId) -> Result<(), MatchError> {
        self.live(id)?.dispose();
        self.active -= 1;
        if id.generation() < u32::MAX {
            self.free.push(id.raw());
        }
        Ok(())
    }
}

/// Older generations were disposed; newer ones were never issued.
fn check_generation(id: StateId, current: u32) -> Result<(), MatchError> {
    match id.generation().cmp(&current) {
        Ordering::Equal => Ok(()),
        Ordering::Less => Err(disposed_state(id.raw())),
        Ordering::Greater => Err(unknown_state(id.raw())),
    }
}

impl<T> Default for MatchArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
