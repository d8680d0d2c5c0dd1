//! Values captured by `select` markers.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use shapematch_value::Value;

use crate::pattern::SelectionKey;

/// Captured values of one successful match.
///
/// Recording a key that already holds a value replaces it (last write wins).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selections {
    anonymous: Option<Value>,
    named: FxHashMap<Arc<str>, Value>,
}

impl Selections {
    /// Empty selections.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `value` under `key`.
    pub fn record(&mut self, key: &SelectionKey, value: Value) {
        let previous = match key {
            SelectionKey::Anonymous => self.anonymous.replace(value),
            SelectionKey::Named(name) => self.named.insert(Arc::clone(name), value),
        };
        if let Some(previous) = previous {
            if Some(&previous) != self.get_key(key) {
                tracing::debug!(selection = %key, "selection overwritten by a later capture");
            }
        }
    }

    /// Value of a named selection.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.named.get(name)
    }

    /// Value of the anonymous selection.
    pub fn anonymous(&self) -> Option<&Value> {
        self.anonymous.as_ref()
    }

    /// Value recorded under `key`.
    pub fn get_key(&self, key: &SelectionKey) -> Option<&Value> {
        match key {
            SelectionKey::Anonymous => self.anonymous.as_ref(),
            SelectionKey::Named(name) => self.named.get(name),
        }
    }

    /// Whether anything was recorded under `key`.
    pub fn contains(&self, key: &SelectionKey) -> bool {
        self.get_key(key).is_some()
    }

    /// Named selections, in no particular order.
    pub fn named(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.named.iter().map(|(name, value)| (&**name, value))
    }

    /// Number of recorded keys, the anonymous slot included.
    pub fn len(&self) -> usize {
        self.named.len() + usize::from(self.anonymous.is_some())
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.anonymous.is_none() && self.named.is_empty()
    }

    /// Move every selection of `other` into `self`, `other` winning on conflict.
    pub fn merge(&mut self, other: Selections) {
        if let Some(value) = other.anonymous {
            self.record(&SelectionKey::Anonymous, value);
        }
        for (name, value) in other.named {
            self.record(&SelectionKey::Named(name), value);
        }
    }

    /// Remove and return the value under `key`.
    pub(crate) fn take(&mut self, key: &SelectionKey) -> Option<Value> {
        match key {
            SelectionKey::Anonymous => self.anonymous.take(),
            SelectionKey::Named(name) => self.named.remove(name),
        }
    }

    /// The argument a case handler conventionally receives.
    ///
    /// The anonymous selection when there is one, otherwise an object of the
    /// named selections, otherwise the subject itself.
    pub fn argument(&self, subject: &Value) -> Value {
        if let Some(value) = &self.anonymous {
            return value.clone();
        }
        if self.named.is_empty() {
            return subject.clone();
        }
        Value::object(
            self.named
                .iter()
                .map(|(name, value)| (name.to_string(), value.clone())),
        )
    }
}

#[cfg(test)]
mod tests;
