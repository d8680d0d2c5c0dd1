//! Evaluation configuration.

/// Options shared by a case list and the state that owns it.
///
/// The default is lenient: a miss evaluates to `None` and statically
/// duplicated selection names are only logged.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchConfig {
    /// Report a miss as `NonExhaustive` instead of `None`.
    pub exhaustive: bool,
    /// Reject cases whose patterns capture the same name twice.
    pub strict_selections: bool,
}

impl MatchConfig {
    #[must_use]
    pub fn exhaustive(mut self, exhaustive: bool) -> Self {
        self.exhaustive = exhaustive;
        self
    }

    #[must_use]
    pub fn strict_selections(mut self, strict: bool) -> Self {
        self.strict_selections = strict;
        self
    }
}
