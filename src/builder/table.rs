//! Builder for constructing transition tables.

use crate::builder::error::BuildError;
use crate::core::{Reachable, State, TransitionTable};

/// Builder for constructing transition tables with a fluent API.
pub struct TransitionTableBuilder<S: State> {
    entries: Vec<(S, Reachable<S>)>,
}

impl<S: State> TransitionTableBuilder<S> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Declare `from` with an explicit target set.
    /// An empty set declares `from` terminal.
    pub fn allow<I>(self, from: S, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
    {
        self.entry(from, Reachable::States(targets.into_iter().collect()))
    }

    /// Declare `from` as able to reach every declared state.
    pub fn any(self, from: S) -> Self {
        self.entry(from, Reachable::Any)
    }

    /// Declare `from` as terminal.
    pub fn terminal(self, from: S) -> Self {
        self.entry(from, Reachable::Terminal)
    }

    /// Declare `from` with an already resolved target kind.
    /// An empty `States` list is stored as `Terminal`.
    pub fn entry(mut self, from: S, reachable: Reachable<S>) -> Self {
        let reachable = match reachable {
            Reachable::States(targets) if targets.is_empty() => Reachable::Terminal,
            other => other,
        };
        self.entries.push((from, reachable));
        self
    }

    /// Build the table.
    /// Returns an error if no state was declared or a state was declared twice.
    pub fn build(self) -> Result<TransitionTable<S>, BuildError> {
        if self.entries.is_empty() {
            return Err(BuildError::NoStates);
        }

        for (i, (state, _)) in self.entries.iter().enumerate() {
            if self.entries[..i].iter().any(|(seen, _)| seen == state) {
                return Err(BuildError::DuplicateState {
                    state: state.name().to_string(),
                });
            }
        }

        Ok(TransitionTable::from_entries(self.entries))
    }
}

impl<S: State> Default for TransitionTableBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}
