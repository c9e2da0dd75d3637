//! Transition tables.
//!
//! A table maps every declared state to the set of states reachable from it.
//! Tables are immutable once built and are shared between machines by `Arc`.

use super::state::State;
use crate::builder::{BuildError, TransitionTableBuilder};
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// Keyword used in serialized tables for [`Reachable::Any`].
pub const ANY_STATES: &str = "__all__";

/// Targets declared for one state.
#[derive(Clone, Debug, PartialEq)]
pub enum Reachable<S: State> {
    /// Every state declared in the table is reachable, this one included.
    Any,
    /// Only the listed states are reachable. Order is irrelevant.
    States(Vec<S>),
    /// Nothing is reachable.
    Terminal,
}

/// A table entry whose target is never declared as a key.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("state '{from}' lists undeclared target '{target}'")]
pub struct TableViolation {
    pub from: String,
    pub target: String,
}

/// Immutable mapping from each declared state to its [`Reachable`] targets.
///
/// # Example
///
/// ```rust
/// use turnstile::core::TransitionTable;
///
/// let table = TransitionTable::builder()
///     .allow("draft".to_string(), ["review".to_string()])
///     .any("review".to_string())
///     .terminal("published".to_string())
///     .build()
///     .unwrap();
///
/// assert_eq!(table.targets(&"draft".to_string()), vec![&"review".to_string()]);
/// assert_eq!(table.targets(&"review".to_string()).len(), 3);
/// assert!(table.is_terminal(&"published".to_string()));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionTable<S: State> {
    entries: Vec<(S, Reachable<S>)>,
}

impl<S: State> TransitionTable<S> {
    /// Start building a table.
    pub fn builder() -> TransitionTableBuilder<S> {
        TransitionTableBuilder::new()
    }

    /// Entries must already be free of duplicate keys.
    pub(crate) fn from_entries(entries: Vec<(S, Reachable<S>)>) -> Self {
        Self { entries }
    }

    /// Look up the declared targets of `state`.
    pub fn entry(&self, state: &S) -> Option<&Reachable<S>> {
        self.entries
            .iter()
            .find(|(key, _)| key == state)
            .map(|(_, reachable)| reachable)
    }

    /// Declared states in declaration order.
    pub fn states(&self) -> impl Iterator<Item = &S> {
        self.entries.iter().map(|(key, _)| key)
    }

    pub fn contains(&self, state: &S) -> bool {
        self.entry(state).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// States reachable from `state`.
    ///
    /// A missing key and a [`Reachable::Terminal`] entry both resolve to no
    /// targets. [`Reachable::Any`] resolves to every declared key, so a state
    /// marked `Any` may transition to itself.
    pub fn targets(&self, state: &S) -> Vec<&S> {
        match self.entry(state) {
            None => {
                tracing::debug!(state = state.name(), "state not declared in transition table");
                Vec::new()
            }
            Some(Reachable::Terminal) => Vec::new(),
            Some(Reachable::Any) => self.states().collect(),
            Some(Reachable::States(targets)) => targets.iter().collect(),
        }
    }

    /// True when no state is reachable from `state`.
    pub fn is_terminal(&self, state: &S) -> bool {
        self.targets(state).is_empty()
    }

    /// Check that every listed target is also declared as a key.
    ///
    /// Accumulates every undeclared target instead of stopping at the first.
    /// The engine never runs this itself; a table with missing keys simply
    /// rejects transitions out of the undeclared states.
    pub fn check_total(&self) -> Validation<(), NonEmptyVec<TableViolation>> {
        let checks: Vec<Validation<(), NonEmptyVec<TableViolation>>> = self
            .entries
            .iter()
            .filter_map(|(from, reachable)| match reachable {
                Reachable::States(targets) => Some((from, targets)),
                _ => None,
            })
            .flat_map(|(from, targets)| targets.iter().map(move |target| (from, target)))
            .map(|(from, target)| {
                if self.contains(target) {
                    Validation::success(())
                } else {
                    Validation::fail(TableViolation {
                        from: from.name().to_string(),
                        target: target.name().to_string(),
                    })
                }
            })
            .collect();

        Validation::all_vec(checks).map(|_| ())
    }

    /// Parse a table from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, BuildError> {
        serde_json::from_str(json).map_err(|e| BuildError::InvalidFormat(e.to_string()))
    }

    /// Render the table in its JSON form.
    pub fn to_json(&self) -> Result<String, BuildError> {
        serde_json::to_string_pretty(self).map_err(|e| BuildError::InvalidFormat(e.to_string()))
    }
}

impl<S: State> Serialize for Reachable<S> {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        match self {
            Self::Any => serializer.serialize_str(ANY_STATES),
            Self::States(targets) => targets.serialize(serializer),
            Self::Terminal => serializer.serialize_none(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged, bound = "")]
enum RawReachable<S: State> {
    States(Vec<S>),
    Keyword(String),
    Terminal,
}

impl<'de, S: State> Deserialize<'de> for Reachable<S> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawReachable::<S>::deserialize(deserializer)? {
            RawReachable::States(targets) if targets.is_empty() => Ok(Self::Terminal),
            RawReachable::States(targets) => Ok(Self::States(targets)),
            RawReachable::Keyword(keyword) if keyword == ANY_STATES => Ok(Self::Any),
            RawReachable::Keyword(keyword) => Err(de::Error::custom(format!(
                "unknown targets keyword '{keyword}', expected '{ANY_STATES}', a list or null"
            ))),
            RawReachable::Terminal => Ok(Self::Terminal),
        }
    }
}

impl<S: State> Serialize for TransitionTable<S> {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        serializer.collect_map(self.entries.iter().map(|(key, reachable)| (key, reachable)))
    }
}

struct TableVisitor<S>(PhantomData<S>);

impl<'de, S: State> Visitor<'de> for TableVisitor<S> {
    type Value = TransitionTable<S>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map from state to its reachable states")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut builder = TransitionTableBuilder::new();
        while let Some((state, reachable)) = map.next_entry::<S, Reachable<S>>()? {
            builder = builder.entry(state, reachable);
        }
        builder.build().map_err(de::Error::custom)
    }
}

impl<'de, S: State> Deserialize<'de> for TransitionTable<S> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(TableVisitor(PhantomData))
    }
}
