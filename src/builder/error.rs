//! Build errors for transition tables and state machines.

use thiserror::Error;

/// Errors that can occur when building transition tables and state machines.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BuildError {
    #[error("No states declared. Add at least one table entry")]
    NoStates,

    #[error("State '{state}' is declared more than once")]
    DuplicateState { state: String },

    #[error("Transition table not specified. Call .table(table) before .build()")]
    MissingTable,

    #[error("Hook registered for state '{state}', which the transition table does not declare")]
    UnknownHookState { state: String },

    #[error("Invalid transition table format: {0}")]
    InvalidFormat(String),
}
