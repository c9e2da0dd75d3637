//! Core state machine types.
//!
//! This module contains the pure data of the state machine:
//! - State definitions via the `State` trait
//! - Immutable transition tables

mod state;
mod table;

pub use state::State;
pub use table::{Reachable, TableViolation, TransitionTable, ANY_STATES};
