//! Builder API for ergonomic construction of tables and machines.
//!
//! This module provides fluent builders and macros for declaring transition
//! tables and attaching hooks with minimal boilerplate.

pub mod error;
pub mod machine;
pub mod macros;
pub mod table;

pub use error::BuildError;
pub use machine::StateMachineBuilder;
pub use table::TransitionTableBuilder;
