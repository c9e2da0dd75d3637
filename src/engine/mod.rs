//! The state machine capability.
//!
//! An entity implements [`Stateful`] to expose its state and its generic
//! hooks; a [`StateMachine`] pairs an immutable transition table with
//! per-state hooks and drives the entity through [`StateMachine::change_state`].
//!
//! # Error routing
//!
//! - An invalid transition is always returned as [`TransitionError::Invalid`].
//! - A before-hook that aborts or fails is returned to the caller under
//!   [`ErrorPolicy::Propagate`], or handed to the aborted-hook or the error
//!   manager under [`ErrorPolicy::Manage`], yielding [`Outcome::Aborted`] or
//!   [`Outcome::Failed`].
//! - Every other hook error is returned as [`TransitionError::Hook`].

mod entity;
mod error;
mod hooks;
mod machine;
mod outcome;

pub use entity::Stateful;
pub use error::{AbortTransition, HookFailure, InvalidTransition, TransitionError};
pub use hooks::{AbortedHook, BeforeHook, EnterHook, Hooks};
pub use machine::{Attached, ChangeResult, StateMachine};
pub use outcome::{ErrorPolicy, Outcome};
