//! Errors raised while changing state.

use crate::core::State;
use thiserror::Error;

/// The requested state is not reachable from the current one.
///
/// Always surfaced to the caller, whatever the [`ErrorPolicy`](super::ErrorPolicy).
#[derive(Debug, Clone, PartialEq, Error)]
#[error("The transition from {} to {} is not valid", .from.name(), .to.name())]
pub struct InvalidTransition<S: State> {
    pub from: S,
    pub to: S,
}

/// Signal raised by a before-hook to cancel a transition.
///
/// Aborting is an expected outcome, distinct from a hook failure.
#[derive(Debug, Clone, Default, PartialEq, Error)]
#[error("{}", .reason.as_deref().unwrap_or("Changing state should be aborted"))]
pub struct AbortTransition {
    pub reason: Option<String>,
}

impl AbortTransition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reason(reason: impl Into<String>) -> Self {
        Self {
            reason: Some(reason.into()),
        }
    }
}

/// Ways a state-specific before-hook can stop a transition.
#[derive(Debug, Error)]
pub enum HookFailure<E: std::error::Error + 'static> {
    /// The hook deliberately cancelled the transition.
    #[error(transparent)]
    Abort(#[from] AbortTransition),

    /// The hook failed.
    #[error(transparent)]
    Error(E),
}

/// Errors returned by [`StateMachine::change_state`](super::StateMachine::change_state).
#[derive(Debug, Error)]
pub enum TransitionError<S: State, E: std::error::Error + 'static> {
    #[error(transparent)]
    Invalid(#[from] InvalidTransition<S>),

    #[error("Transition to {} was aborted", .to.name())]
    Aborted {
        to: S,
        #[source]
        signal: AbortTransition,
    },

    /// A hook error, passed through unchanged.
    #[error(transparent)]
    Hook(E),
}

impl<S: State, E: std::error::Error + 'static> TransitionError<S, E> {
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted { .. })
    }

    /// The hook error, if this is one.
    pub fn into_hook_error(self) -> Option<E> {
        match self {
            Self::Hook(error) => Some(error),
            _ => None,
        }
    }
}
