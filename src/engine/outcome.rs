//! Results of a state change.

/// How hook failures are handled by
/// [`StateMachine::change_state`](super::StateMachine::change_state).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Return aborts and before-hook errors to the caller.
    #[default]
    Propagate,

    /// Route aborts to the aborted-hook and before-hook errors to
    /// [`Stateful::on_manage_error`](super::Stateful::on_manage_error).
    Manage,
}

impl From<bool> for ErrorPolicy {
    fn from(manage_errors: bool) -> Self {
        if manage_errors {
            Self::Manage
        } else {
            Self::Propagate
        }
    }
}

/// Outcome of a state change that did not return an error.
///
/// `Aborted` and `Failed` only occur under [`ErrorPolicy::Manage`]; they carry
/// whatever the recovery hook returned, or `None` when no hook handled it.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome<S, R> {
    /// The entity is now in this state.
    Completed(S),

    /// A before-hook aborted; the state is unchanged.
    Aborted(Option<R>),

    /// A before-hook failed and the error manager handled it; the state is unchanged.
    Failed(Option<R>),
}

impl<S, R> Outcome<S, R> {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    /// The new state, if the transition completed.
    pub fn state(&self) -> Option<&S> {
        match self {
            Self::Completed(state) => Some(state),
            _ => None,
        }
    }

    /// The recovery hook's result, if one ran and returned something.
    pub fn into_recovery(self) -> Option<R> {
        match self {
            Self::Completed(_) => None,
            Self::Aborted(recovery) | Self::Failed(recovery) => recovery,
        }
    }
}
