//! The capability an entity provides to be driven by a [`StateMachine`](super::StateMachine).

use crate::core::State;

/// An entity owning exactly one live state value.
///
/// The machine never stores the state itself: it reads it through
/// [`current_state`](Stateful::current_state) and writes it through
/// [`set_state`](Stateful::set_state), which must only update the value in
/// memory. Committing it anywhere is the caller's concern.
///
/// The three provided hooks run on every transition and default to no-ops.
/// Per-state hooks are registered on the machine instead, see
/// [`StateMachineBuilder`](crate::builder::StateMachineBuilder).
///
/// # Example
///
/// ```rust
/// use turnstile::engine::Stateful;
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("door jammed")]
/// struct Jammed;
///
/// struct Door {
///     state: String,
/// }
///
/// impl Stateful for Door {
///     type State = String;
///     type Args = ();
///     type Error = Jammed;
///     type Recovery = ();
///
///     fn current_state(&self) -> String {
///         self.state.clone()
///     }
///
///     fn set_state(&mut self, state: String) {
///         self.state = state;
///     }
/// }
/// ```
pub trait Stateful {
    /// The state type declared by the transition table.
    type State: State;

    /// Arguments handed unchanged to every hook of one transition.
    type Args;

    /// Error raised by hooks. Propagated without conversion.
    type Error: std::error::Error + 'static;

    /// Value produced by the aborted-hooks and the error manager.
    type Recovery;

    /// The live state value.
    fn current_state(&self) -> Self::State;

    /// Replace the live state value.
    fn set_state(&mut self, state: Self::State);

    /// Called on every transition after the state-specific before-hook
    /// succeeded, right before the state is written.
    fn on_before_change_state(
        &mut self,
        _previous: &Self::State,
        _next: &Self::State,
        _args: &Self::Args,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called on every transition once the state is written and the
    /// state-specific on-enter hook ran.
    fn on_change_state(
        &mut self,
        _previous: &Self::State,
        _next: &Self::State,
        _args: &Self::Args,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Handles a before-hook error under [`ErrorPolicy::Manage`](super::ErrorPolicy::Manage).
    fn on_manage_error(
        &mut self,
        _next: &Self::State,
        _error: Self::Error,
        _args: &Self::Args,
    ) -> Option<Self::Recovery> {
        None
    }
}
