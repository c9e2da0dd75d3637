//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::core::{State, TransitionTable};
use crate::engine::{HookFailure, Hooks, StateMachine, Stateful};
use std::sync::Arc;

/// Builder for constructing state machines with a fluent API.
///
/// # Example
///
/// ```
/// use turnstile::builder::{BuildError, StateMachineBuilder};
/// use turnstile::core::TransitionTable;
/// use turnstile::engine::{AbortTransition, Stateful};
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("ticket error")]
/// struct TicketError;
///
/// struct Ticket {
///     state: String,
///     assignee: Option<String>,
/// }
///
/// impl Stateful for Ticket {
///     type State = String;
///     type Args = ();
///     type Error = TicketError;
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
///
/// let table = TransitionTable::builder()
///     .allow("open".to_string(), ["assigned".to_string()])
///     .terminal("assigned".to_string())
///     .build()
///     .unwrap();
///
/// let machine = StateMachineBuilder::<Ticket>::new()
///     .table(table)
///     .before("assigned".to_string(), |ticket, _| {
///         if ticket.assignee.is_none() {
///             return Err(AbortTransition::with_reason("nobody to assign").into());
///         }
///         Ok(())
///     })
///     .build();
/// assert!(machine.is_ok());
///
/// let missing = StateMachineBuilder::<Ticket>::new().build();
/// assert!(matches!(missing, Err(BuildError::MissingTable)));
/// ```
pub struct StateMachineBuilder<E: Stateful> {
    table: Option<Arc<TransitionTable<E::State>>>,
    hooks: Hooks<E>,
}

impl<E: Stateful> StateMachineBuilder<E> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            table: None,
            hooks: Hooks::new(),
        }
    }

    /// Set the transition table (required).
    pub fn table(self, table: TransitionTable<E::State>) -> Self {
        self.shared_table(Arc::new(table))
    }

    /// Set a transition table shared with other machines.
    pub fn shared_table(mut self, table: Arc<TransitionTable<E::State>>) -> Self {
        self.table = Some(table);
        self
    }

    /// Run `hook` before every transition into `state`.
    pub fn before<F>(mut self, state: E::State, hook: F) -> Self
    where
        F: Fn(&mut E, &E::Args) -> Result<(), HookFailure<E::Error>> + Send + Sync + 'static,
    {
        self.hooks.set_before(state, hook);
        self
    }

    /// Run `hook` right after the entity entered `state`.
    pub fn on_enter<F>(mut self, state: E::State, hook: F) -> Self
    where
        F: Fn(&mut E, &E::Args) -> Result<(), E::Error> + Send + Sync + 'static,
    {
        self.hooks.set_on_enter(state, hook);
        self
    }

    /// Run `hook` when a managed transition into `state` was aborted.
    pub fn on_aborted<F>(mut self, state: E::State, hook: F) -> Self
    where
        F: Fn(&mut E, &E::Args) -> E::Recovery + Send + Sync + 'static,
    {
        self.hooks.set_aborted(state, hook);
        self
    }

    /// Build the state machine.
    /// Returns an error if the table is missing or a hook targets an undeclared state.
    pub fn build(self) -> Result<StateMachine<E>, BuildError> {
        let table = self.table.ok_or(BuildError::MissingTable)?;

        if let Some(unknown) = self.hooks.states().find(|state| !table.contains(state)) {
            return Err(BuildError::UnknownHookState {
                state: unknown.name().to_string(),
            });
        }

        Ok(StateMachine::from_parts(table, self.hooks))
    }
}

impl<E: Stateful> Default for StateMachineBuilder<E> {
    fn default() -> Self {
        Self::new()
    }
}
