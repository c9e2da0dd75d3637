//! Turnstile: a finite state machine capability for stateful entities.
//!
//! Any entity can be governed by a [`StateMachine`] once it exposes its state
//! through the [`Stateful`] trait. The machine validates each requested
//! transition against an immutable [`TransitionTable`] and runs lifecycle
//! hooks around the state write.
//!
//! # Core Concepts
//!
//! - **State**: comparable identifiers via the `State` trait
//! - **Transition table**: per state, `Any`, an explicit target set, or `Terminal`
//! - **Hooks**: per-state before/on-enter/aborted hooks plus the entity's generic hooks
//! - **Error policy**: propagate hook failures or route them to recovery hooks
//!
//! # Example
//!
//! ```rust
//! use turnstile::engine::{ErrorPolicy, Outcome, StateMachine, Stateful, TransitionError};
//! use turnstile::{state_enum, transitions};
//!
//! state_enum! {
//!     pub enum OrderState {
//!         Created = "created",
//!         WaitingForPayment = "waiting_for_payment",
//!         Canceled = "canceled",
//!     }
//! }
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("order error")]
//! struct OrderError;
//!
//! struct Order {
//!     state: OrderState,
//! }
//!
//! impl Stateful for Order {
//!     type State = OrderState;
//!     type Args = ();
//!     type Error = OrderError;
//!     type Recovery = ();
//!
//!     fn current_state(&self) -> OrderState {
//!         self.state.clone()
//!     }
//!
//!     fn set_state(&mut self, state: OrderState) {
//!         self.state = state;
//!     }
//! }
//!
//! let table = transitions! {
//!     OrderState::Created => [OrderState::WaitingForPayment, OrderState::Canceled],
//!     OrderState::WaitingForPayment => [OrderState::Canceled],
//!     OrderState::Canceled => [],
//! }
//! .unwrap();
//! let machine = StateMachine::new(table);
//!
//! let mut order = Order { state: OrderState::Created };
//! let outcome = machine
//!     .change_state(&mut order, OrderState::WaitingForPayment, ErrorPolicy::Propagate, &())
//!     .unwrap();
//! assert_eq!(outcome, Outcome::Completed(OrderState::WaitingForPayment));
//!
//! let rejected = machine.change_state(&mut order, OrderState::Created, ErrorPolicy::Manage, &());
//! assert!(matches!(rejected, Err(TransitionError::Invalid(_))));
//! assert_eq!(order.state, OrderState::WaitingForPayment);
//! ```

pub mod builder;
pub mod core;
pub mod engine;

// Re-export commonly used types
pub use builder::{BuildError, StateMachineBuilder, TransitionTableBuilder};
pub use self::core::{Reachable, State, TransitionTable};
pub use engine::{
    AbortTransition, Attached, ErrorPolicy, HookFailure, InvalidTransition, Outcome, StateMachine,
    Stateful, TransitionError,
};
