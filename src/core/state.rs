//! Core State trait for state machine states.
//!
//! A state is an opaque, comparable identifier. No ordering is implied
//! beyond what a [`TransitionTable`](super::TransitionTable) encodes.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

/// Trait for state machine states.
///
/// # Required Traits
///
/// - `Clone`: the engine captures the previous state before mutating
/// - `PartialEq`: transition membership is decided by equality
/// - `Debug`: states must be debuggable for diagnostics
/// - `Serialize` + `DeserializeOwned`: transition tables are loadable from configuration
///
/// # Example
///
/// ```rust
/// use turnstile::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum TaskState {
///     Pending,
///     Running,
///     Done,
/// }
///
/// impl State for TaskState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Pending => "pending",
///             Self::Running => "running",
///             Self::Done => "done",
///         }
///     }
/// }
///
/// assert_eq!(TaskState::Running.name(), "running");
/// ```
pub trait State: Clone + PartialEq + Debug + Serialize + DeserializeOwned + Send + Sync {
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;
}

impl State for String {
    fn name(&self) -> &str {
        self.as_str()
    }
}
