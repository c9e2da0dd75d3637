//! State machine that validates transitions and runs their hooks.

use crate::builder::StateMachineBuilder;
use crate::core::{State, TransitionTable};
use crate::engine::entity::Stateful;
use crate::engine::error::{HookFailure, InvalidTransition, TransitionError};
use crate::engine::hooks::Hooks;
use crate::engine::outcome::{ErrorPolicy, Outcome};
use std::sync::Arc;

/// Result of [`StateMachine::change_state`].
pub type ChangeResult<E> = Result<
    Outcome<<E as Stateful>::State, <E as Stateful>::Recovery>,
    TransitionError<<E as Stateful>::State, <E as Stateful>::Error>,
>;

/// Governs the state of any [`Stateful`] entity.
///
/// The machine holds no state of its own: each call is a function of the
/// entity's current state, the transition table and the registered hooks.
/// Concurrent calls against one entity must be serialized by the caller.
pub struct StateMachine<E: Stateful> {
    table: Arc<TransitionTable<E::State>>,
    hooks: Hooks<E>,
}

impl<E: Stateful> StateMachine<E> {
    /// Create a machine without per-state hooks.
    pub fn new(table: impl Into<Arc<TransitionTable<E::State>>>) -> Self {
        Self::from_parts(table.into(), Hooks::new())
    }

    pub fn builder() -> StateMachineBuilder<E> {
        StateMachineBuilder::new()
    }

    pub(crate) fn from_parts(table: Arc<TransitionTable<E::State>>, hooks: Hooks<E>) -> Self {
        Self { table, hooks }
    }

    pub fn table(&self) -> &TransitionTable<E::State> {
        &self.table
    }

    /// States the entity may move to from where it is now.
    pub fn valid_transitions(&self, entity: &E) -> Vec<&E::State> {
        self.table.targets(&entity.current_state())
    }

    pub fn can_change(&self, entity: &E, next: &E::State) -> bool {
        self.valid_transitions(entity).contains(&next)
    }

    /// Move `entity` to `next`.
    ///
    /// In order: validate against the table, run the before-hook registered
    /// for `next`, [`Stateful::on_before_change_state`], write the state, run
    /// the on-enter hook for `next`, then [`Stateful::on_change_state`].
    ///
    /// An invalid transition is always an error and leaves the entity
    /// untouched. Under [`ErrorPolicy::Manage`] an aborting before-hook is
    /// answered by the aborted-hook for `next` and a failing one by
    /// [`Stateful::on_manage_error`]; both leave the state unchanged and skip
    /// every later step. Errors from the generic hooks and the on-enter hook
    /// are returned under either policy; once the state is written they do
    /// not roll it back.
    pub fn change_state(
        &self,
        entity: &mut E,
        next: E::State,
        policy: ErrorPolicy,
        args: &E::Args,
    ) -> ChangeResult<E> {
        let previous = entity.current_state();

        if !self.table.targets(&previous).contains(&&next) {
            let error = InvalidTransition {
                from: previous,
                to: next,
            };
            tracing::info!(from = error.from.name(), to = error.to.name(), "{}", error);
            return Err(error.into());
        }

        if let Some(before) = self.hooks.before(&next) {
            match before(entity, args) {
                Ok(()) => {}
                Err(HookFailure::Abort(signal)) => {
                    tracing::warn!(
                        from = previous.name(),
                        to = next.name(),
                        reason = %signal,
                        ?policy,
                        "Transition to {} was not completed",
                        next.name()
                    );
                    return match policy {
                        ErrorPolicy::Manage => Ok(Outcome::Aborted(
                            self.hooks.aborted(&next).map(|aborted| aborted(entity, args)),
                        )),
                        ErrorPolicy::Propagate => {
                            Err(TransitionError::Aborted { to: next, signal })
                        }
                    };
                }
                Err(HookFailure::Error(error)) => {
                    tracing::error!(
                        from = previous.name(),
                        to = next.name(),
                        %error,
                        ?policy,
                        "Before hook failed"
                    );
                    return match policy {
                        ErrorPolicy::Manage => {
                            Ok(Outcome::Failed(entity.on_manage_error(&next, error, args)))
                        }
                        ErrorPolicy::Propagate => Err(TransitionError::Hook(error)),
                    };
                }
            }
        }

        entity
            .on_before_change_state(&previous, &next, args)
            .map_err(TransitionError::Hook)?;

        entity.set_state(next.clone());

        if let Some(on_enter) = self.hooks.on_enter(&next) {
            on_enter(entity, args).map_err(TransitionError::Hook)?;
        }

        entity
            .on_change_state(&previous, &next, args)
            .map_err(TransitionError::Hook)?;

        tracing::debug!(from = previous.name(), to = next.name(), "Transition completed");
        Ok(Outcome::Completed(next))
    }

    /// Bind the machine to one entity.
    pub fn attach<'m, 'e>(&'m self, entity: &'e mut E) -> Attached<'m, 'e, E> {
        Attached {
            machine: self,
            entity,
        }
    }
}

/// A machine bound to one entity.
///
/// # Example
///
/// ```rust
/// use turnstile::core::TransitionTable;
/// use turnstile::engine::{ErrorPolicy, Outcome, StateMachine, Stateful};
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("never")]
/// struct Never;
///
/// struct Light {
///     state: String,
/// }
///
/// impl Stateful for Light {
///     type State = String;
///     type Args = ();
///     type Error = Never;
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
///     .allow("off".to_string(), ["on".to_string()])
///     .allow("on".to_string(), ["off".to_string()])
///     .build()
///     .unwrap();
/// let machine = StateMachine::new(table);
///
/// let mut light = Light { state: "off".to_string() };
/// let mut attached = machine.attach(&mut light);
///
/// assert!(attached.can_change(&"on".to_string()));
/// assert!(!attached.can_change(&"off".to_string()));
///
/// let outcome = attached
///     .change_state("on".to_string(), ErrorPolicy::Propagate, &())
///     .unwrap();
/// assert_eq!(outcome, Outcome::Completed("on".to_string()));
/// assert_eq!(light.state, "on");
/// ```
pub struct Attached<'m, 'e, E: Stateful> {
    machine: &'m StateMachine<E>,
    entity: &'e mut E,
}

impl<'m, 'e, E: Stateful> Attached<'m, 'e, E> {
    pub fn current_state(&self) -> E::State {
        self.entity.current_state()
    }

    pub fn valid_transitions(&self) -> Vec<&'m E::State> {
        let machine: &'m StateMachine<E> = self.machine;
        machine.valid_transitions(&*self.entity)
    }

    pub fn can_change(&self, next: &E::State) -> bool {
        self.machine.can_change(&*self.entity, next)
    }

    pub fn change_state(
        &mut self,
        next: E::State,
        policy: ErrorPolicy,
        args: &E::Args,
    ) -> ChangeResult<E> {
        self.machine.change_state(self.entity, next, policy, args)
    }

    pub fn entity(&self) -> &E {
        &*self.entity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::error::AbortTransition;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum Phase {
        Draft,
        Review,
        Published,
    }

    impl State for Phase {
        fn name(&self) -> &str {
            match self {
                Self::Draft => "draft",
                Self::Review => "review",
                Self::Published => "published",
            }
        }
    }

    #[derive(Debug, PartialEq, thiserror::Error)]
    enum DocError {
        #[error("reviewer missing")]
        NoReviewer,
        #[error("index offline")]
        IndexOffline,
    }

    #[derive(Default)]
    struct Document {
        phase: Option<Phase>,
        calls: Vec<String>,
        fail_pre_hook: bool,
        fail_post_hook: bool,
    }

    impl Stateful for Document {
        type State = Phase;
        type Args = String;
        type Error = DocError;
        type Recovery = String;

        fn current_state(&self) -> Phase {
            self.phase.clone().unwrap_or(Phase::Draft)
        }

        fn set_state(&mut self, state: Phase) {
            self.calls.push(format!("set {}", state.name()));
            self.phase = Some(state);
        }

        fn on_before_change_state(
            &mut self,
            previous: &Phase,
            next: &Phase,
            args: &String,
        ) -> Result<(), DocError> {
            self.calls
                .push(format!("pre {}->{} {}", previous.name(), next.name(), args));
            if self.fail_pre_hook {
                return Err(DocError::IndexOffline);
            }
            Ok(())
        }

        fn on_change_state(
            &mut self,
            previous: &Phase,
            next: &Phase,
            _args: &String,
        ) -> Result<(), DocError> {
            self.calls
                .push(format!("post {}->{}", previous.name(), next.name()));
            if self.fail_post_hook {
                return Err(DocError::NoReviewer);
            }
            Ok(())
        }

        fn on_manage_error(
            &mut self,
            next: &Phase,
            error: DocError,
            _args: &String,
        ) -> Option<String> {
            Some(format!("managed {} for {}", error, next.name()))
        }
    }

    fn table() -> TransitionTable<Phase> {
        TransitionTable::builder()
            .allow(Phase::Draft, [Phase::Review])
            .allow(Phase::Review, [Phase::Draft, Phase::Published])
            .terminal(Phase::Published)
            .build()
            .unwrap()
    }

    fn machine() -> StateMachine<Document> {
        StateMachine::builder()
            .table(table())
            .before(Phase::Review, |doc: &mut Document, args: &String| {
                doc.calls.push(format!("before review {}", args));
                Ok(())
            })
            .on_enter(Phase::Review, |doc: &mut Document, _: &String| {
                doc.calls.push("enter review".to_string());
                Ok(())
            })
            .before(Phase::Published, |_: &mut Document, args: &String| {
                match args.as_str() {
                    "abort" => Err(AbortTransition::with_reason("not approved").into()),
                    "fail" => Err(HookFailure::Error(DocError::NoReviewer)),
                    _ => Ok(()),
                }
            })
            .on_aborted(Phase::Published, |doc: &mut Document, _: &String| {
                doc.calls.push("aborted published".to_string());
                "kept in review".to_string()
            })
            .build()
            .unwrap()
    }

    fn in_review() -> Document {
        Document {
            phase: Some(Phase::Review),
            ..Document::default()
        }
    }

    #[test]
    fn successful_change_runs_hooks_in_order() {
        let machine = machine();
        let mut doc = Document::default();

        let outcome = machine
            .change_state(&mut doc, Phase::Review, ErrorPolicy::Propagate, &"x".to_string())
            .unwrap();

        assert_eq!(outcome, Outcome::Completed(Phase::Review));
        assert_eq!(doc.current_state(), Phase::Review);
        assert_eq!(
            doc.calls,
            vec![
                "before review x",
                "pre draft->review x",
                "set review",
                "enter review",
                "post draft->review",
            ]
        );
    }

    #[test]
    fn change_without_state_hooks_runs_generic_hooks() {
        let machine = machine();
        let mut doc = in_review();

        machine
            .change_state(&mut doc, Phase::Draft, ErrorPolicy::Propagate, &"y".to_string())
            .unwrap();

        assert_eq!(
            doc.calls,
            vec!["pre review->draft y", "set draft", "post review->draft"]
        );
    }

    #[test]
    fn invalid_transition_is_rejected_under_both_policies() {
        let machine = machine();

        for policy in [ErrorPolicy::Propagate, ErrorPolicy::Manage] {
            let mut doc = Document::default();
            let result = machine.change_state(&mut doc, Phase::Published, policy, &String::new());

            match result {
                Err(TransitionError::Invalid(error)) => {
                    assert_eq!(error.from, Phase::Draft);
                    assert_eq!(error.to, Phase::Published);
                }
                other => panic!("Expected invalid transition, got {:?}", other.map(|_| ())),
            }
            assert_eq!(doc.current_state(), Phase::Draft);
            assert!(doc.calls.is_empty());
        }
    }

    #[test]
    fn abort_propagates_without_managed_policy() {
        let machine = machine();
        let mut doc = in_review();

        let result = machine.change_state(
            &mut doc,
            Phase::Published,
            ErrorPolicy::Propagate,
            &"abort".to_string(),
        );

        match result {
            Err(TransitionError::Aborted { to, signal }) => {
                assert_eq!(to, Phase::Published);
                assert_eq!(signal.reason.as_deref(), Some("not approved"));
            }
            other => panic!("Expected abort, got {:?}", other.map(|_| ())),
        }
        assert_eq!(doc.current_state(), Phase::Review);
        assert!(doc.calls.is_empty());
    }

    #[test]
    fn abort_runs_aborted_hook_with_managed_policy() {
        let machine = machine();
        let mut doc = in_review();

        let outcome = machine
            .change_state(
                &mut doc,
                Phase::Published,
                ErrorPolicy::Manage,
                &"abort".to_string(),
            )
            .unwrap();

        assert_eq!(outcome, Outcome::Aborted(Some("kept in review".to_string())));
        assert_eq!(doc.current_state(), Phase::Review);
        assert_eq!(doc.calls, vec!["aborted published"]);
    }

    #[test]
    fn abort_without_aborted_hook_returns_nothing() {
        let machine: StateMachine<Document> = StateMachine::builder()
            .table(table())
            .before(Phase::Review, |_: &mut Document, _: &String| {
                Err(AbortTransition::new().into())
            })
            .build()
            .unwrap();
        let mut doc = Document::default();

        let outcome = machine
            .change_state(&mut doc, Phase::Review, ErrorPolicy::Manage, &String::new())
            .unwrap();

        assert_eq!(outcome, Outcome::Aborted(None));
        assert_eq!(doc.current_state(), Phase::Draft);
    }

    #[test]
    fn hook_error_propagates_unchanged() {
        let machine = machine();
        let mut doc = in_review();

        let result = machine.change_state(
            &mut doc,
            Phase::Published,
            ErrorPolicy::Propagate,
            &"fail".to_string(),
        );

        let error = result.map(|_| ()).unwrap_err();
        assert_eq!(error.into_hook_error(), Some(DocError::NoReviewer));
        assert_eq!(doc.current_state(), Phase::Review);
    }

    #[test]
    fn hook_error_is_managed_with_managed_policy() {
        let machine = machine();
        let mut doc = in_review();

        let outcome = machine
            .change_state(
                &mut doc,
                Phase::Published,
                ErrorPolicy::Manage,
                &"fail".to_string(),
            )
            .unwrap();

        assert_eq!(
            outcome,
            Outcome::Failed(Some("managed reviewer missing for published".to_string()))
        );
        assert_eq!(doc.current_state(), Phase::Review);
        assert!(doc.calls.is_empty());
    }

    #[test]
    fn generic_pre_hook_errors_are_never_managed() {
        let machine = machine();
        let mut doc = Document {
            fail_pre_hook: true,
            ..Document::default()
        };

        let result =
            machine.change_state(&mut doc, Phase::Review, ErrorPolicy::Manage, &"z".to_string());

        let error = result.map(|_| ()).unwrap_err();
        assert_eq!(error.into_hook_error(), Some(DocError::IndexOffline));
        assert_eq!(doc.current_state(), Phase::Draft);
    }

    #[test]
    fn on_enter_error_leaves_state_written() {
        let machine: StateMachine<Document> = StateMachine::builder()
            .table(table())
            .on_enter(Phase::Review, |_: &mut Document, _: &String| {
                Err(DocError::IndexOffline)
            })
            .build()
            .unwrap();
        let mut doc = Document::default();

        let result =
            machine.change_state(&mut doc, Phase::Review, ErrorPolicy::Manage, &String::new());

        assert!(matches!(result, Err(TransitionError::Hook(DocError::IndexOffline))));
        assert_eq!(doc.current_state(), Phase::Review);
        assert!(!doc.calls.iter().any(|call| call.starts_with("post")));
    }

    #[test]
    fn post_hook_error_leaves_state_written() {
        let machine: StateMachine<Document> = StateMachine::new(table());
        let mut doc = Document {
            fail_post_hook: true,
            ..Document::default()
        };

        let result =
            machine.change_state(&mut doc, Phase::Review, ErrorPolicy::Manage, &String::new());

        assert!(matches!(result, Err(TransitionError::Hook(DocError::NoReviewer))));
        assert_eq!(doc.current_state(), Phase::Review);
        assert_eq!(doc.calls.last().map(String::as_str), Some("post draft->review"));
    }

    #[test]
    fn terminal_state_rejects_everything() {
        let machine = machine();
        let doc = Document {
            phase: Some(Phase::Published),
            ..Document::default()
        };

        assert!(machine.valid_transitions(&doc).is_empty());
        for next in [Phase::Draft, Phase::Review, Phase::Published] {
            assert!(!machine.can_change(&doc, &next));
        }
    }

    #[test]
    fn machines_share_one_table() {
        let table = Arc::new(table());
        let first: StateMachine<Document> = StateMachine::new(Arc::clone(&table));
        let second: StateMachine<Document> = StateMachine::new(Arc::clone(&table));

        assert_eq!(Arc::strong_count(&table), 3);
        assert_eq!(first.table(), second.table());
    }

    #[test]
    fn attached_machine_drives_its_entity() {
        let machine = machine();
        let mut doc = Document::default();
        let mut seen = Vec::new();

        {
            let mut attached = machine.attach(&mut doc);
            seen.extend(attached.valid_transitions().into_iter().cloned());
            attached
                .change_state(Phase::Review, ErrorPolicy::Propagate, &String::new())
                .unwrap();
            assert_eq!(attached.current_state(), Phase::Review);
            assert!(attached.can_change(&Phase::Published));
            assert_eq!(attached.entity().calls.len(), 5);
        }

        assert_eq!(seen, vec![Phase::Review]);
        assert_eq!(doc.current_state(), Phase::Review);
    }
}
