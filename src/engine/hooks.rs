//! Per-state hooks, looked up by target state at transition time.

use crate::engine::entity::Stateful;
use crate::engine::error::HookFailure;

/// Runs before a transition into its state. May abort or fail it.
pub type BeforeHook<E> = Box<
    dyn Fn(&mut E, &<E as Stateful>::Args) -> Result<(), HookFailure<<E as Stateful>::Error>>
        + Send
        + Sync,
>;

/// Runs once the entity has entered its state.
pub type EnterHook<E> =
    Box<dyn Fn(&mut E, &<E as Stateful>::Args) -> Result<(), <E as Stateful>::Error> + Send + Sync>;

/// Runs when a transition into its state was aborted under the managed policy.
pub type AbortedHook<E> =
    Box<dyn Fn(&mut E, &<E as Stateful>::Args) -> <E as Stateful>::Recovery + Send + Sync>;

/// Lookup tables from target state to hook. A missing hook is never an error.
pub struct Hooks<E: Stateful> {
    before: Vec<(E::State, BeforeHook<E>)>,
    enter: Vec<(E::State, EnterHook<E>)>,
    aborted: Vec<(E::State, AbortedHook<E>)>,
}

impl<E: Stateful> Hooks<E> {
    pub fn new() -> Self {
        Self {
            before: Vec::new(),
            enter: Vec::new(),
            aborted: Vec::new(),
        }
    }

    pub fn before(&self, state: &E::State) -> Option<&BeforeHook<E>> {
        find(&self.before, state)
    }

    pub fn on_enter(&self, state: &E::State) -> Option<&EnterHook<E>> {
        find(&self.enter, state)
    }

    pub fn aborted(&self, state: &E::State) -> Option<&AbortedHook<E>> {
        find(&self.aborted, state)
    }

    /// Registering a second before-hook for a state replaces the first.
    pub fn set_before<F>(&mut self, state: E::State, hook: F)
    where
        F: Fn(&mut E, &E::Args) -> Result<(), HookFailure<E::Error>> + Send + Sync + 'static,
    {
        let hook: BeforeHook<E> = Box::new(hook);
        insert(&mut self.before, state, hook);
    }

    pub fn set_on_enter<F>(&mut self, state: E::State, hook: F)
    where
        F: Fn(&mut E, &E::Args) -> Result<(), E::Error> + Send + Sync + 'static,
    {
        let hook: EnterHook<E> = Box::new(hook);
        insert(&mut self.enter, state, hook);
    }

    pub fn set_aborted<F>(&mut self, state: E::State, hook: F)
    where
        F: Fn(&mut E, &E::Args) -> E::Recovery + Send + Sync + 'static,
    {
        let hook: AbortedHook<E> = Box::new(hook);
        insert(&mut self.aborted, state, hook);
    }

    /// Every state that has at least one hook.
    pub fn states(&self) -> impl Iterator<Item = &E::State> {
        self.before
            .iter()
            .map(|(state, _)| state)
            .chain(self.enter.iter().map(|(state, _)| state))
            .chain(self.aborted.iter().map(|(state, _)| state))
    }

    pub fn is_empty(&self) -> bool {
        self.before.is_empty() && self.enter.is_empty() && self.aborted.is_empty()
    }
}

impl<E: Stateful> Default for Hooks<E> {
    fn default() -> Self {
        Self::new()
    }
}

fn find<'a, S: PartialEq, H>(slots: &'a [(S, H)], state: &S) -> Option<&'a H> {
    slots
        .iter()
        .find(|(key, _)| key == state)
        .map(|(_, hook)| hook)
}

fn insert<S: PartialEq, H>(slots: &mut Vec<(S, H)>, state: S, hook: H) {
    match slots.iter_mut().find(|(key, _)| *key == state) {
        Some(slot) => slot.1 = hook,
        None => slots.push((state, hook)),
    }
}
