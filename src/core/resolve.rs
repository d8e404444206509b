//! Resolution of `from`/`to` specifications into concrete states.

use super::state::StateId;
use crate::machine::Fsm;
use std::fmt;
use std::sync::Arc;

/// Resolver closure evaluated against the machine each time candidates are computed.
pub type ResolveFn = dyn Fn(&Fsm) -> Vec<StateId> + Send + Sync;

/// Conversion of a resolver result into a state list.
///
/// Lets resolver closures return a single state or several without the
/// caller having to wrap anything.
pub trait IntoStates {
    fn into_states(self) -> Vec<StateId>;
}

impl IntoStates for StateId {
    fn into_states(self) -> Vec<StateId> {
        vec![self]
    }
}

impl IntoStates for Vec<StateId> {
    fn into_states(self) -> Vec<StateId> {
        self
    }
}

impl IntoStates for Option<StateId> {
    fn into_states(self) -> Vec<StateId> {
        self.into_iter().collect()
    }
}

impl<const N: usize> IntoStates for [StateId; N] {
    fn into_states(self) -> Vec<StateId> {
        self.to_vec()
    }
}

/// Source or target specification of a transition definition.
///
/// # Example
///
/// ```rust
/// use statecraft::{FsmBuilder, State, StateSpec};
///
/// let mut builder = FsmBuilder::new();
/// let draft = builder.state(State::new("draft"));
/// let review = builder.state(State::new("review"));
/// builder.start(draft);
/// let fsm = builder.build().unwrap();
///
/// assert_eq!(StateSpec::from(review).resolve(&fsm), vec![review]);
/// assert_eq!(StateSpec::from(vec![draft, review]).resolve(&fsm), vec![draft, review]);
///
/// let current = StateSpec::resolver(|fsm| fsm.current_state());
/// assert_eq!(current.resolve(&fsm), vec![draft]);
/// ```
#[derive(Clone)]
pub enum StateSpec {
    One(StateId),
    Many(Vec<StateId>),
    Resolver(Arc<ResolveFn>),
}

impl StateSpec {
    /// Build a state set from a closure over the machine.
    pub fn resolver<F, R>(resolve: F) -> Self
    where
        F: Fn(&Fsm) -> R + Send + Sync + 'static,
        R: IntoStates,
    {
        StateSpec::Resolver(Arc::new(move |fsm: &Fsm| resolve(fsm).into_states()))
    }

    /// Turn the state set into the list of states it designates.
    pub fn resolve(&self, fsm: &Fsm) -> Vec<StateId> {
        match self {
            StateSpec::One(id) => vec![*id],
            StateSpec::Many(ids) => ids.clone(),
            StateSpec::Resolver(resolve) => resolve(fsm),
        }
    }

    /// States named directly by the state set; resolvers name none up front.
    pub fn static_states(&self) -> &[StateId] {
        match self {
            StateSpec::One(id) => std::slice::from_ref(id),
            StateSpec::Many(ids) => ids,
            StateSpec::Resolver(_) => &[],
        }
    }
}

impl From<StateId> for StateSpec {
    fn from(id: StateId) -> Self {
        StateSpec::One(id)
    }
}

impl From<Vec<StateId>> for StateSpec {
    fn from(ids: Vec<StateId>) -> Self {
        StateSpec::Many(ids)
    }
}

impl From<&[StateId]> for StateSpec {
    fn from(ids: &[StateId]) -> Self {
        StateSpec::Many(ids.to_vec())
    }
}

impl<const N: usize> From<[StateId; N]> for StateSpec {
    fn from(ids: [StateId; N]) -> Self {
        StateSpec::Many(ids.to_vec())
    }
}

impl fmt::Debug for StateSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateSpec::One(id) => f.debug_tuple("One").field(id).finish(),
            StateSpec::Many(ids) => f.debug_tuple("Many").field(ids).finish(),
            StateSpec::Resolver(_) => f.write_str("Resolver(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::FsmBuilder;
    use crate::core::State;

    fn machine() -> (Fsm, StateId, StateId, StateId) {
        let mut builder = FsmBuilder::new();
        let a = builder.state(State::new("a"));
        let b = builder.state(State::new("b"));
        let c = builder.state(State::new("c"));
        builder.start(b);
        (builder.build().unwrap(), a, b, c)
    }

    #[test]
    fn single_state_is_wrapped() {
        let (fsm, a, _, _) = machine();
        assert_eq!(StateSpec::from(a).resolve(&fsm), vec![a]);
    }

    #[test]
    fn list_is_returned_unchanged() {
        let (fsm, a, b, c) = machine();
        assert_eq!(StateSpec::from([c, a, b]).resolve(&fsm), vec![c, a, b]);
        assert!(StateSpec::from(Vec::new()).resolve(&fsm).is_empty());
    }

    #[test]
    fn resolver_results_are_normalised() {
        let (fsm, a, b, c) = machine();

        let single = StateSpec::resolver(move |_| a);
        let many = StateSpec::resolver(move |_| vec![b, c]);
        let none = StateSpec::resolver(|_| None::<StateId>);

        assert_eq!(single.resolve(&fsm), vec![a]);
        assert_eq!(many.resolve(&fsm), vec![b, c]);
        assert!(none.resolve(&fsm).is_empty());
    }

    #[test]
    fn resolver_sees_current_state() {
        let (fsm, _, b, _) = machine();
        let current = StateSpec::resolver(|fsm| fsm.current_state());
        assert_eq!(current.resolve(&fsm), vec![b]);
    }

    #[test]
    fn static_states_skip_resolvers() {
        let (_, a, b, _) = machine();
        assert_eq!(StateSpec::from(a).static_states(), &[a]);
        assert_eq!(StateSpec::from(vec![a, b]).static_states(), &[a, b]);
        assert!(StateSpec::resolver(move |_| a).static_states().is_empty());
    }
}
