//! Selection strategies narrowing one definition's candidates.
//!
//! A definition's `select` strategy receives every candidate the definition
//! produced from the current state, possible or not, and returns the ones
//! that make up its contribution to the machine's current transitions.

use super::compare_orders;
use crate::machine::{Fsm, Transition};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Custom selection: `(candidates, fsm) -> selected`.
pub type SelectFn = Arc<dyn Fn(&[Transition], &Fsm) -> Vec<Transition> + Send + Sync>;

/// Named selection strategies.
#[derive(Clone)]
pub enum Selection {
    AllPossible,
    FirstNextState,
    LastNextState,
    FirstPreviousState,
    AllPreviousStates,
    Custom(SelectFn),
}

impl Selection {
    pub fn custom<F>(select: F) -> Self
    where
        F: Fn(&[Transition], &Fsm) -> Vec<Transition> + Send + Sync + 'static,
    {
        Selection::Custom(Arc::new(select))
    }

    pub fn apply(&self, candidates: &[Transition], fsm: &Fsm) -> Vec<Transition> {
        match self {
            Selection::AllPossible => all_possible(candidates, fsm),
            Selection::FirstNextState => first_next_state(candidates, fsm),
            Selection::LastNextState => last_next_state(candidates, fsm),
            Selection::FirstPreviousState => first_previous_state(candidates, fsm),
            Selection::AllPreviousStates => all_previous_states(candidates, fsm),
            Selection::Custom(select) => select(candidates, fsm),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Selection::AllPossible => "all_possible",
            Selection::FirstNextState => "first_next_state",
            Selection::LastNextState => "last_next_state",
            Selection::FirstPreviousState => "first_previous_state",
            Selection::AllPreviousStates => "all_previous_states",
            Selection::Custom(_) => "custom",
        }
    }
}

impl fmt::Debug for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Every possible candidate, in order.
pub fn all_possible(candidates: &[Transition], _fsm: &Fsm) -> Vec<Transition> {
    candidates.iter().filter(|t| t.is_possible).cloned().collect()
}

/// The possible candidate with the lowest order above the current state.
pub fn first_next_state(candidates: &[Transition], fsm: &Fsm) -> Vec<Transition> {
    let mut next = ordered_relative(candidates, fsm, Ordering::Greater);
    next.truncate(1);
    next
}

/// The possible candidate with the highest order above the current state.
pub fn last_next_state(candidates: &[Transition], fsm: &Fsm) -> Vec<Transition> {
    ordered_relative(candidates, fsm, Ordering::Greater)
        .pop()
        .into_iter()
        .collect()
}

/// The possible candidate with the lowest order below the current state.
pub fn first_previous_state(candidates: &[Transition], fsm: &Fsm) -> Vec<Transition> {
    let mut previous = ordered_relative(candidates, fsm, Ordering::Less);
    previous.truncate(1);
    previous
}

/// Every possible candidate ordered below the current state, ascending.
pub fn all_previous_states(candidates: &[Transition], fsm: &Fsm) -> Vec<Transition> {
    ordered_relative(candidates, fsm, Ordering::Less)
}

/// Possible candidates whose target order compares to the current state's
/// order as `direction`, sorted ascending by target order.
///
/// Unordered states (order 0) never take part.
fn ordered_relative(candidates: &[Transition], fsm: &Fsm, direction: Ordering) -> Vec<Transition> {
    let current = fsm.order_of(fsm.current_state());
    if current == 0 {
        return Vec::new();
    }

    let mut selected: Vec<Transition> = candidates
        .iter()
        .filter(|t| {
            let target = fsm.order_of(t.to);
            t.is_possible && target != 0 && target.cmp(&current) == direction
        })
        .cloned()
        .collect();
    selected.sort_by(|l, r| compare_orders(fsm.order_of(l.to), fsm.order_of(r.to)));
    selected
}
