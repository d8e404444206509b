//! Filters over an already assembled candidate set.

use super::compare_orders;
use crate::machine::{Fsm, Transition};
use std::cmp::Ordering;

/// Named filters, usable with [`Fsm::transition_by_filter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Filter {
    PossibleTransitions,
    ImpossibleTransitions,
    MinState,
    MaxState,
}

impl Filter {
    pub const ALL: [Filter; 4] = [
        Filter::PossibleTransitions,
        Filter::ImpossibleTransitions,
        Filter::MinState,
        Filter::MaxState,
    ];

    pub fn apply(self, transitions: &[Transition], fsm: &Fsm) -> Vec<Transition> {
        match self {
            Filter::PossibleTransitions => possible_transitions(transitions, fsm),
            Filter::ImpossibleTransitions => impossible_transitions(transitions, fsm),
            Filter::MinState => min_state(transitions, fsm),
            Filter::MaxState => max_state(transitions, fsm),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Filter::PossibleTransitions => "possible_transitions",
            Filter::ImpossibleTransitions => "impossible_transitions",
            Filter::MinState => "min_state",
            Filter::MaxState => "max_state",
        }
    }
}

pub fn possible_transitions(transitions: &[Transition], _fsm: &Fsm) -> Vec<Transition> {
    transitions
        .iter()
        .filter(|t| t.failing_guards.is_empty())
        .cloned()
        .collect()
}

pub fn impossible_transitions(transitions: &[Transition], _fsm: &Fsm) -> Vec<Transition> {
    transitions
        .iter()
        .filter(|t| !t.failing_guards.is_empty())
        .cloned()
        .collect()
}

/// The candidate with the lowest target order; the earliest wins ties.
pub fn min_state(transitions: &[Transition], fsm: &Fsm) -> Vec<Transition> {
    extreme(transitions, fsm, Ordering::Less)
}

/// The candidate with the highest target order; the earliest wins ties.
pub fn max_state(transitions: &[Transition], fsm: &Fsm) -> Vec<Transition> {
    extreme(transitions, fsm, Ordering::Greater)
}

/// A later candidate replaces the current pick only when it is strictly
/// better. Unordered targets (order 0) lose to any ordered one.
fn extreme(transitions: &[Transition], fsm: &Fsm, better: Ordering) -> Vec<Transition> {
    let mut best: Option<&Transition> = None;
    for candidate in transitions {
        let replace = match best {
            None => true,
            Some(current) => {
                let candidate_order = fsm.order_of(candidate.to);
                let best_order = fsm.order_of(current.to);
                candidate_order != 0
                    && (best_order == 0 || compare_orders(candidate_order, best_order) == better)
            }
        };
        if replace {
            best = Some(candidate);
        }
    }
    best.into_iter().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::FsmBuilder;
    use crate::core::{Guard, State, StateId};
    use crate::machine::TransitionDefinition;
    use crate::strategy::Selection;

    /// From `start`, one candidate per target, in the given order.
    fn machine(orders: &[i64]) -> (Fsm, Vec<StateId>) {
        let mut builder = FsmBuilder::new();
        let start = builder.state(State::new("start").order(10));
        let targets: Vec<StateId> = orders
            .iter()
            .enumerate()
            .map(|(i, order)| builder.state(State::new(format!("t{i}")).order(*order)))
            .collect();
        builder.transition(TransitionDefinition::new("fan", start, targets.clone()));
        builder.start(start);
        (builder.build().unwrap(), targets)
    }

    #[test]
    fn partition_by_failing_guards() {
        let mut builder = FsmBuilder::new();
        let a = builder.state(State::new("a"));
        let b = builder.state(State::new("b"));
        let c = builder.state(State::new("c"));
        builder.transition(
            TransitionDefinition::new("mixed", a, [a, b, c])
                .guard(Guard::new(move |_, _, to, _| to != b))
                .select(Selection::custom(|ts, _| ts.to_vec())),
        );
        builder.start(a);
        let fsm = builder.build().unwrap();
        let all = fsm.current_transitions();

        let possible = possible_transitions(all, &fsm);
        let impossible = impossible_transitions(all, &fsm);

        assert_eq!(possible.len(), 2);
        assert_eq!(impossible.len(), 1);
        assert_eq!(impossible[0].to, b);
        assert_eq!(possible.len() + impossible.len(), all.len());
    }

    #[test]
    fn min_and_max_pick_extremes() {
        let (fsm, t) = machine(&[3, 1, 5, 2]);
        let all = fsm.current_transitions();

        assert_eq!(min_state(all, &fsm)[0].to, t[1]);
        assert_eq!(max_state(all, &fsm)[0].to, t[2]);
    }

    #[test]
    fn earliest_candidate_wins_ties() {
        let (fsm, t) = machine(&[2, 4, 2, 4]);
        let all = fsm.current_transitions();

        assert_eq!(min_state(all, &fsm)[0].to, t[0]);
        assert_eq!(max_state(all, &fsm)[0].to, t[1]);
    }

    #[test]
    fn unordered_targets_lose() {
        let (fsm, t) = machine(&[0, 7, 0, 3]);
        let all = fsm.current_transitions();

        assert_eq!(min_state(all, &fsm)[0].to, t[3]);
        assert_eq!(max_state(all, &fsm)[0].to, t[1]);

        let (fsm, t) = machine(&[0, 0]);
        let all = fsm.current_transitions();
        assert_eq!(min_state(all, &fsm)[0].to, t[0]);
        assert_eq!(max_state(all, &fsm)[0].to, t[0]);
    }

    #[test]
    fn empty_input_gives_empty_output() {
        let (fsm, _) = machine(&[]);
        assert!(min_state(&[], &fsm).is_empty());
        assert!(max_state(&[], &fsm).is_empty());
    }

    #[test]
    fn filter_enum_dispatches() {
        let (fsm, t) = machine(&[3, 1]);
        let all = fsm.current_transitions();

        assert_eq!(Filter::MinState.apply(all, &fsm)[0].to, t[1]);
        assert_eq!(Filter::MaxState.apply(all, &fsm)[0].to, t[0]);
        assert_eq!(Filter::PossibleTransitions.apply(all, &fsm).len(), 2);
        assert!(Filter::ImpossibleTransitions.apply(all, &fsm).is_empty());

        let names: Vec<&str> = Filter::ALL.iter().map(|f| f.name()).collect();
        assert_eq!(
            names,
            vec!["possible_transitions", "impossible_transitions", "min_state", "max_state"]
        );
    }
}
