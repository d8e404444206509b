//! Guard predicates for controlling transitions.
//!
//! A guard can veto a candidate transition. Only an explicit `false`
//! rejects: a guard that has no opinion (`None`) lets the transition through.

use super::state::StateId;
use crate::machine::Fsm;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Guard predicate: `(fsm, from, to, transition data)`.
pub type GuardFn =
    dyn Fn(&Fsm, StateId, StateId, Option<&Value>) -> Option<bool> + Send + Sync;

/// Predicate that decides whether a candidate transition may execute.
///
/// # Example
///
/// ```rust
/// use statecraft::Guard;
///
/// let always = Guard::new(|_, _, _, _| true).named("always");
/// let undecided = Guard::tristate(|_, _, _, _| None);
///
/// assert_eq!(always.name(), Some("always"));
/// assert!(undecided.name().is_none());
/// ```
#[derive(Clone)]
pub struct Guard {
    name: Option<String>,
    predicate: Arc<GuardFn>,
}

impl Guard {
    /// Create a guard from a boolean predicate.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&Fsm, StateId, StateId, Option<&Value>) -> bool + Send + Sync + 'static,
    {
        Self {
            name: None,
            predicate: Arc::new(
                move |fsm: &Fsm, from: StateId, to: StateId, data: Option<&Value>| {
                    Some(predicate(fsm, from, to, data))
                },
            ),
        }
    }

    /// Create a guard that may abstain by returning `None`.
    pub fn tristate<F>(predicate: F) -> Self
    where
        F: Fn(&Fsm, StateId, StateId, Option<&Value>) -> Option<bool> + Send + Sync + 'static,
    {
        Self {
            name: None,
            predicate: Arc::new(predicate),
        }
    }

    /// Attach a name reported in [`FailedGuard`] diagnostics.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns `false` only when the predicate explicitly rejects.
    pub fn check(&self, fsm: &Fsm, from: StateId, to: StateId, data: Option<&Value>) -> bool {
        (self.predicate)(fsm, from, to, data) != Some(false)
    }
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard").field("name", &self.name).finish()
    }
}

/// A guard that rejected a candidate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailedGuard {
    /// Position of the guard in its definition's guard list.
    pub position: usize,
    pub name: Option<String>,
}

impl fmt::Display for FailedGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name}"),
            None => write!(f, "guard #{}", self.position),
        }
    }
}

/// Run every guard and collect all that reject.
///
/// Guards are evaluated in order and none is skipped, so the full failing
/// set is available for diagnostics.
pub fn check_guards(
    fsm: &Fsm,
    guards: &[Guard],
    from: StateId,
    to: StateId,
    data: Option<&Value>,
) -> Vec<FailedGuard> {
    if guards.is_empty() {
        return Vec::new();
    }

    let checks: Vec<Validation<(), NonEmptyVec<FailedGuard>>> = guards
        .iter()
        .enumerate()
        .map(|(position, guard)| {
            if guard.check(fsm, from, to, data) {
                Validation::success(())
            } else {
                Validation::fail(FailedGuard {
                    position,
                    name: guard.name.clone(),
                })
            }
        })
        .collect();

    match Validation::all_vec(checks) {
        Validation::Success(_) => Vec::new(),
        Validation::Failure(failed) => failed.iter().cloned().collect(),
    }
}
