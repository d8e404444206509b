//! Errors from the state machine runtime.

use super::transition::{MachineId, Transition};
use crate::core::{FailedGuard, HookError, StateId};
use std::fmt;
use thiserror::Error;

/// Why a transition was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The candidate does not start from the live current state.
    NotCurrentState,
    /// At least one guard rejected the transition at execution time.
    GuardsFailed,
    /// No current candidate targets the requested state.
    NoCandidateForTarget,
    /// The definition contributes no candidate from the current state.
    DefinitionUnavailable,
    /// The definition yields several candidates and no target was given.
    AmbiguousTarget,
    /// The given target is not among the definition's candidates.
    TargetNotReachable,
    /// The filter left no candidate.
    FilterEmpty,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RejectReason::NotCurrentState => "transition is not available for the current state",
            RejectReason::GuardsFailed => "transition not allowed by guards",
            RejectReason::NoCandidateForTarget => "transition is not available to this state",
            RejectReason::DefinitionUnavailable => {
                "transition definition not available for the current state"
            }
            RejectReason::AmbiguousTarget => {
                "multiple target states found and no target state specified"
            }
            RejectReason::TargetNotReachable => {
                "the specified target state can not be reached with this transition"
            }
            RejectReason::FilterEmpty => "transition filter has no transitions for current state",
        };
        f.write_str(text)
    }
}

/// Diagnostics attached to a refused transition.
#[derive(Debug, Clone, Error)]
#[error("transition not possible: {reason}")]
pub struct TransitionNotPossible {
    pub reason: RejectReason,
    /// Machine that refused the transition.
    pub machine: MachineId,
    pub failing_guards: Vec<FailedGuard>,
    /// Possible candidates at the time of failure, where relevant.
    pub possible: Vec<Transition>,
    /// Impossible candidates at the time of failure, where relevant.
    pub impossible: Vec<Transition>,
}

impl TransitionNotPossible {
    pub(crate) fn new(reason: RejectReason, machine: MachineId) -> Self {
        Self {
            reason,
            machine,
            failing_guards: Vec::new(),
            possible: Vec::new(),
            impossible: Vec::new(),
        }
    }

    pub(crate) fn with_failing_guards(mut self, failing_guards: Vec<FailedGuard>) -> Self {
        self.failing_guards = failing_guards;
        self
    }

    pub(crate) fn with_candidates(
        mut self,
        possible: Vec<Transition>,
        impossible: Vec<Transition>,
    ) -> Self {
        self.possible = possible;
        self.impossible = impossible;
        self
    }
}

/// Which lifecycle hook failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    Enter,
    Exit,
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookKind::Enter => f.write_str("enter"),
            HookKind::Exit => f.write_str("exit"),
        }
    }
}

/// Errors from the state machine runtime.
#[derive(Debug, Error)]
pub enum FsmError {
    #[error("transition definition '{name}' does not exist")]
    DefinitionNotFound { name: String },

    #[error(transparent)]
    NotPossible(#[from] TransitionNotPossible),

    #[error("state {id} is not registered with this machine")]
    UnknownState { id: StateId },

    #[error("{hook} hook of state '{state}' failed: {source}")]
    HookFailed {
        hook: HookKind,
        state: String,
        source: HookError,
    },

    #[error("action of transition '{definition}' failed: {source}")]
    ActionFailed { definition: String, source: HookError },
}

impl FsmError {
    /// The rejection diagnostics, if this is a transition-not-possible error.
    pub fn rejection(&self) -> Option<&TransitionNotPossible> {
        match self {
            FsmError::NotPossible(rejection) => Some(rejection),
            _ => None,
        }
    }

    pub fn is_not_possible(&self) -> bool {
        matches!(self, FsmError::NotPossible(_))
    }

    /// Returns an error code suitable for presenting to users.
    pub fn error_code(&self) -> &'static str {
        match self {
            FsmError::DefinitionNotFound { .. } => "DEFINITION_NOT_FOUND",
            FsmError::NotPossible(_) => "TRANSITION_NOT_POSSIBLE",
            FsmError::UnknownState { .. } => "UNKNOWN_STATE",
            FsmError::HookFailed { .. } => "HOOK_FAILED",
            FsmError::ActionFailed { .. } => "ACTION_FAILED",
        }
    }
}
