//! Build errors for state machine and transition builders.

use crate::core::StateId;
use thiserror::Error;

/// Errors that can occur when building state machines and transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("Start state {id} is not registered. Add it with .state(state) first")]
    UnknownStartState { id: StateId },

    #[error("Transition definition '{name}' is defined more than once")]
    DuplicateTransition { name: String },

    #[error("Transition definition '{definition}' references unregistered state {id}")]
    UnknownStateReference { definition: String, id: StateId },

    #[error("Transition source state not specified. Call .from(states)")]
    MissingFromState,

    #[error("Transition target state not specified. Call .to(states)")]
    MissingToState,
}
