//! Builder API for ergonomic state machine construction.
//!
//! This module provides fluent builders and macros for declaring states and
//! transition definitions.

pub mod error;
pub mod machine;
pub mod macros;
pub mod transition;

pub use error::BuildError;
pub use machine::FsmBuilder;
pub use transition::TransitionBuilder;

use crate::core::{Guard, StateSpec};
use crate::machine::TransitionDefinition;

/// Create an unconditional transition definition.
///
/// # Example
///
/// ```
/// use statecraft::builder::simple_transition;
/// use statecraft::{FsmBuilder, State};
///
/// let mut builder = FsmBuilder::new();
/// let start = builder.state(State::new("start"));
/// let end = builder.state(State::new("end"));
///
/// let definition = simple_transition("finish", start, end);
/// assert!(definition.guards().is_empty());
/// ```
pub fn simple_transition(
    name: impl Into<String>,
    from: impl Into<StateSpec>,
    to: impl Into<StateSpec>,
) -> TransitionDefinition {
    TransitionDefinition::new(name, from, to)
}

/// Create a transition definition with a single guard.
///
/// # Example
///
/// ```
/// use statecraft::builder::guarded_transition;
/// use statecraft::{FsmBuilder, Guard, State};
///
/// let mut builder = FsmBuilder::new();
/// let start = builder.state(State::new("start"));
/// let end = builder.state(State::new("end"));
///
/// let definition = guarded_transition(
///     "finish",
///     start,
///     end,
///     Guard::new(|fsm, _, _, _| fsm.data()["done"] == true),
/// );
/// assert_eq!(definition.guards().len(), 1);
/// ```
pub fn guarded_transition(
    name: impl Into<String>,
    from: impl Into<StateSpec>,
    to: impl Into<StateSpec>,
    guard: Guard,
) -> TransitionDefinition {
    TransitionDefinition::new(name, from, to).guard(guard)
}
