//! Core data model of the state machine.
//!
//! This module contains the building blocks the runtime works with:
//! - State records addressed by handles
//! - Guard predicates and their evaluation
//! - Resolution of `from`/`to` specifications
//! - Immutable history of executed transitions

mod guard;
mod history;
mod resolve;
mod state;

pub use guard::{check_guards, FailedGuard, Guard, GuardFn};
pub use history::{TransitionHistory, TransitionRecord};
pub use resolve::{IntoStates, ResolveFn, StateSpec};
pub use state::{HookError, HookResult, State, StateHook, StateId};
