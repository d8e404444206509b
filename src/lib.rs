//! Statecraft: a declarative finite state machine engine
//!
//! Machines are declared as data: states, plus named transition definitions
//! between sets of states. After every change the machine recomputes which
//! transitions are available from the current state, so callers can always
//! ask what may happen next before anything happens.
//!
//! # Core Concepts
//!
//! - **State**: a record addressed by a [`StateId`] handle, with bookkeeping
//!   (entry count, order, valid and changed flags) and optional hooks
//! - **Transition definition**: named template from a set of states to a set
//!   of states, with guards, an optional action and a selection strategy
//! - **Guards**: predicates that may veto a candidate; only `false` rejects
//! - **Selection and filters**: pure strategies picking among candidates
//! - **Events**: subscribers see every recomputed candidate set and every
//!   executed transition
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use statecraft::{FsmBuilder, Guard, State, TransitionDefinition};
//!
//! let mut builder = FsmBuilder::new();
//! let solid = builder.state(State::new("solid").order(1));
//! let liquid = builder.state(State::new("liquid").order(2));
//! builder.transition(
//!     TransitionDefinition::new("melt", solid, liquid)
//!         .guard(Guard::new(|fsm, _, _, _| fsm.data()["temperature"].as_i64() > Some(0))),
//! );
//! builder.transition(TransitionDefinition::new("freeze", liquid, solid));
//! builder.start(solid).data(json!({ "temperature": -5 }));
//!
//! let mut fsm = builder.build().unwrap();
//! assert!(!fsm.can_transition_to(liquid));
//!
//! fsm.change_data(json!({ "temperature": 20 }));
//! fsm.transition_to(liquid, None).unwrap();
//! assert_eq!(fsm.current().name(), "liquid");
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod events;
pub mod machine;
pub mod strategy;

// Re-export commonly used types
pub use builder::{BuildError, FsmBuilder, TransitionBuilder};
pub use config::{ConfigError, FsmConfig};
pub use core::{Guard, HookError, HookResult, State, StateId, StateSpec, TransitionHistory};
pub use events::{Publisher, SubscriptionId};
pub use machine::{
    Fsm, FsmError, MachineId, RejectReason, Transition, TransitionDefinition, TransitionId,
    TransitionNotPossible,
};
pub use strategy::{Filter, Selection};
