//! The state machine runtime: definitions, candidate transitions, execution.

mod definition;
mod error;
mod fsm;
mod transition;

pub use definition::{Action, TransitionDefinition, TransitionId};
pub use error::{FsmError, HookKind, RejectReason, TransitionNotPossible};
pub use fsm::Fsm;
pub use transition::{MachineId, Transition};
