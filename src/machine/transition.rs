//! Transition candidates.

use super::definition::TransitionId;
use crate::core::{FailedGuard, StateId};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

/// Identity of a machine instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MachineId(Uuid);

impl MachineId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for MachineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A concrete proposal to move from the current state to one target state
/// under one definition.
///
/// Candidates are recomputed after every change to the machine; a candidate
/// taken from an older set is rejected once the machine has moved on.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub machine: MachineId,
    pub from: StateId,
    pub to: StateId,
    pub definition: TransitionId,
    pub failing_guards: Vec<FailedGuard>,
    pub is_possible: bool,
    pub data: Option<Value>,
}

impl Transition {
    pub(crate) fn candidate(
        machine: MachineId,
        from: StateId,
        to: StateId,
        definition: TransitionId,
        failing_guards: Vec<FailedGuard>,
    ) -> Self {
        Self {
            machine,
            from,
            to,
            definition,
            is_possible: failing_guards.is_empty(),
            failing_guards,
            data: None,
        }
    }
}
