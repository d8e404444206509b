//! Transition definitions: the declarative rules of a machine.

use super::fsm::Fsm;
use super::transition::Transition;
use crate::core::{Guard, HookResult, StateId, StateSpec};
use crate::strategy::Selection;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Handle to a transition definition registered with a machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransitionId(pub(crate) usize);

impl TransitionId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TransitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Side effect run while a transition executes, before the state changes.
pub type Action = Arc<dyn Fn(&mut Fsm, &Transition) -> HookResult + Send + Sync>;

/// A named rule declaring which states may move to which.
pub struct TransitionDefinition {
    pub(crate) name: String,
    pub(crate) from: StateSpec,
    pub(crate) to: StateSpec,
    pub(crate) guards: Vec<Guard>,
    pub(crate) action: Option<Action>,
    pub(crate) select: Option<Selection>,
    pub(crate) order: i64,
    pub(crate) valid: bool,
    pub(crate) data: Option<Value>,
}

impl TransitionDefinition {
    pub fn new(name: impl Into<String>, from: impl Into<StateSpec>, to: impl Into<StateSpec>) -> Self {
        Self {
            name: name.into(),
            from: from.into(),
            to: to.into(),
            guards: Vec::new(),
            action: None,
            select: None,
            order: 0,
            valid: false,
            data: None,
        }
    }

    /// Append a guard. Guards run in the order they were added.
    pub fn guard(mut self, guard: Guard) -> Self {
        self.guards.push(guard);
        self
    }

    pub fn action<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut Fsm, &Transition) -> HookResult + Send + Sync + 'static,
    {
        self.action = Some(Arc::new(action));
        self
    }

    /// Replace the default selection (all possible candidates).
    pub fn select(mut self, selection: Selection) -> Self {
        self.select = Some(selection);
        self
    }

    pub fn order(mut self, order: i64) -> Self {
        self.order = order;
        self
    }

    pub fn valid(mut self, valid: bool) -> Self {
        self.valid = valid;
        self
    }

    pub fn data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn from_spec(&self) -> &StateSpec {
        &self.from
    }

    pub fn to_spec(&self) -> &StateSpec {
        &self.to
    }

    pub fn guards(&self) -> &[Guard] {
        &self.guards
    }

    pub fn has_action(&self) -> bool {
        self.action.is_some()
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.select.as_ref()
    }

    pub fn order_value(&self) -> i64 {
        self.order
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn definition_data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// States referenced directly by `from` and `to`.
    pub(crate) fn static_states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.from
            .static_states()
            .iter()
            .chain(self.to.static_states())
            .copied()
    }
}

impl fmt::Debug for TransitionDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionDefinition")
            .field("name", &self.name)
            .field("from", &self.from)
            .field("to", &self.to)
            .field("guards", &self.guards)
            .field("action", &self.action.is_some())
            .field("select", &self.select)
            .field("order", &self.order)
            .field("valid", &self.valid)
            .field("data", &self.data)
            .finish()
    }
}
