//! Builder for constructing transition definitions.

use crate::builder::error::BuildError;
use crate::core::{Guard, HookResult, StateSpec};
use crate::machine::{Action, Fsm, Transition, TransitionDefinition};
use crate::strategy::Selection;
use serde_json::Value;
use std::sync::Arc;

/// Builder for transition definitions with a fluent API.
///
/// Unlike [`TransitionDefinition::new`], the source and target can be set in
/// any order and are checked when building.
pub struct TransitionBuilder {
    name: String,
    from: Option<StateSpec>,
    to: Option<StateSpec>,
    guards: Vec<Guard>,
    action: Option<Action>,
    select: Option<Selection>,
    order: i64,
    data: Option<Value>,
}

impl TransitionBuilder {
    /// Create a new transition builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            from: None,
            to: None,
            guards: Vec::new(),
            action: None,
            select: None,
            order: 0,
            data: None,
        }
    }

    /// Set the source states (required).
    pub fn from(mut self, states: impl Into<StateSpec>) -> Self {
        self.from = Some(states.into());
        self
    }

    /// Set the target states (required).
    pub fn to(mut self, states: impl Into<StateSpec>) -> Self {
        self.to = Some(states.into());
        self
    }

    /// Add a guard (optional, repeatable).
    pub fn guard(mut self, guard: Guard) -> Self {
        self.guards.push(guard);
        self
    }

    /// Add a guard that only looks at the machine (optional, repeatable).
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Fsm) -> bool + Send + Sync + 'static,
    {
        self.guards.push(Guard::new(move |fsm, _, _, _| predicate(fsm)));
        self
    }

    /// Set the action run between the exit and enter hooks (optional).
    pub fn action<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut Fsm, &Transition) -> HookResult + Send + Sync + 'static,
    {
        self.action = Some(Arc::new(action));
        self
    }

    pub fn select(mut self, selection: Selection) -> Self {
        self.select = Some(selection);
        self
    }

    pub fn order(mut self, order: i64) -> Self {
        self.order = order;
        self
    }

    pub fn data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Build the definition.
    pub fn build(self) -> Result<TransitionDefinition, BuildError> {
        let from = self.from.ok_or(BuildError::MissingFromState)?;
        let to = self.to.ok_or(BuildError::MissingToState)?;

        let mut definition = self
            .guards
            .into_iter()
            .fold(TransitionDefinition::new(self.name, from, to), |definition, guard| {
                definition.guard(guard)
            })
            .order(self.order);
        definition.action = self.action;
        definition.select = self.select;
        definition.data = self.data;
        Ok(definition)
    }
}
