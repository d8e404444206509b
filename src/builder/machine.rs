//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::builder::transition::TransitionBuilder;
use crate::config::FsmConfig;
use crate::core::{State, StateId};
use crate::machine::{Fsm, TransitionDefinition, TransitionId};
use serde_json::Value;
use std::collections::HashSet;

/// Builder collecting states and transition definitions.
///
/// States are registered first and addressed by the returned [`StateId`]
/// handles when declaring transitions.
pub struct FsmBuilder {
    states: Vec<State>,
    definitions: Vec<TransitionDefinition>,
    start: Option<StateId>,
    data: Value,
    config: FsmConfig,
}

impl FsmBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            definitions: Vec::new(),
            start: None,
            data: Value::Object(Default::default()),
            config: FsmConfig::default(),
        }
    }

    /// Register a state, returning its handle.
    pub fn state(&mut self, state: State) -> StateId {
        self.states.push(state);
        StateId(self.states.len() - 1)
    }

    /// Register a transition definition.
    pub fn transition(&mut self, definition: TransitionDefinition) -> TransitionId {
        self.definitions.push(definition);
        TransitionId(self.definitions.len() - 1)
    }

    /// Register a transition from a fluent builder.
    /// Returns an error if the builder fails validation.
    pub fn transition_with(
        &mut self,
        builder: TransitionBuilder,
    ) -> Result<TransitionId, BuildError> {
        let definition = builder.build()?;
        Ok(self.transition(definition))
    }

    /// Set the start state. Without one, an unnamed start state is created.
    pub fn start(&mut self, state: StateId) -> &mut Self {
        self.start = Some(state);
        self
    }

    /// Set the initial machine data.
    pub fn data(&mut self, data: Value) -> &mut Self {
        self.data = data;
        self
    }

    pub fn config(&mut self, config: FsmConfig) -> &mut Self {
        self.config = config;
        self
    }

    /// Build the state machine.
    ///
    /// Returns an error if the start state or a static state reference is
    /// not registered, or if two definitions share a name.
    pub fn build(self) -> Result<Fsm, BuildError> {
        if let Some(id) = self.start {
            if id.0 >= self.states.len() {
                return Err(BuildError::UnknownStartState { id });
            }
        }

        let mut names = HashSet::new();
        for definition in &self.definitions {
            if !names.insert(definition.name()) {
                return Err(BuildError::DuplicateTransition {
                    name: definition.name().to_string(),
                });
            }
            if let Some(id) = definition
                .static_states()
                .find(|id| id.0 >= self.states.len())
            {
                return Err(BuildError::UnknownStateReference {
                    definition: definition.name().to_string(),
                    id,
                });
            }
        }

        Ok(Fsm::from_parts(
            self.states,
            self.definitions,
            self.start,
            self.data,
            self.config,
        ))
    }
}

impl Default for FsmBuilder {
    fn default() -> Self {
        Self::new()
    }
}
