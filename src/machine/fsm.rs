//! The state machine runtime.

use super::definition::{TransitionDefinition, TransitionId};
use super::error::{FsmError, HookKind, RejectReason, TransitionNotPossible};
use super::transition::{MachineId, Transition};
use crate::builder::FsmBuilder;
use crate::config::FsmConfig;
use crate::core::{check_guards, HookError, State, StateId, TransitionHistory, TransitionRecord};
use crate::events::{Publisher, SubscriptionId};
use crate::strategy::{filter, selection};
use chrono::Utc;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Declarative finite state machine.
///
/// The machine owns its states and transition definitions. After every
/// change it recomputes the transitions available from the current state
/// and publishes them; every executed transition is published as well.
///
/// Execution of a transition follows a fixed protocol: identity check,
/// guard recheck, exit hook, action, state swap, enter hook, bookkeeping,
/// recomputation and publication. Rejections always happen before the
/// state swap.
pub struct Fsm {
    id: MachineId,
    config: FsmConfig,
    states: Vec<State>,
    definitions: Vec<TransitionDefinition>,
    definition_index: HashMap<String, TransitionId>,
    start_state: StateId,
    current_state: StateId,
    data: Value,
    current_transitions: Vec<Transition>,
    last_transition: Option<Transition>,
    executed: u64,
    history: TransitionHistory,
    candidate_events: Publisher<Vec<Transition>>,
    transition_events: Publisher<Transition>,
}

impl Fsm {
    pub fn builder() -> FsmBuilder {
        FsmBuilder::new()
    }

    /// Assemble a machine from validated parts.
    ///
    /// The start state is entered (its count incremented) but its enter hook
    /// only runs on [`Fsm::initialize`].
    pub(crate) fn from_parts(
        mut states: Vec<State>,
        definitions: Vec<TransitionDefinition>,
        start: Option<StateId>,
        data: Value,
        config: FsmConfig,
    ) -> Self {
        let start_state = match start.filter(|id| id.0 < states.len()) {
            Some(id) => {
                states[id.0].mark_start();
                id
            }
            None => {
                states.push(State::default_start());
                StateId(states.len() - 1)
            }
        };

        let definition_index = definitions
            .iter()
            .enumerate()
            .map(|(index, definition)| (definition.name.clone(), TransitionId(index)))
            .collect();

        let mut fsm = Self {
            id: MachineId::new(),
            history: TransitionHistory::with_limit(config.history_limit),
            config,
            states,
            definitions,
            definition_index,
            start_state,
            current_state: start_state,
            data,
            current_transitions: Vec::new(),
            last_transition: None,
            executed: 0,
            candidate_events: Publisher::new(),
            transition_events: Publisher::new(),
        };
        fsm.refresh(true);

        tracing::info!(
            machine = %fsm.id,
            states = fsm.states.len(),
            definitions = fsm.definitions.len(),
            start = fsm.state_name(start_state),
            "state machine built"
        );
        fsm
    }

    pub fn id(&self) -> MachineId {
        self.id
    }

    pub fn config(&self) -> &FsmConfig {
        &self.config
    }

    pub fn current_state(&self) -> StateId {
        self.current_state
    }

    /// The record of the current state.
    pub fn current(&self) -> &State {
        &self.states[self.current_state.0]
    }

    pub fn start_state(&self) -> StateId {
        self.start_state
    }

    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.get(id.0)
    }

    /// First registered state with the given name.
    pub fn state_id(&self, name: &str) -> Option<StateId> {
        self.states
            .iter()
            .position(|state| state.name() == name)
            .map(StateId)
    }

    pub fn states(&self) -> impl Iterator<Item = (StateId, &State)> {
        self.states
            .iter()
            .enumerate()
            .map(|(index, state)| (StateId(index), state))
    }

    /// Order of a state, `0` for unordered or unknown states.
    pub fn order_of(&self, id: StateId) -> i64 {
        self.states.get(id.0).map_or(0, State::order_value)
    }

    pub fn definition(&self, id: TransitionId) -> Option<&TransitionDefinition> {
        self.definitions.get(id.0)
    }

    pub fn definition_id(&self, name: &str) -> Option<TransitionId> {
        self.definition_index.get(name).copied()
    }

    pub fn definitions(&self) -> impl Iterator<Item = (TransitionId, &TransitionDefinition)> {
        self.definitions
            .iter()
            .enumerate()
            .map(|(index, definition)| (TransitionId(index), definition))
    }

    /// Machine-wide payload shared with guards, hooks and actions.
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Transitions available from the current state, in definition order.
    pub fn current_transitions(&self) -> &[Transition] {
        &self.current_transitions
    }

    pub fn last_transition(&self) -> Option<&Transition> {
        self.last_transition.as_ref()
    }

    pub fn history(&self) -> &TransitionHistory {
        &self.history
    }

    /// Whether the current state is marked valid.
    pub fn is_valid(&self) -> bool {
        self.current().is_valid()
    }

    /// Mark the current state valid or invalid and recompute transitions.
    pub fn set_valid(&mut self, valid: bool) {
        let current = self.current_state.0;
        self.states[current].set_valid(valid);
        self.refresh(false);
    }

    pub fn can_transition(&self) -> bool {
        !self.current_transitions.is_empty()
    }

    pub fn can_transition_to(&self, state: StateId) -> bool {
        self.current_transitions.iter().any(|t| t.to == state)
    }

    /// Candidates contributed by a single definition from the current state.
    pub fn transitions_for(&self, name: &str) -> Result<Vec<Transition>, FsmError> {
        let id = self.require_definition(name)?;
        Ok(self.candidates_for(id, &self.definitions[id.0]))
    }

    /// Merge `data` into the machine data and run the start state's enter hook.
    ///
    /// Object payloads are merged key by key; any other payload replaces the
    /// machine data.
    pub fn initialize(&mut self, data: Value) -> Result<(), FsmError> {
        merge_data(&mut self.data, data);
        self.refresh(false);

        let start = self.start_state;
        tracing::info!(
            machine = %self.id,
            start = self.state_name(start),
            "initializing state machine"
        );
        if let Some(hook) = self.states[start.0].enter_hook() {
            hook(self, start, start)
                .map_err(|source| self.hook_failed(HookKind::Enter, start, source))?;
        }
        Ok(())
    }

    /// Replace the machine data and recompute transitions.
    pub fn change_data(&mut self, data: Value) {
        self.data = data;
        self.refresh(false);
    }

    /// Replace a state's data, mark it changed and recompute transitions.
    pub fn change_state_data(&mut self, state: StateId, data: Value) -> Result<(), FsmError> {
        let record = self
            .states
            .get_mut(state.0)
            .ok_or(FsmError::UnknownState { id: state })?;
        record.set_data(data);
        record.set_changed(true);
        self.refresh(false);
        Ok(())
    }

    pub fn change_current_state_data(&mut self, data: Value) {
        let current = self.current_state;
        // the current state is always registered
        let _ = self.change_state_data(current, data);
    }

    /// Execute the first possible transition leading to `target`.
    pub fn transition_to(&mut self, target: StateId, data: Option<Value>) -> Result<(), FsmError> {
        let candidate = self
            .current_transitions
            .iter()
            .find(|t| t.is_possible && t.to == target)
            .cloned()
            .ok_or_else(|| self.reject(RejectReason::NoCandidateForTarget))?;
        self.transition(candidate, data)
    }

    /// Execute a transition of the given definition.
    ///
    /// When the definition offers several targets, `target` picks one of them.
    pub fn transition_by_definition(
        &mut self,
        definition: TransitionId,
        target: Option<StateId>,
        data: Option<Value>,
    ) -> Result<(), FsmError> {
        if self.definitions.get(definition.0).is_none() {
            return Err(FsmError::DefinitionNotFound {
                name: definition.to_string(),
            });
        }

        let mut candidates: Vec<Transition> = self
            .current_transitions
            .iter()
            .filter(|t| t.definition == definition)
            .cloned()
            .collect();

        let selected = match candidates.len() {
            0 => return Err(self.reject(RejectReason::DefinitionUnavailable)),
            1 => candidates.remove(0),
            _ => {
                let target = target.ok_or_else(|| self.reject(RejectReason::AmbiguousTarget))?;
                candidates
                    .into_iter()
                    .find(|t| t.to == target)
                    .ok_or_else(|| self.reject(RejectReason::TargetNotReachable))?
            }
        };
        self.transition(selected, data)
    }

    /// Same as [`Fsm::transition_by_definition`], addressing the definition by name.
    pub fn transition_by_name(
        &mut self,
        name: &str,
        target: Option<StateId>,
        data: Option<Value>,
    ) -> Result<(), FsmError> {
        let id = self.require_definition(name)?;
        self.transition_by_definition(id, target, data)
    }

    /// Execute the first transition the filter keeps out of the possible ones.
    ///
    /// When the filter keeps nothing, the error carries the possible and
    /// impossible current transitions.
    pub fn transition_by_filter<F>(&mut self, select: F, data: Option<Value>) -> Result<(), FsmError>
    where
        F: FnOnce(&[Transition], &Fsm) -> Vec<Transition>,
    {
        let possible = filter::possible_transitions(&self.current_transitions, self);
        let selected = select(&possible, self).into_iter().next();

        match selected {
            Some(transition) => self.transition(transition, data),
            None => {
                let impossible = filter::impossible_transitions(&self.current_transitions, self);
                tracing::debug!(
                    machine = %self.id,
                    possible = possible.len(),
                    impossible = impossible.len(),
                    "transition filter matched nothing"
                );
                Err(TransitionNotPossible::new(RejectReason::FilterEmpty, self.id)
                    .with_candidates(possible, impossible)
                    .into())
            }
        }
    }

    /// Execute a candidate transition.
    ///
    /// Guards are evaluated again with the transition data, since the machine
    /// may have changed since the candidate was computed. A failing exit hook
    /// or action leaves the machine in its current state. A failing enter hook
    /// is reported after the state has changed, the transitions have been
    /// recomputed and the transition has been published.
    pub fn transition(
        &mut self,
        mut transition: Transition,
        data: Option<Value>,
    ) -> Result<(), FsmError> {
        if transition.machine != self.id || transition.from != self.current_state {
            return Err(self.reject(RejectReason::NotCurrentState));
        }
        if data.is_some() {
            transition.data = data;
        }

        let (from, to) = (transition.from, transition.to);
        if self.states.get(to.0).is_none() {
            return Err(FsmError::UnknownState { id: to });
        }
        let definition = self
            .definitions
            .get(transition.definition.0)
            .ok_or_else(|| FsmError::DefinitionNotFound {
                name: transition.definition.to_string(),
            })?;

        let failing_guards = check_guards(self, &definition.guards, from, to, transition.data.as_ref());
        if !failing_guards.is_empty() {
            tracing::debug!(
                machine = %self.id,
                definition = %definition.name,
                failing = failing_guards.len(),
                "transition rejected by guards"
            );
            return Err(TransitionNotPossible::new(RejectReason::GuardsFailed, self.id)
                .with_failing_guards(failing_guards)
                .into());
        }
        let action = definition.action.clone();
        let definition_name = definition.name.clone();

        if let Some(hook) = self.states[from.0].exit_hook() {
            hook(self, from, to).map_err(|source| self.hook_failed(HookKind::Exit, from, source))?;
        }
        if let Some(action) = action {
            action(self, &transition).map_err(|source| FsmError::ActionFailed {
                definition: definition_name.clone(),
                source,
            })?;
        }

        self.current_state = to;
        let entered = match self.states[to.0].enter_hook() {
            Some(hook) => {
                hook(self, from, to).map_err(|source| self.hook_failed(HookKind::Enter, to, source))
            }
            None => Ok(()),
        };
        self.states[to.0].record_entry();
        self.states[from.0].set_changed(false);
        self.refresh(false);

        self.executed += 1;
        self.history = self.history.record(TransitionRecord {
            sequence: self.executed,
            from,
            to,
            definition: transition.definition,
            timestamp: Utc::now(),
        });
        self.last_transition = Some(transition.clone());
        tracing::debug!(
            machine = %self.id,
            definition = %definition_name,
            from = self.state_name(from),
            to = self.state_name(to),
            "transition executed"
        );
        self.transition_events.publish(transition);
        entered
    }

    /// Subscribe to every recomputed set of current transitions.
    pub fn subscribe_candidates<F>(&mut self, subscriber: F) -> SubscriptionId
    where
        F: Fn(&[Transition]) + Send + Sync + 'static,
    {
        self.candidate_events
            .subscribe(move |transitions: &Vec<Transition>| subscriber(transitions))
    }

    /// Subscribe to every executed transition.
    pub fn subscribe_transitions<F>(&mut self, subscriber: F) -> SubscriptionId
    where
        F: Fn(&Transition) + Send + Sync + 'static,
    {
        self.transition_events.subscribe(subscriber)
    }

    /// Remove a subscription from whichever stream holds it.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.candidate_events.unsubscribe(id) || self.transition_events.unsubscribe(id)
    }

    /// The most recently published set of current transitions.
    pub fn latest_candidates(&self) -> Option<&[Transition]> {
        self.candidate_events.latest().map(Vec::as_slice)
    }

    fn refresh(&mut self, force: bool) {
        let transitions = self.compute_transitions();
        tracing::trace!(
            machine = %self.id,
            state = self.state_name(self.current_state),
            transitions = transitions.len(),
            "recomputed current transitions"
        );
        let changed = transitions != self.current_transitions;
        self.current_transitions = transitions;
        if force || changed || self.config.publish_unchanged {
            self.candidate_events.publish(self.current_transitions.clone());
        }
    }

    fn compute_transitions(&self) -> Vec<Transition> {
        self.definitions
            .iter()
            .enumerate()
            .flat_map(|(index, definition)| self.candidates_for(TransitionId(index), definition))
            .collect()
    }

    /// Candidates of one definition: resolve sources, check membership of
    /// the current state, resolve targets, evaluate guards, then select.
    fn candidates_for(&self, id: TransitionId, definition: &TransitionDefinition) -> Vec<Transition> {
        let current = self.current_state;
        if !definition.from.resolve(self).contains(&current) {
            return Vec::new();
        }

        let candidates: Vec<Transition> = definition
            .to
            .resolve(self)
            .into_iter()
            .filter(|to| to.0 < self.states.len())
            .map(|to| {
                let failing_guards = check_guards(self, &definition.guards, current, to, None);
                Transition::candidate(self.id, current, to, id, failing_guards)
            })
            .collect();
        if candidates.is_empty() {
            return candidates;
        }

        match &definition.select {
            Some(select) => select.apply(&candidates, self),
            None => selection::all_possible(&candidates, self),
        }
    }

    fn require_definition(&self, name: &str) -> Result<TransitionId, FsmError> {
        self.definition_id(name)
            .ok_or_else(|| FsmError::DefinitionNotFound {
                name: name.to_string(),
            })
    }

    fn reject(&self, reason: RejectReason) -> FsmError {
        tracing::debug!(
            machine = %self.id,
            state = self.state_name(self.current_state),
            %reason,
            "transition rejected"
        );
        TransitionNotPossible::new(reason, self.id).into()
    }

    fn hook_failed(&self, hook: HookKind, state: StateId, source: HookError) -> FsmError {
        FsmError::HookFailed {
            hook,
            state: self.state_name(state).to_string(),
            source,
        }
    }

    fn state_name(&self, id: StateId) -> &str {
        self.states.get(id.0).map_or("<unknown>", State::name)
    }
}

fn merge_data(target: &mut Value, data: Value) {
    match (target, data) {
        (Value::Object(existing), Value::Object(incoming)) => existing.extend(incoming),
        (target, data) => *target = data,
    }
}

impl fmt::Debug for Fsm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fsm")
            .field("id", &self.id)
            .field("current_state", &self.current_state)
            .field("states", &self.states)
            .field("definitions", &self.definitions)
            .field("data", &self.data)
            .field("current_transitions", &self.current_transitions.len())
            .finish()
    }
}
