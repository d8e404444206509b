//! State records and their handles.
//!
//! States are owned by the machine once registered and are addressed by
//! [`StateId`] handles. Two states that share a name are still distinct:
//! identity always comes from the handle.

use crate::machine::Fsm;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Handle to a state registered with a machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(pub(crate) usize);

impl StateId {
    /// Position of the state in the machine's state table.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Error returned by lifecycle hooks and transition actions.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HookError {
    message: String,
}

impl HookError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<&str> for HookError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for HookError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

/// Result of a hook or action invocation.
pub type HookResult = Result<(), HookError>;

/// Enter/exit hook: `(fsm, from, to)`.
pub type StateHook = Arc<dyn Fn(&mut Fsm, StateId, StateId) -> HookResult + Send + Sync>;

/// A node of the machine with bookkeeping fields and optional lifecycle hooks.
///
/// Every bookkeeping field has a typed default, so a value given by the
/// caller is kept as-is when the state is registered, including `order(0)`
/// and `valid(false)`.
///
/// # Example
///
/// ```rust
/// use statecraft::State;
///
/// let review = State::new("review").order(2).valid(true);
///
/// assert_eq!(review.name(), "review");
/// assert_eq!(review.order_value(), 2);
/// assert_eq!(review.count(), 0);
/// assert!(review.is_valid());
/// assert!(!review.is_changed());
/// ```
#[derive(Clone)]
pub struct State {
    name: String,
    count: u32,
    order: i64,
    valid: bool,
    changed: bool,
    data: Option<Value>,
    is_start_state: bool,
    on_enter: Option<StateHook>,
    on_exit: Option<StateHook>,
}

impl State {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            count: 0,
            order: 0,
            valid: false,
            changed: false,
            data: None,
            is_start_state: false,
            on_enter: None,
            on_exit: None,
        }
    }

    /// The anonymous start state used when a machine is built without one.
    ///
    /// Its shape is fixed: empty name, entered once, unordered, not valid,
    /// unchanged and flagged as the start state.
    pub fn default_start() -> Self {
        let mut state = Self::new("");
        state.count = 1;
        state.is_start_state = true;
        state
    }

    /// Set the position used by order-based selection. `0` means unordered.
    pub fn order(mut self, order: i64) -> Self {
        self.order = order;
        self
    }

    /// Seed the entry counter.
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
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

    /// Hook invoked after the machine has moved into this state.
    pub fn on_enter<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Fsm, StateId, StateId) -> HookResult + Send + Sync + 'static,
    {
        self.on_enter = Some(Arc::new(hook));
        self
    }

    /// Hook invoked before the machine leaves this state.
    pub fn on_exit<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Fsm, StateId, StateId) -> HookResult + Send + Sync + 'static,
    {
        self.on_exit = Some(Arc::new(hook));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of times the state has been entered.
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn order_value(&self) -> i64 {
        self.order
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Whether the state's data was changed since the machine last left it.
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    pub fn state_data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    pub fn is_start_state(&self) -> bool {
        self.is_start_state
    }

    pub fn has_enter_hook(&self) -> bool {
        self.on_enter.is_some()
    }

    pub fn has_exit_hook(&self) -> bool {
        self.on_exit.is_some()
    }

    pub(crate) fn enter_hook(&self) -> Option<StateHook> {
        self.on_enter.clone()
    }

    pub(crate) fn exit_hook(&self) -> Option<StateHook> {
        self.on_exit.clone()
    }

    pub(crate) fn mark_start(&mut self) {
        self.is_start_state = true;
        self.count += 1;
    }

    pub(crate) fn record_entry(&mut self) {
        self.count += 1;
    }

    pub(crate) fn set_changed(&mut self, changed: bool) {
        self.changed = changed;
    }

    pub(crate) fn set_valid(&mut self, valid: bool) {
        self.valid = valid;
    }

    pub(crate) fn set_data(&mut self, data: Value) {
        self.data = Some(data);
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("name", &self.name)
            .field("count", &self.count)
            .field("order", &self.order)
            .field("valid", &self.valid)
            .field("changed", &self.changed)
            .field("data", &self.data)
            .field("is_start_state", &self.is_start_state)
            .field("on_enter", &self.on_enter.is_some())
            .field("on_exit", &self.on_exit.is_some())
            .finish()
    }
}
