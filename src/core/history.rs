//! History of executed transitions.
//!
//! Provides immutable tracking of the transitions a machine has executed,
//! optionally bounded to the most recent entries.

use super::state::StateId;
use crate::machine::TransitionId;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Record of a single executed transition.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionRecord {
    /// Position of the transition among all transitions the machine executed
    pub sequence: u64,
    /// The state being transitioned from
    pub from: StateId,
    /// The state being transitioned to
    pub to: StateId,
    /// The definition that produced the transition
    pub definition: TransitionId,
    /// When the transition was committed
    pub timestamp: DateTime<Utc>,
}

/// Ordered history of executed transitions.
///
/// History is immutable - `record` returns a new history with the
/// transition added. With a limit set, the oldest records are dropped
/// once the limit is reached.
#[derive(Clone, Debug, Default)]
pub struct TransitionHistory {
    records: Vec<TransitionRecord>,
    limit: Option<usize>,
}

impl TransitionHistory {
    /// Create a new empty, unbounded history.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            limit: None,
        }
    }

    /// Create a new empty history keeping at most `limit` records.
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            records: Vec::new(),
            limit,
        }
    }

    /// Record a transition, returning a new history.
    pub fn record(&self, record: TransitionRecord) -> Self {
        let mut records = self.records.clone();
        records.push(record);
        if let Some(limit) = self.limit {
            let excess = records.len().saturating_sub(limit);
            records.drain(..excess);
        }
        Self {
            records,
            limit: self.limit,
        }
    }

    /// Get the path of states traversed.
    ///
    /// Returns the source of the first retained record, then the target of
    /// each record.
    pub fn get_path(&self) -> Vec<StateId> {
        let mut path = Vec::new();
        if let Some(first) = self.records.first() {
            path.push(first.from);
        }
        path.extend(self.records.iter().map(|r| r.to));
        path
    }

    /// Duration from the first to the last retained record.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.records.first()?, self.records.last()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn records(&self) -> &[TransitionRecord] {
        &self.records
    }

    pub fn last(&self) -> Option<&TransitionRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }
}
