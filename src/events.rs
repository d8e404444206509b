//! Synchronous observer registry for machine events.
//!
//! Each publish is an in-order fan-out to the subscribers registered at that
//! moment and completes before control returns to the publisher. The last
//! published value is kept; nothing older is buffered.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_SUBSCRIPTION: AtomicU64 = AtomicU64::new(1);

/// Callback invoked for every published value.
pub type Subscriber<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Handle returned by [`Publisher::subscribe`], unique within the process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "subscription-{}", self.0)
    }
}

/// Broadcast channel with synchronous delivery.
///
/// # Example
///
/// ```rust
/// use statecraft::events::Publisher;
/// use std::sync::{Arc, Mutex};
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let mut publisher = Publisher::new();
///
/// let sink = Arc::clone(&seen);
/// let id = publisher.subscribe(move |value: &u32| sink.lock().unwrap().push(*value));
///
/// publisher.publish(1);
/// publisher.unsubscribe(id);
/// publisher.publish(2);
///
/// assert_eq!(*seen.lock().unwrap(), vec![1]);
/// assert_eq!(publisher.latest(), Some(&2));
/// ```
pub struct Publisher<T> {
    subscribers: Vec<(SubscriptionId, Subscriber<T>)>,
    latest: Option<T>,
}

impl<T> Publisher<T> {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
            latest: None,
        }
    }

    /// Register a callback for every future publish.
    pub fn subscribe<F>(&mut self, subscriber: F) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = SubscriptionId(NEXT_SUBSCRIPTION.fetch_add(1, Ordering::Relaxed));
        self.subscribers.push((id, Arc::new(subscriber)));
        id
    }

    /// Remove a subscriber. Returns whether it was registered here.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        self.subscribers.len() != before
    }

    /// Deliver `value` to every subscriber, then keep it as the latest value.
    pub fn publish(&mut self, value: T) {
        for (_, subscriber) in &self.subscribers {
            subscriber(&value);
        }
        self.latest = Some(value);
    }

    pub fn latest(&self) -> Option<&T> {
        self.latest.as_ref()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl<T> Default for Publisher<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Publisher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Publisher")
            .field("subscribers", &self.subscribers.len())
            .field("latest", &self.latest)
            .finish()
    }
}
