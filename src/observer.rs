//! Subscriber registry
//!
//! Explicit replacement for ad hoc callback lists. Subscribers get an id on
//! registration, can be removed by id, and are notified in registration
//! order.

use crate::feed::Tick;
use parking_lot::Mutex;
use std::sync::Arc;

/// Handle returned by [`Subscribers::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

struct Registry<T: ?Sized> {
    next_id: u64,
    entries: Vec<(SubscriptionId, Arc<T>)>,
}

/// Ordered set of subscribers of type `T`
pub struct Subscribers<T: ?Sized> {
    inner: Mutex<Registry<T>>,
}

impl<T: ?Sized> Subscribers<T> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Registry {
                next_id: 0,
                entries: Vec::new(),
            }),
        }
    }

    /// Register a subscriber
    pub fn subscribe(&self, subscriber: Arc<T>) -> SubscriptionId {
        let mut registry = self.inner.lock();
        let id = SubscriptionId(registry.next_id);
        registry.next_id += 1;
        registry.entries.push((id, subscriber));
        id
    }

    /// Remove a subscriber; false if the id is unknown
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut registry = self.inner.lock();
        let before = registry.entries.len();
        registry.entries.retain(|(entry_id, _)| *entry_id != id);
        registry.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current subscribers in registration order.
    ///
    /// Callers notify from the snapshot so no lock is held while subscriber
    /// code runs.
    pub fn snapshot(&self) -> Vec<Arc<T>> {
        self.inner
            .lock()
            .entries
            .iter()
            .map(|(_, s)| Arc::clone(s))
            .collect()
    }
}

impl<T: ?Sized> Default for Subscribers<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Receives every normalized tick
pub trait TickSubscriber: Send + Sync {
    fn on_tick(&self, tick: &Tick);
}

impl<F> TickSubscriber for F
where
    F: Fn(&Tick) + Send + Sync,
{
    fn on_tick(&self, tick: &Tick) {
        self(tick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_notify_in_registration_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let subscribers: Subscribers<dyn TickSubscriber> = Subscribers::new();

        for tag in ["first", "second", "third"] {
            let seen = Arc::clone(&seen);
            subscribers.subscribe(Arc::new(move |_: &Tick| seen.lock().push(tag)));
        }

        let tick = Tick::new("btcusdt", Utc::now(), 1.0, 1.0);
        for s in subscribers.snapshot() {
            s.on_tick(&tick);
        }
        assert_eq!(*seen.lock(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_unsubscribe() {
        let subscribers: Subscribers<dyn TickSubscriber> = Subscribers::default();
        let a = subscribers.subscribe(Arc::new(|_: &Tick| {}));
        let b = subscribers.subscribe(Arc::new(|_: &Tick| {}));
        assert_ne!(a, b);
        assert_eq!(subscribers.len(), 2);

        assert!(subscribers.unsubscribe(a));
        assert!(!subscribers.unsubscribe(a));
        assert_eq!(subscribers.len(), 1);

        assert!(subscribers.unsubscribe(b));
        assert!(subscribers.is_empty());
    }
}
