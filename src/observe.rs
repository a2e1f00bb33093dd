//! Change feeds shared by the catalog database and the preference store.
//!
//! A store owns a [`ChangeNotifier`] and calls [`ChangeNotifier::notify`]
//! after every successful write. Readers hold a [`Subscription`], which
//! re-runs its query whenever the store signalled a change since the last
//! poll. Nothing here blocks: the TUI polls subscriptions once per tick.

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, Weak};

use anyhow::Result;

#[derive(Default)]
struct Registry {
    next_id: u64,
    observers: HashMap<u64, Sender<()>>,
}

/// Registry of live observers for one store.
#[derive(Clone, Default)]
pub struct ChangeNotifier {
    registry: Arc<Mutex<Registry>>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new observer. It stays registered until the returned
    /// [`Watcher`] is dropped.
    pub fn watch(&self) -> Watcher {
        let (tx, rx) = mpsc::channel();
        let mut id = 0;
        if let Ok(mut registry) = self.registry.lock() {
            id = registry.next_id;
            registry.next_id += 1;
            registry.observers.insert(id, tx);
        }
        Watcher {
            id,
            changes: rx,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Wake every observer.
    pub fn notify(&self) {
        if let Ok(mut registry) = self.registry.lock() {
            registry.observers.retain(|_, tx| tx.send(()).is_ok());
        }
    }

    /// Number of observers still registered.
    pub fn observer_count(&self) -> usize {
        self.registry
            .lock()
            .map(|registry| registry.observers.len())
            .unwrap_or(0)
    }
}

/// Receiving end of one registration. Dropping it deregisters the observer.
pub struct Watcher {
    id: u64,
    changes: Receiver<()>,
    registry: Weak<Mutex<Registry>>,
}

impl Watcher {
    /// Drain pending notifications, returning whether any arrived.
    fn drain(&self) -> bool {
        let mut changed = false;
        while self.changes.try_recv().is_ok() {
            changed = true;
        }
        changed
    }
}

impl Drop for Watcher {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            if let Ok(mut registry) = registry.lock() {
                registry.observers.remove(&self.id);
            }
        }
    }
}

type Query<T> = Box<dyn FnMut() -> Result<T> + Send>;

/// Continuously-updated view of a query result.
///
/// The first poll always runs the query. Later polls run it again only when
/// at least one change arrived in between; bursts of writes coalesce into a
/// single re-query. A failed query closes the subscription, so callers that
/// want to retry subscribe again.
pub struct Subscription<T> {
    changes: Watcher,
    query: Query<T>,
    primed: bool,
    closed: bool,
}

impl<T> Subscription<T> {
    pub fn new<F>(changes: Watcher, query: F) -> Self
    where
        F: FnMut() -> Result<T> + Send + 'static,
    {
        Self {
            changes,
            query: Box::new(query),
            primed: false,
            closed: false,
        }
    }

    /// Poll for a new value without blocking.
    pub fn next_update(&mut self) -> Option<Result<T>> {
        if self.closed {
            return None;
        }

        let changed = self.changes.drain();
        if self.primed && !changed {
            return None;
        }

        self.primed = true;
        let result = (self.query)();
        if result.is_err() {
            self.closed = true;
        }
        Some(result)
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting(notifier: &ChangeNotifier, calls: Arc<AtomicUsize>) -> Subscription<usize> {
        Subscription::new(notifier.watch(), move || {
            Ok(calls.fetch_add(1, Ordering::SeqCst) + 1)
        })
    }

    #[test]
    fn first_poll_always_emits() {
        let notifier = ChangeNotifier::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let mut sub = counting(&notifier, calls.clone());

        assert_eq!(sub.next_update().unwrap().unwrap(), 1);
        assert!(sub.next_update().is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn bursts_of_changes_coalesce() {
        let notifier = ChangeNotifier::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let mut sub = counting(&notifier, calls.clone());
        sub.next_update();

        notifier.notify();
        notifier.notify();
        notifier.notify();

        assert_eq!(sub.next_update().unwrap().unwrap(), 2);
        assert!(sub.next_update().is_none());
    }

    #[test]
    fn failure_closes_the_subscription() {
        let notifier = ChangeNotifier::new();
        let mut sub: Subscription<()> =
            Subscription::new(notifier.watch(), || Err(anyhow!("boom")));

        assert!(sub.next_update().unwrap().is_err());
        assert!(sub.is_closed());
        notifier.notify();
        assert!(sub.next_update().is_none());
    }

    #[test]
    fn dropping_a_subscription_deregisters_it() {
        let notifier = ChangeNotifier::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let keep = counting(&notifier, calls.clone());
        let dropped = counting(&notifier, calls.clone());
        assert_eq!(notifier.observer_count(), 2);

        drop(dropped);
        assert_eq!(notifier.observer_count(), 1);

        for _ in 0..10 {
            drop(counting(&notifier, calls.clone()));
        }
        assert_eq!(notifier.observer_count(), 1);
        drop(keep);
        assert_eq!(notifier.observer_count(), 0);
    }

    #[test]
    fn watcher_outliving_its_notifier_drops_cleanly() {
        let notifier = ChangeNotifier::new();
        let watcher = notifier.watch();
        drop(notifier);
        assert!(!watcher.drain());
        drop(watcher);
    }
}
