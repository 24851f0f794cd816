//! Scene change notification
//!
//! Observers are plain capability references invoked synchronously after any
//! structural scene mutation. No batching and no deduplication: every
//! notification reaches every listener, in registration order.

use std::sync::Arc;

/// Listener notified after the scene graph changes shape
pub trait SceneObserver {
    /// Called synchronously after a structural scene mutation
    fn on_scene_changed(&self);
}

/// Registration-ordered fan-out list of observers
///
/// Duplicate registrations are allowed; removal drops only the first
/// identity match.
#[derive(Default)]
pub struct ObserverList {
    observers: Vec<Arc<dyn SceneObserver>>,
}

impl ObserverList {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer (appended; duplicates allowed)
    pub fn add(&mut self, observer: Arc<dyn SceneObserver>) {
        self.observers.push(observer);
    }

    /// Remove the first registration of `observer`, by identity
    ///
    /// Returns whether a registration was removed.
    pub fn remove(&mut self, observer: &Arc<dyn SceneObserver>) -> bool {
        match self
            .observers
            .iter()
            .position(|registered| Arc::ptr_eq(registered, observer))
        {
            Some(index) => {
                self.observers.remove(index);
                true
            }
            None => false,
        }
    }

    /// Invoke every registered observer, in registration order
    pub fn notify(&self) {
        for observer in &self.observers {
            observer.on_scene_changed();
        }
    }

    /// Number of registrations (duplicates counted)
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Whether no observers are registered
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counter {
        calls: AtomicUsize,
    }

    impl Counter {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl SceneObserver for Counter {
        fn on_scene_changed(&self) {
            self.calls.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn test_notify_reaches_all_observers() {
        let mut list = ObserverList::new();
        let first = Counter::new();
        let second = Counter::new();
        list.add(first.clone());
        list.add(second.clone());

        list.notify();
        assert_eq!(first.calls.load(Ordering::Relaxed), 1);
        assert_eq!(second.calls.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_duplicate_registration_fires_twice() {
        let mut list = ObserverList::new();
        let counter = Counter::new();
        list.add(counter.clone());
        list.add(counter.clone());

        list.notify();
        assert_eq!(counter.calls.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_remove_drops_first_match_only() {
        let mut list = ObserverList::new();
        let counter = Counter::new();
        let handle: Arc<dyn SceneObserver> = counter.clone();
        list.add(handle.clone());
        list.add(handle.clone());

        assert!(list.remove(&handle));
        assert_eq!(list.len(), 1);
        list.notify();
        assert_eq!(counter.calls.load(Ordering::Relaxed), 1);

        assert!(list.remove(&handle));
        assert!(!list.remove(&handle));
        assert!(list.is_empty());
    }
}
