//! Subscription store for the object list and the current selection

use std::collections::VecDeque;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use uuid::Uuid;

/// Handle to one of the selectable objects in the scene.
///
/// The rendering layer owns the object itself; the store only tracks its
/// id and display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef {
    pub id: Uuid,
    pub name: String,
}

impl ObjectRef {
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// State held by the selection store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    /// Selectable objects, in insertion order.
    pub objects: Vec<ObjectRef>,
    /// Currently selected object, if any.
    pub selected: Option<Uuid>,
}

struct Subscriber<S> {
    id: u64,
    notify: Box<dyn FnMut(&S) + Send>,
}

struct Inner<S> {
    state: S,
    subscribers: Vec<Subscriber<S>>,
    queue: VecDeque<S>,
    notifying: bool,
    pending_removals: Vec<u64>,
    next_id: u64,
}

/// Generic subscription store.
///
/// Subscribers watch a projection of the state and are only called when the
/// projection changes under their equality test. Notification runs outside
/// the state lock; updates made from inside a callback are queued and
/// dispatched in order, so a notification cascade cannot deadlock or drop
/// a change.
pub struct Store<S> {
    inner: Arc<Mutex<Inner<S>>>,
}

impl<S> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: Clone + Send + 'static> Store<S> {
    pub fn new(initial: S) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                state: initial,
                subscribers: Vec::new(),
                queue: VecDeque::new(),
                notifying: false,
                pending_removals: Vec::new(),
                next_id: 1,
            })),
        }
    }

    /// Returns a snapshot of the current state.
    pub fn get(&self) -> S {
        self.inner.lock().state.clone()
    }

    /// Reads the current state without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.inner.lock().state)
    }

    /// Applies `f` to the state and notifies subscribers.
    pub fn update(&self, f: impl FnOnce(&mut S)) {
        let mut inner = self.inner.lock();
        f(&mut inner.state);
        let snapshot = inner.state.clone();
        inner.queue.push_back(snapshot);
        if inner.notifying {
            // A dispatch is already draining the queue further up the stack.
            return;
        }
        inner.notifying = true;
        while let Some(snapshot) = inner.queue.pop_front() {
            let mut subscribers = std::mem::take(&mut inner.subscribers);
            drop(inner);
            for subscriber in &mut subscribers {
                (subscriber.notify)(&snapshot);
            }
            inner = self.inner.lock();
            // Subscriptions registered during dispatch landed in the inner
            // list; keep them behind the existing ones.
            let added = std::mem::replace(&mut inner.subscribers, subscribers);
            inner.subscribers.extend(added);
            let removed = std::mem::take(&mut inner.pending_removals);
            if !removed.is_empty() {
                inner.subscribers.retain(|s| !removed.contains(&s.id));
            }
        }
        inner.notifying = false;
    }

    /// Subscribes to changes of `selector(state)` under `equality`.
    ///
    /// The callback receives the new projection whenever it differs from the
    /// previous one. The projection is captured at subscription time, so a
    /// subscriber is not called for the state it subscribed against.
    pub fn subscribe_with<T, Sel, Eq, Cb>(
        &self,
        selector: Sel,
        equality: Eq,
        mut callback: Cb,
    ) -> Subscription
    where
        T: Send + 'static,
        Sel: Fn(&S) -> T + Send + 'static,
        Eq: Fn(&T, &T) -> bool + Send + 'static,
        Cb: FnMut(&T) + Send + 'static,
    {
        let mut inner = self.inner.lock();
        let id = inner.next_id;
        inner.next_id += 1;

        let mut last = selector(&inner.state);
        inner.subscribers.push(Subscriber {
            id,
            notify: Box::new(move |state: &S| {
                let current = selector(state);
                if !equality(&last, &current) {
                    callback(&current);
                    last = current;
                }
            }),
        });
        drop(inner);

        let weak = Arc::downgrade(&self.inner);
        Subscription::new(move || Self::remove_subscriber(&weak, id))
    }

    /// Subscribes with the default equality (`PartialEq`).
    pub fn subscribe<T, Sel, Cb>(&self, selector: Sel, callback: Cb) -> Subscription
    where
        T: PartialEq + Send + 'static,
        Sel: Fn(&S) -> T + Send + 'static,
        Cb: FnMut(&T) + Send + 'static,
    {
        self.subscribe_with(selector, |a: &T, b: &T| a == b, callback)
    }

    fn remove_subscriber(weak: &Weak<Mutex<Inner<S>>>, id: u64) {
        let Some(inner) = weak.upgrade() else {
            return;
        };
        let mut inner = inner.lock();
        if inner.notifying {
            // Dispatch owns the subscriber list right now.
            inner.pending_removals.push(id);
        } else {
            inner.subscribers.retain(|s| s.id != id);
        }
    }
}

/// Teardown handle for one store subscription.
///
/// The subscription is removed when this handle is dropped or explicitly
/// unsubscribed.
pub struct Subscription {
    teardown: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    fn new(teardown: impl FnOnce() + Send + 'static) -> Self {
        Self {
            teardown: Some(Box::new(teardown)),
        }
    }

    /// Removes the subscription now.
    pub fn unsubscribe(mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }
}

/// The store backing the object list and the gizmo attachment.
///
/// Clones share the same state; the application creates one in `main` and
/// hands out clones.
#[derive(Clone)]
pub struct SelectionStore {
    store: Store<SelectionState>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self {
            store: Store::new(SelectionState::default()),
        }
    }

    /// Replaces the object list wholesale.
    ///
    /// The current selection is left untouched, even when it no longer
    /// refers to a listed object.
    pub fn set_objects(&self, objects: Vec<ObjectRef>) {
        self.store.update(|state| state.objects = objects);
    }

    /// Replaces the selection.
    ///
    /// The id is not validated against the object list; selecting an id
    /// that is not listed is accepted silently.
    pub fn set_selected(&self, selected: Option<Uuid>) {
        self.store.update(|state| state.selected = selected);
    }

    pub fn objects(&self) -> Vec<ObjectRef> {
        self.store.read(|state| state.objects.clone())
    }

    pub fn selected(&self) -> Option<Uuid> {
        self.store.read(|state| state.selected)
    }

    /// Subscribes to selection changes, suppressed by value equality.
    pub fn subscribe_selected(
        &self,
        callback: impl FnMut(&Option<Uuid>) + Send + 'static,
    ) -> Subscription {
        self.store.subscribe(|state| state.selected, callback)
    }

    /// Subscribes to object-list changes.
    pub fn subscribe_objects(
        &self,
        callback: impl FnMut(&Vec<ObjectRef>) + Send + 'static,
    ) -> Subscription {
        self.store.subscribe(|state| state.objects.clone(), callback)
    }

    /// The underlying store, for custom selectors.
    pub fn store(&self) -> &Store<SelectionState> {
        &self.store
    }
}

impl Default for SelectionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(name: &str) -> ObjectRef {
        ObjectRef::new(Uuid::new_v4(), name)
    }

    #[test]
    fn test_selected_subscriber_sees_changes() {
        let store = SelectionStore::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let _sub = {
            let seen = Arc::clone(&seen);
            store.subscribe_selected(move |selected| seen.lock().push(*selected))
        };

        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        store.set_selected(Some(a));
        store.set_selected(Some(b));
        store.set_selected(None);

        assert_eq!(*seen.lock(), vec![Some(a), Some(b), None]);
    }

    #[test]
    fn test_same_value_set_is_suppressed() {
        let store = SelectionStore::new();
        let calls = Arc::new(Mutex::new(0));

        let _sub = {
            let calls = Arc::clone(&calls);
            store.subscribe_selected(move |_| *calls.lock() += 1)
        };

        let id = Uuid::new_v4();
        store.set_selected(Some(id));
        store.set_selected(Some(id));
        store.set_selected(Some(id));

        assert_eq!(*calls.lock(), 1);
    }

    #[test]
    fn test_objects_watcher_not_notified_for_selection() {
        let store = SelectionStore::new();
        let object_calls = Arc::new(Mutex::new(0));
        let selected_calls = Arc::new(Mutex::new(0));

        let _objects = {
            let calls = Arc::clone(&object_calls);
            store.subscribe_objects(move |_| *calls.lock() += 1)
        };
        let _selected = {
            let calls = Arc::clone(&selected_calls);
            store.subscribe_selected(move |_| *calls.lock() += 1)
        };

        store.set_objects(vec![object("Box-0"), object("Box-1")]);
        store.set_selected(Some(Uuid::new_v4()));

        assert_eq!(*object_calls.lock(), 1);
        assert_eq!(*selected_calls.lock(), 1);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let store = SelectionStore::new();
        let calls = Arc::new(Mutex::new(0));

        let sub = {
            let calls = Arc::clone(&calls);
            store.subscribe_selected(move |_| *calls.lock() += 1)
        };

        store.set_selected(Some(Uuid::new_v4()));
        sub.unsubscribe();
        store.set_selected(Some(Uuid::new_v4()));

        assert_eq!(*calls.lock(), 1);
    }

    #[test]
    fn test_dropping_handle_unsubscribes() {
        let store = SelectionStore::new();
        let calls = Arc::new(Mutex::new(0));

        {
            let calls = Arc::clone(&calls);
            let _sub = store.subscribe_selected(move |_| *calls.lock() += 1);
        }

        store.set_selected(Some(Uuid::new_v4()));
        assert_eq!(*calls.lock(), 0);
    }

    #[test]
    fn test_selection_outside_objects_is_accepted() {
        let store = SelectionStore::new();
        store.set_objects(vec![object("Box-0")]);

        let orphan = Uuid::new_v4();
        store.set_selected(Some(orphan));

        assert_eq!(store.selected(), Some(orphan));
        assert!(!store.objects().iter().any(|o| o.id == orphan));
    }

    #[test]
    fn test_reentrant_update_is_dispatched_in_order() {
        let store = SelectionStore::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let _sub = {
            let seen = Arc::clone(&seen);
            let chained = store.clone();
            store.subscribe_selected(move |selected| {
                seen.lock().push(*selected);
                if *selected == Some(a) {
                    chained.set_selected(Some(b));
                }
            })
        };

        store.set_selected(Some(a));

        assert_eq!(*seen.lock(), vec![Some(a), Some(b)]);
        assert_eq!(store.selected(), Some(b));
    }

    #[test]
    fn test_custom_selector_with_custom_equality() {
        let store = SelectionStore::new();
        let calls = Arc::new(Mutex::new(Vec::new()));

        // Watch only the number of objects, ignoring their contents.
        let _sub = {
            let calls = Arc::clone(&calls);
            store.store().subscribe_with(
                |state| state.objects.len(),
                |a, b| a == b,
                move |len| calls.lock().push(*len),
            )
        };

        store.set_objects(vec![object("Box-0")]);
        store.set_objects(vec![object("Box-renamed")]);
        store.set_objects(vec![object("Box-0"), object("Box-1")]);

        assert_eq!(*calls.lock(), vec![1, 2]);
    }
}
