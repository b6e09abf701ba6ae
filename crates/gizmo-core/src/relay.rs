//! Relay between the manipulation rig, the selection store, and consumers
//!
//! The relay owns the process-wide rig wiring: it forwards every drag
//! sample the rig raises into a single replaceable output stream
//! (optionally throttled), pushes engine-side attachments into the
//! selection store, and attaches the rig whenever the store's selection
//! changes.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use uuid::Uuid;

use crate::events::{DragEvent, GizmoHandle, ObserverId};
use crate::rig::SharedRig;
use crate::store::{SelectionStore, Subscription};
use crate::throttle::LeadingEdgeThrottle;

/// Shared handle to the process-wide relay.
pub type SharedGizmoRelay = Arc<Mutex<GizmoRelay>>;

struct OutputStream {
    id: u64,
    deliver: Box<dyn FnMut(&DragEvent) + Send>,
}

type StreamSlot = Arc<Mutex<Option<OutputStream>>>;

/// Unsubscribe handle for one `subscribe` call.
///
/// Cancels its own stream only; if a later `subscribe` already replaced
/// the stream, unsubscribing the stale handle is a no-op.
pub struct StreamSubscription {
    slot: StreamSlot,
    id: u64,
}

impl StreamSubscription {
    pub fn unsubscribe(self) {
        let mut slot = self.slot.lock();
        if slot.as_ref().is_some_and(|stream| stream.id == self.id) {
            *slot = None;
        }
    }
}

static ACTIVE: Mutex<Option<SharedGizmoRelay>> = Mutex::new(None);

/// Returns the live relay, constructing one only when none exists.
///
/// `rig_factory` runs exactly once per relay lifetime; repeat calls while
/// an instance is live return it unchanged and never touch the factory.
/// [`GizmoRelay::dispose`] clears the slot so the next call constructs a
/// fresh relay (and a fresh rig).
pub fn acquire(store: SelectionStore, rig_factory: impl FnOnce() -> SharedRig) -> SharedGizmoRelay {
    let mut active = ACTIVE.lock();
    if let Some(relay) = active.as_ref() {
        return Arc::clone(relay);
    }
    let relay = Arc::new(Mutex::new(GizmoRelay::new(store, rig_factory())));
    relay.lock().registered = true;
    *active = Some(Arc::clone(&relay));
    tracing::debug!("gizmo relay constructed");
    relay
}

/// Coordinates one rig, one store, and at most one output stream.
pub struct GizmoRelay {
    rig: SharedRig,
    stream: StreamSlot,
    next_stream_id: u64,
    drag_observers: Vec<(GizmoHandle, ObserverId)>,
    attachment_observer: Option<ObserverId>,
    store_subscription: Option<Subscription>,
    /// True when this instance occupies the process-wide slot.
    registered: bool,
    disposed: bool,
}

impl GizmoRelay {
    fn new(store: SelectionStore, rig: SharedRig) -> Self {
        let stream: StreamSlot = Arc::new(Mutex::new(None));
        // Marks a store update the relay itself pushed for an engine-side
        // attachment, so the store subscription does not call back into the
        // rig while the rig lock is held.
        let engine_attach: Arc<Mutex<Option<Option<Uuid>>>> = Arc::new(Mutex::new(None));

        let mut drag_observers = Vec::with_capacity(GizmoHandle::ALL.len());
        let attachment_observer;
        {
            let mut rig_ref = rig.lock();
            rig_ref.set_translation_enabled(true);
            rig_ref.set_rotation_enabled(true);
            rig_ref.set_pointer_attach_enabled(true);

            for handle in GizmoHandle::ALL {
                let slot = Arc::clone(&stream);
                let observer = rig_ref.drag_observable(handle).add(move |event| {
                    // No active stream means the event is silently dropped.
                    if let Some(stream) = slot.lock().as_mut() {
                        (stream.deliver)(event);
                    }
                });
                drag_observers.push((handle, observer));
            }

            attachment_observer = {
                let store = store.clone();
                let marker = Arc::clone(&engine_attach);
                rig_ref.attachment_observable().add(move |target| {
                    // Engine detaches are not forwarded to the store; only
                    // attachments select. See DESIGN.md.
                    if let Some(id) = *target {
                        *marker.lock() = Some(Some(id));
                        store.set_selected(Some(id));
                        *marker.lock() = None;
                    }
                })
            };
        }

        let store_subscription = {
            let rig = Arc::clone(&rig);
            let marker = Arc::clone(&engine_attach);
            store.subscribe_selected(move |selected| {
                if *marker.lock() == Some(*selected) {
                    // The rig initiated this update; it is already attached.
                    return;
                }
                let mut rig = rig.lock();
                if rig.attached() != *selected {
                    rig.attach(*selected);
                }
            })
        };

        Self {
            rig,
            stream,
            next_stream_id: 1,
            drag_observers,
            attachment_observer: Some(attachment_observer),
            store_subscription: Some(store_subscription),
            registered: false,
            disposed: false,
        }
    }

    /// Installs a fresh output stream, replacing any previous one.
    ///
    /// With `throttle` set, delivery is leading-edge: the first event in a
    /// window is forwarded immediately and events arriving before the
    /// window elapses are dropped. Without it, every drag sample is
    /// forwarded.
    ///
    /// The callback runs on the thread driving the rig, while the rig lock
    /// is held; it must not call back into the relay or the rig.
    pub fn subscribe(
        &mut self,
        mut callback: impl FnMut(&DragEvent) + Send + 'static,
        throttle: Option<Duration>,
    ) -> StreamSubscription {
        let id = self.next_stream_id;
        self.next_stream_id += 1;

        let deliver: Box<dyn FnMut(&DragEvent) + Send> = match throttle {
            Some(window) => {
                let mut gate = LeadingEdgeThrottle::new(window);
                Box::new(move |event: &DragEvent| {
                    if gate.admit(Instant::now()) {
                        callback(event);
                    }
                })
            }
            None => Box::new(callback),
        };

        *self.stream.lock() = Some(OutputStream { id, deliver });
        StreamSubscription {
            slot: Arc::clone(&self.stream),
            id,
        }
    }

    /// Terminates the current stream.
    ///
    /// The rig listeners stay in place; a later `subscribe` works against
    /// the same rig.
    pub fn unsubscribe(&mut self) {
        *self.stream.lock() = None;
    }

    /// The rig this relay drives.
    pub fn rig(&self) -> &SharedRig {
        &self.rig
    }

    /// Tears the relay down: detaches and disposes the rig, removes the
    /// rig listeners and the store subscription, and clears the
    /// process-wide slot so the next [`acquire`] constructs anew.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;

        {
            let mut rig = self.rig.lock();
            for (handle, observer) in self.drag_observers.drain(..) {
                rig.drag_observable(handle).remove(observer);
            }
            if let Some(observer) = self.attachment_observer.take() {
                rig.attachment_observable().remove(observer);
            }
            rig.attach(None);
            rig.dispose();
        }

        if let Some(subscription) = self.store_subscription.take() {
            subscription.unsubscribe();
        }
        *self.stream.lock() = None;
        if self.registered {
            self.registered = false;
            *ACTIVE.lock() = None;
        }
        tracing::debug!("gizmo relay disposed");
    }
}
