//! Drag events and the observable primitive used at the engine boundary

use glam::{Vec2, Vec3};

/// Transform group a manipulation handle belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GizmoMode {
    Translate,
    Rotate,
}

/// Manipulation axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GizmoAxis {
    X,
    Y,
    Z,
}

impl GizmoAxis {
    /// World-space unit direction of this axis.
    pub fn direction(&self) -> Vec3 {
        match self {
            GizmoAxis::X => Vec3::X,
            GizmoAxis::Y => Vec3::Y,
            GizmoAxis::Z => Vec3::Z,
        }
    }
}

/// One of the six manipulation handles (translation and rotation, per axis).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GizmoHandle {
    pub mode: GizmoMode,
    pub axis: GizmoAxis,
}

impl GizmoHandle {
    /// All six handles, translation first.
    pub const ALL: [GizmoHandle; 6] = [
        GizmoHandle::new(GizmoMode::Translate, GizmoAxis::X),
        GizmoHandle::new(GizmoMode::Translate, GizmoAxis::Y),
        GizmoHandle::new(GizmoMode::Translate, GizmoAxis::Z),
        GizmoHandle::new(GizmoMode::Rotate, GizmoAxis::X),
        GizmoHandle::new(GizmoMode::Rotate, GizmoAxis::Y),
        GizmoHandle::new(GizmoMode::Rotate, GizmoAxis::Z),
    ];

    pub const fn new(mode: GizmoMode, axis: GizmoAxis) -> Self {
        Self { mode, axis }
    }
}

/// Raw pointer data carried by a drag sample.
///
/// Absent for synthetic events (e.g. drags raised programmatically).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    /// Pointer position in viewport pixels.
    pub position: Vec2,
}

/// One manipulation-drag sample.
///
/// Produced continuously while a handle is being dragged; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct DragEvent {
    /// The handle that produced this sample.
    pub handle: GizmoHandle,
    /// Displacement applied by this sample (world units, or axis * radians
    /// for rotation handles).
    pub delta: Vec3,
    /// Reference point of the drag plane.
    pub drag_plane_point: Vec3,
    /// Normal of the drag plane.
    pub drag_plane_normal: Vec3,
    /// Cumulative drag distance since the gesture started.
    pub drag_distance: f32,
    /// Identifier of the input pointer producing the drag.
    pub pointer_id: u64,
    /// Raw pointer data, if the sample came from a real pointer.
    pub pointer: Option<PointerSample>,
}

/// Identifier of a registered observer, stable until removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

struct Observer<T> {
    id: ObserverId,
    callback: Box<dyn FnMut(&T) + Send>,
}

/// Ordered listener list, the notification primitive of the rig boundary.
///
/// Observers are invoked in registration order. Removal by id is stable
/// with respect to the other registrations.
pub struct Observable<T> {
    observers: Vec<Observer<T>>,
    next_id: u64,
}

impl<T> Observable<T> {
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
            next_id: 1,
        }
    }

    /// Registers an observer and returns its id.
    pub fn add(&mut self, callback: impl FnMut(&T) + Send + 'static) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push(Observer {
            id,
            callback: Box::new(callback),
        });
        id
    }

    /// Removes an observer. Returns false if the id was not registered.
    pub fn remove(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|o| o.id != id);
        self.observers.len() != before
    }

    /// Invokes every observer with `event`, in registration order.
    pub fn notify(&mut self, event: &T) {
        for observer in &mut self.observers {
            (observer.callback)(event);
        }
    }

    /// Drops all observers.
    pub fn clear(&mut self) {
        self.observers.clear();
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl<T> Default for Observable<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;

    #[test]
    fn test_observers_invoked_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut observable = Observable::new();

        for tag in ["a", "b", "c"] {
            let log = Arc::clone(&log);
            observable.add(move |value: &i32| log.lock().push((tag, *value)));
        }

        observable.notify(&7);
        assert_eq!(*log.lock(), vec![("a", 7), ("b", 7), ("c", 7)]);
    }

    #[test]
    fn test_removed_observer_no_longer_fires() {
        let count = Arc::new(Mutex::new(0));
        let mut observable = Observable::new();

        let id = {
            let count = Arc::clone(&count);
            observable.add(move |_: &()| *count.lock() += 1)
        };

        observable.notify(&());
        assert!(observable.remove(id));
        observable.notify(&());

        assert_eq!(*count.lock(), 1);
        assert!(!observable.remove(id));
    }

    #[test]
    fn test_handle_list_covers_both_modes() {
        let translate = GizmoHandle::ALL
            .iter()
            .filter(|h| h.mode == GizmoMode::Translate)
            .count();
        let rotate = GizmoHandle::ALL
            .iter()
            .filter(|h| h.mode == GizmoMode::Rotate)
            .count();
        assert_eq!(translate, 3);
        assert_eq!(rotate, 3);
    }
}
