//! The manipulation rig
//!
//! [`GizmoManager`] owns the six manipulation handles for the scene:
//! translation arrows and rotation rings on each world axis. The viewport
//! feeds it pointer rays; it hit-tests handles, runs the drag-plane math,
//! applies the resulting transform to the attached object, and raises the
//! per-handle drag observables the relay listens on.
//!
//! Drawing is separate: [`crate::sub_renderers::GizmoSubRenderer`] reads
//! this manager's state each frame.

use std::collections::HashMap;
use std::sync::Arc;

use glam::Vec3;
use parking_lot::Mutex;
use uuid::Uuid;

use gizmo_core::{
    DragEvent, GizmoHandle, GizmoMode, ManipulatorRig, Observable, PointerSample,
};

use crate::constants::gizmo as constants;
use crate::picking;
use crate::resources::MeshManager;
use crate::scene::Scene;

/// Shared handle to the rig, cloned into the relay and the sub-renderer.
pub type SharedGizmoManager = Arc<Mutex<GizmoManager>>;

struct ActiveDrag {
    handle: GizmoHandle,
    pointer_id: u64,
    plane_point: Vec3,
    plane_normal: Vec3,
    /// Translation: last drag-plane hit. Rotation: last unit direction
    /// from the center to the hit.
    last: Vec3,
    total_distance: f32,
}

/// The engine side of the manipulation handle set.
pub struct GizmoManager {
    translation_enabled: bool,
    rotation_enabled: bool,
    pointer_attach_enabled: bool,
    attached: Option<Uuid>,
    hovered: Option<GizmoHandle>,
    active: Option<ActiveDrag>,
    drag_observables: HashMap<GizmoHandle, Observable<DragEvent>>,
    attachment_observable: Observable<Option<Uuid>>,
    disposed: bool,
}

impl GizmoManager {
    pub fn new() -> Self {
        Self {
            translation_enabled: false,
            rotation_enabled: false,
            pointer_attach_enabled: false,
            attached: None,
            hovered: None,
            active: None,
            drag_observables: HashMap::new(),
            attachment_observable: Observable::new(),
            disposed: false,
        }
    }

    pub fn translation_enabled(&self) -> bool {
        self.translation_enabled
    }

    pub fn rotation_enabled(&self) -> bool {
        self.rotation_enabled
    }

    /// Handle under the pointer, when not dragging.
    pub fn hovered(&self) -> Option<GizmoHandle> {
        self.hovered
    }

    /// Handle currently being dragged.
    pub fn active_handle(&self) -> Option<GizmoHandle> {
        self.active.as_ref().map(|drag| drag.handle)
    }

    /// World position the handles are anchored at.
    pub fn anchor(&self, scene: &Scene) -> Option<Vec3> {
        let id = self.attached?;
        scene.get_object(id).map(|object| object.position())
    }

    /// Handles a pointer press at the given world ray.
    ///
    /// Returns true when a handle drag started (the viewport should route
    /// subsequent moves here instead of the camera). A press that lands on
    /// no handle attaches via picking when pointer-attach is enabled.
    pub fn pointer_pressed(
        &mut self,
        scene: &Scene,
        meshes: &MeshManager,
        ray_origin: Vec3,
        ray_dir: Vec3,
        pointer_id: u64,
        _pointer: PointerSample,
    ) -> bool {
        if self.disposed {
            return false;
        }

        if let Some(center) = self.anchor(scene)
            && let Some((handle, _)) = self.hit_test_handles(center, ray_origin, ray_dir)
        {
            let plane_normal = drag_plane_normal(handle, ray_dir);
            let Some(hit) = ray_plane_intersection(ray_origin, ray_dir, center, plane_normal)
            else {
                return false;
            };
            let last = match handle.mode {
                GizmoMode::Translate => hit,
                GizmoMode::Rotate => {
                    let Some(direction) = (hit - center).try_normalize() else {
                        return false;
                    };
                    direction
                }
            };
            self.active = Some(ActiveDrag {
                handle,
                pointer_id,
                plane_point: center,
                plane_normal,
                last,
                total_distance: 0.0,
            });
            self.hovered = Some(handle);
            return true;
        }

        if self.pointer_attach_enabled {
            match picking::pick_with_ray(ray_origin, ray_dir, scene, meshes) {
                Some((id, _)) => self.attach(Some(id)),
                None => self.attach(None),
            }
        }
        false
    }

    /// Handles a pointer move. Applies the drag to the attached object and
    /// raises the handle's drag observable; returns true while dragging.
    pub fn pointer_moved(
        &mut self,
        scene: &mut Scene,
        ray_origin: Vec3,
        ray_dir: Vec3,
        pointer: PointerSample,
    ) -> bool {
        if self.disposed {
            return false;
        }

        let Some(mut drag) = self.active.take() else {
            self.update_hover(scene, ray_origin, ray_dir);
            return false;
        };

        let Some(hit) =
            ray_plane_intersection(ray_origin, ray_dir, drag.plane_point, drag.plane_normal)
        else {
            // Pointer left the drag plane (grazing ray); keep the drag alive.
            self.active = Some(drag);
            return true;
        };

        let event = self
            .attached
            .and_then(|id| scene.get_object_mut(id))
            .and_then(|object| {
                let axis = drag.handle.axis.direction();
                let delta = match drag.handle.mode {
                    GizmoMode::Translate => {
                        let delta = axis * (hit - drag.last).dot(axis);
                        object.translate(delta);
                        drag.last = hit;
                        drag.total_distance += delta.length();
                        delta
                    }
                    GizmoMode::Rotate => {
                        let direction = (hit - drag.plane_point).try_normalize()?;
                        let angle = drag
                            .last
                            .cross(direction)
                            .dot(axis)
                            .atan2(drag.last.dot(direction));
                        object.rotate_about_self(axis, angle);
                        drag.last = direction;
                        drag.total_distance += angle.abs();
                        axis * angle
                    }
                };
                Some(DragEvent {
                    handle: drag.handle,
                    delta,
                    drag_plane_point: drag.plane_point,
                    drag_plane_normal: drag.plane_normal,
                    drag_distance: drag.total_distance,
                    pointer_id: drag.pointer_id,
                    pointer: Some(pointer),
                })
            });

        let handle = drag.handle;
        self.active = Some(drag);

        if let Some(event) = event {
            self.drag_observables
                .entry(handle)
                .or_default()
                .notify(&event);
        }
        true
    }

    /// Ends the current drag, if any.
    pub fn pointer_released(&mut self) {
        self.active = None;
    }

    fn update_hover(&mut self, scene: &Scene, ray_origin: Vec3, ray_dir: Vec3) {
        self.hovered = self
            .anchor(scene)
            .and_then(|center| self.hit_test_handles(center, ray_origin, ray_dir))
            .map(|(handle, _)| handle);
    }

    /// Closest handle hit by the ray, if any.
    fn hit_test_handles(
        &self,
        center: Vec3,
        ray_origin: Vec3,
        ray_dir: Vec3,
    ) -> Option<(GizmoHandle, f32)> {
        let mut closest: Option<(GizmoHandle, f32)> = None;

        for handle in GizmoHandle::ALL {
            let enabled = match handle.mode {
                GizmoMode::Translate => self.translation_enabled,
                GizmoMode::Rotate => self.rotation_enabled,
            };
            if !enabled {
                continue;
            }

            let axis = handle.axis.direction();
            let hit = match handle.mode {
                GizmoMode::Translate => hit_test_arrow(center, axis, ray_origin, ray_dir),
                GizmoMode::Rotate => hit_test_ring(center, axis, ray_origin, ray_dir),
            };

            if let Some(t) = hit {
                match closest {
                    None => closest = Some((handle, t)),
                    Some((_, current)) if t < current => closest = Some((handle, t)),
                    _ => {}
                }
            }
        }

        closest
    }
}

impl Default for GizmoManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ManipulatorRig for GizmoManager {
    fn set_translation_enabled(&mut self, enabled: bool) {
        self.translation_enabled = enabled;
    }

    fn set_rotation_enabled(&mut self, enabled: bool) {
        self.rotation_enabled = enabled;
    }

    fn set_pointer_attach_enabled(&mut self, enabled: bool) {
        self.pointer_attach_enabled = enabled;
    }

    fn drag_observable(&mut self, handle: GizmoHandle) -> &mut Observable<DragEvent> {
        self.drag_observables.entry(handle).or_default()
    }

    fn attachment_observable(&mut self) -> &mut Observable<Option<Uuid>> {
        &mut self.attachment_observable
    }

    fn attach(&mut self, target: Option<Uuid>) {
        if self.disposed || self.attached == target {
            return;
        }
        self.attached = target;
        self.active = None;
        self.hovered = None;
        self.attachment_observable.notify(&target);
    }

    fn attached(&self) -> Option<Uuid> {
        self.attached
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.attached = None;
        self.active = None;
        self.hovered = None;
        for observable in self.drag_observables.values_mut() {
            observable.clear();
        }
        self.attachment_observable.clear();
        tracing::debug!("gizmo manager disposed");
    }
}

/// Normal of the plane a handle drags across.
///
/// Translation drags across the plane that contains the axis and faces the
/// viewer; rotation drags across the plane the ring lies in.
fn drag_plane_normal(handle: GizmoHandle, ray_dir: Vec3) -> Vec3 {
    let axis = handle.axis.direction();
    match handle.mode {
        GizmoMode::Rotate => axis,
        GizmoMode::Translate => {
            let toward_view = ray_dir - axis * ray_dir.dot(axis);
            toward_view
                .try_normalize()
                .unwrap_or_else(|| axis.any_orthonormal_vector())
        }
    }
}

fn ray_plane_intersection(
    ray_origin: Vec3,
    ray_dir: Vec3,
    plane_point: Vec3,
    plane_normal: Vec3,
) -> Option<Vec3> {
    const EPSILON: f32 = 1e-6;

    let denom = ray_dir.dot(plane_normal);
    if denom.abs() < EPSILON {
        return None;
    }
    let t = (plane_point - ray_origin).dot(plane_normal) / denom;
    if t < 0.0 {
        return None;
    }
    Some(ray_origin + ray_dir * t)
}

/// Distance along the ray to a translation arrow, if within the pick
/// threshold of its segment.
fn hit_test_arrow(center: Vec3, axis: Vec3, ray_origin: Vec3, ray_dir: Vec3) -> Option<f32> {
    let w0 = ray_origin - center;
    let b = ray_dir.dot(axis);
    let d = ray_dir.dot(w0);
    let e = axis.dot(w0);
    let denom = 1.0 - b * b;

    // Closest point on the infinite arrow line to the ray line, clamped to
    // the arrow segment. Parallel rays project the origin instead.
    let s = if denom.abs() < 1e-6 {
        e
    } else {
        (e - b * d) / denom
    };
    let s = s.clamp(0.0, constants::ARROW_LENGTH);

    let on_segment = center + axis * s;
    let t = (on_segment - ray_origin).dot(ray_dir).max(0.0);
    let on_ray = ray_origin + ray_dir * t;

    (on_ray.distance(on_segment) <= constants::PICK_THRESHOLD).then_some(t)
}

/// Distance along the ray to a rotation ring, if the plane hit lands within
/// the pick threshold of the circle.
fn hit_test_ring(center: Vec3, axis: Vec3, ray_origin: Vec3, ray_dir: Vec3) -> Option<f32> {
    let hit = ray_plane_intersection(ray_origin, ray_dir, center, axis)?;
    let radial = (hit - center).length();
    if (radial - constants::RING_RADIUS).abs() > constants::PICK_THRESHOLD {
        return None;
    }
    Some(hit.distance(ray_origin))
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use gizmo_core::{GizmoAxis, SelectionStore, SharedRig};

    use crate::resources::primitives::unit_box;
    use crate::scene::RenderObject;

    use super::*;

    fn pointer() -> PointerSample {
        PointerSample {
            position: Vec2::ZERO,
        }
    }

    /// Scene with one unit box at the origin and a rig with every group
    /// enabled, mirroring what the relay configures.
    fn fixture() -> (Scene, MeshManager, Uuid, GizmoManager) {
        let mut meshes = MeshManager::new();
        let data = unit_box();
        let handle = meshes.insert_cpu_for_tests(data.clone());

        let mut scene = Scene::new();
        let id = scene.add_object(RenderObject::new("Box-0", handle, data.bounds));

        let mut manager = GizmoManager::new();
        manager.set_translation_enabled(true);
        manager.set_rotation_enabled(true);
        manager.set_pointer_attach_enabled(true);
        (scene, meshes, id, manager)
    }

    #[test]
    fn test_click_on_object_attaches_and_notifies() {
        let (scene, meshes, id, mut manager) = fixture();
        let notified = Arc::new(Mutex::new(Vec::new()));
        {
            let notified = Arc::clone(&notified);
            manager
                .attachment_observable()
                .add(move |target: &Option<Uuid>| notified.lock().push(*target));
        }

        let consumed = manager.pointer_pressed(
            &scene,
            &meshes,
            Vec3::new(0.0, -10.0, 0.0),
            Vec3::Y,
            1,
            pointer(),
        );

        assert!(!consumed);
        assert_eq!(manager.attached(), Some(id));
        assert_eq!(*notified.lock(), vec![Some(id)]);
    }

    #[test]
    fn test_click_on_empty_space_detaches() {
        let (scene, meshes, id, mut manager) = fixture();
        manager.attach(Some(id));

        manager.pointer_pressed(
            &scene,
            &meshes,
            Vec3::new(50.0, -10.0, 0.0),
            Vec3::Y,
            1,
            pointer(),
        );

        assert_eq!(manager.attached(), None);
    }

    #[test]
    fn test_redundant_attach_is_suppressed() {
        let (_, _, id, mut manager) = fixture();
        let count = Arc::new(Mutex::new(0));
        {
            let count = Arc::clone(&count);
            manager
                .attachment_observable()
                .add(move |_: &Option<Uuid>| *count.lock() += 1);
        }

        manager.attach(Some(id));
        manager.attach(Some(id));

        assert_eq!(*count.lock(), 1);
    }

    #[test]
    fn test_translate_drag_moves_object_along_axis() {
        let (mut scene, meshes, id, mut manager) = fixture();
        manager.attach(Some(id));

        let events = Arc::new(Mutex::new(Vec::new()));
        {
            let events = Arc::clone(&events);
            manager
                .drag_observable(GizmoHandle::new(GizmoMode::Translate, GizmoAxis::X))
                .add(move |event: &DragEvent| events.lock().push(event.clone()));
        }

        // Press near the middle of the +X arrow.
        let began = manager.pointer_pressed(
            &scene,
            &meshes,
            Vec3::new(0.8, -10.0, 0.0),
            Vec3::Y,
            7,
            pointer(),
        );
        assert!(began);
        assert_eq!(
            manager.active_handle(),
            Some(GizmoHandle::new(GizmoMode::Translate, GizmoAxis::X))
        );

        // Drag half a unit along +X.
        let dragging = manager.pointer_moved(
            &mut scene,
            Vec3::new(1.3, -10.0, 0.0),
            Vec3::Y,
            pointer(),
        );
        assert!(dragging);

        let position = scene.get_object(id).unwrap().position();
        assert!(position.distance(Vec3::new(0.5, 0.0, 0.0)) < 1e-4);

        let events = events.lock();
        assert_eq!(events.len(), 1);
        assert!(events[0].delta.distance(Vec3::new(0.5, 0.0, 0.0)) < 1e-4);
        assert!((events[0].drag_distance - 0.5).abs() < 1e-4);
        assert_eq!(events[0].pointer_id, 7);
        assert!(events[0].pointer.is_some());
    }

    #[test]
    fn test_rotate_drag_turns_object_about_axis() {
        let (mut scene, meshes, id, mut manager) = fixture();
        manager.attach(Some(id));

        let events = Arc::new(Mutex::new(Vec::new()));
        {
            let events = Arc::clone(&events);
            manager
                .drag_observable(GizmoHandle::new(GizmoMode::Rotate, GizmoAxis::Z))
                .add(move |event: &DragEvent| events.lock().push(event.clone()));
        }

        // Press on the Z ring at its XY diagonal, clear of the arrows.
        let on_ring = constants::RING_RADIUS / 2f32.sqrt();
        let began = manager.pointer_pressed(
            &scene,
            &meshes,
            Vec3::new(on_ring, on_ring, 10.0),
            Vec3::NEG_Z,
            1,
            pointer(),
        );
        assert!(began);
        assert_eq!(
            manager.active_handle(),
            Some(GizmoHandle::new(GizmoMode::Rotate, GizmoAxis::Z))
        );

        // Sweep the pointer a quarter turn around the ring.
        manager.pointer_moved(
            &mut scene,
            Vec3::new(-on_ring, on_ring, 10.0),
            Vec3::NEG_Z,
            pointer(),
        );

        let events = events.lock();
        assert_eq!(events.len(), 1);
        let expected = Vec3::Z * std::f32::consts::FRAC_PI_2;
        assert!(events[0].delta.distance(expected) < 1e-3);

        // The box itself rotated: its +X face normal now points along +Y.
        let transform = scene.get_object(id).unwrap().transform;
        let rotated_x = transform.transform_vector3(Vec3::X);
        assert!(rotated_x.distance(Vec3::Y) < 1e-3);
    }

    #[test]
    fn test_release_ends_the_drag() {
        let (mut scene, meshes, id, mut manager) = fixture();
        manager.attach(Some(id));

        manager.pointer_pressed(
            &scene,
            &meshes,
            Vec3::new(0.8, -10.0, 0.0),
            Vec3::Y,
            1,
            pointer(),
        );
        manager.pointer_released();

        let dragging = manager.pointer_moved(
            &mut scene,
            Vec3::new(1.3, -10.0, 0.0),
            Vec3::Y,
            pointer(),
        );
        assert!(!dragging);
        assert_eq!(scene.get_object(id).unwrap().position(), Vec3::ZERO);
    }

    #[test]
    fn test_disabled_translation_handles_are_not_pickable() {
        let (scene, meshes, id, mut manager) = fixture();
        manager.attach(Some(id));
        manager.set_translation_enabled(false);

        // The arrow press now falls through to pointer-attach picking, and
        // this ray misses the box.
        let began = manager.pointer_pressed(
            &scene,
            &meshes,
            Vec3::new(0.8, -10.0, 0.0),
            Vec3::Y,
            1,
            pointer(),
        );
        assert!(!began);
        assert_eq!(manager.attached(), None);
    }

    #[test]
    fn test_hover_tracks_handles_without_drag() {
        let (mut scene, meshes, id, mut manager) = fixture();
        manager.attach(Some(id));

        manager.pointer_moved(&mut scene, Vec3::new(0.8, -10.0, 0.0), Vec3::Y, pointer());
        assert_eq!(
            manager.hovered(),
            Some(GizmoHandle::new(GizmoMode::Translate, GizmoAxis::X))
        );

        manager.pointer_moved(&mut scene, Vec3::new(50.0, -10.0, 0.0), Vec3::Y, pointer());
        assert_eq!(manager.hovered(), None);
    }

    /// End-to-end wiring: the real rig behind the real relay and store.
    #[test]
    fn test_manager_relay_store_round_trip() {
        let (mut scene, meshes, id, mut manager) = fixture();
        // The relay enables the handle groups itself.
        manager.set_translation_enabled(false);
        manager.set_rotation_enabled(false);
        manager.set_pointer_attach_enabled(false);

        let shared = Arc::new(Mutex::new(manager));
        let store = SelectionStore::new();
        store.set_objects(scene.object_refs());

        let relay = gizmo_core::relay::acquire(store.clone(), {
            let shared = shared.clone();
            move || {
                let rig: SharedRig = shared;
                rig
            }
        });

        let seen = Arc::new(Mutex::new(Vec::new()));
        {
            let seen = Arc::clone(&seen);
            relay.lock().subscribe(
                move |event: &DragEvent| seen.lock().push(event.delta),
                None,
            );
        }

        // Engine side: click the box, drag the +X arrow.
        {
            let mut manager = shared.lock();
            manager.pointer_pressed(
                &scene,
                &meshes,
                Vec3::new(0.0, -10.0, 0.0),
                Vec3::Y,
                1,
                pointer(),
            );
        }
        assert_eq!(store.selected(), Some(id));

        {
            let mut manager = shared.lock();
            manager.pointer_pressed(
                &scene,
                &meshes,
                Vec3::new(0.8, -10.0, 0.0),
                Vec3::Y,
                1,
                pointer(),
            );
            manager.pointer_moved(
                &mut scene,
                Vec3::new(1.3, -10.0, 0.0),
                Vec3::Y,
                pointer(),
            );
        }
        assert_eq!(seen.lock().len(), 1);

        // Store side: clearing the selection detaches the rig.
        store.set_selected(None);
        assert_eq!(shared.lock().attached(), None);

        relay.lock().dispose();
    }
}
