//! Render object definition

use glam::{Mat4, Vec3};
use uuid::Uuid;

use super::BoundingBox;
use crate::resources::MeshHandle;

/// A selectable object in the scene.
///
/// Holds everything needed to draw and pick the object; the GPU mesh data
/// lives in the MeshManager and is referenced by handle.
#[derive(Debug, Clone)]
pub struct RenderObject {
    /// Unique identifier for this object.
    pub id: Uuid,

    /// Display name, unique within the scene.
    pub name: String,

    /// Handle to the mesh data stored in the MeshManager.
    pub mesh: MeshHandle,

    /// World transform matrix.
    pub transform: Mat4,

    /// Base color (RGBA).
    pub color: [f32; 4],

    /// Whether this object is visible.
    pub visible: bool,

    /// Whether this object is selected.
    pub selected: bool,

    /// Local bounding box (before transform).
    pub bounds: BoundingBox,
}

impl RenderObject {
    pub fn new(name: impl Into<String>, mesh: MeshHandle, bounds: BoundingBox) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            mesh,
            transform: Mat4::IDENTITY,
            color: [0.8, 0.8, 0.8, 1.0],
            visible: true,
            selected: false,
            bounds,
        }
    }

    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Translation part of the world transform.
    pub fn position(&self) -> Vec3 {
        self.transform.w_axis.truncate()
    }

    /// Moves the object by `delta` in world space.
    pub fn translate(&mut self, delta: Vec3) {
        self.transform = Mat4::from_translation(delta) * self.transform;
    }

    /// Rotates the object by `angle` radians about the world `axis` running
    /// through its own origin.
    pub fn rotate_about_self(&mut self, axis: Vec3, angle: f32) {
        let origin = self.position();
        self.transform = Mat4::from_translation(origin)
            * Mat4::from_axis_angle(axis, angle)
            * Mat4::from_translation(-origin)
            * self.transform;
    }

    /// World-space bounding box.
    pub fn world_bounds(&self) -> BoundingBox {
        self.bounds.transform(&self.transform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object_at(position: Vec3) -> RenderObject {
        RenderObject::new(
            "test",
            MeshHandle::default(),
            BoundingBox::new(Vec3::splat(-0.5), Vec3::splat(0.5)),
        )
        .with_transform(Mat4::from_translation(position))
    }

    #[test]
    fn test_translate_accumulates() {
        let mut object = object_at(Vec3::new(1.0, 0.0, 0.0));
        object.translate(Vec3::new(0.0, 2.0, 0.0));
        object.translate(Vec3::new(0.0, 0.0, 3.0));
        assert_eq!(object.position(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_rotation_about_self_keeps_position() {
        let mut object = object_at(Vec3::new(4.0, 5.0, 6.0));
        object.rotate_about_self(Vec3::Z, 1.2);
        assert!(object.position().distance(Vec3::new(4.0, 5.0, 6.0)) < 1e-4);
    }

    #[test]
    fn test_world_bounds_follow_transform() {
        let object = object_at(Vec3::new(10.0, 0.0, 0.0));
        let bounds = object.world_bounds();
        assert!((bounds.center().x - 10.0).abs() < 1e-5);
    }
}
