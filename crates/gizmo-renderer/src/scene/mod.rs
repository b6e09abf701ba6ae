//! Scene management for selectable objects
//!
//! The scene is the single source of truth for object state on the
//! rendering side. Objects keep their insertion order, which is also the
//! order the selection store lists them in.

mod bounds;
mod render_object;

pub use bounds::*;
pub use render_object::*;

use gizmo_core::ObjectRef;
use uuid::Uuid;

/// Ordered collection of renderable objects plus selection bookkeeping.
pub struct Scene {
    objects: Vec<RenderObject>,
    selected: Option<Uuid>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            selected: None,
        }
    }

    /// Adds an object, keeping insertion order.
    pub fn add_object(&mut self, object: RenderObject) -> Uuid {
        let id = object.id;
        self.objects.push(object);
        id
    }

    pub fn get_object(&self, id: Uuid) -> Option<&RenderObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn get_object_mut(&mut self, id: Uuid) -> Option<&mut RenderObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    pub fn remove_object(&mut self, id: Uuid) -> Option<RenderObject> {
        if self.selected == Some(id) {
            self.selected = None;
        }
        let index = self.objects.iter().position(|o| o.id == id)?;
        Some(self.objects.remove(index))
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.objects.iter().any(|o| o.id == id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn clear(&mut self) {
        self.objects.clear();
        self.selected = None;
    }

    /// Objects in insertion order.
    pub fn objects(&self) -> impl Iterator<Item = &RenderObject> {
        self.objects.iter()
    }

    pub fn objects_mut(&mut self) -> impl Iterator<Item = &mut RenderObject> {
        self.objects.iter_mut()
    }

    /// Store-facing handles for every object, in insertion order.
    pub fn object_refs(&self) -> Vec<ObjectRef> {
        self.objects
            .iter()
            .map(|o| ObjectRef::new(o.id, o.name.clone()))
            .collect()
    }

    pub fn selected(&self) -> Option<Uuid> {
        self.selected
    }

    /// Sets the selected object, updating the per-object flags used for
    /// highlight rendering.
    pub fn set_selected(&mut self, id: Option<Uuid>) {
        if self.selected == id {
            return;
        }
        if let Some(prev_id) = self.selected
            && let Some(object) = self.get_object_mut(prev_id)
        {
            object.selected = false;
        }

        self.selected = id;
        if let Some(new_id) = id
            && let Some(object) = self.get_object_mut(new_id)
        {
            object.selected = true;
        }
    }

    pub fn selected_object(&self) -> Option<&RenderObject> {
        self.selected.and_then(|id| self.get_object(id))
    }

    /// Bounding box of all visible objects.
    pub fn compute_bounds(&self) -> Option<BoundingBox> {
        let mut result: Option<BoundingBox> = None;
        for object in &self.objects {
            if !object.visible {
                continue;
            }
            let world = object.world_bounds();
            result = Some(match result {
                Some(current) => current.union(&world),
                None => world,
            });
        }
        result
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use glam::{Mat4, Vec3};

    use crate::resources::MeshHandle;

    use super::*;

    fn named_object(name: &str) -> RenderObject {
        RenderObject::new(
            name,
            MeshHandle::default(),
            BoundingBox::new(Vec3::splat(-0.5), Vec3::splat(0.5)),
        )
    }

    #[test]
    fn test_object_refs_preserve_insertion_order() {
        let mut scene = Scene::new();
        for i in 0..5 {
            scene.add_object(named_object(&format!("Box-{i}")));
        }

        let names: Vec<String> = scene.object_refs().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Box-0", "Box-1", "Box-2", "Box-3", "Box-4"]);
    }

    #[test]
    fn test_selection_flags_follow_selected_id() {
        let mut scene = Scene::new();
        let a = scene.add_object(named_object("a"));
        let b = scene.add_object(named_object("b"));

        scene.set_selected(Some(a));
        assert!(scene.get_object(a).unwrap().selected);

        scene.set_selected(Some(b));
        assert!(!scene.get_object(a).unwrap().selected);
        assert!(scene.get_object(b).unwrap().selected);

        scene.set_selected(None);
        assert!(!scene.get_object(b).unwrap().selected);
    }

    #[test]
    fn test_removing_selected_object_clears_selection() {
        let mut scene = Scene::new();
        let id = scene.add_object(named_object("a"));
        scene.set_selected(Some(id));

        scene.remove_object(id);
        assert_eq!(scene.selected(), None);
        assert!(scene.is_empty());
    }

    #[test]
    fn test_compute_bounds_skips_hidden_objects() {
        let mut scene = Scene::new();
        scene.add_object(
            named_object("visible").with_transform(Mat4::from_translation(Vec3::X * 2.0)),
        );
        scene.add_object(
            named_object("hidden")
                .with_transform(Mat4::from_translation(Vec3::X * 100.0))
                .with_visible(false),
        );

        let bounds = scene.compute_bounds().unwrap();
        assert!(bounds.max.x < 10.0);
    }
}
