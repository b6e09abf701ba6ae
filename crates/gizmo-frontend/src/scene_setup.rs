//! Demo scene bootstrap

use glam::{Mat4, Vec3};
use rand::Rng;

use gizmo_core::ObjectRef;
use gizmo_renderer::{RenderObject, Renderer};
use gizmo_renderer::resources::primitives;

use crate::config::SceneConfig;

const BOX_COLORS: [[f32; 4]; 5] = [
    [0.65, 0.70, 0.80, 1.0],
    [0.75, 0.60, 0.55, 1.0],
    [0.58, 0.72, 0.60, 1.0],
    [0.72, 0.68, 0.52, 1.0],
    [0.60, 0.62, 0.74, 1.0],
];

/// Fills the scene with selectable boxes at random positions and returns
/// their store-facing handles, in creation order.
pub fn populate_scene(renderer: &mut Renderer, config: &SceneConfig) -> Vec<ObjectRef> {
    let data = primitives::unit_box();
    let bounds = data.bounds;
    let mesh = renderer.upload_mesh(data);

    let mut rng = rand::thread_rng();
    let spread = config.spread;

    for i in 0..config.box_count {
        let position = Vec3::new(
            rng.gen_range(-spread..spread),
            rng.gen_range(-spread..spread),
            rng.gen_range(0.0..spread * 0.5),
        );
        renderer.insert_object(
            RenderObject::new(format!("Box-{i}"), mesh, bounds)
                .with_transform(Mat4::from_translation(position))
                .with_color(BOX_COLORS[i % BOX_COLORS.len()]),
        );
    }

    tracing::info!("scene populated with {} boxes", config.box_count);
    renderer.scene().object_refs()
}
