//! Ray picking of scene objects

use glam::Vec3;
use uuid::Uuid;

use crate::camera::Camera;
use crate::resources::MeshManager;
use crate::scene::Scene;

/// Picks the closest visible object at the given viewport position.
///
/// Returns the hit object's id and the ray distance, if any.
pub fn pick_object(
    camera: &Camera,
    screen_x: f32,
    screen_y: f32,
    width: f32,
    height: f32,
    scene: &Scene,
    meshes: &MeshManager,
) -> Option<(Uuid, f32)> {
    let (ray_origin, ray_dir) = camera.screen_to_ray(screen_x, screen_y, width, height);
    pick_with_ray(ray_origin, ray_dir, scene, meshes)
}

/// Picks the closest visible object along a world-space ray.
pub fn pick_with_ray(
    ray_origin: Vec3,
    ray_dir: Vec3,
    scene: &Scene,
    meshes: &MeshManager,
) -> Option<(Uuid, f32)> {
    let mut closest_hit: Option<(Uuid, f32)> = None;

    for object in scene.objects() {
        if !object.visible {
            continue;
        }

        // World-space AABB for early rejection.
        let world_bounds = object.world_bounds();
        if ray_aabb_intersection(ray_origin, ray_dir, world_bounds.min, world_bounds.max).is_none()
        {
            continue;
        }

        let Some(mesh) = meshes.cpu(object.mesh) else {
            continue;
        };

        // Exact test against every triangle.
        for [a, b, c] in mesh.triangles() {
            let v0 = object.transform.transform_point3(a);
            let v1 = object.transform.transform_point3(b);
            let v2 = object.transform.transform_point3(c);

            if let Some(t) = ray_triangle_intersection(ray_origin, ray_dir, v0, v1, v2) {
                match closest_hit {
                    None => closest_hit = Some((object.id, t)),
                    Some((_, current_t)) if t < current_t => closest_hit = Some((object.id, t)),
                    _ => {}
                }
            }
        }
    }

    closest_hit
}

/// Ray-AABB intersection (slab method).
///
/// Returns the distance to the entry point if the ray hits, None otherwise.
fn ray_aabb_intersection(
    ray_origin: Vec3,
    ray_dir: Vec3,
    bbox_min: Vec3,
    bbox_max: Vec3,
) -> Option<f32> {
    let inv_dir = Vec3::new(1.0 / ray_dir.x, 1.0 / ray_dir.y, 1.0 / ray_dir.z);

    let t1 = (bbox_min.x - ray_origin.x) * inv_dir.x;
    let t2 = (bbox_max.x - ray_origin.x) * inv_dir.x;
    let t3 = (bbox_min.y - ray_origin.y) * inv_dir.y;
    let t4 = (bbox_max.y - ray_origin.y) * inv_dir.y;
    let t5 = (bbox_min.z - ray_origin.z) * inv_dir.z;
    let t6 = (bbox_max.z - ray_origin.z) * inv_dir.z;

    let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
    let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

    if tmax < 0.0 || tmin > tmax {
        return None;
    }

    Some(if tmin < 0.0 { tmax } else { tmin })
}

/// Ray-triangle intersection (Möller-Trumbore).
fn ray_triangle_intersection(
    ray_origin: Vec3,
    ray_dir: Vec3,
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
) -> Option<f32> {
    const EPSILON: f32 = 1e-6;

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = ray_dir.cross(edge2);
    let a = edge1.dot(h);

    if a.abs() < EPSILON {
        return None; // Ray is parallel to triangle
    }

    let f = 1.0 / a;
    let s = ray_origin - v0;
    let u = f * s.dot(h);

    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray_dir.dot(q);

    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);

    if t > EPSILON { Some(t) } else { None }
}

#[cfg(test)]
mod tests {
    use glam::Mat4;

    use crate::resources::primitives::unit_box;
    use crate::scene::{RenderObject, Scene};

    use super::*;

    // Builds a scene of unit boxes at the given positions without touching
    // the GPU: picking only needs the CPU mesh copy, which the test feeds
    // through a bare MeshManager entry.
    fn picking_fixture(positions: &[Vec3]) -> (Scene, MeshManager, Vec<Uuid>) {
        let mut meshes = MeshManager::new();
        let data = unit_box();
        let handle = meshes.insert_cpu_for_tests(data.clone());

        let mut scene = Scene::new();
        let ids = positions
            .iter()
            .enumerate()
            .map(|(i, position)| {
                scene.add_object(
                    RenderObject::new(format!("Box-{i}"), handle, data.bounds)
                        .with_transform(Mat4::from_translation(*position)),
                )
            })
            .collect();
        (scene, meshes, ids)
    }

    #[test]
    fn test_ray_hits_box_front_face() {
        let (scene, meshes, ids) = picking_fixture(&[Vec3::ZERO]);

        let hit = pick_with_ray(Vec3::new(0.0, -10.0, 0.0), Vec3::Y, &scene, &meshes);
        let (id, t) = hit.expect("ray through the box must hit");
        assert_eq!(id, ids[0]);
        assert!((t - 9.5).abs() < 1e-3);
    }

    #[test]
    fn test_ray_misses_offset_box() {
        let (scene, meshes, _) = picking_fixture(&[Vec3::new(5.0, 0.0, 0.0)]);

        let hit = pick_with_ray(Vec3::new(0.0, -10.0, 0.0), Vec3::Y, &scene, &meshes);
        assert!(hit.is_none());
    }

    #[test]
    fn test_nearest_of_two_boxes_wins() {
        let (scene, meshes, ids) =
            picking_fixture(&[Vec3::new(0.0, 4.0, 0.0), Vec3::new(0.0, 2.0, 0.0)]);

        let (id, _) = pick_with_ray(Vec3::new(0.0, -10.0, 0.0), Vec3::Y, &scene, &meshes)
            .expect("both boxes are on the ray");
        assert_eq!(id, ids[1]);
    }

    #[test]
    fn test_hidden_objects_are_not_pickable() {
        let (mut scene, meshes, ids) = picking_fixture(&[Vec3::ZERO]);
        scene.get_object_mut(ids[0]).unwrap().visible = false;

        let hit = pick_with_ray(Vec3::new(0.0, -10.0, 0.0), Vec3::Y, &scene, &meshes);
        assert!(hit.is_none());
    }

    #[test]
    fn test_ray_behind_origin_does_not_hit() {
        let (scene, meshes, _) = picking_fixture(&[Vec3::new(0.0, -20.0, 0.0)]);

        let hit = pick_with_ray(Vec3::new(0.0, -10.0, 0.0), Vec3::Y, &scene, &meshes);
        assert!(hit.is_none());
    }
}
