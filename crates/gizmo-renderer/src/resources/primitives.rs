//! Primitive mesh generation

use glam::Vec3;

use super::MeshData;
use crate::vertex::MeshVertex;

/// Axis-aligned box centered at the origin, with per-face normals.
pub fn box_mesh(size: Vec3) -> MeshData {
    let half = size * 0.5;

    // One entry per face: normal plus two tangents with t1 x t2 = normal,
    // so the triangles wind counter-clockwise seen from outside.
    let faces = [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::Z, Vec3::X),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::Y, Vec3::X),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for (normal, t1, t2) in faces {
        let base = vertices.len() as u32;
        for (s1, s2) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let corner = (normal + t1 * s1 + t2 * s2) * half;
            vertices.push(MeshVertex {
                position: corner.to_array(),
                normal: normal.to_array(),
            });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    MeshData::new(vertices, indices)
}

/// Unit box, the demo's selectable primitive.
pub fn unit_box() -> MeshData {
    box_mesh(Vec3::ONE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_vertex_and_index_counts() {
        let mesh = unit_box();
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
    }

    #[test]
    fn test_box_bounds_match_size() {
        let mesh = box_mesh(Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(mesh.bounds.min, Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(mesh.bounds.max, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_box_normals_are_axis_aligned_units() {
        let mesh = unit_box();
        for vertex in &mesh.vertices {
            let normal = Vec3::from(vertex.normal);
            assert!((normal.length() - 1.0).abs() < 1e-6);
            let abs = normal.abs();
            assert!((abs.x + abs.y + abs.z - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_box_winding_faces_outward() {
        let mesh = unit_box();
        for triangle in mesh.triangles() {
            let [a, b, c] = triangle;
            let face_normal = (b - a).cross(c - b);
            let center = (a + b + c) / 3.0;
            // For a convex solid centered at the origin, outward-facing
            // triangles point away from the center.
            assert!(face_normal.dot(center) > 0.0);
        }
    }
}
