//! Axis-aligned bounding boxes

use glam::{Mat4, Vec3};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// An inverted box that unions as the identity.
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut bounds = Self::empty();
        for point in points {
            bounds.min = bounds.min.min(point);
            bounds.max = bounds.max.max(point);
        }
        bounds
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn union(&self, other: &BoundingBox) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// The eight corners of the box.
    pub fn corners(&self) -> [Vec3; 8] {
        let (min, max) = (self.min, self.max);
        [
            Vec3::new(min.x, min.y, min.z),
            Vec3::new(max.x, min.y, min.z),
            Vec3::new(min.x, max.y, min.z),
            Vec3::new(max.x, max.y, min.z),
            Vec3::new(min.x, min.y, max.z),
            Vec3::new(max.x, min.y, max.z),
            Vec3::new(min.x, max.y, max.z),
            Vec3::new(max.x, max.y, max.z),
        ]
    }

    /// World-space box enclosing this box under `transform`.
    pub fn transform(&self, transform: &Mat4) -> Self {
        if self.is_empty() {
            return *self;
        }
        Self::from_points(
            self.corners()
                .into_iter()
                .map(|corner| transform.transform_point3(corner)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_encloses_both() {
        let a = BoundingBox::new(Vec3::ZERO, Vec3::ONE);
        let b = BoundingBox::new(Vec3::splat(2.0), Vec3::splat(3.0));
        let union = a.union(&b);
        assert_eq!(union.min, Vec3::ZERO);
        assert_eq!(union.max, Vec3::splat(3.0));
    }

    #[test]
    fn test_empty_unions_as_identity() {
        let a = BoundingBox::new(Vec3::NEG_ONE, Vec3::ONE);
        assert_eq!(BoundingBox::empty().union(&a), a);
    }

    #[test]
    fn test_transform_translates_bounds() {
        let bounds = BoundingBox::new(Vec3::NEG_ONE, Vec3::ONE);
        let moved = bounds.transform(&Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0)));
        assert_eq!(moved.min, Vec3::new(4.0, -1.0, -1.0));
        assert_eq!(moved.max, Vec3::new(6.0, 1.0, 1.0));
    }

    #[test]
    fn test_transform_rotation_grows_axis_aligned_box() {
        let bounds = BoundingBox::new(Vec3::NEG_ONE, Vec3::ONE);
        let rotated = bounds.transform(&Mat4::from_rotation_z(std::f32::consts::FRAC_PI_4));
        let expected = 2f32.sqrt();
        assert!((rotated.max.x - expected).abs() < 1e-4);
        assert!((rotated.max.y - expected).abs() < 1e-4);
    }
}
