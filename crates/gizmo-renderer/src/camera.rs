//! Orbit camera and its GPU uniform

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Camera uniform buffer data sent to the GPU.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    /// Eye position (xyz) and padding.
    pub position: [f32; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            position: [0.0; 4],
        }
    }
}

/// Orbit camera circling a target point, Z up.
///
/// Matches the viewer setup of the demo scene: the camera starts far out
/// and is driven by orbit/zoom input from the viewport.
#[derive(Debug, Clone)]
pub struct Camera {
    pub target: Vec3,
    /// Azimuth around Z, radians.
    pub yaw: f32,
    /// Elevation from the XY plane, radians.
    pub pitch: f32,
    /// Distance from the target.
    pub radius: f32,
    fov_y: f32,
    aspect: f32,
    near: f32,
    far: f32,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self {
            target: Vec3::ZERO,
            yaw: std::f32::consts::FRAC_PI_4,
            pitch: 0.5,
            radius: 50.0,
            fov_y: 45f32.to_radians(),
            aspect,
            near: 0.1,
            far: 1000.0,
        }
    }

    /// Eye position in world space.
    pub fn eye(&self) -> Vec3 {
        let cos_pitch = self.pitch.cos();
        let offset = Vec3::new(
            cos_pitch * self.yaw.cos(),
            cos_pitch * self.yaw.sin(),
            self.pitch.sin(),
        ) * self.radius;
        self.target + offset
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Z)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn uniform(&self) -> CameraUniform {
        let eye = self.eye();
        CameraUniform {
            view_proj: self.view_proj().to_cols_array_2d(),
            position: [eye.x, eye.y, eye.z, 1.0],
        }
    }

    pub fn update_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    /// Rotates the camera around the target from a pointer drag.
    pub fn orbit(&mut self, delta_x: f32, delta_y: f32) {
        const SENSITIVITY: f32 = 0.01;
        const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;
        self.yaw -= delta_x * SENSITIVITY;
        self.pitch = (self.pitch + delta_y * SENSITIVITY).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Moves the camera toward or away from the target.
    pub fn zoom(&mut self, scroll_delta: f32) {
        const SPEED: f32 = 0.1;
        self.radius = (self.radius * (1.0 - scroll_delta * SPEED)).clamp(1.0, 500.0);
    }

    /// Unprojects a viewport pixel into a world-space ray.
    ///
    /// Returns the ray origin (on the near plane) and its normalized
    /// direction.
    pub fn screen_to_ray(&self, x: f32, y: f32, width: f32, height: f32) -> (Vec3, Vec3) {
        let ndc_x = 2.0 * x / width - 1.0;
        let ndc_y = 1.0 - 2.0 * y / height;

        let inverse = self.view_proj().inverse();
        // wgpu clip space has depth 0 at the near plane, 1 at the far plane.
        let near = inverse.project_point3(Vec3::new(ndc_x, ndc_y, 0.0));
        let far = inverse.project_point3(Vec3::new(ndc_x, ndc_y, 1.0));

        (near, (far - near).normalize())
    }

    pub fn set_fov_degrees(&mut self, degrees: f32) {
        self.fov_y = degrees.clamp(10.0, 150.0).to_radians();
    }

    pub fn set_near(&mut self, near: f32) {
        self.near = near.max(0.001);
    }

    pub fn set_far(&mut self, far: f32) {
        self.far = far.max(self.near + 0.001);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_ray_points_at_target() {
        let camera = Camera::new(16.0 / 9.0);
        let (origin, direction) = camera.screen_to_ray(640.0, 360.0, 1280.0, 720.0);

        let toward_target = (camera.target - camera.eye()).normalize();
        assert!(direction.dot(toward_target) > 0.999);
        // The ray starts between the eye and the target.
        assert!(origin.distance(camera.eye()) < camera.radius);
    }

    #[test]
    fn test_eye_respects_radius() {
        let mut camera = Camera::new(1.0);
        camera.target = Vec3::new(1.0, 2.0, 3.0);
        camera.radius = 12.0;
        assert!((camera.eye().distance(camera.target) - 12.0).abs() < 1e-4);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut camera = Camera::new(1.0);
        camera.orbit(0.0, 10_000.0);
        assert!(camera.pitch < std::f32::consts::FRAC_PI_2);
        camera.orbit(0.0, -20_000.0);
        assert!(camera.pitch > -std::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn test_zoom_stays_within_limits() {
        let mut camera = Camera::new(1.0);
        for _ in 0..200 {
            camera.zoom(1.0);
        }
        assert!(camera.radius >= 1.0);
        for _ in 0..200 {
            camera.zoom(-1.0);
        }
        assert!(camera.radius <= 500.0);
    }
}
