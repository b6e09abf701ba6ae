//! Renderer-wide constants

/// Instance buffer capacities.
pub mod instances {
    /// Maximum scene objects drawn per frame.
    pub const MAX_MESH_INSTANCES: usize = 1024;
    /// Maximum gizmo handle instances (six handles plus hover duplicates).
    pub const MAX_HANDLE_INSTANCES: usize = 16;
}

/// Ground grid defaults.
pub mod grid {
    pub const DEFAULT_SIZE: f32 = 10.0;
    pub const DEFAULT_SPACING: f32 = 1.0;
    pub const LINE_COLOR: [f32; 3] = [0.3, 0.3, 0.3];
    pub const X_AXIS_COLOR: [f32; 3] = [0.8, 0.2, 0.2];
    pub const Y_AXIS_COLOR: [f32; 3] = [0.2, 0.8, 0.2];
}

/// Manipulation handle dimensions, in world units.
pub mod gizmo {
    /// Length of a translation arrow.
    pub const ARROW_LENGTH: f32 = 1.6;
    /// Radius of a rotation ring.
    pub const RING_RADIUS: f32 = 1.2;
    /// Hit-test distance for handle picking.
    pub const PICK_THRESHOLD: f32 = 0.18;
    /// Line segments per rotation ring.
    pub const RING_SEGMENTS: u32 = 64;
}

/// Viewport render target settings.
pub mod viewport {
    pub const SAMPLE_COUNT: u32 = 1;
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
}
