//! Built-in sub-renderers for the gizmo demo
//!
//! - [`GridSubRenderer`]: ground reference grid
//! - [`MeshSubRenderer`]: the selectable boxes, instanced per mesh
//! - [`GizmoSubRenderer`]: manipulation handles, drawn on top

pub mod gizmo;
pub mod grid;
pub mod mesh;

pub use gizmo::GizmoSubRenderer;
pub use grid::GridSubRenderer;
pub use mesh::MeshSubRenderer;

/// Render priorities for sub-renderers.
///
/// Lower values are rendered first (background), higher values on top.
pub mod priorities {
    /// Grid is rendered first (background)
    pub const GRID: i32 = 0;
    /// Meshes are the main content
    pub const MESH: i32 = 100;
    /// Gizmo handles are always on top
    pub const GIZMO: i32 = 1000;
}
