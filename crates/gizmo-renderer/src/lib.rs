//! Gizmo Demo Renderer
//!
//! WGPU-based 3D rendering for the gizmo demo.
//!
//! # Architecture
//!
//! The renderer is built on a plugin-based architecture:
//!
//! - [`traits::SubRenderer`] - Trait for implementing custom renderers
//! - [`plugin::RendererRegistry`] - Registry executing sub-renderers by priority
//! - [`context::RenderContext`] - GPU context abstraction
//! - [`scene::Scene`] - Scene management for renderable objects
//! - [`resources::MeshManager`] - GPU mesh resource management
//! - [`gizmo::GizmoManager`] - The manipulation rig (handle hit-testing,
//!   drag-plane math, pointer-to-attach)

pub mod camera;
pub mod config;
pub mod constants;
pub mod context;
pub mod gizmo;
pub mod instanced;
pub mod picking;
pub mod pipeline;
pub mod plugin;
pub mod renderer;
pub mod resources;
pub mod scene;
pub mod sub_renderers;
pub mod traits;
pub mod vertex;

pub use camera::{Camera, CameraUniform};
pub use config::{CameraConfig, GridConfig, RendererConfig};
pub use context::RenderContext;
pub use gizmo::{GizmoManager, SharedGizmoManager};
pub use picking::pick_object;
pub use plugin::RendererRegistry;
pub use renderer::Renderer;
pub use resources::{GpuMesh, MeshData, MeshHandle, MeshManager};
pub use scene::{BoundingBox, RenderObject, Scene};
pub use traits::SubRenderer;
pub use vertex::{MeshVertex, PositionColorVertex};
