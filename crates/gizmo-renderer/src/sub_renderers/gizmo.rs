//! Gizmo handle sub-renderer
//!
//! Draws the translation arrows and rotation rings of the attached
//! [`crate::gizmo::GizmoManager`]. The manager owns the interaction state;
//! this sub-renderer only reads it each frame.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use gizmo_core::{GizmoAxis, GizmoHandle, GizmoMode};

use crate::constants::{gizmo as constants, instances};
use crate::context::RenderContext;
use crate::gizmo::SharedGizmoManager;
use crate::instanced::InstanceBuffer;
use crate::pipeline::{PipelineConfig, create_camera_bind_group};
use crate::resources::MeshManager;
use crate::scene::Scene;
use crate::traits::SubRenderer;
use crate::vertex::{PositionColorVertex, mat4_instance_attributes};

/// Per-handle instance data.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct HandleInstance {
    pub transform: [[f32; 4]; 4],
    pub color: [f32; 4],
}

const AXIS_COLORS: [[f32; 4]; 3] = [
    [0.9, 0.2, 0.2, 1.0],
    [0.2, 0.8, 0.2, 1.0],
    [0.25, 0.45, 0.95, 1.0],
];
const HIGHLIGHT_COLOR: [f32; 4] = [1.0, 0.85, 0.2, 1.0];

/// Draws the manipulation handles on top of the scene.
pub struct GizmoSubRenderer {
    manager: SharedGizmoManager,
    enabled: bool,
    initialized: bool,
    pipeline: Option<wgpu::RenderPipeline>,
    camera_bind_group: Option<wgpu::BindGroup>,
    arrow_vertices: Option<wgpu::Buffer>,
    arrow_vertex_count: u32,
    ring_vertices: Option<wgpu::Buffer>,
    ring_vertex_count: u32,
    arrow_instances: Option<InstanceBuffer<HandleInstance>>,
    ring_instances: Option<InstanceBuffer<HandleInstance>>,
}

impl GizmoSubRenderer {
    pub fn new(manager: SharedGizmoManager) -> Self {
        Self {
            manager,
            enabled: true,
            initialized: false,
            pipeline: None,
            camera_bind_group: None,
            arrow_vertices: None,
            arrow_vertex_count: 0,
            ring_vertices: None,
            ring_vertex_count: 0,
            arrow_instances: None,
            ring_instances: None,
        }
    }

    /// Transform placing unit +X geometry on the given axis at `center`.
    fn handle_transform(center: Vec3, axis: GizmoAxis, scale: f32) -> Mat4 {
        let rotation = match axis {
            GizmoAxis::X => Mat4::IDENTITY,
            GizmoAxis::Y => Mat4::from_rotation_z(std::f32::consts::FRAC_PI_2),
            GizmoAxis::Z => Mat4::from_rotation_y(-std::f32::consts::FRAC_PI_2),
        };
        Mat4::from_translation(center) * rotation * Mat4::from_scale(Vec3::splat(scale))
    }

    fn handle_color(axis: GizmoAxis, emphasized: bool) -> [f32; 4] {
        if emphasized {
            HIGHLIGHT_COLOR
        } else {
            AXIS_COLORS[axis as usize]
        }
    }
}

impl SubRenderer for GizmoSubRenderer {
    fn name(&self) -> &str {
        "gizmo"
    }

    fn priority(&self) -> i32 {
        super::priorities::GIZMO
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn on_init(&mut self, ctx: &RenderContext) {
        let mat4_attrs = mat4_instance_attributes(2);
        let instance_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<HandleInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                mat4_attrs[0],
                mat4_attrs[1],
                mat4_attrs[2],
                mat4_attrs[3],
                wgpu::VertexAttribute {
                    offset: 64,
                    shader_location: 6,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        };

        // Handles ignore the depth buffer so they stay visible through
        // geometry.
        let pipeline = PipelineConfig::new(
            "Gizmo",
            include_str!("../shaders/gizmo.wgsl"),
            ctx.surface_format(),
            ctx.depth_format(),
            &[ctx.camera_bind_group_layout()],
        )
        .with_vertex_layouts(vec![PositionColorVertex::layout(), instance_layout])
        .with_topology(wgpu::PrimitiveTopology::LineList)
        .with_overlay_depth()
        .build(ctx.device());

        let camera_bind_group = create_camera_bind_group(
            ctx.device(),
            ctx.camera_bind_group_layout(),
            ctx.camera_buffer(),
            "Gizmo",
        );

        let arrows = generate_arrow_vertices();
        self.arrow_vertex_count = arrows.len() as u32;
        let rings = generate_ring_vertices(constants::RING_SEGMENTS);
        self.ring_vertex_count = rings.len() as u32;

        self.arrow_vertices = Some(ctx.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Gizmo Arrow Vertex Buffer"),
            contents: bytemuck::cast_slice(&arrows),
            usage: wgpu::BufferUsages::VERTEX,
        }));
        self.ring_vertices = Some(ctx.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Gizmo Ring Vertex Buffer"),
            contents: bytemuck::cast_slice(&rings),
            usage: wgpu::BufferUsages::VERTEX,
        }));

        self.arrow_instances = Some(InstanceBuffer::new(
            ctx.device(),
            "Gizmo Arrows",
            instances::MAX_HANDLE_INSTANCES,
        ));
        self.ring_instances = Some(InstanceBuffer::new(
            ctx.device(),
            "Gizmo Rings",
            instances::MAX_HANDLE_INSTANCES,
        ));

        self.pipeline = Some(pipeline);
        self.camera_bind_group = Some(camera_bind_group);
        self.initialized = true;
    }

    fn on_resize(&mut self, _ctx: &RenderContext, _width: u32, _height: u32) {}

    fn prepare(&mut self, ctx: &RenderContext, scene: &Scene, _meshes: &MeshManager) {
        if !self.initialized {
            return;
        }

        let manager = self.manager.lock();
        let mut arrows = Vec::new();
        let mut rings = Vec::new();

        if let Some(center) = manager.anchor(scene) {
            let emphasized = manager.active_handle().or(manager.hovered());

            if manager.translation_enabled() {
                for axis in [GizmoAxis::X, GizmoAxis::Y, GizmoAxis::Z] {
                    let handle = GizmoHandle::new(GizmoMode::Translate, axis);
                    arrows.push(HandleInstance {
                        transform: Self::handle_transform(center, axis, constants::ARROW_LENGTH)
                            .to_cols_array_2d(),
                        color: Self::handle_color(axis, emphasized == Some(handle)),
                    });
                }
            }
            if manager.rotation_enabled() {
                for axis in [GizmoAxis::X, GizmoAxis::Y, GizmoAxis::Z] {
                    let handle = GizmoHandle::new(GizmoMode::Rotate, axis);
                    rings.push(HandleInstance {
                        transform: Self::handle_transform(center, axis, constants::RING_RADIUS)
                            .to_cols_array_2d(),
                        color: Self::handle_color(axis, emphasized == Some(handle)),
                    });
                }
            }
        }
        drop(manager);

        if let Some(buffer) = self.arrow_instances.as_mut() {
            buffer.update(ctx.queue(), &arrows);
        }
        if let Some(buffer) = self.ring_instances.as_mut() {
            buffer.update(ctx.queue(), &rings);
        }
    }

    fn render<'a>(
        &'a self,
        pass: &mut wgpu::RenderPass<'a>,
        _scene: &Scene,
        _meshes: &'a MeshManager,
    ) {
        if !self.initialized {
            return;
        }
        let arrow_instances = self.arrow_instances.as_ref().unwrap();
        let ring_instances = self.ring_instances.as_ref().unwrap();
        if arrow_instances.is_empty() && ring_instances.is_empty() {
            return;
        }

        pass.set_pipeline(self.pipeline.as_ref().unwrap());
        pass.set_bind_group(0, self.camera_bind_group.as_ref().unwrap(), &[]);

        if !arrow_instances.is_empty() {
            pass.set_vertex_buffer(0, self.arrow_vertices.as_ref().unwrap().slice(..));
            pass.set_vertex_buffer(1, arrow_instances.slice());
            pass.draw(0..self.arrow_vertex_count, 0..arrow_instances.count());
        }
        if !ring_instances.is_empty() {
            pass.set_vertex_buffer(0, self.ring_vertices.as_ref().unwrap().slice(..));
            pass.set_vertex_buffer(1, ring_instances.slice());
            pass.draw(0..self.ring_vertex_count, 0..ring_instances.count());
        }
    }
}

/// Unit arrow along +X: shaft plus four head lines, scaled per instance.
fn generate_arrow_vertices() -> Vec<PositionColorVertex> {
    let white = [1.0, 1.0, 1.0];
    let mut vertices = vec![
        PositionColorVertex {
            position: [0.0, 0.0, 0.0],
            color: white,
        },
        PositionColorVertex {
            position: [1.0, 0.0, 0.0],
            color: white,
        },
    ];

    let head_base = 0.85;
    let head_spread = 0.05;
    for (y, z) in [
        (head_spread, 0.0),
        (-head_spread, 0.0),
        (0.0, head_spread),
        (0.0, -head_spread),
    ] {
        vertices.push(PositionColorVertex {
            position: [1.0, 0.0, 0.0],
            color: white,
        });
        vertices.push(PositionColorVertex {
            position: [head_base, y, z],
            color: white,
        });
    }

    vertices
}

/// Unit circle in the YZ plane (normal +X), scaled to the ring radius per
/// instance.
fn generate_ring_vertices(segments: u32) -> Vec<PositionColorVertex> {
    let white = [1.0, 1.0, 1.0];
    let mut vertices = Vec::with_capacity(segments as usize * 2);

    for i in 0..segments {
        let a0 = i as f32 / segments as f32 * std::f32::consts::TAU;
        let a1 = (i + 1) as f32 / segments as f32 * std::f32::consts::TAU;
        vertices.push(PositionColorVertex {
            position: [0.0, a0.cos(), a0.sin()],
            color: white,
        });
        vertices.push(PositionColorVertex {
            position: [0.0, a1.cos(), a1.sin()],
            color: white,
        });
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_geometry_spans_unit_length() {
        let vertices = generate_arrow_vertices();
        let max_x = vertices
            .iter()
            .map(|v| v.position[0])
            .fold(f32::NEG_INFINITY, f32::max);
        assert_eq!(max_x, 1.0);
        // Shaft plus four head lines.
        assert_eq!(vertices.len(), 10);
    }

    #[test]
    fn test_ring_geometry_is_closed() {
        let vertices = generate_ring_vertices(16);
        assert_eq!(vertices.len(), 32);
        // Every vertex sits on the unit circle in the YZ plane.
        for vertex in &vertices {
            assert_eq!(vertex.position[0], 0.0);
            let radius = (vertex.position[1].powi(2) + vertex.position[2].powi(2)).sqrt();
            assert!((radius - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_handle_transform_aligns_unit_x_with_axis() {
        let center = Vec3::new(1.0, 2.0, 3.0);
        for (axis, expected) in [
            (GizmoAxis::X, Vec3::X),
            (GizmoAxis::Y, Vec3::Y),
            (GizmoAxis::Z, Vec3::Z),
        ] {
            let transform = GizmoSubRenderer::handle_transform(center, axis, 2.0);
            let tip = transform.transform_point3(Vec3::X);
            assert!(tip.distance(center + expected * 2.0) < 1e-4);
        }
    }
}
