//! Mesh sub-renderer for the selectable scene objects

use std::collections::HashMap;
use std::ops::Range;

use bytemuck::{Pod, Zeroable};

use crate::constants::instances;
use crate::context::RenderContext;
use crate::instanced::InstanceBuffer;
use crate::pipeline::{PipelineConfig, create_camera_bind_group};
use crate::resources::{MeshHandle, MeshManager};
use crate::scene::Scene;
use crate::traits::SubRenderer;
use crate::vertex::{MeshVertex, mat4_instance_attributes};

/// Per-object instance data.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct MeshInstance {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

/// Tint mixed into the base color of the selected object.
const SELECTION_TINT: [f32; 3] = [1.0, 0.45, 0.25];

struct DrawBatch {
    mesh: MeshHandle,
    range: Range<u32>,
}

/// Draws every visible scene object, instanced per shared mesh.
pub struct MeshSubRenderer {
    enabled: bool,
    initialized: bool,
    pipeline: Option<wgpu::RenderPipeline>,
    camera_bind_group: Option<wgpu::BindGroup>,
    instance_buffer: Option<InstanceBuffer<MeshInstance>>,
    batches: Vec<DrawBatch>,
}

impl MeshSubRenderer {
    pub fn new() -> Self {
        Self {
            enabled: true,
            initialized: false,
            pipeline: None,
            camera_bind_group: None,
            instance_buffer: None,
            batches: Vec::new(),
        }
    }
}

impl Default for MeshSubRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl SubRenderer for MeshSubRenderer {
    fn name(&self) -> &str {
        "mesh"
    }

    fn priority(&self) -> i32 {
        super::priorities::MESH
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
            array_stride: std::mem::size_of::<MeshInstance>() as u64,
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

        let pipeline = PipelineConfig::new(
            "Mesh",
            include_str!("../shaders/mesh.wgsl"),
            ctx.surface_format(),
            ctx.depth_format(),
            &[ctx.camera_bind_group_layout()],
        )
        .with_vertex_layouts(vec![MeshVertex::layout(), instance_layout])
        .with_cull_mode(wgpu::Face::Back)
        .build(ctx.device());

        let camera_bind_group = create_camera_bind_group(
            ctx.device(),
            ctx.camera_bind_group_layout(),
            ctx.camera_buffer(),
            "Mesh",
        );

        self.pipeline = Some(pipeline);
        self.camera_bind_group = Some(camera_bind_group);
        self.instance_buffer = Some(InstanceBuffer::new(
            ctx.device(),
            "Mesh",
            instances::MAX_MESH_INSTANCES,
        ));
        self.initialized = true;
    }

    fn on_resize(&mut self, _ctx: &RenderContext, _width: u32, _height: u32) {}

    fn prepare(&mut self, ctx: &RenderContext, scene: &Scene, _meshes: &MeshManager) {
        if !self.initialized {
            return;
        }

        // Group visible objects by mesh so each shared mesh draws once.
        let mut groups: HashMap<MeshHandle, Vec<MeshInstance>> = HashMap::new();
        for object in scene.objects() {
            if !object.visible {
                continue;
            }
            let mut color = object.color;
            if object.selected {
                for (channel, tint) in color.iter_mut().zip(SELECTION_TINT) {
                    *channel = (*channel + tint).min(1.0) * 0.5 + *channel * 0.5;
                }
            }
            groups.entry(object.mesh).or_default().push(MeshInstance {
                model: object.transform.to_cols_array_2d(),
                color,
            });
        }

        let mut flat = Vec::new();
        self.batches.clear();
        for (mesh, group) in groups {
            let start = flat.len() as u32;
            flat.extend(group);
            self.batches.push(DrawBatch {
                mesh,
                range: start..flat.len() as u32,
            });
        }

        if let Some(buffer) = self.instance_buffer.as_mut() {
            buffer.update(ctx.queue(), &flat);
        }
    }

    fn render<'a>(
        &'a self,
        pass: &mut wgpu::RenderPass<'a>,
        _scene: &Scene,
        meshes: &'a MeshManager,
    ) {
        if !self.initialized || self.batches.is_empty() {
            return;
        }
        let pipeline = self.pipeline.as_ref().unwrap();
        let bind_group = self.camera_bind_group.as_ref().unwrap();
        let instance_buffer = self.instance_buffer.as_ref().unwrap();

        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, bind_group, &[]);
        pass.set_vertex_buffer(1, instance_buffer.slice());

        for batch in &self.batches {
            let Some(mesh) = meshes.gpu(batch.mesh) else {
                continue;
            };
            pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..mesh.index_count, 0, batch.range.clone());
        }
    }
}
