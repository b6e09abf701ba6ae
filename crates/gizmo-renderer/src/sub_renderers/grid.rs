//! Ground grid sub-renderer

use crate::constants::grid as constants;
use crate::context::RenderContext;
use crate::pipeline::{PipelineConfig, create_camera_bind_group};
use crate::resources::MeshManager;
use crate::scene::Scene;
use crate::traits::SubRenderer;
use crate::vertex::PositionColorVertex;

/// Grid sub-renderer for the ground reference plane.
pub struct GridSubRenderer {
    enabled: bool,
    initialized: bool,
    pipeline: Option<wgpu::RenderPipeline>,
    vertex_buffer: Option<wgpu::Buffer>,
    camera_bind_group: Option<wgpu::BindGroup>,
    vertex_count: u32,
    size: f32,
    spacing: f32,
}

impl GridSubRenderer {
    pub fn new() -> Self {
        Self {
            enabled: true,
            initialized: false,
            pipeline: None,
            vertex_buffer: None,
            camera_bind_group: None,
            vertex_count: 0,
            size: constants::DEFAULT_SIZE,
            spacing: constants::DEFAULT_SPACING,
        }
    }

    pub fn with_dimensions(mut self, size: f32, spacing: f32) -> Self {
        self.size = size;
        self.spacing = spacing;
        self
    }
}

impl Default for GridSubRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl SubRenderer for GridSubRenderer {
    fn name(&self) -> &str {
        "grid"
    }

    fn priority(&self) -> i32 {
        super::priorities::GRID
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn on_init(&mut self, ctx: &RenderContext) {
        let pipeline = PipelineConfig::new(
            "Grid",
            include_str!("../shaders/grid.wgsl"),
            ctx.surface_format(),
            ctx.depth_format(),
            &[ctx.camera_bind_group_layout()],
        )
        .with_vertex_layouts(vec![PositionColorVertex::layout()])
        .with_topology(wgpu::PrimitiveTopology::LineList)
        .build(ctx.device());

        let vertices = generate_grid_vertices(self.size, self.spacing);
        self.vertex_count = vertices.len() as u32;

        let vertex_buffer = ctx.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Grid Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let camera_bind_group = create_camera_bind_group(
            ctx.device(),
            ctx.camera_bind_group_layout(),
            ctx.camera_buffer(),
            "Grid",
        );

        self.pipeline = Some(pipeline);
        self.vertex_buffer = Some(vertex_buffer);
        self.camera_bind_group = Some(camera_bind_group);
        self.initialized = true;
    }

    fn on_resize(&mut self, _ctx: &RenderContext, _width: u32, _height: u32) {}

    fn prepare(&mut self, _ctx: &RenderContext, _scene: &Scene, _meshes: &MeshManager) {}

    fn render<'a>(
        &'a self,
        pass: &mut wgpu::RenderPass<'a>,
        _scene: &Scene,
        _meshes: &'a MeshManager,
    ) {
        if !self.initialized {
            return;
        }
        let pipeline = self.pipeline.as_ref().unwrap();
        let vertex_buffer = self.vertex_buffer.as_ref().unwrap();
        let bind_group = self.camera_bind_group.as_ref().unwrap();

        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, bind_group, &[]);
        pass.set_vertex_buffer(0, vertex_buffer.slice(..));
        pass.draw(0..self.vertex_count, 0..1);
    }
}

/// Generate grid line vertices in the XY plane, with highlighted axes.
fn generate_grid_vertices(size: f32, spacing: f32) -> Vec<PositionColorVertex> {
    let mut vertices = Vec::new();
    let num_lines = (size / spacing) as i32;

    for i in -num_lines..=num_lines {
        let offset = i as f32 * spacing;

        // Lines parallel to X; the center one doubles as the X axis.
        let color = if i == 0 {
            constants::X_AXIS_COLOR
        } else {
            constants::LINE_COLOR
        };
        vertices.push(PositionColorVertex {
            position: [-size, offset, 0.0],
            color,
        });
        vertices.push(PositionColorVertex {
            position: [size, offset, 0.0],
            color,
        });

        // Lines parallel to Y.
        let color = if i == 0 {
            constants::Y_AXIS_COLOR
        } else {
            constants::LINE_COLOR
        };
        vertices.push(PositionColorVertex {
            position: [offset, -size, 0.0],
            color,
        });
        vertices.push(PositionColorVertex {
            position: [offset, size, 0.0],
            color,
        });
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_vertex_count() {
        let vertices = generate_grid_vertices(10.0, 1.0);
        // 21 lines in each direction, two vertices per line.
        assert_eq!(vertices.len(), 21 * 2 * 2);
    }

    #[test]
    fn test_grid_axis_lines_are_highlighted() {
        let vertices = generate_grid_vertices(2.0, 1.0);
        let x_axis = vertices
            .iter()
            .filter(|v| v.color == constants::X_AXIS_COLOR)
            .count();
        let y_axis = vertices
            .iter()
            .filter(|v| v.color == constants::Y_AXIS_COLOR)
            .count();
        assert_eq!(x_axis, 2);
        assert_eq!(y_axis, 2);
    }
}
