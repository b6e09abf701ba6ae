//! Top-level renderer facade
//!
//! Owns the render context, the scene, the mesh manager, the camera, and
//! the sub-renderer registry, and exposes the surface the frontend
//! viewport drives: object management, pointer routing, picking, and
//! per-frame rendering into an offscreen view.

use std::sync::Arc;

use glam::Vec2;
use parking_lot::Mutex;
use uuid::Uuid;

use gizmo_core::PointerSample;

use crate::camera::Camera;
use crate::config::RendererConfig;
use crate::context::RenderContext;
use crate::gizmo::{GizmoManager, SharedGizmoManager};
use crate::picking;
use crate::plugin::RendererRegistry;
use crate::resources::{MeshData, MeshHandle, MeshManager};
use crate::scene::{RenderObject, Scene};
use crate::sub_renderers::{GizmoSubRenderer, GridSubRenderer, MeshSubRenderer};
use crate::traits::SubRenderer;

pub struct Renderer {
    ctx: RenderContext,
    registry: RendererRegistry,
    meshes: MeshManager,
    scene: Scene,
    camera: Camera,
    gizmo: SharedGizmoManager,
    depth_view: wgpu::TextureView,
    background: wgpu::Color,
}

impl Renderer {
    pub fn new(
        device: Arc<wgpu::Device>,
        queue: Arc<wgpu::Queue>,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        config: &RendererConfig,
    ) -> Self {
        let ctx = RenderContext::new(device, queue, surface_format, width, height);

        let mut camera = Camera::new(width as f32 / height.max(1) as f32);
        camera.set_fov_degrees(config.camera.fov_degrees);
        camera.set_near(config.camera.near_plane);
        camera.set_far(config.camera.far_plane);

        let gizmo: SharedGizmoManager = Arc::new(Mutex::new(GizmoManager::new()));

        let mut registry = RendererRegistry::new();
        let mut grid = GridSubRenderer::new().with_dimensions(config.grid.size, config.grid.spacing);
        grid.set_enabled(config.grid.enabled);
        registry.register(grid);
        registry.register(MeshSubRenderer::new());
        registry.register(GizmoSubRenderer::new(Arc::clone(&gizmo)));
        registry.init_all(&ctx);

        let depth_view = create_depth_view(&ctx, width, height);
        let [r, g, b, a] = config.background.color;

        tracing::debug!("renderer initialized at {width}x{height}");

        Self {
            ctx,
            registry,
            meshes: MeshManager::new(),
            scene: Scene::new(),
            camera,
            gizmo,
            depth_view,
            background: wgpu::Color {
                r: r as f64,
                g: g as f64,
                b: b as f64,
                a: a as f64,
            },
        }
    }

    /// The manipulation rig driven by this renderer's viewport.
    pub fn gizmo(&self) -> SharedGizmoManager {
        Arc::clone(&self.gizmo)
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Uploads mesh data, returning a handle shareable across objects.
    pub fn upload_mesh(&mut self, data: MeshData) -> MeshHandle {
        self.meshes.create(&self.ctx, data)
    }

    pub fn insert_object(&mut self, object: RenderObject) -> Uuid {
        self.scene.add_object(object)
    }

    /// Synchronizes the scene's selection highlight.
    pub fn set_selected(&mut self, id: Option<Uuid>) {
        self.scene.set_selected(id);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        let width = width.max(1);
        let height = height.max(1);
        self.ctx.set_size(width, height);
        self.camera.update_aspect(width as f32 / height as f32);
        self.depth_view = create_depth_view(&self.ctx, width, height);
        self.registry.resize_all(&self.ctx, width, height);
    }

    /// Routes a pointer press into the rig. Returns true when a handle
    /// drag started and the camera should not receive this gesture.
    pub fn pointer_pressed(&mut self, x: f32, y: f32, pointer_id: u64) -> bool {
        let (origin, direction) = self.viewport_ray(x, y);
        self.gizmo.lock().pointer_pressed(
            &self.scene,
            &self.meshes,
            origin,
            direction,
            pointer_id,
            PointerSample {
                position: Vec2::new(x, y),
            },
        )
    }

    /// Routes a pointer move into the rig. Returns true while a handle
    /// drag is consuming the pointer.
    pub fn pointer_moved(&mut self, x: f32, y: f32) -> bool {
        let (origin, direction) = self.viewport_ray(x, y);
        self.gizmo.lock().pointer_moved(
            &mut self.scene,
            origin,
            direction,
            PointerSample {
                position: Vec2::new(x, y),
            },
        )
    }

    pub fn pointer_released(&self) {
        self.gizmo.lock().pointer_released();
    }

    /// Picks the closest object under the viewport position.
    pub fn pick(&self, x: f32, y: f32) -> Option<(Uuid, f32)> {
        picking::pick_object(
            &self.camera,
            x,
            y,
            self.ctx.width() as f32,
            self.ctx.height() as f32,
            &self.scene,
            &self.meshes,
        )
    }

    fn viewport_ray(&self, x: f32, y: f32) -> (glam::Vec3, glam::Vec3) {
        self.camera
            .screen_to_ray(x, y, self.ctx.width() as f32, self.ctx.height() as f32)
    }

    /// Renders the scene into `view`.
    pub fn render(&mut self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
        self.ctx.update_camera(self.camera.uniform());
        self.registry.prepare_all(&self.ctx, &self.scene, &self.meshes);

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Viewport Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.background),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        self.registry.render_all(&mut pass, &self.scene, &self.meshes);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.ctx.surface_format()
    }
}

fn create_depth_view(ctx: &RenderContext, width: u32, height: u32) -> wgpu::TextureView {
    let texture = ctx.device().create_texture(&wgpu::TextureDescriptor {
        label: Some("Viewport Depth Texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: ctx.sample_count(),
        dimension: wgpu::TextureDimension::D2,
        format: ctx.depth_format(),
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
