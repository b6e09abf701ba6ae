//! Registry executing sub-renderers by priority

use crate::context::RenderContext;
use crate::resources::MeshManager;
use crate::scene::Scene;
use crate::traits::SubRenderer;

/// Registry for managing sub-renderers.
///
/// The registry maintains a collection of sub-renderers and handles their
/// lifecycle (initialization, per-frame preparation, rendering, cleanup).
pub struct RendererRegistry {
    sub_renderers: Vec<Box<dyn SubRenderer>>,
    sorted: bool,
}

impl RendererRegistry {
    pub fn new() -> Self {
        Self {
            sub_renderers: Vec::new(),
            sorted: true,
        }
    }

    /// Registers a new sub-renderer.
    pub fn register<R: SubRenderer + 'static>(&mut self, renderer: R) {
        self.sub_renderers.push(Box::new(renderer));
        self.sorted = false;
    }

    /// Unregisters a sub-renderer by name, returning it if present.
    pub fn unregister(&mut self, name: &str) -> Option<Box<dyn SubRenderer>> {
        let position = self.sub_renderers.iter().position(|r| r.name() == name)?;
        Some(self.sub_renderers.remove(position))
    }

    pub fn get(&self, name: &str) -> Option<&dyn SubRenderer> {
        self.sub_renderers
            .iter()
            .find(|r| r.name() == name)
            .map(|r| r.as_ref())
    }

    pub fn get_mut<'a>(&'a mut self, name: &str) -> Option<&'a mut (dyn SubRenderer + 'a)> {
        for renderer in &mut self.sub_renderers {
            if renderer.name() == name {
                return Some(renderer.as_mut());
            }
        }
        None
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sub_renderers.iter().any(|r| r.name() == name)
    }

    pub fn len(&self) -> usize {
        self.sub_renderers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sub_renderers.is_empty()
    }

    /// Iterates sub-renderers in priority order (after sorting).
    pub fn iter(&self) -> impl Iterator<Item = &dyn SubRenderer> {
        self.sub_renderers.iter().map(|r| r.as_ref())
    }

    fn ensure_sorted(&mut self) {
        if !self.sorted {
            self.sub_renderers.sort_by_key(|r| r.priority());
            self.sorted = true;
        }
    }

    /// Initializes all sub-renderers with the given context.
    pub fn init_all(&mut self, ctx: &RenderContext) {
        self.ensure_sorted();
        for renderer in &mut self.sub_renderers {
            renderer.on_init(ctx);
        }
    }

    /// Notifies all sub-renderers of a resize.
    pub fn resize_all(&mut self, ctx: &RenderContext, width: u32, height: u32) {
        for renderer in &mut self.sub_renderers {
            renderer.on_resize(ctx, width, height);
        }
    }

    /// Prepares all enabled sub-renderers for the frame.
    pub fn prepare_all(&mut self, ctx: &RenderContext, scene: &Scene, meshes: &MeshManager) {
        self.ensure_sorted();
        for renderer in &mut self.sub_renderers {
            if renderer.is_enabled() {
                renderer.prepare(ctx, scene, meshes);
            }
        }
    }

    /// Renders all enabled sub-renderers in priority order.
    pub fn render_all<'a>(
        &'a self,
        pass: &mut wgpu::RenderPass<'a>,
        scene: &Scene,
        meshes: &'a MeshManager,
    ) {
        for renderer in &self.sub_renderers {
            if renderer.is_enabled() {
                renderer.render(pass, scene, meshes);
            }
        }
    }

    /// Destroys all sub-renderers.
    pub fn destroy_all(&mut self) {
        for renderer in &mut self.sub_renderers {
            renderer.on_destroy();
        }
        self.sub_renderers.clear();
    }
}

impl Default for RendererRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestRenderer {
        name: String,
        priority: i32,
        enabled: bool,
    }

    impl TestRenderer {
        fn new(name: &str, priority: i32) -> Self {
            Self {
                name: name.to_string(),
                priority,
                enabled: true,
            }
        }
    }

    impl SubRenderer for TestRenderer {
        fn name(&self) -> &str {
            &self.name
        }

        fn priority(&self) -> i32 {
            self.priority
        }

        fn is_enabled(&self) -> bool {
            self.enabled
        }

        fn set_enabled(&mut self, enabled: bool) {
            self.enabled = enabled;
        }

        fn on_init(&mut self, _ctx: &RenderContext) {}
        fn on_resize(&mut self, _ctx: &RenderContext, _width: u32, _height: u32) {}
        fn prepare(&mut self, _ctx: &RenderContext, _scene: &Scene, _meshes: &MeshManager) {}
        fn render<'a>(
            &'a self,
            _pass: &mut wgpu::RenderPass<'a>,
            _scene: &Scene,
            _meshes: &'a MeshManager,
        ) {
        }
    }

    #[test]
    fn test_registry_orders_by_priority() {
        let mut registry = RendererRegistry::new();

        registry.register(TestRenderer::new("gizmo", 1000));
        registry.register(TestRenderer::new("grid", 0));
        registry.register(TestRenderer::new("mesh", 100));

        registry.ensure_sorted();

        let names: Vec<&str> = registry.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["grid", "mesh", "gizmo"]);
    }

    #[test]
    fn test_registry_unregister() {
        let mut registry = RendererRegistry::new();

        registry.register(TestRenderer::new("grid", 0));
        assert!(registry.contains("grid"));

        let removed = registry.unregister("grid");
        assert!(removed.is_some());
        assert!(!registry.contains("grid"));
    }

    #[test]
    fn test_disabled_renderer_can_be_toggled() {
        let mut registry = RendererRegistry::new();
        registry.register(TestRenderer::new("grid", 0));

        registry.get_mut("grid").unwrap().set_enabled(false);
        assert!(!registry.get("grid").unwrap().is_enabled());

        registry.get_mut("grid").unwrap().set_enabled(true);
        assert!(registry.get("grid").unwrap().is_enabled());
    }
}
