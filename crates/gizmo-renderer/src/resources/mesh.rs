//! Mesh resource management

use std::collections::HashMap;

use glam::Vec3;

use crate::context::RenderContext;
use crate::scene::BoundingBox;
use crate::vertex::MeshVertex;

/// Handle to a mesh stored in the MeshManager.
///
/// Handles are lightweight and can be copied freely; the actual mesh data
/// is stored in the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MeshHandle(u64);

impl MeshHandle {
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// GPU mesh data.
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub vertex_count: u32,
    pub index_count: u32,
}

/// CPU mesh data, kept for uploading and for ray picking.
#[derive(Debug, Clone)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
    pub bounds: BoundingBox,
}

impl MeshData {
    pub fn new(vertices: Vec<MeshVertex>, indices: Vec<u32>) -> Self {
        let bounds = Self::compute_bounds(&vertices);
        Self {
            vertices,
            indices,
            bounds,
        }
    }

    /// Triangle corner positions, in index order.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(|chunk| {
            [
                Vec3::from(self.vertices[chunk[0] as usize].position),
                Vec3::from(self.vertices[chunk[1] as usize].position),
                Vec3::from(self.vertices[chunk[2] as usize].position),
            ]
        })
    }

    fn compute_bounds(vertices: &[MeshVertex]) -> BoundingBox {
        if vertices.is_empty() {
            return BoundingBox::empty();
        }
        BoundingBox::from_points(vertices.iter().map(|v| Vec3::from(v.position)))
    }
}

/// Manager for mesh resources.
///
/// Uploads mesh data once and hands out handles; multiple scene objects
/// can share one mesh.
pub struct MeshManager {
    gpu_meshes: HashMap<MeshHandle, GpuMesh>,
    cpu_meshes: HashMap<MeshHandle, MeshData>,
    next_handle: u64,
}

impl MeshManager {
    pub fn new() -> Self {
        Self {
            gpu_meshes: HashMap::new(),
            cpu_meshes: HashMap::new(),
            next_handle: 1,
        }
    }

    /// Uploads mesh data to the GPU and returns a handle.
    pub fn create(&mut self, ctx: &RenderContext, data: MeshData) -> MeshHandle {
        let handle = MeshHandle(self.next_handle);
        self.next_handle += 1;

        let vertex_buffer = ctx.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Vertex Buffer"),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = ctx.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Index Buffer"),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        self.gpu_meshes.insert(
            handle,
            GpuMesh {
                vertex_buffer,
                index_buffer,
                vertex_count: data.vertices.len() as u32,
                index_count: data.indices.len() as u32,
            },
        );
        self.cpu_meshes.insert(handle, data);
        handle
    }

    pub fn gpu(&self, handle: MeshHandle) -> Option<&GpuMesh> {
        self.gpu_meshes.get(&handle)
    }

    /// CPU-side mesh data, used by ray picking.
    pub fn cpu(&self, handle: MeshHandle) -> Option<&MeshData> {
        self.cpu_meshes.get(&handle)
    }

    pub fn remove(&mut self, handle: MeshHandle) -> Option<MeshData> {
        self.gpu_meshes.remove(&handle);
        self.cpu_meshes.remove(&handle)
    }

    pub fn contains(&self, handle: MeshHandle) -> bool {
        self.gpu_meshes.contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.gpu_meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gpu_meshes.is_empty()
    }

    pub fn clear(&mut self) {
        self.gpu_meshes.clear();
        self.cpu_meshes.clear();
    }

    /// Registers CPU-side data without a GPU upload, for tests that
    /// exercise picking and drag math on a headless mesh manager.
    #[cfg(test)]
    pub(crate) fn insert_cpu_for_tests(&mut self, data: MeshData) -> MeshHandle {
        let handle = MeshHandle(self.next_handle);
        self.next_handle += 1;
        self.cpu_meshes.insert(handle, data);
        handle
    }
}

impl Default for MeshManager {
    fn default() -> Self {
        Self::new()
    }
}
