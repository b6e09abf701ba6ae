//! Fixed-capacity instance buffers

use bytemuck::Pod;

/// GPU buffer holding per-instance vertex data.
///
/// Capacity is fixed at creation; updates beyond it are truncated with a
/// warning rather than reallocating mid-frame.
pub struct InstanceBuffer<T: Pod> {
    buffer: wgpu::Buffer,
    capacity: usize,
    count: u32,
    label: String,
    _marker: std::marker::PhantomData<T>,
}

impl<T: Pod> InstanceBuffer<T> {
    pub fn new(device: &wgpu::Device, label: &str, capacity: usize) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{} Instance Buffer", label)),
            size: (capacity * std::mem::size_of::<T>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self {
            buffer,
            capacity,
            count: 0,
            label: label.to_string(),
            _marker: std::marker::PhantomData,
        }
    }

    /// Writes `instances` into the buffer, truncating at capacity.
    pub fn update(&mut self, queue: &wgpu::Queue, instances: &[T]) {
        let mut instances = instances;
        if instances.len() > self.capacity {
            tracing::warn!(
                "{}: {} instances exceed capacity {}, truncating",
                self.label,
                instances.len(),
                self.capacity
            );
            instances = &instances[..self.capacity];
        }
        self.count = instances.len() as u32;
        if !instances.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(instances));
        }
    }

    pub fn slice(&self) -> wgpu::BufferSlice<'_> {
        self.buffer.slice(..)
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
