//! Vertex, instance and uniform buffer creation.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

/// GPU buffer allocator for static geometry and per-draw data.
pub struct BufferAllocator<'a> {
    device: &'a wgpu::Device,
}

impl<'a> BufferAllocator<'a> {
    pub fn new(device: &'a wgpu::Device) -> Self {
        Self { device }
    }

    /// Create a vertex buffer from a slice of vertices.
    pub fn create_vertex_buffer<T: Pod>(&self, label: &str, data: &[T]) -> wgpu::Buffer {
        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(data),
                usage: wgpu::BufferUsages::VERTEX,
            })
    }

    /// Create a per-instance vertex buffer, or `None` when there is nothing to draw.
    pub fn create_instance_buffer<T: Pod>(
        &self,
        label: &str,
        instances: &[T],
    ) -> Option<wgpu::Buffer> {
        if instances.is_empty() {
            return None;
        }
        Some(self.create_vertex_buffer(label, instances))
    }

    /// Create a uniform buffer holding `value`, writable with `queue.write_buffer`.
    pub fn create_uniform_buffer<T: Pod>(&self, label: &str, value: &T) -> wgpu::Buffer {
        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::bytes_of(value),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            })
    }
}

/// Position-only vertex.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct VertexPosition {
    pub position: [f32; 3],
}

impl VertexPosition {
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<VertexPosition>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            }],
        }
    }
}

/// Vertex with position and an RGB tint.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct VertexPositionColor {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl VertexPositionColor {
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        use wgpu::{VertexAttribute, VertexFormat};

        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<VertexPositionColor>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: VertexFormat::Float32x3,
                },
                VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Vertex with position and texture coordinates.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct VertexPositionUv {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl VertexPositionUv {
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        use wgpu::{VertexAttribute, VertexFormat};

        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<VertexPositionUv>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: VertexFormat::Float32x3,
                },
                VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: VertexFormat::Float32x2,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::init_headless_blocking;

    #[test]
    fn test_vertex_position_layout() {
        let layout = VertexPosition::layout();
        assert_eq!(layout.array_stride, 12);
        assert_eq!(layout.attributes.len(), 1);
    }

    #[test]
    fn test_vertex_position_color_layout() {
        let layout = VertexPositionColor::layout();
        // position (f32×3) + color (f32×3)
        assert_eq!(layout.array_stride, 24);
        assert_eq!(layout.attributes[1].offset, 12);
        assert_eq!(layout.attributes[1].format, wgpu::VertexFormat::Float32x3);
    }

    #[test]
    fn test_vertex_position_uv_layout() {
        let layout = VertexPositionUv::layout();
        assert_eq!(layout.array_stride, 20);
        assert_eq!(layout.attributes[1].shader_location, 1);
        assert_eq!(layout.attributes[1].format, wgpu::VertexFormat::Float32x2);
    }

    #[test]
    fn test_empty_instance_list_allocates_nothing() {
        let Ok(ctx) = init_headless_blocking() else {
            return;
        };
        let allocator = BufferAllocator::new(&ctx.device);
        let empty: &[[f32; 4]] = &[];
        assert!(allocator.create_instance_buffer("none", empty).is_none());
    }

    #[test]
    fn test_buffers_are_sized_from_contents() {
        let Ok(ctx) = init_headless_blocking() else {
            return;
        };
        let allocator = BufferAllocator::new(&ctx.device);
        let vertices = [VertexPosition { position: [0.0; 3] }; 4];
        let buffer = allocator.create_vertex_buffer("quad", &vertices);
        assert_eq!(buffer.size(), 48);

        let instances = allocator
            .create_instance_buffer("one", &[[1.0f32; 4]])
            .unwrap();
        assert_eq!(instances.size(), 16);

        let uniform = allocator.create_uniform_buffer("mat", &[[0.0f32; 4]; 4]);
        assert_eq!(uniform.size(), 64);
        assert!(uniform.usage().contains(wgpu::BufferUsages::COPY_DST));
    }
}
