//! Terrain Vertex Buffers
//!
//! GPU-side vertex format for terrain meshes and the upload helper that turns
//! a finished [`TerrainMesh`] into a vertex buffer.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::terrain::TerrainMesh;

/// Vertex for terrain meshes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

// Must match the vertex input of vertex_color_noise.wgsl
static_assertions::assert_eq_size!(TerrainVertex, [u8; 40]);

impl TerrainVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] = [
        // position: Float32x3 @ offset 0
        wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x3,
            offset: 0,
            shader_location: 0,
        },
        // normal: Float32x3 @ offset 12
        wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x3,
            offset: 12,
            shader_location: 1,
        },
        // color: Float32x4 @ offset 24
        wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x4,
            offset: 24,
            shader_location: 2,
        },
    ];

    /// Vertex buffer layout: 40 bytes stride, 3 attributes
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TerrainVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// A terrain mesh uploaded to the GPU as a non-indexed triangle list.
pub struct TerrainGpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub vertex_count: u32,
}

impl TerrainGpuMesh {
    pub fn upload(device: &wgpu::Device, mesh: &TerrainMesh) -> Self {
        let vertices = mesh.vertex_buffer();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Terrain Plain Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Self {
            vertex_buffer,
            vertex_count: vertices.len() as u32,
        }
    }
}
