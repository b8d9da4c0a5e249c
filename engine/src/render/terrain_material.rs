//! Vertex Color + Noise Material
//!
//! Terrain shader that interpolates the baked vertex colors, lights them from
//! a fixed sun direction and adds animated noise.
//! Features:
//! - Sun position normalized every time it is set
//! - Waves offset `(sin t, 0, cos 1.33333t)` recomputed on every update tick
//!
//! # Usage
//!
//! ```rust,ignore
//! // Initialize
//! let mut material = VertexColorNoiseMaterial::new(&device, surface_format);
//! let gpu_mesh = TerrainGpuMesh::upload(&device, &mesh);
//!
//! // Each frame
//! material.update(&queue, view_proj, elapsed_msec);
//!
//! // Render
//! material.draw(&mut render_pass, &gpu_mesh);
//! ```

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use super::vertex::{TerrainGpuMesh, TerrainVertex};

/// WGSL source of the terrain material.
pub const VERTEX_COLOR_NOISE_WGSL: &str = include_str!("../../../shaders/vertex_color_noise.wgsl");

/// Sun position used when none is configured.
pub const DEFAULT_SUN_POSITION: Vec3 = Vec3::new(-1.0, 1.0, -1.0);

/// Ratio between the x and z wave frequencies.
const WAVES_Z_RATE: f32 = 1.33333;

/// CPU-side uniform state of the material.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VertexColorNoiseParams {
    /// Unit vector towards the sun
    pub sun_normal: Vec3,
    /// Animated noise offset
    pub waves_offset: Vec3,
}

impl Default for VertexColorNoiseParams {
    fn default() -> Self {
        Self::new(DEFAULT_SUN_POSITION)
    }
}

impl VertexColorNoiseParams {
    pub fn new(sun_position: Vec3) -> Self {
        let mut params = Self {
            sun_normal: Vec3::Y,
            waves_offset: Vec3::ZERO,
        };
        params.set_sun_position(sun_position);
        params
    }

    /// A zero vector keeps the previous direction.
    pub fn set_sun_position(&mut self, sun_position: Vec3) {
        self.sun_normal = sun_position.normalize_or(self.sun_normal);
    }

    /// Advance the waves to `time_msec` milliseconds of elapsed time.
    /// A zero time leaves the offset untouched.
    pub fn set_time(&mut self, time_msec: f32) {
        if time_msec == 0.0 {
            return;
        }
        let time = time_msec / 1000.0;
        self.waves_offset = Vec3::new(time.sin(), 0.0, (time * WAVES_Z_RATE).cos());
    }

    pub fn uniforms(&self, view_proj: Mat4) -> TerrainUniforms {
        TerrainUniforms {
            view_proj: view_proj.to_cols_array_2d(),
            sun_normal: self.sun_normal.to_array(),
            _pad0: 0.0,
            waves_offset: self.waves_offset.to_array(),
            _pad1: 0.0,
        }
    }
}

/// GPU uniform buffer layout (must match WGSL struct)
/// Total size: 96 bytes (aligned to 16)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct TerrainUniforms {
    pub view_proj: [[f32; 4]; 4], // 64 bytes (offset 0)
    pub sun_normal: [f32; 3],     // 12 bytes (offset 64)
    pub _pad0: f32,               // 4 bytes (offset 76)
    pub waves_offset: [f32; 3],   // 12 bytes (offset 80)
    pub _pad1: f32,               // 4 bytes (offset 92)
}

const _: () = assert!(std::mem::size_of::<TerrainUniforms>() == 96);
const _: () = assert!(std::mem::size_of::<TerrainUniforms>() % 16 == 0);

/// Terrain material renderer
pub struct VertexColorNoiseMaterial {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    params: VertexColorNoiseParams,
}

impl VertexColorNoiseMaterial {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        Self::with_params(device, surface_format, VertexColorNoiseParams::default())
    }

    pub fn with_params(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        params: VertexColorNoiseParams,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Vertex Color Noise Shader"),
            source: wgpu::ShaderSource::Wgsl(VERTEX_COLOR_NOISE_WGSL.into()),
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Vertex Color Noise Uniform Buffer"),
            size: std::mem::size_of::<TerrainUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Vertex Color Noise Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Vertex Color Noise Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Vertex Color Noise Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Vertex Color Noise Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[TerrainVertex::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // horizon slivers can flip winding when projected out to far
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        tracing::debug!(sun = ?params.sun_normal, "vertex-color+noise material initialized");

        Self {
            pipeline,
            uniform_buffer,
            bind_group,
            params,
        }
    }

    pub fn params(&self) -> &VertexColorNoiseParams {
        &self.params
    }

    pub fn set_sun_position(&mut self, sun_position: Vec3) {
        self.params.set_sun_position(sun_position);
    }

    /// Per-frame tick: recompute the waves offset and upload the uniforms.
    pub fn update(&mut self, queue: &wgpu::Queue, view_proj: Mat4, time_msec: f32) {
        self.params.set_time(time_msec);
        let uniforms = self.params.uniforms(view_proj);
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>, mesh: &TerrainGpuMesh) {
        if mesh.vertex_count == 0 {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        render_pass.draw(0..mesh.vertex_count, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sun_normalized_on_set() {
        let mut params = VertexColorNoiseParams::default();
        assert!((params.sun_normal.length() - 1.0).abs() < 1e-6);
        assert!((params.sun_normal - Vec3::new(-1.0, 1.0, -1.0).normalize()).length() < 1e-6);

        params.set_sun_position(Vec3::new(0.0, 10.0, 0.0));
        assert!((params.sun_normal - Vec3::Y).length() < 1e-6);

        let before = params.sun_normal;
        params.set_sun_position(Vec3::ZERO);
        assert_eq!(params.sun_normal, before);
    }

    #[test]
    fn test_waves_offset_follows_time() {
        let mut params = VertexColorNoiseParams::default();
        params.set_time(1500.0);
        let expected = Vec3::new(1.5f32.sin(), 0.0, (1.5f32 * 1.33333).cos());
        assert!((params.waves_offset - expected).length() < 1e-6);

        params.set_time(0.0);
        assert!((params.waves_offset - expected).length() < 1e-6);
    }

    #[test]
    fn test_uniform_packing() {
        let mut params = VertexColorNoiseParams::new(Vec3::X);
        params.set_time(1000.0);
        let uniforms = params.uniforms(Mat4::IDENTITY);
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&uniforms));

        assert_eq!(floats.len(), 24);
        assert_eq!(floats[0], 1.0);
        assert_eq!(&floats[16..19], &[1.0, 0.0, 0.0]);
        assert_eq!(floats[20], 1.0f32.sin());
    }
}
