//! Terrain Plain Engine Library
//!
//! A high-resolution procedural island surrounded by a flat sea and a
//! low-resolution plain that runs out to the horizon.
//!
//! # Modules
//!
//! - [`terrain`] - Noise, lattice sampling and mesh building
//! - [`render`] - Vertex buffer format and the vertex-color+noise material
//!
//! # Example
//!
//! ```ignore
//! use terrain_plain_engine::terrain::{TerrainPlainConfig, build};
//! use terrain_plain_engine::render::{TerrainGpuMesh, VertexColorNoiseMaterial};
//!
//! let config = TerrainPlainConfig::default().with_seed(42.0);
//! let mesh = build(&config);
//!
//! let gpu_mesh = TerrainGpuMesh::upload(&device, &mesh);
//! let mut material = VertexColorNoiseMaterial::new(&device, surface_format);
//! material.update(&queue, view_proj, elapsed_msec);
//! material.draw(&mut render_pass, &gpu_mesh);
//! ```

pub mod render;

// Terrain generation (located in src/terrain/ directory)
#[path = "../../src/terrain/mod.rs"]
pub mod terrain;

pub use render::{TerrainGpuMesh, TerrainVertex, VertexColorNoiseMaterial, VertexColorNoiseParams};
pub use terrain::{TerrainError, TerrainMesh, TerrainPlainConfig, build};
