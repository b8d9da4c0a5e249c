//! Render Module
//!
//! GPU-facing side of the terrain plain: the vertex format the mesh is
//! flattened into and the vertex-color+noise material that draws it.

pub mod terrain_material;
pub mod vertex;

pub use terrain_material::{
    DEFAULT_SUN_POSITION, TerrainUniforms, VERTEX_COLOR_NOISE_WGSL, VertexColorNoiseMaterial,
    VertexColorNoiseParams,
};
pub use vertex::{TerrainGpuMesh, TerrainVertex};
