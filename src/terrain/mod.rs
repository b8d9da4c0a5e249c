//! Terrain Module
//!
//! Procedural island terrain on a triangular lattice, ringed by a flat sea
//! and a plain stretched out to the far distance.

pub mod builder;
pub mod color;
pub mod config;
pub mod error;
pub mod lattice;
pub mod mesh;
pub mod noise;

pub use builder::{build, build_with_noise, stitch};
pub use color::Color;
pub use config::{TerrainGeometry, TerrainPlainConfig};
pub use error::TerrainError;
pub use lattice::{HeightSampler, lattice_xz, sample_lattice, sample_lattice_with_workers};
pub use mesh::{Bounds, Face, Surface, TerrainMesh};
pub use noise::ImprovedNoise;
