//! Terrain configuration errors.
//!
//! Mesh generation itself never fails; everything here is raised while
//! loading or sanitizing a configuration.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TerrainError {
    #[error("{field} must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("invalid color: {0:?}")]
    InvalidColor(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
