//! Terrain Plain Configuration
//!
//! Host-facing parameters plus the lattice constants derived from them.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::color::Color;
use super::error::TerrainError;

/// Added to the inner and outer radii so lattice points that sit exactly on
/// a ring are counted inside it.
pub const RADIUS_EPSILON: f64 = 0.0001;

/// Empirical over-scan of the lattice so its rhombus covers the whole disk.
pub const SCAN_FACTOR: f64 = 1.16;

pub const MIN_MIDDLE_RADIUS: f64 = 10.0;
pub const MIN_UNIT_SIZE: f64 = 0.1;
pub const MAX_UNIT_SIZE: f64 = 1000.0;

/// Lattice steps are capped here so the scan rhombus stays indexable.
pub const MAX_LATTICE_SIZE: i64 = 1 << 20;

/// Parameters of one terrain plain instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TerrainPlainConfig {
    /// Radius where the sea ring ends and the horizon plain begins
    pub middle_radius: f64,
    /// Target lattice spacing (re-normalized to divide `middle_radius`)
    pub unit_size: f64,
    /// Distance the outer ring is pushed out to
    pub far: f64,
    #[serde(alias = "color")]
    pub land_color: Color,
    pub sea_color: Color,
    /// Emit the lattice diagnostics line at info level
    pub log: bool,
    /// Noise seed; drawn from [0, 100) when absent
    pub seed: Option<f64>,
}

impl Default for TerrainPlainConfig {
    fn default() -> Self {
        Self {
            middle_radius: 100.0,
            unit_size: 1.0,
            far: 4000.0,
            land_color: Color::from_hex(0x6b8e23),
            sea_color: Color::from_hex(0x4682b4),
            log: false,
            seed: None,
        }
    }
}

impl TerrainPlainConfig {
    /// Parse a JSON config and clamp it with [`Self::sanitized`].
    pub fn from_json_str(json: &str) -> Result<Self, TerrainError> {
        let config: Self = serde_json::from_str(json)?;
        config.sanitized()
    }

    pub fn from_json_file(path: &Path) -> Result<Self, TerrainError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn with_seed(mut self, seed: f64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Clamp values into the ranges the host schema allows.
    ///
    /// Out-of-range numbers are pulled back silently; only NaN/infinite
    /// values are rejected since there is nothing sensible to clamp them to.
    pub fn sanitized(mut self) -> Result<Self, TerrainError> {
        check_finite("middleRadius", self.middle_radius)?;
        check_finite("unitSize", self.unit_size)?;
        check_finite("far", self.far)?;
        if let Some(seed) = self.seed {
            check_finite("seed", seed)?;
        }

        self.middle_radius = self.middle_radius.max(MIN_MIDDLE_RADIUS);
        self.unit_size = self.unit_size.clamp(MIN_UNIT_SIZE, MAX_UNIT_SIZE);
        self.far = self.far.max(0.0);
        Ok(self)
    }

    pub fn geometry(&self) -> TerrainGeometry {
        TerrainGeometry::derive(self.middle_radius, self.unit_size, self.far)
    }
}

fn check_finite(field: &'static str, value: f64) -> Result<(), TerrainError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(TerrainError::NonFinite { field, value })
    }
}

/// Lattice constants derived from a configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainGeometry {
    pub middle_radius: f64,
    /// Number of lattice steps from the center to `middle_radius`
    pub size: i64,
    /// Spacing that divides `middle_radius` exactly
    pub unit_size: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
    /// Far distance, never below `outer_radius`
    pub far: f64,
    /// Width of the falloff ring inside `inner_radius`
    pub plateau_edge: f64,
    /// Lattice coordinates run over `-scan_size..=scan_size`
    pub scan_size: i64,
}

impl TerrainGeometry {
    pub fn derive(middle_radius: f64, unit_size: f64, far: f64) -> Self {
        let steps = middle_radius / unit_size;
        // zero, negative and non-finite ratios collapse to an empty lattice
        let size = if steps.is_finite() {
            steps.round().clamp(0.0, MAX_LATTICE_SIZE as f64) as i64
        } else {
            0
        };
        // size == 0 leaves these non-finite; the lattice then materializes nothing
        let unit_size = middle_radius / size as f64;
        let inner_radius = (size as f64 - 1.0) * unit_size + RADIUS_EPSILON;
        let outer_radius = (size as f64 + 1.0) * unit_size + RADIUS_EPSILON;
        let far = if far > outer_radius { far } else { outer_radius };

        Self {
            middle_radius,
            size,
            unit_size,
            inner_radius,
            outer_radius,
            far,
            plateau_edge: inner_radius / 4.0,
            scan_size: (size as f64 * SCAN_FACTOR).ceil() as i64,
        }
    }

    /// Points per lattice row.
    pub fn row_len(&self) -> usize {
        (2 * self.scan_size + 1) as usize
    }

    /// Dense slot of lattice coordinate `(i, j)`.
    pub fn slot(&self, i: i64, j: i64) -> usize {
        ((i + self.scan_size) * (2 * self.scan_size + 1) + (j + self.scan_size)) as usize
    }

    /// Whether `(i, j)` lies inside the scanned rhombus.
    pub fn in_scan(&self, i: i64, j: i64) -> bool {
        (-self.scan_size..=self.scan_size).contains(&i)
            && (-self.scan_size..=self.scan_size).contains(&j)
    }
}
