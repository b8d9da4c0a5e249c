//! Triangular Lattice Sampling
//!
//! Phase one of the build: every lattice point inside the outer ring gets its
//! final position. Each point depends only on its own coordinates, so rows are
//! split across scoped worker threads and written into a dense grid.

use glam::DVec3;

use super::config::TerrainGeometry;
use super::noise::ImprovedNoise;

const SQRT3_HALF: f64 = 0.866_025_403_784_438_6;

/// Base elevation before any noise is added.
const BASE_HEIGHT: f64 = 10.0;
/// First (finest) fractal octave quality.
const FIRST_QUALITY: f64 = 25.0;
/// Octaves stop once quality exceeds this.
const MAX_QUALITY: f64 = 1500.0;
const QUALITY_STEP: f64 = 5.0;
const MAX_AMPLITUDE: f64 = 150.0;
/// Shoreline jitter octave, applied after the falloff.
const DETAIL_QUALITY: f64 = 5.0;

/// Below this many lattice slots the scan runs on the calling thread.
const PARALLEL_MIN_SLOTS: usize = 16 * 1024;

/// Cartesian `(x, z)` of lattice coordinate `(i, j)`.
pub fn lattice_xz(i: i64, j: i64, unit_size: f64) -> (f64, f64) {
    let i = i as f64;
    let j = j as f64;
    (i * SQRT3_HALF * unit_size, (j - i / 2.0) * unit_size)
}

/// Computes the position of individual lattice points.
pub struct HeightSampler<'a> {
    geometry: &'a TerrainGeometry,
    noise: &'a ImprovedNoise,
    seed: f64,
}

impl<'a> HeightSampler<'a> {
    pub fn new(geometry: &'a TerrainGeometry, noise: &'a ImprovedNoise, seed: f64) -> Self {
        Self {
            geometry,
            noise,
            seed,
        }
    }

    /// Position of lattice point `(i, j)`, or `None` outside the outer ring.
    pub fn sample(&self, i: i64, j: i64) -> Option<DVec3> {
        let g = self.geometry;
        let (x, z) = lattice_xz(i, j, g.unit_size);
        let r = (x * x + z * z).sqrt();

        // a degenerate lattice yields NaN radii
        if r.is_nan() || r > g.outer_radius {
            return None;
        }

        if r <= g.inner_radius {
            Some(DVec3::new(x, self.island_height(x, z, r), z))
        } else if r <= g.middle_radius {
            Some(DVec3::new(x, 0.0, z))
        } else {
            // r > middle_radius > 0 here, so the division is safe
            let scale = g.far / r;
            Some(DVec3::new(x * scale, 0.0, z * scale))
        }
    }

    /// Island elevation at `(x, z)` with radius `r <= inner_radius`.
    ///
    /// Order matters: fractal sum, radial falloff, shoreline jitter (only
    /// where still above water), then the clamp to sea level.
    pub fn island_height(&self, x: f64, z: f64, r: f64) -> f64 {
        let g = self.geometry;
        let mut y = BASE_HEIGHT;

        let mut quality = FIRST_QUALITY;
        while quality <= MAX_QUALITY {
            y += self.octave(x, z, quality) * (quality / 2.0).min(MAX_AMPLITUDE);
            quality *= QUALITY_STEP;
        }

        y *= (g.inner_radius - r).min(g.plateau_edge) / g.plateau_edge;

        if y > 0.0 {
            y += self.octave(x, z, DETAIL_QUALITY) * DETAIL_QUALITY / 2.0;
        }

        // flatten the bottom so it meets the sea
        y.max(0.0)
    }

    fn octave(&self, x: f64, z: f64, quality: f64) -> f64 {
        let offset = self.geometry.middle_radius;
        self.noise
            .noise((x + offset) / quality, (z + offset) / quality, self.seed)
    }
}

/// Sample the whole scan rhombus into a dense row-major grid.
///
/// Slot `(i, j)` lives at [`TerrainGeometry::slot`]; `None` marks points
/// beyond the outer ring.
pub fn sample_lattice(
    geometry: &TerrainGeometry,
    noise: &ImprovedNoise,
    seed: f64,
) -> Vec<Option<DVec3>> {
    let row_len = geometry.row_len();
    let workers = worker_count(row_len * row_len, row_len);
    sample_lattice_with_workers(geometry, noise, seed, workers)
}

/// [`sample_lattice`] split over exactly `workers` threads (at most one per
/// row). The grid does not depend on the split.
pub fn sample_lattice_with_workers(
    geometry: &TerrainGeometry,
    noise: &ImprovedNoise,
    seed: f64,
    workers: usize,
) -> Vec<Option<DVec3>> {
    let row_len = geometry.row_len();
    let mut grid = vec![None; row_len * row_len];
    let sampler = HeightSampler::new(geometry, noise, seed);

    let workers = workers.clamp(1, row_len);
    if workers == 1 {
        fill_rows(&sampler, geometry, 0, &mut grid);
        return grid;
    }

    let rows_per_worker = row_len.div_ceil(workers);
    let core_ids = core_ids();

    std::thread::scope(|scope| {
        for (chunk_index, chunk) in grid.chunks_mut(rows_per_worker * row_len).enumerate() {
            let sampler = &sampler;
            let core = core_ids
                .as_ref()
                .and_then(|ids| ids.get(chunk_index % ids.len()).copied());
            scope.spawn(move || {
                if let Some(core) = core {
                    let _ = core_affinity::set_for_current(core);
                }
                fill_rows(sampler, geometry, chunk_index * rows_per_worker, chunk);
            });
        }
    });

    grid
}

/// Fill `chunk`, whose first row is lattice row `first_row` (0-based).
fn fill_rows(
    sampler: &HeightSampler<'_>,
    geometry: &TerrainGeometry,
    first_row: usize,
    chunk: &mut [Option<DVec3>],
) {
    let row_len = geometry.row_len();
    for (row_offset, row) in chunk.chunks_mut(row_len).enumerate() {
        let i = (first_row + row_offset) as i64 - geometry.scan_size;
        for (col, slot) in row.iter_mut().enumerate() {
            let j = col as i64 - geometry.scan_size;
            *slot = sampler.sample(i, j);
        }
    }
}

fn worker_count(slots: usize, rows: usize) -> usize {
    if slots < PARALLEL_MIN_SLOTS {
        return 1;
    }
    let cores = core_affinity::get_core_ids().map_or(1, |ids| ids.len());
    cores.clamp(1, rows)
}

fn core_ids() -> Option<Vec<core_affinity::CoreId>> {
    core_affinity::get_core_ids().filter(|ids| !ids.is_empty())
}
