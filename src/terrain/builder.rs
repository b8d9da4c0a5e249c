//! Terrain Plain Builder
//!
//! Stitches the sampled lattice into triangles. Vertex indices are assigned in
//! row-major `(i, j)` order, and each new point closes up to two triangles
//! against the already-placed neighbors `(i, j-1)`, `(i-1, j-1)` and
//! `(i-1, j)`. Points missing any of those (the ragged disk edge) simply emit
//! fewer triangles.

use glam::DVec3;
use rand::Rng;
use tracing::{debug, info};

use super::color::Color;
use super::config::{TerrainGeometry, TerrainPlainConfig};
use super::lattice::sample_lattice;
use super::mesh::{Face, Surface, TerrainMesh};
use super::noise::ImprovedNoise;

/// Marks an empty slot in the dense index table.
const NO_VERTEX: u32 = u32::MAX;

/// Seeds drawn when none is configured fall in `0..RANDOM_SEED_RANGE`.
const RANDOM_SEED_RANGE: f64 = 100.0;

/// Build a terrain plain, drawing a random seed unless one is configured.
pub fn build(config: &TerrainPlainConfig) -> TerrainMesh {
    let seed = config
        .seed
        .unwrap_or_else(|| rand::thread_rng().gen_range(0.0..RANDOM_SEED_RANGE));
    build_with_noise(config, &ImprovedNoise::new(), seed)
}

/// Build with an explicit noise table and seed. Pure: identical inputs give
/// identical meshes.
pub fn build_with_noise(
    config: &TerrainPlainConfig,
    noise: &ImprovedNoise,
    seed: f64,
) -> TerrainMesh {
    let geometry = config.geometry();

    if config.log {
        info!(
            size = geometry.size,
            scan_size = geometry.scan_size,
            unit_size = geometry.unit_size,
            middle_radius = config.middle_radius,
            far = geometry.far,
            "terrain-plain"
        );
    }

    let grid = sample_lattice(&geometry, noise, seed);
    let (positions, faces) = stitch(&geometry, &grid, config.land_color, config.sea_color);
    let mesh = TerrainMesh::finish(positions, faces);

    debug!(
        seed,
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        land_faces = mesh.count_faces(Surface::Land),
        "terrain-plain built"
    );

    mesh
}

/// Assign vertex indices and emit colored faces from a sampled grid.
pub fn stitch(
    geometry: &TerrainGeometry,
    grid: &[Option<DVec3>],
    land_color: Color,
    sea_color: Color,
) -> (Vec<DVec3>, Vec<Face>) {
    let materialized = grid.iter().filter(|p| p.is_some()).count();
    let mut positions: Vec<DVec3> = Vec::with_capacity(materialized);
    let mut faces = Vec::with_capacity(materialized * 2);
    let mut index_of = vec![NO_VERTEX; grid.len()];

    let scan = geometry.scan_size;
    for i in -scan..=scan {
        for j in -scan..=scan {
            let slot = geometry.slot(i, j);
            let Some(position) = grid[slot] else {
                continue;
            };

            let current = positions.len() as u32;
            index_of[slot] = current;
            positions.push(position);

            let placed = |i: i64, j: i64| {
                if !geometry.in_scan(i, j) {
                    return None;
                }
                let index = index_of[geometry.slot(i, j)];
                (index != NO_VERTEX).then_some(index)
            };
            let left = placed(i, j - 1);
            let left_down = placed(i - 1, j - 1);
            let down = placed(i - 1, j);

            // land wins if any corner is above sea level
            let face = |indices: [u32; 3]| {
                let land = indices.iter().any(|&v| positions[v as usize].y != 0.0);
                if land {
                    Face::new(indices, Surface::Land, land_color)
                } else {
                    Face::new(indices, Surface::Sea, sea_color)
                }
            };

            if let (Some(b), Some(c)) = (left, left_down) {
                faces.push(face([current, b, c]));
            }
            if let (Some(c), Some(d)) = (left_down, down) {
                faces.push(face([current, c, d]));
            }
        }
    }

    (positions, faces)
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLog {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    /// Run a build with an info-level subscriber writing into a buffer.
    fn build_logged(config: &TerrainPlainConfig) -> String {
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            build_with_noise(config, &ImprovedNoise::new(), 3.0);
        });
        log.text()
    }

    fn small_config() -> TerrainPlainConfig {
        TerrainPlainConfig {
            middle_radius: 20.0,
            unit_size: 1.0,
            far: 500.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_stitch_full_rhombus() {
        // every slot filled: (2S+1)^2 points, 2 * (2S)^2 triangles
        let geometry = TerrainGeometry::derive(2.0, 1.0, 10.0);
        let grid = vec![Some(DVec3::ZERO); geometry.row_len() * geometry.row_len()];
        let (positions, faces) = stitch(&geometry, &grid, Color::WHITE, Color::WHITE);

        let side = geometry.row_len();
        assert_eq!(positions.len(), side * side);
        assert_eq!(faces.len(), 2 * (side - 1) * (side - 1));
        assert!(faces.iter().all(|f| f.surface == Surface::Sea));
    }

    #[test]
    fn test_stitch_skips_missing_neighbors() {
        let geometry = TerrainGeometry::derive(2.0, 1.0, 10.0);
        let mut grid = vec![None; geometry.row_len() * geometry.row_len()];
        grid[geometry.slot(0, 0)] = Some(DVec3::ZERO);
        grid[geometry.slot(0, 1)] = Some(DVec3::new(0.0, 0.0, 1.0));
        grid[geometry.slot(1, 1)] = Some(DVec3::new(0.866, 3.0, 0.5));
        let (positions, faces) = stitch(&geometry, &grid, Color::WHITE, Color::WHITE);

        assert_eq!(positions.len(), 3);
        // (1, 1) has no left neighbor, so only the (current, left-down, down) triangle
        assert_eq!(faces.len(), 1);
        assert_eq!(faces[0].indices, [2, 0, 1]);
        assert_eq!(faces[0].surface, Surface::Land);
    }

    #[test]
    fn test_build_is_deterministic() {
        let config = small_config();
        let noise = ImprovedNoise::new();
        let a = build_with_noise(&config, &noise, 33.0);
        let b = build_with_noise(&config, &noise, 33.0);
        assert_eq!(a.positions, b.positions);
        assert_eq!(a.faces, b.faces);
    }

    #[test]
    fn test_configured_seed_is_used() {
        let config = small_config().with_seed(5.0);
        let a = build(&config);
        let b = build_with_noise(&config, &ImprovedNoise::new(), 5.0);
        assert_eq!(a.positions, b.positions);
    }

    #[test]
    fn test_log_flag_emits_diagnostics() {
        let quiet = build_logged(&small_config());
        assert!(!quiet.contains("terrain-plain"), "unexpected output: {quiet}");

        let config = TerrainPlainConfig {
            log: true,
            ..small_config()
        };
        let logged = build_logged(&config);
        assert!(logged.contains("INFO"), "missing line: {logged}");
        assert!(logged.contains("terrain-plain"));
        assert!(logged.contains("size=20"));
        assert!(logged.contains("scan_size=24"));
        // the debug summary stays below the info filter
        assert!(!logged.contains("terrain-plain built"));
    }
}
