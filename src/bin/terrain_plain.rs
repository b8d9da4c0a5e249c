//! Terrain Plain - Mesh Generator
//!
//! Builds one terrain plain and reports what came out: lattice constants,
//! vertex/face counts, land/sea split and bounds. Nothing is written to disk.
//!
//! Run with: `cargo run --bin terrain-plain -- [config.json] [--seed N] [--log]`
//!
//! The optional JSON file uses the host attribute names, e.g.
//! `{ "middleRadius": 200, "unitSize": 2, "far": 8000, "color": "#6b8e23" }`.
//! Set `RUST_LOG=debug` for the build summary line.

use std::path::PathBuf;
use std::time::Instant;

use terrain_plain_engine::terrain::{Surface, TerrainError, TerrainPlainConfig, build};
use tracing_subscriber::EnvFilter;

struct Args {
    config_path: Option<PathBuf>,
    seed: Option<f64>,
    log: bool,
}

fn parse_args() -> Args {
    let mut args = Args {
        config_path: None,
        seed: None,
        log: false,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--seed" => match iter.next().map(|v| v.parse::<f64>()) {
                Some(Ok(seed)) => args.seed = Some(seed),
                _ => tracing::warn!("--seed expects a number, ignoring"),
            },
            "--log" => args.log = true,
            path => args.config_path = Some(PathBuf::from(path)),
        }
    }

    args
}

fn main() -> Result<(), TerrainError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = parse_args();

    let mut config = match &args.config_path {
        Some(path) => TerrainPlainConfig::from_json_file(path)?,
        None => TerrainPlainConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    config.log |= args.log;
    let config = config.sanitized()?;

    let geometry = config.geometry();
    let start = Instant::now();
    let mesh = build(&config);
    let elapsed = start.elapsed();

    tracing::info!("Terrain plain built in {:.1} ms", elapsed.as_secs_f64() * 1000.0);
    tracing::info!("  Lattice: size {} scan {} unit {:.4}", geometry.size, geometry.scan_size, geometry.unit_size);
    tracing::info!(
        "  Radii: inner {:.4} middle {:.4} outer {:.4} far {:.1}",
        geometry.inner_radius,
        geometry.middle_radius,
        geometry.outer_radius,
        geometry.far
    );
    tracing::info!("  Vertices: {}", mesh.vertex_count());
    tracing::info!(
        "  Faces: {} ({} land, {} sea)",
        mesh.face_count(),
        mesh.count_faces(Surface::Land),
        mesh.count_faces(Surface::Sea)
    );
    if mesh.bounds.is_empty() {
        tracing::info!("  Bounds: empty");
    } else {
        tracing::info!("  Bounds: {} .. {}", mesh.bounds.min, mesh.bounds.max);
    }

    Ok(())
}
