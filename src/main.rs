//! Heightstream - headless endless terrain flythrough
//!
//! Usage: cargo run --release -- [OPTIONS]
//!
//! Options:
//!   --config <PATH>   Terrain config JSON (default: built-in defaults)
//!   --ticks <N>       Number of simulated frames (default: 600)
//!   --speed <UNITS>   Viewer speed in world units per frame (default: 4.0)

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use glam::{Vec2, Vec3};

use heightstream::core::{logging, Result};
use heightstream::generation::{MapGenerator, TerrainConfig};
use heightstream::render::{ChunkDisplay, TerrainTexture};
use heightstream::streaming::{ChunkCoord, EndlessTerrain};
use heightstream::terrain::MeshData;

const FRAME_TIME: Duration = Duration::from_millis(16);

/// Counts what a renderer would have been asked to do
#[derive(Default)]
struct StatsDisplay {
    created: usize,
    textures: usize,
    mesh_swaps: usize,
    triangles_uploaded: usize,
    shown: usize,
    hidden: usize,
}

impl ChunkDisplay for StatsDisplay {
    fn chunk_created(&mut self, coord: ChunkCoord, world_position: Vec3) {
        self.created += 1;
        log::trace!("Created {:?} at {}", coord, world_position);
    }

    fn set_chunk_texture(&mut self, _coord: ChunkCoord, _texture: &TerrainTexture) {
        self.textures += 1;
    }

    fn set_chunk_mesh(&mut self, _coord: ChunkCoord, mesh: &MeshData) {
        self.mesh_swaps += 1;
        self.triangles_uploaded += mesh.triangle_count();
    }

    fn set_chunk_visible(&mut self, _coord: ChunkCoord, visible: bool) {
        if visible {
            self.shown += 1;
        } else {
            self.hidden += 1;
        }
    }
}

fn main() -> Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().collect();
    let config = match parse_str_arg(&args, "--config") {
        Some(path) => TerrainConfig::load(&PathBuf::from(path))?,
        None => TerrainConfig::default(),
    };
    let ticks = parse_usize_arg(&args, "--ticks").unwrap_or(600);
    let speed = parse_f32_arg(&args, "--speed").unwrap_or(4.0);

    let generator = Arc::new(MapGenerator::new(config.generator)?);
    let mut terrain = EndlessTerrain::new(generator, &config.streaming, StatsDisplay::default())?;

    log::info!("Flying {} frames at {} units/frame", ticks, speed);

    // Slow curve so the viewer crosses chunk borders on both axes
    let direction = Vec2::new(1.0, 0.35).normalize();
    let start = Instant::now();
    let mut rebuilds = 0;

    for tick in 0..ticks {
        let frame_start = Instant::now();
        let along = direction * speed * tick as f32;
        let viewer = Vec3::new(along.x, 0.0, along.y);

        if terrain.update(viewer) {
            rebuilds += 1;
        }

        if tick % 120 == 0 {
            let display = terrain.display();
            log::info!(
                "[{}/{}] viewer ({:.0}, {:.0}): {} chunks, {} visible, {} pending, {} mesh swaps",
                tick,
                ticks,
                viewer.x,
                viewer.z,
                terrain.chunk_count(),
                terrain.visible_chunks().len(),
                terrain.queue().pending_count(),
                display.mesh_swaps
            );
        }

        if let Some(remaining) = FRAME_TIME.checked_sub(frame_start.elapsed()) {
            std::thread::sleep(remaining);
        }
    }

    let display = terrain.display();
    log::info!(
        "Done in {:.1?}: {} window rebuilds, {} chunks created, {} textures, {} mesh swaps ({} triangles), {} shown, {} hidden",
        start.elapsed(),
        rebuilds,
        display.created,
        display.textures,
        display.mesh_swaps,
        display.triangles_uploaded,
        display.shown,
        display.hidden
    );
    log::info!(
        "Dispatched {} map and {} mesh tasks",
        terrain.queue().maps_dispatched(),
        terrain.queue().meshes_dispatched()
    );
    Ok(())
}

fn parse_f32_arg(args: &[String], flag: &str) -> Option<f32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_usize_arg(args: &[String], flag: &str) -> Option<usize> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
