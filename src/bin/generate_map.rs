//! Map preview generator: runs the full pipeline for the chunk at the origin.
//!
//! Usage: cargo run --release --bin generate_map -- [OPTIONS]
//!
//! Options:
//!   --config <PATH>   Terrain config JSON (default: built-in defaults)
//!   --mode <MODE>     noise | colour | mesh | falloff (default: from config)
//!   --seed <SEED>     Override the noise seed
//!   --lod <LOD>       Override the preview LOD for mesh mode (0-6)
//!   --falloff         Subtract the island falloff mask
//!   --out <DIR>       Output directory (default: "output")
//!   --name <NAME>     Output file stem (default: "map")
//!
//! Output:
//!   <out>/<name>.png            # Preview texture
//!   <out>/<name>.vbuf           # Mesh mode: interleaved vertices (pos, normal, uv)
//!   <out>/<name>.ibuf           # Mesh mode: u32 triangle indices

use std::path::PathBuf;

use heightstream::core::{logging, Error, Result};
use heightstream::generation::{DrawMode, MapGenerator, TerrainConfig};
use heightstream::render::ImageFileDisplay;

fn main() -> Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().collect();

    let mut config = match parse_str_arg(&args, "--config") {
        Some(path) => TerrainConfig::load(&PathBuf::from(path))?,
        None => TerrainConfig::default(),
    };
    let generator_config = &mut config.generator;
    if let Some(mode) = parse_str_arg(&args, "--mode") {
        generator_config.draw_mode = parse_draw_mode(&mode)?;
    }
    if let Some(seed) = parse_u32_arg(&args, "--seed") {
        generator_config.noise.seed = seed;
    }
    if let Some(lod) = parse_u32_arg(&args, "--lod") {
        generator_config.mesh.preview_lod = lod;
    }
    if args.iter().any(|a| a == "--falloff") {
        generator_config.use_falloff = true;
    }
    let out = parse_str_arg(&args, "--out").unwrap_or_else(|| "output".to_string());
    let name = parse_str_arg(&args, "--name").unwrap_or_else(|| "map".to_string());

    println!("=== Heightstream Map Generator ===");
    println!("Mode:   {:?}", generator_config.draw_mode);
    println!("Seed:   {}", generator_config.noise.seed);
    println!("Scale:  {}, Octaves: {}", generator_config.noise.scale, generator_config.noise.octaves);
    println!("Output: {}", PathBuf::from(&out).join(&name).display());
    println!();

    let generator = MapGenerator::new(config.generator)?;
    let mut display = ImageFileDisplay::new(&out, &name);
    generator.draw_map_in_editor(&mut display)?;

    println!("Wrote {}", display.texture_path().display());
    if generator.config().draw_mode == DrawMode::Mesh {
        println!("Wrote {}", display.vertex_path().display());
        println!("Wrote {}", display.index_path().display());
    }
    Ok(())
}

fn parse_draw_mode(mode: &str) -> Result<DrawMode> {
    match mode {
        "noise" => Ok(DrawMode::NoiseMap),
        "colour" | "color" => Ok(DrawMode::ColourMap),
        "mesh" => Ok(DrawMode::Mesh),
        "falloff" => Ok(DrawMode::FalloffMap),
        other => Err(Error::Config(format!("unknown draw mode '{}'", other))),
    }
}

fn parse_u32_arg(args: &[String], flag: &str) -> Option<u32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
