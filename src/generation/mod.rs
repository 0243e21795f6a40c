//! Map generation pipeline: noise heightfield -> falloff -> terrain bands -> mesh.
//!
//! [`MapGenerator`] is immutable after construction and shared with the
//! background workers behind an `Arc`; every method is a pure function of
//! its inputs.

pub mod config;
pub mod queue;

pub use config::{DrawMode, MapGeneratorConfig, MeshSettings, TerrainConfig};
pub use queue::{GenerationQueue, MapDataResult, MeshDataResult};

use std::time::Instant;

use glam::Vec2;

use crate::core::Result;
use crate::render::display::MapDisplay;
use crate::render::texture::{texture_from_color_map, texture_from_height_map};
use crate::terrain::falloff::generate_falloff_map;
use crate::terrain::grid::{ColorMap, HeightMap};
use crate::terrain::mesh::{generate_terrain_mesh, MeshData};
use crate::terrain::noise_map::generate_noise_map;
use crate::terrain::regions::TerrainRegions;

/// Samples per side of one chunk's heightfield. `MAP_CHUNK_SIZE - 1` is
/// divisible by every LOD stride.
pub const MAP_CHUNK_SIZE: usize = 241;

/// Heightfield and band colors for one chunk
#[derive(Clone, Debug, PartialEq)]
pub struct MapData {
    pub height_map: HeightMap,
    pub color_map: ColorMap,
}

/// Generates chunk data from a [`MapGeneratorConfig`]
pub struct MapGenerator {
    config: MapGeneratorConfig,
    regions: TerrainRegions,
    falloff_map: HeightMap,
}

impl MapGenerator {
    /// Sanitize and validate `config`, then precompute the falloff mask
    pub fn new(mut config: MapGeneratorConfig) -> Result<Self> {
        config.sanitize();
        config.validate()?;

        let regions = TerrainRegions::new(config.regions.clone());
        let falloff_map = generate_falloff_map(MAP_CHUNK_SIZE);

        log::info!(
            "Map generator ready: seed {}, {} octaves, scale {}, {:?} normalization, {} regions, falloff {}",
            config.noise.seed,
            config.noise.octaves,
            config.noise.scale,
            config.noise.normalize_mode,
            regions.bands().len(),
            if config.use_falloff { "on" } else { "off" },
        );

        Ok(Self { config, regions, falloff_map })
    }

    pub fn config(&self) -> &MapGeneratorConfig {
        &self.config
    }

    pub fn regions(&self) -> &TerrainRegions {
        &self.regions
    }

    pub fn falloff_map(&self) -> &HeightMap {
        &self.falloff_map
    }

    /// Heightfield and color bands for the chunk centered at `center`
    pub fn generate_map_data(&self, center: Vec2) -> MapData {
        let mut height_map =
            generate_noise_map(MAP_CHUNK_SIZE, MAP_CHUNK_SIZE, &self.config.noise, center);

        if self.config.use_falloff {
            for (h, f) in height_map.cells_mut().iter_mut().zip(self.falloff_map.cells()) {
                *h = (*h - f).clamp(0.0, 1.0);
            }
        }

        let color_map = self.regions.classify(&height_map);
        MapData { height_map, color_map }
    }

    /// Mesh for `map_data` at `lod`
    pub fn generate_mesh_data(&self, map_data: &MapData, lod: u32) -> MeshData {
        generate_terrain_mesh(
            &map_data.height_map,
            self.config.mesh.height_multiplier,
            &self.config.mesh.height_curve,
            lod,
        )
    }

    /// Generate the chunk at the origin synchronously and hand the result for
    /// the configured [`DrawMode`] to `display`.
    pub fn draw_map_in_editor(&self, display: &mut impl MapDisplay) -> Result<()> {
        let start = Instant::now();
        let map_data = self.generate_map_data(Vec2::ZERO);

        match self.config.draw_mode {
            DrawMode::NoiseMap => display.draw_texture(&texture_from_height_map(&map_data.height_map))?,
            DrawMode::ColourMap => display.draw_texture(&texture_from_color_map(&map_data.color_map))?,
            DrawMode::Mesh => {
                let mesh = self.generate_mesh_data(&map_data, self.config.mesh.preview_lod);
                display.draw_mesh(&mesh, &texture_from_color_map(&map_data.color_map))?;
            }
            DrawMode::FalloffMap => display.draw_texture(&texture_from_height_map(&self.falloff_map))?,
        }

        log::info!("Drew {:?} preview in {:.1?}", self.config.draw_mode, start.elapsed());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::texture::TerrainTexture;
    use crate::terrain::regions::TerrainType;

    #[derive(Default)]
    struct RecordingDisplay {
        textures: Vec<TerrainTexture>,
        meshes: Vec<MeshData>,
    }

    impl MapDisplay for RecordingDisplay {
        fn draw_texture(&mut self, texture: &TerrainTexture) -> Result<()> {
            self.textures.push(texture.clone());
            Ok(())
        }

        fn draw_mesh(&mut self, mesh: &MeshData, texture: &TerrainTexture) -> Result<()> {
            self.meshes.push(mesh.clone());
            self.textures.push(texture.clone());
            Ok(())
        }
    }

    fn generator(config: MapGeneratorConfig) -> MapGenerator {
        MapGenerator::new(config).unwrap()
    }

    #[test]
    fn test_map_data_dimensions() {
        let data = generator(MapGeneratorConfig::default()).generate_map_data(Vec2::ZERO);
        assert_eq!(data.height_map.width(), MAP_CHUNK_SIZE);
        assert_eq!(data.height_map.height(), MAP_CHUNK_SIZE);
        assert_eq!(data.color_map.width(), MAP_CHUNK_SIZE);
        assert_eq!(data.color_map.height(), MAP_CHUNK_SIZE);
    }

    #[test]
    fn test_independent_generators_agree() {
        let a = generator(MapGeneratorConfig::default());
        let b = generator(MapGeneratorConfig::default());
        let center = Vec2::new(480.0, -240.0);
        let map_a = a.generate_map_data(center);
        let map_b = b.generate_map_data(center);
        assert_eq!(map_a, map_b);
        assert_eq!(a.generate_mesh_data(&map_a, 2), b.generate_mesh_data(&map_b, 2));
    }

    #[test]
    fn test_colors_follow_regions() {
        let config = MapGeneratorConfig {
            regions: vec![
                TerrainType::new("high", 0.5, [0, 0, 255, 255]),
                TerrainType::new("low", 0.0, [255, 0, 0, 255]),
            ],
            ..Default::default()
        };
        let data = generator(config).generate_map_data(Vec2::ZERO);
        for (h, c) in data.height_map.cells().iter().zip(data.color_map.cells()) {
            let expected = if *h >= 0.5 { [0, 0, 255, 255] } else { [255, 0, 0, 255] };
            assert_eq!(*c, expected);
        }
    }

    #[test]
    fn test_falloff_clamps_to_unit_range() {
        let config = MapGeneratorConfig { use_falloff: true, ..Default::default() };
        let generator_with_falloff = generator(config);
        let data = generator_with_falloff.generate_map_data(Vec2::ZERO);
        assert!(data.height_map.cells().iter().all(|&h| (0.0..=1.0).contains(&h)));

        let plain = generator(MapGeneratorConfig::default()).generate_map_data(Vec2::ZERO);
        // The corner mask value is exactly 1
        assert_eq!(data.height_map.height_at(0, 0), (plain.height_map.height_at(0, 0) - 1.0).clamp(0.0, 1.0));
    }

    #[test]
    fn test_new_sanitizes_config() {
        let mut config = MapGeneratorConfig::default();
        config.noise.octaves = -2;
        config.mesh.preview_lod = 42;
        let sanitized = generator(config);
        assert_eq!(sanitized.config().noise.octaves, 0);
        assert_eq!(sanitized.config().mesh.preview_lod, crate::terrain::mesh::MAX_LOD);
    }

    #[test]
    fn test_draw_modes() {
        let size = MAP_CHUNK_SIZE as u32;

        for mode in [DrawMode::NoiseMap, DrawMode::ColourMap, DrawMode::FalloffMap] {
            let config = MapGeneratorConfig { draw_mode: mode, ..Default::default() };
            let mut display = RecordingDisplay::default();
            generator(config).draw_map_in_editor(&mut display).unwrap();
            assert_eq!(display.textures.len(), 1);
            assert!(display.meshes.is_empty());
            assert_eq!((display.textures[0].width(), display.textures[0].height()), (size, size));
        }

        let mut config = MapGeneratorConfig { draw_mode: DrawMode::Mesh, ..Default::default() };
        config.mesh.preview_lod = 2;
        let mut display = RecordingDisplay::default();
        generator(config).draw_map_in_editor(&mut display).unwrap();
        assert_eq!(display.meshes.len(), 1);
        assert_eq!(display.meshes[0].lod, 2);
        assert_eq!(display.meshes[0].vertex_count(), 61 * 61);
    }

    #[test]
    fn test_falloff_preview_is_grayscale_mask() {
        let config = MapGeneratorConfig { draw_mode: DrawMode::FalloffMap, ..Default::default() };
        let mut display = RecordingDisplay::default();
        generator(config).draw_map_in_editor(&mut display).unwrap();
        let texture = &display.textures[0];
        assert_eq!(texture.sample(0.0, 0.0), [255, 255, 255, 255]);
        assert_eq!(texture.sample(0.5, 0.5), [0, 0, 0, 255]);
    }
}
