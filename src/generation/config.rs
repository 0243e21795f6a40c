//! Map generation configuration: noise, mesh shaping and terrain bands.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};
use crate::streaming::config::StreamingConfig;
use crate::terrain::curve::HeightCurve;
use crate::terrain::mesh::MAX_LOD;
use crate::terrain::noise_map::NoiseSettings;
use crate::terrain::regions::{default_regions, TerrainType};

/// What the manual "generate now" entry point produces
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawMode {
    /// Grayscale heightfield texture
    NoiseMap,
    /// Terrain band color texture
    ColourMap,
    /// Mesh at the preview LOD with the color texture
    #[default]
    Mesh,
    /// Grayscale falloff mask texture
    FalloffMap,
}

/// Mesh shaping parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshSettings {
    /// World units per normalized height
    pub height_multiplier: f32,
    /// Remaps normalized heights before scaling
    pub height_curve: HeightCurve,
    /// LOD used by the preview path (0-6)
    pub preview_lod: u32,
}

impl Default for MeshSettings {
    fn default() -> Self {
        Self {
            height_multiplier: 30.0,
            // Flat below the shoreline, linear above
            height_curve: HeightCurve::new(vec![(0.0, 0.0), (0.4, 0.0), (1.0, 1.0)]),
            preview_lod: 0,
        }
    }
}

/// Configuration for the map generator
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapGeneratorConfig {
    pub draw_mode: DrawMode,
    pub noise: NoiseSettings,
    pub mesh: MeshSettings,
    /// Subtract the edge falloff mask to produce islands
    pub use_falloff: bool,
    /// Terrain bands, any order
    pub regions: Vec<TerrainType>,
}

impl Default for MapGeneratorConfig {
    fn default() -> Self {
        Self {
            draw_mode: DrawMode::default(),
            noise: NoiseSettings::default(),
            mesh: MeshSettings::default(),
            use_falloff: false,
            regions: default_regions(),
        }
    }
}

impl MapGeneratorConfig {
    /// Clamp values the generator would clamp anyway so the stored config
    /// reflects what is actually used.
    pub fn sanitize(&mut self) {
        self.noise = self.noise.sanitized();
        self.mesh.preview_lod = self.mesh.preview_lod.min(MAX_LOD);
    }

    /// Reject values that cannot be clamped into something meaningful
    pub fn validate(&self) -> Result<()> {
        if self.mesh.preview_lod > MAX_LOD {
            return Err(Error::Config(format!(
                "preview_lod {} exceeds max LOD {}", self.mesh.preview_lod, MAX_LOD
            )));
        }
        if !self.mesh.height_multiplier.is_finite() {
            return Err(Error::Config("height_multiplier must be finite".into()));
        }
        if let Some(band) = self.regions.iter().find(|b| !b.height.is_finite()) {
            return Err(Error::Config(format!("region '{}' has a non-finite height", band.name)));
        }
        Ok(())
    }
}

/// Full terrain configuration as stored on disk
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub generator: MapGeneratorConfig,
    pub streaming: StreamingConfig,
}

impl TerrainConfig {
    /// Load and validate a JSON config
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Save as pretty-printed JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.generator.validate()?;
        self.streaming.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_clamps() {
        let mut config = MapGeneratorConfig::default();
        config.noise.lacunarity = 0.5;
        config.noise.octaves = -1;
        config.noise.scale = -4.0;
        config.mesh.preview_lod = 9;
        assert!(config.validate().is_err());

        config.sanitize();
        assert_eq!(config.noise.lacunarity, 1.0);
        assert_eq!(config.noise.octaves, 0);
        assert!(config.noise.scale > 0.0);
        assert_eq!(config.mesh.preview_lod, MAX_LOD);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: MapGeneratorConfig =
            serde_json::from_str(r#"{ "draw_mode": "ColourMap", "noise": { "seed": 9 } }"#).unwrap();
        assert_eq!(config.draw_mode, DrawMode::ColourMap);
        assert_eq!(config.noise.seed, 9);
        assert_eq!(config.noise.octaves, NoiseSettings::default().octaves);
        assert_eq!(config.regions, default_regions());
    }

    #[test]
    fn test_rejects_nan_region() {
        let mut config = MapGeneratorConfig::default();
        config.regions.push(TerrainType::new("broken", f32::NAN, [0, 0, 0, 255]));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_terrain_config_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("configs").join("terrain.json");

        let mut config = TerrainConfig::default();
        config.generator.noise.seed = 1234;
        config.generator.use_falloff = true;
        config.streaming.worker_threads = 3;
        config.save(&path).unwrap();

        let loaded = TerrainConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_rejects_unsorted_thresholds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("terrain.json");
        std::fs::write(
            &path,
            r#"{ "streaming": { "detail_levels": [
                { "lod": 0, "visible_distance_threshold": 400.0 },
                { "lod": 1, "visible_distance_threshold": 200.0 }
            ] } }"#,
        )
        .unwrap();
        assert!(matches!(TerrainConfig::load(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_load_reports_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("terrain.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(TerrainConfig::load(&path), Err(Error::Json(_))));
        assert!(matches!(TerrainConfig::load(&dir.path().join("missing.json")), Err(Error::Io(_))));
    }
}
