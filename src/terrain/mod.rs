//! Procedural terrain data: noise heightfields, falloff, bands and meshes

pub mod grid;
pub use grid::{ColorMap, Grid, HeightMap};

pub mod noise_map;
pub use noise_map::{generate_noise_map, NoiseSettings, NormalizeMode};

pub mod falloff;
pub use falloff::generate_falloff_map;

pub mod regions;
pub use regions::{TerrainRegions, TerrainType};

pub mod curve;
pub use curve::HeightCurve;

pub mod mesh;
pub use mesh::{generate_terrain_mesh, MeshData, TerrainVertex};
