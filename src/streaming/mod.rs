//! Endless terrain streaming: chunk window, LOD selection and visibility

pub mod chunk;
pub mod config;
pub mod lod;
pub mod store;

pub use chunk::{ChunkCoord, LodSlot, TerrainChunk};
pub use config::StreamingConfig;
pub use lod::{LodConfig, LodInfo, DEFAULT_DETAIL_LEVELS};
pub use store::EndlessTerrain;
