//! Hand-off points to the host renderer

pub mod texture;
pub mod display;

pub use texture::{texture_from_color_map, texture_from_height_map, TerrainTexture};
pub use display::{ChunkDisplay, ImageFileDisplay, MapDisplay};
