//! Heightstream - procedural endless terrain
//!
//! Noise heightfields are classified into terrain bands, turned into LOD
//! meshes and streamed in chunks around a moving viewer. Generation runs on
//! a background pool; results are applied on the caller's thread.

pub mod core;
pub mod math;
pub mod terrain;
pub mod render;
pub mod generation;
pub mod streaming;
