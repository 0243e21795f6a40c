//! Core type aliases and re-exports

pub use glam::{Vec2, Vec3};

/// Standard Result type for the crate
pub type Result<T> = std::result::Result<T, crate::core::error::Error>;

/// RGBA8 color used by terrain bands and textures
pub type Color = [u8; 4];

/// Color of a cell that no terrain band claimed
pub const UNSET_COLOR: Color = [0, 0, 0, 0];
