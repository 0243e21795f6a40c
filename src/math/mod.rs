//! Mathematical utilities

pub mod aabb;

pub use aabb::Aabb2;
