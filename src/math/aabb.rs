//! Axis-aligned bounding rectangle on the terrain plane

use crate::core::types::Vec2;

/// Axis-aligned rectangle defined by min and max corners (world x/z)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aabb2 {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb2 {
    /// Create from min and max corners
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Create from center and full size
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Get center point
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Get size (max - min)
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Check if point is inside (edges inclusive)
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x &&
        p.y >= self.min.y && p.y <= self.max.y
    }

    /// Closest point of the rectangle to `p`
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max)
    }

    /// Squared distance from `p` to the nearest edge; zero inside
    pub fn sqr_distance(&self, p: Vec2) -> f32 {
        self.closest_point(p).distance_squared(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_and_accessors() {
        let aabb = Aabb2::new(Vec2::ZERO, Vec2::ONE);
        assert_eq!(aabb.center(), Vec2::splat(0.5));
        assert_eq!(aabb.size(), Vec2::ONE);
    }

    #[test]
    fn test_from_center_size() {
        let aabb = Aabb2::from_center_size(Vec2::new(240.0, 0.0), Vec2::splat(240.0));
        assert_eq!(aabb.min, Vec2::new(120.0, -120.0));
        assert_eq!(aabb.max, Vec2::new(360.0, 120.0));
    }

    #[test]
    fn test_contains_point() {
        let aabb = Aabb2::new(Vec2::ZERO, Vec2::ONE);
        assert!(aabb.contains_point(Vec2::splat(0.5)));
        assert!(aabb.contains_point(Vec2::ONE));
        assert!(!aabb.contains_point(Vec2::splat(2.0)));
    }

    #[test]
    fn test_sqr_distance_inside_is_zero() {
        let aabb = Aabb2::from_center_size(Vec2::ZERO, Vec2::splat(10.0));
        assert_eq!(aabb.sqr_distance(Vec2::new(3.0, -4.0)), 0.0);
    }

    #[test]
    fn test_sqr_distance_to_edge_and_corner() {
        let aabb = Aabb2::from_center_size(Vec2::ZERO, Vec2::splat(10.0));
        // Straight out from an edge
        assert_eq!(aabb.sqr_distance(Vec2::new(8.0, 0.0)), 9.0);
        // Diagonal from a corner
        assert_eq!(aabb.sqr_distance(Vec2::new(8.0, 9.0)), 9.0 + 16.0);
    }
}
