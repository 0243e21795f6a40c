//! Height-banded terrain types and the per-cell color classifier

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::grid::{ColorMap, HeightMap};
use crate::core::types::{Color, UNSET_COLOR};

/// A named height band with its display color
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerrainType {
    pub name: String,
    /// Minimum normalized height for this band
    pub height: f32,
    pub color: Color,
}

impl TerrainType {
    pub fn new(name: impl Into<String>, height: f32, color: Color) -> Self {
        Self { name: name.into(), height, color }
    }
}

/// Ordered band list. Bands are kept sorted ascending by threshold.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TerrainRegions {
    bands: Vec<TerrainType>,
}

impl TerrainRegions {
    /// Create from bands in any order
    pub fn new(mut bands: Vec<TerrainType>) -> Self {
        bands.sort_by(|a, b| a.height.partial_cmp(&b.height).unwrap_or(std::cmp::Ordering::Equal));
        Self { bands }
    }

    pub fn bands(&self) -> &[TerrainType] {
        &self.bands
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// Highest band whose threshold `height` meets or exceeds
    pub fn classify_height(&self, height: f32) -> Option<&TerrainType> {
        let mut found = None;
        for band in &self.bands {
            if height >= band.height {
                found = Some(band);
            } else {
                break;
            }
        }
        found
    }

    /// Color for `height`, or [`UNSET_COLOR`] below every band
    #[inline]
    pub fn color_at(&self, height: f32) -> Color {
        self.classify_height(height).map_or(UNSET_COLOR, |band| band.color)
    }

    /// Classify every cell of `heights` in parallel
    pub fn classify(&self, heights: &HeightMap) -> ColorMap {
        let cells: Vec<Color> = heights
            .cells()
            .par_iter()
            .map(|&h| self.color_at(h))
            .collect();
        ColorMap::from_cells(heights.width(), heights.height(), cells)
    }
}

/// Default island palette
pub fn default_regions() -> Vec<TerrainType> {
    vec![
        TerrainType::new("Deep Water", 0.0, [41, 72, 153, 255]),
        TerrainType::new("Shallow Water", 0.3, [54, 103, 199, 255]),
        TerrainType::new("Sand", 0.4, [210, 208, 125, 255]),
        TerrainType::new("Grass", 0.45, [86, 152, 23, 255]),
        TerrainType::new("Forest", 0.55, [62, 107, 18, 255]),
        TerrainType::new("Rock", 0.6, [90, 69, 60, 255]),
        TerrainType::new("Mountain", 0.7, [75, 60, 53, 255]),
        TerrainType::new("Snow", 0.9, [255, 255, 255, 255]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: Color = [255, 0, 0, 255];
    const B: Color = [0, 255, 0, 255];
    const C: Color = [0, 0, 255, 255];

    fn abc() -> TerrainRegions {
        TerrainRegions::new(vec![
            TerrainType::new("a", 0.0, A),
            TerrainType::new("b", 0.3, B),
            TerrainType::new("c", 0.6, C),
        ])
    }

    #[test]
    fn test_classify_height() {
        let regions = abc();
        assert_eq!(regions.color_at(0.65), C);
        assert_eq!(regions.color_at(0.45), B);
        assert_eq!(regions.color_at(0.1), A);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let regions = abc();
        assert_eq!(regions.color_at(0.3), B);
        assert_eq!(regions.color_at(0.6), C);
        assert_eq!(regions.classify_height(0.6).unwrap().name, "c");
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let shuffled = TerrainRegions::new(vec![
            TerrainType::new("c", 0.6, C),
            TerrainType::new("a", 0.0, A),
            TerrainType::new("b", 0.3, B),
        ]);
        assert_eq!(shuffled, abc());
        assert_eq!(shuffled.color_at(0.65), C);
    }

    #[test]
    fn test_below_all_bands_is_unset() {
        let regions = TerrainRegions::new(vec![TerrainType::new("high", 0.5, A)]);
        assert_eq!(regions.color_at(0.2), UNSET_COLOR);
        assert!(regions.classify_height(0.2).is_none());
        assert_eq!(TerrainRegions::default().color_at(1.0), UNSET_COLOR);
    }

    #[test]
    fn test_classify_grid() {
        let heights = HeightMap::from_cells(2, 2, vec![0.1, 0.45, 0.65, 0.0]);
        let colors = abc().classify(&heights);
        assert_eq!(colors.width(), 2);
        assert_eq!(colors.cells(), &[A, B, C, A]);
    }
}
