//! Distance-based level of detail selection
//!
//! Each configured level pairs a mesh LOD with the edge distance up to which
//! it is used. Levels are ordered nearest first; the last level's threshold is
//! also the maximum view distance, beyond which chunks are hidden.

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};
use crate::terrain::mesh::MAX_LOD;

/// One detail level: mesh `lod` is used while the viewer is within
/// `visible_distance_threshold` of the chunk's nearest edge.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LodInfo {
    pub lod: u32,
    pub visible_distance_threshold: f32,
}

impl LodInfo {
    pub const fn new(lod: u32, visible_distance_threshold: f32) -> Self {
        Self { lod, visible_distance_threshold }
    }
}

/// Default detail levels: full detail close by, LOD 1 further out, LOD 4 at the horizon
pub const DEFAULT_DETAIL_LEVELS: [LodInfo; 3] = [
    LodInfo::new(0, 200.0),
    LodInfo::new(1, 400.0),
    LodInfo::new(4, 600.0),
];

/// Validated, ascending list of detail levels
#[derive(Clone, Debug, PartialEq)]
pub struct LodConfig {
    levels: Vec<LodInfo>,
}

impl LodConfig {
    /// Validate `levels`: non-empty, thresholds positive and sorted ascending,
    /// every LOD within [`MAX_LOD`].
    pub fn new(levels: Vec<LodInfo>) -> Result<Self> {
        if levels.is_empty() {
            return Err(Error::Config("at least one detail level is required".into()));
        }
        for (i, level) in levels.iter().enumerate() {
            if level.lod > MAX_LOD {
                return Err(Error::Config(format!(
                    "detail level {} uses LOD {} (max {})", i, level.lod, MAX_LOD
                )));
            }
            if !(level.visible_distance_threshold.is_finite() && level.visible_distance_threshold > 0.0) {
                return Err(Error::Config(format!(
                    "detail level {} has invalid threshold {}", i, level.visible_distance_threshold
                )));
            }
        }
        if let Some(i) = levels
            .windows(2)
            .position(|w| w[1].visible_distance_threshold < w[0].visible_distance_threshold)
        {
            return Err(Error::Config(format!(
                "detail level thresholds must be ascending ({} > {} at level {})",
                levels[i].visible_distance_threshold,
                levels[i + 1].visible_distance_threshold,
                i + 1
            )));
        }
        Ok(Self { levels })
    }

    pub fn levels(&self) -> &[LodInfo] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Threshold of the coarsest level
    pub fn max_view_distance(&self) -> f32 {
        self.levels[self.levels.len() - 1].visible_distance_threshold
    }

    /// Index of the level to use at `distance` from the chunk edge.
    ///
    /// Detail only decreases with distance; the last level catches
    /// everything past the second-to-last threshold.
    ///
    /// # Examples
    /// ```
    /// use heightstream::streaming::lod::{LodConfig, DEFAULT_DETAIL_LEVELS};
    ///
    /// let lods = LodConfig::new(DEFAULT_DETAIL_LEVELS.to_vec()).unwrap();
    /// assert_eq!(lods.select(0.0), 0);
    /// assert_eq!(lods.select(200.0), 0);
    /// assert_eq!(lods.select(250.0), 1);
    /// assert_eq!(lods.select(5000.0), 2);
    /// ```
    pub fn select(&self, distance: f32) -> usize {
        let mut index = 0;
        for (i, level) in self.levels[..self.levels.len() - 1].iter().enumerate() {
            if distance > level.visible_distance_threshold {
                index = i + 1;
            } else {
                break;
            }
        }
        index
    }
}

impl Default for LodConfig {
    fn default() -> Self {
        Self { levels: DEFAULT_DETAIL_LEVELS.to_vec() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_boundaries() {
        let lods = LodConfig::default();
        assert_eq!(lods.select(199.9), 0);
        assert_eq!(lods.select(200.0), 0);
        assert_eq!(lods.select(200.1), 1);
        assert_eq!(lods.select(400.0), 1);
        assert_eq!(lods.select(400.1), 2);
        assert_eq!(lods.select(600.0), 2);
        assert_eq!(lods.select(f32::MAX), 2);
    }

    #[test]
    fn test_select_monotonic() {
        let lods = LodConfig::default();
        let mut prev = 0;
        for i in 0..1000 {
            let index = lods.select(i as f32);
            assert!(index >= prev);
            prev = index;
        }
    }

    #[test]
    fn test_single_level_is_catch_all() {
        let lods = LodConfig::new(vec![LodInfo::new(2, 100.0)]).unwrap();
        assert_eq!(lods.select(0.0), 0);
        assert_eq!(lods.select(1e6), 0);
        assert_eq!(lods.max_view_distance(), 100.0);
    }

    #[test]
    fn test_max_view_distance() {
        assert_eq!(LodConfig::default().max_view_distance(), 600.0);
    }

    #[test]
    fn test_rejects_unsorted() {
        let result = LodConfig::new(vec![LodInfo::new(0, 300.0), LodInfo::new(1, 200.0)]);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_empty_and_bad_values() {
        assert!(LodConfig::new(Vec::new()).is_err());
        assert!(LodConfig::new(vec![LodInfo::new(MAX_LOD + 1, 100.0)]).is_err());
        assert!(LodConfig::new(vec![LodInfo::new(0, 0.0)]).is_err());
        assert!(LodConfig::new(vec![LodInfo::new(0, f32::NAN)]).is_err());
    }

    #[test]
    fn test_equal_thresholds_allowed() {
        let lods = LodConfig::new(vec![LodInfo::new(0, 100.0), LodInfo::new(2, 100.0)]).unwrap();
        assert_eq!(lods.select(50.0), 0);
        assert_eq!(lods.select(150.0), 1);
    }
}
