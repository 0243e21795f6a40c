//! Streaming configuration

use serde::{Deserialize, Serialize};

use super::lod::{LodConfig, LodInfo, DEFAULT_DETAIL_LEVELS};
use crate::core::{Error, Result};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingConfig {
    /// Detail levels, nearest first. The last threshold is the view distance.
    pub detail_levels: Vec<LodInfo>,
    /// World distance the viewer must move before the chunk window is rebuilt
    pub viewer_move_threshold: f32,
    /// Generation worker threads (0 = one per core)
    pub worker_threads: usize,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            detail_levels: DEFAULT_DETAIL_LEVELS.to_vec(),
            viewer_move_threshold: 25.0,
            worker_threads: 0,
        }
    }
}

impl StreamingConfig {
    /// Validated detail levels
    pub fn lod_config(&self) -> Result<LodConfig> {
        LodConfig::new(self.detail_levels.clone())
    }

    pub fn validate(&self) -> Result<()> {
        self.lod_config()?;
        if !(self.viewer_move_threshold.is_finite() && self.viewer_move_threshold >= 0.0) {
            return Err(Error::Config(format!(
                "viewer_move_threshold must be a non-negative distance, got {}",
                self.viewer_move_threshold
            )));
        }
        Ok(())
    }
}
