//! Endless terrain chunk store.
//!
//! [`EndlessTerrain`] owns every chunk created so far, the generation queue
//! and the last known viewer position. The host calls [`EndlessTerrain::update`]
//! once per frame; it rebuilds the window of chunks around the viewer when the
//! viewer has moved far enough and then applies whatever background results
//! have finished. Chunks that leave the window are hidden, never dropped.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use glam::{Vec2, Vec3};

use super::chunk::{ChunkCoord, TerrainChunk};
use super::config::StreamingConfig;
use super::lod::LodConfig;
use crate::core::Result;
use crate::generation::{GenerationQueue, MapGenerator, MAP_CHUNK_SIZE};
use crate::render::display::ChunkDisplay;

pub struct EndlessTerrain<D: ChunkDisplay = ()> {
    lods: LodConfig,
    chunk_size: f32,
    chunks_visible_in_view_distance: i32,
    sqr_move_threshold: f32,
    chunks: HashMap<ChunkCoord, TerrainChunk>,
    visible_last_update: HashSet<ChunkCoord>,
    viewer_position: Vec2,
    /// Position at the last window rebuild; `None` until the first update
    viewer_position_old: Option<Vec2>,
    queue: GenerationQueue,
    display: D,
}

impl<D: ChunkDisplay> EndlessTerrain<D> {
    pub fn new(generator: Arc<MapGenerator>, config: &StreamingConfig, display: D) -> Result<Self> {
        config.validate()?;
        let lods = config.lod_config()?;
        let chunk_size = (MAP_CHUNK_SIZE - 1) as f32;
        let chunks_visible_in_view_distance =
            (lods.max_view_distance() / chunk_size).round_ties_even() as i32;
        let queue = GenerationQueue::new(generator, config.worker_threads)?;

        log::info!(
            "Endless terrain: view distance {}, {} chunks each way, {} detail levels",
            lods.max_view_distance(),
            chunks_visible_in_view_distance,
            lods.len()
        );

        Ok(Self {
            lods,
            chunk_size,
            chunks_visible_in_view_distance,
            sqr_move_threshold: config.viewer_move_threshold * config.viewer_move_threshold,
            chunks: HashMap::new(),
            visible_last_update: HashSet::new(),
            viewer_position: Vec2::ZERO,
            viewer_position_old: None,
            queue,
            display,
        })
    }

    /// Advance one tick with the viewer at `viewer` (x/z are used).
    ///
    /// Returns whether the chunk window was rebuilt this tick.
    pub fn update(&mut self, viewer: Vec3) -> bool {
        self.viewer_position = Vec2::new(viewer.x, viewer.z);

        let moved = match self.viewer_position_old {
            None => true,
            Some(old) => old.distance_squared(self.viewer_position) > self.sqr_move_threshold,
        };
        if moved {
            self.viewer_position_old = Some(self.viewer_position);
            self.update_visible_chunks();
        }

        self.process_completed();
        moved
    }

    /// Create or refresh every chunk in the window around the viewer and
    /// hide chunks that dropped out of view.
    pub fn update_visible_chunks(&mut self) {
        let current = ChunkCoord::from_world(self.viewer_position, self.chunk_size);
        let radius = self.chunks_visible_in_view_distance;
        let mut visible_now = HashSet::new();

        for y_offset in -radius..=radius {
            for x_offset in -radius..=radius {
                let coord = ChunkCoord::new(current.x + x_offset, current.y + y_offset);

                match self.chunks.get_mut(&coord) {
                    Some(chunk) => {
                        if chunk.update(self.viewer_position, &self.lods, &mut self.queue, &mut self.display) {
                            visible_now.insert(coord);
                        }
                    }
                    None => {
                        let chunk = TerrainChunk::new(coord, self.chunk_size, &self.lods);
                        self.display.chunk_created(coord, chunk.world_position());
                        self.queue.request_map_data(coord, chunk.position);
                        self.chunks.insert(coord, chunk);
                    }
                }
            }
        }

        for coord in self.visible_last_update.difference(&visible_now) {
            if let Some(chunk) = self.chunks.get_mut(coord) {
                if chunk.set_visible(false) {
                    self.display.set_chunk_visible(*coord, false);
                }
            }
        }
        self.visible_last_update = visible_now;

        log::debug!(
            "Chunk window around {:?}: {} chunks total, {} visible",
            current,
            self.chunks.len(),
            self.visible_last_update.len()
        );
    }

    /// Apply finished background work: map data first, then meshes
    pub fn process_completed(&mut self) {
        for result in self.queue.poll_map_data() {
            let coord = result.coord;
            let Some(chunk) = self.chunks.get_mut(&coord) else {
                log::warn!("Dropping map data for unknown chunk {:?}", coord);
                continue;
            };

            chunk.receive_map_data(result.data);
            self.display.set_chunk_texture(coord, &result.texture);
            let visible = chunk.update(self.viewer_position, &self.lods, &mut self.queue, &mut self.display);
            self.track_visibility(coord, visible);
            log::debug!("Map data ready for {:?}", coord);
        }

        for result in self.queue.poll_mesh_data() {
            let coord = result.coord;
            let Some(chunk) = self.chunks.get_mut(&coord) else {
                log::warn!("Dropping LOD {} mesh for unknown chunk {:?}", result.lod, coord);
                continue;
            };

            if !chunk.receive_mesh(result.slot, result.mesh) {
                log::warn!("Dropping mesh for unknown slot {} of {:?}", result.slot, coord);
                continue;
            }
            let visible = chunk.update(self.viewer_position, &self.lods, &mut self.queue, &mut self.display);
            self.track_visibility(coord, visible);
        }
    }

    fn track_visibility(&mut self, coord: ChunkCoord, visible: bool) {
        if visible {
            self.visible_last_update.insert(coord);
        } else {
            self.visible_last_update.remove(&coord);
        }
    }

    pub fn chunk(&self, coord: ChunkCoord) -> Option<&TerrainChunk> {
        self.chunks.get(&coord)
    }

    pub fn chunks(&self) -> impl Iterator<Item = &TerrainChunk> {
        self.chunks.values()
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Chunks shown after the last update
    pub fn visible_chunks(&self) -> &HashSet<ChunkCoord> {
        &self.visible_last_update
    }

    pub fn viewer_position(&self) -> Vec2 {
        self.viewer_position
    }

    pub fn chunk_size(&self) -> f32 {
        self.chunk_size
    }

    pub fn chunks_visible_in_view_distance(&self) -> i32 {
        self.chunks_visible_in_view_distance
    }

    pub fn lods(&self) -> &LodConfig {
        &self.lods
    }

    pub fn queue(&self) -> &GenerationQueue {
        &self.queue
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// No background work outstanding
    pub fn is_idle(&self) -> bool {
        self.queue.pending_count() == 0
    }
}
