//! Terrain chunks and their per-LOD mesh slots

use std::sync::Arc;

use glam::{Vec2, Vec3};

use super::lod::LodConfig;
use crate::generation::{GenerationQueue, MapData};
use crate::math::Aabb2;
use crate::render::display::ChunkDisplay;
use crate::terrain::mesh::MeshData;

/// Integer chunk coordinate on the terrain plane (world x, world z)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
}

impl ChunkCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chunk containing `position`, rounding to the nearest chunk center
    /// (ties to even)
    pub fn from_world(position: Vec2, chunk_size: f32) -> Self {
        Self {
            x: (position.x / chunk_size).round_ties_even() as i32,
            y: (position.y / chunk_size).round_ties_even() as i32,
        }
    }

    /// World position of this chunk's center
    pub fn world_position(self, chunk_size: f32) -> Vec2 {
        Vec2::new(self.x as f32 * chunk_size, self.y as f32 * chunk_size)
    }
}

/// Mesh storage for one detail level of a chunk
#[derive(Clone, Debug)]
pub struct LodSlot {
    pub lod: u32,
    pub mesh: Option<Arc<MeshData>>,
    pub requested: bool,
}

impl LodSlot {
    pub fn new(lod: u32) -> Self {
        Self { lod, mesh: None, requested: false }
    }

    pub fn has_mesh(&self) -> bool {
        self.mesh.is_some()
    }

    pub fn has_requested_mesh(&self) -> bool {
        self.requested
    }
}

/// One square region of the endless terrain
#[derive(Debug)]
pub struct TerrainChunk {
    pub coord: ChunkCoord,
    /// World center on the terrain plane
    pub position: Vec2,
    pub bounds: Aabb2,
    map_data: Option<Arc<MapData>>,
    lod_slots: Vec<LodSlot>,
    previous_lod_index: Option<usize>,
    visible: bool,
}

impl TerrainChunk {
    /// Create a hidden chunk with one empty slot per detail level
    pub fn new(coord: ChunkCoord, chunk_size: f32, lods: &LodConfig) -> Self {
        let position = coord.world_position(chunk_size);
        Self {
            coord,
            position,
            bounds: Aabb2::from_center_size(position, Vec2::splat(chunk_size)),
            map_data: None,
            lod_slots: lods.levels().iter().map(|l| LodSlot::new(l.lod)).collect(),
            previous_lod_index: None,
            visible: false,
        }
    }

    /// World position with the terrain plane at y = 0
    pub fn world_position(&self) -> Vec3 {
        Vec3::new(self.position.x, 0.0, self.position.y)
    }

    pub fn map_data(&self) -> Option<&Arc<MapData>> {
        self.map_data.as_ref()
    }

    pub fn has_map_data(&self) -> bool {
        self.map_data.is_some()
    }

    pub fn lod_slots(&self) -> &[LodSlot] {
        &self.lod_slots
    }

    /// Index of the slot whose mesh is currently displayed
    pub fn previous_lod_index(&self) -> Option<usize> {
        self.previous_lod_index
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn receive_map_data(&mut self, map_data: Arc<MapData>) {
        self.map_data = Some(map_data);
    }

    /// Store a finished mesh. Returns `false` for an unknown slot.
    pub fn receive_mesh(&mut self, slot: usize, mesh: Arc<MeshData>) -> bool {
        match self.lod_slots.get_mut(slot) {
            Some(lod_slot) => {
                lod_slot.mesh = Some(mesh);
                true
            }
            None => false,
        }
    }

    /// Returns whether visibility changed
    pub fn set_visible(&mut self, visible: bool) -> bool {
        let changed = self.visible != visible;
        self.visible = visible;
        changed
    }

    /// Request the mesh for `slot` unless it exists, was already requested,
    /// or there is no map data to build it from. Returns whether a task was
    /// dispatched.
    pub fn request_mesh(&mut self, slot: usize, queue: &mut GenerationQueue) -> bool {
        let Some(map_data) = &self.map_data else {
            return false;
        };
        let Some(lod_slot) = self.lod_slots.get_mut(slot) else {
            return false;
        };
        if lod_slot.has_mesh() || lod_slot.requested {
            return false;
        }

        lod_slot.requested = true;
        queue.request_mesh_data(self.coord, slot, lod_slot.lod, Arc::clone(map_data))
    }

    /// Re-evaluate visibility and detail level for `viewer`. No-op until map
    /// data has arrived. Returns whether the chunk is visible.
    pub fn update<D: ChunkDisplay + ?Sized>(
        &mut self,
        viewer: Vec2,
        lods: &LodConfig,
        queue: &mut GenerationQueue,
        display: &mut D,
    ) -> bool {
        if self.map_data.is_none() {
            return self.visible;
        }

        let distance = self.bounds.sqr_distance(viewer).sqrt();
        let visible = distance <= lods.max_view_distance();

        if visible {
            let lod_index = lods.select(distance);
            if self.previous_lod_index != Some(lod_index) {
                if let Some(mesh) = &self.lod_slots[lod_index].mesh {
                    log::debug!(
                        "{:?} switching to LOD {} at distance {:.0}",
                        self.coord,
                        self.lod_slots[lod_index].lod,
                        distance
                    );
                    self.previous_lod_index = Some(lod_index);
                    display.set_chunk_mesh(self.coord, mesh);
                } else {
                    self.request_mesh(lod_index, queue);
                }
            }
        }

        if self.set_visible(visible) {
            display.set_chunk_visible(self.coord, visible);
        }
        visible
    }
}
