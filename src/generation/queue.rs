//! Background generation of chunk data.
//!
//! Heightfields and meshes are computed on a dedicated rayon pool. Finished
//! work comes back as tagged results over one unbounded channel per result
//! type; the owner drains them with the non-blocking `poll_*` methods once
//! per tick, so results are only ever applied on the consumer's thread.

use std::collections::HashSet;
use std::sync::Arc;

use glam::Vec2;
use tokio::sync::mpsc;

use super::{MapData, MapGenerator};
use crate::core::{Error, Result};
use crate::render::texture::{texture_from_color_map, TerrainTexture};
use crate::streaming::chunk::ChunkCoord;
use crate::terrain::mesh::MeshData;

/// Finished heightfield and color texture for one chunk
#[derive(Debug)]
pub struct MapDataResult {
    pub coord: ChunkCoord,
    pub data: Arc<MapData>,
    pub texture: TerrainTexture,
}

/// Finished mesh for one LOD slot of a chunk
#[derive(Debug)]
pub struct MeshDataResult {
    pub coord: ChunkCoord,
    pub slot: usize,
    pub lod: u32,
    pub mesh: Arc<MeshData>,
}

pub struct GenerationQueue {
    generator: Arc<MapGenerator>,
    pool: rayon::ThreadPool,
    map_tx: mpsc::UnboundedSender<MapDataResult>,
    map_rx: mpsc::UnboundedReceiver<MapDataResult>,
    mesh_tx: mpsc::UnboundedSender<MeshDataResult>,
    mesh_rx: mpsc::UnboundedReceiver<MeshDataResult>,
    /// Requests dispatched but not yet drained
    pending_maps: HashSet<ChunkCoord>,
    pending_meshes: HashSet<(ChunkCoord, usize)>,
    maps_dispatched: usize,
    meshes_dispatched: usize,
}

impl GenerationQueue {
    /// Create a queue backed by `worker_threads` threads (0 = one per core)
    pub fn new(generator: Arc<MapGenerator>, worker_threads: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(worker_threads)
            .thread_name(|i| format!("terrain-gen-{}", i))
            .build()
            .map_err(|e| Error::Streaming(format!("failed to build generation pool: {}", e)))?;

        let (map_tx, map_rx) = mpsc::unbounded_channel();
        let (mesh_tx, mesh_rx) = mpsc::unbounded_channel();

        log::info!("Generation queue started with {} worker threads", pool.current_num_threads());

        Ok(Self {
            generator,
            pool,
            map_tx,
            map_rx,
            mesh_tx,
            mesh_rx,
            pending_maps: HashSet::new(),
            pending_meshes: HashSet::new(),
            maps_dispatched: 0,
            meshes_dispatched: 0,
        })
    }

    pub fn generator(&self) -> &Arc<MapGenerator> {
        &self.generator
    }

    /// Queue heightfield generation for the chunk centered at `center`.
    ///
    /// Returns `false` if a request for `coord` is already in flight.
    pub fn request_map_data(&mut self, coord: ChunkCoord, center: Vec2) -> bool {
        if !self.pending_maps.insert(coord) {
            return false;
        }

        let generator = Arc::clone(&self.generator);
        let tx = self.map_tx.clone();
        self.pool.spawn(move || {
            let data = generator.generate_map_data(center);
            let texture = texture_from_color_map(&data.color_map);
            // Send only fails once the queue is gone
            let _ = tx.send(MapDataResult { coord, data: Arc::new(data), texture });
        });

        self.maps_dispatched += 1;
        log::debug!("Requested map data for {:?}", coord);
        true
    }

    /// Queue mesh generation for LOD slot `slot` of `coord`.
    ///
    /// Returns `false` if the same slot is already in flight.
    pub fn request_mesh_data(
        &mut self,
        coord: ChunkCoord,
        slot: usize,
        lod: u32,
        map_data: Arc<MapData>,
    ) -> bool {
        if !self.pending_meshes.insert((coord, slot)) {
            return false;
        }

        let generator = Arc::clone(&self.generator);
        let tx = self.mesh_tx.clone();
        self.pool.spawn(move || {
            let mesh = generator.generate_mesh_data(&map_data, lod);
            let _ = tx.send(MeshDataResult { coord, slot, lod, mesh: Arc::new(mesh) });
        });

        self.meshes_dispatched += 1;
        log::debug!("Requested LOD {} mesh for {:?}", lod, coord);
        true
    }

    /// Drain all finished heightfields without blocking
    pub fn poll_map_data(&mut self) -> Vec<MapDataResult> {
        let mut results = Vec::new();
        while let Ok(result) = self.map_rx.try_recv() {
            self.pending_maps.remove(&result.coord);
            results.push(result);
        }
        results
    }

    /// Drain all finished meshes without blocking
    pub fn poll_mesh_data(&mut self) -> Vec<MeshDataResult> {
        let mut results = Vec::new();
        while let Ok(result) = self.mesh_rx.try_recv() {
            self.pending_meshes.remove(&(result.coord, result.slot));
            results.push(result);
        }
        results
    }

    /// Requests not yet drained
    pub fn pending_count(&self) -> usize {
        self.pending_maps.len() + self.pending_meshes.len()
    }

    pub fn is_map_pending(&self, coord: ChunkCoord) -> bool {
        self.pending_maps.contains(&coord)
    }

    pub fn maps_dispatched(&self) -> usize {
        self.maps_dispatched
    }

    pub fn meshes_dispatched(&self) -> usize {
        self.meshes_dispatched
    }
}
