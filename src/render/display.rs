//! Display collaborators: where finished textures and meshes are handed off

use std::path::PathBuf;

use glam::Vec3;

use super::texture::TerrainTexture;
use crate::core::types::Result;
use crate::streaming::chunk::ChunkCoord;
use crate::terrain::mesh::MeshData;

/// Receives single-map previews from the manual "generate now" path
pub trait MapDisplay {
    fn draw_texture(&mut self, texture: &TerrainTexture) -> Result<()>;

    fn draw_mesh(&mut self, mesh: &MeshData, texture: &TerrainTexture) -> Result<()>;
}

/// Receives chunk lifecycle events from the streaming store.
///
/// Every call happens on the thread that drives `EndlessTerrain::update`.
pub trait ChunkDisplay {
    /// A chunk object now exists at `world_position` (hidden)
    fn chunk_created(&mut self, _coord: ChunkCoord, _world_position: Vec3) {}

    /// The chunk's color texture is ready
    fn set_chunk_texture(&mut self, _coord: ChunkCoord, _texture: &TerrainTexture) {}

    /// The chunk should now draw `mesh`
    fn set_chunk_mesh(&mut self, _coord: ChunkCoord, _mesh: &MeshData) {}

    fn set_chunk_visible(&mut self, _coord: ChunkCoord, _visible: bool) {}
}

/// Headless host
impl ChunkDisplay for () {}

/// Writes previews to `<dir>/<name>.png`; meshes also produce
/// `<name>.vbuf` (interleaved vertices) and `<name>.ibuf` (u32 indices).
pub struct ImageFileDisplay {
    dir: PathBuf,
    name: String,
}

impl ImageFileDisplay {
    pub fn new(dir: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self { dir: dir.into(), name: name.into() }
    }

    pub fn texture_path(&self) -> PathBuf {
        self.dir.join(format!("{}.png", self.name))
    }

    pub fn vertex_path(&self) -> PathBuf {
        self.dir.join(format!("{}.vbuf", self.name))
    }

    pub fn index_path(&self) -> PathBuf {
        self.dir.join(format!("{}.ibuf", self.name))
    }
}

impl MapDisplay for ImageFileDisplay {
    fn draw_texture(&mut self, texture: &TerrainTexture) -> Result<()> {
        let path = self.texture_path();
        texture.save_png(&path)?;
        log::info!("Wrote {}x{} texture to {}", texture.width(), texture.height(), path.display());
        Ok(())
    }

    fn draw_mesh(&mut self, mesh: &MeshData, texture: &TerrainTexture) -> Result<()> {
        self.draw_texture(texture)?;
        std::fs::write(self.vertex_path(), mesh.vertex_bytes())?;
        std::fs::write(self.index_path(), mesh.index_bytes())?;
        log::info!(
            "Wrote LOD {} mesh ({} vertices, {} triangles) to {}",
            mesh.lod,
            mesh.vertex_count(),
            mesh.triangle_count(),
            self.vertex_path().display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::texture::texture_from_height_map;
    use crate::terrain::{generate_terrain_mesh, HeightCurve, HeightMap};

    #[test]
    fn test_image_file_display_writes_mesh_buffers() {
        let dir = tempfile::tempdir().unwrap();
        let mut display = ImageFileDisplay::new(dir.path(), "preview");

        let heights = HeightMap::from_cells(3, 3, vec![0.5; 9]);
        let mesh = generate_terrain_mesh(&heights, 1.0, &HeightCurve::linear(), 0);
        let texture = texture_from_height_map(&heights);
        display.draw_mesh(&mesh, &texture).unwrap();

        assert!(display.texture_path().exists());
        assert_eq!(std::fs::read(display.vertex_path()).unwrap().len(), 9 * 32);
        assert_eq!(std::fs::read(display.index_path()).unwrap().len(), 8 * 3 * 4);
    }
}
