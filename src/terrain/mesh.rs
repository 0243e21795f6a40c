//! Heightfield to triangle mesh conversion with LOD strides

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

use super::curve::HeightCurve;
use super::grid::HeightMap;

/// Highest supported level of detail. Every stride up to `MAX_LOD * 2` divides
/// `MAP_CHUNK_SIZE - 1`.
pub const MAX_LOD: u32 = 6;

/// Sample stride for a level of detail: 1 at LOD 0, `lod * 2` above
///
/// # Examples
/// ```
/// use heightstream::terrain::mesh::lod_stride;
///
/// assert_eq!(lod_stride(0), 1);
/// assert_eq!(lod_stride(1), 2);
/// assert_eq!(lod_stride(6), 12);
/// ```
#[inline]
pub fn lod_stride(lod: u32) -> usize {
    if lod == 0 { 1 } else { lod as usize * 2 }
}

/// Interleaved vertex layout for GPU upload
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// CPU-side mesh. Never mutated once built.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub triangles: Vec<u32>,
    pub normals: Vec<Vec3>,
    /// Level of detail this mesh was built at
    pub lod: u32,
}

impl MeshData {
    fn with_capacity(vertices_per_line: usize, lines: usize, lod: u32) -> Self {
        let vertex_count = vertices_per_line * lines;
        let quads = vertices_per_line.saturating_sub(1) * lines.saturating_sub(1);
        Self {
            vertices: Vec::with_capacity(vertex_count),
            uvs: Vec::with_capacity(vertex_count),
            triangles: Vec::with_capacity(quads * 6),
            normals: Vec::new(),
            lod,
        }
    }

    fn add_triangle(&mut self, a: usize, b: usize, c: usize) {
        self.triangles.extend_from_slice(&[a as u32, b as u32, c as u32]);
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    /// Whether there is anything to draw
    pub fn is_renderable(&self) -> bool {
        !self.triangles.is_empty()
    }

    /// Face normal of triangle `(a, b, c)`, zero for degenerate faces
    fn surface_normal(&self, a: u32, b: u32, c: u32) -> Vec3 {
        let point_a = self.vertices[a as usize];
        let point_b = self.vertices[b as usize];
        let point_c = self.vertices[c as usize];
        (point_b - point_a).cross(point_c - point_a).normalize_or_zero()
    }

    /// Per-vertex normals averaged from the faces sharing each vertex
    pub fn calculate_normals(&self) -> Vec<Vec3> {
        let mut normals = vec![Vec3::ZERO; self.vertices.len()];
        for tri in self.triangles.chunks_exact(3) {
            let face = self.surface_normal(tri[0], tri[1], tri[2]);
            normals[tri[0] as usize] += face;
            normals[tri[1] as usize] += face;
            normals[tri[2] as usize] += face;
        }
        for n in &mut normals {
            *n = n.normalize_or_zero();
        }
        normals
    }

    /// Interleave positions, normals and UVs
    pub fn interleaved(&self) -> Vec<TerrainVertex> {
        self.vertices
            .iter()
            .zip(&self.normals)
            .zip(&self.uvs)
            .map(|((p, n), uv)| TerrainVertex {
                position: p.to_array(),
                normal: n.to_array(),
                uv: uv.to_array(),
            })
            .collect()
    }

    /// Raw bytes of the interleaved vertex buffer
    pub fn vertex_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.interleaved()).to_vec()
    }

    /// Raw bytes of the index buffer
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.triangles)
    }
}

/// Build a mesh from `height_map` at `lod`.
///
/// The mesh is centered on its local origin with x to the right and rows
/// running toward -z. Heights are `height_curve(h) * height_multiplier`.
pub fn generate_terrain_mesh(
    height_map: &HeightMap,
    height_multiplier: f32,
    height_curve: &HeightCurve,
    lod: u32,
) -> MeshData {
    let width = height_map.width();
    let height = height_map.height();
    if width == 0 || height == 0 {
        return MeshData { lod, ..Default::default() };
    }

    let top_left_x = (width as f32 - 1.0) / -2.0;
    let top_left_z = (height as f32 - 1.0) / 2.0;

    let increment = lod_stride(lod);
    let vertices_per_line = (width - 1) / increment + 1;
    let lines = (height - 1) / increment + 1;

    let mut mesh = MeshData::with_capacity(vertices_per_line, lines, lod);
    let mut vertex_index = 0;

    for y in (0..height).step_by(increment) {
        for x in (0..width).step_by(increment) {
            let h = height_curve.evaluate(height_map.height_at(x, y)) * height_multiplier;
            mesh.vertices.push(Vec3::new(top_left_x + x as f32, h, top_left_z - y as f32));
            mesh.uvs.push(Vec2::new(x as f32 / width as f32, y as f32 / height as f32));

            // Right and bottom edge vertices own no quad
            if x + increment < width && y + increment < height {
                mesh.add_triangle(vertex_index, vertex_index + vertices_per_line + 1, vertex_index + vertices_per_line);
                mesh.add_triangle(vertex_index + vertices_per_line + 1, vertex_index, vertex_index + 1);
            }

            vertex_index += 1;
        }
    }

    mesh.normals = mesh.calculate_normals();
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(size: usize, value: f32) -> HeightMap {
        HeightMap::from_cells(size, size, vec![value; size * size])
    }

    fn ramp(size: usize) -> HeightMap {
        let cells = (0..size * size).map(|i| (i % size) as f32 / (size - 1) as f32).collect();
        HeightMap::from_cells(size, size, cells)
    }

    #[test]
    fn test_lod0_counts() {
        let n = 241;
        let mesh = generate_terrain_mesh(&flat(n, 0.5), 10.0, &HeightCurve::linear(), 0);
        assert_eq!(mesh.vertex_count(), n * n);
        assert_eq!(mesh.uvs.len(), n * n);
        assert_eq!(mesh.normals.len(), n * n);
        assert_eq!(mesh.triangle_count(), (n - 1) * (n - 1) * 2);
    }

    #[test]
    fn test_lod1_counts() {
        let n = 241;
        let mesh = generate_terrain_mesh(&flat(n, 0.5), 10.0, &HeightCurve::linear(), 1);
        assert_eq!(mesh.vertex_count(), 121 * 121);
        assert_eq!(mesh.triangle_count(), 120 * 120 * 2);
        assert_eq!(mesh.lod, 1);
    }

    #[test]
    fn test_every_lod_divides_chunk() {
        let n = 241;
        let map = ramp(n);
        for lod in 0..=MAX_LOD {
            let stride = lod_stride(lod);
            assert_eq!((n - 1) % stride, 0);
            let per_line = (n - 1) / stride + 1;
            let mesh = generate_terrain_mesh(&map, 1.0, &HeightCurve::linear(), lod);
            assert_eq!(mesh.vertex_count(), per_line * per_line);
            assert_eq!(mesh.triangle_count(), (per_line - 1) * (per_line - 1) * 2);
            assert!(mesh.triangles.iter().all(|&i| (i as usize) < mesh.vertex_count()));
        }
    }

    #[test]
    fn test_edges_shared_across_lods() {
        let n = 25;
        let map = ramp(n);
        let fine = generate_terrain_mesh(&map, 5.0, &HeightCurve::linear(), 0);
        let coarse = generate_terrain_mesh(&map, 5.0, &HeightCurve::linear(), 2);
        // Corners land on identical positions
        assert_eq!(fine.vertices[0], coarse.vertices[0]);
        assert_eq!(fine.vertices[n * n - 1], coarse.vertices[coarse.vertex_count() - 1]);
    }

    #[test]
    fn test_centered_on_origin() {
        let mesh = generate_terrain_mesh(&flat(5, 0.0), 1.0, &HeightCurve::linear(), 0);
        assert_eq!(mesh.vertices[0], Vec3::new(-2.0, 0.0, 2.0));
        assert_eq!(mesh.vertices[24], Vec3::new(2.0, 0.0, -2.0));
        assert_eq!(mesh.uvs[6], Vec2::new(0.2, 0.2));
    }

    #[test]
    fn test_heights_use_curve_and_multiplier() {
        let curve = HeightCurve::new(vec![(0.0, 0.0), (0.5, 0.0), (1.0, 1.0)]);
        let low = generate_terrain_mesh(&flat(3, 0.4), 20.0, &curve, 0);
        assert!(low.vertices.iter().all(|v| v.y == 0.0));
        let high = generate_terrain_mesh(&flat(3, 1.0), 20.0, &curve, 0);
        assert!(high.vertices.iter().all(|v| v.y == 20.0));
    }

    #[test]
    fn test_flat_normals_point_up() {
        let mesh = generate_terrain_mesh(&flat(9, 0.3), 4.0, &HeightCurve::linear(), 0);
        for n in &mesh.normals {
            assert!((*n - Vec3::Y).length() < 1e-5, "{:?}", n);
        }
    }

    #[test]
    fn test_sloped_normals_lean_downhill() {
        // Height rises with x, so normals tilt toward -x
        let mesh = generate_terrain_mesh(&ramp(9), 8.0, &HeightCurve::linear(), 0);
        for n in &mesh.normals {
            assert!(n.x < 0.0 && n.y > 0.0);
            assert!((n.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_degenerate_lod_is_empty() {
        let mesh = generate_terrain_mesh(&flat(1, 0.5), 1.0, &HeightCurve::linear(), 0);
        assert_eq!(mesh.vertex_count(), 1);
        assert!(!mesh.is_renderable());

        let mesh = generate_terrain_mesh(&flat(5, 0.5), 1.0, &HeightCurve::linear(), 3);
        assert_eq!(mesh.vertex_count(), 1);
        assert!(mesh.triangles.is_empty());
    }

    #[test]
    fn test_vertex_buffer_layout() {
        assert_eq!(std::mem::size_of::<TerrainVertex>(), 32);
        let mesh = generate_terrain_mesh(&flat(3, 0.5), 2.0, &HeightCurve::linear(), 0);
        assert_eq!(mesh.vertex_bytes().len(), 9 * 32);
        assert_eq!(mesh.index_bytes().len(), mesh.triangles.len() * 4);
        assert_eq!(mesh.interleaved()[4].position, [0.0, 1.0, 0.0]);
    }
}
