//! Dense row-major 2D grids used for heightfields and color maps

use crate::core::types::Color;

/// Fixed-size 2D grid stored row-major (`y * width + x`)
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

/// Grid of normalized elevation samples
pub type HeightMap = Grid<f32>;

/// Grid of per-cell terrain band colors
pub type ColorMap = Grid<Color>;

impl<T: Clone + Default> Grid<T> {
    /// Create a grid filled with `T::default()`
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![T::default(); width * height],
        }
    }
}

impl<T> Grid<T> {
    /// Wrap existing row-major cells.
    ///
    /// Panics if `cells.len() != width * height`.
    pub fn from_cells(width: usize, height: usize, cells: Vec<T>) -> Self {
        assert_eq!(cells.len(), width * height, "grid cell count must match dimensions");
        Self { width, height, cells }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y * self.width + x
    }

    /// Cell at (x, y)
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.cells[self.index(x, y)]
    }

    /// Overwrite cell at (x, y)
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let i = self.index(x, y);
        self.cells[i] = value;
    }

    /// All cells in row-major order
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [T] {
        &mut self.cells
    }

    /// Iterate rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.cells.chunks(self.width.max(1))
    }
}

impl HeightMap {
    /// Sample at (x, y) by value
    #[inline]
    pub fn height_at(&self, x: usize, y: usize) -> f32 {
        *self.get(x, y)
    }

    /// (min, max) over all cells, or None for an empty grid
    pub fn min_max(&self) -> Option<(f32, f32)> {
        if self.cells.is_empty() {
            return None;
        }
        Some(self.cells.iter().fold((f32::MAX, f32::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v))))
    }
}
