//! Textures built from color maps and heightfields
//!
//! Textures are meant to be displayed with point filtering and clamped
//! wrapping so each grid cell stays a crisp texel and chunk borders do not
//! bleed; [`TerrainTexture::sample`] follows the same rules.

use std::path::Path;

use image::{ImageBuffer, Rgba, RgbaImage};

use crate::core::types::{Color, Result};
use crate::terrain::grid::{ColorMap, HeightMap};

/// RGBA texture for a terrain map
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainTexture {
    pub image: RgbaImage,
}

impl TerrainTexture {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Point-sample at normalized (u, v), clamping outside [0, 1]
    pub fn sample(&self, u: f32, v: f32) -> Color {
        let (w, h) = self.image.dimensions();
        if w == 0 || h == 0 {
            return [0, 0, 0, 0];
        }
        let x = ((u * w as f32).floor() as i64).clamp(0, w as i64 - 1) as u32;
        let y = ((v * h as f32).floor() as i64).clamp(0, h as i64 - 1) as u32;
        self.image.get_pixel(x, y).0
    }

    /// Write the texture as a PNG
    pub fn save_png(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        self.image.save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }
}

/// Texture with one texel per color map cell
pub fn texture_from_color_map(color_map: &ColorMap) -> TerrainTexture {
    let image = ImageBuffer::from_fn(color_map.width() as u32, color_map.height() as u32, |x, y| {
        Rgba(*color_map.get(x as usize, y as usize))
    });
    TerrainTexture { image }
}

/// Grayscale texture, black at height 0 and white at 1
pub fn texture_from_height_map(height_map: &HeightMap) -> TerrainTexture {
    let image = ImageBuffer::from_fn(height_map.width() as u32, height_map.height() as u32, |x, y| {
        let t = height_map.height_at(x as usize, y as usize).clamp(0.0, 1.0);
        let l = (t * 255.0).round() as u8;
        Rgba([l, l, l, 255])
    });
    TerrainTexture { image }
}
