//! Multi-octave coherent noise heightfields
//!
//! A seeded PRNG picks one coordinate offset per octave; every cell is then a
//! pure function of its grid position, so two calls with the same settings and
//! offset produce bit-identical grids regardless of how rows are scheduled
//! across threads.

use glam::Vec2;
use noise::{NoiseFn, Perlin};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::grid::HeightMap;

/// Smallest usable noise scale; non-positive scales are clamped to this
pub const MIN_NOISE_SCALE: f32 = 0.0001;

/// Empirically tuned estimate of how much of the theoretical amplitude sum
/// the noise actually reaches, used by [`NormalizeMode::Global`].
pub const GLOBAL_NORMALIZE_ESTIMATE: f32 = 2.25;

/// Octave offsets are drawn from `-OCTAVE_OFFSET_RANGE..OCTAVE_OFFSET_RANGE`
const OCTAVE_OFFSET_RANGE: i32 = 10_000;

/// How raw octave sums are mapped into [0, 1]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NormalizeMode {
    /// Rescale by this grid's own min/max. Only for standalone maps: adjacent
    /// chunks normalized this way do not line up.
    Local,
    /// Rescale by the theoretical maximum amplitude so chunks tile seamlessly
    #[default]
    Global,
}

/// Parameters of the fractal noise
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseSettings {
    pub seed: u32,
    /// Horizontal zoom (larger = smoother)
    pub scale: f32,
    pub octaves: i32,
    /// Amplitude multiplier per octave
    pub persistence: f32,
    /// Frequency multiplier per octave
    pub lacunarity: f32,
    /// Constant world offset added to every request
    pub offset: Vec2,
    pub normalize_mode: NormalizeMode,
}

impl Default for NoiseSettings {
    fn default() -> Self {
        Self {
            seed: 0,
            scale: 25.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            offset: Vec2::ZERO,
            normalize_mode: NormalizeMode::Global,
        }
    }
}

impl NoiseSettings {
    /// Copy with scale, octaves and lacunarity clamped to usable values
    pub fn sanitized(&self) -> Self {
        Self {
            scale: if self.scale <= 0.0 { MIN_NOISE_SCALE } else { self.scale },
            octaves: self.octaves.max(0),
            lacunarity: self.lacunarity.max(1.0),
            ..self.clone()
        }
    }

    /// Sum of all octave amplitudes (`Σ persistence^i`)
    pub fn max_possible_height(&self) -> f32 {
        let mut amplitude = 1.0;
        let mut total = 0.0;
        for _ in 0..self.octaves.max(0) {
            total += amplitude;
            amplitude *= self.persistence;
        }
        total
    }
}

/// Per-octave sample offsets. The y component is subtracted so that world z
/// runs along increasing grid rows.
fn octave_offsets(seed: u32, octaves: usize, offset: Vec2) -> Vec<Vec2> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed as u64);
    (0..octaves)
        .map(|_| {
            let x = rng.random_range(-OCTAVE_OFFSET_RANGE..OCTAVE_OFFSET_RANGE) as f32 + offset.x;
            let y = rng.random_range(-OCTAVE_OFFSET_RANGE..OCTAVE_OFFSET_RANGE) as f32 - offset.y;
            Vec2::new(x, y)
        })
        .collect()
}

/// Perlin noise remapped into [0, 1]
#[inline]
fn coherent(perlin: &Perlin, x: f32, y: f32) -> f32 {
    let v = perlin.get([x as f64, y as f64]);
    (((v + 1.0) * 0.5) as f32).clamp(0.0, 1.0)
}

#[inline]
fn inverse_lerp(a: f32, b: f32, v: f32) -> f32 {
    if a == b {
        0.0
    } else {
        ((v - a) / (b - a)).clamp(0.0, 1.0)
    }
}

/// Generate a `width` x `height` heightfield.
///
/// `offset` is the world position of the map center (added to the settings'
/// own offset). Out-of-range settings are clamped, never rejected.
pub fn generate_noise_map(
    width: usize,
    height: usize,
    settings: &NoiseSettings,
    offset: Vec2,
) -> HeightMap {
    let settings = settings.sanitized();
    let offsets = octave_offsets(settings.seed, settings.octaves as usize, settings.offset + offset);
    let max_possible_height = settings.max_possible_height();

    let perlin = Perlin::new(Perlin::DEFAULT_SEED);
    let half_width = width as f32 / 2.0;
    let half_height = height as f32 / 2.0;

    let mut cells = vec![0.0f32; width * height];
    cells
        .par_chunks_mut(width.max(1))
        .enumerate()
        .for_each(|(y, row)| {
            for (x, cell) in row.iter_mut().enumerate() {
                let mut amplitude = 1.0;
                let mut frequency = 1.0;
                let mut noise_height = 0.0;

                for octave in &offsets {
                    let sample_x = (x as f32 - half_width + octave.x) / settings.scale * frequency;
                    let sample_y = (y as f32 - half_height + octave.y) / settings.scale * frequency;

                    let value = coherent(&perlin, sample_x, sample_y) * 2.0 - 1.0;
                    noise_height += value * amplitude;

                    amplitude *= settings.persistence;
                    frequency *= settings.lacunarity;
                }

                *cell = noise_height;
            }
        });

    let mut map = HeightMap::from_cells(width, height, cells);

    match settings.normalize_mode {
        NormalizeMode::Local => {
            if let Some((min, max)) = map.min_max() {
                for v in map.cells_mut() {
                    *v = inverse_lerp(min, max, *v);
                }
            }
        }
        NormalizeMode::Global => {
            if max_possible_height <= 0.0 {
                map.cells_mut().fill(0.0);
            } else {
                let divisor = 2.0 * max_possible_height / GLOBAL_NORMALIZE_ESTIMATE;
                for v in map.cells_mut() {
                    *v = ((*v + 1.0) / divisor).clamp(0.0, i32::MAX as f32);
                }
            }
        }
    }

    map
}
