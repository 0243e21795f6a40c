//! Edge falloff mask for island-shaped maps

use super::grid::HeightMap;

/// Steepness of the falloff curve
pub const FALLOFF_STEEPNESS: f32 = 3.0;

/// Shift of the falloff curve; larger values push the slope toward the edge
pub const FALLOFF_SHIFT: f32 = 2.2;

/// Shape a [0, 1] edge-distance proxy into an attenuation value
#[inline]
pub fn evaluate_falloff(value: f32) -> f32 {
    let a = FALLOFF_STEEPNESS;
    let b = FALLOFF_SHIFT;
    let v = value.powf(a);
    v / (v + (b - b * value).powf(a))
}

/// Generate a `size` x `size` attenuation mask: ~0 in the middle, ~1 at the edges
pub fn generate_falloff_map(size: usize) -> HeightMap {
    let mut map = HeightMap::new(size, size);
    for j in 0..size {
        for i in 0..size {
            let x = i as f32 / size as f32 * 2.0 - 1.0;
            let y = j as f32 / size as f32 * 2.0 - 1.0;

            let value = x.abs().max(y.abs());
            map.set(i, j, evaluate_falloff(value));
        }
    }
    map
}
