//! Keyframed height response curve.
//!
//! [`HeightCurve`] remaps normalized heights before they are scaled into mesh
//! vertices, e.g. to flatten everything below the water line. Keys are
//! `(input, output)` pairs; sampling between keys interpolates linearly and
//! sampling outside the key range holds the end values.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq)]
pub struct HeightCurve {
    keys: Vec<(f32, f32)>,
}

impl HeightCurve {
    /// Create a curve from unsorted keys. Keys are sorted by input.
    pub fn new(mut keys: Vec<(f32, f32)>) -> Self {
        keys.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        Self { keys }
    }

    /// Identity mapping over [0, 1]
    pub fn linear() -> Self {
        Self::new(vec![(0.0, 0.0), (1.0, 1.0)])
    }

    /// A curve that always returns `value`
    pub fn constant(value: f32) -> Self {
        Self { keys: vec![(0.0, value)] }
    }

    pub fn keys(&self) -> &[(f32, f32)] {
        &self.keys
    }

    /// Sample the curve at `t`. An empty curve is the identity.
    pub fn evaluate(&self, t: f32) -> f32 {
        let n = self.keys.len();
        match n {
            0 => return t,
            1 => return self.keys[0].1,
            _ => {}
        }

        let (first_t, first_v) = self.keys[0];
        let (last_t, last_v) = self.keys[n - 1];
        if t <= first_t {
            return first_v;
        }
        if t >= last_t {
            return last_v;
        }

        // First key strictly after t; exists because t < last_t
        let upper = self.keys.iter().position(|k| k.0 > t).unwrap_or(n - 1);
        let (t_a, v_a) = self.keys[upper - 1];
        let (t_b, v_b) = self.keys[upper];
        let span = t_b - t_a;
        if span < 1e-6 {
            return v_a;
        }
        v_a + (v_b - v_a) * ((t - t_a) / span)
    }
}

impl Default for HeightCurve {
    fn default() -> Self {
        Self::linear()
    }
}

impl Serialize for HeightCurve {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.keys.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for HeightCurve {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let keys = Vec::<(f32, f32)>::deserialize(deserializer)?;
        Ok(Self::new(keys))
    }
}
