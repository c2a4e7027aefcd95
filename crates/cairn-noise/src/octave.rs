//! Seed-offset sine/cosine octaves used for rock displacement.

use crate::NoiseField;

/// Coordinate axis selector for a [`WaveTerm`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    #[inline]
    fn pick(self, x: f64, y: f64, z: f64) -> f64 {
        match self {
            Axis::X => x,
            Axis::Y => y,
            Axis::Z => z,
        }
    }
}

/// One `sin((a + a_offset) * a_freq) * cos((b + b_offset) * b_freq)` product.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveTerm {
    pub sin_axis: Axis,
    pub sin_offset: f64,
    pub sin_freq: f64,
    pub cos_axis: Axis,
    pub cos_offset: f64,
    pub cos_freq: f64,
}

impl WaveTerm {
    /// Build a term from `(axis, offset, frequency)` pairs.
    pub const fn new(sin: (Axis, f64, f64), cos: (Axis, f64, f64)) -> Self {
        Self {
            sin_axis: sin.0,
            sin_offset: sin.1,
            sin_freq: sin.2,
            cos_axis: cos.0,
            cos_offset: cos.1,
            cos_freq: cos.2,
        }
    }

    #[inline]
    fn eval(&self, x: f64, y: f64, z: f64) -> f64 {
        let a = self.sin_axis.pick(x, y, z);
        let b = self.cos_axis.pick(x, y, z);
        ((a + self.sin_offset) * self.sin_freq).sin() * ((b + self.cos_offset) * self.cos_freq).cos()
    }
}

/// An octave: the mean of several [`WaveTerm`]s at a similar frequency.
///
/// Each term carries its own offsets so no two octaves share nodal planes.
#[derive(Clone, Debug, PartialEq)]
pub struct WaveOctave {
    terms: Vec<WaveTerm>,
}

impl WaveOctave {
    /// Create an octave from its terms.
    ///
    /// # Panics
    ///
    /// Panics if `terms` is empty.
    pub fn new(terms: Vec<WaveTerm>) -> Self {
        assert!(!terms.is_empty(), "an octave needs at least one term");
        Self { terms }
    }

    /// Number of terms averaged by this octave.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Always `false`; octaves are never empty.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl NoiseField for WaveOctave {
    fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        let sum: f64 = self.terms.iter().map(|t| t.eval(x, y, z)).sum();
        sum / self.terms.len() as f64
    }
}
