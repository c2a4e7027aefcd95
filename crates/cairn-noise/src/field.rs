//! Scalar noise fields over 3D space.

use glam::DVec3;
use noise::{NoiseFn, Simplex};

/// A pure, deterministic scalar field sampled in 3D.
///
/// Implementations must return values in `[-1.0, 1.0]` and must produce the
/// same output for the same input on every call.
pub trait NoiseField {
    /// Sample the field at `(x, y, z)`.
    fn sample(&self, x: f64, y: f64, z: f64) -> f64;

    /// Sample the field at a point.
    #[inline]
    fn sample_point(&self, p: DVec3) -> f64 {
        self.sample(p.x, p.y, p.z)
    }
}

/// Sum-of-sinusoids pseudo-noise.
///
/// Three nested sine/cosine terms averaged together. Not a lattice noise, but
/// smooth, cheap, and bounded, which is all the mesh displacement and normal
/// map need. The offsets shift the pattern so two fields with different
/// offsets do not line up along the axes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SinusoidField {
    /// Offset added to every input coordinate before evaluation.
    pub offset: DVec3,
}

impl SinusoidField {
    /// Create a field whose inputs are shifted by `offset`.
    pub const fn new(offset: DVec3) -> Self {
        Self { offset }
    }
}

impl Default for SinusoidField {
    fn default() -> Self {
        Self::new(DVec3::ZERO)
    }
}

impl NoiseField for SinusoidField {
    fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        let x = x + self.offset.x;
        let y = y + self.offset.y;
        let z = z + self.offset.z;
        ((x * 1.5 + (z * 0.7).cos()).sin()
            + (y * 2.1 + (x * 0.5).sin()).cos()
            + (z * 1.3 + (y * 0.9).cos()).sin())
            / 3.0
    }
}

/// Simplex lattice noise from the `noise` crate behind the [`NoiseField`] seam.
///
/// Slower than [`SinusoidField`] but free of the periodic banding sinusoids
/// show at high frequencies.
#[derive(Clone, Debug)]
pub struct SimplexField {
    simplex: Simplex,
    frequency: f64,
}

impl SimplexField {
    /// Create a simplex field with the given seed and input frequency.
    pub fn new(seed: u32, frequency: f64) -> Self {
        Self {
            simplex: Simplex::new(seed),
            frequency,
        }
    }
}

impl NoiseField for SimplexField {
    fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        let f = self.frequency;
        self.simplex.get([x * f, y * f, z * f]).clamp(-1.0, 1.0)
    }
}
