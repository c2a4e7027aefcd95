//! Sphere-to-rock displacement.
//!
//! Every vertex direction `n` of a unit sphere is pushed outward by
//! `max(0.75, 1 + noise(n) * (1 - |n.y|^4))`, where `noise` sums five
//! sinusoid octaves weighted by jaggedness and surface detail plus a small
//! random jitter. The result is scaled by size and stretched on x and y.

use cairn_noise::{Axis, NoiseField, WaveOctave, WaveTerm, shared_normal_map};
use cairn_render::MaterialDesc;
use glam::{DVec3, Vec3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{MaterialPreset, RockMesh, RockShapeParameters};

/// Latitude and longitude segments of the default rock sphere.
pub const DEFAULT_SEGMENTS: u32 = 128;

/// Segment counts accepted by [`RockGenerator::new`]; others are clamped.
pub const MIN_SEGMENTS: u32 = 3;
pub const MAX_SEGMENTS: u32 = 512;

/// Smallest radial multiplier a vertex may take.
const DISPLACEMENT_FLOOR: f64 = 0.75;

/// Amplitude of the uniform jitter term at full jaggedness.
const JITTER_AMPLITUDE: f64 = 0.12;

const SEEDS: [f64; 6] = [12.34, 56.78, 90.12, 34.56, 78.90, 1.23];

/// One displacement octave and the rule that weights it.
///
/// Weight is `detail^detail_power * (base + jag_coeff * jaggedness^jag_power)`,
/// and the octave contributes nothing unless jaggedness exceeds `gate`.
#[derive(Clone, Debug)]
pub struct OctaveLayer {
    pub octave: WaveOctave,
    pub gate: Option<f64>,
    pub base: f64,
    pub jag_coeff: f64,
    pub jag_power: i32,
    pub detail_power: i32,
}

impl OctaveLayer {
    /// Weight of this layer for the given shape, zero when gated off.
    pub fn weight(&self, jaggedness: f64, detail: f64) -> f64 {
        if self.gate.is_some_and(|g| jaggedness <= g) {
            return 0.0;
        }
        detail.powi(self.detail_power) * (self.base + self.jag_coeff * jaggedness.powi(self.jag_power))
    }
}

fn term(sin: (Axis, f64, f64), cos: (Axis, f64, f64)) -> WaveTerm {
    WaveTerm::new(sin, cos)
}

/// The five octaves, from broad lumps (~3x) to ultra-fine chatter (~70x).
fn default_layers() -> Vec<OctaveLayer> {
    use Axis::{X, Y, Z};
    let [s1, s2, s3, s4, s5, s6] = SEEDS;
    vec![
        OctaveLayer {
            octave: WaveOctave::new(vec![
                term((X, 17.3 + s1, 3.7), (Y, -8.1 + s2, 3.1)),
                term((Y, 23.5 + s3, 2.9), (Z, -12.9 + s4, 3.3)),
                term((Z, 5.7 + s5, 3.5), (X, -19.2 + s6, 2.7)),
            ]),
            gate: None,
            base: 0.12,
            jag_coeff: 0.45,
            jag_power: 1,
            detail_power: 0,
        },
        OctaveLayer {
            octave: WaveOctave::new(vec![
                term((X, -11.8 + s4, 7.2), (Y, 31.1 + s5, 6.8)),
                term((Y, -5.4 + s6, 6.5), (Z, 27.6 + s1, 7.1)),
            ]),
            gate: None,
            base: 0.08,
            jag_coeff: 0.25,
            jag_power: 1,
            detail_power: 1,
        },
        OctaveLayer {
            octave: WaveOctave::new(vec![
                term((X, 3.9 + s2, 15.7), (Y, -22.4 + s3, 14.3)),
                term((Y, 14.2 + s4, 16.1), (Z, -7.8 + s5, 15.9)),
                term((Z, 33.1 + s6, 14.7), (X, -1.5 + s1, 15.3)),
            ]),
            gate: Some(0.1),
            base: 0.0,
            jag_coeff: 0.18,
            jag_power: 1,
            detail_power: 1,
        },
        OctaveLayer {
            octave: WaveOctave::new(vec![
                term((X, -25.6 + s5, 32.1), (Y, 9.3 + s6, 31.7)),
                term((Y, -18.7 + s1, 33.3), (Z, 2.4 + s2, 32.9)),
            ]),
            gate: Some(0.3),
            base: 0.0,
            jag_coeff: 0.15,
            jag_power: 2,
            detail_power: 1,
        },
        OctaveLayer {
            octave: WaveOctave::new(vec![
                term((X, 13.1 + s3, 64.3), (Y, -28.9 + s4, 67.1)),
                term((Y, 2.7 + s5, 71.7), (Z, -15.3 + s6, 59.3)),
                term((Z, 20.8 + s1, 83.9), (X, -34.5 + s2, 76.4)),
            ]),
            gate: Some(0.7),
            base: 0.0,
            jag_coeff: 0.2,
            jag_power: 3,
            detail_power: 1,
        },
    ]
}

/// Builds rock meshes from shape parameters.
#[derive(Clone, Debug)]
pub struct RockGenerator {
    segments: u32,
    layers: Vec<OctaveLayer>,
}

impl Default for RockGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_SEGMENTS)
    }
}

impl RockGenerator {
    /// Create a generator producing `segments x segments` spheres.
    ///
    /// `segments` is clamped to `MIN_SEGMENTS..=MAX_SEGMENTS`.
    pub fn new(segments: u32) -> Self {
        let clamped = segments.clamp(MIN_SEGMENTS, MAX_SEGMENTS);
        if clamped != segments {
            tracing::warn!(requested = segments, used = clamped, "Rock segment count out of range");
        }
        Self {
            segments: clamped,
            layers: default_layers(),
        }
    }

    pub fn segments(&self) -> u32 {
        self.segments
    }

    pub fn layers(&self) -> &[OctaveLayer] {
        &self.layers
    }

    /// Generate a rock with jitter drawn from entropy.
    ///
    /// Two calls with equal parameters share the octave structure but differ in
    /// per-vertex jitter; use [`generate_seeded`](Self::generate_seeded) for a
    /// reproducible mesh.
    pub fn generate(&self, params: &RockShapeParameters) -> RockMesh {
        let mut rng = ChaCha8Rng::from_os_rng();
        self.generate_with_rng(params, &mut rng)
    }

    /// Generate a rock whose jitter is fully determined by `seed`.
    pub fn generate_seeded(&self, params: &RockShapeParameters, seed: u64) -> RockMesh {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.generate_with_rng(params, &mut rng)
    }

    /// Generate a rock drawing jitter from `rng`.
    pub fn generate_with_rng(&self, params: &RockShapeParameters, rng: &mut impl Rng) -> RockMesh {
        let mut mesh = RockMesh::unit_sphere(self.segments, self.segments);
        self.displace(&mut mesh, params, rng);
        mesh
    }

    /// Recompute `mesh` positions and normals in place for new parameters.
    pub fn displace(&self, mesh: &mut RockMesh, params: &RockShapeParameters, rng: &mut impl Rng) {
        let shape = params.scaled();
        let jaggedness = shape.jaggedness();
        let weights: Vec<f64> = self
            .layers
            .iter()
            .map(|l| l.weight(jaggedness, shape.detail))
            .collect();
        let jitter = jaggedness * jaggedness * JITTER_AMPLITUDE;
        let stretch = DVec3::new(shape.x_scale, shape.y_scale, 1.0) * shape.size;

        let directions: Vec<Vec3> = mesh.directions().to_vec();
        for (pos, dir) in mesh.positions_mut().iter_mut().zip(directions) {
            let n = dir.as_dvec3().normalize_or_zero();

            let mut noise = 0.0;
            for (layer, &w) in self.layers.iter().zip(&weights) {
                if w != 0.0 {
                    noise += layer.octave.sample_point(n) * w;
                }
            }
            let r: f64 = rng.random::<f64>() + rng.random::<f64>() + rng.random::<f64>();
            noise += (r / 3.0 - 0.5) * jitter;

            let pole_attenuation = 1.0 - n.y.abs().powi(4);
            let displacement = (1.0 + noise * pole_attenuation).max(DISPLACEMENT_FLOOR);

            *pos = (n * displacement * stretch).as_vec3().to_array();
        }

        mesh.recompute_normals();
        tracing::debug!(
            vertices = mesh.vertex_count(),
            jaggedness,
            detail = shape.detail,
            "Displaced rock mesh"
        );
    }

    /// Upper bound on `|noise|` before pole attenuation for `params`.
    pub fn max_noise_amplitude(&self, params: &RockShapeParameters) -> f64 {
        let shape = params.scaled();
        let j = shape.jaggedness();
        let octaves: f64 = self.layers.iter().map(|l| l.weight(j, shape.detail)).sum();
        octaves + j * j * JITTER_AMPLITUDE * 0.5
    }
}

/// Surface description for a rock of the given preset, sharing the global
/// procedural normal map.
pub fn rock_material(preset: MaterialPreset) -> MaterialDesc {
    let surface = preset.surface();
    MaterialDesc {
        base_color: surface.color(),
        roughness: surface.roughness,
        metalness: surface.metalness,
        normal_map: Some(shared_normal_map()),
        normal_scale: 1.0,
    }
}
