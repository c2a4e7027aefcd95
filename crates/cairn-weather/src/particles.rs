//! 3D precipitation point clouds and their per-frame integrators.

use std::ops::Range;
use std::sync::Arc;

use cairn_noise::Texture;
use cairn_render::{Color, PointCloud, PointsHandle, SceneGraph};
use glam::Vec3;
use rand::Rng;

/// Height particles spawn at and wrap back to.
pub const SPAWN_HEIGHT: f32 = 2.5;

/// Half-width of the square spawn area around the rock.
const SPAWN_HALF_EXTENT: f32 = 1.25;

/// Points with both `|x|` and `|z|` below this would fall through the rock.
const FOOTPRINT: f32 = 0.7;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerKind {
    Rain,
    SnowNear,
    SnowFar,
}

/// Per-frame downward distance of a layer's points.
#[derive(Clone, Debug, PartialEq)]
pub enum Fall {
    /// Every point falls the same distance every frame.
    Constant(f32),
    /// Sampled per point per frame.
    Varying(Range<f32>),
}

/// Density, look and motion of one particle layer.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerSpec {
    pub kind: LayerKind,
    pub count: usize,
    pub color: Color,
    pub size: f32,
    pub opacity: f32,
    pub fall: Fall,
    /// Per-frame horizontal jitter bound on x and z. Zero for rain.
    pub jitter: f32,
}

impl LayerSpec {
    pub fn rain(storm: bool) -> Self {
        Self {
            kind: LayerKind::Rain,
            count: if storm { 400 } else { 220 },
            color: Color::from_hex(0xaaaaee),
            size: 0.05,
            opacity: 0.8,
            fall: Fall::Constant(0.1),
            jitter: 0.0,
        }
    }

    pub fn snow_near() -> Self {
        Self {
            kind: LayerKind::SnowNear,
            count: 120,
            color: Color::WHITE,
            size: 0.13,
            opacity: 1.0,
            fall: Fall::Varying(0.015..0.025),
            jitter: 0.005,
        }
    }

    pub fn snow_far() -> Self {
        Self {
            kind: LayerKind::SnowFar,
            count: 50,
            color: Color::WHITE,
            size: 0.22,
            opacity: 0.7,
            fall: Fall::Varying(0.008..0.016),
            jitter: 0.004,
        }
    }
}

/// A live point cloud in the scene and the positions it integrates.
#[derive(Debug)]
pub struct ParticleLayer {
    spec: LayerSpec,
    handle: PointsHandle,
    positions: Vec<Vec3>,
}

impl ParticleLayer {
    /// Sample positions around the rock's footprint and add the cloud to
    /// `scene`.
    pub fn spawn(
        spec: LayerSpec,
        sprite: Option<Arc<Texture>>,
        scene: &mut dyn SceneGraph,
        rng: &mut impl Rng,
    ) -> Self {
        let positions: Vec<Vec3> = (0..spec.count).map(|_| spawn_point(rng)).collect();
        let handle = scene.add_points(&PointCloud {
            positions: positions.clone(),
            color: spec.color,
            size: spec.size,
            opacity: spec.opacity,
            sprite,
        });
        tracing::debug!(kind = ?spec.kind, count = spec.count, "Spawned particle layer");
        Self {
            spec,
            handle,
            positions,
        }
    }

    pub fn kind(&self) -> LayerKind {
        self.spec.kind
    }

    pub fn spec(&self) -> &LayerSpec {
        &self.spec
    }

    pub fn handle(&self) -> PointsHandle {
        self.handle
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Advance one frame and push the new positions to `scene`.
    ///
    /// Points fall by the layer's [`Fall`], drift by up to `jitter` on x and
    /// z, and wrap to [`SPAWN_HEIGHT`] once below the ground.
    pub fn step(&mut self, scene: &mut dyn SceneGraph, rng: &mut impl Rng) {
        let jitter = self.spec.jitter;
        for p in &mut self.positions {
            p.y -= match &self.spec.fall {
                Fall::Constant(d) => *d,
                Fall::Varying(range) => rng.random_range(range.clone()),
            };
            if jitter > 0.0 {
                p.x += rng.random_range(-jitter..jitter);
                p.z += rng.random_range(-jitter..jitter);
            }
            if p.y < 0.0 {
                p.y = SPAWN_HEIGHT;
            }
        }
        scene.update_points(self.handle, &self.positions);
    }

    /// Remove the cloud from `scene`, consuming the layer.
    pub fn despawn(self, scene: &mut dyn SceneGraph) {
        scene.remove_points(self.handle);
        tracing::debug!(kind = ?self.spec.kind, "Removed particle layer");
    }
}

/// Rejection-sample a point in the spawn box outside the rock's footprint.
fn spawn_point(rng: &mut impl Rng) -> Vec3 {
    loop {
        let x = rng.random_range(-SPAWN_HALF_EXTENT..SPAWN_HALF_EXTENT);
        let z = rng.random_range(-SPAWN_HALF_EXTENT..SPAWN_HALF_EXTENT);
        if x.abs() >= FOOTPRINT || z.abs() >= FOOTPRINT {
            let y = rng.random_range(0.0..SPAWN_HEIGHT);
            return Vec3::new(x, y, z);
        }
    }
}
