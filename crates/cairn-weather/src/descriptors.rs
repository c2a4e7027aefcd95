//! Lightweight 2D overlay primitives produced per classification.
//!
//! Coordinates are absolute overlay pixels with the origin in the top-left
//! corner. The coordinator fills these collections; the overlay renderer
//! advances their animation fields and paints them.

use glam::Vec2;
use rand::Rng;

// ---------------------------------------------------------------------------
// Primitives
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RainStreak {
    pub x: f32,
    pub y: f32,
    pub length: f32,
    pub speed: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RainSplash {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub alpha: f32,
    /// Phase offset into the `|sin|` pulse, in radians.
    pub phase: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Snowflake {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub speed: f32,
    pub drift: f32,
    pub phase: f32,
}

/// One translucent horizontal band of ground fog.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FogBand {
    pub y: f32,
    pub height: f32,
    pub alpha: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FogParticle {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub initial_alpha: f32,
    pub current_alpha: f32,
    pub speed_x: f32,
    pub speed_y: f32,
    /// Frames lived so far; the particle respawns once it reaches `max_life`.
    pub life: u32,
    pub max_life: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cloud {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub alpha: f32,
    pub speed: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IconKind {
    Sun,
    Moon,
}

/// The sun or moon, pinned to the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CelestialIcon {
    pub kind: IconKind,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

// ---------------------------------------------------------------------------
// Tuning
// ---------------------------------------------------------------------------

const RAIN_STREAKS: usize = 60;
const STORM_STREAKS: usize = 120;
const SPLASHES: usize = 10;
const SNOWFLAKES: usize = 320;
const FOG_PARTICLES: usize = 40;
const ICON_POS: Vec2 = Vec2::new(70.0, 70.0);
const SUN_RADIUS: f32 = 32.0;
const MOON_RADIUS: f32 = 26.0;

// ---------------------------------------------------------------------------
// EffectDescriptorSet
// ---------------------------------------------------------------------------

/// Everything the overlay paints for the active classification.
///
/// The collections are only ever replaced wholesale: [`clear`](Self::clear)
/// empties all of them and resets every flag, then the `populate_*` methods
/// fill the ones the new classification uses.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EffectDescriptorSet {
    pub rain_streaks: Vec<RainStreak>,
    pub rain_splashes: Vec<RainSplash>,
    pub snowflakes: Vec<Snowflake>,
    pub fog_bands: Vec<FogBand>,
    pub fog_particles: Vec<FogParticle>,
    pub clouds: Vec<Cloud>,
    pub icon: Option<CelestialIcon>,
    pub snow_accumulation: bool,
    pub lightning: bool,
    pub desaturate: bool,
    /// Set only while a thunder flash is lit.
    pub flash_active: bool,
}

impl EffectDescriptorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every primitive and reset every flag.
    pub fn clear(&mut self) {
        self.rain_streaks.clear();
        self.rain_splashes.clear();
        self.snowflakes.clear();
        self.fog_bands.clear();
        self.fog_particles.clear();
        self.clouds.clear();
        self.icon = None;
        self.snow_accumulation = false;
        self.lightning = false;
        self.desaturate = false;
        self.flash_active = false;
    }

    /// True when nothing would be painted.
    pub fn is_empty(&self) -> bool {
        self.rain_streaks.is_empty()
            && self.rain_splashes.is_empty()
            && self.snowflakes.is_empty()
            && self.fog_bands.is_empty()
            && self.fog_particles.is_empty()
            && self.clouds.is_empty()
            && self.icon.is_none()
            && !self.snow_accumulation
            && !self.lightning
            && !self.desaturate
            && !self.flash_active
    }

    /// Rain streaks and splashes. Storms get twice as many, longer and faster
    /// streaks.
    pub fn populate_rain(&mut self, rng: &mut impl Rng, size: Vec2, storm: bool) {
        let (w, h) = (size.x.max(1.0), size.y.max(1.0));
        let count = if storm { STORM_STREAKS } else { RAIN_STREAKS };
        let (len, speed) = if storm {
            (40.0..80.0, 12.0..18.0)
        } else {
            (30.0..60.0, 8.0..12.0)
        };
        self.rain_streaks = (0..count)
            .map(|_| RainStreak {
                x: rng.random_range(0.0..w),
                y: rng.random_range(0.0..h),
                length: rng.random_range(len.clone()),
                speed: rng.random_range(speed.clone()),
            })
            .collect();
        self.rain_splashes = (0..SPLASHES)
            .map(|_| RainSplash {
                x: rng.random_range(0.0..w),
                y: h * 0.85 + rng.random_range(0.0..h * 0.1),
                radius: rng.random_range(8.0..16.0),
                alpha: rng.random_range(0.7..1.0),
                phase: rng.random_range(0.0..60.0),
            })
            .collect();
    }

    /// Falling snowflakes plus the accumulation flag.
    pub fn populate_snow(&mut self, rng: &mut impl Rng, size: Vec2) {
        self.regenerate_snowflakes(rng, size);
        self.snow_accumulation = true;
    }

    /// Replace every snowflake with a fresh one inside `size`.
    pub fn regenerate_snowflakes(&mut self, rng: &mut impl Rng, size: Vec2) {
        let (w, h) = (size.x.max(1.0), size.y.max(1.0));
        self.snowflakes = (0..SNOWFLAKES)
            .map(|_| Snowflake {
                x: rng.random_range(0.0..w),
                y: rng.random_range(0.0..h),
                radius: rng.random_range(1.5..5.0),
                speed: rng.random_range(1.2..3.4),
                drift: rng.random_range(-0.6..0.6),
                phase: rng.random_range(0.0..std::f32::consts::TAU),
            })
            .collect();
    }

    /// Ground-hugging fog bands, drifting fog particles, and desaturation.
    pub fn populate_fog(&mut self, rng: &mut impl Rng, size: Vec2) {
        let (w, h) = (size.x.max(1.0), size.y.max(1.0));
        self.fog_bands = [(0.7, 0.18), (0.8, 0.12), (0.9, 0.08)]
            .into_iter()
            .map(|(y, alpha)| FogBand {
                y: h * y,
                height: h * 0.12,
                alpha,
            })
            .collect();
        self.fog_particles = (0..FOG_PARTICLES).map(|_| spawn_fog_particle(rng, w, h)).collect();
        self.desaturate = true;
    }

    /// Two to five drifting clouds along the top of the overlay.
    pub fn populate_clouds(&mut self, rng: &mut impl Rng, size: Vec2) {
        let w = size.x.max(1.0);
        let count = rng.random_range(2..=5);
        self.clouds = (0..count)
            .map(|_| Cloud {
                x: rng.random_range(0.0..w),
                y: rng.random_range(60.0..140.0),
                radius: rng.random_range(60.0..100.0),
                alpha: rng.random_range(0.18..0.30),
                speed: rng.random_range(0.2..0.3),
            })
            .collect();
    }

    /// Sun by day, moon by night, in the top-left corner.
    pub fn populate_sky_icon(&mut self, is_daytime: bool) {
        let (kind, radius) = if is_daytime {
            (IconKind::Sun, SUN_RADIUS)
        } else {
            (IconKind::Moon, MOON_RADIUS)
        };
        self.icon = Some(CelestialIcon {
            kind,
            x: ICON_POS.x,
            y: ICON_POS.y,
            radius,
        });
    }

    /// Map every primitive positioned in absolute coordinates from `old` to
    /// `new` overlay size, keeping their relative placement.
    pub fn rescale(&mut self, old: Vec2, new: Vec2) {
        if old.x <= 0.0 || old.y <= 0.0 {
            return;
        }
        let (sx, sy) = (new.x / old.x, new.y / old.y);
        for s in &mut self.rain_streaks {
            s.x *= sx;
            s.y *= sy;
        }
        for s in &mut self.rain_splashes {
            s.x *= sx;
            s.y *= sy;
        }
        for b in &mut self.fog_bands {
            b.y *= sy;
            b.height *= sy;
        }
        for p in &mut self.fog_particles {
            p.x *= sx;
            p.y *= sy;
        }
        for c in &mut self.clouds {
            c.x *= sx;
        }
    }
}

/// A fog particle at a random position with a fresh life cycle.
pub(crate) fn spawn_fog_particle(rng: &mut impl Rng, w: f32, h: f32) -> FogParticle {
    let alpha = rng.random_range(0.05..0.15);
    FogParticle {
        x: rng.random_range(0.0..w),
        y: rng.random_range(h * 0.4..h),
        radius: rng.random_range(80.0..200.0),
        initial_alpha: alpha,
        current_alpha: alpha,
        speed_x: rng.random_range(-0.3..0.3),
        speed_y: rng.random_range(-0.05..0.05),
        life: 0,
        max_life: rng.random_range(600..1200),
    }
}
