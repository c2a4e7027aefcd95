use std::f32::consts::PI;
use std::time::Duration;

use cairn_render::{Canvas2d, Color};
use cairn_weather::{EffectDescriptorSet, FogParticle, IconKind};
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::paint;

/// Chance per frame of a stray bolt while lightning is active.
const BOLT_CHANCE: f64 = 0.01;
const RAIN_HAZE_LINES: usize = 120;
const SNOW_HAZE_ELLIPSES: usize = 24;

/// What one [`OverlayRenderer::render`] call painted, for logging and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub bolts: u32,
    pub flash: bool,
}

/// Paints the weather overlay and animates its primitives.
///
/// The renderer keeps its own RNG for per-frame flicker (haze lines, stray
/// bolts, flash strength); positions and phases live in the descriptors.
pub struct OverlayRenderer {
    rng: ChaCha8Rng,
    frames: u64,
    bolts: u64,
}

impl OverlayRenderer {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_os_rng(),
        };
        Self {
            rng,
            frames: 0,
            bolts: 0,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Bolts painted since creation.
    pub fn bolts(&self) -> u64 {
        self.bolts
    }

    /// Clear `canvas` and paint one frame at `elapsed` since the scene began.
    ///
    /// Back to front: streaks, splashes, snow cover and fog, stray bolt,
    /// clouds, desaturation, thunder flash, snowflakes, sun or moon.
    pub fn render(
        &mut self,
        canvas: &mut dyn Canvas2d,
        effects: &mut EffectDescriptorSet,
        elapsed: Duration,
    ) -> FrameStats {
        let size = canvas.size();
        let now = elapsed.as_secs_f32() * 1000.0;
        let mut stats = FrameStats::default();

        canvas.clear();

        self.rain_streaks(canvas, effects, size);
        Self::splashes(canvas, effects, now);
        if effects.snow_accumulation {
            Self::snow_cover(canvas, size);
            self.snow_haze(canvas, size, now);
        }
        if !effects.fog_bands.is_empty() || !effects.fog_particles.is_empty() {
            self.fog(canvas, effects, size);
        }
        if effects.lightning && self.rng.random_bool(BOLT_CHANCE) {
            let points = paint::bolt(&mut self.rng, size, (0.3, 0.7));
            canvas.save();
            canvas.set_alpha(0.7);
            canvas.stroke_polyline(&points, Color::WHITE, 4.0);
            canvas.restore();
            stats.bolts += 1;
        }
        Self::clouds(canvas, effects, size, now);
        if effects.desaturate {
            canvas.save();
            canvas.set_alpha(0.15);
            canvas.fill_rect(Vec2::ZERO, size, paint::GREY);
            canvas.restore();
        }
        if effects.flash_active {
            stats.bolts += self.flash(canvas, size);
            stats.flash = true;
        }
        if effects.snow_accumulation {
            self.snowflakes(canvas, effects, size, now);
        }
        if let Some(icon) = effects.icon {
            let center = Vec2::new(icon.x, icon.y);
            match icon.kind {
                IconKind::Sun => paint::sun(canvas, center, icon.radius),
                IconKind::Moon => paint::moon(canvas, center, icon.radius),
            }
        }

        self.frames += 1;
        self.bolts += u64::from(stats.bolts);
        tracing::trace!(
            frame = self.frames,
            bolts = stats.bolts,
            flash = stats.flash,
            "Overlay frame"
        );
        stats
    }

    // -- Layers -------------------------------------------------------------

    fn rain_streaks(
        &mut self,
        canvas: &mut dyn Canvas2d,
        effects: &mut EffectDescriptorSet,
        size: Vec2,
    ) {
        if effects.rain_streaks.is_empty() {
            return;
        }
        canvas.save();
        canvas.set_alpha(0.22);
        for streak in &mut effects.rain_streaks {
            let top = Vec2::new(streak.x, streak.y);
            canvas.stroke_line(top, top + Vec2::new(0.0, streak.length), paint::RAIN, 2.0);
            streak.y += streak.speed;
            if streak.y > size.y {
                streak.y = -streak.length;
            }
        }
        canvas.restore();

        // Full-screen haze, re-rolled every frame.
        for _ in 0..RAIN_HAZE_LINES {
            let x = self.rng.random_range(0.0..size.x.max(1.0));
            let y = self.rng.random_range(0.0..size.y.max(1.0));
            let len = self.rng.random_range(40.0..100.0);
            canvas.save();
            canvas.set_alpha(self.rng.random_range(0.10..0.18));
            let width = self.rng.random_range(1.5..2.5);
            canvas.stroke_line(Vec2::new(x, y), Vec2::new(x, y + len), paint::RAIN, width);
            canvas.restore();
        }
    }

    fn splashes(canvas: &mut dyn Canvas2d, effects: &EffectDescriptorSet, now: f32) {
        for splash in &effects.rain_splashes {
            canvas.save();
            canvas.set_alpha(splash.alpha * (now / 400.0 + splash.phase).sin().abs());
            canvas.stroke_circle(Vec2::new(splash.x, splash.y), splash.radius, paint::RAIN, 2.0);
            canvas.restore();
        }
    }

    fn snow_cover(canvas: &mut dyn Canvas2d, size: Vec2) {
        canvas.save();
        canvas.set_alpha(0.25);
        canvas.fill_rect(
            Vec2::new(0.0, size.y * 0.85),
            Vec2::new(size.x, size.y * 0.15),
            Color::WHITE,
        );
        canvas.restore();
    }

    fn snow_haze(&mut self, canvas: &mut dyn Canvas2d, size: Vec2, now: f32) {
        let w = size.x.max(1.0);
        for i in 0..SNOW_HAZE_ELLIPSES {
            let x = (now / 12.0 + i as f32 * 120.0) % w;
            let y = size.y * 0.1 + (now / 600.0 + i as f32).sin() * 60.0;
            canvas.save();
            canvas.set_alpha(self.rng.random_range(0.06..0.12));
            canvas.fill_ellipse(Vec2::new(x, y), Vec2::new(120.0, 28.0), Color::WHITE);
            canvas.restore();
        }
    }

    fn fog(&mut self, canvas: &mut dyn Canvas2d, effects: &mut EffectDescriptorSet, size: Vec2) {
        for band in &effects.fog_bands {
            canvas.save();
            canvas.set_alpha(band.alpha);
            canvas.fill_rect(Vec2::new(0.0, band.y), Vec2::new(size.x, band.height), paint::FOG);
            canvas.restore();
        }
        for particle in &mut effects.fog_particles {
            canvas.fill_radial_gradient(
                Vec2::new(particle.x, particle.y),
                particle.radius,
                paint::FOG,
                particle.current_alpha,
            );
            advance_fog(particle, size, &mut self.rng);
        }
    }

    fn clouds(canvas: &mut dyn Canvas2d, effects: &mut EffectDescriptorSet, size: Vec2, now: f32) {
        for (i, cloud) in effects.clouds.iter_mut().enumerate() {
            let pulse = 0.85 + 0.15 * (now / 2000.0 + i as f32).sin();
            canvas.save();
            canvas.set_alpha(cloud.alpha * pulse);
            paint::cloud(canvas, Vec2::new(cloud.x, cloud.y), cloud.radius);
            canvas.restore();
            cloud.x += cloud.speed;
            if cloud.x - cloud.radius > size.x {
                cloud.x = -cloud.radius;
            }
        }
    }

    /// Bright tint plus three or four bolts. Returns the bolt count.
    fn flash(&mut self, canvas: &mut dyn Canvas2d, size: Vec2) -> u32 {
        let count = self.rng.random_range(3..=4);
        for _ in 0..count {
            let points = paint::bolt(&mut self.rng, size, (0.2, 0.8));
            canvas.save();
            canvas.set_alpha(self.rng.random_range(0.38..0.70));
            let width = self.rng.random_range(4.0..6.0);
            canvas.stroke_polyline(&points, Color::WHITE, width);
            canvas.restore();
        }
        canvas.save();
        canvas.set_alpha(self.rng.random_range(0.18..0.30));
        canvas.fill_rect(Vec2::ZERO, size, Color::WHITE);
        canvas.restore();
        count
    }

    fn snowflakes(
        &mut self,
        canvas: &mut dyn Canvas2d,
        effects: &mut EffectDescriptorSet,
        size: Vec2,
        now: f32,
    ) {
        canvas.save();
        for flake in &mut effects.snowflakes {
            canvas.set_alpha(self.rng.random_range(0.22..0.44));
            canvas.fill_circle(Vec2::new(flake.x, flake.y), flake.radius, Color::WHITE);

            flake.y += flake.speed;
            flake.x += (now / 800.0 + flake.phase).sin() * flake.drift;
            if flake.y > size.y {
                flake.y = -flake.radius;
                flake.x = self.rng.random_range(0.0..size.x.max(1.0));
            }
            if flake.x < -flake.radius {
                flake.x = size.x + flake.radius;
            } else if flake.x > size.x + flake.radius {
                flake.x = -flake.radius;
            }
        }
        canvas.restore();
    }
}

/// Drift a fog particle, fade it in and out over its life, and respawn it
/// at a fresh spot once the life runs out.
fn advance_fog(p: &mut FogParticle, size: Vec2, rng: &mut impl Rng) {
    p.x += p.speed_x;
    p.y += p.speed_y;
    p.life += 1;
    if p.life >= p.max_life {
        p.life = 0;
        p.x = rng.random_range(0.0..size.x.max(1.0));
        p.y = rng.random_range(size.y * 0.4..size.y.max(1.0));
    }
    let t = p.life as f32 / p.max_life.max(1) as f32;
    p.current_alpha = p.initial_alpha * (PI * t).sin();
}
