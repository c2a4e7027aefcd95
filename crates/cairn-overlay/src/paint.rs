//! Composite shapes built from canvas primitives.

use std::f32::consts::TAU;

use cairn_render::{Canvas2d, Color};
use glam::Vec2;
use rand::Rng;

pub const RAIN: Color = Color::from_hex(0xb7d3e6);
pub const SUN: Color = Color::from_hex(0xffe066);
pub const MOON: Color = Color::from_hex(0xf4f1de);
pub const MOON_SHADE: Color = Color::from_hex(0xd9d4b8);
pub const FOG: Color = Color::from_hex(0xcfd8dc);
pub const GREY: Color = Color::from_hex(0x9e9e9e);

const BOLT_SEGMENTS: usize = 8;
const SUN_RAYS: usize = 12;

/// A jagged bolt from the top edge, starting between `x_range` fractions of
/// the width and dropping a tenth of the height per segment.
pub fn bolt(rng: &mut impl Rng, size: Vec2, x_range: (f32, f32)) -> Vec<Vec2> {
    let mut x = size.x * rng.random_range(x_range.0..x_range.1);
    let mut y = 0.0;
    let mut points = Vec::with_capacity(BOLT_SEGMENTS + 1);
    points.push(Vec2::new(x, y));
    for _ in 0..BOLT_SEGMENTS {
        x += rng.random_range(-20.0..20.0);
        y += size.y / 10.0;
        points.push(Vec2::new(x, y));
    }
    points
}

/// Three overlapping ellipses.
pub fn cloud(canvas: &mut dyn Canvas2d, center: Vec2, r: f32) {
    canvas.fill_ellipse(center, Vec2::new(r * 1.2, r), Color::WHITE);
    canvas.fill_ellipse(center + Vec2::new(r, 0.0), Vec2::new(r, r * 0.8), Color::WHITE);
    canvas.fill_ellipse(center - Vec2::new(r, 0.0), Vec2::new(r, r * 0.8), Color::WHITE);
}

/// Disc with a glow and twelve rays.
pub fn sun(canvas: &mut dyn Canvas2d, center: Vec2, r: f32) {
    canvas.save();
    canvas.set_alpha(0.92);
    canvas.fill_radial_gradient(center, r * 1.5, SUN, 0.5);
    canvas.fill_circle(center, r, SUN);
    for i in 0..SUN_RAYS {
        let dir = Vec2::from_angle(i as f32 / SUN_RAYS as f32 * TAU);
        canvas.stroke_line(center + dir * (r + 6.0), center + dir * (r + 18.0), SUN, 3.0);
    }
    canvas.restore();
}

/// Pale disc with a soft halo and a few craters.
pub fn moon(canvas: &mut dyn Canvas2d, center: Vec2, r: f32) {
    canvas.save();
    canvas.set_alpha(0.9);
    canvas.fill_radial_gradient(center, r * 1.8, MOON, 0.35);
    canvas.fill_circle(center, r, MOON);
    let craters = [
        (Vec2::new(-0.3, -0.2), 0.22),
        (Vec2::new(0.25, 0.3), 0.15),
        (Vec2::new(0.35, -0.35), 0.1),
    ];
    for (offset, scale) in craters {
        canvas.fill_circle(center + offset * r, r * scale, MOON_SHADE);
    }
    canvas.restore();
}
