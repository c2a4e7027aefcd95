//! The 2D overlay surface collaborator.

use glam::Vec2;

use crate::Color;

/// A persistent 2D drawing surface sized to the viewport.
///
/// Coordinates are in pixels with the origin at the top-left corner and `y`
/// growing downward. Alpha is a piece of state saved and restored with
/// [`save`](Self::save) / [`restore`](Self::restore), like an HTML canvas.
pub trait Canvas2d {
    /// Current surface size in pixels.
    fn size(&self) -> Vec2;

    fn clear(&mut self);
    fn save(&mut self);
    fn restore(&mut self);
    fn set_alpha(&mut self, alpha: f32);

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32);
    fn stroke_polyline(&mut self, points: &[Vec2], color: Color, width: f32);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color, width: f32);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, color: Color);
    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color);
    /// Fill a disc whose alpha fades from `inner_alpha` at the center to zero
    /// at `radius`, multiplied by the current global alpha.
    fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, color: Color, inner_alpha: f32);
}
