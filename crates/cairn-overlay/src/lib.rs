//! Per-frame 2D weather overlay.
//!
//! [`OverlayRenderer`] paints a [`cairn_weather::EffectDescriptorSet`] onto a
//! [`cairn_render::Canvas2d`] in a fixed back-to-front order and advances each
//! primitive's own motion (positions, phases, fog life cycles). It never
//! touches anything else in the weather state.

mod paint;
mod renderer;

pub use renderer::{FrameStats, OverlayRenderer};
