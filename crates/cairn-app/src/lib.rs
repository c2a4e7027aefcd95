//! Cairn application layer.
//!
//! Wires the rock, physics, weather, and overlay crates into a scene driven by
//! a fixed-timestep loop, plus the customization tool and AR placement.

pub mod ar;
pub mod editor;
pub mod error;
pub mod game_loop;
pub mod platform;
pub mod provider;
pub mod rock;
pub mod scene;

pub use error::AppError;
