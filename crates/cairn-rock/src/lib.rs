//! Procedural rock synthesis.
//!
//! A [`RockShapeParameters`] set (five 1..=100 sliders) plus a
//! [`MaterialPreset`] fully describes a rock. [`RockGenerator`] displaces a
//! latitude/longitude sphere into a [`RockMesh`]; [`rock_material`] pairs it
//! with the preset's surface and the shared normal map. [`RockProfile`]
//! persists the choice in a [`KeyValueStore`].

mod generator;
mod mesh;
mod params;
mod preset;
mod profile;
mod store;

pub use generator::{DEFAULT_SEGMENTS, MAX_SEGMENTS, MIN_SEGMENTS, OctaveLayer, RockGenerator, rock_material};
pub use mesh::{Bounds, RockMesh};
pub use params::{PARAM_MAX, PARAM_MIN, RockShapeParameters, ScaledShape, ShapeParam};
pub use preset::{MaterialPreset, PresetSurface};
pub use profile::{NAME_KEY, PARAMS_KEY, ProfileError, RockProfile, TYPE_KEY};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
