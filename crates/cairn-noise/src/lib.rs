//! Deterministic noise fields and the procedural textures built from them.
//!
//! [`NoiseField`] is the one abstraction the rest of the workspace samples:
//! a pure `(x, y, z) -> [-1, 1]` function with fixed seed constants and no
//! hidden state. Rock displacement composes several [`WaveOctave`]s, and the
//! shared rock normal map is baked from a [`SinusoidField`].

mod field;
mod octave;
mod texture;

pub use field::{NoiseField, SimplexField, SinusoidField};
pub use octave::{Axis, WaveOctave, WaveTerm};
pub use texture::{
    NORMAL_MAP_SIZE, Texture, TextureError, bake_normal_map, bake_snowflake_sprite,
    shared_normal_map,
};
