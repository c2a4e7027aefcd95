//! Weather-driven scene effects.
//!
//! Raw weather input (a developer override string or a weather API response)
//! is normalized once at the boundary into a [`Classification`]. The
//! [`WeatherEffectCoordinator`] turns a classification into lighting, fog,
//! 3D precipitation point clouds, a cancelable thunder-flash cycle, and an
//! [`EffectDescriptorSet`] that the 2D overlay paints each frame.

mod atmosphere;
mod classification;
mod coordinator;
mod descriptors;
mod input;
mod particles;
mod thunder;

pub use atmosphere::{Atmosphere, FLASH_INTENSITY, FOG};
pub use classification::{Classification, WeatherState};
pub use coordinator::{SurfaceBinding, WeatherEffectCoordinator};
pub use descriptors::{
    CelestialIcon, Cloud, EffectDescriptorSet, FogBand, FogParticle, IconKind, RainSplash,
    RainStreak, Snowflake,
};
pub use input::{
    Condition, ProviderError, SunTimes, WeatherInput, WeatherProvider, WeatherReport,
    resolve_weather,
};
pub use particles::{Fall, LayerKind, LayerSpec, ParticleLayer, SPAWN_HEIGHT};
pub use thunder::{ThunderCycle, ThunderEvent, ThunderPhase};
