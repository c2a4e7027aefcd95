//! Configuration system for the cairn rock viewer.
//!
//! Settings persist to disk as a RON file, can be overridden from the command
//! line via clap, and tolerate missing or unknown fields so older files keep
//! loading after new settings are added.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    Config, DebugConfig, ErosionConfig, NormalMapNoise, PhysicsConfig, RockConfig, WeatherConfig,
    WindowConfig, default_config_dir,
};
pub use error::ConfigError;
