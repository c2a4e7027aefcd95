//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const APP_NAME: &str = "cairn";
const CONFIG_FILE: &str = "config.ron";

/// Top-level viewer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Overlay surface settings.
    pub window: WindowConfig,
    /// Rock mesh and default shape settings.
    pub rock: RockConfig,
    /// Bounce integrator constants.
    pub physics: PhysicsConfig,
    /// Erosion clock settings.
    pub erosion: ErosionConfig,
    /// Weather input settings.
    pub weather: WeatherConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Overlay surface configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Overlay width in logical pixels.
    pub width: u32,
    /// Overlay height in logical pixels.
    pub height: u32,
}

/// Rock generation configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RockConfig {
    /// Latitude and longitude segment count of the base sphere.
    pub segments: u32,
    /// Edge length of the shared procedural normal map.
    pub normal_map_size: u32,
    /// Field the normal map is baked from.
    pub normal_map_noise: NormalMapNoise,
    /// Default size (1..=100).
    pub size: u8,
    /// Default x-axis scale (1..=100).
    pub x_scale: u8,
    /// Default y-axis scale (1..=100).
    pub y_scale: u8,
    /// Default smoothness (1..=100).
    pub smoothness: u8,
    /// Default surface detail (1..=100).
    pub surface_detail: u8,
    /// Default material preset key (e.g. "granite").
    pub preset: String,
}

/// Noise field behind the procedural normal map.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NormalMapNoise {
    /// Fixed-seed sinusoid sum, shared by every rock material.
    #[default]
    Sinusoid,
    /// Simplex lattice noise.
    Simplex,
}

/// Bounce physics configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Per-frame velocity change while airborne (negative is down).
    pub gravity: f32,
    /// Upward velocity applied when the rock is tapped.
    pub bounce_impulse: f32,
    /// Stop dead on ground contact instead of rebounding.
    pub stop_on_contact: bool,
    /// Fraction of speed kept on a rebound.
    pub restitution: f32,
    /// Below this impact speed a rebound settles instead.
    pub min_rebound_speed: f32,
}

/// Erosion clock configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ErosionConfig {
    /// Simulated years per real second.
    pub years_per_second: f64,
    /// Fractional scale loss per simulated year under a 1x weather multiplier.
    pub base_rate: f64,
}

/// Weather input configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WeatherConfig {
    /// Classification applied at startup when no provider answers.
    pub default_classification: String,
    /// Whether the default classification is shown in daylight.
    pub daytime: bool,
    /// Observer latitude for the external weather provider.
    pub latitude: Option<f64>,
    /// Observer longitude for the external weather provider.
    pub longitude: Option<f64>,
    /// Seed for effect randomization. `None` draws from entropy.
    pub seed: Option<u64>,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Number of display frames the headless runner simulates.
    pub frames: u32,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

impl Default for RockConfig {
    fn default() -> Self {
        Self {
            segments: 128,
            normal_map_size: 256,
            normal_map_noise: NormalMapNoise::Sinusoid,
            size: 50,
            x_scale: 50,
            y_scale: 50,
            smoothness: 80,
            surface_detail: 50,
            preset: "granite".to_string(),
        }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: -0.025,
            bounce_impulse: 0.32,
            stop_on_contact: true,
            restitution: 0.45,
            min_rebound_speed: 0.08,
        }
    }
}

impl Default for ErosionConfig {
    fn default() -> Self {
        Self {
            years_per_second: 10.0,
            base_rate: 1.0e-5,
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            default_classification: "clear".to_string(),
            daytime: true,
            latitude: None,
            longitude: None,
            seed: None,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            frames: 600,
        }
    }
}

// --- Load / Save ---

/// Resolve the platform configuration directory for the viewer.
///
/// # Errors
///
/// Returns [`ConfigError::NoConfigDir`] if the OS exposes no config directory.
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|base| base.join(APP_NAME))
        .ok_or(ConfigError::NoConfigDir)
}

impl Config {
    /// Read `config.ron` from `config_dir`, writing the defaults there first
    /// if the file does not exist yet.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let path = config_dir.join(CONFIG_FILE);
        if !path.exists() {
            let defaults = Config::default();
            defaults.save(config_dir)?;
            tracing::info!(path = %path.display(), "Wrote default config");
            return Ok(defaults);
        }
        let config = read_config(&path)?;
        tracing::info!(path = %path.display(), "Config loaded");
        Ok(config)
    }

    /// Write `config.ron` into `config_dir`, creating the directory.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let text = ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;
        std::fs::write(config_dir.join(CONFIG_FILE), text).map_err(ConfigError::WriteError)
    }
}

fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
    ron::from_str(&text).map_err(ConfigError::ParseError)
}
