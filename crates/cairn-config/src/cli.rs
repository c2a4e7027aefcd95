//! Command-line argument parsing for the headless viewer.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Cairn command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "cairn", about = "Procedural rock viewer with weather effects")]
pub struct CliArgs {
    /// Overlay width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Overlay height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Weather classification to apply (clear, clouds, rain, snow, thunderstorm, fog).
    #[arg(long)]
    pub weather: Option<String>,

    /// Render the weather at night.
    #[arg(long)]
    pub night: bool,

    /// Seed for effect randomization.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of display frames to simulate.
    #[arg(long)]
    pub frames: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write the shared normal map to this PNG path and continue.
    #[arg(long)]
    pub dump_normal_map: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(ref weather) = args.weather {
            self.weather.default_classification = weather.clone();
        }
        if args.night {
            self.weather.daytime = false;
        }
        if let Some(seed) = args.seed {
            self.weather.seed = Some(seed);
        }
        if let Some(frames) = args.frames {
            self.debug.frames = frames;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
