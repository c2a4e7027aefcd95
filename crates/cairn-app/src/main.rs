//! The headless Cairn viewer.
//!
//! Loads config, restores the saved rock, applies the configured weather,
//! and simulates a fixed number of frames against recording collaborators.

use cairn_app::AppError;
use cairn_app::game_loop::{FIXED_DT, GameLoop};
use cairn_app::platform::PlatformDirs;
use cairn_app::provider::FileWeatherProvider;
use cairn_app::scene::{RockScene, configured_normal_map, default_profile};
use cairn_config::{CliArgs, Config};
use cairn_render::{RecordingCanvas, RecordingScene};
use cairn_rock::{FileStore, RockProfile};
use cairn_weather::{WeatherInput, WeatherState, resolve_weather};
use clap::Parser;
use tracing::{info, warn};

fn main() {
    let args = CliArgs::parse();
    if let Err(e) = run(&args) {
        eprintln!("cairn: {e}");
        std::process::exit(1);
    }
}

fn run(args: &CliArgs) -> Result<(), AppError> {
    let mut dirs = PlatformDirs::resolve()?;
    if let Some(dir) = &args.config {
        dirs.config_dir = dir.clone();
    }
    dirs.create_dirs()?;

    let mut config = Config::load_or_create(&dirs.config_dir)?;
    config.apply_cli_overrides(args);
    cairn_log::init_logging(Some(dirs.log_dir.as_path()), cfg!(debug_assertions), Some(&config));
    info!(config_dir = %dirs.config_dir.display(), "Cairn starting");

    if let Some(path) = &args.dump_normal_map {
        let seed = config.weather.seed.unwrap_or_default() as u32;
        let map = configured_normal_map(&config.rock, seed);
        map.save_png(path)?;
        info!(
            path = %path.display(),
            size = map.size(),
            noise = ?config.rock.normal_map_noise,
            "Normal map exported"
        );
    }

    let store = FileStore::new(dirs.store_path());
    let profile = match RockProfile::load(&store) {
        Ok(Some(profile)) => profile,
        Ok(None) => default_profile(&config.rock),
        Err(e) => {
            warn!("Saved rock unreadable, using config defaults: {e}");
            default_profile(&config.rock)
        }
    };

    let weather = initial_weather(&config, &dirs, args.weather.is_some());

    let mut scene = RecordingScene::new();
    let mut canvas = RecordingCanvas::new(config.window.width as f32, config.window.height as f32);
    let mut rock_scene = RockScene::new(&config, profile, &mut scene, config.weather.seed);
    rock_scene.apply_weather(&mut scene, weather);

    let mut game_loop = GameLoop::new();
    let mut flashes = 0u32;
    for _ in 0..config.debug.frames {
        game_loop.advance(FIXED_DT, |dt| rock_scene.step(&mut scene, dt));
        // No 3D renderer is attached headless; the overlay follows the steps.
        if rock_scene.render_overlay(&mut canvas).flash {
            flashes += 1;
        }
    }

    let summary = rock_scene.summary();
    info!(
        rock = %summary.rock_name,
        weather = %summary.weather,
        daytime = summary.is_daytime,
        frames = game_loop.frames(),
        sim_secs = summary.elapsed.as_secs_f64(),
        years = summary.simulated_years,
        scale = summary.scale_factor,
        particle_systems = summary.particle_systems,
        bolts = summary.bolts,
        flash_frames = flashes,
        "Run complete"
    );
    Ok(())
}

/// A `--weather` override wins, then a saved provider report when a
/// location is configured, then the configured classification.
fn initial_weather(config: &Config, dirs: &PlatformDirs, overridden: bool) -> WeatherState {
    let provider = FileWeatherProvider::in_dir(&dirs.data_dir);
    match (config.weather.latitude, config.weather.longitude) {
        (Some(lat), Some(lon)) if !overridden && provider.path().exists() => {
            resolve_weather(Some(&provider), lat, lon)
        }
        _ => WeatherInput::Name {
            name: config.weather.default_classification.clone(),
            is_daytime: config.weather.daytime,
        }
        .normalize(),
    }
}
