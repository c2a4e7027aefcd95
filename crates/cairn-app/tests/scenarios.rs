//! End-to-end scenarios across the rock, physics, weather, and overlay crates.

use cairn_app::game_loop::{FIXED_DT, GameLoop};
use cairn_app::scene::{RockScene, default_profile};
use cairn_config::Config;
use cairn_physics::BounceState;
use cairn_render::{LightKind, RecordingCanvas, RecordingScene};
use cairn_rock::{FileStore, MaterialPreset, RockProfile, RockShapeParameters};
use cairn_weather::{Atmosphere, Classification, WeatherInput, WeatherState};

fn config() -> Config {
    let mut config = Config::default();
    config.rock.segments = 24;
    config.window.width = 640;
    config.window.height = 480;
    config
}

fn new_scene(scene: &mut RecordingScene, seed: u64) -> RockScene {
    let config = config();
    RockScene::new(&config, default_profile(&config.rock), scene, Some(seed))
}

fn state(classification: Classification) -> WeatherState {
    WeatherState {
        classification,
        is_daytime: true,
    }
}

#[test]
fn thunderstorm_end_to_end() {
    let mut scene = RecordingScene::new();
    let mut rs = new_scene(&mut scene, 42);
    let weather = WeatherInput::Name {
        name: "Thunderstorm".to_string(),
        is_daytime: true,
    }
    .normalize();
    rs.apply_weather(&mut scene, weather);

    let coordinator = rs.weather();
    assert_eq!(coordinator.classification(), Classification::Thunderstorm);
    assert!(coordinator.effects().rain_streaks.len() >= 100);
    assert!(coordinator.active_particle_systems() >= 1);
    assert!(coordinator.effects().lightning);
    assert_eq!(coordinator.pending_timer_count(), 1);

    let table = Atmosphere::for_classification(Classification::Thunderstorm);
    assert_eq!(scene.light_intensity(LightKind::Ambient), Some(table.ambient));
    assert_eq!(scene.light_intensity(LightKind::Directional), Some(table.directional));
}

#[test]
fn thunder_flashes_while_frames_run() {
    let mut scene = RecordingScene::new();
    let mut canvas = RecordingCanvas::new(640.0, 480.0);
    let mut rs = new_scene(&mut scene, 7);
    rs.apply_weather(&mut scene, state(Classification::Thunderstorm));

    let mut game_loop = GameLoop::new();
    let mut flash_frames = 0;
    for _ in 0..600 {
        game_loop.advance(FIXED_DT, |dt| rs.step(&mut scene, dt));
        if rs.render_overlay(&mut canvas).flash {
            flash_frames += 1;
        }
        assert_eq!(rs.weather().pending_timer_count(), 1);
    }
    // Ten seconds always hold at least two flash cycles.
    assert!(flash_frames > 0);
    assert!(rs.overlay().bolts() > 0);
}

#[test]
fn rain_then_clear_leaves_nothing_behind() {
    let mut scene = RecordingScene::new();
    let mut rs = new_scene(&mut scene, 3);
    rs.apply_weather(&mut scene, state(Classification::Rain));
    for _ in 0..30 {
        rs.step(&mut scene, FIXED_DT);
    }
    rs.apply_weather(&mut scene, state(Classification::Clear));

    let effects = rs.weather().effects();
    assert!(effects.rain_streaks.is_empty());
    assert!(effects.rain_splashes.is_empty());
    assert!(!effects.lightning);
    assert!(!effects.snow_accumulation);
    assert!(!rs.weather().fog_enabled());
    assert_eq!(rs.weather().active_particle_systems(), 0);
    assert_eq!(rs.weather().pending_timer_count(), 0);
    assert_eq!(scene.live_points_count(), 0);
    assert_eq!(scene.fog(), None);
}

#[test]
fn storm_interrupted_mid_flash_restores_light() {
    let mut scene = RecordingScene::new();
    let mut rs = new_scene(&mut scene, 5);
    rs.apply_weather(&mut scene, state(Classification::Thunderstorm));
    let mut flashed = false;
    for _ in 0..60 {
        rs.step(&mut scene, FIXED_DT);
        if rs.weather().effects().flash_active {
            flashed = true;
            break;
        }
    }
    assert!(flashed);

    rs.apply_weather(&mut scene, state(Classification::Fog));
    let fog = Atmosphere::for_classification(Classification::Fog);
    for _ in 0..600 {
        rs.step(&mut scene, FIXED_DT);
        assert_eq!(scene.light_intensity(LightKind::Directional), Some(fog.directional));
        assert!(!rs.weather().effects().flash_active);
    }
}

#[test]
fn repeated_apply_is_idempotent() {
    let mut scene = RecordingScene::new();
    let mut rs = new_scene(&mut scene, 9);
    for classification in [Classification::Thunderstorm, Classification::Snow] {
        rs.apply_weather(&mut scene, state(classification));
        let systems = rs.weather().active_particle_systems();
        let timers = rs.weather().pending_timer_count();
        let points = scene.live_points_count();

        rs.apply_weather(&mut scene, state(classification));
        assert_eq!(rs.weather().active_particle_systems(), systems);
        assert_eq!(rs.weather().pending_timer_count(), timers);
        assert_eq!(scene.live_points_count(), points);
    }
}

#[test]
fn resize_during_snow_keeps_flakes_in_bounds() {
    let mut scene = RecordingScene::new();
    let mut canvas = RecordingCanvas::new(640.0, 480.0);
    let mut rs = new_scene(&mut scene, 13);
    rs.apply_weather(&mut scene, state(Classification::Snow));
    for _ in 0..10 {
        rs.step(&mut scene, FIXED_DT);
        rs.render_overlay(&mut canvas);
    }

    rs.resize(200, 150);
    canvas.resize(200.0, 150.0);
    let flakes = &rs.weather().effects().snowflakes;
    assert!(!flakes.is_empty());
    for flake in flakes {
        assert!((0.0..=200.0).contains(&flake.x), "x = {}", flake.x);
        assert!((0.0..=150.0).contains(&flake.y), "y = {}", flake.y);
    }
}

#[test]
fn erosion_follows_closed_form_through_scene() {
    let mut scene = RecordingScene::new();
    let mut rs = new_scene(&mut scene, 17);
    rs.apply_weather(&mut scene, state(Classification::Snow));

    let erosion = config().erosion;
    let m = Classification::Snow.erosion_multiplier();
    let loss = erosion.base_rate * m * erosion.years_per_second * FIXED_DT;
    let mut expected = 1.0f64;
    let mut previous = rs.erosion().scale_factor();
    for _ in 0..300 {
        rs.step(&mut scene, FIXED_DT);
        expected *= 1.0 - loss;
        let now = rs.erosion().scale_factor();
        assert!(now <= previous);
        previous = now;
    }
    assert!((rs.erosion().scale_factor() - expected).abs() < 1e-9);
}

#[test]
fn bounce_through_game_loop() {
    let mut scene = RecordingScene::new();
    let mut rs = new_scene(&mut scene, 19);
    let rest = rs.bounce().physics().rest_offset;
    assert!(rs.tap());

    let mut game_loop = GameLoop::new();
    game_loop.advance(FIXED_DT, |dt| rs.step(&mut scene, dt));
    assert_eq!(rs.bounce().state(), BounceState::Falling);
    assert!(!rs.tap());

    let mut rose = rs.bounce().offset() > rest;
    for _ in 0..180 {
        game_loop.advance(FIXED_DT, |dt| rs.step(&mut scene, dt));
        rose |= rs.bounce().offset() > rest;
        if rs.bounce().state() == BounceState::Resting {
            break;
        }
    }
    assert!(rose);
    assert_eq!(rs.bounce().state(), BounceState::Resting);
    assert_eq!(rs.bounce().offset(), rs.bounce().physics().rest_offset);
}

#[test]
fn saved_profile_reaches_main_scene() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("storage.json");

    let profile = RockProfile::new(RockShapeParameters::new(80, 30, 90, 20, 70), MaterialPreset::Slate);
    {
        let mut store = FileStore::new(&path);
        profile.save(&mut store).unwrap();
    }

    let store = FileStore::new(&path);
    let restored = RockProfile::load(&store).unwrap().unwrap();
    assert_eq!(restored, profile);

    let mut scene = RecordingScene::new();
    let rs = RockScene::new(&config(), restored, &mut scene, Some(23));
    assert_eq!(rs.rock().profile().preset, MaterialPreset::Slate);
    assert_eq!(rs.summary().rock_name, "Slate");
}
