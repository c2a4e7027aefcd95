//! The main rock scene: one rock, its bounce and erosion, the weather, and
//! the 2D overlay, driven one fixed step at a time.

use std::sync::Arc;
use std::time::Duration;

use cairn_config::{Config, NormalMapNoise, RockConfig};
use cairn_noise::{
    NORMAL_MAP_SIZE, SimplexField, SinusoidField, Texture, bake_normal_map, shared_normal_map,
};
use cairn_overlay::{FrameStats, OverlayRenderer};
use cairn_physics::{BounceSimulator, ErosionSimulator};
use cairn_render::{Canvas2d, SceneGraph, Transform};
use cairn_rock::{MaterialPreset, RockGenerator, RockProfile, RockShapeParameters};
use cairn_weather::{Classification, SurfaceBinding, WeatherEffectCoordinator, WeatherState};
use glam::{Mat4, Vec2};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::ar::ArPlacement;
use crate::rock::RockInstance;

/// The profile built from the `rock` config section, used when nothing was
/// saved by the customization tool.
pub fn default_profile(config: &RockConfig) -> RockProfile {
    let params = RockShapeParameters::new(
        config.size.into(),
        config.x_scale.into(),
        config.y_scale.into(),
        config.smoothness.into(),
        config.surface_detail.into(),
    );
    let preset = MaterialPreset::from_key(&config.preset).unwrap_or_else(|| {
        tracing::warn!(preset = %config.preset, "Unknown rock preset in config, using default");
        MaterialPreset::default()
    });
    RockProfile::new(params, preset)
}

/// Frequency of the simplex normal map field, in lattice cells per unit.
const SIMPLEX_NORMAL_FREQUENCY: f64 = 0.75;

/// The normal map the `rock` config section asks for. The default sinusoid
/// field at the default size is the shared map; anything else is baked fresh.
pub fn configured_normal_map(config: &RockConfig, seed: u32) -> Arc<Texture> {
    let size = config.normal_map_size.max(1);
    match config.normal_map_noise {
        NormalMapNoise::Sinusoid if size == NORMAL_MAP_SIZE => shared_normal_map(),
        NormalMapNoise::Sinusoid => Arc::new(bake_normal_map(&SinusoidField::default(), size)),
        NormalMapNoise::Simplex => {
            let field = SimplexField::new(seed, SIMPLEX_NORMAL_FREQUENCY);
            Arc::new(bake_normal_map(&field, size))
        }
    }
}

/// Snapshot of a running scene, logged by the headless runner.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneSummary {
    pub rock_name: String,
    pub weather: Classification,
    pub is_daytime: bool,
    pub elapsed: Duration,
    pub simulated_years: f64,
    pub scale_factor: f64,
    pub vertical_offset: f32,
    pub particle_systems: usize,
    pub overlay_frames: u64,
    pub bolts: u64,
}

pub struct RockScene {
    generator: RockGenerator,
    rock: RockInstance,
    bounce: BounceSimulator,
    erosion: ErosionSimulator,
    weather: WeatherEffectCoordinator,
    overlay: OverlayRenderer,
    ar: ArPlacement,
    ar_transform: Option<Transform>,
    elapsed: Duration,
    rng: ChaCha8Rng,
}

impl RockScene {
    /// Build the rock for `profile` and bind its material to the weather.
    ///
    /// The weather starts idle; call [`apply_weather`](Self::apply_weather)
    /// once the classification is known.
    pub fn new(
        config: &Config,
        profile: RockProfile,
        scene: &mut dyn SceneGraph,
        seed: Option<u64>,
    ) -> Self {
        let mut rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_os_rng(),
        };
        let generator = RockGenerator::new(config.rock.segments);
        let rock = RockInstance::build(scene, &generator, profile, &mut rng);
        let bounce = BounceSimulator::from_config(&config.physics, rock.rest_offset(1.0));
        let erosion = ErosionSimulator::from_config(&config.erosion);

        let viewport = Vec2::new(config.window.width as f32, config.window.height as f32);
        let mut weather =
            WeatherEffectCoordinator::new(viewport, seed.map(|s| s.wrapping_add(1)));
        weather.bind_surface(scene, surface_of(&rock));
        let overlay = OverlayRenderer::new(seed.map(|s| s.wrapping_add(2)));

        let this = Self {
            generator,
            rock,
            bounce,
            erosion,
            weather,
            overlay,
            ar: ArPlacement::new(),
            ar_transform: None,
            elapsed: Duration::ZERO,
            rng,
        };
        this.place_rock(scene);
        tracing::info!(rock = %this.rock.profile().name, "Scene ready");
        this
    }

    // -- Accessors ----------------------------------------------------------

    pub fn rock(&self) -> &RockInstance {
        &self.rock
    }

    pub fn bounce(&self) -> &BounceSimulator {
        &self.bounce
    }

    pub fn erosion(&self) -> &ErosionSimulator {
        &self.erosion
    }

    pub fn weather(&self) -> &WeatherEffectCoordinator {
        &self.weather
    }

    pub fn ar(&self) -> &ArPlacement {
        &self.ar
    }

    pub fn overlay(&self) -> &OverlayRenderer {
        &self.overlay
    }

    /// Simulated time since the scene was created.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn summary(&self) -> SceneSummary {
        let state = self.weather.state();
        SceneSummary {
            rock_name: self.rock.profile().name.clone(),
            weather: state.classification,
            is_daytime: state.is_daytime,
            elapsed: self.elapsed,
            simulated_years: self.erosion.simulated_years(),
            scale_factor: self.erosion.scale_factor(),
            vertical_offset: self.bounce.offset(),
            particle_systems: self.weather.active_particle_systems(),
            overlay_frames: self.overlay.frames(),
            bolts: self.overlay.bolts(),
        }
    }

    // -- Input --------------------------------------------------------------

    pub fn apply_weather(&mut self, scene: &mut dyn SceneGraph, state: WeatherState) {
        self.weather.apply_state(scene, state);
    }

    /// The rock was tapped. Starts a bounce unless one is in flight or the
    /// rock is in an AR session.
    pub fn tap(&mut self) -> bool {
        if self.ar.in_session() {
            return false;
        }
        self.bounce.trigger()
    }

    /// Swap in a new rock shape or material, e.g. after the customization
    /// tool finalizes.
    pub fn rebuild(&mut self, scene: &mut dyn SceneGraph, profile: RockProfile) {
        self.weather.unbind_surface();
        self.rock
            .rebuild(scene, &self.generator, profile, &mut self.rng);
        self.weather.bind_surface(scene, surface_of(&self.rock));
        self.bounce
            .set_rest_offset(self.rock.rest_offset(self.scale()));
        if self.ar.in_session() && !self.ar.rock_visible() {
            scene.set_visible(self.rock.handle(), false);
        }
        self.place_rock(scene);
    }

    /// The overlay surface was resized.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.weather.resize(width as f32, height as f32);
    }

    // -- AR -----------------------------------------------------------------

    pub fn ar_session_started(&mut self, scene: &mut dyn SceneGraph) {
        self.ar.session_started();
        self.ar_transform = None;
        self.bounce.reset();
        scene.set_visible(self.rock.handle(), false);
    }

    pub fn ar_session_ended(&mut self, scene: &mut dyn SceneGraph) {
        self.ar.session_ended();
        self.ar_transform = None;
        scene.set_visible(self.rock.handle(), true);
        self.place_rock(scene);
    }

    /// Feed this frame's hit-test result.
    pub fn ar_hit(&mut self, pose: Option<Mat4>) {
        self.ar.update_hit(pose);
    }

    /// A select press. Returns whether the rock was placed.
    pub fn ar_select(&mut self, scene: &mut dyn SceneGraph) -> bool {
        let Some(transform) = self.ar.select() else {
            return false;
        };
        self.ar_transform = Some(transform);
        scene.set_visible(self.rock.handle(), true);
        scene.set_transform(self.rock.handle(), &transform);
        true
    }

    // -- Frame --------------------------------------------------------------

    /// Advance one fixed step of `dt` seconds: bounce, erosion, weather
    /// particles and timers, then the rock transform.
    pub fn step(&mut self, scene: &mut dyn SceneGraph, dt: f64) {
        let dt = dt.max(0.0);
        self.elapsed += Duration::from_secs_f64(dt);

        self.bounce.step();
        self.erosion
            .tick(dt, self.weather.classification().erosion_multiplier());
        self.weather.tick(scene, Duration::from_secs_f64(dt));

        // A shrinking rock sinks back onto the ground.
        self.bounce
            .set_rest_offset(self.rock.rest_offset(self.scale()));
        self.place_rock(scene);

        tracing::trace!(
            offset = self.bounce.offset(),
            scale = self.erosion.scale_factor(),
            "Scene step"
        );
    }

    /// Paint the 2D overlay for the current time. Runs after the 3D draw.
    pub fn render_overlay(&mut self, canvas: &mut dyn Canvas2d) -> FrameStats {
        self.overlay
            .render(canvas, self.weather.effects_mut(), self.elapsed)
    }

    /// Remove the rock and every weather effect from `scene`.
    pub fn dispose(mut self, scene: &mut dyn SceneGraph) {
        self.weather.unbind_surface();
        self.weather.stop(scene);
        self.rock.dispose(scene);
    }

    fn scale(&self) -> f32 {
        self.erosion.scale_factor() as f32
    }

    fn place_rock(&self, scene: &mut dyn SceneGraph) {
        match self.ar_transform {
            Some(transform) => scene.set_transform(self.rock.handle(), &transform),
            None => self.rock.place(scene, self.bounce.offset(), self.scale()),
        }
    }
}

fn surface_of(rock: &RockInstance) -> SurfaceBinding {
    SurfaceBinding {
        handle: rock.handle(),
        roughness: rock.material().roughness,
        metalness: rock.material().metalness,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rock::GROUND_Y;
    use cairn_physics::BounceState;
    use cairn_render::{RecordingCanvas, RecordingScene};
    use glam::Vec3;

    fn config() -> Config {
        let mut config = Config::default();
        config.rock.segments = 24;
        config.window.width = 400;
        config.window.height = 300;
        config
    }

    fn scene_with(scene: &mut RecordingScene) -> RockScene {
        let config = config();
        RockScene::new(&config, default_profile(&config.rock), scene, Some(11))
    }

    #[test]
    fn test_default_profile_from_config() {
        let mut rock = RockConfig::default();
        rock.preset = "basalt".to_string();
        rock.size = 70;
        let profile = default_profile(&rock);
        assert_eq!(profile.preset, MaterialPreset::Basalt);
        assert_eq!(profile.params.size(), 70);

        rock.preset = "cheese".to_string();
        assert_eq!(default_profile(&rock).preset, MaterialPreset::Granite);
    }

    #[test]
    fn test_degenerate_segment_config_still_builds() {
        let mut config = config();
        config.rock.segments = 2;
        let mut scene = RecordingScene::new();
        let rs = RockScene::new(&config, default_profile(&config.rock), &mut scene, Some(4));
        assert_eq!(rs.rock().mesh().segments(), (3, 3));
        assert_eq!(scene.live_mesh_count(), 1);
    }

    #[test]
    fn test_configured_normal_map() {
        let mut rock = RockConfig::default();
        assert!(Arc::ptr_eq(&configured_normal_map(&rock, 0), &shared_normal_map()));

        rock.normal_map_size = 32;
        let small = configured_normal_map(&rock, 0);
        assert_eq!(small.size(), 32);

        rock.normal_map_noise = NormalMapNoise::Simplex;
        let a = configured_normal_map(&rock, 1);
        let b = configured_normal_map(&rock, 2);
        assert_eq!(a.size(), 32);
        assert!(a.texels().iter().all(|t| t[2] == 255));
        assert_ne!(a.texels(), b.texels());
        assert_ne!(a.texels(), small.texels());
    }

    #[test]
    fn test_rock_rests_on_ground() {
        let mut scene = RecordingScene::new();
        let rs = scene_with(&mut scene);
        let t = scene.mesh(rs.rock().handle()).unwrap().transform;
        let bottom = t.translation.y + rs.rock().bounds().min.y * t.scale.y;
        assert!((bottom - GROUND_Y).abs() < 1e-5);
    }

    #[test]
    fn test_tap_bounces_and_settles() {
        let mut scene = RecordingScene::new();
        let mut rs = scene_with(&mut scene);
        let rest = rs.bounce().offset();
        assert!(rs.tap());
        assert!(!rs.tap());
        let mut peak = rest;
        for _ in 0..120 {
            rs.step(&mut scene, 1.0 / 60.0);
            peak = peak.max(rs.bounce().offset());
        }
        assert!(peak > rest);
        assert_eq!(rs.bounce().state(), BounceState::Resting);
    }

    #[test]
    fn test_rain_erodes_faster_than_clear() {
        let mut dry_scene = RecordingScene::new();
        let mut dry = scene_with(&mut dry_scene);
        dry.apply_weather(&mut dry_scene, WeatherState::default());

        let mut wet_scene = RecordingScene::new();
        let mut wet = scene_with(&mut wet_scene);
        wet.apply_weather(
            &mut wet_scene,
            WeatherState {
                classification: Classification::Rain,
                is_daytime: true,
            },
        );

        for _ in 0..60 {
            dry.step(&mut dry_scene, 1.0 / 60.0);
            wet.step(&mut wet_scene, 1.0 / 60.0);
        }
        assert!(wet.erosion().scale_factor() < dry.erosion().scale_factor());
        assert!(dry.erosion().scale_factor() < 1.0);

        let t = wet_scene.mesh(wet.rock().handle()).unwrap().transform;
        assert!((t.scale.x as f64 - wet.erosion().scale_factor()).abs() < 1e-6);
    }

    #[test]
    fn test_rain_wets_rock_and_rebuild_keeps_binding() {
        let mut scene = RecordingScene::new();
        let mut rs = scene_with(&mut scene);
        let dry = rs.rock().material().roughness;
        rs.apply_weather(
            &mut scene,
            WeatherState {
                classification: Classification::Rain,
                is_daytime: true,
            },
        );
        let roughness = scene.mesh(rs.rock().handle()).unwrap().material.roughness;
        assert!(roughness < dry);

        rs.rebuild(
            &mut scene,
            RockProfile::new(RockShapeParameters::default(), MaterialPreset::Marble),
        );
        assert_eq!(scene.live_mesh_count(), 1);
        let handle = rs.rock().handle();
        assert_eq!(rs.weather().surface().map(|s| s.handle), Some(handle));
        let roughness = scene.mesh(handle).unwrap().material.roughness;
        assert!(roughness < MaterialPreset::Marble.surface().roughness);
    }

    #[test]
    fn test_ar_flow() {
        let mut scene = RecordingScene::new();
        let mut rs = scene_with(&mut scene);
        let handle = rs.rock().handle();

        rs.ar_session_started(&mut scene);
        assert!(!scene.mesh(handle).unwrap().visible);
        assert!(!rs.tap());
        assert!(!rs.ar_select(&mut scene));

        rs.ar_hit(Some(Mat4::from_translation(Vec3::new(0.0, -0.5, -1.5))));
        assert!(rs.ar_select(&mut scene));
        rs.step(&mut scene, 1.0 / 60.0);
        let recorded = scene.mesh(handle).unwrap();
        assert!(recorded.visible);
        assert_eq!(recorded.transform.translation, Vec3::new(0.0, -0.5, -1.5));
        assert_eq!(recorded.transform.scale, Vec3::splat(crate::ar::PLACED_SCALE));

        rs.ar_session_ended(&mut scene);
        let recorded = scene.mesh(handle).unwrap();
        assert!(recorded.visible);
        assert_eq!(recorded.transform.translation.x, 0.0);
    }

    #[test]
    fn test_overlay_renders_sun_on_clear() {
        let mut scene = RecordingScene::new();
        let mut rs = scene_with(&mut scene);
        rs.apply_weather(&mut scene, WeatherState::default());
        let mut canvas = RecordingCanvas::new(400.0, 300.0);
        rs.step(&mut scene, 1.0 / 60.0);
        rs.render_overlay(&mut canvas);
        assert_eq!(canvas.clear_count(), 1);
        assert!(!canvas.ops().is_empty());
        assert_eq!(rs.summary().overlay_frames, 1);
    }

    #[test]
    fn test_dispose_releases_everything() {
        let mut scene = RecordingScene::new();
        let mut rs = scene_with(&mut scene);
        rs.apply_weather(
            &mut scene,
            WeatherState {
                classification: Classification::Snow,
                is_daytime: false,
            },
        );
        assert_eq!(scene.live_points_count(), 2);
        rs.dispose(&mut scene);
        assert_eq!(scene.live_points_count(), 0);
        assert_eq!(scene.live_mesh_count(), 0);
    }
}
