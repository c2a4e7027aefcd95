//! The weather state machine.

use std::sync::Arc;
use std::time::Duration;

use cairn_noise::{Texture, bake_snowflake_sprite};
use cairn_render::{LightKind, MaterialProperty, MeshHandle, SceneGraph};
use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::atmosphere::{Atmosphere, FLASH_INTENSITY, FOG};
use crate::descriptors::EffectDescriptorSet;
use crate::particles::{LayerKind, LayerSpec, ParticleLayer};
use crate::thunder::{ThunderCycle, ThunderEvent};
use crate::{Classification, WeatherState};

const SNOW_SPRITE_SIZE: u32 = 32;

/// Roughness multiplier for a rain-soaked surface.
const WET_ROUGHNESS: f32 = 0.55;
/// Metalness added to a rain-soaked surface, standing in for a wet sheen.
const WET_METALNESS: f32 = 0.15;

/// The mesh whose material follows the weather, with its dry values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceBinding {
    pub handle: MeshHandle,
    pub roughness: f32,
    pub metalness: f32,
}

impl SurfaceBinding {
    /// `(roughness, metalness)` for the given weather.
    pub fn values_for(&self, classification: Classification) -> (f32, f32) {
        if classification.is_wet() {
            (
                self.roughness * WET_ROUGHNESS,
                (self.metalness + WET_METALNESS).min(1.0),
            )
        } else {
            (self.roughness, self.metalness)
        }
    }
}

/// Owns every weather-driven effect: lighting, fog, precipitation point
/// clouds, the thunder cycle, and the overlay descriptors.
///
/// [`apply_weather`](Self::apply_weather) is idempotent and may be called at
/// any time. It always tears down everything first, so at most one
/// classification's effects exist and nothing scheduled by a previous one
/// can fire afterwards.
pub struct WeatherEffectCoordinator {
    state: WeatherState,
    atmosphere: Atmosphere,
    effects: EffectDescriptorSet,
    layers: Vec<ParticleLayer>,
    fog_enabled: bool,
    thunder: Option<ThunderCycle>,
    clock: Duration,
    viewport: Vec2,
    surface: Option<SurfaceBinding>,
    snow_sprite: Arc<Texture>,
    rng: ChaCha8Rng,
}

impl WeatherEffectCoordinator {
    /// Create an idle coordinator for an overlay of `viewport` pixels.
    ///
    /// With a `seed` every random choice (particle placement, descriptor
    /// jitter, thunder timing) is reproducible.
    pub fn new(viewport: Vec2, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_os_rng(),
        };
        Self {
            state: WeatherState::default(),
            atmosphere: Atmosphere::for_classification(Classification::Clear),
            effects: EffectDescriptorSet::new(),
            layers: Vec::new(),
            fog_enabled: false,
            thunder: None,
            clock: Duration::ZERO,
            viewport,
            surface: None,
            snow_sprite: Arc::new(bake_snowflake_sprite(SNOW_SPRITE_SIZE)),
            rng,
        }
    }

    // -- Accessors ----------------------------------------------------------

    pub fn state(&self) -> WeatherState {
        self.state
    }

    pub fn classification(&self) -> Classification {
        self.state.classification
    }

    pub fn atmosphere(&self) -> &Atmosphere {
        &self.atmosphere
    }

    pub fn effects(&self) -> &EffectDescriptorSet {
        &self.effects
    }

    /// Descriptors for the overlay to animate in place.
    pub fn effects_mut(&mut self) -> &mut EffectDescriptorSet {
        &mut self.effects
    }

    pub fn layers(&self) -> &[ParticleLayer] {
        &self.layers
    }

    pub fn has_layer(&self, kind: LayerKind) -> bool {
        self.layers.iter().any(|l| l.kind() == kind)
    }

    /// Number of live 3D particle systems.
    pub fn active_particle_systems(&self) -> usize {
        self.layers.len()
    }

    /// Number of armed timers. The thunder cycle holds at most one deadline.
    pub fn pending_timer_count(&self) -> usize {
        usize::from(self.thunder.is_some())
    }

    pub fn thunder(&self) -> Option<&ThunderCycle> {
        self.thunder.as_ref()
    }

    pub fn fog_enabled(&self) -> bool {
        self.fog_enabled
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Time accumulated through [`tick`](Self::tick).
    pub fn clock(&self) -> Duration {
        self.clock
    }

    pub fn surface(&self) -> Option<SurfaceBinding> {
        self.surface
    }

    // -- Transitions --------------------------------------------------------

    pub fn apply_state(&mut self, scene: &mut dyn SceneGraph, state: WeatherState) {
        self.apply_weather(scene, state.classification, state.is_daytime);
    }

    /// Switch every effect to `classification`.
    pub fn apply_weather(
        &mut self,
        scene: &mut dyn SceneGraph,
        classification: Classification,
        is_daytime: bool,
    ) {
        // 1. Scene-side teardown, including the pending flash.
        self.teardown_scene(scene);

        // 2. Overlay teardown.
        self.effects.clear();

        // 3. Backdrop and lights.
        self.state = WeatherState {
            classification,
            is_daytime,
        };
        self.atmosphere = Atmosphere::for_classification(classification);
        scene.set_background(self.atmosphere.sky, self.atmosphere.ground);
        scene.set_light_intensity(LightKind::Ambient, self.atmosphere.ambient);
        scene.set_light_intensity(LightKind::Directional, self.atmosphere.directional);

        // 4. Classification branch.
        let size = self.viewport;
        match classification {
            Classification::Rain => {
                self.spawn_layer(scene, LayerSpec::rain(false), false);
                self.effects.populate_rain(&mut self.rng, size, false);
            }
            Classification::Thunderstorm => {
                self.spawn_layer(scene, LayerSpec::rain(true), false);
                self.effects.populate_rain(&mut self.rng, size, true);
                self.effects.lightning = true;
                self.thunder = Some(ThunderCycle::arm(self.clock, &mut self.rng));
            }
            Classification::Snow => {
                self.spawn_layer(scene, LayerSpec::snow_near(), true);
                self.spawn_layer(scene, LayerSpec::snow_far(), true);
                self.effects.populate_snow(&mut self.rng, size);
            }
            Classification::Fog => {
                scene.set_fog(Some(FOG));
                self.fog_enabled = true;
                self.effects.populate_fog(&mut self.rng, size);
            }
            Classification::Clouds => {
                self.effects.populate_clouds(&mut self.rng, size);
            }
            Classification::Clear | Classification::Unknown => {
                self.effects.populate_sky_icon(is_daytime);
            }
        }

        // 5. Weather-dependent material.
        self.apply_surface(scene);

        tracing::info!(
            weather = %classification,
            daytime = is_daytime,
            particle_systems = self.layers.len(),
            timers = self.pending_timer_count(),
            "Weather applied"
        );
    }

    /// Remove every effect without selecting new weather. Lighting is left
    /// as it was; a bound surface reverts to its dry values.
    pub fn stop(&mut self, scene: &mut dyn SceneGraph) {
        self.teardown_scene(scene);
        self.effects.clear();
        if let Some(surface) = self.surface {
            scene.set_material_property(surface.handle, MaterialProperty::Roughness(surface.roughness));
            scene.set_material_property(surface.handle, MaterialProperty::Metalness(surface.metalness));
        }
        tracing::info!("Weather effects stopped");
    }

    /// Advance particle layers one frame and the thunder cycle by `dt`.
    pub fn tick(&mut self, scene: &mut dyn SceneGraph, dt: Duration) {
        self.clock += dt;

        if let Some(thunder) = self.thunder.as_mut() {
            for event in thunder.advance(self.clock, &mut self.rng) {
                match event {
                    ThunderEvent::FlashStart => {
                        scene.set_light_intensity(LightKind::Directional, FLASH_INTENSITY);
                        self.effects.flash_active = true;
                        tracing::debug!("Thunder flash");
                    }
                    ThunderEvent::FlashEnd => {
                        scene.set_light_intensity(
                            LightKind::Directional,
                            self.atmosphere.directional,
                        );
                        self.effects.flash_active = false;
                    }
                }
            }
        }

        for layer in &mut self.layers {
            layer.step(scene, &mut self.rng);
        }
    }

    /// The overlay surface changed size. Snowflakes are regenerated inside
    /// the new bounds; other primitives keep their relative placement.
    pub fn resize(&mut self, width: f32, height: f32) {
        let new = Vec2::new(width, height);
        if new == self.viewport {
            return;
        }
        let old = self.viewport;
        self.viewport = new;
        if !self.effects.snowflakes.is_empty() {
            self.effects.regenerate_snowflakes(&mut self.rng, new);
        }
        self.effects.rescale(old, new);
        tracing::debug!(width, height, "Overlay resized");
    }

    /// Make `handle`'s material follow the weather, starting now.
    pub fn bind_surface(&mut self, scene: &mut dyn SceneGraph, surface: SurfaceBinding) {
        self.surface = Some(surface);
        self.apply_surface(scene);
    }

    /// Stop tracking the bound mesh, e.g. right before it is removed.
    pub fn unbind_surface(&mut self) -> Option<SurfaceBinding> {
        self.surface.take()
    }

    // -- Internals ----------------------------------------------------------

    fn teardown_scene(&mut self, scene: &mut dyn SceneGraph) {
        for layer in self.layers.drain(..) {
            layer.despawn(scene);
        }
        if self.fog_enabled {
            scene.set_fog(None);
            self.fog_enabled = false;
        }
        if let Some(thunder) = self.thunder.take() {
            if thunder.is_flashing() {
                scene.set_light_intensity(LightKind::Directional, self.atmosphere.directional);
            }
            tracing::debug!("Thunder cancelled");
        }
    }

    fn spawn_layer(&mut self, scene: &mut dyn SceneGraph, spec: LayerSpec, sprite: bool) {
        let sprite = sprite.then(|| Arc::clone(&self.snow_sprite));
        let layer = ParticleLayer::spawn(spec, sprite, scene, &mut self.rng);
        self.layers.push(layer);
    }

    fn apply_surface(&self, scene: &mut dyn SceneGraph) {
        if let Some(surface) = self.surface {
            let (roughness, metalness) = surface.values_for(self.state.classification);
            scene.set_material_property(surface.handle, MaterialProperty::Roughness(roughness));
            scene.set_material_property(surface.handle, MaterialProperty::Metalness(metalness));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cairn_render::{MaterialDesc, MeshData, RecordingScene};

    const VIEW: Vec2 = Vec2::new(800.0, 600.0);

    fn setup() -> (WeatherEffectCoordinator, RecordingScene) {
        (WeatherEffectCoordinator::new(VIEW, Some(42)), RecordingScene::new())
    }

    fn add_rock(scene: &mut RecordingScene) -> MeshHandle {
        let positions = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let normals = [[0.0, 0.0, 1.0]; 3];
        let material = MaterialDesc {
            base_color: cairn_render::Color::WHITE,
            roughness: 0.8,
            metalness: 0.1,
            normal_map: None,
            normal_scale: 1.0,
        };
        scene.add_mesh(
            MeshData {
                positions: &positions,
                normals: &normals,
                indices: &[0, 1, 2],
            },
            &material,
        )
    }

    #[test]
    fn test_rain_then_clear_tears_down() {
        let (mut weather, mut scene) = setup();
        weather.apply_weather(&mut scene, Classification::Rain, true);
        assert_eq!(weather.active_particle_systems(), 1);
        assert!(!weather.effects().rain_streaks.is_empty());

        weather.apply_weather(&mut scene, Classification::Clear, true);
        assert_eq!(weather.active_particle_systems(), 0);
        assert_eq!(scene.live_points_count(), 0);
        let fx = weather.effects();
        assert!(fx.rain_streaks.is_empty() && fx.rain_splashes.is_empty());
        assert!(!fx.lightning && !fx.snow_accumulation && !weather.fog_enabled());
        assert!(fx.icon.is_some());
    }

    #[test]
    fn test_repeat_apply_does_not_accumulate() {
        let (mut weather, mut scene) = setup();
        for _ in 0..3 {
            weather.apply_weather(&mut scene, Classification::Thunderstorm, true);
        }
        assert_eq!(weather.pending_timer_count(), 1);
        assert_eq!(weather.active_particle_systems(), 1);
        assert_eq!(scene.live_points_count(), 1);

        for _ in 0..2 {
            weather.apply_weather(&mut scene, Classification::Snow, false);
        }
        assert_eq!(weather.active_particle_systems(), 2);
        assert_eq!(scene.live_points_count(), 2);
        assert_eq!(weather.pending_timer_count(), 0);
    }

    #[test]
    fn test_lighting_follows_table() {
        let (mut weather, mut scene) = setup();
        weather.apply_weather(&mut scene, Classification::Snow, true);
        let expected = Atmosphere::for_classification(Classification::Snow);
        assert_eq!(scene.light_intensity(LightKind::Ambient), Some(expected.ambient));
        assert_eq!(scene.light_intensity(LightKind::Directional), Some(expected.directional));
        assert_eq!(scene.background(), Some((expected.sky, expected.ground)));
    }

    #[test]
    fn test_fog_toggles() {
        let (mut weather, mut scene) = setup();
        weather.apply_weather(&mut scene, Classification::Fog, true);
        assert_eq!(scene.fog(), Some(FOG));
        assert!(weather.effects().desaturate);
        weather.apply_weather(&mut scene, Classification::Clouds, true);
        assert_eq!(scene.fog(), None);
        assert!(!weather.effects().desaturate);
        assert!((2..=5).contains(&weather.effects().clouds.len()));
    }

    #[test]
    fn test_thunder_flash_spikes_and_restores() {
        let (mut weather, mut scene) = setup();
        weather.apply_weather(&mut scene, Classification::Thunderstorm, true);
        let base = Atmosphere::for_classification(Classification::Thunderstorm).directional;

        let mut saw_flash = false;
        for _ in 0..600 {
            weather.tick(&mut scene, Duration::from_millis(16));
            let lit = scene.light_intensity(LightKind::Directional);
            if weather.effects().flash_active {
                saw_flash = true;
                assert_eq!(lit, Some(FLASH_INTENSITY));
            } else {
                assert_eq!(lit, Some(base));
            }
            assert_eq!(weather.pending_timer_count(), 1);
        }
        assert!(saw_flash);
    }

    #[test]
    fn test_switch_mid_flash_cancels() {
        let (mut weather, mut scene) = setup();
        weather.apply_weather(&mut scene, Classification::Thunderstorm, true);
        let mut guard = 0;
        while !weather.effects().flash_active {
            weather.tick(&mut scene, Duration::from_millis(10));
            guard += 1;
            assert!(guard < 100);
        }
        weather.apply_weather(&mut scene, Classification::Rain, true);
        assert_eq!(weather.pending_timer_count(), 0);
        assert!(!weather.effects().flash_active);

        let rain = Atmosphere::for_classification(Classification::Rain).directional;
        for _ in 0..1000 {
            weather.tick(&mut scene, Duration::from_millis(16));
            assert_eq!(scene.light_intensity(LightKind::Directional), Some(rain));
            assert!(!weather.effects().flash_active);
        }
    }

    #[test]
    fn test_stop_cancels_everything() {
        let (mut weather, mut scene) = setup();
        weather.apply_weather(&mut scene, Classification::Thunderstorm, true);
        weather.stop(&mut scene);
        assert_eq!(weather.pending_timer_count(), 0);
        assert_eq!(scene.live_points_count(), 0);
        assert!(weather.effects().is_empty());
        weather.tick(&mut scene, Duration::from_secs(30));
        assert!(!weather.effects().flash_active);
    }

    #[test]
    fn test_resize_regenerates_snowflakes() {
        let (mut weather, mut scene) = setup();
        weather.apply_weather(&mut scene, Classification::Snow, true);
        weather.resize(320.0, 240.0);
        assert_eq!(weather.effects().snowflakes.len(), 320);
        for f in &weather.effects().snowflakes {
            assert!((0.0..=320.0).contains(&f.x) && (0.0..=240.0).contains(&f.y));
        }
    }

    #[test]
    fn test_wet_surface_under_rain() {
        let (mut weather, mut scene) = setup();
        let rock = add_rock(&mut scene);
        weather.bind_surface(
            &mut scene,
            SurfaceBinding {
                handle: rock,
                roughness: 0.8,
                metalness: 0.1,
            },
        );
        weather.apply_weather(&mut scene, Classification::Rain, true);
        let wet = scene.mesh(rock).unwrap().material.clone();
        assert!(wet.roughness < 0.8);
        assert!(wet.metalness > 0.1);

        weather.apply_weather(&mut scene, Classification::Clear, true);
        let dry = &scene.mesh(rock).unwrap().material;
        assert_eq!(dry.roughness, 0.8);
        assert_eq!(dry.metalness, 0.1);
    }

    #[test]
    fn test_unknown_renders_as_clear() {
        let (mut weather, mut scene) = setup();
        weather.apply_weather(&mut scene, Classification::Unknown, false);
        let clear = Atmosphere::for_classification(Classification::Clear);
        assert_eq!(scene.light_intensity(LightKind::Ambient), Some(clear.ambient));
        assert_eq!(
            weather.effects().icon.map(|i| i.kind),
            Some(crate::IconKind::Moon)
        );
    }

    #[test]
    fn test_snow_layers_use_sprite() {
        let (mut weather, mut scene) = setup();
        weather.apply_weather(&mut scene, Classification::Snow, true);
        assert!(weather.has_layer(LayerKind::SnowNear));
        assert!(weather.has_layer(LayerKind::SnowFar));
        for layer in weather.layers() {
            let recorded = scene.points(layer.handle()).unwrap();
            assert!(recorded.cloud.sprite.is_some());
        }
    }
}
