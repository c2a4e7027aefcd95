//! The rock customization tool.
//!
//! Holds a working profile, rebuilds the preview rock after every edit, and
//! finalizes the choice into a key-value store for the main scene to pick up.

use cairn_render::SceneGraph;
use cairn_rock::{
    KeyValueStore, MaterialPreset, ProfileError, RockGenerator, RockProfile, RockShapeParameters,
    ShapeParam,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::rock::RockInstance;

pub struct RockEditor {
    generator: RockGenerator,
    profile: RockProfile,
    preview: RockInstance,
    rng: ChaCha8Rng,
}

impl RockEditor {
    /// Open the editor on `profile`, adding its preview rock to `scene`.
    pub fn new(
        scene: &mut dyn SceneGraph,
        generator: RockGenerator,
        profile: RockProfile,
        seed: Option<u64>,
    ) -> Self {
        let mut rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_os_rng(),
        };
        let preview = RockInstance::build(scene, &generator, profile.clone(), &mut rng);
        Self {
            generator,
            profile,
            preview,
            rng,
        }
    }

    pub fn profile(&self) -> &RockProfile {
        &self.profile
    }

    pub fn preview(&self) -> &RockInstance {
        &self.preview
    }

    /// Set one slider by its key (`"size"`, `"xScale"`, ...). Values are
    /// clamped; unknown keys are ignored. Returns the stored value.
    pub fn set_param(&mut self, scene: &mut dyn SceneGraph, key: &str, value: i64) -> Option<u8> {
        let param = ShapeParam::from_key(key)?;
        let stored = self.profile.params.set(param, value);
        self.rebuild(scene);
        Some(stored)
    }

    /// Set one slider from a text field. Unparsable text stores 1.
    pub fn set_param_text(&mut self, scene: &mut dyn SceneGraph, key: &str, text: &str) -> Option<u8> {
        let param = ShapeParam::from_key(key)?;
        let stored = self.profile.params.set_from_text(param, text);
        self.rebuild(scene);
        Some(stored)
    }

    /// Switch the material preset; the display name follows the preset.
    pub fn set_preset(&mut self, scene: &mut dyn SceneGraph, preset: MaterialPreset) {
        self.profile.preset = preset;
        self.profile.name = preset.display_name().to_string();
        self.rebuild(scene);
    }

    /// Pick a random preset and random values for every slider.
    pub fn randomize(&mut self, scene: &mut dyn SceneGraph) {
        let preset = MaterialPreset::random(&mut self.rng);
        let params = RockShapeParameters::random(&mut self.rng);
        self.profile = RockProfile::new(params, preset);
        tracing::debug!(preset = preset.key(), "Randomized rock");
        self.rebuild(scene);
    }

    /// Back to the built-in defaults.
    pub fn reset(&mut self, scene: &mut dyn SceneGraph) {
        self.profile = RockProfile::default();
        self.rebuild(scene);
    }

    /// Persist the working profile for the main scene.
    pub fn finalize(&self, store: &mut impl KeyValueStore) -> Result<(), ProfileError> {
        self.profile.save(store)
    }

    /// Close the editor, releasing the preview rock.
    pub fn close(self, scene: &mut dyn SceneGraph) -> RockProfile {
        self.preview.dispose(scene);
        self.profile
    }

    fn rebuild(&mut self, scene: &mut dyn SceneGraph) {
        self.preview
            .rebuild(scene, &self.generator, self.profile.clone(), &mut self.rng);
    }
}
