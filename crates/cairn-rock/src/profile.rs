//! The finalized rock choice handed from the customization tool to the scene.

use crate::{KeyValueStore, MaterialPreset, RockShapeParameters, StoreError};

/// Key holding the JSON-encoded [`RockShapeParameters`].
pub const PARAMS_KEY: &str = "customRockParams";
/// Key holding the preset storage key.
pub const TYPE_KEY: &str = "customRockType";
/// Key holding the display name.
pub const NAME_KEY: &str = "customRockName";

/// Errors raised while saving or loading a profile.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("stored rock parameters are not valid JSON: {0}")]
    BadParams(#[source] serde_json::Error),

    #[error("unknown rock type {0:?}")]
    UnknownType(String),
}

/// A rock shape plus material preset and the name shown for it.
#[derive(Clone, Debug, PartialEq)]
pub struct RockProfile {
    pub params: RockShapeParameters,
    pub preset: MaterialPreset,
    pub name: String,
}

impl Default for RockProfile {
    fn default() -> Self {
        Self::new(RockShapeParameters::default(), MaterialPreset::default())
    }
}

impl RockProfile {
    /// Profile named after its preset.
    pub fn new(params: RockShapeParameters, preset: MaterialPreset) -> Self {
        Self {
            params,
            preset,
            name: preset.display_name().to_string(),
        }
    }

    /// Write all three keys.
    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<(), ProfileError> {
        let json = serde_json::to_string(&self.params).map_err(ProfileError::BadParams)?;
        store.set(PARAMS_KEY, &json)?;
        store.set(TYPE_KEY, self.preset.key())?;
        store.set(NAME_KEY, &self.name)?;
        tracing::info!(preset = self.preset.key(), name = %self.name, "Saved rock profile");
        Ok(())
    }

    /// Read a profile. `Ok(None)` when nothing has been saved yet.
    ///
    /// A missing type or name falls back to the default preset and that
    /// preset's display name; missing parameter fields take their defaults.
    pub fn load(store: &impl KeyValueStore) -> Result<Option<Self>, ProfileError> {
        let Some(json) = store.get(PARAMS_KEY)? else {
            return Ok(None);
        };
        let params: RockShapeParameters =
            serde_json::from_str(&json).map_err(ProfileError::BadParams)?;

        let preset = match store.get(TYPE_KEY)? {
            Some(key) => {
                MaterialPreset::from_key(&key).ok_or(ProfileError::UnknownType(key))?
            }
            None => MaterialPreset::default(),
        };
        let name = store
            .get(NAME_KEY)?
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| preset.display_name().to_string());

        Ok(Some(Self {
            params,
            preset,
            name,
        }))
    }

    /// Read a profile, falling back to [`RockProfile::default`] on absence or
    /// any error.
    pub fn load_or_default(store: &impl KeyValueStore) -> Self {
        match Self::load(store) {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                tracing::debug!("No saved rock profile, using defaults");
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Ignoring saved rock profile: {e}");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        let profile = RockProfile::new(
            RockShapeParameters::new(10, 20, 30, 40, 50),
            MaterialPreset::Obsidian,
        );
        profile.save(&mut store).unwrap();
        assert_eq!(store.get(TYPE_KEY).unwrap().as_deref(), Some("obsidian"));
        assert_eq!(store.get(NAME_KEY).unwrap().as_deref(), Some("Obsidian"));
        assert_eq!(RockProfile::load(&store).unwrap(), Some(profile));
    }

    #[test]
    fn test_empty_store_loads_none() {
        let store = MemoryStore::new();
        assert_eq!(RockProfile::load(&store).unwrap(), None);
        assert_eq!(RockProfile::load_or_default(&store), RockProfile::default());
    }

    #[test]
    fn test_unparsable_params_fall_back() {
        let mut store = MemoryStore::new();
        store.set(PARAMS_KEY, "{broken").unwrap();
        assert!(matches!(
            RockProfile::load(&store),
            Err(ProfileError::BadParams(_))
        ));
        assert_eq!(RockProfile::load_or_default(&store), RockProfile::default());
    }

    #[test]
    fn test_unknown_type_falls_back() {
        let mut store = MemoryStore::new();
        store.set(PARAMS_KEY, r#"{"size":5}"#).unwrap();
        store.set(TYPE_KEY, "gneiss").unwrap();
        assert!(matches!(
            RockProfile::load(&store),
            Err(ProfileError::UnknownType(t)) if t == "gneiss"
        ));
        assert_eq!(RockProfile::load_or_default(&store), RockProfile::default());
    }

    #[test]
    fn test_missing_type_and_name_use_defaults() {
        let mut store = MemoryStore::new();
        store.set(PARAMS_KEY, r#"{"size":5,"smoothness":200}"#).unwrap();
        let profile = RockProfile::load(&store).unwrap().unwrap();
        assert_eq!(profile.params.size(), 5);
        assert_eq!(profile.params.smoothness(), 100);
        assert_eq!(profile.preset, MaterialPreset::Granite);
        assert_eq!(profile.name, "Granite");
    }
}
