//! Fixed rock material presets.

use cairn_render::Color;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Base surface values of a preset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PresetSurface {
    pub base_color: u32,
    pub roughness: f32,
    pub metalness: f32,
}

impl PresetSurface {
    pub fn color(&self) -> Color {
        Color::from_hex(self.base_color)
    }
}

/// One of the eight selectable rock types.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialPreset {
    #[default]
    Granite,
    Marble,
    Sandstone,
    Limestone,
    Slate,
    Basalt,
    Quartzite,
    Obsidian,
}

impl MaterialPreset {
    pub const ALL: [MaterialPreset; 8] = [
        MaterialPreset::Granite,
        MaterialPreset::Marble,
        MaterialPreset::Sandstone,
        MaterialPreset::Limestone,
        MaterialPreset::Slate,
        MaterialPreset::Basalt,
        MaterialPreset::Quartzite,
        MaterialPreset::Obsidian,
    ];

    /// Storage key, e.g. `"granite"`.
    pub fn key(self) -> &'static str {
        match self {
            MaterialPreset::Granite => "granite",
            MaterialPreset::Marble => "marble",
            MaterialPreset::Sandstone => "sandstone",
            MaterialPreset::Limestone => "limestone",
            MaterialPreset::Slate => "slate",
            MaterialPreset::Basalt => "basalt",
            MaterialPreset::Quartzite => "quartzite",
            MaterialPreset::Obsidian => "obsidian",
        }
    }

    /// Case-insensitive lookup by storage key.
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.key().eq_ignore_ascii_case(key))
    }

    /// Human-readable name, e.g. `"Granite"`.
    pub fn display_name(self) -> &'static str {
        match self {
            MaterialPreset::Granite => "Granite",
            MaterialPreset::Marble => "Marble",
            MaterialPreset::Sandstone => "Sandstone",
            MaterialPreset::Limestone => "Limestone",
            MaterialPreset::Slate => "Slate",
            MaterialPreset::Basalt => "Basalt",
            MaterialPreset::Quartzite => "Quartzite",
            MaterialPreset::Obsidian => "Obsidian",
        }
    }

    pub fn surface(self) -> PresetSurface {
        let (base_color, roughness, metalness) = match self {
            MaterialPreset::Granite => (0x8b7355, 0.7, 0.1),
            MaterialPreset::Marble => (0xf5f5dc, 0.3, 0.05),
            MaterialPreset::Sandstone => (0xd2b48c, 0.8, 0.05),
            MaterialPreset::Limestone => (0xb0a4b8, 0.65, 0.05),
            MaterialPreset::Slate => (0x6a737d, 0.6, 0.05),
            MaterialPreset::Basalt => (0x36454f, 0.9, 0.02),
            MaterialPreset::Quartzite => (0xf0f8ff, 0.5, 0.15),
            MaterialPreset::Obsidian => (0x1c1c1c, 0.1, 0.3),
        };
        PresetSurface {
            base_color,
            roughness,
            metalness,
        }
    }

    /// Pick a preset uniformly at random.
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_keys_roundtrip() {
        for preset in MaterialPreset::ALL {
            assert_eq!(MaterialPreset::from_key(preset.key()), Some(preset));
        }
        assert_eq!(MaterialPreset::from_key("OBSIDIAN"), Some(MaterialPreset::Obsidian));
        assert_eq!(MaterialPreset::from_key("gneiss"), None);
    }

    #[test]
    fn test_serde_matches_key() {
        for preset in MaterialPreset::ALL {
            let json = serde_json::to_string(&preset).unwrap();
            assert_eq!(json, format!("\"{}\"", preset.key()));
        }
    }

    #[test]
    fn test_surfaces_in_range() {
        for preset in MaterialPreset::ALL {
            let s = preset.surface();
            assert!((0.0..=1.0).contains(&s.roughness));
            assert!((0.0..=1.0).contains(&s.metalness));
            assert!(s.base_color <= 0xffffff);
        }
    }

    #[test]
    fn test_obsidian_is_glossiest() {
        let glossiest = MaterialPreset::ALL
            .into_iter()
            .min_by(|a, b| a.surface().roughness.total_cmp(&b.surface().roughness))
            .unwrap();
        assert_eq!(glossiest, MaterialPreset::Obsidian);
    }

    #[test]
    fn test_random_covers_all() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            seen.insert(MaterialPreset::random(&mut rng));
        }
        assert_eq!(seen.len(), MaterialPreset::ALL.len());
    }
}
