//! Per-classification sky, ground, and light levels.

use cairn_render::{Color, FogParams};

use crate::Classification;

/// Directional light intensity during a thunder flash.
pub const FLASH_INTENSITY: f32 = 2.5;

/// Scene fog used for fog/mist, tight enough to swallow the background.
pub const FOG: FogParams = FogParams {
    color: Color::from_hex(0xcfd8dc),
    near: 2.0,
    far: 7.0,
};

const GROUND: u32 = 0xe0cda9;

/// Backdrop colors and light intensities for one classification.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Atmosphere {
    pub sky: Color,
    pub ground: Color,
    pub ambient: f32,
    pub directional: f32,
}

impl Atmosphere {
    /// Lookup table entry. `Unknown` shares `Clear`'s values.
    pub fn for_classification(classification: Classification) -> Self {
        let (sky, ambient, directional) = match classification {
            Classification::Clear | Classification::Unknown => (0xb7d3e6, 0.7, 0.8),
            Classification::Clouds => (0xa0b6c8, 0.6, 0.5),
            Classification::Rain => (0x7a8fa3, 0.5, 0.4),
            Classification::Snow => (0xe6f7ff, 0.8, 0.6),
            Classification::Thunderstorm => (0x5a6a7a, 0.4, 0.3),
            Classification::Fog => (0xcfd8dc, 0.5, 0.3),
        };
        Self {
            sky: Color::from_hex(sky),
            ground: Color::from_hex(GROUND),
            ambient,
            directional,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_matches_clear() {
        assert_eq!(
            Atmosphere::for_classification(Classification::Unknown),
            Atmosphere::for_classification(Classification::Clear)
        );
    }

    #[test]
    fn test_storm_is_darkest() {
        let storm = Atmosphere::for_classification(Classification::Thunderstorm);
        for c in [
            Classification::Clear,
            Classification::Clouds,
            Classification::Rain,
            Classification::Snow,
            Classification::Fog,
        ] {
            assert!(storm.ambient <= Atmosphere::for_classification(c).ambient);
        }
        assert!(FLASH_INTENSITY > storm.directional);
    }

    #[test]
    fn test_fog_bounds() {
        assert!(FOG.near < FOG.far);
    }
}
