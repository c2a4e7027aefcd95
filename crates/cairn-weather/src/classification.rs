//! The normalized weather category.

use std::fmt;

/// Weather category driving every visual branch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Classification {
    #[default]
    Clear,
    Clouds,
    Rain,
    Snow,
    Thunderstorm,
    Fog,
    /// Input that matched no category. Rendered like [`Classification::Clear`].
    Unknown,
}

impl Classification {
    /// Normalize a free-form weather name.
    ///
    /// Matching is case-insensitive on substrings, checked from most to least
    /// severe so `"thunderstorm with rain"` is a thunderstorm. Anything
    /// unrecognized (including an empty string) is [`Classification::Unknown`].
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim().to_ascii_lowercase();
        if s.is_empty() {
            Classification::Unknown
        } else if s.contains("thunder") {
            Classification::Thunderstorm
        } else if s.contains("snow") || s.contains("sleet") {
            Classification::Snow
        } else if s.contains("rain") || s.contains("drizzle") || s.contains("shower") {
            Classification::Rain
        } else if s.contains("fog") || s.contains("mist") || s.contains("haze") {
            Classification::Fog
        } else if s.contains("cloud") || s.contains("overcast") {
            Classification::Clouds
        } else if s.contains("clear") || s.contains("sun") {
            Classification::Clear
        } else {
            Classification::Unknown
        }
    }

    /// Lowercase name, e.g. `"thunderstorm"`.
    pub fn name(self) -> &'static str {
        match self {
            Classification::Clear => "clear",
            Classification::Clouds => "clouds",
            Classification::Rain => "rain",
            Classification::Snow => "snow",
            Classification::Thunderstorm => "thunderstorm",
            Classification::Fog => "fog",
            Classification::Unknown => "unknown",
        }
    }

    /// Erosion speed-up for this weather.
    pub fn erosion_multiplier(self) -> f64 {
        match self {
            Classification::Thunderstorm | Classification::Rain => 8.0,
            Classification::Snow => 4.0,
            Classification::Fog => 1.5,
            Classification::Clear | Classification::Clouds | Classification::Unknown => 1.0,
        }
    }

    /// Whether rain falls (and the rock surface gets wet).
    pub fn is_wet(self) -> bool {
        matches!(self, Classification::Rain | Classification::Thunderstorm)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The active weather: one classification at a time plus time of day.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeatherState {
    pub classification: Classification,
    pub is_daytime: bool,
}

impl Default for WeatherState {
    fn default() -> Self {
        Self {
            classification: Classification::Clear,
            is_daytime: true,
        }
    }
}
