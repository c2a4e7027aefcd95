//! The weather input boundary.
//!
//! Every external representation (an override name, an API response body, a
//! failed lookup) is normalized here into a [`WeatherState`] before it reaches
//! the coordinator. Nothing past this point sees raw strings or JSON.

use serde::Deserialize;

use crate::{Classification, WeatherState};

/// Why an external weather lookup produced nothing.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("location unavailable: {0}")]
    Location(String),

    #[error("weather request failed: {0}")]
    Request(String),

    #[error("malformed weather response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("weather response has no condition entries")]
    Empty,
}

/// Fetches a raw weather API body for a location.
///
/// Network access lives outside this crate; hosts implement this over
/// whatever HTTP client they have.
pub trait WeatherProvider {
    fn fetch(&self, latitude: f64, longitude: f64) -> Result<String, ProviderError>;
}

/// Any of the ways weather can arrive.
#[derive(Clone, Debug, PartialEq)]
pub enum WeatherInput {
    /// A manual override such as `"rain"`.
    Name { name: String, is_daytime: bool },
    /// An OpenWeatherMap-shaped JSON body.
    Report(String),
    /// The lookup failed or was never possible.
    Unavailable,
}

impl WeatherInput {
    /// Normalize to a classification and time of day. Never fails: anything
    /// unusable becomes clear daytime weather.
    pub fn normalize(&self) -> WeatherState {
        match self {
            WeatherInput::Name { name, is_daytime } => {
                let classification = Classification::parse(name);
                if classification == Classification::Unknown {
                    tracing::warn!(name = %name, "Unrecognized weather name, using clear");
                }
                WeatherState {
                    classification,
                    is_daytime: *is_daytime,
                }
            }
            WeatherInput::Report(body) => match WeatherReport::parse(body) {
                Ok(report) => report.state(),
                Err(e) => {
                    tracing::warn!("Falling back to clear weather: {e}");
                    WeatherState::default()
                }
            },
            WeatherInput::Unavailable => {
                tracing::warn!("Weather unavailable, using clear");
                WeatherState::default()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// API response
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct WeatherReport {
    pub weather: Vec<Condition>,
    #[serde(default)]
    pub sys: Option<SunTimes>,
    /// Observation time, Unix seconds.
    #[serde(default)]
    pub dt: Option<i64>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Condition {
    pub main: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SunTimes {
    pub sunrise: i64,
    pub sunset: i64,
}

impl WeatherReport {
    pub fn parse(body: &str) -> Result<Self, ProviderError> {
        let report: WeatherReport = serde_json::from_str(body)?;
        if report.weather.is_empty() {
            return Err(ProviderError::Empty);
        }
        Ok(report)
    }

    /// The first condition's classification, and whether the observation
    /// falls between sunrise and sunset. Missing sun times count as daytime.
    pub fn state(&self) -> WeatherState {
        let classification = self
            .weather
            .first()
            .map(|c| Classification::parse(&c.main))
            .unwrap_or_default();
        let is_daytime = match (&self.sys, self.dt) {
            (Some(sun), Some(dt)) => dt >= sun.sunrise && dt < sun.sunset,
            _ => true,
        };
        WeatherState {
            classification,
            is_daytime,
        }
    }
}

/// Ask `provider` for the weather at a location, falling back to clear
/// daytime weather on any failure or when there is no provider at all.
pub fn resolve_weather(
    provider: Option<&dyn WeatherProvider>,
    latitude: f64,
    longitude: f64,
) -> WeatherState {
    let Some(provider) = provider else {
        return WeatherInput::Unavailable.normalize();
    };
    match provider.fetch(latitude, longitude) {
        Ok(body) => WeatherInput::Report(body).normalize(),
        Err(e) => {
            tracing::warn!("Weather lookup failed: {e}");
            WeatherState::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Canned(Result<&'static str, &'static str>);

    impl WeatherProvider for Canned {
        fn fetch(&self, _lat: f64, _lon: f64) -> Result<String, ProviderError> {
            self.0
                .map(str::to_string)
                .map_err(|e| ProviderError::Request(e.to_string()))
        }
    }

    const STORM_AT_NIGHT: &str = r#"{
        "weather": [{"main": "Thunderstorm", "description": "heavy thunderstorm"}],
        "sys": {"sunrise": 1000, "sunset": 2000},
        "dt": 2500
    }"#;

    #[test]
    fn test_report_normalizes() {
        let state = WeatherInput::Report(STORM_AT_NIGHT.into()).normalize();
        assert_eq!(state.classification, Classification::Thunderstorm);
        assert!(!state.is_daytime);
    }

    #[test]
    fn test_report_without_sun_times_is_day() {
        let state = WeatherInput::Report(r#"{"weather":[{"main":"Mist"}]}"#.into()).normalize();
        assert_eq!(state.classification, Classification::Fog);
        assert!(state.is_daytime);
    }

    #[test]
    fn test_malformed_report_is_clear() {
        for body in ["", "not json", r#"{"weather":[]}"#, r#"{"main":"Rain"}"#] {
            assert_eq!(WeatherInput::Report(body.into()).normalize(), WeatherState::default());
        }
    }

    #[test]
    fn test_empty_conditions_error() {
        assert!(matches!(
            WeatherReport::parse(r#"{"weather":[]}"#),
            Err(ProviderError::Empty)
        ));
    }

    #[test]
    fn test_override_name() {
        let state = WeatherInput::Name {
            name: "Snow".into(),
            is_daytime: false,
        }
        .normalize();
        assert_eq!(state.classification, Classification::Snow);
        assert!(!state.is_daytime);
    }

    #[test]
    fn test_resolve_falls_back() {
        assert_eq!(resolve_weather(None, 0.0, 0.0), WeatherState::default());
        let failing = Canned(Err("timeout"));
        assert_eq!(resolve_weather(Some(&failing), 1.0, 2.0), WeatherState::default());
        let ok = Canned(Ok(STORM_AT_NIGHT));
        assert_eq!(
            resolve_weather(Some(&ok), 1.0, 2.0).classification,
            Classification::Thunderstorm
        );
    }
}
