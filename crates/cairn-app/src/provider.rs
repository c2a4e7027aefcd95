//! Weather provider backed by a saved API response.
//!
//! The network fetcher lives outside the viewer; it drops the raw response
//! body next to the profile store and the headless runner reads it from
//! there.

use std::path::{Path, PathBuf};

use cairn_weather::{ProviderError, WeatherProvider};

const REPORT_FILE: &str = "weather.json";

#[derive(Clone, Debug)]
pub struct FileWeatherProvider {
    path: PathBuf,
}

impl FileWeatherProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Provider reading `weather.json` in `data_dir`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(REPORT_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WeatherProvider for FileWeatherProvider {
    fn fetch(&self, latitude: f64, longitude: f64) -> Result<String, ProviderError> {
        tracing::debug!(latitude, longitude, path = %self.path.display(), "Reading weather report");
        let body = std::fs::read_to_string(&self.path)
            .map_err(|e| ProviderError::Request(format!("{}: {e}", self.path.display())))?;
        if body.trim().is_empty() {
            return Err(ProviderError::Empty);
        }
        Ok(body)
    }
}
