//! OS directory resolution.
//!
//! Config lives in the platform config directory, the rock profile store and
//! other persistent data in the data directory, logs next to the config.

use std::path::{Path, PathBuf};

const APP_NAME: &str = "cairn";
const STORE_FILE: &str = "storage.json";

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("could not determine OS configuration directory")]
    NoConfigDir,

    #[error("platform I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Platform-appropriate paths for the viewer (XDG on Linux, Known Folders on
/// Windows, Library on macOS).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlatformDirs {
    /// `config.ron`.
    pub config_dir: PathBuf,
    /// The key-value store holding the saved rock profile.
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl PlatformDirs {
    /// Resolve without touching the filesystem.
    pub fn resolve() -> Result<Self, PlatformError> {
        let app_config = dirs::config_dir()
            .ok_or(PlatformError::NoConfigDir)?
            .join(APP_NAME);
        let data_dir = dirs::data_dir()
            .map(|d| d.join(APP_NAME))
            .unwrap_or_else(|| app_config.join("data"));
        Ok(Self {
            config_dir: app_config.clone(),
            data_dir,
            log_dir: app_config.join("logs"),
        })
    }

    /// Resolve everything under `root`, for tests and portable installs.
    pub fn resolve_with_root(root: &Path) -> Self {
        let app_dir = root.join(APP_NAME);
        Self {
            config_dir: app_dir.join("config"),
            data_dir: app_dir.join("data"),
            log_dir: app_dir.join("logs"),
        }
    }

    /// Create every directory.
    pub fn create_dirs(&self) -> Result<(), PlatformError> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        Ok(())
    }

    /// File backing the rock profile store.
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join(STORE_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_with_root_layout() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = PlatformDirs::resolve_with_root(tmp.path());
        assert!(dirs.config_dir.starts_with(tmp.path()));
        assert_eq!(dirs.store_path().file_name().unwrap(), "storage.json");
        assert!(dirs.store_path().starts_with(&dirs.data_dir));
    }

    #[test]
    fn test_create_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = PlatformDirs::resolve_with_root(tmp.path());
        dirs.create_dirs().unwrap();
        assert!(dirs.config_dir.is_dir());
        assert!(dirs.data_dir.is_dir());
        assert!(dirs.log_dir.is_dir());
    }
}
