//! Fatal setup errors for the binary.

use cairn_config::ConfigError;
use cairn_noise::TextureError;

use crate::platform::PlatformError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to export normal map: {0}")]
    Texture(#[from] TextureError),
}
