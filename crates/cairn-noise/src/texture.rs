//! Procedural RGBA textures: the shared rock normal map and the snowflake sprite.

use std::path::Path;
use std::sync::{Arc, LazyLock};

use glam::Vec2;
use image::{Rgba, RgbaImage};

use crate::{NoiseField, SinusoidField};

/// Edge length of the shared rock normal map in texels.
pub const NORMAL_MAP_SIZE: u32 = 256;

/// Frequency applied to normalized texel coordinates when baking the normal map.
const NORMAL_MAP_FREQUENCY: f64 = 8.0;

static NORMAL_MAP: LazyLock<Arc<Texture>> = LazyLock::new(|| {
    tracing::debug!("Baking shared {NORMAL_MAP_SIZE}x{NORMAL_MAP_SIZE} rock normal map");
    Arc::new(bake_normal_map(&SinusoidField::default(), NORMAL_MAP_SIZE))
});

/// Errors raised when exporting a texture.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    /// Encoding or writing the image failed.
    #[error("failed to write texture: {0}")]
    Write(#[from] image::ImageError),
}

/// A square RGBA8 texture held on the CPU.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    image: RgbaImage,
}

impl Texture {
    /// Create a fully transparent texture.
    pub fn new(size: u32) -> Self {
        Self {
            image: RgbaImage::new(size, size),
        }
    }

    /// Edge length in texels.
    pub fn size(&self) -> u32 {
        self.image.width()
    }

    /// RGBA value at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is outside the texture.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.image.get_pixel(x, y).0
    }

    /// Raw texel bytes in row-major RGBA order, ready for upload.
    pub fn as_bytes(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Texels reinterpreted as packed `[u8; 4]` values.
    pub fn texels(&self) -> &[[u8; 4]] {
        bytemuck::cast_slice(self.image.as_raw())
    }

    /// Encode the texture as PNG at `path`.
    pub fn save_png(&self, path: &Path) -> Result<(), TextureError> {
        self.image.save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }
}

/// Bake a tangent-space normal map from `field`.
///
/// Each texel's red and green channels carry `128 + n * 127` where `n` is the
/// field remapped to `[0, 1]`; blue is always 255 so the normal leans outward.
pub fn bake_normal_map(field: &impl NoiseField, size: u32) -> Texture {
    let mut texture = Texture::new(size);
    let inv = 1.0 / size as f64;
    for (x, y, px) in texture.image.enumerate_pixels_mut() {
        let nx = x as f64 * inv - 0.5;
        let ny = y as f64 * inv - 0.5;
        let n = field.sample(nx * NORMAL_MAP_FREQUENCY, ny * NORMAL_MAP_FREQUENCY, 0.0) * 0.5 + 0.5;
        let shade = (128.0 + n * 127.0).floor() as u8;
        *px = Rgba([shade, shade, 255, 255]);
    }
    texture
}

/// The normal map shared by every rock material. Baked on first use.
pub fn shared_normal_map() -> Arc<Texture> {
    Arc::clone(&NORMAL_MAP)
}

/// Bake a six-armed star sprite used for 3D snow points.
///
/// Arms run from the center to `size / 2 - 2` texels out, two texels wide,
/// white on a transparent background.
pub fn bake_snowflake_sprite(size: u32) -> Texture {
    let mut texture = Texture::new(size);
    let center = Vec2::splat(size as f32 / 2.0);
    let arm_len = size as f32 / 2.0 - 2.0;
    let arms: Vec<Vec2> = (1..=6)
        .map(|i| {
            let angle = i as f32 * std::f32::consts::FRAC_PI_3;
            // Canvas rotation starts from +y.
            Vec2::new(-angle.sin(), angle.cos()) * arm_len
        })
        .collect();

    for (x, y, px) in texture.image.enumerate_pixels_mut() {
        let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - center;
        let on_arm = arms.iter().any(|&arm| distance_to_segment(p, arm) <= 1.0);
        if on_arm {
            *px = Rgba([255, 255, 255, 255]);
        }
    }
    texture
}

fn distance_to_segment(p: Vec2, end: Vec2) -> f32 {
    let t = (p.dot(end) / end.length_squared()).clamp(0.0, 1.0);
    (p - end * t).length()
}
