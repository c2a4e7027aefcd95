//! The five-slider rock shape description.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Smallest legal slider value.
pub const PARAM_MIN: u8 = 1;
/// Largest legal slider value.
pub const PARAM_MAX: u8 = 100;

/// User-facing rock shape controls, each an integer in `[1, 100]`.
///
/// Every constructor and setter clamps, so an instance can never hold an
/// out-of-range value. Deserialization goes through the same clamp.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawShape")]
pub struct RockShapeParameters {
    size: u8,
    x_scale: u8,
    y_scale: u8,
    smoothness: u8,
    surface_detail: u8,
}

/// Names of the individual sliders, matching the persisted JSON keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeParam {
    Size,
    XScale,
    YScale,
    Smoothness,
    SurfaceDetail,
}

impl ShapeParam {
    pub const ALL: [ShapeParam; 5] = [
        ShapeParam::Size,
        ShapeParam::XScale,
        ShapeParam::YScale,
        ShapeParam::Smoothness,
        ShapeParam::SurfaceDetail,
    ];

    /// Control identifier (`size`, `xScale`, ...).
    pub fn key(self) -> &'static str {
        match self {
            ShapeParam::Size => "size",
            ShapeParam::XScale => "xScale",
            ShapeParam::YScale => "yScale",
            ShapeParam::Smoothness => "smoothness",
            ShapeParam::SurfaceDetail => "surfaceDetail",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.key() == key)
    }
}

/// Slider values mapped to the physical quantities the generator uses.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaledShape {
    /// Base radius, `0.5..=3.0`.
    pub size: f64,
    /// X-axis stretch, `0.3..=2.0`.
    pub x_scale: f64,
    /// Y-axis stretch, `0.3..=2.0`.
    pub y_scale: f64,
    /// `0..=1`, 1 is perfectly smooth.
    pub smoothness: f64,
    /// `0..=1`, weight of the mid and fine octaves.
    pub detail: f64,
}

impl ScaledShape {
    /// `1 - smoothness`.
    pub fn jaggedness(&self) -> f64 {
        1.0 - self.smoothness
    }
}

#[inline]
fn clamp_param(v: i64) -> u8 {
    v.clamp(PARAM_MIN as i64, PARAM_MAX as i64) as u8
}

impl RockShapeParameters {
    /// Build a parameter set, clamping every field into `[1, 100]`.
    pub fn new(size: i64, x_scale: i64, y_scale: i64, smoothness: i64, surface_detail: i64) -> Self {
        Self {
            size: clamp_param(size),
            x_scale: clamp_param(x_scale),
            y_scale: clamp_param(y_scale),
            smoothness: clamp_param(smoothness),
            surface_detail: clamp_param(surface_detail),
        }
    }

    pub fn get(&self, param: ShapeParam) -> u8 {
        match param {
            ShapeParam::Size => self.size,
            ShapeParam::XScale => self.x_scale,
            ShapeParam::YScale => self.y_scale,
            ShapeParam::Smoothness => self.smoothness,
            ShapeParam::SurfaceDetail => self.surface_detail,
        }
    }

    /// Set one slider, clamping into range. Returns the stored value.
    pub fn set(&mut self, param: ShapeParam, value: i64) -> u8 {
        let v = clamp_param(value);
        match param {
            ShapeParam::Size => self.size = v,
            ShapeParam::XScale => self.x_scale = v,
            ShapeParam::YScale => self.y_scale = v,
            ShapeParam::Smoothness => self.smoothness = v,
            ShapeParam::SurfaceDetail => self.surface_detail = v,
        }
        v
    }

    /// Set one slider from free text. Text that is not an integer stores 1.
    pub fn set_from_text(&mut self, param: ShapeParam, text: &str) -> u8 {
        let value = text.trim().parse::<i64>().unwrap_or(PARAM_MIN as i64);
        self.set(param, value)
    }

    /// Draw every slider uniformly from `[1, 100]`.
    pub fn random(rng: &mut impl Rng) -> Self {
        let mut draw = || rng.random_range(PARAM_MIN as i64..=PARAM_MAX as i64);
        Self::new(draw(), draw(), draw(), draw(), draw())
    }

    pub fn size(&self) -> u8 {
        self.size
    }

    pub fn x_scale(&self) -> u8 {
        self.x_scale
    }

    pub fn y_scale(&self) -> u8 {
        self.y_scale
    }

    pub fn smoothness(&self) -> u8 {
        self.smoothness
    }

    pub fn surface_detail(&self) -> u8 {
        self.surface_detail
    }

    /// Map slider values to generator quantities.
    pub fn scaled(&self) -> ScaledShape {
        let unit = |v: u8| v as f64 / 100.0;
        ScaledShape {
            size: unit(self.size) * 2.5 + 0.5,
            x_scale: unit(self.x_scale) * 1.7 + 0.3,
            y_scale: unit(self.y_scale) * 1.7 + 0.3,
            smoothness: unit(self.smoothness),
            detail: unit(self.surface_detail),
        }
    }
}

impl Default for RockShapeParameters {
    fn default() -> Self {
        Self::new(50, 50, 50, 80, 50)
    }
}

/// Wire form accepting any integer so out-of-range stored values clamp
/// instead of failing to parse.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawShape {
    size: i64,
    x_scale: i64,
    y_scale: i64,
    smoothness: i64,
    surface_detail: i64,
}

impl Default for RawShape {
    fn default() -> Self {
        let d = RockShapeParameters::default();
        Self {
            size: d.size as i64,
            x_scale: d.x_scale as i64,
            y_scale: d.y_scale as i64,
            smoothness: d.smoothness as i64,
            surface_detail: d.surface_detail as i64,
        }
    }
}

impl From<RawShape> for RockShapeParameters {
    fn from(raw: RawShape) -> Self {
        Self::new(raw.size, raw.x_scale, raw.y_scale, raw.smoothness, raw.surface_detail)
    }
}
