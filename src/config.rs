//! Engine configuration.
//!
//! Every knob has a default matching the behavior described in the crate docs, so an empty JSON
//! object (`{}`) is a valid configuration.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{TryOnError, TryOnResult};
use crate::transform::model::{IDENTITY_OPACITY, ScaleRange};

/// Top-level configuration for a [`crate::TryOnStudio`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Bounds for every layer scale.
    pub scale_range: ScaleRange,
    /// Opacity of newly added layers.
    pub default_opacity: f64,
    /// Temporal smoothing factor `t` in `(0, 1]`; lower is smoother but laggier.
    pub smoothing_factor: f64,
    /// Glasses width as a multiple of face width.
    pub glasses_width_factor: f64,
    /// Earring width as a multiple of face width.
    pub earring_width_factor: f64,
    /// Run face detection every N ticks (1 = every tick).
    pub detect_interval: u32,
    /// Mirror the camera feed horizontally.
    pub mirror: bool,
    /// Camera-off placeholder pattern.
    pub checker: CheckerConfig,
    /// Preferred capture resolution.
    pub camera: CameraConfig,
    /// Wheel gesture mapping.
    pub wheel: WheelConfig,
    /// Geometry drawn for selected overlays whose image is not loaded.
    pub placeholder: PlaceholderConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scale_range: ScaleRange::default(),
            default_opacity: IDENTITY_OPACITY,
            smoothing_factor: 0.22,
            glasses_width_factor: 1.6,
            earring_width_factor: 0.6,
            detect_interval: 1,
            mirror: true,
            checker: CheckerConfig::default(),
            camera: CameraConfig::default(),
            wheel: WheelConfig::default(),
            placeholder: PlaceholderConfig::default(),
        }
    }
}

/// Checkerboard drawn when no live frame is available.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    /// Side of one square in device pixels.
    pub block_px: u32,
    /// Color of even squares (`#rrggbb`).
    pub dark: String,
    /// Color of odd squares (`#rrggbb`).
    pub light: String,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            block_px: 20,
            dark: "#111827".to_string(),
            light: "#0b1220".to_string(),
        }
    }
}

impl CheckerConfig {
    /// Parsed `(even, odd)` square colors.
    pub fn colors(&self) -> TryOnResult<(Rgba8Premul, Rgba8Premul)> {
        Ok((parse_color(&self.dark)?, parse_color(&self.light)?))
    }
}

/// Preferred capture constraints sent to the camera device.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Ideal frame width.
    pub ideal_width: u32,
    /// Ideal frame height.
    pub ideal_height: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            ideal_width: 1280,
            ideal_height: 720,
        }
    }
}

/// Wheel-to-transform mapping.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct WheelConfig {
    /// Scale multiplier per notch when scrolling up.
    pub zoom_in_factor: f64,
    /// Scale multiplier per notch when scrolling down.
    pub zoom_out_factor: f64,
    /// Radians per unit of wheel delta when a rotate modifier is held.
    pub rotate_rad_per_unit: f64,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            zoom_in_factor: 1.05,
            zoom_out_factor: 0.95,
            rotate_rad_per_unit: std::f64::consts::PI / 1800.0,
        }
    }
}

/// Outline drawn in place of an overlay that has not loaded.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PlaceholderConfig {
    /// Outline color (`#rrggbb` or `#rrggbbaa`).
    pub color: String,
    /// Side of the square frame for manually placed overlays, before scaling.
    pub size_px: f64,
    /// Stroke width in pixels, before scaling.
    pub line_px: f64,
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            color: "#e5e7eb".to_string(),
            size_px: 160.0,
            line_px: 4.0,
        }
    }
}

impl PlaceholderConfig {
    /// Parsed outline color.
    pub fn rgba(&self) -> TryOnResult<Rgba8Premul> {
        parse_color(&self.color)
    }
}

fn parse_color(s: &str) -> TryOnResult<Rgba8Premul> {
    Rgba8Premul::from_hex(s)
        .ok_or_else(|| TryOnError::validation(format!("invalid color '{s}', expected #rrggbb")))
}

impl EngineConfig {
    /// Parse a configuration from a JSON reader and validate it.
    pub fn from_reader<R: std::io::Read>(r: R) -> TryOnResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| TryOnError::serde(format!("parse engine config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a configuration from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> TryOnResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            TryOnError::validation(format!("open engine config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> TryOnResult<()> {
        if !self.scale_range.is_valid() {
            return Err(TryOnError::validation(
                "scale_range must satisfy 0 < min <= max",
            ));
        }
        if !(0.0..=1.0).contains(&self.default_opacity) {
            return Err(TryOnError::validation("default_opacity must be in [0, 1]"));
        }
        if !(self.smoothing_factor > 0.0 && self.smoothing_factor <= 1.0) {
            return Err(TryOnError::validation(
                "smoothing_factor must be in (0, 1]",
            ));
        }
        if !(self.glasses_width_factor > 0.0 && self.earring_width_factor > 0.0) {
            return Err(TryOnError::validation("width factors must be > 0"));
        }
        if self.detect_interval == 0 {
            return Err(TryOnError::validation("detect_interval must be >= 1"));
        }
        if self.checker.block_px == 0 {
            return Err(TryOnError::validation("checker.block_px must be > 0"));
        }
        self.checker.colors()?;
        self.placeholder.rgba()?;
        let w = self.wheel;
        if !(w.zoom_in_factor > 0.0 && w.zoom_out_factor > 0.0) {
            return Err(TryOnError::validation("wheel zoom factors must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
