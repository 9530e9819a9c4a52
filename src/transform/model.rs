use crate::foundation::core::{Affine, Point, Vec2};
use crate::transform::non_linear::clamp01;

/// Opacity given to freshly placed overlays.
pub const IDENTITY_OPACITY: f64 = 0.95;

/// Inclusive scale bounds enforced at every mutation site.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScaleRange {
    /// Smallest allowed scale, must be > 0.
    pub min: f64,
    /// Largest allowed scale.
    pub max: f64,
}

impl Default for ScaleRange {
    fn default() -> Self {
        Self {
            min: 0.05,
            max: 10.0,
        }
    }
}

impl ScaleRange {
    /// Return `true` when `0 < min <= max` and both bounds are finite.
    pub fn is_valid(self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min > 0.0 && self.min <= self.max
    }

    /// Clamp `s` into `[min, max]`. NaN and negative inputs land on `min`; an inverted range
    /// yields `max`.
    pub fn clamp(self, s: f64) -> f64 {
        if s.is_nan() {
            return self.min;
        }
        s.max(self.min).min(self.max)
    }

    /// Return `true` when `s` lies inside the range.
    pub fn contains(self, s: f64) -> bool {
        s >= self.min && s <= self.max
    }
}

/// Clamp a scale value into the default [`ScaleRange`].
pub fn clamp_scale(s: f64) -> f64 {
    ScaleRange::default().clamp(s)
}

/// Clamp an opacity value into `[0, 1]`. NaN becomes fully transparent.
pub fn clamp_opacity(o: f64) -> f64 {
    if o.is_nan() { 0.0 } else { clamp01(o) }
}

/// 2D placement of one overlay.
///
/// `x`/`y` are pixel offsets from the overlay's anchor point, `rotation` is in radians (any
/// range), and `z` is a depth factor that multiplies the drawn scale by `1 + z`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Transform {
    /// Horizontal offset in device pixels.
    pub x: f64,
    /// Vertical offset in device pixels.
    pub y: f64,
    /// Depth factor.
    pub z: f64,
    /// Uniform scale multiplier.
    pub scale: f64,
    /// Rotation in radians.
    pub rotation: f64,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// The placement given to a freshly added overlay.
    pub const fn identity() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            scale: 1.0,
            rotation: 0.0,
            opacity: IDENTITY_OPACITY,
        }
    }

    /// Identity placement with a starting scale (clamped).
    pub fn with_scale(scale: f64, range: ScaleRange) -> Self {
        Self {
            scale: range.clamp(scale),
            ..Self::identity()
        }
    }

    /// Return a copy with `scale` and `opacity` forced into their valid ranges.
    pub fn clamped(self, range: ScaleRange) -> Self {
        Self {
            scale: range.clamp(self.scale),
            opacity: clamp_opacity(self.opacity),
            ..self
        }
    }

    /// Merge the fields present in `patch`; absent fields are left unchanged.
    pub fn apply_patch(self, patch: &TransformPatch, range: ScaleRange) -> Self {
        Self {
            x: patch.x.unwrap_or(self.x),
            y: patch.y.unwrap_or(self.y),
            z: patch.z.unwrap_or(self.z),
            scale: patch.scale.unwrap_or(self.scale),
            rotation: patch.rotation.unwrap_or(self.rotation),
            opacity: patch.opacity.unwrap_or(self.opacity),
        }
        .clamped(range)
    }

    /// Scale actually used for drawing once depth is applied.
    pub fn effective_scale(self, range: ScaleRange) -> f64 {
        range.clamp(self.scale * (1.0 + self.z))
    }

    /// Local-to-surface affine for an overlay anchored at `anchor`.
    ///
    /// Order: translate to `anchor + (x, y)`, then rotate, then scale.
    pub fn to_affine(self, anchor: Point, range: ScaleRange) -> Affine {
        let s = self.effective_scale(range);
        Affine::translate(anchor.to_vec2() + Vec2::new(self.x, self.y))
            * Affine::rotate(self.rotation)
            * Affine::scale(s)
    }
}

/// Partial update for [`Transform`]; `None` fields are left untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TransformPatch {
    /// New horizontal offset.
    pub x: Option<f64>,
    /// New vertical offset.
    pub y: Option<f64>,
    /// New depth factor.
    pub z: Option<f64>,
    /// New scale (clamped on apply).
    pub scale: Option<f64>,
    /// New rotation in radians.
    pub rotation: Option<f64>,
    /// New opacity (clamped on apply).
    pub opacity: Option<f64>,
}

impl TransformPatch {
    /// Patch that only moves the overlay.
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    /// Patch that only changes scale.
    pub fn scale(s: f64) -> Self {
        Self {
            scale: Some(s),
            ..Self::default()
        }
    }

    /// Patch that only changes rotation.
    pub fn rotation(r: f64) -> Self {
        Self {
            rotation: Some(r),
            ..Self::default()
        }
    }

    /// Patch that only changes opacity.
    pub fn opacity(o: f64) -> Self {
        Self {
            opacity: Some(o),
            ..Self::default()
        }
    }

    /// Return `true` if no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Caller-controlled fields. A present field always wins over the tracked value.
pub type TransformOverrides = TransformPatch;

/// Combine internally tracked state with externally controlled fields.
///
/// Controlled fields replace the base value outright; the result is clamped.
pub fn compose(base: Transform, overrides: &TransformOverrides, range: ScaleRange) -> Transform {
    base.apply_patch(overrides, range)
}

#[cfg(test)]
#[path = "../../tests/unit/transform/model.rs"]
mod tests;
