//! Non-linear scalar utilities.

#[inline]
/// Clamp scalar value to normalized range `[0, 1]`.
pub fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

/// Signed shortest angular difference `to - from` in degrees, in `[-180, 180)`.
pub fn shortest_degrees(from: f64, to: f64) -> f64 {
    (to - from + 540.0).rem_euclid(360.0) - 180.0
}

/// Wrap degrees into `(-180, 180]`.
pub fn normalize_degrees(a: f64) -> f64 {
    let r = a.rem_euclid(360.0);
    if r > 180.0 { r - 360.0 } else { r }
}
