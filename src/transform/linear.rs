//! Linear interpolation helpers.

use crate::transform::model::Transform;

#[inline]
/// Interpolate `a -> b` by `t` without clamping `t`.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Field-wise linear interpolation; rotation is not wrapped.
pub fn lerp_transform(a: Transform, b: Transform, t: f64) -> Transform {
    Transform {
        x: lerp(a.x, b.x, t),
        y: lerp(a.y, b.y, t),
        z: lerp(a.z, b.z, t),
        scale: lerp(a.scale, b.scale, t),
        rotation: lerp(a.rotation, b.rotation, t),
        opacity: lerp(a.opacity, b.opacity, t),
    }
}
