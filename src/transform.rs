//! Placement model for overlays: a 2D transform value type and its pure arithmetic.

pub(crate) mod linear;
pub(crate) mod model;
pub(crate) mod non_linear;
