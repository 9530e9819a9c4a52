//! Face tracking: landmark layout, anchor poses, temporal smoothing and the per-tick tracker.

pub(crate) mod anchor;
pub(crate) mod face_tracker;
pub(crate) mod landmarks;
pub(crate) mod smoother;
