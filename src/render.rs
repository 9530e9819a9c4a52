//! Per-frame compositing: background, face-locked and manual overlays, PNG capture.

pub(crate) mod background;
pub(crate) mod composite;
pub(crate) mod frame_loop;
pub(crate) mod overlay;
pub(crate) mod surface;
