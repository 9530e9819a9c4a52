//! Host-facing session: camera lifecycle and the studio that wires every component together.

pub(crate) mod camera;
pub(crate) mod studio;
