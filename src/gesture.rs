//! Pointer and wheel input mapped onto the active layer's transform.

pub(crate) mod interpreter;
pub(crate) mod pointer;
