//! Overlay images: decoding and request-keyed loading.

pub(crate) mod decode;
pub(crate) mod loader;
