use std::sync::Arc;

use anyhow::Context;

use crate::foundation::core::{Size, VideoFrame};
use crate::foundation::error::{TryOnError, TryOnResult};
use crate::foundation::math::premultiply_rgba8_in_place;

/// Decoded overlay image, premultiplied RGBA8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8 bytes, tightly packed.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    /// Natural size in pixels.
    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    /// View the image as a video frame sharing the same pixels.
    pub fn to_video_frame(&self) -> VideoFrame {
        VideoFrame {
            width: self.width,
            height: self.height,
            rgba8_premul: Arc::clone(&self.rgba8_premul),
        }
    }
}

/// Decode PNG/JPEG/WebP (anything `image` recognizes) into premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> TryOnResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(TryOnError::validation("decoded image has zero size"));
    }

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}
