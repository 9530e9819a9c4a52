use std::io::Cursor;

use anyhow::Context;
use tracing::debug;

use crate::foundation::core::{Canvas, Size};
use crate::foundation::error::{TryOnError, TryOnResult};
use crate::foundation::math::unpremultiply_rgba8_in_place;
use crate::gesture::pointer::backing_size;

/// A rendered frame in RGBA8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Encode as PNG (straight alpha).
    pub fn encode_png(&self) -> TryOnResult<Vec<u8>> {
        let mut straight = self.data.clone();
        if self.premultiplied {
            unpremultiply_rgba8_in_place(&mut straight);
        }
        let img = image::RgbaImage::from_raw(self.width, self.height, straight)
            .ok_or_else(|| TryOnError::render("frame byte length does not match its size"))?;
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .context("encode png")?;
        Ok(buf)
    }
}

/// Device-pixel backing buffer the render loop draws into, premultiplied RGBA8.
#[derive(Clone, Debug)]
pub struct Surface {
    canvas: Canvas,
    rgba8_premul: Vec<u8>,
}

impl Surface {
    /// Transparent surface of the given size.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            rgba8_premul: vec![0; canvas.rgba_len()],
        }
    }

    /// Reallocate for a new size; returns `false` when the size is unchanged.
    pub fn resize(&mut self, canvas: Canvas) -> bool {
        if canvas == self.canvas {
            return false;
        }
        self.canvas = canvas;
        self.rgba8_premul = vec![0; canvas.rgba_len()];
        true
    }

    /// Fill with transparent black.
    pub fn clear(&mut self) {
        self.rgba8_premul.fill(0);
    }

    /// Pixel dimensions.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Pixel dimensions as floating-point size.
    pub fn size(&self) -> Size {
        Size::new(f64::from(self.canvas.width), f64::from(self.canvas.height))
    }

    #[cfg(test)]
    pub fn data(&self) -> &[u8] {
        &self.rgba8_premul
    }

    /// Mutable premultiplied pixel bytes.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.rgba8_premul
    }

    /// Copy out the current contents.
    pub fn snapshot(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: self.rgba8_premul.clone(),
            premultiplied: true,
        }
    }
}

/// Tracks the host container size and reports a new backing size only when it changes.
#[derive(Clone, Debug, Default)]
pub struct SurfaceSizer {
    last: Option<Canvas>,
}

impl SurfaceSizer {
    /// Observe the container's client size and raw device pixel ratio.
    pub fn observe(&mut self, client_width: f64, client_height: f64, raw_dpr: f64) -> Option<Canvas> {
        let canvas = backing_size(client_width, client_height, raw_dpr);
        if self.last == Some(canvas) {
            return None;
        }
        debug!(width = canvas.width, height = canvas.height, "surface resized");
        self.last = Some(canvas);
        Some(canvas)
    }

    /// Last reported size.
    pub fn current(&self) -> Option<Canvas> {
        self.last
    }
}
