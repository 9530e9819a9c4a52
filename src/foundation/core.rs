use std::sync::Arc;

pub use kurbo::{Affine, Point, Rect, Size, Vec2};

use crate::foundation::error::{TryOnError, TryOnResult};

/// Output surface dimensions in device pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Build a canvas from explicit dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of bytes of a tightly packed RGBA8 buffer with these dimensions.
    pub fn rgba_len(self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4)
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Opaque color from straight RGB components.
    pub fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    /// Parse `#rrggbb` or `#rrggbbaa` (straight alpha) into a premultiplied color.
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#')?;
        let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Self::opaque(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self::from_straight_rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }

    /// Channel array in `[r, g, b, a]` order.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// One premultiplied RGBA8 video frame, tightly packed and row-major.
///
/// Pixel storage is shared, so cloning a frame is cheap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoFrame {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8 bytes.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl VideoFrame {
    /// Wrap premultiplied pixels, checking the buffer length against the dimensions.
    pub fn new(width: u32, height: u32, rgba8_premul: Vec<u8>) -> TryOnResult<Self> {
        if width == 0 || height == 0 {
            return Err(TryOnError::validation("video frame dimensions must be non-zero"));
        }
        let expected = Canvas::new(width, height).rgba_len();
        if rgba8_premul.len() != expected {
            return Err(TryOnError::validation(format!(
                "video frame byte length mismatch: got {}, expected {expected}",
                rgba8_premul.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    /// A frame filled with a single color.
    pub fn solid(width: u32, height: u32, color: Rgba8Premul) -> TryOnResult<Self> {
        let px = color.to_array();
        let n = (width as usize).saturating_mul(height as usize);
        let mut data = Vec::with_capacity(n.saturating_mul(4));
        for _ in 0..n {
            data.extend_from_slice(&px);
        }
        Self::new(width, height, data)
    }

    /// Frame dimensions as a [`Canvas`].
    pub fn size(&self) -> Canvas {
        Canvas::new(self.width, self.height)
    }

    /// Pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.rgba8_premul.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
