use std::collections::HashMap;
use std::sync::Arc;

use crate::assets::decode::PreparedImage;
use crate::foundation::core::{Affine, Canvas, Rect, Rgba8Premul};
use crate::foundation::error::{TryOnError, TryOnResult};
use crate::render::composite::over_in_place;
use crate::render::surface::Surface;

/// Anti-aliased overlay drawing on top of a [`Surface`], backed by `vello_cpu`.
///
/// Draw calls between [`OverlayPainter::begin`] and [`OverlayPainter::finish`] are recorded into
/// one context, rasterized once, then composited source-over onto the surface.
#[derive(Default)]
pub struct OverlayPainter {
    ctx: Option<vello_cpu::RenderContext>,
    pixmap: Option<vello_cpu::Pixmap>,
    paints: HashMap<usize, CachedPaint>,
    used: Vec<usize>,
    draws: usize,
}

/// Paint for one image. Holding the pixel buffer keeps its address from being reused while the
/// entry is cached.
struct CachedPaint {
    pixels: Arc<Vec<u8>>,
    paint: vello_cpu::Image,
}

impl std::fmt::Debug for OverlayPainter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayPainter")
            .field("cached_paints", &self.paints.len())
            .field("draws", &self.draws)
            .finish()
    }
}

fn dims_u16(canvas: Canvas) -> TryOnResult<(u16, u16)> {
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| TryOnError::render("surface width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| TryOnError::render("surface height exceeds u16"))?;
    Ok((w, h))
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn pixmap_from_premul_bytes(bytes: &[u8], width: u32, height: u32) -> TryOnResult<vello_cpu::Pixmap> {
    let (w, h) = dims_u16(Canvas::new(width, height))?;
    if bytes.len() != Canvas::new(width, height).rgba_len() {
        return Err(TryOnError::render("pixmap byte len mismatch"));
    }
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

impl OverlayPainter {
    /// Fresh painter with no cached image paints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a frame for a surface of size `canvas`.
    pub fn begin(&mut self, canvas: Canvas) -> TryOnResult<()> {
        let (w, h) = dims_u16(canvas)?;
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == w && ctx.height() == h => ctx,
            _ => vello_cpu::RenderContext::new(w, h),
        };
        ctx.reset();
        self.ctx = Some(ctx);
        self.used.clear();
        self.draws = 0;
        Ok(())
    }

    fn ctx_mut(&mut self) -> TryOnResult<&mut vello_cpu::RenderContext> {
        self.ctx
            .as_mut()
            .ok_or_else(|| TryOnError::render("overlay painter used outside begin/finish"))
    }

    fn image_paint(&mut self, img: &PreparedImage) -> TryOnResult<vello_cpu::Image> {
        let key = Arc::as_ptr(&img.rgba8_premul) as usize;
        if !self.used.contains(&key) {
            self.used.push(key);
        }
        if let Some(cached) = self.paints.get(&key)
            && Arc::ptr_eq(&cached.pixels, &img.rgba8_premul)
        {
            return Ok(cached.paint.clone());
        }
        let pixmap = pixmap_from_premul_bytes(&img.rgba8_premul, img.width, img.height)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        self.paints.insert(
            key,
            CachedPaint {
                pixels: Arc::clone(&img.rgba8_premul),
                paint: paint.clone(),
            },
        );
        Ok(paint)
    }

    /// Draw `img` with `transform` mapping image pixels to surface pixels.
    pub fn draw_image(&mut self, img: &PreparedImage, transform: Affine, opacity: f64) -> TryOnResult<()> {
        let opacity = opacity.clamp(0.0, 1.0) as f32;
        if opacity <= 0.0 {
            return Ok(());
        }
        let paint = self.image_paint(img)?;
        let rect = Rect::new(0.0, 0.0, f64::from(img.width), f64::from(img.height));
        let ctx = self.ctx_mut()?;
        ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(affine_to_cpu(transform));
        ctx.set_paint(paint);
        if opacity < 1.0 {
            ctx.push_opacity_layer(opacity);
        }
        ctx.fill_rect(&rect_to_cpu(rect));
        if opacity < 1.0 {
            ctx.pop_layer();
        }
        self.draws += 1;
        Ok(())
    }

    /// Fill local-space rectangles with one color under `transform`.
    pub fn fill_rects(
        &mut self,
        rects: &[Rect],
        transform: Affine,
        color: Rgba8Premul,
        opacity: f64,
    ) -> TryOnResult<()> {
        let opacity = opacity.clamp(0.0, 1.0) as f32;
        if opacity <= 0.0 || rects.is_empty() {
            return Ok(());
        }
        let ctx = self.ctx_mut()?;
        ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(affine_to_cpu(transform));
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        if opacity < 1.0 {
            ctx.push_opacity_layer(opacity);
        }
        for r in rects {
            ctx.fill_rect(&rect_to_cpu(*r));
        }
        if opacity < 1.0 {
            ctx.pop_layer();
        }
        self.draws += 1;
        Ok(())
    }

    /// Number of draw calls recorded since `begin`.
    pub fn draws(&self) -> usize {
        self.draws
    }

    /// Rasterize recorded draws and composite them onto `surface`.
    pub fn finish(&mut self, surface: &mut Surface) -> TryOnResult<()> {
        let used = std::mem::take(&mut self.used);
        self.paints.retain(|k, _| used.contains(k));
        self.used = used;
        if self.draws == 0 {
            return Ok(());
        }

        let (w, h) = dims_u16(surface.canvas())?;
        let mut pixmap = match self.pixmap.take() {
            Some(p) if p.width() == w && p.height() == h => p,
            _ => vello_cpu::Pixmap::new(w, h),
        };
        pixmap.data_as_u8_slice_mut().fill(0);

        let ctx = self.ctx_mut()?;
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);
        let out = over_in_place(surface.data_mut(), pixmap.data_as_u8_slice(), 1.0);
        self.pixmap = Some(pixmap);
        out
    }
}

/// Outline of `frame` drawn as four bars of width `line`, centered on the frame edges.
pub fn outline_rects(frame: Rect, line: f64) -> [Rect; 4] {
    let h = line / 2.0;
    [
        Rect::new(frame.x0 - h, frame.y0 - h, frame.x1 + h, frame.y0 + h),
        Rect::new(frame.x0 - h, frame.y1 - h, frame.x1 + h, frame.y1 + h),
        Rect::new(frame.x0 - h, frame.y0 + h, frame.x0 + h, frame.y1 - h),
        Rect::new(frame.x1 - h, frame.y0 + h, frame.x1 + h, frame.y1 - h),
    ]
}

/// Glasses-style placeholder centered on the origin: a `width × 0.35·width` frame plus a bridge
/// bar spanning `±0.08·width`.
pub fn glasses_placeholder_rects(width: f64, line: f64) -> [Rect; 5] {
    let h = width * 0.35;
    let frame = Rect::new(-width / 2.0, -h / 2.0, width / 2.0, h / 2.0);
    let [a, b, c, d] = outline_rects(frame, line);
    let bridge = Rect::new(-width * 0.08, -line / 2.0, width * 0.08, line / 2.0);
    [a, b, c, d, bridge]
}

#[cfg(test)]
#[path = "../../tests/unit/render/overlay.rs"]
mod tests;
