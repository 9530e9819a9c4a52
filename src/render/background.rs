use crate::foundation::core::{Rect, Rgba8Premul, Size, VideoFrame};
use crate::render::surface::Surface;

/// Destination rectangle that fills `canvas` with `video` while keeping its aspect ratio.
///
/// The excess is split evenly on both sides, so the rectangle may start at a negative offset.
pub fn cover_fit(video: Size, canvas: Size) -> Rect {
    if video.width <= 0.0 || video.height <= 0.0 || canvas.height <= 0.0 {
        return Rect::from_origin_size((0.0, 0.0), canvas);
    }
    let v_ratio = video.width / video.height;
    let c_ratio = canvas.width / canvas.height;
    if v_ratio > c_ratio {
        let dh = canvas.height;
        let dw = dh * v_ratio;
        let dx = (canvas.width - dw) / 2.0;
        Rect::new(dx, 0.0, dx + dw, dh)
    } else {
        let dw = canvas.width;
        let dh = dw / v_ratio;
        let dy = (canvas.height - dh) / 2.0;
        Rect::new(0.0, dy, dw, dy + dh)
    }
}

/// Draw `frame` cover-fitted into the whole surface with nearest-neighbour sampling at pixel
/// centers. With `mirror`, output column `c` shows what column `W - 1 - c` shows unmirrored.
pub fn draw_video_cover(surface: &mut Surface, frame: &VideoFrame, mirror: bool) -> Rect {
    let size = surface.size();
    let dst = cover_fit(
        Size::new(f64::from(frame.width), f64::from(frame.height)),
        size,
    );
    let canvas = surface.canvas();
    let (cw, ch) = (canvas.width as usize, canvas.height as usize);
    let (fw, fh) = (frame.width as usize, frame.height as usize);
    if cw == 0 || ch == 0 || fw == 0 || fh == 0 {
        return dst;
    }

    let sx = frame.width as f64 / dst.width();
    let sy = frame.height as f64 / dst.height();
    let src_col = |c: usize| -> usize {
        let x = c as f64 + 0.5;
        let x = if mirror { size.width - x } else { x };
        let u = ((x - dst.x0) * sx).floor();
        (u.max(0.0) as usize).min(fw - 1)
    };
    let cols: Vec<usize> = (0..cw).map(src_col).collect();

    let src = frame.rgba8_premul.as_slice();
    let out = surface.data_mut();
    for r in 0..ch {
        let v = (((r as f64 + 0.5) - dst.y0) * sy).floor();
        let sr = (v.max(0.0) as usize).min(fh - 1);
        let src_row = &src[sr * fw * 4..(sr + 1) * fw * 4];
        let dst_row = &mut out[r * cw * 4..(r + 1) * cw * 4];
        for (px, &sc) in dst_row.chunks_exact_mut(4).zip(&cols) {
            px.copy_from_slice(&src_row[sc * 4..sc * 4 + 4]);
        }
    }
    dst
}

/// Fill the surface with a checkerboard of `block`-pixel squares; the square at the origin is
/// `even`.
pub fn draw_checkerboard(surface: &mut Surface, block: u32, even: Rgba8Premul, odd: Rgba8Premul) {
    let block = block.max(1) as usize;
    let canvas = surface.canvas();
    let cw = canvas.width as usize;
    let (even, odd) = (even.to_array(), odd.to_array());
    for (r, row) in surface.data_mut().chunks_exact_mut(cw.max(1) * 4).enumerate() {
        for (c, px) in row.chunks_exact_mut(4).enumerate() {
            let color = if (c / block + r / block) % 2 == 0 {
                even
            } else {
                odd
            };
            px.copy_from_slice(&color);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/background.rs"]
mod tests;
