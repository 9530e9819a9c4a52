use super::*;
use crate::foundation::core::Canvas;

fn gradient_frame(w: u32, h: u32) -> VideoFrame {
    let mut data = Vec::new();
    for y in 0..h {
        for x in 0..w {
            data.extend_from_slice(&[x as u8, y as u8, 0, 255]);
        }
    }
    VideoFrame::new(w, h, data).unwrap()
}

#[test]
fn cover_fit_crops_the_longer_side() {
    let wide = cover_fit(Size::new(1280.0, 720.0), Size::new(400.0, 400.0));
    assert_eq!(wide.height(), 400.0);
    assert!((wide.width() - 400.0 * 1280.0 / 720.0).abs() < 1e-9);
    assert!((wide.x0 + wide.x1 - 400.0).abs() < 1e-9);
    assert_eq!(wide.y0, 0.0);

    let tall = cover_fit(Size::new(100.0, 200.0), Size::new(300.0, 300.0));
    assert_eq!(tall, Rect::new(0.0, -150.0, 300.0, 450.0));
}

#[test]
fn exact_fit_copies_pixels() {
    let frame = gradient_frame(8, 4);
    let mut s = Surface::new(Canvas::new(8, 4));
    draw_video_cover(&mut s, &frame, false);
    assert_eq!(s.data(), frame.rgba8_premul.as_slice());
}

#[test]
fn mirror_maps_column_c_to_w_minus_1_minus_c() {
    let frame = gradient_frame(16, 9);
    let mut plain = Surface::new(Canvas::new(10, 10));
    let mut mirrored = Surface::new(Canvas::new(10, 10));
    draw_video_cover(&mut plain, &frame, false);
    draw_video_cover(&mut mirrored, &frame, true);

    let plain = plain.snapshot();
    let mirrored = mirrored.snapshot();
    for y in 0..10 {
        for c in 0..10 {
            assert_eq!(plain.pixel(c, y), mirrored.pixel(9 - c, y), "col {c} row {y}");
        }
    }
}

#[test]
fn checkerboard_alternates_by_block() {
    let dark = Rgba8Premul::opaque(0x11, 0x18, 0x27);
    let light = Rgba8Premul::opaque(0x0b, 0x12, 0x20);
    let mut s = Surface::new(Canvas::new(45, 25));
    draw_checkerboard(&mut s, 20, dark, light);
    let f = s.snapshot();
    assert_eq!(f.pixel(0, 0), Some(dark.to_array()));
    assert_eq!(f.pixel(19, 19), Some(dark.to_array()));
    assert_eq!(f.pixel(20, 0), Some(light.to_array()));
    assert_eq!(f.pixel(0, 20), Some(light.to_array()));
    assert_eq!(f.pixel(40, 24), Some(light.to_array()));
    assert_eq!(f.pixel(25, 21), Some(dark.to_array()));
}
