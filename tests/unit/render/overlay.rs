use super::*;
use crate::foundation::core::Vec2;

fn solid_image(w: u32, h: u32, px: [u8; 4]) -> PreparedImage {
    PreparedImage {
        width: w,
        height: h,
        rgba8_premul: Arc::new(px.repeat((w * h) as usize)),
    }
}

fn close(a: [u8; 4], b: [u8; 4]) -> bool {
    a.iter().zip(b).all(|(x, y)| x.abs_diff(y) <= 2)
}

#[test]
fn image_is_drawn_under_its_transform() {
    let mut surface = Surface::new(Canvas::new(40, 40));
    let img = solid_image(10, 10, [255, 0, 0, 255]);
    let mut p = OverlayPainter::new();
    p.begin(surface.canvas()).unwrap();
    p.draw_image(&img, Affine::translate(Vec2::new(15.0, 15.0)), 1.0)
        .unwrap();
    assert_eq!(p.draws(), 1);
    p.finish(&mut surface).unwrap();

    let f = surface.snapshot();
    assert!(close(f.pixel(20, 20).unwrap(), [255, 0, 0, 255]));
    assert_eq!(f.pixel(2, 2), Some([0, 0, 0, 0]));
    assert_eq!(f.pixel(35, 35), Some([0, 0, 0, 0]));
}

#[test]
fn replaced_image_is_not_drawn_from_a_stale_paint() {
    let mut surface = Surface::new(Canvas::new(20, 20));
    let mut p = OverlayPainter::new();

    let red = solid_image(20, 20, [255, 0, 0, 255]);
    p.begin(surface.canvas()).unwrap();
    p.draw_image(&red, Affine::IDENTITY, 1.0).unwrap();
    p.finish(&mut surface).unwrap();
    assert!(close(surface.snapshot().pixel(10, 10).unwrap(), [255, 0, 0, 255]));
    drop(red);

    // Fresh buffers of the same size, as a decoder would hand back for the next overlay.
    for _ in 0..4 {
        let blue = solid_image(20, 20, [0, 0, 255, 255]);
        surface.data_mut().fill(0);
        p.begin(surface.canvas()).unwrap();
        p.draw_image(&blue, Affine::IDENTITY, 1.0).unwrap();
        p.finish(&mut surface).unwrap();
        assert!(close(surface.snapshot().pixel(10, 10).unwrap(), [0, 0, 255, 255]));
    }
}

#[test]
fn opacity_scales_coverage() {
    let mut surface = Surface::new(Canvas::new(20, 20));
    let img = solid_image(20, 20, [0, 0, 255, 255]);
    let mut p = OverlayPainter::new();
    p.begin(surface.canvas()).unwrap();
    p.draw_image(&img, Affine::IDENTITY, 0.5).unwrap();
    p.finish(&mut surface).unwrap();

    let px = surface.snapshot().pixel(10, 10).unwrap();
    assert!(px[3].abs_diff(128) <= 2, "{px:?}");
    assert!(px[2].abs_diff(128) <= 2, "{px:?}");
}

#[test]
fn no_draws_leave_surface_untouched() {
    let mut surface = Surface::new(Canvas::new(4, 4));
    surface.data_mut().fill(7);
    let mut p = OverlayPainter::new();
    p.begin(surface.canvas()).unwrap();
    p.draw_image(&solid_image(1, 1, [1, 1, 1, 255]), Affine::IDENTITY, 0.0)
        .unwrap();
    p.finish(&mut surface).unwrap();
    assert!(surface.data().iter().all(|b| *b == 7));
}

#[test]
fn outline_has_a_hollow_center() {
    let mut surface = Surface::new(Canvas::new(40, 40));
    let mut p = OverlayPainter::new();
    p.begin(surface.canvas()).unwrap();
    p.fill_rects(
        &outline_rects(Rect::new(10.0, 10.0, 30.0, 30.0), 4.0),
        Affine::IDENTITY,
        Rgba8Premul::opaque(0, 255, 0),
        1.0,
    )
    .unwrap();
    p.finish(&mut surface).unwrap();

    let f = surface.snapshot();
    assert!(close(f.pixel(20, 10).unwrap(), [0, 255, 0, 255]));
    assert!(close(f.pixel(10, 20).unwrap(), [0, 255, 0, 255]));
    assert_eq!(f.pixel(20, 20), Some([0, 0, 0, 0]));
}

#[test]
fn glasses_placeholder_proportions() {
    let rects = glasses_placeholder_rects(100.0, 4.0);
    assert_eq!(rects[0].y0, -17.5 - 2.0);
    assert_eq!(rects[1].y1, 17.5 + 2.0);
    assert_eq!(rects[4], Rect::new(-8.0, -2.0, 8.0, 2.0));
}

#[test]
fn oversized_surfaces_are_rejected() {
    let mut p = OverlayPainter::new();
    assert!(p.begin(Canvas::new(70_000, 10)).is_err());
}
