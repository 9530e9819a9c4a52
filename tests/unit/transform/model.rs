use super::*;

#[test]
fn identity_matches_fresh_overlay_defaults() {
    let t = Transform::identity();
    assert_eq!(
        t,
        Transform {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            scale: 1.0,
            rotation: 0.0,
            opacity: 0.95,
        }
    );
    assert_eq!(Transform::default(), t);
}

#[test]
fn clamping_is_total() {
    let range = ScaleRange::default();
    for s in [
        -5.0,
        0.0,
        0.01,
        0.05,
        1.0,
        10.0,
        11.0,
        f64::INFINITY,
        f64::NEG_INFINITY,
        f64::NAN,
    ] {
        let c = range.clamp(s);
        assert!(range.contains(c), "scale {s} clamped to {c}");
    }
    for o in [-1.0, 0.0, 0.5, 1.0, 2.0, f64::NAN, f64::INFINITY] {
        let c = clamp_opacity(o);
        assert!((0.0..=1.0).contains(&c), "opacity {o} clamped to {c}");
    }
    assert_eq!(clamp_scale(100.0), 10.0);
    assert_eq!(clamp_scale(-1.0), 0.05);
}

#[test]
fn inverted_range_clamps_without_panicking() {
    let inverted = ScaleRange { min: 5.0, max: 1.0 };
    assert!(!inverted.is_valid());
    assert_eq!(inverted.clamp(3.0), 1.0);
    assert_eq!(inverted.clamp(f64::NAN), 5.0);
    assert!(ScaleRange::default().is_valid());
    assert!(!ScaleRange { min: 0.0, max: 1.0 }.is_valid());
}

#[test]
fn patch_leaves_unspecified_fields_alone() {
    let base = Transform {
        x: 3.0,
        y: -4.0,
        rotation: 0.5,
        ..Transform::identity()
    };
    let out = base.apply_patch(&TransformPatch::scale(2.0), ScaleRange::default());
    assert_eq!(out.scale, 2.0);
    assert_eq!(out.x, 3.0);
    assert_eq!(out.y, -4.0);
    assert_eq!(out.rotation, 0.5);
    assert_eq!(out.opacity, 0.95);

    let out = base.apply_patch(
        &TransformPatch {
            scale: Some(50.0),
            opacity: Some(-3.0),
            ..TransformPatch::default()
        },
        ScaleRange::default(),
    );
    assert_eq!(out.scale, 10.0);
    assert_eq!(out.opacity, 0.0);
}

#[test]
fn controlled_fields_win_over_tracked_state() {
    let tracked = Transform {
        x: 10.0,
        y: 20.0,
        scale: 2.0,
        rotation: 1.0,
        ..Transform::identity()
    };
    let overrides = TransformOverrides {
        x: Some(-5.0),
        rotation: Some(0.0),
        ..TransformOverrides::default()
    };
    let out = compose(tracked, &overrides, ScaleRange::default());
    assert_eq!(out.x, -5.0);
    assert_eq!(out.y, 20.0);
    assert_eq!(out.scale, 2.0);
    assert_eq!(out.rotation, 0.0);

    assert_eq!(
        compose(tracked, &TransformOverrides::default(), ScaleRange::default()),
        tracked
    );
}

#[test]
fn depth_multiplies_scale() {
    let t = Transform {
        scale: 2.0,
        z: 0.5,
        ..Transform::identity()
    };
    assert_eq!(t.effective_scale(ScaleRange::default()), 3.0);
}

#[test]
fn affine_translates_from_anchor_then_scales() {
    let t = Transform {
        x: 5.0,
        y: -5.0,
        scale: 2.0,
        ..Transform::identity()
    };
    let a = t.to_affine(Point::new(100.0, 50.0), ScaleRange::default());
    let p = a * Point::new(1.0, 1.0);
    assert!((p.x - 107.0).abs() < 1e-9);
    assert!((p.y - 47.0).abs() < 1e-9);
}
