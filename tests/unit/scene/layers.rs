use super::*;

fn id(s: &str) -> OverlayId {
    OverlayId::from(s)
}

fn def(name: &str, default_scale: f64) -> OverlayDef {
    OverlayDef {
        id: id(name),
        display_name: name.to_string(),
        category: OverlayCategory::Headpiece,
        image_source: format!("{name}.png"),
        anchor_mode: AnchorMode::BottomCenter,
        default_scale,
    }
}

#[test]
fn add_update_remove_scenario() {
    let mut s = LayerStore::default();
    assert!(s.add_layer("glasses-1"));
    assert_eq!(s.active_layer_id(), Some(&id("glasses-1")));
    assert_eq!(s.layers()[0].transform, Transform::identity());

    assert!(s.update_layer(&id("glasses-1"), &TransformPatch::scale(2.0)));
    assert_eq!(s.layers()[0].transform.scale, 2.0);

    assert!(s.remove_layer(&id("glasses-1")));
    assert!(s.is_empty());
    assert_eq!(s.active_layer_id(), None);
}

#[test]
fn duplicate_add_is_idempotent() {
    let mut s = LayerStore::default();
    assert!(s.add_layer("x"));
    s.update_layer(&id("x"), &TransformPatch::position(5.0, 6.0));
    s.add_layer("y");
    assert!(!s.add_layer("x"));

    assert_eq!(s.len(), 2);
    assert_eq!(s.active_layer_id(), Some(&id("x")));
    assert_eq!(s.layer(&id("x")).unwrap().transform.x, 5.0);
}

#[test]
fn removing_the_active_layer_does_not_promote_another() {
    let mut s = LayerStore::default();
    s.add_layer("a");
    s.add_layer("b");
    assert!(s.remove_layer(&id("b")));
    assert_eq!(s.active_layer_id(), None);
    assert!(!s.remove_layer(&id("b")));

    s.set_active_layer(Some(&id("a")));
    s.add_layer("c");
    s.remove_layer(&id("a"));
    assert_eq!(s.active_layer_id(), Some(&id("c")));
}

#[test]
fn unknown_active_ids_are_rejected() {
    let mut s = LayerStore::default();
    s.add_layer("a");
    assert!(!s.set_active_layer(Some(&id("zzz"))));
    assert_eq!(s.active_layer_id(), Some(&id("a")));
    assert!(s.set_active_layer(None));
    assert_eq!(s.active_layer(), None);
    assert!(!s.update_active(&TransformPatch::scale(3.0)));
}

#[test]
fn updates_clamp_and_keep_unspecified_fields() {
    let mut s = LayerStore::default();
    s.add_layer("a");
    s.update_active(&TransformPatch::rotation(1.25));
    s.update_active(&TransformPatch::scale(50.0));
    s.update_active(&TransformPatch::opacity(-3.0));
    let t = s.active_layer().unwrap().transform;
    assert_eq!(t.scale, 10.0);
    assert_eq!(t.opacity, 0.0);
    assert_eq!(t.rotation, 1.25);
    assert!(!s.update_layer(&id("missing"), &TransformPatch::scale(1.0)));
}

#[test]
fn catalog_layers_start_and_reset_at_default_scale() {
    let mut s = LayerStore::default();
    s.add_overlay(&def("crown", 1.4));
    let l = s.active_layer().unwrap();
    assert_eq!(l.transform.scale, 1.4);
    assert_eq!(l.anchor_mode, AnchorMode::BottomCenter);
    assert_eq!(l.category, Some(OverlayCategory::Headpiece));

    s.update_active(&TransformPatch {
        x: Some(30.0),
        scale: Some(3.0),
        opacity: Some(0.2),
        ..TransformPatch::default()
    });
    assert!(s.reset_active_layer());
    let t = s.active_layer().unwrap().transform;
    assert_eq!(t, Transform::with_scale(1.4, ScaleRange::default()));

    s.set_active_layer(None);
    assert!(!s.reset_active_layer());
}

#[test]
fn overrides_win_for_the_active_layer_only() {
    let mut s = LayerStore::default();
    s.add_layer("a");
    s.add_layer("b");
    s.set_overrides(TransformOverrides {
        scale: Some(4.0),
        ..TransformOverrides::default()
    });
    s.update_active(&TransformPatch::scale(2.0));

    let b = s.layer(&id("b")).unwrap();
    let a = s.layer(&id("a")).unwrap();
    assert_eq!(b.transform.scale, 2.0);
    assert_eq!(s.resolved_transform(b).scale, 4.0);
    assert_eq!(s.resolved_transform(a).scale, 1.0);
}

#[test]
fn clear_all_empties_store_and_selection() {
    let mut s = LayerStore::default();
    s.add_layer("a");
    s.add_layer("b");
    s.clear_all_layers();
    assert!(s.is_empty());
    assert_eq!(s.active_layer_id(), None);
}

#[test]
fn invalid_scale_range_falls_back_to_default() {
    let mut s = LayerStore::new(ScaleRange { min: 4.0, max: 2.0 }, 1.0);
    assert_eq!(s.scale_range(), ScaleRange::default());
    s.add_layer("a");
    assert!(s.update_active(&TransformPatch::scale(50.0)));
    assert_eq!(s.active_layer().unwrap().transform.scale, 10.0);
}
