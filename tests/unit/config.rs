use super::*;

#[test]
fn empty_object_yields_defaults() {
    let cfg = EngineConfig::from_reader("{}".as_bytes()).unwrap();
    assert_eq!(cfg, EngineConfig::default());
    assert_eq!(cfg.scale_range, ScaleRange { min: 0.05, max: 10.0 });
    assert_eq!(cfg.smoothing_factor, 0.22);
    assert_eq!(cfg.camera.ideal_width, 1280);
    assert_eq!(cfg.camera.ideal_height, 720);
    assert!(cfg.mirror);
}

#[test]
fn partial_sections_merge_with_defaults() {
    let cfg = EngineConfig::from_reader(
        r##"{ "smoothing_factor": 0.5, "checker": { "block_px": 8 }, "mirror": false }"##
            .as_bytes(),
    )
    .unwrap();
    assert_eq!(cfg.smoothing_factor, 0.5);
    assert_eq!(cfg.checker.block_px, 8);
    assert_eq!(cfg.checker.dark, "#111827");
    assert!(!cfg.mirror);
}

#[test]
fn invalid_values_are_rejected() {
    for bad in [
        r#"{ "smoothing_factor": 0.0 }"#,
        r#"{ "scale_range": { "min": 0.0, "max": 1.0 } }"#,
        r#"{ "scale_range": { "min": 2.0, "max": 1.0 } }"#,
        r#"{ "detect_interval": 0 }"#,
        r#"{ "checker": { "dark": "red" } }"#,
        r#"{ "default_opacity": 1.5 }"#,
    ] {
        assert!(EngineConfig::from_reader(bad.as_bytes()).is_err(), "{bad}");
    }
    assert!(matches!(
        EngineConfig::from_reader("not json".as_bytes()),
        Err(TryOnError::Serde(_))
    ));
}
