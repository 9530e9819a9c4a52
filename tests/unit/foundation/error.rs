use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        TryOnError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(TryOnError::render("x").to_string().contains("render error:"));
    assert!(
        TryOnError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
    assert!(
        TryOnError::detection_unavailable("x")
            .to_string()
            .contains("face detection unavailable:")
    );
    assert_eq!(
        TryOnError::image_load("a.png", "missing").to_string(),
        "image load failed for 'a.png': missing"
    );
}

#[test]
fn camera_errors_carry_user_facing_distinction() {
    let denied = TryOnError::from(CameraAccessError::Denied);
    assert!(matches!(denied, TryOnError::Camera(CameraAccessError::Denied)));
    assert!(CameraAccessError::Denied.user_message().contains("denied"));
    assert!(
        CameraAccessError::Unavailable
            .user_message()
            .contains("another app")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = TryOnError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
