use super::*;
use crate::foundation::core::Rect;
use crate::tracking::fixtures::{face_frame, level_face};

fn approx(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-9, "{a} != {b}");
}

#[test]
fn glasses_pose_sits_between_the_eyes() {
    let face = FaceLandmarks::from_frame(&level_face());
    let pose = glasses_pose(&face, Size::new(1000.0, 500.0), 1.6);
    approx(pose.x, 500.0);
    approx(pose.y, 225.0);
    approx(pose.scale, 0.4 * 1000.0 * 1.6);
    approx(pose.rotation_deg, 0.0);
}

#[test]
fn glasses_rotation_uses_normalized_eye_centers() {
    let frame = face_frame((0.4, 0.4), (0.6, 0.6), Rect::new(0.3, 0.2, 0.7, 0.8));
    let face = FaceLandmarks::from_frame(&frame);
    let pose = glasses_pose(&face, Size::new(100.0, 100.0), 1.6);
    approx(pose.rotation_deg, 45.0);

    let wide = glasses_pose(&face, Size::new(1920.0, 1080.0), 1.6);
    approx(wide.rotation_deg, 45.0);
    approx(wide.x, 0.5 * 1920.0);
}

#[test]
fn earrings_hang_from_both_ears_upright() {
    let face = FaceLandmarks::from_frame(&level_face());
    let video = Size::new(1000.0, 500.0);
    let l = earring_pose(&face, AnchorSlot::LeftEarring, video, 0.6);
    let r = earring_pose(&face, AnchorSlot::RightEarring, video, 0.6);
    approx(l.x, 300.0);
    approx(r.x, 700.0);
    approx(l.y, 250.0);
    approx(l.scale, 0.4 * 1000.0 * 0.6);
    assert_eq!(l.rotation_deg, 0.0);
    assert_eq!(OverlayArchetype::Earring.slots().len(), 2);
}

#[test]
fn no_face_yields_no_pose() {
    let video = Size::new(10.0, 10.0);
    assert_eq!(
        interpret(&Detection::NoFace, AnchorSlot::Glasses, video, PoseFactors::default()),
        None
    );
    assert!(
        interpret(
            &Detection::Face(level_face()),
            AnchorSlot::Glasses,
            video,
            PoseFactors::default()
        )
        .is_some()
    );
}

#[test]
fn placement_mirrors_position_and_rotation() {
    let pose = AnchorPose {
        x: 10.0,
        y: 20.0,
        scale: 5.0,
        rotation_deg: 30.0,
    };
    let video = Rect::new(-50.0, 0.0, 150.0, 100.0);
    let plain = pose.placed(video, false, 100.0);
    assert_eq!((plain.x, plain.y, plain.rotation_deg), (-40.0, 20.0, 30.0));
    let mirrored = pose.placed(video, true, 100.0);
    assert_eq!((mirrored.x, mirrored.y, mirrored.rotation_deg), (140.0, 20.0, -30.0));
    assert_eq!(mirrored.scale, 5.0);
}
