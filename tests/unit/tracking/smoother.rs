use super::*;

fn pose(x: f64, rotation_deg: f64) -> AnchorPose {
    AnchorPose {
        x,
        y: x,
        scale: 100.0,
        rotation_deg,
    }
}

#[test]
fn no_history_returns_next_unchanged() {
    let x = pose(12.5, 400.0);
    assert_eq!(smooth(None, x, 0.22), x);
}

#[test]
fn rotation_takes_the_short_way_round() {
    let prev = pose(0.0, 170.0);
    let next = pose(0.0, -170.0);
    assert_eq!(smooth(Some(prev), next, 1.0).rotation_deg, -170.0);
    assert_eq!(smooth(Some(prev), next, 0.5).rotation_deg.abs(), 180.0);
}

#[test]
fn position_and_scale_lerp_by_factor() {
    let out = smooth(Some(pose(0.0, 0.0)), pose(100.0, 0.0), 0.22);
    assert!((out.x - 22.0).abs() < 1e-9);
    assert!((out.y - 22.0).abs() < 1e-9);
    assert_eq!(out.scale, 100.0);
}

#[test]
fn history_is_per_slot_and_resettable() {
    let mut s = TemporalSmoother::new(0.5);
    assert!(s.is_empty());
    assert_eq!(s.update(AnchorSlot::Glasses, pose(10.0, 0.0)).x, 10.0);
    assert_eq!(s.update(AnchorSlot::Glasses, pose(20.0, 0.0)).x, 15.0);
    assert_eq!(s.update(AnchorSlot::LeftEarring, pose(40.0, 0.0)).x, 40.0);
    assert_eq!(s.get(AnchorSlot::RightEarring), None);

    s.reset();
    assert!(s.is_empty());
    assert_eq!(s.update(AnchorSlot::Glasses, pose(20.0, 0.0)).x, 20.0);
}
