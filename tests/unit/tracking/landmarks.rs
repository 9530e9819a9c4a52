use super::*;
use crate::tracking::fixtures::level_face;

#[test]
fn short_frames_are_rejected() {
    let err = LandmarkFrame::new(vec![LandmarkPoint::default(); 10]).unwrap_err();
    assert!(err.to_string().contains("468"));
}

#[test]
fn non_finite_points_are_rejected() {
    let mut pts = vec![LandmarkPoint::new(0.5, 0.5); LANDMARK_COUNT];
    pts[7].y = f64::NAN;
    assert!(LandmarkFrame::new(pts).is_err());
}

#[test]
fn face_box_spans_the_contour() {
    let face = FaceLandmarks::from_frame(&level_face());
    assert_eq!(face.face_box, Rect::new(0.3, 0.2, 0.7, 0.8));
    assert!((face.face_width() - 0.4).abs() < 1e-12);
    assert!((face.face_height() - 0.6).abs() < 1e-12);
    assert_eq!(face.face_center(), Point::new(0.5, 0.5));
    assert!((face.left_eye - Point::new(0.4, 0.45)).hypot() < 1e-12);
    assert!((face.right_eye - Point::new(0.6, 0.45)).hypot() < 1e-12);
    assert_eq!(face.left_ear, Point::new(0.3, 0.5));
    assert_eq!(face.right_ear, Point::new(0.7, 0.5));
}

#[test]
fn frame_deserializes_from_point_array() {
    let pts = vec![LandmarkPoint::new(0.25, 0.75); LANDMARK_COUNT];
    let json = serde_json::to_string(&pts).unwrap();
    let frame: LandmarkFrame = serde_json::from_str(&json).unwrap();
    assert_eq!(frame.points().len(), LANDMARK_COUNT);

    let short: Result<LandmarkFrame, _> = serde_json::from_str(r#"[{"x":0.1,"y":0.2}]"#);
    assert!(short.is_err());
}

#[test]
fn static_detector_replays_a_json_frame() {
    let frame = crate::tracking::fixtures::level_face();
    let json = serde_json::to_vec(&frame).unwrap();
    let mut det = StaticDetector::from_reader(json.as_slice()).unwrap();
    let video = VideoFrame::solid(2, 2, crate::Rgba8Premul::opaque(0, 0, 0)).unwrap();
    assert_eq!(det.detect(&video, 0.0).unwrap(), Detection::Face(frame.clone()));
    assert_eq!(det.detect(&video, 16.0).unwrap(), Detection::Face(frame));
}

#[test]
fn static_detector_rejects_short_frames() {
    let json = serde_json::to_vec(&vec![LandmarkPoint::new(0.5, 0.5); 10]).unwrap();
    assert!(matches!(
        StaticDetector::from_reader(json.as_slice()),
        Err(TryOnError::Serde(_))
    ));
}
