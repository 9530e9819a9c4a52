use crate::foundation::core::{Rect, Size};
use crate::tracking::landmarks::{Detection, FaceLandmarks};

/// Unsmoothed or smoothed placement target in pixel space.
///
/// Unlike [`crate::Transform`], `rotation_deg` is in degrees; the smoother wraps it on the circle.
#[derive(Clone, Copy, Debug, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct AnchorPose {
    /// Anchor x in pixels.
    pub x: f64,
    /// Anchor y in pixels.
    pub y: f64,
    /// Overlay width in pixels.
    pub scale: f64,
    /// Rotation in degrees.
    pub rotation_deg: f64,
}

impl AnchorPose {
    /// Map a pose computed inside the video rectangle `video` onto a surface of width
    /// `surface_width`, applying the same horizontal mirror as the video.
    pub fn placed(self, video: Rect, mirror: bool, surface_width: f64) -> Self {
        let x = video.x0 + self.x;
        let y = video.y0 + self.y;
        if mirror {
            Self {
                x: surface_width - x,
                y,
                scale: self.scale,
                rotation_deg: -self.rotation_deg,
            }
        } else {
            Self { x, y, ..self }
        }
    }
}

/// How an overlay attaches to a face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OverlayArchetype {
    /// Centered between the eyes, rotated with the eye line.
    Glasses,
    /// Hung from both ear points, upright.
    Earring,
}

impl OverlayArchetype {
    /// Anchor slots drawn for this archetype.
    pub fn slots(self) -> &'static [AnchorSlot] {
        match self {
            Self::Glasses => &[AnchorSlot::Glasses],
            Self::Earring => &[AnchorSlot::LeftEarring, AnchorSlot::RightEarring],
        }
    }
}

/// One tracked anchor; each has its own smoothing history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnchorSlot {
    /// Eye-line center.
    Glasses,
    /// Left ear point.
    LeftEarring,
    /// Right ear point.
    RightEarring,
}

impl AnchorSlot {
    /// Every slot, in a fixed order.
    pub const ALL: [AnchorSlot; 3] = [Self::Glasses, Self::LeftEarring, Self::RightEarring];

    pub(crate) fn index(self) -> usize {
        match self {
            Self::Glasses => 0,
            Self::LeftEarring => 1,
            Self::RightEarring => 2,
        }
    }
}

/// Width multipliers applied to the face width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PoseFactors {
    /// Glasses width / face width.
    pub glasses: f64,
    /// Earring width / face width.
    pub earring: f64,
}

impl Default for PoseFactors {
    fn default() -> Self {
        Self {
            glasses: 1.6,
            earring: 0.6,
        }
    }
}

/// Glasses pose: eye midpoint, eye-line angle, width proportional to the face.
///
/// The angle is taken between the normalized eye centers, so it does not depend on the video
/// aspect ratio.
pub fn glasses_pose(face: &FaceLandmarks, video: Size, factor: f64) -> AnchorPose {
    let mid = face.left_eye.midpoint(face.right_eye);
    let dx = face.right_eye.x - face.left_eye.x;
    let dy = face.right_eye.y - face.left_eye.y;
    AnchorPose {
        x: mid.x * video.width,
        y: mid.y * video.height,
        scale: face.face_width() * video.width * factor,
        rotation_deg: dy.atan2(dx).to_degrees(),
    }
}

/// Earring pose for one side: the ear point, upright.
pub fn earring_pose(face: &FaceLandmarks, slot: AnchorSlot, video: Size, factor: f64) -> AnchorPose {
    let ear = match slot {
        AnchorSlot::RightEarring => face.right_ear,
        _ => face.left_ear,
    };
    AnchorPose {
        x: ear.x * video.width,
        y: ear.y * video.height,
        scale: face.face_width() * video.width * factor,
        rotation_deg: 0.0,
    }
}

/// Raw pose for `slot`.
pub fn pose_for_slot(
    face: &FaceLandmarks,
    slot: AnchorSlot,
    video: Size,
    factors: PoseFactors,
) -> AnchorPose {
    match slot {
        AnchorSlot::Glasses => glasses_pose(face, video, factors.glasses),
        AnchorSlot::LeftEarring | AnchorSlot::RightEarring => {
            earring_pose(face, slot, video, factors.earring)
        }
    }
}

/// Interpret one detector result for `slot`; `None` when there is no face.
pub fn interpret(
    detection: &Detection,
    slot: AnchorSlot,
    video: Size,
    factors: PoseFactors,
) -> Option<AnchorPose> {
    match detection {
        Detection::NoFace => None,
        Detection::Face(frame) => {
            let face = FaceLandmarks::from_frame(frame);
            Some(pose_for_slot(&face, slot, video, factors))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tracking/anchor.rs"]
mod tests;
