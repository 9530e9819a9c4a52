use tracing::{debug, warn};

use crate::foundation::core::{Size, VideoFrame};
use crate::tracking::anchor::{AnchorPose, AnchorSlot, PoseFactors, pose_for_slot};
use crate::tracking::landmarks::{Detection, FaceLandmarks, LandmarkDetector};
use crate::tracking::smoother::TemporalSmoother;

/// Per-tick face tracking: runs the detector at a fixed cadence and keeps smoothed poses.
pub struct FaceTracker {
    detector: Option<Box<dyn LandmarkDetector>>,
    smoother: TemporalSmoother,
    factors: PoseFactors,
    detect_interval: u32,
    ticks: u64,
    face_present: bool,
}

impl std::fmt::Debug for FaceTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaceTracker")
            .field("enabled", &self.detector.is_some())
            .field("smoother", &self.smoother)
            .field("detect_interval", &self.detect_interval)
            .field("ticks", &self.ticks)
            .field("face_present", &self.face_present)
            .finish()
    }
}

impl FaceTracker {
    /// Tracker without a detector; poses stay empty until one is attached.
    pub fn new(factors: PoseFactors, smoothing_factor: f64, detect_interval: u32) -> Self {
        Self {
            detector: None,
            smoother: TemporalSmoother::new(smoothing_factor),
            factors,
            detect_interval: detect_interval.max(1),
            ticks: 0,
            face_present: false,
        }
    }

    /// Attach a detector, replacing any previous one.
    pub fn set_detector(&mut self, detector: Box<dyn LandmarkDetector>) {
        self.detector = Some(detector);
        self.reset();
    }

    /// Detach the detector and drop all history.
    pub fn clear_detector(&mut self) {
        self.detector = None;
        self.reset();
    }

    /// Return `true` when a detector is attached.
    pub fn is_enabled(&self) -> bool {
        self.detector.is_some()
    }

    /// Return `true` when the last detection found a face.
    pub fn face_present(&self) -> bool {
        self.face_present
    }

    /// Apply one detection result for a video rectangle of size `video`.
    ///
    /// "No face" clears the smoothing history so the next detection starts from its raw pose.
    pub fn observe(&mut self, detection: &Detection, video: Size) -> bool {
        match detection {
            Detection::NoFace => {
                if self.face_present {
                    debug!("face lost, smoothing history reset");
                }
                self.face_present = false;
                self.smoother.reset();
            }
            Detection::Face(frame) => {
                let face = FaceLandmarks::from_frame(frame);
                for slot in AnchorSlot::ALL {
                    self.smoother
                        .update(slot, pose_for_slot(&face, slot, video, self.factors));
                }
                self.face_present = true;
            }
        }
        self.face_present
    }

    /// Advance one tick. Detection runs on every `detect_interval`-th tick; the ticks in
    /// between reuse the last poses. Without a frame the face counts as lost.
    pub fn tick(&mut self, frame: Option<&VideoFrame>, video: Size, timestamp_ms: f64) -> bool {
        let due = self.ticks % u64::from(self.detect_interval) == 0;
        self.ticks = self.ticks.wrapping_add(1);

        if self.detector.is_none() {
            return false;
        }
        let Some(frame) = frame else {
            return self.observe(&Detection::NoFace, video);
        };
        if !due {
            return self.face_present;
        }

        let result = match self.detector.as_mut() {
            Some(detector) => detector.detect(frame, timestamp_ms),
            None => return false,
        };
        let detection = match result {
            Ok(d) => d,
            Err(e) => {
                warn!(error = %e, "landmark detection failed, treating frame as no face");
                Detection::NoFace
            }
        };
        self.observe(&detection, video)
    }

    /// Smoothed pose for `slot`, or `None` when no face is present.
    pub fn pose(&self, slot: AnchorSlot) -> Option<AnchorPose> {
        if !self.face_present {
            return None;
        }
        self.smoother.get(slot)
    }

    /// Drop smoothing history and restart the detection cadence.
    pub fn reset(&mut self) {
        self.smoother.reset();
        self.face_present = false;
        self.ticks = 0;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tracking/face_tracker.rs"]
mod tests;
