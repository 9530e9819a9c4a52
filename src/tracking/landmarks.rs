use crate::foundation::core::{Point, Rect, VideoFrame};
use crate::foundation::error::{TryOnError, TryOnResult};

/// Minimum number of points a detector frame must carry (468-point face mesh).
pub const LANDMARK_COUNT: usize = 468;

/// Left-eye cluster indices.
pub const LEFT_EYE: [usize; 7] = [33, 133, 157, 158, 159, 160, 161];
/// Right-eye cluster indices.
pub const RIGHT_EYE: [usize; 7] = [362, 263, 386, 387, 388, 389, 390];
/// Nose-bridge point index.
pub const NOSE_BRIDGE: usize = 6;
/// Left-ear point index.
pub const LEFT_EAR: usize = 234;
/// Right-ear point index.
pub const RIGHT_EAR: usize = 454;
/// Face-contour indices; the face bounding box is the min/max over these.
pub const FACE_CONTOUR: [usize; 36] = [
    10, 338, 297, 332, 284, 251, 389, 356, 454, 323, 361, 288, 397, 365, 379, 378, 400, 377, 152,
    148, 176, 149, 150, 136, 172, 58, 132, 93, 234, 127, 162, 21, 54, 103, 67, 109,
];

/// One detector keypoint in normalized image coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct LandmarkPoint {
    /// Horizontal position in `[0, 1]`.
    pub x: f64,
    /// Vertical position in `[0, 1]`.
    pub y: f64,
    /// Relative depth.
    #[serde(default)]
    pub z: f64,
    /// Detector confidence, when reported.
    #[serde(default)]
    pub visibility: Option<f64>,
}

impl LandmarkPoint {
    /// Point with zero depth and no visibility.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }

    fn xy(self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Validated per-frame landmark set.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<LandmarkPoint>", into = "Vec<LandmarkPoint>")]
pub struct LandmarkFrame {
    points: Vec<LandmarkPoint>,
}

impl LandmarkFrame {
    /// Wrap detector output, rejecting short frames and non-finite coordinates.
    pub fn new(points: Vec<LandmarkPoint>) -> TryOnResult<Self> {
        if points.len() < LANDMARK_COUNT {
            return Err(TryOnError::validation(format!(
                "landmark frame has {} points, expected at least {LANDMARK_COUNT}",
                points.len()
            )));
        }
        if let Some(i) = points
            .iter()
            .position(|p| !(p.x.is_finite() && p.y.is_finite()))
        {
            return Err(TryOnError::validation(format!(
                "landmark {i} has a non-finite coordinate"
            )));
        }
        Ok(Self { points })
    }

    /// All points in detector order.
    pub fn points(&self) -> &[LandmarkPoint] {
        &self.points
    }

    fn at(&self, i: usize) -> Point {
        self.points[i].xy()
    }

    fn mean(&self, idx: &[usize]) -> Point {
        let n = idx.len() as f64;
        let (sx, sy) = idx.iter().fold((0.0, 0.0), |(sx, sy), &i| {
            let p = self.at(i);
            (sx + p.x, sy + p.y)
        });
        Point::new(sx / n, sy / n)
    }
}

impl TryFrom<Vec<LandmarkPoint>> for LandmarkFrame {
    type Error = TryOnError;

    fn try_from(points: Vec<LandmarkPoint>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<LandmarkFrame> for Vec<LandmarkPoint> {
    fn from(frame: LandmarkFrame) -> Self {
        frame.points
    }
}

/// Semantic anchors derived from a [`LandmarkFrame`], all in normalized coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceLandmarks {
    /// Mean of the left-eye cluster.
    pub left_eye: Point,
    /// Mean of the right-eye cluster.
    pub right_eye: Point,
    /// Nose-bridge point.
    pub nose_bridge: Point,
    /// Left-ear point.
    pub left_ear: Point,
    /// Right-ear point.
    pub right_ear: Point,
    /// Bounding box of the face contour.
    pub face_box: Rect,
}

impl FaceLandmarks {
    /// Derive anchors from a validated frame.
    pub fn from_frame(frame: &LandmarkFrame) -> Self {
        let first = frame.at(FACE_CONTOUR[0]);
        let face_box = FACE_CONTOUR[1..]
            .iter()
            .fold(Rect::from_points(first, first), |r, &i| {
                r.union_pt(frame.at(i))
            });
        Self {
            left_eye: frame.mean(&LEFT_EYE),
            right_eye: frame.mean(&RIGHT_EYE),
            nose_bridge: frame.at(NOSE_BRIDGE),
            left_ear: frame.at(LEFT_EAR),
            right_ear: frame.at(RIGHT_EAR),
            face_box,
        }
    }

    /// Center of the face bounding box.
    pub fn face_center(&self) -> Point {
        self.face_box.center()
    }

    /// Width of the face bounding box.
    pub fn face_width(&self) -> f64 {
        self.face_box.width()
    }

    /// Height of the face bounding box.
    pub fn face_height(&self) -> f64 {
        self.face_box.height()
    }
}

/// Outcome of one detector call.
#[derive(Clone, Debug, PartialEq)]
pub enum Detection {
    /// No face in the frame.
    NoFace,
    /// Exactly one face.
    Face(LandmarkFrame),
}

/// Face-landmark detector seam.
///
/// Implementations wrap an external model; the engine calls `detect` at most once per tick and
/// never concurrently.
pub trait LandmarkDetector {
    /// Run detection on `frame`. Errors are logged by the caller and treated as [`Detection::NoFace`].
    fn detect(&mut self, frame: &VideoFrame, timestamp_ms: f64) -> TryOnResult<Detection>;
}

/// Detector that reports the same result for every frame.
///
/// Stands in for a live model when landmarks come from a file.
#[derive(Clone, Debug, PartialEq)]
pub struct StaticDetector {
    detection: Detection,
}

impl StaticDetector {
    /// Always report `detection`.
    pub fn new(detection: Detection) -> Self {
        Self { detection }
    }

    /// Read a landmark frame (JSON array of points) and report it for every frame.
    pub fn from_reader<R: std::io::Read>(r: R) -> TryOnResult<Self> {
        let frame: LandmarkFrame = serde_json::from_reader(r)
            .map_err(|e| TryOnError::serde(format!("landmark json parse: {e}")))?;
        Ok(Self::new(Detection::Face(frame)))
    }
}

impl LandmarkDetector for StaticDetector {
    fn detect(&mut self, _frame: &VideoFrame, _timestamp_ms: f64) -> TryOnResult<Detection> {
        Ok(self.detection.clone())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tracking/landmarks.rs"]
mod tests;
