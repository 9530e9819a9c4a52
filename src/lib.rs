//! tryon is a real-time overlay compositing and gesture-transform engine for virtual try-on.
//!
//! A [`TryOnStudio`] owns the whole pipeline:
//!
//! - Place catalog overlays as layers and drive them with pointer, pinch and wheel gestures
//! - Lock glasses and earrings onto a tracked face through a [`LandmarkDetector`]
//! - Composite the mirrored camera feed and every layer on each tick, then capture PNG stills
//!
//! Hosts plug in at narrow seams: [`CameraDevice`] for video, [`AssetFetcher`] for overlay
//! bytes, [`FrameScheduler`] for display-synced ticks.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod foundation;

pub(crate) mod config;
pub(crate) mod gesture;
pub(crate) mod render;
pub(crate) mod scene;
pub(crate) mod session;
pub(crate) mod tracking;
pub(crate) mod transform;

pub use crate::foundation::core::{
    Affine, Canvas, Point, Rect, Rgba8Premul, Size, Vec2, VideoFrame,
};
pub use crate::foundation::error::{CameraAccessError, TryOnError, TryOnResult};

pub use crate::assets::decode::{PreparedImage, decode_image};
pub use crate::assets::loader::{
    AssetFetcher, FsFetcher, ImageLoader, LoadOutcome, LoadStatus, LoadTicket,
};
pub use crate::config::{
    CameraConfig, CheckerConfig, EngineConfig, PlaceholderConfig, WheelConfig,
};
pub use crate::gesture::interpreter::{GestureInterpreter, GestureResponse, GestureState};
pub use crate::gesture::pointer::{
    Modifiers, PointerEvent, PointerId, PointerKind, SurfaceGeometry, WheelEvent, backing_size,
    effective_dpr,
};
pub use crate::render::background::cover_fit;
pub use crate::render::frame_loop::{
    FrameHandle, FrameScheduler, ManualScheduler, RenderInputs, RenderLoop, RenderStyle,
};
pub use crate::render::surface::{FrameRGBA, SurfaceSizer};
pub use crate::scene::catalog::{AnchorMode, Catalog, OverlayCategory, OverlayDef, OverlayId};
pub use crate::scene::layers::{Layer, LayerStore};
pub use crate::session::camera::{
    CameraConstraints, CameraDevice, CameraSession, CameraState, FacingMode, StillImageCamera,
    VideoStream,
};
pub use crate::session::studio::TryOnStudio;
pub use crate::tracking::anchor::{
    AnchorPose, AnchorSlot, OverlayArchetype, PoseFactors, earring_pose, glasses_pose, interpret,
    pose_for_slot,
};
pub use crate::tracking::face_tracker::FaceTracker;
pub use crate::tracking::landmarks::{
    Detection, FACE_CONTOUR, FaceLandmarks, LANDMARK_COUNT, LEFT_EAR, LEFT_EYE, LandmarkDetector,
    LandmarkFrame, LandmarkPoint, NOSE_BRIDGE, RIGHT_EAR, RIGHT_EYE, StaticDetector,
};
pub use crate::tracking::smoother::{DEFAULT_SMOOTHING, TemporalSmoother, smooth};
pub use crate::transform::linear::{lerp, lerp_transform};
pub use crate::transform::model::{
    IDENTITY_OPACITY, ScaleRange, Transform, TransformOverrides, TransformPatch, clamp_opacity,
    clamp_scale, compose,
};
pub use crate::transform::non_linear::{clamp01, normalize_degrees, shortest_degrees};
