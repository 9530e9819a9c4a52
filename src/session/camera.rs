use tracing::{info, warn};

use crate::assets::decode::PreparedImage;
use crate::config::CameraConfig;
use crate::foundation::core::VideoFrame;
use crate::foundation::error::CameraAccessError;

/// Which camera to open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FacingMode {
    /// Front-facing (selfie) camera.
    #[default]
    User,
    /// Rear camera.
    Environment,
}

/// Constraints passed to [`CameraDevice::open`]. Streams are always video-only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CameraConstraints {
    /// Camera to open.
    pub facing: FacingMode,
    /// Preferred frame width.
    pub ideal_width: u32,
    /// Preferred frame height.
    pub ideal_height: u32,
}

impl Default for CameraConstraints {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

impl CameraConstraints {
    /// Front-facing constraints at the configured ideal resolution.
    pub fn from_config(cfg: &CameraConfig) -> Self {
        Self {
            facing: FacingMode::User,
            ideal_width: cfg.ideal_width,
            ideal_height: cfg.ideal_height,
        }
    }
}

/// A live media stream.
pub trait VideoStream {
    /// Most recent decoded frame, if one is available yet.
    fn latest_frame(&mut self) -> Option<VideoFrame>;
    /// Halt every track. Must be safe to call more than once.
    fn stop(&mut self);
}

/// Host camera seam.
pub trait CameraDevice {
    /// Acquire a stream matching `constraints`.
    fn open(
        &mut self,
        constraints: &CameraConstraints,
    ) -> Result<Box<dyn VideoStream>, CameraAccessError>;
}

/// Serves one still image as a live stream.
#[derive(Clone, Debug)]
pub struct StillImageCamera {
    frame: VideoFrame,
    refuse: Option<CameraAccessError>,
}

impl StillImageCamera {
    /// Camera that always shows `frame`.
    pub fn new(frame: VideoFrame) -> Self {
        Self {
            frame,
            refuse: None,
        }
    }

    /// Camera that shows a decoded image.
    pub fn from_image(image: &PreparedImage) -> Self {
        Self::new(image.to_video_frame())
    }

    /// Camera whose `open` always fails with `err`.
    pub fn refusing(frame: VideoFrame, err: CameraAccessError) -> Self {
        Self {
            frame,
            refuse: Some(err),
        }
    }
}

struct StillStream {
    frame: VideoFrame,
    live: bool,
}

impl VideoStream for StillStream {
    fn latest_frame(&mut self) -> Option<VideoFrame> {
        self.live.then(|| self.frame.clone())
    }

    fn stop(&mut self) {
        self.live = false;
    }
}

impl CameraDevice for StillImageCamera {
    fn open(
        &mut self,
        _constraints: &CameraConstraints,
    ) -> Result<Box<dyn VideoStream>, CameraAccessError> {
        if let Some(err) = self.refuse {
            return Err(err);
        }
        Ok(Box::new(StillStream {
            frame: self.frame.clone(),
            live: true,
        }))
    }
}

/// Camera lifecycle as seen by the UI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraState {
    /// No stream.
    Idle,
    /// Stream attached and playing.
    Live,
    /// Last start attempt failed; retry with `start`.
    Failed(CameraAccessError),
}

/// Owns at most one live stream.
pub struct CameraSession {
    device: Box<dyn CameraDevice>,
    constraints: CameraConstraints,
    stream: Option<Box<dyn VideoStream>>,
    state: CameraState,
}

impl std::fmt::Debug for CameraSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraSession")
            .field("constraints", &self.constraints)
            .field("state", &self.state)
            .finish()
    }
}

impl CameraSession {
    /// Idle session over `device`.
    pub fn new(device: Box<dyn CameraDevice>, constraints: CameraConstraints) -> Self {
        Self {
            device,
            constraints,
            stream: None,
            state: CameraState::Idle,
        }
    }

    /// Acquire and attach a stream. Calling it while live keeps the existing stream.
    pub fn start(&mut self) -> Result<(), CameraAccessError> {
        if self.stream.is_some() {
            return Ok(());
        }
        match self.device.open(&self.constraints) {
            Ok(stream) => {
                info!(
                    width = self.constraints.ideal_width,
                    height = self.constraints.ideal_height,
                    "camera started"
                );
                self.stream = Some(stream);
                self.state = CameraState::Live;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "camera start failed");
                self.state = CameraState::Failed(e);
                Err(e)
            }
        }
    }

    /// Halt and detach the stream. Returns `true` when a stream was stopped.
    pub fn stop(&mut self) -> bool {
        let stopped = match self.stream.take() {
            Some(mut stream) => {
                stream.stop();
                info!("camera stopped");
                true
            }
            None => false,
        };
        self.state = CameraState::Idle;
        stopped
    }

    /// Latest frame while live.
    pub fn current_frame(&mut self) -> Option<VideoFrame> {
        self.stream.as_mut()?.latest_frame()
    }

    /// Lifecycle state.
    pub fn state(&self) -> CameraState {
        self.state
    }

    /// Return `true` while a stream is attached.
    pub fn is_live(&self) -> bool {
        self.stream.is_some()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/camera.rs"]
mod tests;
