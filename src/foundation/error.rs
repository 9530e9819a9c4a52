/// Convenience result type used across the engine.
pub type TryOnResult<T> = Result<T, TryOnError>;

/// Why the camera could not be started.
///
/// Both cases are recoverable: the host shows [`CameraAccessError::user_message`] and the user
/// may retry `start()`.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraAccessError {
    /// The user or platform refused camera permission.
    #[error("camera access denied")]
    Denied,
    /// No usable device, or the device is held by another application.
    #[error("camera unavailable")]
    Unavailable,
}

impl CameraAccessError {
    /// Message suitable for display next to the preview surface.
    pub fn user_message(self) -> &'static str {
        match self {
            Self::Denied => "Camera access was denied. Please enable permissions and retry.",
            Self::Unavailable => {
                "Unable to start camera. Check device permissions or if another app is using the camera."
            }
        }
    }
}

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum TryOnError {
    /// Invalid caller-provided data (config, catalog, landmark frames).
    #[error("validation error: {0}")]
    Validation(String),

    /// Camera acquisition failed.
    #[error("camera error: {0}")]
    Camera(#[from] CameraAccessError),

    /// An overlay image could not be fetched or decoded.
    #[error("image load failed for '{source_ref}': {reason}")]
    ImageLoad {
        /// The image source that failed.
        source_ref: String,
        /// Human-readable failure reason.
        reason: String,
    },

    /// The face landmark detector could not be initialized.
    #[error("face detection unavailable: {0}")]
    DetectionUnavailable(String),

    /// Errors while drawing or encoding a frame.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TryOnError {
    /// Build a [`TryOnError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`TryOnError::ImageLoad`] value.
    pub fn image_load(source_ref: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ImageLoad {
            source_ref: source_ref.into(),
            reason: reason.into(),
        }
    }

    /// Build a [`TryOnError::DetectionUnavailable`] value.
    pub fn detection_unavailable(msg: impl Into<String>) -> Self {
        Self::DetectionUnavailable(msg.into())
    }

    /// Build a [`TryOnError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`TryOnError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
