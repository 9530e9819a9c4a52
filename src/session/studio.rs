use tracing::{debug, info, warn};

use crate::assets::loader::{AssetFetcher, ImageLoader, LoadOutcome, LoadTicket};
use crate::config::EngineConfig;
use crate::foundation::core::{Canvas, Point, Size};
use crate::foundation::error::{TryOnError, TryOnResult};
use crate::gesture::interpreter::{GestureInterpreter, GestureResponse};
use crate::gesture::pointer::{PointerEvent, SurfaceGeometry, WheelEvent};
use crate::render::frame_loop::{FrameScheduler, RenderInputs, RenderLoop, RenderStyle};
use crate::render::surface::{FrameRGBA, SurfaceSizer};
use crate::scene::catalog::{Catalog, OverlayId};
use crate::scene::layers::LayerStore;
use crate::session::camera::{CameraConstraints, CameraDevice, CameraSession, CameraState};
use crate::tracking::anchor::PoseFactors;
use crate::tracking::face_tracker::FaceTracker;
use crate::tracking::landmarks::LandmarkDetector;
use crate::transform::model::{TransformOverrides, TransformPatch};

/// Backing size used until the host reports its container.
const INITIAL_CANVAS: Canvas = Canvas {
    width: 2,
    height: 2,
};

/// The host-facing try-on surface.
///
/// Owns the layer store, gesture interpreter, image loader, face tracker, camera session and
/// render loop, and serializes every host call onto them. Hosts drive it from one thread:
/// input events and [`TryOnStudio::tick`] never overlap.
pub struct TryOnStudio {
    config: EngineConfig,
    catalog: Catalog,
    layers: LayerStore,
    gestures: GestureInterpreter,
    images: ImageLoader,
    fetcher: Option<Box<dyn AssetFetcher>>,
    tracker: FaceTracker,
    camera: CameraSession,
    render: RenderLoop,
    sizer: SurfaceSizer,
}

impl std::fmt::Debug for TryOnStudio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TryOnStudio")
            .field("layers", &self.layers)
            .field("gestures", &self.gestures)
            .field("tracker", &self.tracker)
            .field("camera", &self.camera)
            .field("render", &self.render)
            .finish_non_exhaustive()
    }
}

impl TryOnStudio {
    /// Build a studio from a validated configuration.
    pub fn new(
        config: EngineConfig,
        catalog: Catalog,
        camera: Box<dyn CameraDevice>,
        scheduler: Box<dyn FrameScheduler>,
    ) -> TryOnResult<Self> {
        config.validate()?;
        let style = RenderStyle::from_config(&config)?;
        let factors = PoseFactors {
            glasses: config.glasses_width_factor,
            earring: config.earring_width_factor,
        };
        Ok(Self {
            catalog,
            layers: LayerStore::new(config.scale_range, config.default_opacity),
            gestures: GestureInterpreter::new(config.wheel),
            images: ImageLoader::new(),
            fetcher: None,
            tracker: FaceTracker::new(factors, config.smoothing_factor, config.detect_interval),
            camera: CameraSession::new(camera, CameraConstraints::from_config(&config.camera)),
            render: RenderLoop::new(INITIAL_CANVAS, style, scheduler),
            sizer: SurfaceSizer::default(),
            config,
        })
    }

    /// Resolve overlay images through `fetcher` during [`TryOnStudio::tick`].
    pub fn with_fetcher(mut self, fetcher: Box<dyn AssetFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Start the camera. A no-op while a stream is live.
    pub fn start_camera(&mut self) -> TryOnResult<()> {
        self.camera.start().map_err(TryOnError::from)
    }

    /// Stop the camera and reset tracking and gesture state. Safe to call repeatedly.
    pub fn stop_camera(&mut self) {
        self.camera.stop();
        self.tracker.reset();
        self.gestures.reset();
    }

    /// Camera lifecycle state.
    pub fn camera_state(&self) -> CameraState {
        self.camera.state()
    }

    /// Initialize a landmark detector and switch face-anchored overlays to tracking.
    ///
    /// A failed initialization leaves the studio in manual mode and reports
    /// [`TryOnError::DetectionUnavailable`].
    pub fn enable_face_tracking<F>(&mut self, init: F) -> TryOnResult<()>
    where
        F: FnOnce() -> TryOnResult<Box<dyn LandmarkDetector>>,
    {
        match init() {
            Ok(detector) => {
                self.tracker.set_detector(detector);
                info!("face tracking enabled");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "landmark detector unavailable, staying in manual mode");
                self.tracker.clear_detector();
                Err(match e {
                    TryOnError::DetectionUnavailable(_) => e,
                    other => TryOnError::detection_unavailable(other.to_string()),
                })
            }
        }
    }

    /// Drop the detector; face-anchored overlays return to manual placement.
    pub fn disable_face_tracking(&mut self) {
        if self.tracker.is_enabled() {
            info!("face tracking disabled");
        }
        self.tracker.clear_detector();
    }

    /// Place an overlay and make it active. Returns `true` when a layer was created.
    ///
    /// Catalog overlays get their default scale and an image request; unknown ids are placed
    /// with placeholder drawing. Adding an id already placed only re-activates it.
    pub fn add_layer(&mut self, id: impl Into<OverlayId>) -> bool {
        let id = id.into();
        if self.layers.contains(&id) {
            return self.layers.add_layer(id);
        }
        match self.catalog.get(&id) {
            Some(def) => {
                let added = self.layers.add_overlay(def);
                if let Some(ticket) = self.images.request(&def.id, &def.image_source) {
                    debug!(id = %ticket.slot, source = %ticket.source, "image requested");
                }
                added
            }
            None => {
                debug!(%id, "overlay not in catalog, placing without image");
                self.layers.add_layer(id)
            }
        }
    }

    /// Remove a layer and drop its image request. Removing the active layer leaves none active.
    pub fn remove_layer(&mut self, id: &OverlayId) -> bool {
        self.images.release(id);
        self.layers.remove_layer(id)
    }

    /// Select a layer for gestures, or clear the selection. Unknown ids are rejected.
    pub fn set_active_layer(&mut self, id: Option<&OverlayId>) -> bool {
        self.layers.set_active_layer(id)
    }

    /// Merge a partial transform into one layer.
    pub fn update_layer(&mut self, id: &OverlayId, patch: &TransformPatch) -> bool {
        self.layers.update_layer(id, patch)
    }

    /// Restore the active layer's transform.
    pub fn reset_active_layer(&mut self) -> bool {
        self.layers.reset_active_layer()
    }

    /// Remove every layer and every image request.
    pub fn clear_all_layers(&mut self) {
        self.layers.clear_all_layers();
        self.images.clear();
        self.gestures.reset();
    }

    /// Caller-controlled transform fields for the active layer.
    pub fn set_overrides(&mut self, overrides: TransformOverrides) {
        self.layers.set_overrides(overrides);
    }

    /// Image requests waiting for bytes, oldest first.
    pub fn pending_image_loads(&self) -> Vec<LoadTicket> {
        self.images.pending()
    }

    /// Hand fetched bytes (or a fetch error) back for a request.
    pub fn complete_image_load(
        &mut self,
        ticket: &LoadTicket,
        bytes: TryOnResult<Vec<u8>>,
    ) -> LoadOutcome {
        self.images.complete(ticket, bytes)
    }

    fn fulfill_pending_loads(&mut self) {
        let Some(fetcher) = self.fetcher.as_deref() else {
            return;
        };
        for ticket in self.images.pending() {
            self.images.fulfill(&ticket, fetcher);
        }
    }

    /// Pointer pressed over the surface.
    pub fn pointer_down(&mut self, ev: PointerEvent) -> GestureResponse {
        self.gestures.pointer_down(&self.layers, ev)
    }

    /// Pointer moved.
    pub fn pointer_move(&mut self, ev: PointerEvent) -> GestureResponse {
        self.gestures.pointer_move(&mut self.layers, ev)
    }

    /// Pointer released.
    pub fn pointer_up(&mut self, ev: PointerEvent) -> GestureResponse {
        self.gestures.pointer_up(&self.layers, ev)
    }

    /// Pointer cancelled by the platform.
    pub fn pointer_cancel(&mut self, ev: PointerEvent) -> GestureResponse {
        self.gestures.pointer_cancel(&self.layers, ev)
    }

    /// Wheel over the surface. A consumed response means the host should suppress scrolling.
    pub fn wheel(&mut self, ev: WheelEvent) -> GestureResponse {
        self.gestures.wheel(&mut self.layers, ev)
    }

    /// Report the container's client rectangle and device pixel ratio.
    ///
    /// Returns `true` when the backing surface was resized.
    pub fn resize(&mut self, origin: Point, client_size: Size, raw_dpr: f64) -> bool {
        self.gestures.set_geometry(SurfaceGeometry::new(origin, raw_dpr));
        match self
            .sizer
            .observe(client_size.width, client_size.height, raw_dpr)
        {
            Some(canvas) => self.render.resize(canvas),
            None => false,
        }
    }

    /// Start the frame schedule.
    pub fn mount(&mut self) {
        self.render.mount();
    }

    /// Cancel the frame schedule and release the camera.
    pub fn unmount(&mut self) {
        self.render.unmount();
        self.stop_camera();
    }

    /// One scheduled tick at `timestamp_ms`: resolve images, track, composite, reschedule.
    pub fn tick(&mut self, timestamp_ms: f64) -> TryOnResult<()> {
        self.advance(timestamp_ms, true)
    }

    /// Composite one frame without touching the schedule.
    pub fn render_frame(&mut self, timestamp_ms: f64) -> TryOnResult<()> {
        self.advance(timestamp_ms, false)
    }

    fn advance(&mut self, timestamp_ms: f64, scheduled: bool) -> TryOnResult<()> {
        self.fulfill_pending_loads();

        let frame = self.camera.current_frame();
        let video = frame
            .as_ref()
            .map(|f| self.render.video_rect(f).size())
            .unwrap_or(Size::ZERO);
        self.tracker.tick(frame.as_ref(), video, timestamp_ms);

        let inputs = RenderInputs {
            frame: frame.as_ref(),
            layers: &self.layers,
            images: &self.images,
            tracker: &self.tracker,
        };
        if scheduled {
            self.render.tick(inputs)
        } else {
            self.render.render(inputs)
        }
    }

    /// PNG bytes of the last composited frame, or `None` before the first frame.
    pub fn capture_snapshot(&self) -> TryOnResult<Option<Vec<u8>>> {
        self.render.capture_png()
    }

    /// Copy of the last composited frame.
    pub fn snapshot(&self) -> Option<FrameRGBA> {
        self.render.snapshot()
    }

    /// Active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Overlay catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Placed layers.
    pub fn layers(&self) -> &LayerStore {
        &self.layers
    }

    /// Image request state.
    pub fn images(&self) -> &ImageLoader {
        &self.images
    }

    /// Gesture state.
    pub fn gestures(&self) -> &GestureInterpreter {
        &self.gestures
    }

    /// Face tracking state.
    pub fn tracker(&self) -> &FaceTracker {
        &self.tracker
    }

    /// Render loop state.
    pub fn render_loop(&self) -> &RenderLoop {
        &self.render
    }

    /// Current backing surface size.
    pub fn canvas(&self) -> Canvas {
        self.render.canvas()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/studio.rs"]
mod tests;
