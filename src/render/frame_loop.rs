use tracing::{debug, trace};

use crate::assets::decode::PreparedImage;
use crate::assets::loader::ImageLoader;
use crate::config::EngineConfig;
use crate::foundation::core::{Affine, Canvas, Rect, Rgba8Premul, Size, Vec2, VideoFrame};
use crate::foundation::error::TryOnResult;
use crate::render::background::{cover_fit, draw_checkerboard, draw_video_cover};
use crate::render::overlay::{OverlayPainter, glasses_placeholder_rects, outline_rects};
use crate::render::surface::{FrameRGBA, Surface};
use crate::scene::layers::{Layer, LayerStore};
use crate::tracking::anchor::AnchorPose;
use crate::tracking::face_tracker::FaceTracker;
use crate::transform::model::{ScaleRange, Transform};

/// Opaque id of a scheduled tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Display-synced tick source (e.g. `requestAnimationFrame`).
pub trait FrameScheduler {
    /// Ask for one tick; the host calls back into the loop when it fires.
    fn request_frame(&mut self) -> FrameHandle;
    /// Cancel a tick that has not fired yet.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Scheduler for hosts that pump ticks themselves; records the pending request.
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    next: u64,
    pending: Option<FrameHandle>,
    cancelled: u64,
}

impl ManualScheduler {
    /// Idle scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request waiting to fire.
    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Number of cancelled requests.
    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next += 1;
        let h = FrameHandle(self.next);
        self.pending = Some(h);
        h
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
            self.cancelled += 1;
        }
    }
}

/// Drawing parameters resolved from [`EngineConfig`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderStyle {
    /// Mirror the video horizontally.
    pub mirror: bool,
    /// Checkerboard square side.
    pub checker_block: u32,
    /// Checkerboard color at the origin.
    pub checker_even: Rgba8Premul,
    /// Alternate checkerboard color.
    pub checker_odd: Rgba8Premul,
    /// Placeholder outline color.
    pub placeholder_color: Rgba8Premul,
    /// Placeholder frame side for manual layers.
    pub placeholder_size: f64,
    /// Placeholder stroke width.
    pub placeholder_line: f64,
    /// Scale bounds.
    pub scale_range: ScaleRange,
}

impl RenderStyle {
    /// Resolve colors and sizes from a validated configuration.
    pub fn from_config(cfg: &EngineConfig) -> TryOnResult<Self> {
        let (checker_even, checker_odd) = cfg.checker.colors()?;
        Ok(Self {
            mirror: cfg.mirror,
            checker_block: cfg.checker.block_px,
            checker_even,
            checker_odd,
            placeholder_color: cfg.placeholder.rgba()?,
            placeholder_size: cfg.placeholder.size_px,
            placeholder_line: cfg.placeholder.line_px,
            scale_range: cfg.scale_range,
        })
    }
}

/// Everything one tick reads.
#[derive(Clone, Copy)]
pub struct RenderInputs<'a> {
    /// Latest live video frame; `None` draws the checkerboard.
    pub frame: Option<&'a VideoFrame>,
    /// Placed layers.
    pub layers: &'a LayerStore,
    /// Decoded overlay images.
    pub images: &'a ImageLoader,
    /// Smoothed face poses, in video-rectangle coordinates.
    pub tracker: &'a FaceTracker,
}

/// Canonical per-frame compositor with a cancellable, restartable tick schedule.
pub struct RenderLoop {
    surface: Surface,
    painter: OverlayPainter,
    style: RenderStyle,
    scheduler: Box<dyn FrameScheduler>,
    pending: Option<FrameHandle>,
    mounted: bool,
    frames_rendered: u64,
}

impl std::fmt::Debug for RenderLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderLoop")
            .field("canvas", &self.surface.canvas())
            .field("style", &self.style)
            .field("pending", &self.pending)
            .field("mounted", &self.mounted)
            .field("frames_rendered", &self.frames_rendered)
            .finish()
    }
}

impl RenderLoop {
    /// Unmounted loop drawing into a surface of size `canvas`.
    pub fn new(canvas: Canvas, style: RenderStyle, scheduler: Box<dyn FrameScheduler>) -> Self {
        Self {
            surface: Surface::new(canvas),
            painter: OverlayPainter::new(),
            style,
            scheduler,
            pending: None,
            mounted: false,
            frames_rendered: 0,
        }
    }

    /// Start ticking: request the first frame. No-op when already mounted.
    pub fn mount(&mut self) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        self.pending = Some(self.scheduler.request_frame());
        debug!("render loop mounted");
    }

    /// Stop ticking and cancel the pending request.
    pub fn unmount(&mut self) {
        if let Some(h) = self.pending.take() {
            self.scheduler.cancel_frame(h);
        }
        if self.mounted {
            debug!("render loop unmounted");
        }
        self.mounted = false;
    }

    /// Return `true` while mounted.
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Request waiting to fire, if any.
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Resize the backing surface; returns `false` when unchanged.
    pub fn resize(&mut self, canvas: Canvas) -> bool {
        self.surface.resize(canvas)
    }

    /// Current surface size.
    pub fn canvas(&self) -> Canvas {
        self.surface.canvas()
    }

    /// Drawing parameters.
    pub fn style(&self) -> RenderStyle {
        self.style
    }

    /// Cover-fitted video rectangle for a frame on the current surface.
    pub fn video_rect(&self, frame: &VideoFrame) -> Rect {
        cover_fit(
            Size::new(f64::from(frame.width), f64::from(frame.height)),
            self.surface.size(),
        )
    }

    /// One scheduled tick: composite, then request the next tick while mounted.
    #[tracing::instrument(skip_all, fields(frame = self.frames_rendered))]
    pub fn tick(&mut self, inputs: RenderInputs<'_>) -> TryOnResult<()> {
        self.pending = None;
        let out = self.render(inputs);
        if self.mounted {
            self.pending = Some(self.scheduler.request_frame());
        }
        out
    }

    /// Composite one frame without touching the schedule.
    pub fn render(&mut self, inputs: RenderInputs<'_>) -> TryOnResult<()> {
        self.surface.clear();
        let video_rect = match inputs.frame {
            Some(frame) => Some(draw_video_cover(&mut self.surface, frame, self.style.mirror)),
            None => {
                draw_checkerboard(
                    &mut self.surface,
                    self.style.checker_block,
                    self.style.checker_even,
                    self.style.checker_odd,
                );
                None
            }
        };

        self.painter.begin(self.surface.canvas())?;
        for layer in inputs.layers.layers() {
            let t = inputs.layers.resolved_transform(layer);
            let image = inputs.images.image_for(&layer.id);
            let archetype = layer
                .category
                .and_then(|c| c.archetype())
                .filter(|_| inputs.tracker.is_enabled());
            match archetype {
                Some(archetype) => {
                    let Some(rect) = video_rect else {
                        continue;
                    };
                    for slot in archetype.slots() {
                        let Some(pose) = inputs.tracker.pose(*slot) else {
                            continue;
                        };
                        let pose = pose.placed(rect, self.style.mirror, self.surface.size().width);
                        self.draw_face_locked(pose, t, image)?;
                    }
                }
                None => self.draw_manual(layer, t, image)?,
            }
        }
        trace!(draws = self.painter.draws(), "overlays recorded");
        self.painter.finish(&mut self.surface)?;
        self.frames_rendered += 1;
        Ok(())
    }

    fn draw_face_locked(
        &mut self,
        pose: AnchorPose,
        t: Transform,
        image: Option<&PreparedImage>,
    ) -> TryOnResult<()> {
        let base = Affine::translate(Vec2::new(pose.x + t.x, pose.y + t.y))
            * Affine::rotate(pose.rotation_deg.to_radians() + t.rotation);
        let width = pose.scale * t.effective_scale(self.style.scale_range);
        match image {
            Some(img) => {
                let k = width / f64::from(img.width);
                let tr = base
                    * Affine::scale(k)
                    * Affine::translate(Vec2::new(
                        -f64::from(img.width) / 2.0,
                        -f64::from(img.height) / 2.0,
                    ));
                self.painter.draw_image(img, tr, t.opacity)
            }
            None => self.painter.fill_rects(
                &glasses_placeholder_rects(width, self.style.placeholder_line),
                base,
                self.style.placeholder_color,
                t.opacity,
            ),
        }
    }

    fn draw_manual(
        &mut self,
        layer: &Layer,
        t: Transform,
        image: Option<&PreparedImage>,
    ) -> TryOnResult<()> {
        let anchor = layer.anchor_mode.anchor_point(self.surface.size());
        let base = t.to_affine(anchor, self.style.scale_range);
        match image {
            Some(img) => {
                let tr = base * Affine::translate(layer.anchor_mode.image_offset(img.size()));
                self.painter.draw_image(img, tr, t.opacity)
            }
            None => {
                let side = self.style.placeholder_size;
                let size = Size::new(side, side);
                let frame =
                    Rect::from_origin_size(layer.anchor_mode.image_offset(size).to_point(), size);
                self.painter.fill_rects(
                    &outline_rects(frame, self.style.placeholder_line),
                    base,
                    self.style.placeholder_color,
                    t.opacity,
                )
            }
        }
    }

    /// Number of frames composited so far.
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Copy of the last composited frame, premultiplied.
    pub fn snapshot(&self) -> Option<FrameRGBA> {
        (self.frames_rendered > 0).then(|| self.surface.snapshot())
    }

    /// PNG bytes of the last composited frame, or `None` before the first frame.
    pub fn capture_png(&self) -> TryOnResult<Option<Vec<u8>>> {
        self.snapshot().map(|f| f.encode_png()).transpose()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame_loop.rs"]
mod tests;
