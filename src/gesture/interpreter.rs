use smallvec::SmallVec;
use tracing::trace;

use crate::config::WheelConfig;
use crate::foundation::core::Point;
use crate::gesture::pointer::{PointerEvent, PointerId, PointerKind, SurfaceGeometry, WheelEvent};
use crate::scene::layers::LayerStore;
use crate::transform::model::TransformPatch;

/// What the host should do with an input event after the interpreter saw it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureResponse {
    /// Not consumed; default handling may proceed.
    Ignored,
    /// Consumed without changing any transform.
    Handled,
    /// Consumed and the active layer changed.
    Changed,
}

impl GestureResponse {
    /// Return `true` when the host should suppress default handling (scrolling, text selection).
    pub fn consumed(self) -> bool {
        !matches!(self, Self::Ignored)
    }

    /// Return `true` when the active layer changed.
    pub fn changed(self) -> bool {
        matches!(self, Self::Changed)
    }

    fn from_changed(changed: bool) -> Self {
        if changed { Self::Changed } else { Self::Handled }
    }
}

/// Current gesture phase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureState {
    /// No pointer down.
    Idle,
    /// One pointer drags the active layer.
    Panning {
        /// Pointer driving the pan.
        pointer: PointerId,
        /// Last seen position in surface pixels.
        last: Point,
    },
    /// Two touches scale and rotate the active layer.
    PinchRotate {
        /// Distance between the touches at pinch start.
        start_distance: f64,
        /// Angle of the touch pair at pinch start, radians.
        start_angle: f64,
        /// Active layer scale at pinch start.
        start_scale: f64,
        /// Active layer rotation at pinch start.
        start_rotation: f64,
    },
}

/// Pointer/wheel state machine editing the active layer of a [`LayerStore`].
///
/// All coordinates are converted to device-pixel surface space before any math.
#[derive(Clone, Debug)]
pub struct GestureInterpreter {
    geometry: SurfaceGeometry,
    wheel: WheelConfig,
    state: GestureState,
    touches: SmallVec<[(PointerId, Point); 4]>,
    captured: SmallVec<[PointerId; 4]>,
}

impl Default for GestureInterpreter {
    fn default() -> Self {
        Self::new(WheelConfig::default())
    }
}

impl GestureInterpreter {
    /// Idle interpreter with the given wheel mapping.
    pub fn new(wheel: WheelConfig) -> Self {
        Self {
            geometry: SurfaceGeometry::default(),
            wheel,
            state: GestureState::Idle,
            touches: SmallVec::new(),
            captured: SmallVec::new(),
        }
    }

    /// Update the client-to-surface mapping (after a resize or scroll).
    pub fn set_geometry(&mut self, geometry: SurfaceGeometry) {
        self.geometry = geometry;
    }

    /// Current client-to-surface mapping.
    pub fn geometry(&self) -> SurfaceGeometry {
        self.geometry
    }

    /// Current phase.
    pub fn state(&self) -> GestureState {
        self.state
    }

    /// Return `true` while `id` is captured.
    pub fn is_captured(&self, id: PointerId) -> bool {
        self.captured.contains(&id)
    }

    /// Drop all pointers and return to idle.
    pub fn reset(&mut self) {
        self.state = GestureState::Idle;
        self.touches.clear();
        self.captured.clear();
    }

    fn pinch_geometry(&self) -> Option<(f64, f64)> {
        let (a, b) = (self.touches.first()?.1, self.touches.get(1)?.1);
        let d = b - a;
        Some((d.hypot(), d.y.atan2(d.x)))
    }

    fn start_pinch(&mut self, store: &LayerStore) {
        let Some((start_distance, start_angle)) = self.pinch_geometry() else {
            return;
        };
        let (start_scale, start_rotation) = store
            .active_layer()
            .map(|l| (l.transform.scale, l.transform.rotation))
            .unwrap_or((1.0, 0.0));
        trace!(start_distance, start_angle, "pinch started");
        self.state = GestureState::PinchRotate {
            start_distance,
            start_angle,
            start_scale,
            start_rotation,
        };
    }

    /// Pointer pressed: capture it, start panning, or start a pinch on the second touch.
    pub fn pointer_down(&mut self, store: &LayerStore, ev: PointerEvent) -> GestureResponse {
        let p = self.geometry.to_surface(ev.position);
        if !self.captured.contains(&ev.id) {
            self.captured.push(ev.id);
        }

        if ev.kind != PointerKind::Mouse {
            match self.touches.iter_mut().find(|(id, _)| *id == ev.id) {
                Some(t) => t.1 = p,
                None => self.touches.push((ev.id, p)),
            }
            if self.touches.len() == 2 {
                self.start_pinch(store);
                return GestureResponse::Handled;
            }
            if self.touches.len() > 2 {
                return GestureResponse::Handled;
            }
        }

        self.state = GestureState::Panning {
            pointer: ev.id,
            last: p,
        };
        GestureResponse::Handled
    }

    /// Pointer moved: pan by the delta since the last move, or update the pinch.
    pub fn pointer_move(&mut self, store: &mut LayerStore, ev: PointerEvent) -> GestureResponse {
        if !self.captured.contains(&ev.id) {
            return GestureResponse::Ignored;
        }
        let p = self.geometry.to_surface(ev.position);
        if let Some(t) = self.touches.iter_mut().find(|(id, _)| *id == ev.id) {
            t.1 = p;
        }

        match self.state {
            GestureState::Idle => GestureResponse::Handled,
            GestureState::Panning { pointer, last } => {
                if pointer != ev.id {
                    return GestureResponse::Handled;
                }
                self.state = GestureState::Panning { pointer, last: p };
                let d = p - last;
                let Some(t) = store.active_layer().map(|l| l.transform) else {
                    return GestureResponse::Handled;
                };
                let changed =
                    store.update_active(&TransformPatch::position(t.x + d.x, t.y + d.y));
                GestureResponse::from_changed(changed)
            }
            GestureState::PinchRotate {
                start_distance,
                start_angle,
                start_scale,
                start_rotation,
            } => {
                let Some((dist, angle)) = self.pinch_geometry() else {
                    return GestureResponse::Handled;
                };
                let ratio = if start_distance > f64::EPSILON {
                    dist / start_distance
                } else {
                    1.0
                };
                let changed = store.update_active(&TransformPatch {
                    scale: Some(start_scale * ratio),
                    rotation: Some(start_rotation + (angle - start_angle)),
                    ..TransformPatch::default()
                });
                GestureResponse::from_changed(changed)
            }
        }
    }

    /// Pointer released: release capture. A single remaining touch resumes panning from where
    /// it is, a touch pair restarts the pinch unless the running pinch is unaffected, and
    /// releasing every pointer returns to idle.
    pub fn pointer_up(&mut self, store: &LayerStore, ev: PointerEvent) -> GestureResponse {
        if !self.captured.contains(&ev.id) {
            return GestureResponse::Ignored;
        }
        let pair_changed = self.touches.iter().take(2).any(|(id, _)| *id == ev.id);
        self.captured.retain(|id| *id != ev.id);
        self.touches.retain(|(id, _)| *id != ev.id);

        if self.captured.is_empty() {
            self.reset();
            return GestureResponse::Handled;
        }
        let pan_lost = match self.state {
            GestureState::Panning { pointer, .. } => pointer == ev.id,
            GestureState::PinchRotate { .. } => true,
            GestureState::Idle => false,
        };
        match self.touches.len() {
            0 if pan_lost => self.state = GestureState::Idle,
            0 => {}
            1 if pan_lost => {
                let (pointer, last) = self.touches[0];
                self.state = GestureState::Panning { pointer, last };
            }
            1 => {}
            _ if pair_changed || !matches!(self.state, GestureState::PinchRotate { .. }) => {
                self.start_pinch(store)
            }
            _ => {}
        }
        GestureResponse::Handled
    }

    /// Pointer cancelled by the host; same as release.
    pub fn pointer_cancel(&mut self, store: &LayerStore, ev: PointerEvent) -> GestureResponse {
        self.pointer_up(store, ev)
    }

    /// Wheel: zoom by a fixed factor per notch, or rotate with Shift/Alt.
    ///
    /// The event is always consumed so the page does not scroll.
    pub fn wheel(&mut self, store: &mut LayerStore, ev: WheelEvent) -> GestureResponse {
        let delta = -ev.delta_y;
        if !delta.is_finite() || delta == 0.0 {
            return GestureResponse::Handled;
        }
        let Some(t) = store.active_layer().map(|l| l.transform) else {
            return GestureResponse::Handled;
        };
        let patch = if ev.modifiers.rotates() {
            TransformPatch::rotation(t.rotation + delta * self.wheel.rotate_rad_per_unit)
        } else {
            let factor = if delta > 0.0 {
                self.wheel.zoom_in_factor
            } else {
                self.wheel.zoom_out_factor
            };
            TransformPatch::scale(t.scale * factor)
        };
        GestureResponse::from_changed(store.update_active(&patch))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gesture/interpreter.rs"]
mod tests;
