use crate::tracking::anchor::{AnchorPose, AnchorSlot};
use crate::transform::linear::lerp;
use crate::transform::non_linear::{clamp01, normalize_degrees, shortest_degrees};

/// Default smoothing factor.
pub const DEFAULT_SMOOTHING: f64 = 0.22;

/// Exponential smoothing step.
///
/// `x`, `y` and `scale` move toward `next` by `t`; rotation moves along the shortest arc and the
/// result is wrapped into `(-180, 180]`. With no history the raw pose is returned unchanged.
pub fn smooth(prev: Option<AnchorPose>, next: AnchorPose, t: f64) -> AnchorPose {
    let Some(prev) = prev else {
        return next;
    };
    let t = clamp01(t);
    AnchorPose {
        x: lerp(prev.x, next.x, t),
        y: lerp(prev.y, next.y, t),
        scale: lerp(prev.scale, next.scale, t),
        rotation_deg: normalize_degrees(
            prev.rotation_deg + shortest_degrees(prev.rotation_deg, next.rotation_deg) * t,
        ),
    }
}

/// Smoothing history, one entry per [`AnchorSlot`].
#[derive(Clone, Debug, PartialEq)]
pub struct TemporalSmoother {
    t: f64,
    history: [Option<AnchorPose>; 3],
}

impl Default for TemporalSmoother {
    fn default() -> Self {
        Self::new(DEFAULT_SMOOTHING)
    }
}

impl TemporalSmoother {
    /// Empty history with smoothing factor `t`.
    pub fn new(t: f64) -> Self {
        Self {
            t: clamp01(t),
            history: [None; 3],
        }
    }

    /// Feed a raw pose and return the smoothed one.
    pub fn update(&mut self, slot: AnchorSlot, raw: AnchorPose) -> AnchorPose {
        let out = smooth(self.history[slot.index()], raw, self.t);
        self.history[slot.index()] = Some(out);
        out
    }

    /// Last emitted pose for `slot`.
    pub fn get(&self, slot: AnchorSlot) -> Option<AnchorPose> {
        self.history[slot.index()]
    }

    /// Forget all history.
    pub fn reset(&mut self) {
        self.history = [None; 3];
    }

    /// Return `true` when no slot has history.
    pub fn is_empty(&self) -> bool {
        self.history.iter().all(Option::is_none)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tracking/smoother.rs"]
mod tests;
