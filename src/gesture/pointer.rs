use crate::foundation::core::{Canvas, Point};

/// Host-assigned pointer identifier, stable from down to up/cancel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointerId(pub i64);

/// Input device behind a pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// Mouse; never takes part in pinch gestures.
    Mouse,
    /// Finger on a touch surface.
    Touch,
    /// Stylus.
    Pen,
}

/// Pointer down/move/up/cancel payload in client (CSS pixel) coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    /// Pointer identifier.
    pub id: PointerId,
    /// Device kind.
    pub kind: PointerKind,
    /// Client-space position.
    pub position: Point,
}

impl PointerEvent {
    /// Mouse event with id 1.
    pub fn mouse(x: f64, y: f64) -> Self {
        Self {
            id: PointerId(1),
            kind: PointerKind::Mouse,
            position: Point::new(x, y),
        }
    }

    /// Touch event for finger `id`.
    pub fn touch(id: i64, x: f64, y: f64) -> Self {
        Self {
            id: PointerId(id),
            kind: PointerKind::Touch,
            position: Point::new(x, y),
        }
    }
}

/// Keyboard modifiers held during a wheel event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Shift key.
    pub shift: bool,
    /// Alt/Option key.
    pub alt: bool,
}

impl Modifiers {
    /// Return `true` when the wheel should rotate instead of zoom.
    pub fn rotates(self) -> bool {
        self.shift || self.alt
    }
}

/// Wheel payload.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WheelEvent {
    /// Vertical delta as reported by the host; positive scrolls down.
    pub delta_y: f64,
    /// Modifier state.
    pub modifiers: Modifiers,
}

/// Maps client coordinates onto the device-pixel backing surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceGeometry {
    /// Client-space position of the surface's top-left corner.
    pub origin: Point,
    /// Effective device pixel ratio (integer, at least 1).
    pub dpr: f64,
}

impl Default for SurfaceGeometry {
    fn default() -> Self {
        Self {
            origin: Point::ORIGIN,
            dpr: 1.0,
        }
    }
}

/// Floor the raw device pixel ratio and keep it at least 1.
pub fn effective_dpr(raw: f64) -> f64 {
    if raw.is_finite() { raw.floor().max(1.0) } else { 1.0 }
}

/// Backing-store size for a client area: `max(2, floor(client * dpr))` per side.
pub fn backing_size(client_width: f64, client_height: f64, raw_dpr: f64) -> Canvas {
    let dpr = effective_dpr(raw_dpr);
    let side = |v: f64| {
        let px = (v * dpr).floor();
        if px.is_finite() && px > 2.0 {
            px.min(f64::from(u32::MAX)) as u32
        } else {
            2
        }
    };
    Canvas::new(side(client_width), side(client_height))
}

impl SurfaceGeometry {
    /// Geometry for a surface at `origin` with a raw device pixel ratio.
    pub fn new(origin: Point, raw_dpr: f64) -> Self {
        Self {
            origin,
            dpr: effective_dpr(raw_dpr),
        }
    }

    /// Convert a client position to device-pixel surface coordinates.
    pub fn to_surface(&self, client: Point) -> Point {
        ((client - self.origin) * self.dpr).to_point()
    }
}
