//! Resize handles around a selected rectangle.

use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Handle hit tolerance in canvas pixels.
pub const HANDLE_HIT_TOLERANCE: f64 = 8.0;

/// One of the eight resize handles, named by compass direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    Nw,
    N,
    Ne,
    W,
    E,
    Sw,
    S,
    Se,
}

impl ResizeHandle {
    /// All handles, in rendering order.
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::Nw,
        ResizeHandle::N,
        ResizeHandle::Ne,
        ResizeHandle::W,
        ResizeHandle::E,
        ResizeHandle::Sw,
        ResizeHandle::S,
        ResizeHandle::Se,
    ];

    /// Direction pair: -1 moves the near edge, 1 the far edge, 0 neither.
    pub fn direction(self) -> (i8, i8) {
        match self {
            ResizeHandle::Nw => (-1, -1),
            ResizeHandle::N => (0, -1),
            ResizeHandle::Ne => (1, -1),
            ResizeHandle::W => (-1, 0),
            ResizeHandle::E => (1, 0),
            ResizeHandle::Sw => (-1, 1),
            ResizeHandle::S => (0, 1),
            ResizeHandle::Se => (1, 1),
        }
    }

    /// Look up the handle for a direction pair as reported by a host.
    pub fn from_direction(x: i8, y: i8) -> Option<Self> {
        Self::ALL.into_iter().find(|handle| handle.direction() == (x, y))
    }

    /// Origin translation that keeps the opposite edge fixed.
    ///
    /// Dragging a west or north handle grows the rectangle towards the
    /// origin, so the origin moves by exactly the change in that dimension.
    pub fn origin_shift(self, original: Size, resized: Size) -> Vec2 {
        let (dx, dy) = self.direction();
        let x = if dx < 0 { original.width - resized.width } else { 0.0 };
        let y = if dy < 0 { original.height - resized.height } else { 0.0 };
        Vec2::new(x, y)
    }

    /// Where this handle sits on `bounds`.
    pub fn position(self, bounds: Rect) -> Point {
        let (dx, dy) = self.direction();
        let x = match dx {
            -1 => bounds.x0,
            0 => bounds.center().x,
            _ => bounds.x1,
        };
        let y = match dy {
            -1 => bounds.y0,
            0 => bounds.center().y,
            _ => bounds.y1,
        };
        Point::new(x, y)
    }
}

/// Find which handle (if any) of `bounds` is hit at the given point.
pub fn hit_test_handles(bounds: Rect, point: Point, tolerance: f64) -> Option<ResizeHandle> {
    ResizeHandle::ALL.into_iter().find(|handle| {
        let position = handle.position(bounds);
        let dx = point.x - position.x;
        let dy = point.y - position.y;
        dx * dx + dy * dy <= tolerance * tolerance
    })
}
