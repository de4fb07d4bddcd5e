//! Rectangle record and its geometry.

use super::Color;
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Smallest width or height a rectangle may take, in canvas pixels.
pub const MIN_SIZE: f64 = 1.0;

/// Identity of a rectangle within a store. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RectId(u64);

impl RectId {
    /// Wrap a raw id value (as received from a host event).
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw id value.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl From<u64> for RectId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for RectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position and size of a rectangle in canvas coordinates.
///
/// `origin.x` is the left edge and `origin.y` the top edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "GeometryRepr", into = "GeometryRepr")]
pub struct Geometry {
    pub origin: Point,
    pub size: Size,
}

/// Flat wire form: `{ top, left, width, height }`.
#[derive(Serialize, Deserialize)]
struct GeometryRepr {
    top: f64,
    left: f64,
    width: f64,
    height: f64,
}

impl From<GeometryRepr> for Geometry {
    fn from(repr: GeometryRepr) -> Self {
        Self::from_xywh(repr.left, repr.top, repr.width, repr.height)
    }
}

impl From<Geometry> for GeometryRepr {
    fn from(geometry: Geometry) -> Self {
        Self {
            top: geometry.top(),
            left: geometry.left(),
            width: geometry.width(),
            height: geometry.height(),
        }
    }
}

impl Default for Geometry {
    /// The 100x100 square placed at the container origin.
    fn default() -> Self {
        Self::from_xywh(0.0, 0.0, 100.0, 100.0)
    }
}

impl Geometry {
    /// Create a geometry from its top-left corner and size.
    pub fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Create a geometry from left, top, width and height.
    pub fn from_xywh(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self::new(Point::new(left, top), Size::new(width, height))
    }

    pub fn top(&self) -> f64 {
        self.origin.y
    }

    pub fn left(&self) -> f64 {
        self.origin.x
    }

    pub fn width(&self) -> f64 {
        self.size.width
    }

    pub fn height(&self) -> f64 {
        self.size.height
    }

    /// Whether both dimensions are strictly positive and finite.
    pub fn has_positive_area(&self) -> bool {
        self.size.width.is_finite()
            && self.size.height.is_finite()
            && self.size.width > 0.0
            && self.size.height > 0.0
    }

    /// Same size, origin shifted by `delta`.
    pub fn translated(&self, delta: Vec2) -> Self {
        Self::new(self.origin + delta, self.size)
    }

    /// Same origin, different size.
    pub fn with_size(&self, size: Size) -> Self {
        Self::new(self.origin, size)
    }

    /// Get the geometry as a kurbo Rect.
    pub fn as_rect(&self) -> Rect {
        Rect::from_origin_size(self.origin, self.size)
    }
}

/// A rectangle on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub(crate) id: RectId,
    /// Position and size.
    #[serde(flatten)]
    pub geometry: Geometry,
    /// Solid fill color.
    pub color: Color,
    /// False while a gesture is in flight.
    pub committed: bool,
    /// Decorative background image, once one has been fetched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Rectangle {
    /// Create a committed rectangle without decoration.
    pub(crate) fn new(id: RectId, geometry: Geometry, color: Color) -> Self {
        Self {
            id,
            geometry,
            color,
            committed: true,
            image: None,
        }
    }

    pub fn id(&self) -> RectId {
        self.id
    }

    /// Bounds as a kurbo Rect.
    pub fn bounds(&self) -> Rect {
        self.geometry.as_rect()
    }

    /// Whether the point lies inside the rectangle (edges included).
    pub fn hit_test(&self, point: Point) -> bool {
        let rect = self.bounds();
        point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
    }
}
