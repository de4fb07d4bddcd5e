//! Container box and the providers that report it.

use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Bounding box of the canvas area that constrains every rectangle.
///
/// `origin` locates the box on the canvas; rectangles are positioned
/// relative to it, so clamping only looks at `size`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContainerBox {
    pub origin: Point,
    pub size: Size,
}

impl ContainerBox {
    /// Create a box from its canvas origin and size.
    pub fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// A box of the given size anchored at the canvas origin.
    pub fn sized(width: f64, height: f64) -> Self {
        Self::new(Point::ZERO, Size::new(width, height))
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

    /// Whether both dimensions are finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        self.size.width.is_finite()
            && self.size.height.is_finite()
            && self.size.width > 0.0
            && self.size.height > 0.0
    }

    /// The box in canvas coordinates.
    pub fn as_rect(&self) -> Rect {
        Rect::from_origin_size(self.origin, self.size)
    }
}

/// Read-only source of the current container box.
pub trait ContainerGeometry {
    /// The container's bounding box in canvas coordinates.
    fn container_box(&self) -> ContainerBox;
}

impl ContainerGeometry for ContainerBox {
    fn container_box(&self) -> ContainerBox {
        *self
    }
}

/// A container with an explicit, unchanging box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedContainer {
    bounds: ContainerBox,
}

impl FixedContainer {
    pub fn new(bounds: ContainerBox) -> Self {
        Self { bounds }
    }
}

impl ContainerGeometry for FixedContainer {
    fn container_box(&self) -> ContainerBox {
        self.bounds
    }
}

/// A container sized as a fraction of the host viewport.
///
/// The board area of the host page is 80% of the viewport in each
/// direction by default; when the viewport changes the box follows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportContainer {
    viewport: Size,
    fraction: Size,
    origin: Point,
}

impl ViewportContainer {
    /// Default share of the viewport taken by the container on each axis.
    pub const DEFAULT_FRACTION: f64 = 0.8;

    /// Create a container covering `fraction` of `viewport` on each axis.
    pub fn new(viewport: Size, fraction: Size) -> Self {
        Self {
            viewport,
            fraction,
            origin: Point::ZERO,
        }
    }

    /// Place the container at a canvas origin (e.g. below a toolbar).
    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    /// Track a host viewport resize.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }
}

impl ContainerGeometry for ViewportContainer {
    fn container_box(&self) -> ContainerBox {
        ContainerBox::new(
            self.origin,
            Size::new(
                self.viewport.width * self.fraction.width,
                self.viewport.height * self.fraction.height,
            ),
        )
    }
}
