//! Keeping rectangles inside their container.

use crate::container::ContainerBox;
use crate::shapes::Geometry;
use kurbo::Point;
use thiserror::Error;

/// Geometry errors.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeometryError {
    #[error("Invalid container: {width}x{height} has no positive area")]
    InvalidContainer { width: f64, height: f64 },
}

/// Result type for geometry operations.
pub type GeometryResult<T> = Result<T, GeometryError>;

/// Reposition `geometry` so it lies inside `container` whenever it can.
///
/// Only the origin moves; width and height are never touched. A rectangle
/// larger than the container on some axis ends up with a negative offset on
/// that axis, which is the defined result.
pub fn clamp(geometry: Geometry, container: &ContainerBox) -> GeometryResult<Geometry> {
    if !container.is_valid() {
        return Err(GeometryError::InvalidContainer {
            width: container.width(),
            height: container.height(),
        });
    }

    let top = clamp_axis(geometry.top(), geometry.height(), container.height());
    let left = clamp_axis(geometry.left(), geometry.width(), container.width());

    Ok(Geometry::new(Point::new(left, top), geometry.size))
}

fn clamp_axis(start: f64, extent: f64, limit: f64) -> f64 {
    if start < 0.0 {
        0.0
    } else if start + extent > limit {
        limit - extent
    } else {
        start
    }
}
