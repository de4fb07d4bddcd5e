//! Moveboard Core Library
//!
//! Geometry and state engine for a board of movable, resizable rectangles
//! confined to a container. Rendering and pointer input belong to the host;
//! this crate owns the rectangles, the selection, the bounds clamping and the
//! live/committed gesture protocol.

pub mod board;
pub mod clamp;
pub mod config;
pub mod container;
pub mod decoration;
pub mod handles;
pub mod selection;
pub mod shapes;
pub mod store;
pub mod transform;

pub use board::{Board, BoardSnapshot};
pub use clamp::{GeometryError, GeometryResult, clamp};
pub use config::{BoardConfig, ConfigError, ContainerConfig, DecorationConfig};
pub use container::{ContainerBox, ContainerGeometry, FixedContainer, ViewportContainer};
pub use decoration::{DecorationError, DecorationEvent, DecorationManager, PhotoSource};
pub use handles::ResizeHandle;
pub use selection::SelectionController;
pub use shapes::{Color, Geometry, RectId, Rectangle};
pub use store::{RectangleSpec, RectangleStore, Snapshot, StoreEvent};
pub use transform::{DragEvent, GestureKind, GestureState, ResizeEvent, TransformEngine};

#[cfg(feature = "http")]
pub use decoration::HttpPhotoSource;
