//! Authoritative collection of rectangles.

use crate::shapes::{Color, Geometry, RectId, Rectangle};
use std::sync::Arc;

/// Immutable view of the collection at one point in time, in insertion order.
pub type Snapshot = Arc<[Rectangle]>;

/// Change notifications for renderers and decoration workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    Added(RectId),
    Updated(RectId),
    Removed(RectId),
}

/// Caller-supplied values for a new rectangle. Missing fields use defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RectangleSpec {
    pub geometry: Option<Geometry>,
    pub color: Option<Color>,
}

impl RectangleSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
}

/// Owns every rectangle on the board.
///
/// Each mutation publishes a whole new [`Snapshot`], so a reader holding
/// an older one never sees a half-applied change.
#[derive(Debug, Clone)]
pub struct RectangleStore {
    records: Snapshot,
    next_id: u64,
    default_geometry: Geometry,
    events: Vec<StoreEvent>,
}

impl Default for RectangleStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RectangleStore {
    /// Create an empty store using the 100x100 default geometry.
    pub fn new() -> Self {
        Self::with_default_geometry(Geometry::default())
    }

    /// Create an empty store with a custom geometry for unspecified adds.
    pub fn with_default_geometry(default_geometry: Geometry) -> Self {
        Self {
            records: Arc::from(Vec::new()),
            next_id: 1,
            default_geometry,
            events: Vec::new(),
        }
    }

    /// Geometry used when an add does not specify one.
    pub fn default_geometry(&self) -> Geometry {
        self.default_geometry
    }

    /// Insert a new committed rectangle and return its fresh id.
    pub fn add(&mut self, spec: RectangleSpec) -> RectId {
        let id = self.allocate_id();
        let geometry = spec
            .geometry
            .filter(Geometry::has_positive_area)
            .unwrap_or(self.default_geometry);
        let color = spec.color.unwrap_or_else(Color::random);

        let mut records = self.records.to_vec();
        records.push(Rectangle::new(id, geometry, color));
        self.publish(records);
        self.notify(StoreEvent::Added(id));

        log::debug!("Added rectangle {} at {:?}", id, geometry);
        id
    }

    fn allocate_id(&mut self) -> RectId {
        let id = RectId::from_raw(self.next_id);
        self.next_id += 1;
        id
    }

    /// Replace the geometry, color and committed flag of a rectangle.
    ///
    /// Returns false (and changes nothing) when the id is unknown or the
    /// new size is not strictly positive.
    pub fn update(
        &mut self,
        id: RectId,
        geometry: Geometry,
        color: Color,
        committed: bool,
    ) -> bool {
        let Some(index) = self.index_of(id) else {
            log::debug!("Ignoring update for unknown rectangle {}", id);
            return false;
        };
        if !geometry.has_positive_area() {
            log::warn!("Rejecting update for rectangle {}: size {:?}", id, geometry.size);
            return false;
        }

        let mut records = self.records.to_vec();
        let image = records[index].image.take();
        records[index] = Rectangle {
            id,
            geometry,
            color,
            committed,
            image,
        };
        self.publish(records);
        self.notify(StoreEvent::Updated(id));
        true
    }

    /// Attach a decorative image to a rectangle. Unknown ids are ignored.
    pub fn set_image(&mut self, id: RectId, url: String) -> bool {
        let Some(index) = self.index_of(id) else {
            log::debug!("Dropping image for unknown rectangle {}", id);
            return false;
        };

        let mut records = self.records.to_vec();
        records[index].image = Some(url);
        self.publish(records);
        self.notify(StoreEvent::Updated(id));
        true
    }

    /// Remove a rectangle. Removing an absent id is a no-op.
    pub fn remove(&mut self, id: RectId) -> Option<Rectangle> {
        let index = self.index_of(id)?;

        let mut records = self.records.to_vec();
        let removed = records.remove(index);
        self.publish(records);
        self.notify(StoreEvent::Removed(id));

        log::debug!("Removed rectangle {}", id);
        Some(removed)
    }

    /// The current snapshot, in insertion order.
    pub fn list(&self) -> Snapshot {
        Arc::clone(&self.records)
    }

    /// Get a rectangle by id.
    pub fn get(&self, id: RectId) -> Option<&Rectangle> {
        self.records.iter().find(|rect| rect.id == id)
    }

    pub fn contains(&self, id: RectId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Take all change notifications queued since the last call.
    ///
    /// The queue lives until it is drained, so hosts should drain it once
    /// per frame. Back-to-back updates of the same rectangle are queued once.
    pub fn drain_events(&mut self) -> Vec<StoreEvent> {
        std::mem::take(&mut self.events)
    }

    fn index_of(&self, id: RectId) -> Option<usize> {
        self.records.iter().position(|rect| rect.id == id)
    }

    fn notify(&mut self, event: StoreEvent) {
        if matches!(event, StoreEvent::Updated(_)) && self.events.last() == Some(&event) {
            return;
        }
        self.events.push(event);
    }

    fn publish(&mut self, records: Vec<Rectangle>) {
        self.records = Arc::from(records);
    }
}
