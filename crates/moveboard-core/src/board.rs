//! The board: store, selection, gestures and decorations wired together.

use crate::clamp::GeometryResult;
use crate::config::BoardConfig;
use crate::container::{ContainerBox, ContainerGeometry};
use crate::decoration::{DecorationEvent, DecorationManager, PhotoSource};
use crate::handles::{HANDLE_HIT_TOLERANCE, ResizeHandle, hit_test_handles};
use crate::selection::SelectionController;
use crate::shapes::{RectId, Rectangle};
use crate::store::{RectangleSpec, RectangleStore, Snapshot, StoreEvent};
use crate::transform::{DragEvent, GestureState, ResizeEvent, TransformEngine};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// What a renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardSnapshot {
    pub container: ContainerBox,
    pub rectangles: Vec<Rectangle>,
    pub selected: Option<RectId>,
}

/// A board session.
///
/// All mutations run synchronously on the caller's thread. Only decoration
/// lookups run elsewhere, and their results are applied in
/// [`Board::poll_decorations`].
pub struct Board {
    /// Unique session identifier.
    pub id: String,
    container: Box<dyn ContainerGeometry>,
    store: RectangleStore,
    selection: SelectionController,
    engine: TransformEngine,
    decorations: DecorationManager,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(&BoardConfig::default())
    }
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Board")
            .field("id", &self.id)
            .field("container", &self.container_box())
            .field("store", &self.store)
            .field("selection", &self.selection)
            .field("engine", &self.engine)
            .field("decorations", &self.decorations)
            .finish()
    }
}

impl Board {
    /// Create an empty board from configuration.
    ///
    /// Decorations stay off until a source is installed with
    /// [`Board::set_photo_source`], even when the configuration enables them.
    pub fn new(config: &BoardConfig) -> Self {
        let board = Self {
            id: Uuid::new_v4().to_string(),
            container: config.container.build(),
            store: RectangleStore::with_default_geometry(config.default_rectangle),
            selection: SelectionController::new(),
            engine: TransformEngine::new(),
            decorations: DecorationManager::new(),
        };
        log::info!("Created board {} with container {:?}", board.id, board.container_box());
        board
    }

    /// Create an empty board with default settings inside `container`.
    pub fn with_container(container: impl ContainerGeometry + 'static) -> Self {
        let mut board = Self::default();
        board.set_container(container);
        board
    }

    /// Replace the container provider.
    pub fn set_container(&mut self, container: impl ContainerGeometry + 'static) {
        self.container = Box::new(container);
    }

    /// Current container box.
    pub fn container_box(&self) -> ContainerBox {
        self.container.container_box()
    }

    /// Install (or remove) the decorative photo source.
    pub fn set_photo_source(&mut self, source: Option<Arc<dyn PhotoSource>>) {
        self.decorations.set_source(source);
    }

    /// Add a rectangle and start its decoration lookup.
    pub fn add_rectangle(&mut self, spec: RectangleSpec) -> RectId {
        let id = self.store.add(spec);
        self.decorations.request(id);
        id
    }

    /// Remove a rectangle, clearing the selection and any work bound to it.
    pub fn remove_rectangle(&mut self, id: RectId) -> Option<Rectangle> {
        let removed = self.store.remove(id)?;
        self.selection.on_removed(id);
        self.engine.forget(id);
        self.decorations.cancel(id);
        Some(removed)
    }

    /// Select a rectangle. No existence check is made.
    pub fn select(&mut self, id: RectId) {
        self.selection.select(id);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selected(&self) -> Option<RectId> {
        self.selection.current()
    }

    /// The selected rectangle, if the selection points at one.
    pub fn selected_rectangle(&self) -> Option<&Rectangle> {
        self.selection.current().and_then(|id| self.store.get(id))
    }

    /// Current snapshot of all rectangles in insertion order.
    pub fn rectangles(&self) -> Snapshot {
        self.store.list()
    }

    pub fn rectangle(&self, id: RectId) -> Option<&Rectangle> {
        self.store.get(id)
    }

    pub fn store(&self) -> &RectangleStore {
        &self.store
    }

    pub fn gesture_state(&self) -> GestureState {
        self.engine.state()
    }

    /// Everything a renderer needs in one value.
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            container: self.container_box(),
            rectangles: self.store.list().to_vec(),
            selected: self.selection.current(),
        }
    }

    /// Topmost rectangle under a point given in container coordinates.
    pub fn rectangle_at(&self, point: kurbo::Point) -> Option<RectId> {
        self.store
            .list()
            .iter()
            .rev()
            .find(|rect| rect.hit_test(point))
            .map(Rectangle::id)
    }

    /// Resize handle of the selected rectangle under a point, if any.
    pub fn handle_at(&self, point: kurbo::Point) -> Option<ResizeHandle> {
        let rect = self.selected_rectangle()?;
        hit_test_handles(rect.bounds(), point, HANDLE_HIT_TOLERANCE)
    }

    pub fn begin_drag(&mut self, id: RectId) -> bool {
        self.engine.begin_drag(&mut self.store, id)
    }

    pub fn drag(&mut self, id: RectId, event: DragEvent) -> GeometryResult<Option<Rectangle>> {
        let container = self.container_box();
        self.engine.drag(&mut self.store, &container, id, event)
    }

    pub fn end_drag(&mut self, id: RectId, event: DragEvent) -> GeometryResult<Option<Rectangle>> {
        let container = self.container_box();
        self.engine.end_drag(&mut self.store, &container, id, event)
    }

    pub fn begin_resize(&mut self, id: RectId) -> bool {
        self.engine.begin_resize(&mut self.store, id)
    }

    pub fn resize(&mut self, id: RectId, event: ResizeEvent) -> Option<Rectangle> {
        self.engine.resize(&mut self.store, id, event)
    }

    pub fn end_resize(
        &mut self,
        id: RectId,
        event: ResizeEvent,
    ) -> GeometryResult<Option<Rectangle>> {
        let container = self.container_box();
        self.engine.end_resize(&mut self.store, &container, id, event)
    }

    /// Abort the gesture in flight, restoring its last committed state.
    pub fn cancel_gesture(&mut self) -> Option<Rectangle> {
        self.engine.cancel(&mut self.store)
    }

    /// Apply finished decoration lookups to the store.
    pub fn poll_decorations(&mut self) -> Vec<DecorationEvent> {
        let events = self.decorations.poll();
        self.apply_decorations(&events);
        events
    }

    /// Like [`Board::poll_decorations`] but waits up to `timeout` for every
    /// pending lookup to finish.
    pub fn wait_decorations(&mut self, timeout: Duration) -> Vec<DecorationEvent> {
        let events = self.decorations.wait(timeout);
        self.apply_decorations(&events);
        events
    }

    fn apply_decorations(&mut self, events: &[DecorationEvent]) {
        for event in events {
            match event {
                DecorationEvent::Loaded { id, url } => {
                    self.store.set_image(*id, url.clone());
                }
                DecorationEvent::Failed { id, error } => {
                    log::warn!("Decoration for rectangle {} failed: {}", id, error);
                }
            }
        }
    }

    /// Take all store change notifications since the last call.
    pub fn drain_events(&mut self) -> Vec<StoreEvent> {
        self.store.drain_events()
    }
}
