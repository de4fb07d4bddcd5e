//! Drag and resize gestures.
//!
//! Every gesture captures the rectangle as it was when the gesture began and
//! recomputes from that original plus the cumulative pointer translation on
//! each event. Nothing is ever accumulated from a previously clamped value,
//! so a long drag along a wall cannot drift.
//!
//! Drags are clamped on every event. Resizes are written unclamped while in
//! flight and clamped once at the end, which shows up as a snap on release.

use crate::clamp::{GeometryResult, clamp};
use crate::container::ContainerBox;
use crate::handles::ResizeHandle;
use crate::shapes::{Color, Geometry, MIN_SIZE, RectId, Rectangle};
use crate::store::RectangleStore;
use kurbo::{Size, Vec2};
use serde::{Deserialize, Serialize};

/// Pointer update for a drag, relative to where the gesture started.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragEvent {
    /// Cumulative translation since the gesture began.
    pub translation: Vec2,
}

impl DragEvent {
    pub fn new(dx: f64, dy: f64) -> Self {
        Self {
            translation: Vec2::new(dx, dy),
        }
    }
}

/// Pointer update for a resize.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResizeEvent {
    /// Handle being dragged.
    pub handle: ResizeHandle,
    /// Cumulative origin translation since the gesture began.
    pub translation: Vec2,
    /// New width and height.
    pub size: Size,
}

impl ResizeEvent {
    pub fn new(handle: ResizeHandle, translation: Vec2, size: Size) -> Self {
        Self {
            handle,
            translation,
            size,
        }
    }

    /// Build an event whose origin translation keeps the edges opposite
    /// `handle` where they were.
    pub fn anchored(handle: ResizeHandle, original: Size, size: Size) -> Self {
        Self::new(handle, handle.origin_shift(original, size), size)
    }
}

/// Kind of gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureKind {
    Drag,
    Resize,
}

/// Public view of the engine's state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Active { id: RectId, kind: GestureKind },
}

#[derive(Debug, Clone)]
struct Gesture {
    id: RectId,
    kind: GestureKind,
    original: Rectangle,
}

impl Gesture {
    fn matches(&self, id: RectId, kind: GestureKind) -> bool {
        self.id == id && self.kind == kind
    }
}

/// Turns gesture events into store updates.
#[derive(Debug, Clone, Default)]
pub struct TransformEngine {
    active: Option<Gesture>,
    /// Last completed gesture, kept so a repeated end event commits the same
    /// result again.
    finished: Option<Gesture>,
}

impl TransformEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of the gesture state machine.
    pub fn state(&self) -> GestureState {
        match &self.active {
            Some(gesture) => GestureState::Active {
                id: gesture.id,
                kind: gesture.kind,
            },
            None => GestureState::Idle,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Start dragging a rectangle. Returns false if the id is unknown.
    pub fn begin_drag(&mut self, store: &mut RectangleStore, id: RectId) -> bool {
        self.begin(store, id, GestureKind::Drag)
    }

    /// Start resizing a rectangle. Returns false if the id is unknown.
    pub fn begin_resize(&mut self, store: &mut RectangleStore, id: RectId) -> bool {
        self.begin(store, id, GestureKind::Resize)
    }

    fn begin(&mut self, store: &mut RectangleStore, id: RectId, kind: GestureKind) -> bool {
        if self.active.is_some() {
            self.cancel(store);
        }
        let Some(original) = store.get(id).cloned() else {
            log::debug!("Ignoring {:?} start on unknown rectangle {}", kind, id);
            return false;
        };

        self.finished = None;
        self.active = Some(Gesture { id, kind, original });
        true
    }

    /// Apply an intermediate drag event: clamp and write uncommitted.
    pub fn drag(
        &mut self,
        store: &mut RectangleStore,
        container: &ContainerBox,
        id: RectId,
        event: DragEvent,
    ) -> GeometryResult<Option<Rectangle>> {
        let Some((original, color)) = self.active_original(id, GestureKind::Drag) else {
            log::debug!("Ignoring drag event for rectangle {} without an active drag", id);
            return Ok(None);
        };

        let clamped = clamp(original.translated(event.translation), container)?;
        Ok(self.write(store, id, clamped, color, false))
    }

    /// Apply the final drag event: clamp and commit.
    pub fn end_drag(
        &mut self,
        store: &mut RectangleStore,
        container: &ContainerBox,
        id: RectId,
        event: DragEvent,
    ) -> GeometryResult<Option<Rectangle>> {
        let Some((original, color)) = self.end_original(id, GestureKind::Drag) else {
            log::debug!("Ignoring drag end for rectangle {} without a drag", id);
            return Ok(None);
        };

        let candidate = original.translated(event.translation);
        let committed = self.clamp_or_revert(store, id, candidate, container)?;
        self.finish(id);
        Ok(self.write(store, id, committed, color, true))
    }

    /// Apply an intermediate resize event. The result is not clamped.
    pub fn resize(
        &mut self,
        store: &mut RectangleStore,
        id: RectId,
        event: ResizeEvent,
    ) -> Option<Rectangle> {
        let Some((original, color)) = self.active_original(id, GestureKind::Resize) else {
            log::debug!("Ignoring resize event for rectangle {} without an active resize", id);
            return None;
        };

        self.write(store, id, resized(original, &event), color, false)
    }

    /// Apply the final resize event: clamp and commit.
    pub fn end_resize(
        &mut self,
        store: &mut RectangleStore,
        container: &ContainerBox,
        id: RectId,
        event: ResizeEvent,
    ) -> GeometryResult<Option<Rectangle>> {
        let Some((original, color)) = self.end_original(id, GestureKind::Resize) else {
            log::debug!("Ignoring resize end for rectangle {} without a resize", id);
            return Ok(None);
        };

        let committed = self.clamp_or_revert(store, id, resized(original, &event), container)?;
        self.finish(id);
        Ok(self.write(store, id, committed, color, true))
    }

    /// Abort the active gesture and restore the rectangle it started from.
    pub fn cancel(&mut self, store: &mut RectangleStore) -> Option<Rectangle> {
        let gesture = self.active.take()?;
        log::debug!("Cancelling {:?} on rectangle {}", gesture.kind, gesture.id);

        let original = gesture.original;
        if store.update(gesture.id, original.geometry, original.color, true) {
            store.get(gesture.id).cloned()
        } else {
            None
        }
    }

    /// Drop any gesture state that refers to a removed rectangle.
    pub fn forget(&mut self, id: RectId) {
        if self.active.as_ref().is_some_and(|gesture| gesture.id == id) {
            self.active = None;
        }
        if self.finished.as_ref().is_some_and(|gesture| gesture.id == id) {
            self.finished = None;
        }
    }

    fn active_original(&self, id: RectId, kind: GestureKind) -> Option<(Geometry, Color)> {
        self.active
            .as_ref()
            .filter(|gesture| gesture.matches(id, kind))
            .map(|gesture| (gesture.original.geometry, gesture.original.color))
    }

    fn end_original(&self, id: RectId, kind: GestureKind) -> Option<(Geometry, Color)> {
        self.active_original(id, kind).or_else(|| {
            self.finished
                .as_ref()
                .filter(|gesture| gesture.matches(id, kind))
                .map(|gesture| (gesture.original.geometry, gesture.original.color))
        })
    }

    fn clamp_or_revert(
        &mut self,
        store: &mut RectangleStore,
        id: RectId,
        candidate: Geometry,
        container: &ContainerBox,
    ) -> GeometryResult<Geometry> {
        clamp(candidate, container).inspect_err(|err| {
            log::warn!("Cannot commit gesture on rectangle {}: {}", id, err);
            if self.active.as_ref().is_some_and(|gesture| gesture.id == id) {
                self.cancel(store);
            }
        })
    }

    fn finish(&mut self, id: RectId) {
        if self.active.as_ref().is_some_and(|gesture| gesture.id == id) {
            self.finished = self.active.take();
        }
    }

    fn write(
        &mut self,
        store: &mut RectangleStore,
        id: RectId,
        geometry: Geometry,
        color: Color,
        committed: bool,
    ) -> Option<Rectangle> {
        if store.update(id, geometry, color, committed) {
            store.get(id).cloned()
        } else {
            // The rectangle went away mid-gesture.
            self.forget(id);
            None
        }
    }
}

fn resized(original: Geometry, event: &ResizeEvent) -> Geometry {
    let width = event.size.width.max(MIN_SIZE);
    let height = event.size.height.max(MIN_SIZE);

    // A floored west or north edge must still meet the fixed opposite edge.
    let (dx, dy) = event.handle.direction();
    let mut translation = event.translation;
    if dx < 0 {
        translation.x += event.size.width - width;
    }
    if dy < 0 {
        translation.y += event.size.height - height;
    }
    Geometry::new(original.origin + translation, Size::new(width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::Color;
    use crate::store::RectangleSpec;

    fn container() -> ContainerBox {
        ContainerBox::sized(800.0, 600.0)
    }

    fn store_with_square() -> (RectangleStore, RectId) {
        let mut store = RectangleStore::new();
        let id = store.add(
            RectangleSpec::new()
                .with_geometry(Geometry::from_xywh(0.0, 0.0, 100.0, 100.0))
                .with_color(Color::Blue),
        );
        (store, id)
    }

    #[test]
    fn test_drag_past_right_edge_commits_clamped() {
        let (mut store, id) = store_with_square();
        let mut engine = TransformEngine::new();

        assert!(engine.begin_drag(&mut store, id));
        let live = engine
            .drag(&mut store, &container(), id, DragEvent::new(900.0, 0.0))
            .unwrap()
            .unwrap();
        assert!(!live.committed);
        assert_eq!(live.geometry, Geometry::from_xywh(700.0, 0.0, 100.0, 100.0));

        let done = engine
            .end_drag(&mut store, &container(), id, DragEvent::new(900.0, 0.0))
            .unwrap()
            .unwrap();
        assert!(done.committed);
        assert_eq!(done.geometry, Geometry::from_xywh(700.0, 0.0, 100.0, 100.0));
        assert_eq!(done.color, Color::Blue);
        assert_eq!(engine.state(), GestureState::Idle);
    }

    #[test]
    fn test_drag_is_drift_free() {
        let total = Vec2::new(-300.0, 750.0);
        let expected = clamp(
            Geometry::from_xywh(0.0, 0.0, 100.0, 100.0).translated(total),
            &container(),
        )
        .unwrap();

        for steps in [1usize, 2, 7, 64] {
            let (mut store, id) = store_with_square();
            let mut engine = TransformEngine::new();
            engine.begin_drag(&mut store, id);

            for step in 1..steps {
                let t = total * (step as f64 / steps as f64);
                engine
                    .drag(&mut store, &container(), id, DragEvent { translation: t })
                    .unwrap();
            }
            let done = engine
                .end_drag(&mut store, &container(), id, DragEvent { translation: total })
                .unwrap()
                .unwrap();
            assert_eq!(done.geometry, expected, "steps = {steps}");
        }
    }

    #[test]
    fn test_drag_along_wall_returns_to_start() {
        // Push into the left wall and come back: a clamp-then-accumulate
        // implementation would end up shifted.
        let (mut store, id) = store_with_square();
        store.update(id, Geometry::from_xywh(50.0, 50.0, 100.0, 100.0), Color::Blue, true);
        let mut engine = TransformEngine::new();
        engine.begin_drag(&mut store, id);

        for dx in [-20.0, -80.0, -200.0, -80.0, -20.0] {
            engine
                .drag(&mut store, &container(), id, DragEvent::new(dx, 0.0))
                .unwrap();
        }
        let done = engine
            .end_drag(&mut store, &container(), id, DragEvent::new(0.0, 0.0))
            .unwrap()
            .unwrap();
        assert_eq!(done.geometry, Geometry::from_xywh(50.0, 50.0, 100.0, 100.0));
    }

    #[test]
    fn test_resize_top_left_live_then_snap() {
        let (mut store, id) = store_with_square();
        let mut engine = TransformEngine::new();
        let event = ResizeEvent::new(
            ResizeHandle::Nw,
            Vec2::new(-50.0, -50.0),
            Size::new(150.0, 150.0),
        );

        assert!(engine.begin_resize(&mut store, id));
        let live = engine.resize(&mut store, id, event).unwrap();
        assert!(!live.committed);
        assert!((live.geometry.top() - -50.0).abs() < f64::EPSILON);
        assert!((live.geometry.left() - -50.0).abs() < f64::EPSILON);

        let done = engine
            .end_resize(&mut store, &container(), id, event)
            .unwrap()
            .unwrap();
        assert!(done.committed);
        assert_eq!(done.geometry, Geometry::from_xywh(0.0, 0.0, 150.0, 150.0));
    }

    #[test]
    fn test_anchored_resize_keeps_opposite_corner() {
        let (mut store, id) = store_with_square();
        store.update(id, Geometry::from_xywh(200.0, 200.0, 100.0, 100.0), Color::Blue, true);
        let mut engine = TransformEngine::new();
        engine.begin_resize(&mut store, id);

        let event = ResizeEvent::anchored(
            ResizeHandle::Nw,
            Size::new(100.0, 100.0),
            Size::new(60.0, 130.0),
        );
        let done = engine
            .end_resize(&mut store, &container(), id, event)
            .unwrap()
            .unwrap();
        let bounds = done.bounds();
        assert!((bounds.x1 - 300.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 300.0).abs() < f64::EPSILON);
        assert!((bounds.x0 - 240.0).abs() < f64::EPSILON);
        assert!((bounds.y0 - 170.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resize_floors_size() {
        let (mut store, id) = store_with_square();
        let mut engine = TransformEngine::new();
        engine.begin_resize(&mut store, id);
        let event = ResizeEvent::new(ResizeHandle::Se, Vec2::ZERO, Size::new(-10.0, 0.0));
        let live = engine.resize(&mut store, id, event).unwrap();
        assert!((live.geometry.width() - MIN_SIZE).abs() < f64::EPSILON);
        assert!((live.geometry.height() - MIN_SIZE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_anchored_shrink_past_zero_keeps_opposite_corner() {
        let (mut store, id) = store_with_square();
        store.update(id, Geometry::from_xywh(200.0, 200.0, 100.0, 100.0), Color::Blue, true);
        let mut engine = TransformEngine::new();
        engine.begin_resize(&mut store, id);

        let event = ResizeEvent::anchored(
            ResizeHandle::Nw,
            Size::new(100.0, 100.0),
            Size::new(-10.0, -10.0),
        );
        let live = engine.resize(&mut store, id, event).unwrap();
        assert_eq!(live.geometry, Geometry::from_xywh(299.0, 299.0, MIN_SIZE, MIN_SIZE));

        let done = engine
            .end_resize(&mut store, &container(), id, event)
            .unwrap()
            .unwrap();
        let bounds = done.bounds();
        assert!((bounds.x0 - 299.0).abs() < f64::EPSILON);
        assert!((bounds.y0 - 299.0).abs() < f64::EPSILON);
        assert!((bounds.x1 - 300.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 300.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_floored_south_west_resize_keeps_top_right() {
        let (mut store, id) = store_with_square();
        store.update(id, Geometry::from_xywh(200.0, 200.0, 100.0, 100.0), Color::Blue, true);
        let mut engine = TransformEngine::new();
        engine.begin_resize(&mut store, id);

        let event = ResizeEvent::anchored(
            ResizeHandle::Sw,
            Size::new(100.0, 100.0),
            Size::new(-20.0, -5.0),
        );
        let live = engine.resize(&mut store, id, event).unwrap();
        assert_eq!(live.geometry, Geometry::from_xywh(299.0, 200.0, MIN_SIZE, MIN_SIZE));
    }

    #[test]
    fn test_repeated_end_resize_is_idempotent() {
        let (mut store, id) = store_with_square();
        let mut engine = TransformEngine::new();
        engine.begin_resize(&mut store, id);

        let event = ResizeEvent::new(
            ResizeHandle::Nw,
            Vec2::new(-50.0, -50.0),
            Size::new(150.0, 150.0),
        );
        engine.resize(&mut store, id, event).unwrap();
        let first = engine
            .end_resize(&mut store, &container(), id, event)
            .unwrap()
            .unwrap();
        let second = engine
            .end_resize(&mut store, &container(), id, event)
            .unwrap()
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(first.geometry, Geometry::from_xywh(0.0, 0.0, 150.0, 150.0));
        assert!(second.committed);
        assert_eq!(store.get(id), Some(&second));
        assert_eq!(engine.state(), GestureState::Idle);
    }

    #[test]
    fn test_repeated_end_is_idempotent() {
        let (mut store, id) = store_with_square();
        let mut engine = TransformEngine::new();
        engine.begin_drag(&mut store, id);

        let event = DragEvent::new(120.0, 40.0);
        let first = engine
            .end_drag(&mut store, &container(), id, event)
            .unwrap()
            .unwrap();
        let second = engine
            .end_drag(&mut store, &container(), id, event)
            .unwrap()
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(store.get(id), Some(&first));
    }

    #[test]
    fn test_events_without_gesture_are_ignored() {
        let (mut store, id) = store_with_square();
        let before = store.list();
        let mut engine = TransformEngine::new();

        let result = engine.drag(&mut store, &container(), id, DragEvent::new(5.0, 5.0));
        assert!(result.unwrap().is_none());
        let event = ResizeEvent::new(ResizeHandle::E, Vec2::ZERO, Size::new(10.0, 10.0));
        assert!(engine.resize(&mut store, id, event).is_none());

        engine.begin_drag(&mut store, id);
        assert!(engine.resize(&mut store, id, event).is_none());
        assert_eq!(store.list(), before);
    }

    #[test]
    fn test_begin_unknown_id() {
        let mut store = RectangleStore::new();
        let mut engine = TransformEngine::new();
        assert!(!engine.begin_drag(&mut store, RectId::from_raw(9)));
        assert_eq!(engine.state(), GestureState::Idle);
    }

    #[test]
    fn test_cancel_restores_original() {
        let (mut store, id) = store_with_square();
        let original = store.get(id).cloned().unwrap();
        let mut engine = TransformEngine::new();

        engine.begin_drag(&mut store, id);
        engine
            .drag(&mut store, &container(), id, DragEvent::new(300.0, 300.0))
            .unwrap();
        assert!(!store.get(id).unwrap().committed);

        let restored = engine.cancel(&mut store).unwrap();
        assert_eq!(restored, original);
        assert!(!engine.is_active());
    }

    #[test]
    fn test_new_gesture_cancels_previous() {
        let mut store = RectangleStore::new();
        let a = store.add(RectangleSpec::new().with_color(Color::Red));
        let b = store.add(RectangleSpec::new().with_color(Color::Green));
        let mut engine = TransformEngine::new();

        engine.begin_drag(&mut store, a);
        engine
            .drag(&mut store, &container(), a, DragEvent::new(40.0, 40.0))
            .unwrap();
        engine.begin_resize(&mut store, b);

        let rect_a = store.get(a).unwrap();
        assert!(rect_a.committed);
        assert_eq!(rect_a.geometry, Geometry::default());
        assert_eq!(
            engine.state(),
            GestureState::Active {
                id: b,
                kind: GestureKind::Resize
            }
        );
    }

    #[test]
    fn test_removed_mid_gesture() {
        let (mut store, id) = store_with_square();
        let mut engine = TransformEngine::new();
        engine.begin_drag(&mut store, id);
        store.remove(id);

        let result = engine
            .drag(&mut store, &container(), id, DragEvent::new(10.0, 10.0))
            .unwrap();
        assert!(result.is_none());
        assert!(store.is_empty());
        assert!(!engine.is_active());
    }

    #[test]
    fn test_invalid_container_keeps_committed_state() {
        let (mut store, id) = store_with_square();
        let original = store.get(id).cloned().unwrap();
        let mut engine = TransformEngine::new();
        let broken = ContainerBox::sized(0.0, 0.0);

        engine.begin_drag(&mut store, id);
        assert!(engine.drag(&mut store, &broken, id, DragEvent::new(5.0, 0.0)).is_err());
        assert_eq!(store.get(id), Some(&original));

        engine
            .drag(&mut store, &container(), id, DragEvent::new(5.0, 0.0))
            .unwrap();
        assert!(engine.end_drag(&mut store, &broken, id, DragEvent::new(5.0, 0.0)).is_err());
        assert_eq!(store.get(id), Some(&original));
        assert!(!engine.is_active());
    }
}
