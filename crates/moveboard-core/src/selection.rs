//! Single-selection tracking.

use crate::shapes::RectId;

/// Holds at most one selected rectangle id.
///
/// The id is a non-owning reference into the store; the board clears it
/// when the referenced rectangle is removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionController {
    selected: Option<RectId>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a rectangle, replacing any previous selection.
    pub fn select(&mut self, id: RectId) {
        self.selected = Some(id);
    }

    /// Clear the selection.
    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// The selected id, if any.
    pub fn current(&self) -> Option<RectId> {
        self.selected
    }

    pub fn is_selected(&self, id: RectId) -> bool {
        self.selected == Some(id)
    }

    /// Drop the selection if it pointed at a removed rectangle.
    pub fn on_removed(&mut self, id: RectId) {
        if self.selected == Some(id) {
            self.selected = None;
        }
    }
}
