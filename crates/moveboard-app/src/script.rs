//! Scripted sessions: a JSON list of board commands replayed in order.

use kurbo::{Size, Vec2};
use moveboard_core::{
    Board, Color, DragEvent, Geometry, GeometryError, RectId, RectangleSpec, ResizeEvent,
    ResizeHandle,
};
use serde::Deserialize;

/// One step of a resize gesture.
///
/// Without `dx`/`dy` the origin shift is derived from the handle so the
/// opposite edges stay fixed.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ResizeStep {
    #[serde(default)]
    pub dx: Option<f64>,
    #[serde(default)]
    pub dy: Option<f64>,
    pub width: f64,
    pub height: f64,
}

/// A single scripted command.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    Add {
        #[serde(default)]
        geometry: Option<Geometry>,
        #[serde(default)]
        color: Option<Color>,
    },
    Select {
        id: RectId,
    },
    ClearSelection,
    Remove {
        id: RectId,
    },
    /// Drag through cumulative translations; the last one ends the gesture.
    Drag {
        id: RectId,
        steps: Vec<[f64; 2]>,
    },
    /// Resize through the given steps; the last one ends the gesture.
    Resize {
        id: RectId,
        handle: ResizeHandle,
        steps: Vec<ResizeStep>,
    },
    /// Drag that loses the pointer before it ends.
    InterruptedDrag {
        id: RectId,
        steps: Vec<[f64; 2]>,
    },
}

/// Parse a script from JSON.
pub fn parse(json: &str) -> Result<Vec<Command>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Replay `commands` against `board`.
///
/// Commands that target unknown rectangles are skipped. A gesture that
/// cannot be clamped is logged and leaves the rectangle in its last
/// committed state.
pub fn run(board: &mut Board, commands: &[Command]) {
    for command in commands {
        if let Err(err) = apply(board, command) {
            log::warn!("Command {:?} failed: {}", command, err);
        }
    }
}

fn apply(board: &mut Board, command: &Command) -> Result<(), GeometryError> {
    match command {
        Command::Add { geometry, color } => {
            let spec = RectangleSpec {
                geometry: *geometry,
                color: *color,
            };
            let id = board.add_rectangle(spec);
            log::info!("Added rectangle {}", id);
        }
        Command::Select { id } => board.select(*id),
        Command::ClearSelection => board.clear_selection(),
        Command::Remove { id } => {
            if board.remove_rectangle(*id).is_none() {
                log::debug!("Remove of unknown rectangle {} skipped", id);
            }
        }
        Command::Drag { id, steps } => {
            if !board.begin_drag(*id) {
                return Ok(());
            }
            let (last, intermediate) = split_last(steps);
            for &[dx, dy] in intermediate {
                board.drag(*id, DragEvent::new(dx, dy))?;
            }
            let [dx, dy] = last.unwrap_or([0.0, 0.0]);
            board.end_drag(*id, DragEvent::new(dx, dy))?;
        }
        Command::Resize { id, handle, steps } => {
            let Some(original) = board.rectangle(*id).map(|rect| rect.geometry.size) else {
                return Ok(());
            };
            if !board.begin_resize(*id) {
                return Ok(());
            }
            let (last, intermediate) = split_last(steps);
            for step in intermediate {
                board.resize(*id, resize_event(*handle, original, step));
            }
            let last = last.unwrap_or(ResizeStep {
                dx: None,
                dy: None,
                width: original.width,
                height: original.height,
            });
            board.end_resize(*id, resize_event(*handle, original, &last))?;
        }
        Command::InterruptedDrag { id, steps } => {
            if !board.begin_drag(*id) {
                return Ok(());
            }
            for &[dx, dy] in steps {
                board.drag(*id, DragEvent::new(dx, dy))?;
            }
            board.cancel_gesture();
        }
    }
    Ok(())
}

fn split_last<T: Copy>(steps: &[T]) -> (Option<T>, &[T]) {
    match steps.split_last() {
        Some((last, rest)) => (Some(*last), rest),
        None => (None, &[]),
    }
}

fn resize_event(handle: ResizeHandle, original: Size, step: &ResizeStep) -> ResizeEvent {
    let size = Size::new(step.width, step.height);
    let anchored = ResizeEvent::anchored(handle, original, size);
    let translation = Vec2::new(
        step.dx.unwrap_or(anchored.translation.x),
        step.dy.unwrap_or(anchored.translation.y),
    );
    ResizeEvent::new(handle, translation, size)
}
