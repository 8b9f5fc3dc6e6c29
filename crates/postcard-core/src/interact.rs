//! Keyboard nudging and pointer drag sessions.
//!
//! Neither of these writes to the transform store directly. Nudges produce a
//! [`TransformUpdate`] for the clamp gateway; a drag keeps its own live
//! offsets and yields exactly one update when the pointer is released.

use crate::geometry::PanBounds;
use crate::photo::ImageId;
use crate::transform::{Transform, TransformUpdate};
use crate::DRAG_FACTOR;

/// Arrow key direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Parse a DOM `KeyboardEvent.key` value (`"ArrowUp"` etc).
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(Direction::Up),
            "ArrowDown" => Some(Direction::Down),
            "ArrowLeft" => Some(Direction::Left),
            "ArrowRight" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Unit vector in screen coordinates (y grows downward).
    fn unit(self) -> (f64, f64) {
        match self {
            Direction::Up => (0.0, -1.0),
            Direction::Down => (0.0, 1.0),
            Direction::Left => (-1.0, 0.0),
            Direction::Right => (1.0, 0.0),
        }
    }
}

/// Offset units moved per key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NudgeStep {
    #[default]
    Fine = 1,
    /// Shift held
    Coarse = 10,
}

impl NudgeStep {
    pub fn from_shift(shift: bool) -> Self {
        if shift {
            NudgeStep::Coarse
        } else {
            NudgeStep::Fine
        }
    }

    #[inline]
    pub fn amount(self) -> f64 {
        self as i32 as f64
    }
}

/// Update moving `current` one step in `direction`. Only the affected axis is set.
pub fn nudge_update(current: &Transform, direction: Direction, step: NudgeStep) -> TransformUpdate {
    let (dx, dy) = direction.unit();
    let amount = step.amount();
    if dx != 0.0 {
        TransformUpdate {
            offset_x: Some(current.offset_x + dx * amount),
            ..TransformUpdate::default()
        }
    } else {
        TransformUpdate {
            offset_y: Some(current.offset_y + dy * amount),
            ..TransformUpdate::default()
        }
    }
}

/// Mouse button that started a pointer interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Other(i16),
}

impl From<i16> for PointerButton {
    /// Map a DOM `MouseEvent.button` value.
    fn from(button: i16) -> Self {
        if button == 0 {
            PointerButton::Primary
        } else {
            PointerButton::Other(button)
        }
    }
}

/// An in-progress pan drag.
///
/// Moves update only the session's live offsets; the stored transform is
/// untouched until [`DragSession::finish`] hands back the final update.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    image_id: ImageId,
    start: (f64, f64),
    initial: (f64, f64),
    current: (f64, f64),
}

impl DragSession {
    /// Start dragging `image_id` from pointer position `pointer`.
    ///
    /// Returns `None` unless `button` is the primary button.
    pub fn begin(
        image_id: ImageId,
        button: PointerButton,
        pointer: (f64, f64),
        transform: &Transform,
    ) -> Option<Self> {
        if button != PointerButton::Primary {
            return None;
        }
        let initial = (transform.offset_x, transform.offset_y);
        Some(Self {
            image_id,
            start: pointer,
            initial,
            current: initial,
        })
    }

    pub fn image_id(&self) -> &ImageId {
        &self.image_id
    }

    /// Live offsets as of the last move.
    pub fn current(&self) -> (f64, f64) {
        self.current
    }

    /// Follow the pointer to `pointer`, clamped into `bounds`.
    ///
    /// Every pixel of pointer travel moves the image by [`DRAG_FACTOR`] offset units.
    pub fn pointer_move(&mut self, pointer: (f64, f64), bounds: PanBounds) -> (f64, f64) {
        let x = self.initial.0 + (pointer.0 - self.start.0) * DRAG_FACTOR;
        let y = self.initial.1 + (pointer.1 - self.start.1) * DRAG_FACTOR;
        if x.is_finite() && y.is_finite() {
            self.current = bounds.clamp(x, y);
        }
        self.current
    }

    /// End the drag, yielding the offset update to commit.
    pub fn finish(self) -> (ImageId, TransformUpdate) {
        let update = TransformUpdate::offsets(self.current.0, self.current.1);
        (self.image_id, update)
    }
}
