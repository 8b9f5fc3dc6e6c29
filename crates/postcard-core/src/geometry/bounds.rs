//! Maximum pan offsets that keep a cell fully covered.

use super::fit::{base_fit, CellSize};
use crate::transform::Transform;

/// Symmetric pan limits: offsets must stay within `[-max, max]` per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanBounds {
    pub max_x: f64,
    pub max_y: f64,
}

impl PanBounds {
    /// No limit, used until cell geometry is known.
    pub const UNBOUNDED: PanBounds = PanBounds {
        max_x: f64::INFINITY,
        max_y: f64::INFINITY,
    };

    /// True only for the [`PanBounds::UNBOUNDED`] sentinel (both axes infinite).
    pub fn is_unbounded(&self) -> bool {
        self.max_x.is_infinite() && self.max_y.is_infinite()
    }

    /// The tighter of two bounds on each axis.
    pub fn intersect(self, other: PanBounds) -> PanBounds {
        PanBounds {
            max_x: self.max_x.min(other.max_x),
            max_y: self.max_y.min(other.max_y),
        }
    }

    /// Clamp an offset pair into these bounds.
    pub fn clamp(&self, x: f64, y: f64) -> (f64, f64) {
        (x.clamp(-self.max_x, self.max_x), y.clamp(-self.max_y, self.max_y))
    }
}

impl Default for PanBounds {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

/// Pan limits for an `img_w` x `img_h` image shown with `transform` in `cell`.
///
/// ```text
/// rendered = base_fit(rotation) * zoom / 100
/// max      = max(0, (rendered - cell) / 2)
/// ```
/// A missing or unusable cell yields [`PanBounds::UNBOUNDED`].
pub fn max_offsets(
    img_w: f64,
    img_h: f64,
    cell: Option<CellSize>,
    transform: &Transform,
) -> PanBounds {
    let Some(cell) = cell.filter(CellSize::is_usable) else {
        return PanBounds::UNBOUNDED;
    };

    let fit = base_fit(img_w, img_h, cell, transform.rotation);
    let scale = transform.scale();
    let rendered_w = fit.width * scale;
    let rendered_h = fit.height * scale;

    PanBounds {
        max_x: ((rendered_w - cell.width) / 2.0).max(0.0),
        max_y: ((rendered_h - cell.height) / 2.0).max(0.0),
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
