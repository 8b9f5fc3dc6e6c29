//! Object-fit: cover sizing.
//!
//! # Algorithm
//!
//! The effective image aspect ratio is compared to the cell aspect ratio:
//! ```text
//! eff > cell  =>  base_h = cell_h, base_w = cell_h * eff   (fit height)
//! otherwise   =>  base_w = cell_w, base_h = cell_w / eff   (fit width)
//! ```
//! For rotations within 1° of 90 or 270 the image width and height are
//! swapped before the comparison. Other angles use the natural dimensions.

use serde::{Deserialize, Serialize};

use crate::transform::normalize_rotation;

/// Tolerance in degrees for treating a rotation as a right angle.
const RIGHT_ANGLE_TOLERANCE: f64 = 1.0;

/// Measured size of a grid cell, in preview or export pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellSize {
    pub width: f64,
    pub height: f64,
}

impl CellSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// A cell with a positive, finite area.
    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    #[inline]
    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }
}

/// Unscaled cover-fit size of an image in a cell, in the cell's frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseFit {
    pub width: f64,
    pub height: f64,
}

impl BaseFit {
    /// Returned for cells that cannot be fitted against.
    pub const UNBOUNDED: BaseFit = BaseFit {
        width: f64::INFINITY,
        height: f64::INFINITY,
    };

    /// True only for the [`BaseFit::UNBOUNDED`] sentinel (both axes infinite).
    pub fn is_unbounded(&self) -> bool {
        self.width.is_infinite() && self.height.is_infinite()
    }
}

/// Whether `rotation` (degrees) exchanges width and height for fitting.
pub fn swaps_dimensions(rotation: f64) -> bool {
    if !rotation.is_finite() {
        return false;
    }
    let r = normalize_rotation(rotation);
    (r - 90.0).abs() < RIGHT_ANGLE_TOLERANCE || (r - 270.0).abs() < RIGHT_ANGLE_TOLERANCE
}

/// Cover-fit size of an `img_w` x `img_h` image in `cell` at `rotation` degrees.
///
/// The result always satisfies `width >= cell.width` and
/// `height >= cell.height`. An unusable cell yields [`BaseFit::UNBOUNDED`];
/// an image without area fits the cell exactly.
pub fn base_fit(img_w: f64, img_h: f64, cell: CellSize, rotation: f64) -> BaseFit {
    if !cell.is_usable() {
        return BaseFit::UNBOUNDED;
    }
    let image_usable = img_w.is_finite() && img_h.is_finite() && img_w > 0.0 && img_h > 0.0;
    if !image_usable {
        return BaseFit {
            width: cell.width,
            height: cell.height,
        };
    }

    let (eff_w, eff_h) = if swaps_dimensions(rotation) {
        (img_h, img_w)
    } else {
        (img_w, img_h)
    };
    let eff_aspect = eff_w / eff_h;

    if eff_aspect > cell.aspect() {
        BaseFit {
            width: cell.height * eff_aspect,
            height: cell.height,
        }
    } else {
        BaseFit {
            width: cell.width,
            height: cell.width / eff_aspect,
        }
    }
}

/// Size to draw the image at, in the image's own (pre-rotation) frame.
///
/// This is [`base_fit`] with width and height exchanged back for right-angle
/// rotations, so that after the rotation is applied the drawn image covers
/// the cell with exactly the extent `base_fit` reports.
pub fn draw_size(img_w: f64, img_h: f64, cell: CellSize, rotation: f64) -> BaseFit {
    let fit = base_fit(img_w, img_h, cell, rotation);
    if swaps_dimensions(rotation) {
        BaseFit {
            width: fit.height,
            height: fit.width,
        }
    } else {
        fit
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f64 = 1e-6;

    fn rotation_strategy() -> impl Strategy<Value = f64> {
        prop_oneof![
            Just(0.0),
            Just(90.0),
            Just(180.0),
            Just(270.0),
            0.0f64..360.0,
        ]
    }

    proptest! {
        /// Property: the fit always covers the cell.
        #[test]
        fn prop_cover_invariant(
            img_w in 1u32..=8000,
            img_h in 1u32..=8000,
            cell_w in 1.0f64..3000.0,
            cell_h in 1.0f64..3000.0,
            rotation in rotation_strategy(),
        ) {
            let cell = CellSize::new(cell_w, cell_h);
            let fit = base_fit(img_w as f64, img_h as f64, cell, rotation);
            prop_assert!(fit.width >= cell_w - EPS * cell_w);
            prop_assert!(fit.height >= cell_h - EPS * cell_h);
        }

        /// Property: one axis matches the cell exactly.
        #[test]
        fn prop_one_axis_exact(
            img_w in 1u32..=8000,
            img_h in 1u32..=8000,
            cell_w in 1.0f64..3000.0,
            cell_h in 1.0f64..3000.0,
        ) {
            let fit = base_fit(img_w as f64, img_h as f64, CellSize::new(cell_w, cell_h), 0.0);
            prop_assert!(fit.width == cell_w || fit.height == cell_h);
        }

        /// Property: the fit preserves the effective aspect ratio.
        #[test]
        fn prop_aspect_preserved(
            img_w in 1u32..=8000,
            img_h in 1u32..=8000,
            cell_w in 1.0f64..3000.0,
            cell_h in 1.0f64..3000.0,
            rotation in rotation_strategy(),
        ) {
            let fit = draw_size(img_w as f64, img_h as f64, CellSize::new(cell_w, cell_h), rotation);
            let source = img_w as f64 / img_h as f64;
            prop_assert!(((fit.width / fit.height) - source).abs() <= 1e-9 * source.max(1.0));
        }
    }
}
