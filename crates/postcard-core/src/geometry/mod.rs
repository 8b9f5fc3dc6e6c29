//! Cover-fit and pan-bound geometry shared by the editor and both compositors.
//!
//! Everything here is a pure function of (natural image size, cell size,
//! transform). Degenerate input never panics or divides by zero: unusable
//! cells produce [`BaseFit::UNBOUNDED`] / [`PanBounds::UNBOUNDED`], so an
//! unmeasured cell never clamps a transform to zero.

mod bounds;
mod fit;

pub use bounds::{max_offsets, PanBounds};
pub use fit::{base_fit, draw_size, swaps_dimensions, BaseFit, CellSize};
