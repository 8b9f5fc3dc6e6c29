//! Preview and export compositing.
//!
//! Both compositors build the same [`CellPlacement`] for an image in a cell
//! and differ only in how they realise it:
//!
//! - **Preview** turns it into a CSS transform for an `<img>` element
//! - **Export** inverse-maps every canvas pixel through it and samples the
//!   source raster
//!
//! # Transform Order
//!
//! Anchored at the centre of the cell:
//! 1. Translate to the cell centre
//! 2. Translate by the pan offset (0.1 % of the unscaled draw size per unit)
//! 3. Rotate clockwise by `rotation` degrees
//! 4. Scale by `zoom / 100`
//! 5. Draw the image centred at the origin at its cover-fit draw size

mod export;
mod placement;
mod preview;
mod sample;

pub use export::{export, export_filename, render, ExportConfig, ExportedImage};
pub use placement::CellPlacement;
pub use preview::{preview_style, PreviewSize, PreviewStyle};
pub use sample::InterpolationFilter;
