//! Stateless layout math for callers that keep their own state.
//!
//! Unbounded results come back as `Infinity`.

use postcard_core::geometry::{self, CellSize};
use postcard_core::grid::{CanvasLayout, PaddingSpec};
use postcard_core::transform::Transform;
use wasm_bindgen::prelude::*;

/// Cover-fit size `[width, height]` of an image in a cell at `rotation` degrees.
#[wasm_bindgen]
pub fn base_fit(img_w: f64, img_h: f64, cell_w: f64, cell_h: f64, rotation: f64) -> Vec<f64> {
    let fit = geometry::base_fit(img_w, img_h, CellSize::new(cell_w, cell_h), rotation);
    vec![fit.width, fit.height]
}

/// Maximum pan offsets `[max_x, max_y]` for an image in a cell.
#[wasm_bindgen]
pub fn max_offsets(
    img_w: f64,
    img_h: f64,
    cell_w: f64,
    cell_h: f64,
    zoom: f64,
    rotation: f64,
) -> Vec<f64> {
    let transform = Transform {
        zoom,
        rotation,
        ..Transform::default()
    };
    let bounds = geometry::max_offsets(img_w, img_h, Some(CellSize::new(cell_w, cell_h)), &transform);
    vec![bounds.max_x, bounds.max_y]
}

/// Cell rectangles of a canvas as `[x, y, width, height]` for cells 0 to 3.
#[wasm_bindgen]
pub fn canvas_layout(width: f64, height: f64, padding_width: f64) -> Vec<f64> {
    let padding = PaddingSpec {
        width: padding_width,
        ..PaddingSpec::default()
    };
    CanvasLayout::new(width, height, &padding)
        .cells
        .iter()
        .flat_map(|r| [r.x, r.y, r.width, r.height])
        .collect()
}
