//! CSS rendering instructions for the live preview.
//!
//! The UI positions each photo as an absolutely placed `<img>` with
//! `top: 50%; left: 50%` inside its cell and applies [`PreviewStyle`].
//! CSS applies the transform list right to left, which yields exactly the
//! order used by the export compositor.

use serde::Serialize;

use crate::geometry::{draw_size, CellSize};
use crate::transform::Transform;
use crate::PAN_UNIT;

/// Element size of the previewed image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PreviewSize {
    /// Cover-fit size in CSS pixels.
    Pixels { width: f64, height: f64 },
    /// Cell not measured yet; let the element fill the cell.
    Auto,
}

/// Style for one previewed image.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewStyle {
    pub size: PreviewSize,
    /// Value for the CSS `transform` property
    pub transform_css: String,
}

impl PreviewStyle {
    /// CSS `width` value.
    pub fn width_css(&self) -> String {
        match self.size {
            PreviewSize::Pixels { width, .. } => format!("{width}px"),
            PreviewSize::Auto => "100%".to_string(),
        }
    }

    /// CSS `height` value.
    pub fn height_css(&self) -> String {
        match self.size {
            PreviewSize::Pixels { height, .. } => format!("{height}px"),
            PreviewSize::Auto => "100%".to_string(),
        }
    }
}

/// Build the preview style for an `image_size` image in a cell of size `cell`.
pub fn preview_style(image_size: (u32, u32), cell: Option<CellSize>, transform: &Transform) -> PreviewStyle {
    let size = match cell.filter(CellSize::is_usable) {
        Some(cell) if image_size.0 > 0 && image_size.1 > 0 => {
            let draw = draw_size(image_size.0 as f64, image_size.1 as f64, cell, transform.rotation);
            PreviewSize::Pixels {
                width: draw.width,
                height: draw.height,
            }
        }
        _ => PreviewSize::Auto,
    };

    PreviewStyle {
        size,
        transform_css: transform_css(transform),
    }
}

/// CSS transform list: centre, pan, rotate, scale.
fn transform_css(transform: &Transform) -> String {
    let percent = PAN_UNIT * 100.0;
    format!(
        "translate(-50%, -50%) translate({}%, {}%) rotate({}deg) scale({})",
        transform.offset_x * percent,
        transform.offset_y * percent,
        transform.rotation,
        transform.scale(),
    )
}
