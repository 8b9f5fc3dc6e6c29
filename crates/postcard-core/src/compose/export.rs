//! Flattened raster export of the whole postcard.
//!
//! # Algorithm
//!
//! 1. Allocate the output canvas and fill it with the padding colour
//! 2. Lay out the four cells with [`CanvasLayout`]
//! 3. For every occupied cell, build its [`CellPlacement`] and visit only
//!    the canvas pixels whose centres fall inside the cell rectangle
//!    (this is the clip: nothing drawn for one cell reaches its neighbours)
//! 4. Inverse-map each pixel centre to the source image and sample it;
//!    pixels the image does not cover keep the padding colour

use serde::{Deserialize, Serialize};

use super::placement::CellPlacement;
use super::sample::InterpolationFilter;
use crate::decode::DecodedImage;
use crate::encode::{EncodeError, ExportFormat};
use crate::grid::{CanvasLayout, CellRect, Grid, PaddingSpec};
use crate::photo::ImageSet;
use crate::transform::TransformMap;
use crate::{CANVAS_HEIGHT, CANVAS_WIDTH};

fn default_width() -> u32 {
    CANVAS_WIDTH
}

fn default_height() -> u32 {
    CANVAS_HEIGHT
}

fn default_quality() -> u8 {
    92
}

/// Output settings for an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportConfig {
    /// Canvas width in pixels (letter at 300 DPI by default)
    #[serde(default = "default_width")]
    pub width: u32,
    /// Canvas height in pixels
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default)]
    pub format: ExportFormat,
    /// Only used for JPEG
    #[serde(default = "default_quality")]
    pub jpeg_quality: u8,
    #[serde(default)]
    pub filter: InterpolationFilter,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            format: ExportFormat::default(),
            jpeg_quality: default_quality(),
            filter: InterpolationFilter::default(),
        }
    }
}

/// An encoded postcard ready to download.
#[derive(Debug, Clone)]
pub struct ExportedImage {
    pub filename: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Download name for an export generated at `timestamp_ms` (Unix millis).
pub fn export_filename(timestamp_ms: u64, format: ExportFormat) -> String {
    format!("postcard-{timestamp_ms}.{}", format.extension())
}

/// Composite the grid onto a new canvas.
///
/// Cells whose image id has no loaded photo are skipped and keep the
/// padding colour.
pub fn render(
    grid: &Grid,
    images: &ImageSet,
    transforms: &TransformMap,
    padding: &PaddingSpec,
    config: &ExportConfig,
) -> DecodedImage {
    let mut canvas = DecodedImage::filled(config.width, config.height, padding.color.0);
    let layout = CanvasLayout::new(config.width as f64, config.height as f64, padding);

    for (index, id) in grid.iter() {
        let Some(id) = id else { continue };
        let Some(photo) = images.get(id) else {
            log::debug!("cell {index}: image {id} is not loaded, skipping");
            continue;
        };

        let rect = layout.cells[index];
        let transform = transforms.get_or_default(id);
        match CellPlacement::new(photo.natural_size(), rect, &transform) {
            Some(placement) => draw_cell(&mut canvas, &photo.image, rect, &placement, config.filter),
            None => log::debug!("cell {index}: nothing to draw for image {id}"),
        }
    }

    canvas
}

/// Render and encode the postcard.
pub fn export(
    grid: &Grid,
    images: &ImageSet,
    transforms: &TransformMap,
    padding: &PaddingSpec,
    config: &ExportConfig,
    timestamp_ms: u64,
) -> Result<ExportedImage, EncodeError> {
    let canvas = render(grid, images, transforms, padding, config);
    let bytes = config
        .format
        .encode(&canvas.pixels, canvas.width, canvas.height, config.jpeg_quality)?;

    log::debug!(
        "exported {}x{} {:?} ({} bytes)",
        canvas.width,
        canvas.height,
        config.format,
        bytes.len()
    );

    Ok(ExportedImage {
        filename: export_filename(timestamp_ms, config.format),
        mime_type: config.format.mime_type(),
        bytes,
    })
}

/// Draw one placed image into `canvas`, clipped to `rect`.
fn draw_cell(
    canvas: &mut DecodedImage,
    source: &DecodedImage,
    rect: CellRect,
    placement: &CellPlacement,
    filter: InterpolationFilter,
) {
    // Pixel range whose centres can fall inside the rect
    let x_start = (rect.x - 0.5).ceil().max(0.0) as u32;
    let y_start = (rect.y - 0.5).ceil().max(0.0) as u32;
    let x_end = ((rect.x + rect.width - 0.5).ceil().max(0.0) as u32).min(canvas.width);
    let y_end = ((rect.y + rect.height - 0.5).ceil().max(0.0) as u32).min(canvas.height);

    let stride = canvas.width as usize * 3;
    for py in y_start..y_end {
        let cy = py as f64 + 0.5;
        let row = py as usize * stride;
        for px in x_start..x_end {
            let cx = px as f64 + 0.5;
            if !rect.contains(cx, cy) {
                continue;
            }

            let (u, v) = placement.to_image(cx, cy);
            if !(0.0..1.0).contains(&u) || !(0.0..1.0).contains(&v) {
                continue;
            }

            let rgb = filter.sample(source, u, v);
            let idx = row + px as usize * 3;
            canvas.pixels[idx..idx + 3].copy_from_slice(&rgb);
        }
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
