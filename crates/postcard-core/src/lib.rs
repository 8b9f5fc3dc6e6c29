//! Postcard Core - layout and export library
//!
//! This crate provides the core functionality for Postcard Builder: placing
//! up to four photos in a 2x2 grid on a letter-sized sheet, keeping each
//! photo covering its cell while it is zoomed, panned and rotated, and
//! compositing the sheet into a printable image.

pub mod clamp;
pub mod compose;
pub mod decode;
pub mod editor;
pub mod encode;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod interact;
pub mod persist;
pub mod photo;
pub mod transform;

pub use clamp::{apply_update, bounds_for, clamp_offsets, ClampPolicy};
pub use compose::{
    export, export_filename, preview_style, render, CellPlacement, ExportConfig, ExportedImage,
    InterpolationFilter, PreviewSize, PreviewStyle,
};
pub use decode::{decode_image, DecodeError, DecodedImage};
pub use editor::Editor;
pub use encode::{EncodeError, ExportFormat};
pub use error::EditorError;
pub use geometry::{base_fit, draw_size, max_offsets, BaseFit, CellSize, PanBounds};
pub use grid::{CanvasLayout, CellRect, Grid, GridError, PaddingSpec, Rgb, CELL_COUNT};
pub use interact::{nudge_update, Direction, DragSession, NudgeStep, PointerButton};
pub use persist::{MemoryStore, Settings, SettingsError, Store, StoreError, StoredImage};
pub use photo::{ImageId, ImageSet, Photo};
pub use transform::{Transform, TransformMap, TransformUpdate};

/// Export canvas width: US letter at 300 DPI.
pub const CANVAS_WIDTH: u32 = 2550;

/// Export canvas height: US letter at 300 DPI.
pub const CANVAS_HEIGHT: u32 = 3300;

/// Fraction of the draw size moved per pan unit (0.1 %).
pub const PAN_UNIT: f64 = 0.001;

/// Pan units moved per pixel of pointer travel while dragging.
pub const DRAG_FACTOR: f64 = 0.5;
