//! Import boundary: turning user files into rasters the editor can place.
//!
//! The editor never parses file formats itself. It receives bytes from the
//! file picker, decodes them once here, and from then on only needs the
//! natural dimensions (for geometry) and the RGB pixels (for export).
//!
//! EXIF orientation is applied during decode so that the natural width and
//! height match what the browser shows for the same file.

mod raster;
mod types;

pub use raster::decode_image;
pub use types::{DecodeError, DecodedImage, Orientation};
