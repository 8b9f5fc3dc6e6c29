//! Image encoding for the downloadable postcard.
//!
//! PNG is the default export format because it is lossless: the exported
//! file carries exactly the pixels the compositor produced. JPEG is offered
//! for smaller files.

mod jpeg;
mod png;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use self::jpeg::encode_jpeg;
pub use self::png::encode_png;

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The underlying encoder failed
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

/// File format of an exported postcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    Jpeg,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg => "image/jpeg",
        }
    }

    /// Encode RGB pixels in this format. `quality` only applies to JPEG.
    pub fn encode(
        self,
        pixels: &[u8],
        width: u32,
        height: u32,
        quality: u8,
    ) -> Result<Vec<u8>, EncodeError> {
        match self {
            ExportFormat::Png => encode_png(pixels, width, height),
            ExportFormat::Jpeg => encode_jpeg(pixels, width, height, quality),
        }
    }
}

/// Check dimensions and buffer length before handing pixels to an encoder.
fn validate_rgb(pixels: &[u8], width: u32, height: u32) -> Result<(), EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = (width as usize) * (height as usize) * 3;
    if pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_metadata() {
        assert_eq!(ExportFormat::default(), ExportFormat::Png);
        assert_eq!(ExportFormat::Png.extension(), "png");
        assert_eq!(ExportFormat::Jpeg.extension(), "jpg");
        assert_eq!(ExportFormat::Jpeg.mime_type(), "image/jpeg");
    }

    #[test]
    fn test_format_dispatch() {
        let pixels = vec![90u8; 8 * 8 * 3];
        let png = ExportFormat::Png.encode(&pixels, 8, 8, 90).unwrap();
        assert_eq!(&png[1..4], b"PNG");
        let jpeg = ExportFormat::Jpeg.encode(&pixels, 8, 8, 90).unwrap();
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_format_serde_names() {
        let json = serde_json::to_string(&ExportFormat::Jpeg).unwrap();
        assert_eq!(json, "\"jpeg\"");
    }
}
