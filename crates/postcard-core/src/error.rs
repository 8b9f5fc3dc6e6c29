//! Error type for editor operations.

use thiserror::Error;

use crate::decode::DecodeError;
use crate::encode::EncodeError;
use crate::grid::GridError;
use crate::persist::StoreError;
use crate::photo::ImageId;

/// Errors surfaced by [`crate::editor::Editor`].
#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("Failed to import image: {0}")]
    Decode(#[from] DecodeError),

    #[error("Failed to export postcard: {0}")]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Unknown image {0}")]
    UnknownImage(ImageId),
}
