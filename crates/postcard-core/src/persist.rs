//! Saved settings and the storage interface.
//!
//! Settings are a plain JSON record:
//!
//! ```text
//! {
//!   "gridItems":       [{ "imageId": "img-0" }, { "imageId": null }, ...],
//!   "imageTransforms": { "img-0": { "zoom": 120, "offsetX": 4, "offsetY": 0, "rotation": 90 } },
//!   "globalPadding":   { "width": 10, "color": "#ffffff", "cutMargin": 20 }
//! }
//! ```
//!
//! Every key may be missing, `null` or of the wrong type and falls back to
//! its default on its own, so records written by older versions keep
//! loading. Only a record that is not a JSON object at all is rejected.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::grid::{Grid, PaddingSpec, CELL_COUNT};
use crate::photo::ImageId;
use crate::transform::TransformMap;

/// Errors reading or writing the settings record.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Malformed settings: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Errors from a [`Store`] backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Read one saved field, using `fallback()` when it holds the wrong type.
pub(crate) fn lenient<'de, D, T>(deserializer: D, fallback: fn() -> T) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_else(|e| {
        log::warn!("ignoring saved value: {e}");
        fallback()
    }))
}

/// [`lenient`] with the type's `Default` as the fallback.
pub(crate) fn lenient_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    lenient(deserializer, T::default)
}

/// One grid cell as stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridItem {
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub image_id: Option<ImageId>,
}

/// Everything needed to restore an editing session except the images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "empty_grid_items", deserialize_with = "lenient_grid_items")]
    pub grid_items: Vec<GridItem>,
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub image_transforms: TransformMap,
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub global_padding: PaddingSpec,
}

fn empty_grid_items() -> Vec<GridItem> {
    vec![GridItem::default(); CELL_COUNT]
}

// A bad item empties only its own cell.
fn lenient_grid_items<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<GridItem>, D::Error> {
    let items: Vec<serde_json::Value> = lenient(deserializer, Vec::new)?;
    if items.is_empty() {
        return Ok(empty_grid_items());
    }
    Ok(items
        .into_iter()
        .map(|item| {
            GridItem::deserialize(item).unwrap_or_else(|e| {
                log::warn!("ignoring saved grid item: {e}");
                GridItem::default()
            })
        })
        .collect())
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid_items: empty_grid_items(),
            image_transforms: TransformMap::new(),
            global_padding: PaddingSpec::default(),
        }
    }
}

impl Settings {
    /// Snapshot the current editor state.
    pub fn capture(grid: &Grid, transforms: &TransformMap, padding: &PaddingSpec) -> Self {
        Self {
            grid_items: grid
                .as_slice()
                .iter()
                .map(|id| GridItem { image_id: id.clone() })
                .collect(),
            image_transforms: transforms.clone(),
            global_padding: *padding,
        }
    }

    /// Parse a settings record, filling missing keys with defaults.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.normalized())
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string(self)?)
    }

    /// The stored grid, padded or truncated to four cells.
    pub fn grid(&self) -> Grid {
        Grid::from_stored(self.grid_items.iter().map(|item| item.image_id.clone()))
    }

    /// Force exactly four grid items and in-range transform values.
    pub fn normalized(mut self) -> Self {
        if self.grid_items.len() != CELL_COUNT {
            log::warn!(
                "settings have {} grid items, normalising to {CELL_COUNT}",
                self.grid_items.len()
            );
            self.grid_items.resize(CELL_COUNT, GridItem::default());
        }
        self.image_transforms = self.image_transforms.sanitized();
        self
    }
}

/// A persisted photo: its id, display name and original file bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub id: ImageId,
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Persistence backend for images and settings.
///
/// Writes replace whatever was stored before (last write wins).
pub trait Store {
    fn save_images(&mut self, images: &[StoredImage]) -> Result<(), StoreError>;

    fn load_images(&self) -> Result<Vec<StoredImage>, StoreError>;

    fn save_settings(&mut self, settings: &Settings) -> Result<(), StoreError>;

    /// `Ok(None)` when nothing has been saved yet.
    fn load_settings(&self) -> Result<Option<Settings>, StoreError>;
}

/// In-memory [`Store`]. Settings are kept as their JSON text so that a
/// save/load cycle exercises the same encoding as a durable backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    images: Vec<StoredImage>,
    settings: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw JSON of the last saved settings.
    pub fn settings_json(&self) -> Option<&str> {
        self.settings.as_deref()
    }

    /// Replace the saved settings with raw JSON, e.g. from a previous session.
    pub fn set_settings_json(&mut self, json: impl Into<String>) {
        self.settings = Some(json.into());
    }
}

impl Store for MemoryStore {
    fn save_images(&mut self, images: &[StoredImage]) -> Result<(), StoreError> {
        self.images = images.to_vec();
        Ok(())
    }

    fn load_images(&self) -> Result<Vec<StoredImage>, StoreError> {
        Ok(self.images.clone())
    }

    fn save_settings(&mut self, settings: &Settings) -> Result<(), StoreError> {
        self.settings = Some(settings.to_json()?);
        Ok(())
    }

    fn load_settings(&self) -> Result<Option<Settings>, StoreError> {
        match &self.settings {
            Some(json) => Ok(Some(Settings::from_json(json)?)),
            None => Ok(None),
        }
    }
}
