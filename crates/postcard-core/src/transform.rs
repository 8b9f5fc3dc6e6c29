//! Per-image placement transform.
//!
//! A [`Transform`] describes how one photo sits inside a grid cell: zoom,
//! pan offsets and rotation. There is exactly one transform per image
//! identifier, so an image placed in two cells is edited in both at once.
//!
//! # Units
//!
//! - `zoom` is a percentage in `[MIN_ZOOM, MAX_ZOOM]`, 100 = cover fit
//! - `offset_x` / `offset_y` are pan units; one unit moves the image by
//!   0.1 % of its unscaled cover-fit size (see [`crate::PAN_UNIT`])
//! - `rotation` is in degrees, clockwise, always in `[0, 360)`

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::persist::{lenient, lenient_or_default};
use crate::photo::ImageId;

/// Smallest zoom percentage accepted by the editor.
pub const MIN_ZOOM: f64 = 50.0;

/// Largest zoom percentage accepted by the editor.
pub const MAX_ZOOM: f64 = 200.0;

/// Zoom percentage of a freshly created transform.
pub const DEFAULT_ZOOM: f64 = 100.0;

fn default_zoom() -> f64 {
    DEFAULT_ZOOM
}

fn lenient_zoom<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    lenient(deserializer, default_zoom)
}

/// Placement of an image within its cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transform {
    /// Zoom percentage (50 to 200)
    #[serde(default = "default_zoom", deserialize_with = "lenient_zoom")]
    pub zoom: f64,
    /// Horizontal pan in pan units
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub offset_x: f64,
    /// Vertical pan in pan units
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub offset_y: f64,
    /// Clockwise rotation in degrees (0 to 360, exclusive)
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub rotation: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            offset_x: 0.0,
            offset_y: 0.0,
            rotation: 0.0,
        }
    }
}

impl Transform {
    /// Create a new transform with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if all values are at their defaults
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Uniform scale factor applied on top of the cover fit.
    #[inline]
    pub fn scale(&self) -> f64 {
        self.zoom / 100.0
    }

    /// Merge a partial update onto this transform.
    ///
    /// Zoom is clamped into range and rotation wrapped into `[0, 360)`.
    /// Non-finite values in the update are ignored. Offsets are merged
    /// verbatim; bounding them is the job of [`crate::clamp`].
    pub fn merged(&self, update: &TransformUpdate) -> Transform {
        let mut next = *self;
        if let Some(zoom) = update.zoom.filter(|v| v.is_finite()) {
            next.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        }
        if let Some(x) = update.offset_x.filter(|v| v.is_finite()) {
            next.offset_x = x;
        }
        if let Some(y) = update.offset_y.filter(|v| v.is_finite()) {
            next.offset_y = y;
        }
        if let Some(rotation) = update.rotation.filter(|v| v.is_finite()) {
            next.rotation = normalize_rotation(rotation);
        }
        next
    }

    /// Rotation after turning by `delta` degrees, wrapped into `[0, 360)`.
    pub fn rotated_by(&self, delta: f64) -> f64 {
        normalize_rotation(self.rotation + delta + 360.0)
    }

    /// Replace non-finite or out-of-range fields loaded from storage.
    pub(crate) fn sanitized(self) -> Transform {
        let defaults = Transform::default();
        let pick = |v: f64, fallback: f64| if v.is_finite() { v } else { fallback };
        Transform {
            zoom: pick(self.zoom, defaults.zoom).clamp(MIN_ZOOM, MAX_ZOOM),
            offset_x: pick(self.offset_x, 0.0),
            offset_y: pick(self.offset_y, 0.0),
            rotation: normalize_rotation(pick(self.rotation, 0.0)),
        }
    }
}

/// Wrap an angle in degrees into `[0, 360)`.
#[inline]
pub fn normalize_rotation(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Partial transform update. `None` fields keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformUpdate {
    #[serde(default)]
    pub zoom: Option<f64>,
    #[serde(default)]
    pub offset_x: Option<f64>,
    #[serde(default)]
    pub offset_y: Option<f64>,
    #[serde(default)]
    pub rotation: Option<f64>,
}

impl TransformUpdate {
    pub fn zoom(zoom: f64) -> Self {
        Self {
            zoom: Some(zoom),
            ..Self::default()
        }
    }

    pub fn offsets(x: f64, y: f64) -> Self {
        Self {
            offset_x: Some(x),
            offset_y: Some(y),
            ..Self::default()
        }
    }

    pub fn rotation(rotation: f64) -> Self {
        Self {
            rotation: Some(rotation),
            ..Self::default()
        }
    }
}

/// Transforms keyed by image identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TransformMap {
    entries: BTreeMap<ImageId, Transform>,
}

// An entry that is not a transform object is dropped on its own.
impl<'de> Deserialize<'de> for TransformMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<ImageId, serde_json::Value>::deserialize(deserializer)?;
        let entries = raw
            .into_iter()
            .filter_map(|(id, value)| match Transform::deserialize(value) {
                Ok(transform) => Some((id, transform)),
                Err(e) => {
                    log::warn!("dropping saved transform for {id}: {e}");
                    None
                }
            })
            .collect();
        Ok(Self { entries })
    }
}

impl TransformMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored transform for `id`, or the default if none exists yet.
    pub fn get_or_default(&self, id: &ImageId) -> Transform {
        self.entries.get(id).copied().unwrap_or_default()
    }

    pub fn get(&self, id: &ImageId) -> Option<&Transform> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &ImageId) -> bool {
        self.entries.contains_key(id)
    }

    /// Create the default transform for `id` if it has none.
    pub fn ensure(&mut self, id: &ImageId) -> &mut Transform {
        self.entries.entry(id.clone()).or_default()
    }

    pub fn insert(&mut self, id: ImageId, transform: Transform) {
        self.entries.insert(id, transform);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ImageId, &Transform)> {
        self.entries.iter()
    }

    pub(crate) fn sanitized(self) -> Self {
        Self {
            entries: self
                .entries
                .into_iter()
                .map(|(id, t)| (id, t.sanitized()))
                .collect(),
        }
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
