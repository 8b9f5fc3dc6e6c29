//! Imported photos and their identifiers.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::decode::{decode_image, DecodeError, DecodedImage};

/// Stable identifier of an imported photo.
///
/// Grid cells and transforms refer to photos only through this id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ImageId(String);

impl ImageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ImageId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ImageId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Older saves stored numeric ids; accept both.
impl<'de> Deserialize<'de> for ImageId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(f64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => ImageId(s),
            Raw::Number(n) => ImageId(n.to_string()),
        })
    }
}

/// An imported photo: decoded raster plus the original file bytes.
#[derive(Debug, Clone)]
pub struct Photo {
    pub id: ImageId,
    /// Display name, usually the file name
    pub name: String,
    pub image: DecodedImage,
    /// Original encoded file, kept so the photo can be persisted
    pub source: Vec<u8>,
}

impl Photo {
    pub fn new(id: ImageId, name: impl Into<String>, image: DecodedImage, source: Vec<u8>) -> Self {
        Self {
            id,
            name: name.into(),
            image,
            source,
        }
    }

    /// Decode `source` and wrap it as a photo.
    pub fn decode(id: ImageId, name: impl Into<String>, source: Vec<u8>) -> Result<Self, DecodeError> {
        let image = decode_image(&source)?;
        Ok(Self::new(id, name, image, source))
    }

    /// Natural `(width, height)` after orientation correction.
    #[inline]
    pub fn natural_size(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// The application-level set of imported photos, in import order.
#[derive(Debug, Clone, Default)]
pub struct ImageSet {
    photos: Vec<Photo>,
}

impl ImageSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &ImageId) -> Option<&Photo> {
        self.photos.iter().find(|p| &p.id == id)
    }

    pub fn contains(&self, id: &ImageId) -> bool {
        self.get(id).is_some()
    }

    /// Insert a photo, replacing any existing photo with the same id.
    pub fn insert(&mut self, photo: Photo) {
        match self.photos.iter_mut().find(|p| p.id == photo.id) {
            Some(existing) => *existing = photo,
            None => self.photos.push(photo),
        }
    }

    /// Pick an id not used by any photo in the set nor rejected by `taken`.
    ///
    /// `taken` lets the caller reserve ids still referenced by saved grid
    /// cells or transforms whose photo is not loaded.
    pub fn allocate_id(&self, taken: impl Fn(&ImageId) -> bool) -> ImageId {
        let mut n = self.photos.len();
        loop {
            let candidate = ImageId(format!("img-{n}"));
            if !self.contains(&candidate) && !taken(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Photo> {
        self.photos.iter()
    }
}
