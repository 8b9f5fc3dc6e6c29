//! The fixed 2x2 grid, padding settings and canvas layout.
//!
//! Cells are numbered in reading order:
//! ```text
//! +---+---+
//! | 0 | 1 |
//! +---+---+
//! | 2 | 3 |
//! +---+---+
//! ```
//! A cell only records which image it shows. Images and transforms are
//! owned elsewhere and looked up by id.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::geometry::CellSize;
use crate::persist::{lenient, lenient_or_default};
use crate::photo::ImageId;

/// Number of cells in the grid.
pub const CELL_COUNT: usize = 4;

/// Errors for grid operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("Cell index {0} is out of range (grid has 4 cells)")]
    CellOutOfRange(usize),

    #[error("Invalid colour {0:?}: expected #rrggbb or #rgb")]
    InvalidColor(String),
}

/// Image assignments of the four cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    cells: [Option<ImageId>; CELL_COUNT],
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    fn check(index: usize) -> Result<(), GridError> {
        if index < CELL_COUNT {
            Ok(())
        } else {
            Err(GridError::CellOutOfRange(index))
        }
    }

    /// The image shown in cell `index`, if any.
    pub fn get(&self, index: usize) -> Option<&ImageId> {
        self.cells.get(index).and_then(Option::as_ref)
    }

    /// Place `id` in cell `index`, replacing whatever was there.
    pub fn assign(&mut self, index: usize, id: ImageId) -> Result<(), GridError> {
        Self::check(index)?;
        self.cells[index] = Some(id);
        Ok(())
    }

    /// Empty cell `index`. Returns the id that was removed.
    pub fn clear(&mut self, index: usize) -> Result<Option<ImageId>, GridError> {
        Self::check(index)?;
        Ok(self.cells[index].take())
    }

    /// Index of the first empty cell.
    pub fn first_empty(&self) -> Option<usize> {
        self.cells.iter().position(Option::is_none)
    }

    /// Indices of every cell showing `id`, in grid order.
    pub fn cells_containing(&self, id: &ImageId) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.as_ref() == Some(id))
            .map(|(index, _)| index)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, Option<&ImageId>)> {
        self.cells.iter().map(Option::as_ref).enumerate()
    }

    pub fn as_slice(&self) -> &[Option<ImageId>; CELL_COUNT] {
        &self.cells
    }

    /// Build a grid from a stored list, padding or truncating to four cells.
    pub fn from_stored(cells: impl IntoIterator<Item = Option<ImageId>>) -> Self {
        let mut grid = Self::default();
        for (slot, id) in grid.cells.iter_mut().zip(cells) {
            *slot = id;
        }
        grid
    }
}

/// An sRGB colour stored as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const WHITE: Rgb = Rgb([255, 255, 255]);
}

impl Default for Rgb {
    fn default() -> Self {
        Self::WHITE
    }
}

impl FromStr for Rgb {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || GridError::InvalidColor(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.is_ascii() {
            return Err(invalid());
        }

        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());
        match hex.len() {
            6 => Ok(Rgb([channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?])),
            3 => {
                let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
                Ok(Rgb([short(0)?, short(1)?, short(2)?]))
            }
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// A bad colour in saved settings falls back to white instead of failing the load.
impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.parse().unwrap_or_else(|e| {
            log::warn!("{e}; using white");
            Rgb::WHITE
        }))
    }
}

fn default_padding_width() -> f64 {
    10.0
}

fn default_cut_margin() -> f64 {
    20.0
}

fn lenient_padding_width<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    lenient(deserializer, default_padding_width)
}

fn lenient_cut_margin<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    lenient(deserializer, default_cut_margin)
}

/// Global padding between and around the cells.
///
/// The outer margin is `width`; the gap between neighbouring cells is
/// `2 * width`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaddingSpec {
    #[serde(default = "default_padding_width", deserialize_with = "lenient_padding_width")]
    pub width: f64,
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub color: Rgb,
    #[serde(default = "default_cut_margin", deserialize_with = "lenient_cut_margin")]
    pub cut_margin: f64,
}

impl Default for PaddingSpec {
    fn default() -> Self {
        Self {
            width: default_padding_width(),
            color: Rgb::WHITE,
            cut_margin: default_cut_margin(),
        }
    }
}

/// Axis-aligned rectangle in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CellRect {
    pub fn size(&self) -> CellSize {
        CellSize::new(self.width, self.height)
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Whether `(px, py)` lies inside, right and bottom edges excluded.
    #[inline]
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }
}

/// Positions of the four cells on a canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasLayout {
    pub width: f64,
    pub height: f64,
    pub cells: [CellRect; CELL_COUNT],
}

impl CanvasLayout {
    /// Partition a `width` x `height` canvas with the given padding.
    ///
    /// ```text
    /// cell_w = (width  - 2 * pad - 2 * pad) / 2
    /// cell_h = (height - 2 * pad - 2 * pad) / 2
    /// ```
    /// Padding too wide for the canvas yields zero-sized cells.
    pub fn new(width: f64, height: f64, padding: &PaddingSpec) -> Self {
        let pad = if padding.width.is_finite() {
            padding.width.max(0.0)
        } else {
            0.0
        };
        let gap = pad * 2.0;
        let cell_w = ((width - pad * 2.0 - gap) / 2.0).max(0.0);
        let cell_h = ((height - pad * 2.0 - gap) / 2.0).max(0.0);

        let rect = |col: f64, row: f64| CellRect {
            x: pad + col * (cell_w + gap),
            y: pad + row * (cell_h + gap),
            width: cell_w,
            height: cell_h,
        };

        Self {
            width,
            height,
            cells: [rect(0.0, 0.0), rect(1.0, 0.0), rect(0.0, 1.0), rect(1.0, 1.0)],
        }
    }

    /// Size shared by all four cells.
    pub fn cell_size(&self) -> CellSize {
        self.cells[0].size()
    }
}
