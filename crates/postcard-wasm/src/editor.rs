//! The editing session exposed to JavaScript.
//!
//! `JsEditor` wraps a core [`Editor`] backed by an in-memory store. The page
//! owns durable storage: after each change it writes `settings_json()` and
//! `stored_images()` to IndexedDB. On startup it hands the saved JSON back
//! through `JsEditor.fromSaved()` and reloads each photo with
//! `restore_image()` so it keeps its id.
//!
//! # Example
//!
//! ```typescript
//! const editor = JsEditor.fromSaved(localStorage.getItem('settings'));
//! for (const { id, name, bytes } of await db.getAll('images')) {
//!   editor.restore_image(id, name, bytes);
//! }
//! const id = editor.import_image(file.name, new Uint8Array(await file.arrayBuffer()));
//! editor.set_cell_size(0, rect.width, rect.height);
//! img.style.transform = editor.preview_css(0);
//! ```

use postcard_core::compose::{render, ExportConfig, PreviewStyle};
use postcard_core::editor::Editor;
use postcard_core::encode::ExportFormat;
use postcard_core::geometry::CellSize;
use postcard_core::interact::{Direction, PointerButton};
use postcard_core::persist::{MemoryStore, Settings, Store};
use postcard_core::photo::ImageId;
use postcard_core::transform::{Transform, TransformUpdate};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::types::JsDecodedImage;

fn to_js<E: std::fmt::Display>(e: E) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// One grid cell as seen by the page.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CellState {
    index: usize,
    image_id: Option<String>,
    transform: Option<Transform>,
    selected: bool,
}

#[wasm_bindgen]
pub struct JsEditor {
    inner: Editor<MemoryStore>,
}

impl Default for JsEditor {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl JsEditor {
    /// Start an empty session.
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsEditor {
        JsEditor {
            inner: Editor::new(MemoryStore::new()),
        }
    }

    /// Start a session from previously saved settings JSON.
    ///
    /// Unreadable settings are reported to the console and ignored.
    #[wasm_bindgen(js_name = fromSaved)]
    pub fn from_saved(settings_json: Option<String>) -> JsEditor {
        let mut store = MemoryStore::new();
        if let Some(json) = settings_json {
            match Settings::from_json(&json) {
                Ok(_) => store.set_settings_json(json),
                Err(e) => crate::console_warn(&format!("Ignoring saved settings: {e}")),
            }
        }
        JsEditor {
            inner: Editor::restore(store),
        }
    }

    // ------------------------------------------------------------------
    // Images and grid
    // ------------------------------------------------------------------

    /// Import a photo file. Returns the new image id.
    pub fn import_image(&mut self, name: &str, bytes: Vec<u8>) -> Result<String, JsValue> {
        self.inner
            .import_image(name, bytes)
            .map(|id| id.to_string())
            .map_err(to_js)
    }

    /// Reload a saved photo under its saved id, reattaching its cells and transform.
    pub fn restore_image(&mut self, id: &str, name: &str, bytes: Vec<u8>) -> Result<(), JsValue> {
        self.inner
            .restore_image(ImageId::from(id), name, bytes)
            .map_err(to_js)
    }

    /// Every loaded photo as `[{ id, name, bytes }]` for durable storage.
    /// `bytes` is a `Uint8Array` of the original file.
    pub fn stored_images(&self) -> Result<js_sys::Array, JsValue> {
        let images = js_sys::Array::new();
        for image in self.inner.stored_images() {
            let entry = js_sys::Object::new();
            js_sys::Reflect::set(&entry, &"id".into(), &image.id.as_str().into())?;
            js_sys::Reflect::set(&entry, &"name".into(), &image.name.as_str().into())?;
            js_sys::Reflect::set(&entry, &"bytes".into(), &js_sys::Uint8Array::from(image.bytes.as_slice()))?;
            images.push(&entry);
        }
        Ok(images)
    }

    /// Display name of an imported image.
    pub fn image_name(&self, id: &str) -> Option<String> {
        self.inner.images().get(&ImageId::from(id)).map(|photo| photo.name.clone())
    }

    /// Original file bytes of an imported image.
    pub fn image_bytes(&self, id: &str) -> Option<Vec<u8>> {
        self.inner.images().get(&ImageId::from(id)).map(|photo| photo.source.clone())
    }

    /// Natural `[width, height]` of an imported image.
    pub fn image_size(&self, id: &str) -> Option<Vec<u32>> {
        self.inner
            .images()
            .get(&ImageId::from(id))
            .map(|photo| {
                let (w, h) = photo.natural_size();
                vec![w, h]
            })
    }

    /// Ids of all imported images in import order.
    pub fn image_ids(&self) -> Vec<String> {
        self.inner.images().iter().map(|p| p.id.to_string()).collect()
    }

    pub fn assign(&mut self, cell: usize, id: &str) -> Result<(), JsValue> {
        self.inner.assign(cell, ImageId::from(id)).map_err(to_js)
    }

    /// Empty a cell. Returns the id that was removed.
    pub fn clear(&mut self, cell: usize) -> Result<Option<String>, JsValue> {
        self.inner
            .clear(cell)
            .map(|removed| removed.map(|id| id.to_string()))
            .map_err(to_js)
    }

    pub fn select(&mut self, cell: Option<usize>) -> Result<(), JsValue> {
        self.inner.select(cell).map_err(to_js)
    }

    #[wasm_bindgen(getter)]
    pub fn selected(&self) -> Option<usize> {
        self.inner.selected()
    }

    /// Image id in `cell`, if any.
    pub fn cell_image(&self, cell: usize) -> Option<String> {
        self.inner.grid().get(cell).map(ToString::to_string)
    }

    /// Snapshot of all four cells as `{ index, imageId, transform, selected }`.
    pub fn cells(&self) -> Result<JsValue, JsValue> {
        let cells: Vec<CellState> = self
            .inner
            .grid()
            .iter()
            .map(|(index, id)| CellState {
                index,
                image_id: id.map(ToString::to_string),
                transform: id.map(|id| self.inner.transform(id)),
                selected: self.inner.selected() == Some(index),
            })
            .collect();
        serde_wasm_bindgen::to_value(&cells).map_err(to_js)
    }

    /// Record the measured size of a cell's element in CSS pixels.
    pub fn set_cell_size(&mut self, cell: usize, width: f64, height: f64) -> Result<(), JsValue> {
        self.inner
            .set_cell_size(cell, Some(CellSize::new(width, height)))
            .map_err(to_js)
    }

    /// Forget a cell's measurement, e.g. when it is hidden.
    pub fn clear_cell_size(&mut self, cell: usize) -> Result<(), JsValue> {
        self.inner.set_cell_size(cell, None).map_err(to_js)
    }

    // ------------------------------------------------------------------
    // Transforms
    // ------------------------------------------------------------------

    /// Stored transform of an image as `{ zoom, offsetX, offsetY, rotation }`.
    pub fn transform(&self, id: &str) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.transform(&ImageId::from(id))).map_err(to_js)
    }

    /// Apply a partial `{ zoom?, offsetX?, offsetY?, rotation? }` update.
    /// Returns the clamped transform.
    pub fn update_transform(&mut self, id: &str, update: JsValue) -> Result<JsValue, JsValue> {
        let update: TransformUpdate = serde_wasm_bindgen::from_value(update)
            .map_err(|e| JsValue::from_str(&format!("Invalid transform update: {}", e)))?;
        let transform = self.inner.update_transform(&ImageId::from(id), &update);
        serde_wasm_bindgen::to_value(&transform).map_err(to_js)
    }

    /// Set the zoom of the selected image. Returns false if nothing is selected.
    pub fn set_zoom(&mut self, zoom: f64) -> bool {
        self.inner.zoom_selected(zoom).is_some()
    }

    /// Rotate the selected image by `delta` degrees (±90 from the toolbar).
    pub fn rotate(&mut self, delta: f64) -> bool {
        self.inner.rotate_selected(delta).is_some()
    }

    pub fn reset(&mut self) -> bool {
        self.inner.reset_selected().is_some()
    }

    /// Handle an arrow key. Returns true if the key was used and the page
    /// should call `preventDefault()`.
    pub fn nudge(&mut self, key: &str, shift: bool) -> bool {
        match Direction::from_key(key) {
            Some(direction) => self.inner.nudge_selected(direction, shift).is_some(),
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Dragging
    // ------------------------------------------------------------------

    /// Pointer down on the selected cell. `button` is `MouseEvent.button`.
    pub fn begin_drag(&mut self, button: i16, x: f64, y: f64) -> bool {
        self.inner.begin_drag(PointerButton::from(button), (x, y))
    }

    /// Pointer move. Returns the live `[offsetX, offsetY]` while dragging.
    pub fn drag_move(&mut self, x: f64, y: f64) -> Option<Vec<f64>> {
        self.inner.drag_move((x, y)).map(|(ox, oy)| vec![ox, oy])
    }

    /// Pointer up. Commits the drag; returns false if no drag was active.
    pub fn end_drag(&mut self) -> bool {
        self.inner.end_drag().is_some()
    }

    pub fn cancel_drag(&mut self) {
        self.inner.cancel_drag();
    }

    #[wasm_bindgen(getter)]
    pub fn dragging(&self) -> bool {
        self.inner.is_dragging()
    }

    // ------------------------------------------------------------------
    // Padding
    // ------------------------------------------------------------------

    pub fn set_padding_width(&mut self, width: f64) {
        self.inner.set_padding_width(width);
    }

    /// Set the padding colour from `#rrggbb` or `#rgb`.
    pub fn set_padding_color(&mut self, color: &str) -> Result<(), JsValue> {
        self.inner.set_padding_color(color).map_err(to_js)
    }

    pub fn set_cut_margin(&mut self, margin: f64) {
        self.inner.set_cut_margin(margin);
    }

    #[wasm_bindgen(getter)]
    pub fn padding_width(&self) -> f64 {
        self.inner.padding().width
    }

    #[wasm_bindgen(getter)]
    pub fn padding_color(&self) -> String {
        self.inner.padding().color.to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn cut_margin(&self) -> f64 {
        self.inner.padding().cut_margin
    }

    // ------------------------------------------------------------------
    // Preview
    // ------------------------------------------------------------------

    /// CSS `transform` value for the image in `cell`.
    pub fn preview_css(&self, cell: usize) -> Option<String> {
        self.inner.preview(cell).map(|style| style.transform_css)
    }

    /// CSS `[width, height]` values for the image element in `cell`.
    pub fn preview_size(&self, cell: usize) -> Option<Vec<String>> {
        self.inner
            .preview(cell)
            .map(|style: PreviewStyle| vec![style.width_css(), style.height_css()])
    }

    /// Full preview style as `{ size, transformCss }`.
    pub fn preview_style(&self, cell: usize) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.preview(cell)).map_err(to_js)
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Current settings as JSON for durable storage.
    pub fn settings_json(&self) -> Result<String, JsValue> {
        self.inner.settings().to_json().map_err(to_js)
    }

    /// Replace grid, transforms and padding from saved JSON. Imported
    /// images are kept.
    pub fn restore_settings(&mut self, json: &str) -> Result<(), JsValue> {
        let settings = Settings::from_json(json).map_err(to_js)?;
        let mut store = self.inner.store().clone();
        store.save_settings(&settings).map_err(to_js)?;
        let policy = self.inner.policy();
        self.inner = Editor::restore(store).with_policy(policy);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------

    /// Encode the postcard at 2550x3300 as PNG.
    ///
    /// `timestamp` is only used for the file name; pass `undefined` to use
    /// the current time.
    pub fn export_png(&self, timestamp: Option<f64>) -> Result<Vec<u8>, JsValue> {
        self.export_bytes(&ExportConfig::default(), timestamp)
    }

    /// Encode the postcard as JPEG.
    pub fn export_jpeg(&self, quality: u8, timestamp: Option<f64>) -> Result<Vec<u8>, JsValue> {
        let config = ExportConfig {
            format: ExportFormat::Jpeg,
            jpeg_quality: quality,
            ..ExportConfig::default()
        };
        self.export_bytes(&config, timestamp)
    }

    /// Download name for an export made at `timestamp` (ms since epoch).
    pub fn export_filename(&self, timestamp: Option<f64>, jpeg: bool) -> String {
        let format = if jpeg { ExportFormat::Jpeg } else { ExportFormat::Png };
        postcard_core::compose::export_filename(resolve_timestamp(timestamp), format)
    }

    /// Render the postcard without encoding, at the given size.
    pub fn render(&self, width: u32, height: u32) -> JsDecodedImage {
        let config = ExportConfig {
            width,
            height,
            ..ExportConfig::default()
        };
        let canvas = render(
            self.inner.grid(),
            self.inner.images(),
            self.inner.transforms(),
            self.inner.padding(),
            &config,
        );
        JsDecodedImage::from_decoded(canvas)
    }
}

impl JsEditor {
    fn export_bytes(&self, config: &ExportConfig, timestamp: Option<f64>) -> Result<Vec<u8>, JsValue> {
        let exported = self
            .inner
            .export(config, resolve_timestamp(timestamp))
            .map_err(to_js)?;
        Ok(exported.bytes)
    }
}

fn resolve_timestamp(timestamp: Option<f64>) -> u64 {
    let ms = timestamp.unwrap_or_else(js_sys::Date::now);
    if ms.is_finite() && ms > 0.0 {
        ms as u64
    } else {
        0
    }
}
