//! Postcard WASM - WebAssembly bindings for Postcard Builder
//!
//! This crate exposes the postcard-core editor and layout math to the
//! browser UI.
//!
//! # Module Structure
//!
//! - `editor` - `JsEditor`, the stateful editing session
//! - `geometry` - Stateless cover-fit, pan-bound and layout helpers
//! - `types` - WASM-compatible wrapper types for image data
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsEditor } from '@postcard/wasm';
//!
//! await init();
//!
//! const editor = new JsEditor();
//! editor.import_image(file.name, new Uint8Array(await file.arrayBuffer()));
//! const png = editor.export_png(undefined);
//! ```

use wasm_bindgen::prelude::*;

mod editor;
mod geometry;
mod types;

pub use editor::JsEditor;
pub use geometry::{base_fit, canvas_layout, max_offsets};
pub use types::{decode_photo, JsDecodedImage};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Report a problem that was handled without failing the caller.
pub(crate) fn console_warn(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&JsValue::from_str(message));

    #[cfg(not(target_arch = "wasm32"))]
    let _ = message;
}
