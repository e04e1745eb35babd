//! imgcut - image grid cutter for the web
//!
//! Slices a raster image into a grid of cells in the browser via
//! WebAssembly and Canvas 2D:
//! - Draggable grid lines, merge and delete, per-cell hyperlinks
//! - Spatially exact HTML `<table>` output in two variants
//!   (externally hosted crops, or self-contained data URIs)
//! - ZIP download of all cell crops
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { ImgCut } from 'imgcut';
//! await init();
//! const editor = new ImgCut(canvas);
//! editor.load_image(bytes, file.name);
//! editor.generate_table();
//! const html = editor.html_code();
//! ```

// Document and geometry modules
pub mod crop;
pub mod document;
pub mod error;
pub mod export;
pub mod layout;
pub mod types;

// Editing and rendering modules (Canvas 2D)
pub mod editor;
pub mod render;

use wasm_bindgen::prelude::*;

// Re-export the main editor structs
pub use document::GridDocument;
pub use editor::GridEditor;
#[cfg(target_arch = "wasm32")]
pub use editor::ImgCut;

pub use error::{ImgcutError, Result};
pub use types::*;

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
