//! The grid editor.
//!
//! [`GridEditor`] owns the document, selection, drag state, and generated
//! output; it is plain Rust and fully testable off the browser. The
//! [`ImgCut`] struct (wasm32 only) wraps it for JavaScript, wiring a
//! canvas, clipboard, and the JS event handlers to the editor.

mod events;

pub use events::{CLICK_JITTER, LINE_HIT_THRESHOLD};

use std::collections::{HashMap, HashSet};

use crate::crop::{self, SourceImage};
use crate::document::GridDocument;
use crate::error::{ImgcutError, Result};
use crate::export::{
    apply_alignment, archive_name, build_archive, write_tables, ExportConfig, TableAlignment,
    TableSnapshot,
};
use crate::layout::display_columns;
use crate::render::{draw_overlay, OverlayFrame, Surface};
use crate::types::{DragLine, DragSelection, LineAxis};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;
#[cfg(target_arch = "wasm32")]
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// Editor state over one image and its grid.
pub struct GridEditor {
    /// The authoritative grid document.
    pub doc: GridDocument,
    image: Option<SourceImage>,
    selected: HashSet<String>,
    drag: Option<DragSelection>,
    drag_line: Option<DragLine>,
    data_uris: HashMap<String, String>,
    base_html: String,
    base_preview: String,
    html_code: String,
    preview_html: String,
    alignment: TableAlignment,
    has_generated_once: bool,
    is_generating: bool,
    export: ExportConfig,
}

impl Default for GridEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl GridEditor {
    /// Create an editor with no image loaded.
    #[must_use]
    pub fn new() -> Self {
        GridEditor {
            doc: GridDocument::new(0.0, 0.0),
            image: None,
            selected: HashSet::new(),
            drag: None,
            drag_line: None,
            data_uris: HashMap::new(),
            base_html: String::new(),
            base_preview: String::new(),
            html_code: String::new(),
            preview_html: String::new(),
            alignment: TableAlignment::default(),
            has_generated_once: false,
            is_generating: false,
            export: ExportConfig::default(),
        }
    }

    /// Decode image bytes and start a fresh document over it.
    pub fn load_bytes(&mut self, data: &[u8], name: &str) -> Result<()> {
        let image = SourceImage::decode(data, name)?;
        self.install(image);
        Ok(())
    }

    /// Install an already-decoded raster (tests, headless use).
    pub fn load_raster(&mut self, raster: image::RgbaImage, name: &str) {
        self.install(SourceImage::from_raster(raster, name));
    }

    fn install(&mut self, image: SourceImage) {
        self.doc = GridDocument::new(image.width(), image.height());
        self.image = Some(image);
        self.selected.clear();
        self.drag = None;
        self.drag_line = None;
        self.data_uris.clear();
        self.base_html.clear();
        self.base_preview.clear();
        self.html_code.clear();
        self.preview_html.clear();
        self.has_generated_once = false;
        self.is_generating = false;
    }

    /// Pixel dimensions of the loaded image, if any.
    #[must_use]
    pub fn image_size(&self) -> Option<(u32, u32)> {
        self.image
            .as_ref()
            .map(|img| (img.raster.width(), img.raster.height()))
    }

    /// Currently selected cell ids.
    #[must_use]
    pub fn selected(&self) -> &HashSet<String> {
        &self.selected
    }

    // ---- Structural edits ----

    /// Add a grid line (even re-partition of the axis).
    pub fn add_line(&mut self, axis: LineAxis) {
        self.doc.add_line(axis);
        self.invalidate_output();
    }

    /// Remove the last grid line on the axis.
    pub fn remove_line(&mut self, axis: LineAxis) {
        self.doc.remove_line(axis);
        self.invalidate_output();
    }

    /// Reset to the default 3×3 grid, clearing selection and output.
    pub fn reset_grid(&mut self) {
        self.doc.reset(3, 3);
        self.selected.clear();
        self.data_uris.clear();
        self.base_html.clear();
        self.base_preview.clear();
        self.html_code.clear();
        self.preview_html.clear();
        self.has_generated_once = false;
    }

    /// Merge the selected cells; the merge result becomes the selection.
    pub fn merge_selection(&mut self) -> Result<()> {
        let merged_id = self.doc.merge_cells(&self.selected)?;
        self.selected.clear();
        self.selected.insert(merged_id);
        self.invalidate_output();
        Ok(())
    }

    /// Delete the selected cells and clear the selection.
    pub fn delete_selection(&mut self) -> Result<()> {
        self.doc.delete_cells(&self.selected)?;
        self.selected.clear();
        self.invalidate_output();
        Ok(())
    }

    // ---- Links ----

    /// Attach or replace a link on an active cell.
    pub fn set_link(&mut self, cell_id: &str, url: &str) -> Result<()> {
        self.doc.set_link(cell_id, url)?;
        self.invalidate_output();
        Ok(())
    }

    /// Remove the link on a cell.
    pub fn remove_link(&mut self, cell_id: &str) {
        self.doc.remove_link(cell_id);
        self.invalidate_output();
    }

    /// Ids of cells that carry a link.
    #[must_use]
    pub fn linked_cell_ids(&self) -> Vec<String> {
        self.doc
            .cell_links
            .iter()
            .map(|l| l.cell_id.clone())
            .collect()
    }

    // ---- Output ----

    /// Clear the aligned outputs; cached bases and the generated-once
    /// flag survive so the UI can show a "stale output" state.
    pub(crate) fn invalidate_output(&mut self) {
        self.html_code.clear();
        self.preview_html.clear();
    }

    /// Generate both table variants and the data-URI cache.
    ///
    /// Rejected with [`ImgcutError::Busy`] while a run is in flight and
    /// with [`ImgcutError::NoImage`] before an image is loaded. The run
    /// works on a snapshot taken up front; structural edits during the
    /// run (impossible from the single-threaded JS side) would not be
    /// observed.
    pub fn generate_table(&mut self) -> Result<()> {
        if self.is_generating {
            return Err(ImgcutError::Busy);
        }
        if self.image.is_none() {
            return Err(ImgcutError::NoImage);
        }
        self.is_generating = true;
        let result = self.run_generation();
        self.is_generating = false;
        result
    }

    fn run_generation(&mut self) -> Result<()> {
        let image = self.image.as_ref().ok_or(ImgcutError::NoImage)?;
        let layout = self.doc.layout();
        let active = self.active_cells_owned();
        let active_refs: Vec<&crate::types::Cell> = active.iter().collect();
        let display_cols = display_columns(active.iter());

        let crops = crop::crop_cells(&image.raster, &layout, &active_refs, &display_cols)?;
        let data_uris: HashMap<String, String> = crops
            .iter()
            .map(|(id, c)| (id.clone(), crop::data_uri(&c.png)))
            .collect();

        let links: HashMap<String, String> = self
            .doc
            .cell_links
            .iter()
            .map(|l| (l.cell_id.clone(), l.link_url.clone()))
            .collect();
        let image_stem = crop::sanitized_stem(&image.name);

        let pair = write_tables(&TableSnapshot {
            x_positions: &layout.x_positions,
            y_positions: &layout.y_positions,
            active: &active,
            deleted: &self.doc.deleted_cells,
            display_cols: &display_cols,
            links: &links,
            data_uris: &data_uris,
            image_width: image.width(),
            image_stem: &image_stem,
            base_path: &self.export.base_path,
        });

        self.data_uris = data_uris;
        self.base_html = pair.path_html;
        self.base_preview = pair.data_uri_html;
        self.has_generated_once = true;
        self.refresh_aligned();
        Ok(())
    }

    fn refresh_aligned(&mut self) {
        self.html_code = if self.base_html.is_empty() {
            String::new()
        } else {
            apply_alignment(&self.base_html, self.alignment)
        };
        self.preview_html = if self.base_preview.is_empty() {
            String::new()
        } else {
            apply_alignment(&self.base_preview, self.alignment)
        };
    }

    /// Set the table alignment and re-apply it to the cached bases.
    pub fn set_alignment(&mut self, alignment: TableAlignment) {
        self.alignment = alignment;
        self.refresh_aligned();
    }

    /// Set the base URL used by the external-path variant.
    pub fn set_base_path(&mut self, base_path: &str) {
        self.export.base_path = base_path.to_string();
    }

    /// Aligned external-path HTML (empty until generated, or after an
    /// invalidating edit).
    #[must_use]
    pub fn html_code(&self) -> &str {
        &self.html_code
    }

    /// Aligned data-URI preview HTML.
    #[must_use]
    pub fn preview_html(&self) -> &str {
        &self.preview_html
    }

    #[must_use]
    pub fn has_generated_once(&self) -> bool {
        self.has_generated_once
    }

    #[must_use]
    pub fn is_generating(&self) -> bool {
        self.is_generating
    }

    // ---- Crops ----

    /// Crop all active cells and package them into a ZIP archive.
    ///
    /// Crops fresh from the current grid state; does not require a prior
    /// `generate_table` run.
    pub fn crop_archive(&self) -> Result<Vec<u8>> {
        let image = self.image.as_ref().ok_or(ImgcutError::NoImage)?;
        let layout = self.doc.layout();
        let active = self.active_cells_owned();
        let active_refs: Vec<&crate::types::Cell> = active.iter().collect();
        let display_cols = display_columns(active.iter());
        let crops = crop::crop_cells(&image.raster, &layout, &active_refs, &display_cols)?;
        build_archive(&crops)
    }

    /// Suggested download name for the crop archive.
    pub fn archive_name(&self) -> Result<String> {
        let image = self.image.as_ref().ok_or(ImgcutError::NoImage)?;
        Ok(archive_name(&image.name))
    }

    // ---- Rendering ----

    /// Draw the current frame onto a surface.
    pub fn render(&self, surface: &mut dyn Surface) {
        let layout = self.doc.layout();
        let active = self.active_cells_owned();
        let display_cols = display_columns(active.iter());
        let linked: HashSet<String> = self
            .doc
            .cell_links
            .iter()
            .map(|l| l.cell_id.clone())
            .collect();

        let frame = OverlayFrame {
            layout: &layout,
            active: &active,
            deleted: &self.doc.deleted_cells,
            h_lines: &self.doc.h_lines,
            v_lines: &self.doc.v_lines,
            selected: &self.selected,
            linked: &linked,
            display_cols: &display_cols,
            drag: self.drag,
            drag_line: self.drag_line.map(|d| (d.axis, d.index)),
            image: self
                .image
                .as_ref()
                .map(|img| (img.raster.width(), img.raster.height(), img.raster.as_raw().as_slice())),
        };
        draw_overlay(surface, &frame);
    }

    /// JSON snapshot of the document state.
    pub fn state_json(&self) -> Result<String> {
        serde_json::to_string(&self.doc).map_err(|e| ImgcutError::Other(e.to_string()))
    }
}

// ============================================================================
// WASM32 Implementation
// ============================================================================

/// The main editor struct exported to JavaScript.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub struct ImgCut {
    editor: GridEditor,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl ImgCut {
    /// Create an editor drawing onto `canvas`.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement) -> Result<ImgCut, JsValue> {
        console_error_panic_hook::set_once();
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(ImgCut {
            editor: GridEditor::new(),
            canvas,
            ctx,
        })
    }

    /// Load an image from raw file bytes. Resizes the canvas to the
    /// image's natural size and resets the grid.
    #[wasm_bindgen]
    pub fn load_image(&mut self, data: &[u8], name: &str) -> Result<(), JsValue> {
        self.editor.load_bytes(data, name)?;
        if let Some((w, h)) = self.editor.image_size() {
            self.canvas.set_width(w);
            self.canvas.set_height(h);
        }
        self.render();
        Ok(())
    }

    // ---- Pointer events (coordinates in canvas space) ----

    #[wasm_bindgen]
    pub fn pointer_down(&mut self, x: f64, y: f64, modifier: bool) {
        self.editor.pointer_down(x, y, modifier);
        self.render();
    }

    #[wasm_bindgen]
    pub fn pointer_move(&mut self, x: f64, y: f64, modifier: bool) {
        self.editor.pointer_move(x, y, modifier);
        let style = self.canvas.style();
        let _ = style.set_property("cursor", self.editor.cursor_hint(x, y));
        self.render();
    }

    #[wasm_bindgen]
    pub fn pointer_up(&mut self, x: f64, y: f64, modifier: bool) {
        self.editor.pointer_up(x, y, modifier);
        self.render();
    }

    // ---- Grid commands ----

    /// Add a horizontal line (one more row band).
    #[wasm_bindgen]
    pub fn add_row_line(&mut self) {
        self.editor.add_line(LineAxis::Horizontal);
        self.render();
    }

    /// Remove the last horizontal line.
    #[wasm_bindgen]
    pub fn remove_row_line(&mut self) {
        self.editor.remove_line(LineAxis::Horizontal);
        self.render();
    }

    /// Add a vertical line (one more column band).
    #[wasm_bindgen]
    pub fn add_col_line(&mut self) {
        self.editor.add_line(LineAxis::Vertical);
        self.render();
    }

    /// Remove the last vertical line.
    #[wasm_bindgen]
    pub fn remove_col_line(&mut self) {
        self.editor.remove_line(LineAxis::Vertical);
        self.render();
    }

    /// Reset to the default 3×3 grid.
    #[wasm_bindgen]
    pub fn reset_grid(&mut self) {
        self.editor.reset_grid();
        self.render();
    }

    /// Merge the selected cells.
    #[wasm_bindgen]
    pub fn merge_selection(&mut self) -> Result<(), JsValue> {
        self.editor.merge_selection()?;
        self.render();
        Ok(())
    }

    /// Delete the selected cells.
    #[wasm_bindgen]
    pub fn delete_selection(&mut self) -> Result<(), JsValue> {
        self.editor.delete_selection()?;
        self.render();
        Ok(())
    }

    /// Currently selected cell ids.
    #[wasm_bindgen]
    pub fn selected_ids(&self) -> Vec<String> {
        self.editor.selected().iter().cloned().collect()
    }

    // ---- Links ----

    #[wasm_bindgen]
    pub fn set_link(&mut self, cell_id: &str, url: &str) -> Result<(), JsValue> {
        self.editor.set_link(cell_id, url)?;
        self.render();
        Ok(())
    }

    #[wasm_bindgen]
    pub fn remove_link(&mut self, cell_id: &str) {
        self.editor.remove_link(cell_id);
        self.render();
    }

    #[wasm_bindgen]
    pub fn linked_cell_ids(&self) -> Vec<String> {
        self.editor.linked_cell_ids()
    }

    // ---- Output ----

    /// Generate both HTML variants and the preview data URIs.
    #[wasm_bindgen]
    pub fn generate_table(&mut self) -> Result<(), JsValue> {
        self.editor.generate_table()?;
        Ok(())
    }

    /// Aligned external-path HTML.
    #[wasm_bindgen]
    pub fn html_code(&self) -> String {
        self.editor.html_code().to_string()
    }

    /// Aligned data-URI preview HTML.
    #[wasm_bindgen]
    pub fn preview_html(&self) -> String {
        self.editor.preview_html().to_string()
    }

    /// Set table alignment: `"left"`, `"center"` or `"right"`.
    #[wasm_bindgen]
    pub fn set_alignment(&mut self, alignment: &str) -> Result<(), JsValue> {
        let parsed = TableAlignment::parse(alignment)
            .ok_or_else(|| JsValue::from_str("alignment must be left, center or right"))?;
        self.editor.set_alignment(parsed);
        Ok(())
    }

    /// Set the base URL for externally hosted crops.
    #[wasm_bindgen]
    pub fn set_base_path(&mut self, base_path: &str) {
        self.editor.set_base_path(base_path);
    }

    #[wasm_bindgen]
    pub fn has_generated_once(&self) -> bool {
        self.editor.has_generated_once()
    }

    #[wasm_bindgen]
    pub fn is_generating(&self) -> bool {
        self.editor.is_generating()
    }

    /// Copy the current external-path HTML to the clipboard.
    #[wasm_bindgen]
    pub fn copy_html_to_clipboard(&self) {
        if let Some(window) = web_sys::window() {
            let clipboard = window.navigator().clipboard();
            let _ = clipboard.write_text(self.editor.html_code());
        }
    }

    // ---- Crops ----

    /// ZIP archive of all active cell crops.
    #[wasm_bindgen]
    pub fn crop_archive(&self) -> Result<Vec<u8>, JsValue> {
        Ok(self.editor.crop_archive()?)
    }

    /// Suggested download name for the crop archive.
    #[wasm_bindgen]
    pub fn archive_name(&self) -> Result<String, JsValue> {
        Ok(self.editor.archive_name()?)
    }

    // ---- State ----

    /// Document state as a JSON string.
    #[wasm_bindgen]
    pub fn state_json(&self) -> Result<String, JsValue> {
        Ok(self.editor.state_json()?)
    }

    /// Document state as a `JsValue`.
    #[wasm_bindgen]
    pub fn state_to_js(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.editor.doc)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }

    /// Redraw the current frame.
    #[wasm_bindgen]
    pub fn render(&self) {
        let mut surface = crate::render::canvas::CanvasSurface::new(self.ctx.clone());
        self.editor.render(&mut surface);
    }
}
