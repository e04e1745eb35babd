//! Common test utilities for driving the editor headlessly.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_possible_truncation
)]

use image::{Rgba, RgbaImage};
use imgcut::GridEditor;

/// A two-tone raster: left third red, the rest blue.
#[must_use]
pub fn two_tone_raster(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, _| {
        if x < width / 3 {
            Rgba([255, 0, 0, 255])
        } else {
            Rgba([0, 0, 255, 255])
        }
    })
}

/// Editor with a `width`×`height` image and the default 3×3 grid.
#[must_use]
pub fn editor_with_image(width: u32, height: u32) -> GridEditor {
    let mut editor = GridEditor::new();
    editor.load_raster(two_tone_raster(width, height), "banner.png");
    editor
}

/// Plain click at `(x, y)`: press and release in place.
pub fn click(editor: &mut GridEditor, x: f64, y: f64) {
    editor.pointer_down(x, y, false);
    editor.pointer_up(x, y, false);
}

/// Modifier click (ctrl/cmd held) at `(x, y)`.
pub fn modifier_click(editor: &mut GridEditor, x: f64, y: f64) {
    editor.pointer_down(x, y, true);
    editor.pointer_up(x, y, true);
}

/// Drag from `(x1, y1)` to `(x2, y2)` without a modifier.
pub fn drag(editor: &mut GridEditor, x1: f64, y1: f64, x2: f64, y2: f64) {
    editor.pointer_down(x1, y1, false);
    editor.pointer_move(x2, y2, false);
    editor.pointer_up(x2, y2, false);
}

/// Number of `<td` openings in an HTML string.
#[must_use]
pub fn td_count(html: &str) -> usize {
    html.matches("<td").count()
}

/// Number of `<tr>` openings in an HTML string.
#[must_use]
pub fn tr_count(html: &str) -> usize {
    html.matches("<tr>").count()
}
