//! Rendering.
//!
//! Drawing goes through the [`Surface`] trait so the overlay logic stays
//! testable off the browser. The Canvas 2D implementation lives in
//! `canvas` (wasm32 only); tests use [`RecordingSurface`].

#[cfg(target_arch = "wasm32")]
pub mod canvas;
mod overlay;
pub mod palette;
mod recording;

pub use overlay::{draw_overlay, OverlayFrame};
pub use recording::{DrawOp, RecordingSurface};

/// Abstract 2D drawing surface.
///
/// A thin slice of the Canvas 2D state machine: enough for the grid
/// overlay, nothing more.
pub trait Surface {
    /// Draw raw RGBA pixels at the origin.
    fn blit_rgba(&mut self, width: u32, height: u32, rgba: &[u8]);
    fn set_fill(&mut self, color: &str);
    fn set_stroke(&mut self, color: &str);
    fn set_line_width(&mut self, width: f64);
    /// Set the dash pattern; an empty slice resets to solid.
    fn set_line_dash(&mut self, segments: &[f64]);
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64);
    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64);
    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64);
    fn set_font(&mut self, font: &str);
    fn set_text_align(&mut self, align: &str);
    fn set_text_baseline(&mut self, baseline: &str);
    fn fill_text(&mut self, text: &str, x: f64, y: f64);
    /// Measured width of `text` under the current font.
    fn text_width(&mut self, text: &str) -> f64;
}
