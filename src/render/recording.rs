//! A surface that records draw calls instead of rasterizing.
//!
//! Used by tests to assert on overlay output without a browser.

use super::Surface;

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    BlitRgba { width: u32, height: u32 },
    SetFill(String),
    SetStroke(String),
    SetLineWidth(f64),
    SetLineDash(Vec<f64>),
    FillRect { x: f64, y: f64, w: f64, h: f64 },
    StrokeRect { x: f64, y: f64, w: f64, h: f64 },
    Line { x1: f64, y1: f64, x2: f64, y2: f64 },
    SetFont(String),
    SetTextAlign(String),
    SetTextBaseline(String),
    FillText { text: String, x: f64, y: f64 },
}

/// Surface implementation that appends every call to `ops`.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub ops: Vec<DrawOp>,
}

impl RecordingSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Surface for RecordingSurface {
    fn blit_rgba(&mut self, width: u32, height: u32, _rgba: &[u8]) {
        self.ops.push(DrawOp::BlitRgba { width, height });
    }

    fn set_fill(&mut self, color: &str) {
        self.ops.push(DrawOp::SetFill(color.to_string()));
    }

    fn set_stroke(&mut self, color: &str) {
        self.ops.push(DrawOp::SetStroke(color.to_string()));
    }

    fn set_line_width(&mut self, width: f64) {
        self.ops.push(DrawOp::SetLineWidth(width));
    }

    fn set_line_dash(&mut self, segments: &[f64]) {
        self.ops.push(DrawOp::SetLineDash(segments.to_vec()));
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ops.push(DrawOp::FillRect { x, y, w, h });
    }

    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ops.push(DrawOp::StrokeRect { x, y, w, h });
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.ops.push(DrawOp::Line { x1, y1, x2, y2 });
    }

    fn set_font(&mut self, font: &str) {
        self.ops.push(DrawOp::SetFont(font.to_string()));
    }

    fn set_text_align(&mut self, align: &str) {
        self.ops.push(DrawOp::SetTextAlign(align.to_string()));
    }

    fn set_text_baseline(&mut self, baseline: &str) {
        self.ops.push(DrawOp::SetTextBaseline(baseline.to_string()));
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.ops.push(DrawOp::FillText {
            text: text.to_string(),
            x,
            y,
        });
    }

    fn text_width(&mut self, text: &str) -> f64 {
        // Rough fixed advance; tests only need something proportional
        text.chars().count() as f64 * 7.0
    }
}
