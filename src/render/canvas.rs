//! Canvas 2D implementation of [`Surface`] (wasm32 only).

use wasm_bindgen::Clamped;
use web_sys::{CanvasRenderingContext2d, ImageData};

use super::Surface;

/// A [`Surface`] backed by a `CanvasRenderingContext2d`.
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    #[must_use]
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        CanvasSurface { ctx }
    }
}

impl Surface for CanvasSurface {
    fn blit_rgba(&mut self, width: u32, height: u32, rgba: &[u8]) {
        if let Ok(data) = ImageData::new_with_u8_clamped_array_and_sh(Clamped(rgba), width, height)
        {
            let _ = self.ctx.put_image_data(&data, 0.0, 0.0);
        }
    }

    fn set_fill(&mut self, color: &str) {
        self.ctx.set_fill_style_str(color);
    }

    fn set_stroke(&mut self, color: &str) {
        self.ctx.set_stroke_style_str(color);
    }

    fn set_line_width(&mut self, width: f64) {
        self.ctx.set_line_width(width);
    }

    fn set_line_dash(&mut self, segments: &[f64]) {
        let array = js_sys::Array::new();
        for &seg in segments {
            array.push(&wasm_bindgen::JsValue::from_f64(seg));
        }
        let _ = self.ctx.set_line_dash(&array);
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ctx.fill_rect(x, y, w, h);
    }

    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ctx.stroke_rect(x, y, w, h);
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.ctx.begin_path();
        self.ctx.move_to(x1, y1);
        self.ctx.line_to(x2, y2);
        self.ctx.stroke();
    }

    fn set_font(&mut self, font: &str) {
        self.ctx.set_font(font);
    }

    fn set_text_align(&mut self, align: &str) {
        self.ctx.set_text_align(align);
    }

    fn set_text_baseline(&mut self, baseline: &str) {
        self.ctx.set_text_baseline(baseline);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        let _ = self.ctx.fill_text(text, x, y);
    }

    fn text_width(&mut self, text: &str) -> f64 {
        self.ctx
            .measure_text(text)
            .map(|m| m.width())
            .unwrap_or(0.0)
    }
}
