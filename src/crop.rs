//! Source image handling and per-cell crops.
//!
//! Cells are cropped straight out of the decoded raster and re-encoded as
//! PNG, both for the data-URI preview and for the downloadable archive.

use std::collections::HashMap;
use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use image::{imageops, DynamicImage, ImageFormat, RgbaImage};

use crate::error::Result;
use crate::layout::{GridLayout, Rect};
use crate::types::Cell;

/// A decoded source image.
#[derive(Debug, Clone)]
pub struct SourceImage {
    /// Original file name, as given by the caller.
    pub name: String,
    /// Decoded pixels.
    pub raster: RgbaImage,
}

impl SourceImage {
    /// Decode PNG/JPEG bytes into a source image.
    pub fn decode(bytes: &[u8], name: &str) -> Result<Self> {
        let img = image::load_from_memory(bytes)?;
        Ok(SourceImage {
            name: name.to_string(),
            raster: img.to_rgba8(),
        })
    }

    /// Wrap an already-decoded raster (tests, headless use).
    #[must_use]
    pub fn from_raster(raster: RgbaImage, name: &str) -> Self {
        SourceImage {
            name: name.to_string(),
            raster,
        }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        f64::from(self.raster.width())
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        f64::from(self.raster.height())
    }
}

/// One cropped cell, PNG-encoded.
#[derive(Debug, Clone)]
pub struct CellCrop {
    /// Archive file name: `cell_{row}-{col}_{w}x{h}.png` with 1-based
    /// row and display column.
    pub filename: String,
    /// PNG bytes.
    pub png: Vec<u8>,
    /// Crop width in pixels.
    pub width: u32,
    /// Crop height in pixels.
    pub height: u32,
}

/// Crop every cell in `cells` out of the raster.
///
/// Returns crops keyed by cell id. Cells with a degenerate (zero-area)
/// rect are skipped.
pub fn crop_cells(
    raster: &RgbaImage,
    layout: &GridLayout,
    cells: &[&Cell],
    display_cols: &HashMap<String, u32>,
) -> Result<HashMap<String, CellCrop>> {
    let mut crops = HashMap::with_capacity(cells.len());
    for cell in cells {
        let Some(rect) = layout.cell_rect(cell) else {
            continue;
        };
        let Some((x, y, w, h)) = pixel_rect(rect) else {
            continue;
        };
        let png = encode_png(&imageops::crop_imm(raster, x, y, w, h).to_image())?;
        let display_col = display_cols.get(&cell.id).copied().unwrap_or(0);
        crops.insert(
            cell.id.clone(),
            CellCrop {
                filename: cell_filename(cell.row, display_col, w, h),
                png,
                width: w,
                height: h,
            },
        );
    }
    Ok(crops)
}

/// Round a layout rect to whole pixels; `None` if it has no area.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn pixel_rect(rect: Rect) -> Option<(u32, u32, u32, u32)> {
    let x = rect.x.round().max(0.0) as u32;
    let y = rect.y.round().max(0.0) as u32;
    let w = rect.w.round().max(0.0) as u32;
    let h = rect.h.round().max(0.0) as u32;
    if w == 0 || h == 0 {
        return None;
    }
    Some((x, y, w, h))
}

fn encode_png(img: &RgbaImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(img.clone()).write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}

/// Encode PNG bytes as a `data:image/png;base64,...` URI.
#[must_use]
pub fn data_uri(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", BASE64.encode(png))
}

/// Archive file name for one crop. Row is 1-based; the column is the
/// display column number, not the band index.
#[must_use]
pub fn cell_filename(row: u32, display_col: u32, width: u32, height: u32) -> String {
    format!("cell_{}-{display_col}_{width}x{height}.png", row + 1)
}

/// File name without its final extension.
#[must_use]
pub fn image_stem(name: &str) -> &str {
    name.rsplit_once('.').map_or(name, |(stem, _)| stem)
}

/// Stem made safe for use as a URL path segment.
#[must_use]
pub fn sanitized_stem(name: &str) -> String {
    sanitize_filename::sanitize(image_stem(name))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn filename_uses_one_based_row_and_display_col() {
        assert_eq!(cell_filename(0, 1, 300, 150), "cell_1-1_300x150.png");
        assert_eq!(cell_filename(2, 3, 40, 25), "cell_3-3_40x25.png");
    }

    #[test]
    fn stem_strips_last_extension_only() {
        assert_eq!(image_stem("banner.png"), "banner");
        assert_eq!(image_stem("a.b.jpeg"), "a.b");
        assert_eq!(image_stem("noext"), "noext");
    }

    #[test]
    fn sanitized_stem_drops_path_separators() {
        let s = sanitized_stem("../evil/banner.png");
        assert!(!s.contains('/'));
        assert!(!s.contains(".."));
    }

    #[test]
    fn crops_match_band_geometry() {
        let raster = RgbaImage::from_fn(300, 200, |x, _| {
            if x < 100 {
                image::Rgba([255, 0, 0, 255])
            } else {
                image::Rgba([0, 0, 255, 255])
            }
        });
        let layout = GridLayout::new(&[100.0], &[100.0], 300.0, 200.0);
        let cells = vec![
            Cell::plain(0, 0),
            Cell::plain(0, 1),
            Cell::plain(1, 0),
            Cell::plain(1, 1),
        ];
        let refs: Vec<&Cell> = cells.iter().collect();
        let display_cols = crate::layout::display_columns(cells.iter());

        let crops = crop_cells(&raster, &layout, &refs, &display_cols).unwrap();
        assert_eq!(crops.len(), 4);

        let top_left = &crops["0-0"];
        assert_eq!((top_left.width, top_left.height), (100, 100));
        assert_eq!(top_left.filename, "cell_1-1_100x100.png");

        let top_right = &crops["0-1"];
        assert_eq!((top_right.width, top_right.height), (200, 100));

        // Decode a crop back and spot-check a pixel
        let decoded = image::load_from_memory(&top_left.png).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (100, 100));
        assert_eq!(decoded.get_pixel(50, 50), &image::Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn data_uri_has_png_prefix() {
        let uri = data_uri(&[1, 2, 3]);
        assert!(uri.starts_with("data:image/png;base64,"));
    }
}
