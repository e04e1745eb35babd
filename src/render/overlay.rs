//! Grid overlay drawing.
//!
//! Draws the source image, grid lines (broken across merged cells), cell
//! highlights and labels, link markers, and the in-progress drag
//! rectangle onto any [`Surface`].

use std::collections::{HashMap, HashSet};

use crate::layout::GridLayout;
use crate::types::{Cell, DragSelection, LineAxis};

use super::palette;
use super::Surface;

/// Handle tab length along the line, in pixels.
const HANDLE_LONG: f64 = 25.0;
/// Handle tab thickness across the line, in pixels.
const HANDLE_SHORT: f64 = 10.0;

/// Everything the overlay needs for one frame.
pub struct OverlayFrame<'a> {
    pub layout: &'a GridLayout,
    /// Active (non-deleted) cells.
    pub active: &'a [Cell],
    /// Deleted cells; their footprints get shaded out.
    pub deleted: &'a [Cell],
    /// Horizontal line y-values, in stored order.
    pub h_lines: &'a [f64],
    /// Vertical line x-values, in stored order.
    pub v_lines: &'a [f64],
    /// Ids of selected cells.
    pub selected: &'a HashSet<String>,
    /// Ids of cells that carry a link.
    pub linked: &'a HashSet<String>,
    /// Display column numbers keyed by cell id.
    pub display_cols: &'a HashMap<String, u32>,
    /// In-progress drag selection, if any.
    pub drag: Option<DragSelection>,
    /// Line currently being dragged `(axis, index)`, if any.
    pub drag_line: Option<(LineAxis, usize)>,
    /// Decoded source image `(width, height, rgba)`, if loaded.
    pub image: Option<(u32, u32, &'a [u8])>,
}

/// Draw one full overlay frame.
pub fn draw_overlay(surface: &mut dyn Surface, frame: &OverlayFrame<'_>) {
    if let Some((w, h, rgba)) = frame.image {
        surface.blit_rgba(w, h, rgba);
    }

    draw_deleted(surface, frame);
    draw_grid_lines(surface, frame);
    draw_cells(surface, frame);
    draw_drag_rect(surface, frame);
}

fn draw_deleted(surface: &mut dyn Surface, frame: &OverlayFrame<'_>) {
    surface.set_fill(palette::DELETED_FILL);
    for cell in frame.deleted {
        if let Some(rect) = frame.layout.cell_rect(cell) {
            surface.fill_rect(rect.x, rect.y, rect.w, rect.h);
        }
    }
}

fn draw_grid_lines(surface: &mut dyn Surface, frame: &OverlayFrame<'_>) {
    let width = frame.layout.width();
    let height = frame.layout.height();
    surface.set_line_width(2.0);

    for (i, &y) in frame.h_lines.iter().enumerate() {
        let active = frame.drag_line == Some((LineAxis::Horizontal, i));
        let color = if active {
            palette::GRID_LINE_ACTIVE
        } else {
            palette::GRID_LINE
        };
        surface.set_stroke(color);

        let skips = frame.layout.h_line_skips(frame.active, y);
        let mut x = 0.0;
        for (sx, ex) in &skips {
            if *sx > x {
                surface.line(x, y, *sx, y);
            }
            x = x.max(*ex);
        }
        if x < width {
            surface.line(x, y, width, y);
        }

        // Drag handle tab at the right edge
        surface.set_fill(color);
        surface.fill_rect(
            width - HANDLE_LONG - 5.0,
            y - HANDLE_SHORT / 2.0,
            HANDLE_LONG,
            HANDLE_SHORT,
        );
    }

    for (i, &x) in frame.v_lines.iter().enumerate() {
        let active = frame.drag_line == Some((LineAxis::Vertical, i));
        let color = if active {
            palette::GRID_LINE_ACTIVE
        } else {
            palette::GRID_LINE
        };
        surface.set_stroke(color);

        let skips = frame.layout.v_line_skips(frame.active, x);
        let mut y = 0.0;
        for (sy, ey) in &skips {
            if *sy > y {
                surface.line(x, y, x, *sy);
            }
            y = y.max(*ey);
        }
        if y < height {
            surface.line(x, y, x, height);
        }

        // Drag handle tab at the bottom edge
        surface.set_fill(color);
        surface.fill_rect(
            x - HANDLE_SHORT / 2.0,
            height - HANDLE_LONG - 5.0,
            HANDLE_SHORT,
            HANDLE_LONG,
        );
    }
}

fn draw_cells(surface: &mut dyn Surface, frame: &OverlayFrame<'_>) {
    for cell in frame.active {
        let Some(rect) = frame.layout.cell_rect(cell) else {
            continue;
        };

        let is_selected = frame.selected.contains(&cell.id);
        let is_linked = frame.linked.contains(&cell.id);

        if is_selected {
            surface.set_fill(palette::SELECTED_FILL);
            surface.fill_rect(rect.x, rect.y, rect.w, rect.h);
            surface.set_stroke(palette::SELECTED_BORDER);
            surface.set_line_width(3.0);
            surface.stroke_rect(rect.x, rect.y, rect.w, rect.h);
        } else if is_linked {
            surface.set_fill(palette::LINKED_FILL);
            surface.fill_rect(rect.x, rect.y, rect.w, rect.h);
            surface.set_stroke(palette::LINKED_BORDER);
            surface.set_line_width(2.0);
            surface.stroke_rect(rect.x, rect.y, rect.w, rect.h);
        }

        draw_cell_label(surface, frame, cell, rect.x, rect.y, rect.w, rect.h);

        if is_linked {
            surface.set_font("16px sans-serif");
            surface.set_text_align("right");
            surface.set_text_baseline("top");
            surface.fill_text("\u{1F517}", rect.x + rect.w - 5.0, rect.y + 5.0);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_cell_label(
    surface: &mut dyn Surface,
    frame: &OverlayFrame<'_>,
    cell: &Cell,
    x: f64,
    y: f64,
    w: f64,
    h: f64,
) {
    let display_col = frame.display_cols.get(&cell.id).copied().unwrap_or(0);
    let label = format!("{}-{}", cell.row + 1, display_col);

    let font_size = (w.min(h) * 0.08).max(14.0);
    surface.set_font(&format!("bold {font_size}px sans-serif"));
    surface.set_text_align("center");
    surface.set_text_baseline("middle");

    let cx = x + w / 2.0;
    let cy = y + h / 2.0;
    let text_w = surface.text_width(&label);

    surface.set_fill(palette::LABEL_BG);
    surface.fill_rect(
        cx - text_w / 2.0 - 4.0,
        cy - font_size / 2.0 - 3.0,
        text_w + 8.0,
        font_size + 6.0,
    );
    surface.set_fill(palette::LABEL_FG);
    surface.fill_text(&label, cx, cy);
}

fn draw_drag_rect(surface: &mut dyn Surface, frame: &OverlayFrame<'_>) {
    let Some(drag) = frame.drag else {
        return;
    };
    let (x1, y1, x2, y2) = drag.bounds();
    let (w, h) = (x2 - x1, y2 - y1);

    surface.set_fill(palette::DRAG_FILL);
    surface.fill_rect(x1, y1, w, h);
    surface.set_stroke(palette::DRAG_BORDER);
    surface.set_line_width(2.0);
    surface.set_line_dash(&[5.0, 5.0]);
    surface.stroke_rect(x1, y1, w, h);
    surface.set_line_dash(&[]);
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
    use crate::render::{DrawOp, RecordingSurface};

    fn plain_grid() -> (GridLayout, Vec<Cell>) {
        let layout = GridLayout::new(&[100.0], &[100.0], 200.0, 200.0);
        let cells = vec![
            Cell::plain(0, 0),
            Cell::plain(0, 1),
            Cell::plain(1, 0),
            Cell::plain(1, 1),
        ];
        (layout, cells)
    }

    #[test]
    fn grid_line_broken_across_merged_cell() {
        let layout = GridLayout::new(&[100.0], &[100.0], 200.0, 200.0);
        let merged = Cell {
            id: "0-0-merged-7".to_string(),
            row: 0,
            col: 0,
            row_span: 2,
            col_span: 1,
        };
        let cells = vec![merged, Cell::plain(0, 1), Cell::plain(1, 1)];
        let display_cols = crate::layout::display_columns(cells.iter());

        let mut surface = RecordingSurface::new();
        let frame = OverlayFrame {
            layout: &layout,
            active: &cells,
            deleted: &[],
            h_lines: &[100.0],
            v_lines: &[100.0],
            selected: &HashSet::new(),
            linked: &HashSet::new(),
            display_cols: &display_cols,
            drag: None,
            drag_line: None,
            image: None,
        };
        draw_overlay(&mut surface, &frame);

        // The y=100 line must not cross x in (0, 100): only the segment
        // from 100 to 200 is drawn.
        let h_segments: Vec<_> = surface
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Line { x1, y1, x2, y2 } if *y1 == 100.0 && *y2 == 100.0 => {
                    Some((*x1, *x2))
                }
                _ => None,
            })
            .collect();
        assert_eq!(h_segments, vec![(100.0, 200.0)]);
    }

    #[test]
    fn selected_cell_gets_fill_and_border() {
        let (layout, cells) = plain_grid();
        let display_cols = crate::layout::display_columns(cells.iter());
        let selected: HashSet<String> = ["1-1".to_string()].into_iter().collect();

        let mut surface = RecordingSurface::new();
        let frame = OverlayFrame {
            layout: &layout,
            active: &cells,
            deleted: &[],
            h_lines: &[100.0],
            v_lines: &[100.0],
            selected: &selected,
            linked: &HashSet::new(),
            display_cols: &display_cols,
            drag: None,
            drag_line: None,
            image: None,
        };
        draw_overlay(&mut surface, &frame);

        assert!(surface
            .ops
            .contains(&DrawOp::SetStroke(palette::SELECTED_BORDER.to_string())));
        assert!(surface.ops.contains(&DrawOp::StrokeRect {
            x: 100.0,
            y: 100.0,
            w: 100.0,
            h: 100.0
        }));
    }

    #[test]
    fn drag_rect_is_dashed_and_reset() {
        let (layout, cells) = plain_grid();
        let display_cols = crate::layout::display_columns(cells.iter());

        let mut drag = DragSelection::begin(150.0, 150.0);
        drag.current_x = 20.0;
        drag.current_y = 30.0;

        let mut surface = RecordingSurface::new();
        let frame = OverlayFrame {
            layout: &layout,
            active: &cells,
            deleted: &[],
            h_lines: &[100.0],
            v_lines: &[100.0],
            selected: &HashSet::new(),
            linked: &HashSet::new(),
            display_cols: &display_cols,
            drag: Some(drag),
            drag_line: None,
            image: None,
        };
        draw_overlay(&mut surface, &frame);

        let dashes: Vec<_> = surface
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::SetLineDash(v) => Some(v.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(dashes, vec![vec![5.0, 5.0], vec![]]);
        // Normalized rect
        assert!(surface.ops.contains(&DrawOp::StrokeRect {
            x: 20.0,
            y: 30.0,
            w: 130.0,
            h: 120.0
        }));
    }
}
