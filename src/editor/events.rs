//! Pointer gesture handling for [`GridEditor`].
//!
//! Translates raw pointer coordinates into line drags, drag selections,
//! and click selection with toggle/modifier semantics. All coordinates
//! are in image space.

use std::collections::HashSet;

use crate::types::{Cell, DragLine, DragSelection, LineAxis};

use super::GridEditor;

/// Pointer-to-line hit distance, in pixels.
pub const LINE_HIT_THRESHOLD: f64 = 10.0;

/// Below this mouse-up travel a drag counts as a click.
pub const CLICK_JITTER: f64 = 5.0;

impl GridEditor {
    /// Pointer pressed at `(x, y)`. Starts a line drag when within
    /// threshold of a grid line (horizontal lines win ties), otherwise a
    /// drag selection. The selection is left untouched until the drag
    /// moves, so a click can still see the prior selection at release.
    pub fn pointer_down(&mut self, x: f64, y: f64, _modifier: bool) {
        for (i, &line_y) in self.doc.h_lines.iter().enumerate() {
            if (y - line_y).abs() < LINE_HIT_THRESHOLD {
                self.drag_line = Some(DragLine {
                    axis: LineAxis::Horizontal,
                    index: i,
                });
                return;
            }
        }
        for (i, &line_x) in self.doc.v_lines.iter().enumerate() {
            if (x - line_x).abs() < LINE_HIT_THRESHOLD {
                self.drag_line = Some(DragLine {
                    axis: LineAxis::Vertical,
                    index: i,
                });
                return;
            }
        }

        self.drag = Some(DragSelection::begin(x, y));
    }

    /// Pointer moved to `(x, y)`.
    ///
    /// A line drag moves the line (clamped and snapped by the document);
    /// a drag selection live-recomputes the overlapped set, replacing the
    /// selection unless a modifier is held.
    pub fn pointer_move(&mut self, x: f64, y: f64, modifier: bool) {
        if let Some(line) = self.drag_line {
            let position = match line.axis {
                LineAxis::Horizontal => y,
                LineAxis::Vertical => x,
            };
            self.doc.move_line(line.axis, line.index, position);
            self.invalidate_output();
            return;
        }

        if let Some(mut drag) = self.drag {
            drag.current_x = x;
            drag.current_y = y;
            self.drag = Some(drag);
            if !modifier {
                self.selected = self.cells_in_rect(drag);
            }
        }
    }

    /// Pointer released at `(x, y)`. Finalizes the gesture: a non-empty
    /// dragged set is XORed into the selection (modifier) or replaces it;
    /// an empty dragged set with sub-jitter travel falls back to click
    /// semantics, modifier included.
    pub fn pointer_up(&mut self, x: f64, y: f64, modifier: bool) {
        if self.drag_line.is_some() {
            self.drag_line = None;
            return;
        }

        let Some(mut drag) = self.drag.take() else {
            return;
        };
        drag.current_x = x;
        drag.current_y = y;
        let hit = self.cells_in_rect(drag);

        if hit.is_empty() {
            if (drag.start_x - x).abs() < CLICK_JITTER && (drag.start_y - y).abs() < CLICK_JITTER {
                self.click_select(x, y, modifier);
            }
        } else if modifier {
            for id in hit {
                if !self.selected.remove(&id) {
                    self.selected.insert(id);
                }
            }
        } else {
            self.selected = hit;
        }
    }

    /// Active cells whose pixel bounds strictly overlap the drag
    /// rectangle (open-interval intersection; touching edges do not
    /// select, and a degenerate rectangle selects nothing). Deleted
    /// footprints never enter the selection.
    fn cells_in_rect(&self, drag: DragSelection) -> HashSet<String> {
        let (x1, y1, x2, y2) = drag.bounds();
        if x1 >= x2 || y1 >= y2 {
            return HashSet::new();
        }
        let layout = self.doc.layout();
        self.doc
            .active_cells()
            .into_iter()
            .filter(|cell| {
                layout.cell_rect(cell).is_some_and(|r| {
                    r.x < x2 && r.x + r.w > x1 && r.y < y2 && r.y + r.h > y1
                })
            })
            .map(|cell| cell.id.clone())
            .collect()
    }

    /// Point selection with toggle-off: a plain click on the sole selected
    /// cell clears the selection; a modifier click toggles membership. A
    /// plain click on empty space (outside the grid or on a deleted
    /// footprint) clears the selection.
    fn click_select(&mut self, x: f64, y: f64, modifier: bool) {
        let layout = self.doc.layout();
        let hit = match (layout.band_at_y(y), layout.band_at_x(x)) {
            (Some(row), Some(col)) => self
                .doc
                .active_cells()
                .into_iter()
                .find(|c| c.covers(row, col))
                .map(|c| c.id.clone()),
            _ => None,
        };
        let Some(id) = hit else {
            if !modifier {
                self.selected.clear();
            }
            return;
        };

        if modifier {
            if !self.selected.remove(&id) {
                self.selected.insert(id);
            }
        } else if self.selected.len() == 1 && self.selected.contains(&id) {
            self.selected.clear();
        } else {
            self.selected.clear();
            self.selected.insert(id);
        }
    }

    /// Cursor hint for `(x, y)`: `"ns-resize"` over a horizontal line,
    /// `"ew-resize"` over a vertical line, `"crosshair"` during a drag,
    /// `"default"` otherwise.
    #[must_use]
    pub fn cursor_hint(&self, x: f64, y: f64) -> &'static str {
        if self.drag.is_some() {
            return "crosshair";
        }
        let near_h = self
            .doc
            .h_lines
            .iter()
            .any(|&line_y| (y - line_y).abs() < LINE_HIT_THRESHOLD);
        let near_v = self
            .doc
            .v_lines
            .iter()
            .any(|&line_x| (x - line_x).abs() < LINE_HIT_THRESHOLD);
        match (near_h, near_v) {
            (true, false) => "ns-resize",
            (false, true) => "ew-resize",
            (true, true) => "crosshair",
            (false, false) => "default",
        }
    }

    pub(crate) fn active_cells_owned(&self) -> Vec<Cell> {
        self.doc.active_cells().into_iter().cloned().collect()
    }
}
