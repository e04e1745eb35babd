//! Pre-computed band geometry for a grid.
//!
//! Boundary positions are derived once from the stored grid lines,
//! enabling O(log n) band lookups for hit testing and O(1) rects.

use crate::types::Cell;

/// Rectangle in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// X position (left edge)
    pub x: f64,
    /// Y position (top edge)
    pub y: f64,
    /// Width
    pub w: f64,
    /// Height
    pub h: f64,
}

/// Derive sorted boundary positions from interior lines.
///
/// Returns `[0, ...lines ascending..., extent]`. The stored line vector is
/// never mutated; ordering is applied to a copy.
#[must_use]
pub fn boundaries(lines: &[f64], extent: f64) -> Vec<f64> {
    let mut sorted = lines.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mut positions = Vec::with_capacity(sorted.len() + 2);
    positions.push(0.0);
    positions.extend(sorted);
    positions.push(extent);
    positions
}

/// Pre-computed layout for a grid over a `width` × `height` image.
#[derive(Debug, Clone)]
pub struct GridLayout {
    /// Column boundary positions (`x_positions[i]` = x of column band i's left edge)
    pub x_positions: Vec<f64>,
    /// Row boundary positions (`y_positions[i]` = y of row band i's top edge)
    pub y_positions: Vec<f64>,
}

impl GridLayout {
    /// Build a layout from interior grid lines and image dimensions.
    ///
    /// `h_lines` are horizontal line y-values (partition rows);
    /// `v_lines` are vertical line x-values (partition columns).
    #[must_use]
    pub fn new(h_lines: &[f64], v_lines: &[f64], width: f64, height: f64) -> Self {
        GridLayout {
            x_positions: boundaries(v_lines, width),
            y_positions: boundaries(h_lines, height),
        }
    }

    /// Number of row bands.
    #[must_use]
    pub fn rows(&self) -> u32 {
        u32::try_from(self.y_positions.len().saturating_sub(1)).unwrap_or(0)
    }

    /// Number of column bands.
    #[must_use]
    pub fn cols(&self) -> u32 {
        u32::try_from(self.x_positions.len().saturating_sub(1)).unwrap_or(0)
    }

    /// Total width covered by the layout.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.x_positions.last().copied().unwrap_or(0.0)
    }

    /// Total height covered by the layout.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.y_positions.last().copied().unwrap_or(0.0)
    }

    /// Find the row band at a y position (binary search).
    ///
    /// Returns `None` outside `[0, height)`.
    #[must_use]
    pub fn band_at_y(&self, y: f64) -> Option<u32> {
        Self::band_at(&self.y_positions, y)
    }

    /// Find the column band at an x position (binary search).
    ///
    /// Returns `None` outside `[0, width)`.
    #[must_use]
    pub fn band_at_x(&self, x: f64) -> Option<u32> {
        Self::band_at(&self.x_positions, x)
    }

    fn band_at(positions: &[f64], value: f64) -> Option<u32> {
        let band_count = positions.len().checked_sub(1)?;
        if band_count == 0 {
            return None;
        }
        let idx = match positions
            .binary_search_by(|pos| pos.partial_cmp(&value).unwrap_or(std::cmp::Ordering::Equal))
        {
            Ok(i) => i,
            // Err(0) means the value sits below the first boundary
            Err(0) => return None,
            Err(i) => i - 1,
        };
        if idx >= band_count {
            return None;
        }
        u32::try_from(idx).ok()
    }

    /// Bounds of the single unit band at `(row, col)`.
    #[must_use]
    pub fn unit_rect(&self, row: u32, col: u32) -> Option<Rect> {
        self.span_rect(row, col, 1, 1)
    }

    /// Bounds of a cell's full footprint (merged cells span multiple bands).
    #[must_use]
    pub fn cell_rect(&self, cell: &Cell) -> Option<Rect> {
        self.span_rect(cell.row, cell.col, cell.row_span, cell.col_span)
    }

    fn span_rect(&self, row: u32, col: u32, row_span: u32, col_span: u32) -> Option<Rect> {
        let x1 = self.x_positions.get(col as usize).copied()?;
        let x2 = self.x_positions.get((col + col_span) as usize).copied()?;
        let y1 = self.y_positions.get(row as usize).copied()?;
        let y2 = self.y_positions.get((row + row_span) as usize).copied()?;
        Some(Rect {
            x: x1,
            y: y1,
            w: x2 - x1,
            h: y2 - y1,
        })
    }

    /// Skip segments for a horizontal line drawn at `y`: the x-intervals
    /// where a merged cell's interior crosses the line, coalesced.
    #[must_use]
    pub fn h_line_skips(&self, cells: &[Cell], y: f64) -> Vec<(f64, f64)> {
        let mut ranges: Vec<(f64, f64)> = cells
            .iter()
            .filter(|c| c.is_merged())
            .filter_map(|c| self.cell_rect(c))
            .filter(|r| r.y < y && y < r.y + r.h)
            .map(|r| (r.x, r.x + r.w))
            .collect();
        coalesce_ranges(&mut ranges);
        ranges
    }

    /// Skip segments for a vertical line drawn at `x`: the y-intervals
    /// where a merged cell's interior crosses the line, coalesced.
    #[must_use]
    pub fn v_line_skips(&self, cells: &[Cell], x: f64) -> Vec<(f64, f64)> {
        let mut ranges: Vec<(f64, f64)> = cells
            .iter()
            .filter(|c| c.is_merged())
            .filter_map(|c| self.cell_rect(c))
            .filter(|r| r.x < x && x < r.x + r.w)
            .map(|r| (r.y, r.y + r.h))
            .collect();
        coalesce_ranges(&mut ranges);
        ranges
    }
}

fn coalesce_ranges(ranges: &mut Vec<(f64, f64)>) {
    if ranges.len() <= 1 {
        return;
    }

    ranges.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
    let mut merged: Vec<(f64, f64)> = Vec::with_capacity(ranges.len());
    for (start, end) in ranges.drain(..) {
        if let Some(last) = merged.last_mut() {
            if start <= last.1 {
                if end > last.1 {
                    last.1 = end;
                }
                continue;
            }
        }
        merged.push((start, end));
    }
    *ranges = merged;
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
    fn boundaries_sort_a_copy() {
        let lines = vec![300.0, 100.0, 200.0];
        let positions = boundaries(&lines, 400.0);
        assert_eq!(positions, vec![0.0, 100.0, 200.0, 300.0, 400.0]);
        // The input vector keeps its insertion order
        assert_eq!(lines, vec![300.0, 100.0, 200.0]);
    }

    #[test]
    fn boundaries_of_empty_lines() {
        assert_eq!(boundaries(&[], 600.0), vec![0.0, 600.0]);
    }

    #[test]
    fn band_lookup() {
        let layout = GridLayout::new(&[100.0], &[120.0, 240.0], 360.0, 200.0);
        assert_eq!(layout.rows(), 2);
        assert_eq!(layout.cols(), 3);

        assert_eq!(layout.band_at_x(0.0), Some(0));
        assert_eq!(layout.band_at_x(119.9), Some(0));
        assert_eq!(layout.band_at_x(120.0), Some(1));
        assert_eq!(layout.band_at_x(359.9), Some(2));
        assert_eq!(layout.band_at_x(360.0), None);
        assert_eq!(layout.band_at_x(-1.0), None);

        assert_eq!(layout.band_at_y(99.0), Some(0));
        assert_eq!(layout.band_at_y(100.0), Some(1));
        assert_eq!(layout.band_at_y(200.0), None);
    }

    #[test]
    fn unit_and_merged_rects() {
        let layout = GridLayout::new(&[100.0], &[120.0, 240.0], 360.0, 200.0);

        let unit = layout.unit_rect(1, 2).unwrap();
        assert_eq!(unit, Rect { x: 240.0, y: 100.0, w: 120.0, h: 100.0 });

        let merged = Cell {
            id: "0-0-merged-1".to_string(),
            row: 0,
            col: 0,
            row_span: 2,
            col_span: 2,
        };
        let rect = layout.cell_rect(&merged).unwrap();
        assert_eq!(rect, Rect { x: 0.0, y: 0.0, w: 240.0, h: 200.0 });
    }

    #[test]
    fn rect_out_of_range_is_none() {
        let layout = GridLayout::new(&[100.0], &[120.0], 240.0, 200.0);
        assert!(layout.unit_rect(2, 0).is_none());
        assert!(layout.unit_rect(0, 2).is_none());
    }

    #[test]
    fn horizontal_line_skips_cross_merged_interior() {
        let layout = GridLayout::new(&[100.0], &[120.0, 240.0], 360.0, 200.0);
        let merged = Cell {
            id: "0-0-merged-1".to_string(),
            row: 0,
            col: 0,
            row_span: 2,
            col_span: 2,
        };
        let cells = vec![merged, Cell::plain(0, 2), Cell::plain(1, 2)];

        // The line at y=100 crosses the merged interior over x in (0, 240)
        assert_eq!(layout.h_line_skips(&cells, 100.0), vec![(0.0, 240.0)]);
        // A line outside the interior has no skips
        assert!(layout.h_line_skips(&cells, 0.0).is_empty());
    }

    #[test]
    fn vertical_line_skips_coalesce() {
        let layout = GridLayout::new(&[50.0, 100.0, 150.0], &[100.0], 200.0, 200.0);
        let top = Cell {
            id: "0-0-merged-1".to_string(),
            row: 0,
            col: 0,
            row_span: 2,
            col_span: 2,
        };
        let bottom = Cell {
            id: "1-0-merged-2".to_string(),
            row: 1,
            col: 0,
            row_span: 2,
            col_span: 2,
        };
        let cells = vec![top, bottom];

        // Overlapping skip intervals on x=100 merge into one
        assert_eq!(layout.v_line_skips(&cells, 100.0), vec![(0.0, 150.0)]);
    }
}
