//! The editable grid document.
//!
//! Holds the authoritative state: image dimensions, interior grid lines in
//! insertion order, the cell list, deleted-cell records, and per-cell
//! links. All mutations re-establish the coverage invariant (every unit
//! band is covered by exactly one cell) and prune dangling links.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{ImgcutError, Result};
use crate::layout::GridLayout;
use crate::types::{is_valid_link_url, Cell, CellLink, LineAxis};

/// Minimum distance a grid line keeps from the image edges, in pixels.
pub const LINE_EDGE_MARGIN: f64 = 10.0;

/// A grid document over one source image.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridDocument {
    /// Image width in pixels.
    pub width: f64,
    /// Image height in pixels.
    pub height: f64,
    /// Horizontal line y-values, in insertion order (not sorted).
    #[serde(rename = "horizontalLines")]
    pub h_lines: Vec<f64>,
    /// Vertical line x-values, in insertion order (not sorted).
    #[serde(rename = "verticalLines")]
    pub v_lines: Vec<f64>,
    /// All cells, including ones whose id is also in `deleted_cells`.
    pub cells: Vec<Cell>,
    /// Deleted cells, keyed by id. A cell in `cells` with a matching id
    /// is inactive.
    pub deleted_cells: Vec<Cell>,
    /// Per-cell hyperlinks.
    pub cell_links: Vec<CellLink>,
}

impl GridDocument {
    /// Create a document with the default 3×3 grid.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        let mut doc = GridDocument {
            width,
            height,
            h_lines: Vec::new(),
            v_lines: Vec::new(),
            cells: Vec::new(),
            deleted_cells: Vec::new(),
            cell_links: Vec::new(),
        };
        doc.reset(3, 3);
        doc
    }

    /// Reset to an even `rows` × `cols` partition, discarding merges,
    /// deletions and links.
    pub fn reset(&mut self, rows: u32, cols: u32) {
        self.h_lines = even_partition(self.height, rows);
        self.v_lines = even_partition(self.width, cols);
        self.cells.clear();
        self.deleted_cells.clear();
        self.cell_links.clear();
        self.rederive_cells();
    }

    /// Number of row bands.
    #[must_use]
    pub fn rows(&self) -> u32 {
        u32::try_from(self.h_lines.len()).unwrap_or(u32::MAX).saturating_add(1)
    }

    /// Number of column bands.
    #[must_use]
    pub fn cols(&self) -> u32 {
        u32::try_from(self.v_lines.len()).unwrap_or(u32::MAX).saturating_add(1)
    }

    /// Build the band layout for the current lines.
    #[must_use]
    pub fn layout(&self) -> GridLayout {
        GridLayout::new(&self.h_lines, &self.v_lines, self.width, self.height)
    }

    /// Cells that are not deleted.
    #[must_use]
    pub fn active_cells(&self) -> Vec<&Cell> {
        let deleted: HashSet<&str> = self.deleted_cells.iter().map(|c| c.id.as_str()).collect();
        self.cells
            .iter()
            .filter(|c| !deleted.contains(c.id.as_str()))
            .collect()
    }

    /// True if the id belongs to an active cell.
    #[must_use]
    pub fn is_active(&self, cell_id: &str) -> bool {
        self.deleted_cells.iter().all(|c| c.id != cell_id)
            && self.cells.iter().any(|c| c.id == cell_id)
    }

    /// Add a grid line on `axis`, re-partitioning that axis evenly.
    pub fn add_line(&mut self, axis: LineAxis) {
        match axis {
            LineAxis::Horizontal => {
                let count = u32::try_from(self.h_lines.len()).unwrap_or(u32::MAX - 1) + 1;
                self.h_lines = even_partition(self.height, count + 1);
            }
            LineAxis::Vertical => {
                let count = u32::try_from(self.v_lines.len()).unwrap_or(u32::MAX - 1) + 1;
                self.v_lines = even_partition(self.width, count + 1);
            }
        }
        self.rederive_cells();
        self.prune_links();
    }

    /// Remove the most recently stored grid line on `axis`. No-op when the
    /// axis has no interior lines.
    pub fn remove_line(&mut self, axis: LineAxis) {
        let removed = match axis {
            LineAxis::Horizontal => self.h_lines.pop(),
            LineAxis::Vertical => self.v_lines.pop(),
        };
        if removed.is_some() {
            self.rederive_cells();
            self.prune_links();
        }
    }

    /// Move the line at `index` on `axis` to `position`, clamped to stay
    /// [`LINE_EDGE_MARGIN`] away from the image edges and rounded to a
    /// whole pixel. Band count is unchanged, so cells are kept as-is.
    pub fn move_line(&mut self, axis: LineAxis, index: usize, position: f64) {
        let extent = match axis {
            LineAxis::Horizontal => self.height,
            LineAxis::Vertical => self.width,
        };
        let hi = (extent - LINE_EDGE_MARGIN).max(LINE_EDGE_MARGIN);
        let clamped = position.clamp(LINE_EDGE_MARGIN, hi).round();
        let lines = match axis {
            LineAxis::Horizontal => &mut self.h_lines,
            LineAxis::Vertical => &mut self.v_lines,
        };
        if let Some(slot) = lines.get_mut(index) {
            *slot = clamped;
        }
    }

    /// Rebuild the cell list for the current band counts.
    ///
    /// Merged cells whose footprint still fits are preserved; every unit
    /// band not covered by a preserved merge gets a plain cell. Deleted
    /// records are untouched, so a plain cell that reappears under a
    /// previously deleted id stays inactive.
    pub fn rederive_cells(&mut self) {
        let rows = self.rows();
        let cols = self.cols();

        let merged: Vec<Cell> = self
            .cells
            .iter()
            .filter(|c| c.is_merged() && c.fits(rows, cols))
            .cloned()
            .collect();

        let mut covered = vec![false; (rows as usize) * (cols as usize)];
        for cell in &merged {
            for r in cell.row..cell.row + cell.row_span {
                for c in cell.col..cell.col + cell.col_span {
                    if let Some(slot) = covered.get_mut((r as usize) * (cols as usize) + c as usize)
                    {
                        *slot = true;
                    }
                }
            }
        }

        let mut cells = merged;
        for r in 0..rows {
            for c in 0..cols {
                let is_covered = covered
                    .get((r as usize) * (cols as usize) + c as usize)
                    .copied()
                    .unwrap_or(false);
                if !is_covered {
                    cells.push(Cell::plain(r, c));
                }
            }
        }
        self.cells = cells;
    }

    /// Merge the active cells named by `selected` into one cell.
    ///
    /// The selection must contain at least two cells and tile a solid
    /// rectangle exactly. The merged cell takes the bounding box and the
    /// id `"{row}-{col}-merged-{timestamp}"`.
    pub fn merge_cells(&mut self, selected: &HashSet<String>) -> Result<String> {
        if selected.len() < 2 {
            return Err(ImgcutError::EmptySelection);
        }

        let chosen: Vec<Cell> = self
            .active_cells()
            .into_iter()
            .filter(|c| selected.contains(&c.id))
            .cloned()
            .collect();
        if chosen.len() < 2 {
            return Err(ImgcutError::EmptySelection);
        }

        let min_row = chosen.iter().map(|c| c.row).min().unwrap_or(0);
        let min_col = chosen.iter().map(|c| c.col).min().unwrap_or(0);
        let max_row = chosen.iter().map(|c| c.row + c.row_span).max().unwrap_or(0);
        let max_col = chosen.iter().map(|c| c.col + c.col_span).max().unwrap_or(0);

        // Rectangularity: the footprints must tile the bounding box with
        // no gaps and no overlap.
        let bbox_area =
            u64::from(max_row - min_row) * u64::from(max_col - min_col);
        let total_area: u64 = chosen
            .iter()
            .map(|c| u64::from(c.row_span) * u64::from(c.col_span))
            .sum();
        if total_area != bbox_area {
            return Err(ImgcutError::MergeNotRectangular);
        }
        for r in min_row..max_row {
            for c in min_col..max_col {
                if !chosen.iter().any(|cell| cell.covers(r, c)) {
                    return Err(ImgcutError::MergeNotRectangular);
                }
            }
        }

        let merged = Cell {
            id: format!("{min_row}-{min_col}-merged-{}", now_ms()),
            row: min_row,
            col: min_col,
            row_span: max_row - min_row,
            col_span: max_col - min_col,
        };
        let merged_id = merged.id.clone();

        self.cells.retain(|c| !selected.contains(&c.id));
        self.cells.push(merged);
        self.prune_links();
        Ok(merged_id)
    }

    /// Mark the cells named by `selected` as deleted.
    pub fn delete_cells(&mut self, selected: &HashSet<String>) -> Result<()> {
        if selected.is_empty() {
            return Err(ImgcutError::EmptySelection);
        }
        let mut removed = Vec::new();
        self.cells.retain(|c| {
            if selected.contains(&c.id) {
                removed.push(c.clone());
                false
            } else {
                true
            }
        });
        for cell in removed {
            if self.deleted_cells.iter().all(|d| d.id != cell.id) {
                self.deleted_cells.push(cell);
            }
        }
        self.prune_links();
        Ok(())
    }

    /// Attach (or replace) a link on an active cell.
    pub fn set_link(&mut self, cell_id: &str, url: &str) -> Result<()> {
        if !is_valid_link_url(url) {
            return Err(ImgcutError::InvalidUrl(url.to_string()));
        }
        if !self.is_active(cell_id) {
            return Err(ImgcutError::Other(format!("no active cell {cell_id}")));
        }
        if let Some(link) = self.cell_links.iter_mut().find(|l| l.cell_id == cell_id) {
            link.link_url = url.to_string();
        } else {
            self.cell_links.push(CellLink {
                cell_id: cell_id.to_string(),
                link_url: url.to_string(),
            });
        }
        Ok(())
    }

    /// Remove the link on a cell, if any.
    pub fn remove_link(&mut self, cell_id: &str) {
        self.cell_links.retain(|l| l.cell_id != cell_id);
    }

    /// Look up the link URL for a cell id.
    #[must_use]
    pub fn link_for(&self, cell_id: &str) -> Option<&str> {
        self.cell_links
            .iter()
            .find(|l| l.cell_id == cell_id)
            .map(|l| l.link_url.as_str())
    }

    /// Drop links whose cell id no longer names an active cell.
    pub fn prune_links(&mut self) {
        let active: HashSet<String> = self
            .active_cells()
            .into_iter()
            .map(|c| c.id.clone())
            .collect();
        self.cell_links.retain(|l| active.contains(&l.cell_id));
    }
}

/// Interior lines for an even `bands` partition of `extent`, rounded to
/// whole pixels.
fn even_partition(extent: f64, bands: u32) -> Vec<f64> {
    (1..bands)
        .map(|i| (extent / f64::from(bands) * f64::from(i)).round())
        .collect()
}

/// Millisecond timestamp for merged-cell ids.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn now_ms() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now() as u64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(0))
            .unwrap_or(0)
    }
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

    fn select<const N: usize>(ids: [&str; N]) -> HashSet<String> {
        ids.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn new_document_partitions_into_thirds() {
        let doc = GridDocument::new(300.0, 150.0);
        assert_eq!(doc.v_lines, vec![100.0, 200.0]);
        assert_eq!(doc.h_lines, vec![50.0, 100.0]);
        assert_eq!(doc.cells.len(), 9);
    }

    #[test]
    fn add_line_repartitions_evenly() {
        let mut doc = GridDocument::new(400.0, 200.0);
        doc.move_line(LineAxis::Vertical, 0, 42.0);
        doc.add_line(LineAxis::Vertical);
        // Re-partition discards the moved position
        assert_eq!(doc.v_lines, vec![100.0, 200.0, 300.0]);
        assert_eq!(doc.cols(), 4);
        assert_eq!(doc.cells.len(), 12);
    }

    #[test]
    fn remove_line_pops_last() {
        let mut doc = GridDocument::new(300.0, 300.0);
        doc.move_line(LineAxis::Horizontal, 1, 250.0);
        doc.remove_line(LineAxis::Horizontal);
        assert_eq!(doc.h_lines, vec![100.0]);
        assert_eq!(doc.rows(), 2);
    }

    #[test]
    fn move_line_clamps_and_rounds() {
        let mut doc = GridDocument::new(300.0, 300.0);
        doc.move_line(LineAxis::Vertical, 0, 2.0);
        assert_eq!(doc.v_lines[0], 10.0);
        doc.move_line(LineAxis::Vertical, 0, 10_000.0);
        assert_eq!(doc.v_lines[0], 290.0);
        doc.move_line(LineAxis::Vertical, 0, 123.4);
        assert_eq!(doc.v_lines[0], 123.0);
    }

    #[test]
    fn merge_rejects_l_shape() {
        let mut doc = GridDocument::new(300.0, 300.0);
        let err = doc
            .merge_cells(&select(["0-0", "0-1", "1-0"]))
            .unwrap_err();
        assert!(matches!(err, ImgcutError::MergeNotRectangular));
    }

    #[test]
    fn merge_accepts_square_block() {
        let mut doc = GridDocument::new(300.0, 300.0);
        let id = doc
            .merge_cells(&select(["0-0", "0-1", "1-0", "1-1"]))
            .unwrap();
        assert!(id.starts_with("0-0-merged-"));
        let merged = doc.cells.iter().find(|c| c.id == id).unwrap();
        assert_eq!((merged.row_span, merged.col_span), (2, 2));
        assert_eq!(doc.active_cells().len(), 6);
    }

    #[test]
    fn merge_requires_two_cells() {
        let mut doc = GridDocument::new(300.0, 300.0);
        let err = doc.merge_cells(&select(["0-0"])).unwrap_err();
        assert!(matches!(err, ImgcutError::EmptySelection));
    }

    #[test]
    fn delete_keeps_record_and_prunes_link() {
        let mut doc = GridDocument::new(300.0, 300.0);
        doc.set_link("2-2", "https://example.com").unwrap();
        doc.delete_cells(&select(["2-2"])).unwrap();
        assert_eq!(doc.active_cells().len(), 8);
        assert_eq!(doc.deleted_cells.len(), 1);
        assert!(doc.link_for("2-2").is_none());
    }

    #[test]
    fn rederive_drops_merges_that_no_longer_fit() {
        let mut doc = GridDocument::new(300.0, 300.0);
        doc.merge_cells(&select(["1-1", "1-2", "2-1", "2-2"]))
            .unwrap();
        doc.remove_line(LineAxis::Horizontal);
        // 2 rows remain; the merge needed rows 1..3 and is gone
        assert!(doc.cells.iter().all(|c| !c.is_merged()));
        assert_eq!(doc.cells.len(), 6);
    }

    #[test]
    fn rederive_preserves_fitting_merge() {
        let mut doc = GridDocument::new(400.0, 300.0);
        let id = doc
            .merge_cells(&select(["0-0", "0-1", "1-0", "1-1"]))
            .unwrap();
        doc.add_line(LineAxis::Vertical);
        assert!(doc.cells.iter().any(|c| c.id == id));
        // 3 rows × 4 cols: merge covers 4 units, plus 8 plain cells
        assert_eq!(doc.cells.len(), 9);
    }

    #[test]
    fn deleted_plain_cell_stays_inactive_after_rederive() {
        let mut doc = GridDocument::new(300.0, 300.0);
        doc.delete_cells(&select(["1-1"])).unwrap();
        doc.add_line(LineAxis::Horizontal);
        // The synthesized "1-1" cell is filtered by the deleted record
        assert!(doc.cells.iter().any(|c| c.id == "1-1"));
        assert!(!doc.is_active("1-1"));
    }

    #[test]
    fn set_link_validates_url_and_target() {
        let mut doc = GridDocument::new(300.0, 300.0);
        assert!(matches!(
            doc.set_link("0-0", "notaurl").unwrap_err(),
            ImgcutError::InvalidUrl(_)
        ));
        assert!(doc.set_link("9-9", "https://example.com").is_err());
        doc.set_link("0-0", "https://a.example").unwrap();
        doc.set_link("0-0", "https://b.example").unwrap();
        assert_eq!(doc.link_for("0-0"), Some("https://b.example"));
        assert_eq!(doc.cell_links.len(), 1);
    }
}
