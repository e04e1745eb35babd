//! Grid cell types.
//!
//! A cell occupies a rectangular footprint of unit bands, addressed by its
//! top-left band `(row, col)` and its `row_span`/`col_span`. Plain cells
//! have span 1×1; merged cells cover more.

use serde::{Deserialize, Serialize};

/// A single grid cell (plain or merged).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    /// Stable identity. Plain cells use `"{row}-{col}"`; merged cells use
    /// `"{row}-{col}-merged-{timestamp}"`.
    pub id: String,
    /// Top-left row band index.
    pub row: u32,
    /// Top-left column band index.
    pub col: u32,
    /// Number of row bands covered.
    pub row_span: u32,
    /// Number of column bands covered.
    pub col_span: u32,
}

impl Cell {
    /// Create a plain 1×1 cell with the canonical `"{row}-{col}"` id.
    #[must_use]
    pub fn plain(row: u32, col: u32) -> Self {
        Cell {
            id: format!("{row}-{col}"),
            row,
            col,
            row_span: 1,
            col_span: 1,
        }
    }

    /// True if this cell spans more than one unit band.
    #[must_use]
    pub fn is_merged(&self) -> bool {
        self.row_span > 1 || self.col_span > 1
    }

    /// True if the footprint covers unit `(row, col)`.
    #[must_use]
    pub fn covers(&self, row: u32, col: u32) -> bool {
        row >= self.row
            && row < self.row + self.row_span
            && col >= self.col
            && col < self.col + self.col_span
    }

    /// True if the footprint fits inside a `rows` × `cols` grid.
    #[must_use]
    pub fn fits(&self, rows: u32, cols: u32) -> bool {
        self.row + self.row_span <= rows && self.col + self.col_span <= cols
    }
}
