//! Grid geometry.

mod grid_layout;

pub use grid_layout::{boundaries, GridLayout, Rect};

use std::collections::{BTreeMap, HashMap};

use crate::types::Cell;

/// Per-row display column numbers, keyed by cell id.
///
/// Within each row the cells that *start* in that row are ordered by their
/// starting column band and numbered 1, 2, 3, ... This is the column number
/// shown on screen and used in crop filenames; after a merge it differs
/// from the raw band index.
#[must_use]
pub fn display_columns<'a, I>(cells: I) -> HashMap<String, u32>
where
    I: IntoIterator<Item = &'a Cell>,
{
    let mut by_row: BTreeMap<u32, Vec<&Cell>> = BTreeMap::new();
    for cell in cells {
        by_row.entry(cell.row).or_default().push(cell);
    }

    let mut numbers = HashMap::new();
    for row_cells in by_row.values_mut() {
        row_cells.sort_by_key(|c| c.col);
        for (i, cell) in row_cells.iter().enumerate() {
            let n = u32::try_from(i).unwrap_or(u32::MAX).saturating_add(1);
            numbers.insert(cell.id.clone(), n);
        }
    }
    numbers
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn display_columns_renumber_after_merge() {
        // Row 0 holds a 1×2 merged cell at col 0 and a plain cell at col 2:
        // the plain cell's display column is 2 even though its band is 2.
        let merged = Cell {
            id: "0-0-merged-9".to_string(),
            row: 0,
            col: 0,
            row_span: 1,
            col_span: 2,
        };
        let plain = Cell::plain(0, 2);
        let other_row = Cell::plain(1, 1);

        let numbers = display_columns([&merged, &plain, &other_row]);
        assert_eq!(numbers["0-0-merged-9"], 1);
        assert_eq!(numbers["0-2"], 2);
        assert_eq!(numbers["1-1"], 1);
    }
}
