//! Editor-level structural editing tests: merge/delete through gestures,
//! grid reset, and link lifecycle.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{click, drag, editor_with_image, modifier_click};
use imgcut::{ImgcutError, LineAxis};

#[test]
fn merge_through_gestures_selects_the_merge() {
    let mut editor = editor_with_image(300, 300);
    drag(&mut editor, 30.0, 30.0, 170.0, 170.0);
    editor.merge_selection().unwrap();

    assert_eq!(editor.selected().len(), 1);
    let id = editor.selected().iter().next().unwrap().clone();
    assert!(id.starts_with("0-0-merged-"));
    let merged = editor.doc.cells.iter().find(|c| c.id == id).unwrap();
    assert_eq!((merged.row_span, merged.col_span), (2, 2));
}

#[test]
fn l_shaped_selection_does_not_merge() {
    let mut editor = editor_with_image(300, 300);
    click(&mut editor, 50.0, 50.0);
    modifier_click(&mut editor, 150.0, 50.0);
    modifier_click(&mut editor, 50.0, 150.0);

    let err = editor.merge_selection().unwrap_err();
    assert!(matches!(err, ImgcutError::MergeNotRectangular));
    // Rejected merge leaves cells and selection untouched
    assert_eq!(editor.selected().len(), 3);
    assert_eq!(editor.doc.cells.len(), 9);
}

#[test]
fn merge_with_single_cell_is_rejected() {
    let mut editor = editor_with_image(300, 300);
    click(&mut editor, 50.0, 50.0);
    assert!(matches!(
        editor.merge_selection().unwrap_err(),
        ImgcutError::EmptySelection
    ));
}

#[test]
fn delete_clears_selection_and_leaves_gap() {
    let mut editor = editor_with_image(300, 300);
    click(&mut editor, 150.0, 150.0);
    editor.delete_selection().unwrap();

    assert!(editor.selected().is_empty());
    assert!(!editor.doc.is_active("1-1"));
    assert_eq!(editor.doc.active_cells().len(), 8);

    // Clicking the gap selects nothing new; the deleted record keeps
    // the synthesized cell inactive even after a line edit
    editor.add_line(LineAxis::Vertical);
    assert!(!editor.doc.is_active("1-1"));
}

#[test]
fn reset_restores_three_by_three() {
    let mut editor = editor_with_image(300, 300);
    drag(&mut editor, 30.0, 30.0, 170.0, 170.0);
    editor.merge_selection().unwrap();
    editor.set_link("2-2", "https://example.com").unwrap();
    editor.add_line(LineAxis::Horizontal);
    editor.generate_table().unwrap();

    editor.reset_grid();
    assert_eq!(editor.doc.rows(), 3);
    assert_eq!(editor.doc.cols(), 3);
    assert_eq!(editor.doc.cells.len(), 9);
    assert!(editor.doc.deleted_cells.is_empty());
    assert!(editor.linked_cell_ids().is_empty());
    assert!(editor.selected().is_empty());
    assert!(editor.html_code().is_empty());
    assert!(!editor.has_generated_once());
}

#[test]
fn links_survive_unrelated_edits_and_prune_on_merge() {
    let mut editor = editor_with_image(300, 300);
    editor.set_link("2-2", "https://example.com/a").unwrap();
    editor.set_link("0-0", "https://example.com/b").unwrap();

    // Merging 0-0 away prunes its link; 2-2 is untouched
    drag(&mut editor, 30.0, 30.0, 170.0, 170.0);
    editor.merge_selection().unwrap();

    let linked = editor.linked_cell_ids();
    assert_eq!(linked, vec!["2-2".to_string()]);
}

#[test]
fn remove_link_clears_marker() {
    let mut editor = editor_with_image(300, 300);
    editor.set_link("0-1", "https://example.com").unwrap();
    editor.remove_link("0-1");
    assert!(editor.linked_cell_ids().is_empty());
}

/// Every unit band is covered exactly once by an active or deleted cell.
fn assert_full_coverage(editor: &imgcut::GridEditor) {
    let rows = editor.doc.rows();
    let cols = editor.doc.cols();
    for r in 0..rows {
        for c in 0..cols {
            let active = editor
                .doc
                .active_cells()
                .iter()
                .filter(|cell| cell.covers(r, c))
                .count();
            let deleted = editor
                .doc
                .deleted_cells
                .iter()
                .filter(|cell| cell.covers(r, c))
                .count();
            assert!(
                active == 1 || (active == 0 && deleted >= 1),
                "unit ({r}, {c}) covered by {active} active / {deleted} deleted cells"
            );
        }
    }
}

#[test]
fn coverage_invariant_holds_across_edit_sequences() {
    let mut editor = editor_with_image(300, 300);
    assert_full_coverage(&editor);

    drag(&mut editor, 30.0, 30.0, 170.0, 170.0);
    editor.merge_selection().unwrap();
    assert_full_coverage(&editor);

    click(&mut editor, 250.0, 250.0);
    editor.delete_selection().unwrap();
    assert_full_coverage(&editor);

    editor.add_line(LineAxis::Vertical);
    assert_full_coverage(&editor);

    editor.remove_line(LineAxis::Horizontal);
    assert_full_coverage(&editor);

    editor.reset_grid();
    assert_full_coverage(&editor);
}

#[test]
fn loading_a_new_image_resets_everything() {
    let mut editor = editor_with_image(300, 300);
    drag(&mut editor, 30.0, 30.0, 170.0, 170.0);
    editor.merge_selection().unwrap();
    editor.generate_table().unwrap();

    editor.load_raster(common::two_tone_raster(600, 150), "wide.jpg");
    assert_eq!(editor.image_size(), Some((600, 150)));
    assert_eq!(editor.doc.width, 600.0);
    assert_eq!(editor.doc.cells.len(), 9);
    assert!(editor.selected().is_empty());
    assert!(editor.html_code().is_empty());
    assert!(!editor.has_generated_once());
    assert_eq!(editor.archive_name().unwrap(), "wide.zip");
}
