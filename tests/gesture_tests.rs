//! Pointer gesture tests: drag selection, click toggling, modifier
//! semantics, line drags, and cursor hints.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{click, drag, editor_with_image, modifier_click};
use test_case::test_case;

// Default grid on a 300×300 image: lines at 100 and 200 on both axes,
// cell centers 50px away from every line.

#[test]
fn drag_selects_strictly_overlapped_cells() {
    let mut editor = editor_with_image(300, 300);
    drag(&mut editor, 30.0, 30.0, 170.0, 170.0);

    let selected = editor.selected();
    assert_eq!(selected.len(), 4);
    for id in ["0-0", "0-1", "1-0", "1-1"] {
        assert!(selected.contains(id), "missing {id}");
    }
}

#[test]
fn drag_touching_an_edge_does_not_spill_over() {
    let mut editor = editor_with_image(300, 300);
    // Right edge of the drag sits exactly on the x=100 boundary; the
    // second column only touches and must not be selected.
    editor.pointer_down(30.0, 30.0, false);
    editor.pointer_move(100.0, 70.0, false);
    editor.pointer_up(100.0, 70.0, false);

    assert_eq!(editor.selected().len(), 1);
    assert!(editor.selected().contains("0-0"));
}

#[test]
fn click_selects_and_second_click_deselects() {
    let mut editor = editor_with_image(300, 300);

    click(&mut editor, 150.0, 150.0);
    assert!(editor.selected().contains("1-1"));
    assert_eq!(editor.selected().len(), 1);

    // Clicking the sole selected cell toggles it off
    click(&mut editor, 150.0, 150.0);
    assert!(editor.selected().is_empty());
}

#[test]
fn toggle_off_requires_sole_selection() {
    let mut editor = editor_with_image(300, 300);
    click(&mut editor, 50.0, 50.0);
    modifier_click(&mut editor, 150.0, 50.0);
    assert_eq!(editor.selected().len(), 2);

    // 0-0 is selected but not the sole selection: a plain click on it
    // collapses the selection to it instead of clearing
    click(&mut editor, 50.0, 50.0);
    assert_eq!(editor.selected().len(), 1);
    assert!(editor.selected().contains("0-0"));
}

#[test]
fn plain_click_outside_grid_clears_selection() {
    let mut editor = editor_with_image(300, 300);
    click(&mut editor, 50.0, 50.0);
    assert!(!editor.selected().is_empty());

    click(&mut editor, 350.0, 150.0);
    assert!(editor.selected().is_empty());
}

#[test]
fn modifier_click_outside_grid_keeps_selection() {
    let mut editor = editor_with_image(300, 300);
    click(&mut editor, 50.0, 50.0);
    modifier_click(&mut editor, 350.0, 150.0);
    assert!(editor.selected().contains("0-0"));
}

#[test]
fn plain_click_replaces_selection() {
    let mut editor = editor_with_image(300, 300);
    click(&mut editor, 50.0, 50.0);
    click(&mut editor, 250.0, 250.0);

    assert_eq!(editor.selected().len(), 1);
    assert!(editor.selected().contains("2-2"));
}

#[test]
fn modifier_click_toggles_membership() {
    let mut editor = editor_with_image(300, 300);
    click(&mut editor, 50.0, 50.0);
    modifier_click(&mut editor, 150.0, 50.0);
    assert_eq!(editor.selected().len(), 2);

    modifier_click(&mut editor, 50.0, 50.0);
    assert_eq!(editor.selected().len(), 1);
    assert!(editor.selected().contains("0-1"));
}

#[test]
fn modifier_drag_xors_into_selection() {
    let mut editor = editor_with_image(300, 300);
    // Select the top row, then modifier-drag over the left column:
    // 0-0 toggles out, 1-0 and 2-0 toggle in.
    drag(&mut editor, 30.0, 30.0, 270.0, 70.0);
    assert_eq!(editor.selected().len(), 3);

    editor.pointer_down(30.0, 30.0, true);
    editor.pointer_move(70.0, 270.0, true);
    editor.pointer_up(70.0, 270.0, true);

    let selected = editor.selected();
    assert_eq!(selected.len(), 4);
    assert!(!selected.contains("0-0"));
    for id in ["0-1", "0-2", "1-0", "2-0"] {
        assert!(selected.contains(id), "missing {id}");
    }
}

#[test]
fn sub_jitter_drag_counts_as_click() {
    let mut editor = editor_with_image(300, 300);
    editor.pointer_down(150.0, 150.0, false);
    editor.pointer_move(153.0, 152.0, false);
    editor.pointer_up(153.0, 152.0, false);

    assert!(editor.selected().contains("1-1"));
}

#[test]
fn line_drag_moves_line_and_clears_output() {
    let mut editor = editor_with_image(300, 300);
    editor.generate_table().unwrap();
    assert!(!editor.html_code().is_empty());

    // Grab the y=100 line and drag it to 130
    editor.pointer_down(150.0, 104.0, false);
    editor.pointer_move(150.0, 130.4, false);
    editor.pointer_up(150.0, 130.4, false);

    assert_eq!(editor.doc.h_lines[0], 130.0);
    assert!(editor.html_code().is_empty());
    assert!(editor.has_generated_once());
}

#[test]
fn line_drag_does_not_change_selection() {
    let mut editor = editor_with_image(300, 300);
    click(&mut editor, 50.0, 50.0);
    editor.pointer_down(150.0, 96.0, false);
    editor.pointer_move(150.0, 140.0, false);
    editor.pointer_up(150.0, 140.0, false);

    assert!(editor.selected().contains("0-0"));
}

#[test]
fn line_drag_clamps_at_edge_margin() {
    let mut editor = editor_with_image(300, 300);
    editor.pointer_down(104.0, 150.0, false);
    editor.pointer_move(-50.0, 150.0, false);
    editor.pointer_up(-50.0, 150.0, false);

    assert_eq!(editor.doc.v_lines[0], 10.0);
}

#[test]
fn deleted_footprint_is_not_selectable() {
    let mut editor = editor_with_image(300, 300);
    click(&mut editor, 150.0, 150.0);
    editor.delete_selection().unwrap();
    // The line edit re-synthesizes an inactive "1-1" cell for deletion
    // keying; it must stay out of every selection path.
    editor.add_line(imgcut::LineAxis::Horizontal);
    assert!(editor.doc.cells.iter().any(|c| c.id == "1-1"));
    assert!(!editor.doc.is_active("1-1"));

    // Clicking the deleted footprint clears instead of selecting a ghost
    click(&mut editor, 50.0, 50.0);
    click(&mut editor, 150.0, 100.0);
    assert!(editor.selected().is_empty());

    // Dragging wholly inside the footprint selects nothing
    drag(&mut editor, 120.0, 95.0, 180.0, 135.0);
    assert!(!editor.selected().contains("1-1"));
    assert!(editor.selected().is_empty());
}

#[test_case(150.0, 100.0, "ns-resize" ; "over a horizontal line")]
#[test_case(100.0, 150.0, "ew-resize" ; "over a vertical line")]
#[test_case(100.0, 100.0, "crosshair" ; "over a line crossing")]
#[test_case(150.0, 150.0, "default" ; "over open cell area")]
fn cursor_hints(x: f64, y: f64, expected: &str) {
    let editor = editor_with_image(300, 300);
    assert_eq!(editor.cursor_hint(x, y), expected);
}

#[test]
fn cursor_stays_crosshair_while_dragging() {
    let mut editor = editor_with_image(300, 300);
    editor.pointer_down(150.0, 150.0, false);
    editor.pointer_move(160.0, 160.0, false);
    assert_eq!(editor.cursor_hint(160.0, 160.0), "crosshair");
}
