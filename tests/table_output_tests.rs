//! End-to-end table generation tests: the full merge/delete scenario,
//! pixel and percentage sizing, links, alignment, and output lifecycle.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{click, drag, editor_with_image, td_count, tr_count};
use imgcut::export::TableAlignment;
use imgcut::{GridEditor, ImgcutError, LineAxis};

/// 300×300 image, 3×3 grid, top-left 2×2 merged, bottom-right deleted.
fn merged_and_deleted() -> GridEditor {
    let mut editor = editor_with_image(300, 300);
    drag(&mut editor, 30.0, 30.0, 170.0, 170.0);
    editor.merge_selection().unwrap();
    click(&mut editor, 250.0, 250.0);
    editor.delete_selection().unwrap();
    editor
}

#[test]
fn merge_and_delete_scenario_produces_six_cells() {
    let mut editor = merged_and_deleted();
    editor.generate_table().unwrap();

    let html = editor.html_code();
    assert_eq!(tr_count(html), 3);
    assert_eq!(td_count(html), 6);
    assert!(html.contains("colspan=\"2\""));
    assert!(html.contains("rowspan=\"2\""));
    // The deleted bottom-right unit becomes a sized placeholder
    assert_eq!(html.matches("&nbsp;").count(), 1);
    assert!(html.contains("width:100px; height:100px; border:none; border-spacing:0;\">&nbsp;</td>"));
}

#[test]
fn scenario_labels_and_paths_use_display_columns() {
    let mut editor = merged_and_deleted();
    editor.generate_table().unwrap();

    let html = editor.html_code();
    // Merged cell is row 1 display column 1 at its merged size
    assert!(html.contains("https://cdn.example.com/email/banner/cell_1-1_200x200.png"));
    assert!(html.contains("alt=\"Cell 1-1\""));
    // The only cell in row 2 renumbers to display column 1
    assert!(html.contains("cell_2-1_100x100.png"));
    assert!(html.contains("cell_3-1_100x100.png"));
    assert!(html.contains("cell_3-2_100x100.png"));
    assert!(!html.contains("cell_3-3"));
}

#[test]
fn path_variant_is_responsive_and_data_variant_is_fixed() {
    let mut editor = editor_with_image(300, 300);
    editor.generate_table().unwrap();

    let path = editor.html_code();
    assert!(path.starts_with("<table border=\"0\" cellpadding=\"0\" cellspacing=\"0\" width=\"100%\""));
    assert!(path.contains("max-width:300px; min-width:320px;"));
    assert!(path.contains("loading=\"lazy\""));

    let data = editor.preview_html();
    assert!(!data.contains("width=\"100%\""));
    assert!(data.contains("style=\"width:300px;"));
    assert!(data.contains("data:image/png;base64,"));
    assert!(data.contains("width=\"100\" height=\"100\""));
}

#[test]
fn column_widths_carry_exact_values() {
    let mut editor = editor_with_image(300, 300);
    editor.remove_line(LineAxis::Vertical);
    editor.doc.move_line(LineAxis::Vertical, 0, 120.0);
    editor.generate_table().unwrap();

    let path = editor.html_code();
    assert!(path.contains("<col style=\"width:40%;\">"));
    assert!(path.contains("<col style=\"width:60%;\">"));

    let data = editor.preview_html();
    assert!(data.contains("<col style=\"width:120px;\">"));
    assert!(data.contains("<col style=\"width:180px;\">"));
    assert!(data.contains("width:120px; height:100px;"));
}

#[test]
fn linked_cell_is_wrapped_in_anchor() {
    let mut editor = editor_with_image(300, 300);
    editor.set_link("0-0", "https://example.com/promo").unwrap();
    editor.generate_table().unwrap();

    for html in [editor.html_code(), editor.preview_html()] {
        assert!(html.contains(
            "<a href=\"https://example.com/promo\" target=\"_blank\" style=\"display:block;"
        ));
        assert_eq!(html.matches("</a>").count(), 1);
    }
}

#[test]
fn invalid_link_is_rejected() {
    let mut editor = editor_with_image(300, 300);
    let err = editor.set_link("0-0", "javascript:alert(1)").unwrap_err();
    assert!(matches!(err, ImgcutError::InvalidUrl(_)));
}

#[test]
fn alignment_applies_without_regenerating() {
    let mut editor = editor_with_image(300, 300);
    editor.generate_table().unwrap();
    let original = editor.html_code().to_string();

    editor.set_alignment(TableAlignment::Center);
    assert!(editor.html_code().contains("margin: 0 auto"));
    assert!(editor.preview_html().contains("margin: 0 auto"));

    editor.set_alignment(TableAlignment::Right);
    assert!(editor.html_code().contains("margin-left: auto"));
    assert!(!editor.html_code().contains("margin: 0 auto"));

    editor.set_alignment(TableAlignment::Left);
    let table_tag = editor.html_code().lines().next().unwrap();
    assert!(!table_tag.contains("margin"));
    // Everything after the table tag is untouched
    assert_eq!(
        editor.html_code().lines().skip(1).collect::<Vec<_>>(),
        original.lines().skip(1).collect::<Vec<_>>()
    );
}

#[test]
fn structural_edit_invalidates_output_but_keeps_flag() {
    let mut editor = editor_with_image(300, 300);
    editor.generate_table().unwrap();
    assert!(editor.has_generated_once());
    assert!(!editor.html_code().is_empty());

    editor.add_line(LineAxis::Horizontal);
    assert!(editor.html_code().is_empty());
    assert!(editor.preview_html().is_empty());
    assert!(editor.has_generated_once());

    editor.generate_table().unwrap();
    assert_eq!(tr_count(editor.html_code()), 4);
}

#[test]
fn generate_without_image_fails() {
    let mut editor = GridEditor::new();
    assert!(matches!(
        editor.generate_table().unwrap_err(),
        ImgcutError::NoImage
    ));
}

#[test]
fn custom_base_path_flows_into_image_urls() {
    let mut editor = editor_with_image(300, 300);
    editor.set_base_path("https://assets.example.org/img");
    editor.generate_table().unwrap();
    assert!(editor
        .html_code()
        .contains("src=\"https://assets.example.org/img/banner/cell_1-1_100x100.png\""));
}

#[test]
fn state_json_uses_wire_field_names() {
    let editor = editor_with_image(300, 300);
    let json = editor.state_json().unwrap();
    assert!(json.contains("\"horizontalLines\""));
    assert!(json.contains("\"verticalLines\""));
    assert!(json.contains("\"deletedCells\""));
    assert!(json.contains("\"cellLinks\""));
}
