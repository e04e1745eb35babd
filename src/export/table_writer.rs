//! Generates the two HTML table variants from a grid snapshot.
//!
//! Both strings are built in lock-step over the same row/column walk: the
//! path variant references externally hosted crops and sizes columns as
//! percentages (responsive), the data-URI variant embeds the crops and
//! sizes everything in absolute pixels. Width and height values carry the
//! full precision of the boundary subtraction; nothing is rounded here.

use std::collections::HashMap;

use crate::types::Cell;

/// Everything the writer needs, frozen at generation time.
pub struct TableSnapshot<'a> {
    /// Column boundary positions.
    pub x_positions: &'a [f64],
    /// Row boundary positions.
    pub y_positions: &'a [f64],
    /// Active cells.
    pub active: &'a [Cell],
    /// Deleted cells; their footprints become `&nbsp;` placeholders.
    pub deleted: &'a [Cell],
    /// Display column numbers keyed by cell id.
    pub display_cols: &'a HashMap<String, u32>,
    /// Link URLs keyed by cell id.
    pub links: &'a HashMap<String, String>,
    /// PNG data URIs keyed by cell id.
    pub data_uris: &'a HashMap<String, String>,
    /// Source image width in pixels.
    pub image_width: f64,
    /// Sanitized image name without extension, used in external paths.
    pub image_stem: &'a str,
    /// Base URL the crops will be hosted under.
    pub base_path: &'a str,
}

/// The two serializer outputs.
pub struct TablePair {
    /// External-path variant.
    pub path_html: String,
    /// Self-contained data-URI variant.
    pub data_uri_html: String,
}

/// Serialize the snapshot into both table variants.
pub(crate) fn write_tables(snap: &TableSnapshot<'_>) -> TablePair {
    let rows = u32::try_from(snap.y_positions.len().saturating_sub(1)).unwrap_or(0);
    let cols = u32::try_from(snap.x_positions.len().saturating_sub(1)).unwrap_or(0);

    let mut path_html = String::with_capacity(4096);
    let mut data_html = String::with_capacity(4096);

    path_html.push_str(&format!(
        "<table border=\"0\" cellpadding=\"0\" cellspacing=\"0\" width=\"100%\" \
         style=\"width:100%; max-width:{}px; min-width:320px; border-collapse:collapse; \
         border-spacing:0; margin:0; padding:0; table-layout:fixed;\">\n",
        snap.image_width
    ));
    data_html.push_str(&format!(
        "<table border=\"0\" cellpadding=\"0\" cellspacing=\"0\" \
         style=\"width:{}px; border-collapse:collapse; border-spacing:0; margin:0; \
         padding:0; table-layout:fixed;\">\n",
        snap.image_width
    ));

    path_html.push_str("<colgroup>\n");
    data_html.push_str("<colgroup>\n");
    for c in 0..cols {
        let w = band_extent(snap.x_positions, c);
        let pct = w / snap.image_width * 100.0;
        path_html.push_str(&format!("  <col style=\"width:{pct}%;\">\n"));
        data_html.push_str(&format!("  <col style=\"width:{w}px;\">\n"));
    }
    path_html.push_str("</colgroup>\n");
    data_html.push_str("</colgroup>\n");

    let mut occupied = vec![false; (rows as usize) * (cols as usize)];
    let unit = |r: u32, c: u32| (r as usize) * (cols as usize) + (c as usize);

    for r in 0..rows {
        path_html.push_str("  <tr>\n");
        data_html.push_str("  <tr>\n");
        for c in 0..cols {
            if occupied.get(unit(r, c)).copied().unwrap_or(false) {
                continue;
            }

            if let Some(cell) = snap.active.iter().find(|cell| cell.row == r && cell.col == c) {
                write_cell(snap, cell, &mut path_html, &mut data_html);
                for rb in cell.row..(cell.row + cell.row_span).min(rows) {
                    for cb in cell.col..(cell.col + cell.col_span).min(cols) {
                        if let Some(slot) = occupied.get_mut(unit(rb, cb)) {
                            *slot = true;
                        }
                    }
                }
            } else if snap.deleted.iter().any(|d| d.covers(r, c)) {
                let w = band_extent(snap.x_positions, c);
                let h = band_extent(snap.y_positions, r);
                let placeholder = format!(
                    "    <td style=\"padding:0; margin:0; line-height:0; font-size:0; \
                     vertical-align:top; width:{w}px; height:{h}px; border:none; \
                     border-spacing:0;\">&nbsp;</td>\n"
                );
                path_html.push_str(&placeholder);
                data_html.push_str(&placeholder);
                if let Some(slot) = occupied.get_mut(unit(r, c)) {
                    *slot = true;
                }
            }
        }
        path_html.push_str("  </tr>\n");
        data_html.push_str("  </tr>\n");
    }

    path_html.push_str("</table>");
    data_html.push_str("</table>");

    TablePair {
        path_html,
        data_uri_html: data_html,
    }
}

fn write_cell(snap: &TableSnapshot<'_>, cell: &Cell, path_html: &mut String, data_html: &mut String) {
    let Some((w, h)) = cell_extent(snap, cell) else {
        return;
    };
    let display_col = snap
        .display_cols
        .get(&cell.id)
        .copied()
        .unwrap_or(cell.col + 1);
    let row_label = cell.row + 1;

    let filename = format!("cell_{row_label}-{display_col}_{w}x{h}.png");
    let image_path = format!("{}/{}/{filename}", snap.base_path, snap.image_stem);
    let link = snap.links.get(&cell.id);

    let colspan = if cell.col_span > 1 {
        format!(" colspan=\"{}\"", cell.col_span)
    } else {
        String::new()
    };
    let rowspan = if cell.row_span > 1 {
        format!(" rowspan=\"{}\"", cell.row_span)
    } else {
        String::new()
    };
    let td_start = format!(
        "    <td{colspan}{rowspan} style=\"padding:0; margin:0; line-height:0; font-size:0; \
         vertical-align:top; width:{w}px; height:{h}px; border:none; border-spacing:0;\">\n"
    );

    let img_path = format!(
        "<img src=\"{image_path}\" alt=\"Cell {row_label}-{display_col}\" \
         style=\"display:block; width:100%; max-width:{w}px; height:auto; margin:0; \
         padding:0; border:none; vertical-align:top;\" loading=\"lazy\" />"
    );
    let path_content = match link {
        Some(url) => wrap_in_anchor(url, &img_path),
        None => img_path,
    };
    path_html.push_str(&td_start);
    path_html.push_str(&format!("      {path_content}\n"));
    path_html.push_str("    </td>\n");

    data_html.push_str(&td_start);
    match snap.data_uris.get(&cell.id) {
        Some(uri) => {
            let img_data = format!(
                "<img src=\"{uri}\" alt=\"Cell {row_label}-{display_col}\" width=\"{w}\" \
                 height=\"{h}\" style=\"display:block; width:{w}px; height:{h}px; margin:0; \
                 padding:0; border:none; vertical-align:top;\" loading=\"lazy\" />"
            );
            let data_content = match link {
                Some(url) => wrap_in_anchor(url, &img_data),
                None => img_data,
            };
            data_html.push_str(&format!("      {data_content}\n"));
        }
        // Crop pending or skipped: empty body, the td still holds its place
        None => data_html.push_str("      \n"),
    }
    data_html.push_str("    </td>\n");
}

fn wrap_in_anchor(url: &str, img: &str) -> String {
    format!(
        "<a href=\"{url}\" target=\"_blank\" style=\"display:block; padding:0; margin:0; \
         line-height:0; font-size:0;\">{img}</a>"
    )
}

fn band_extent(positions: &[f64], index: u32) -> f64 {
    let lo = positions.get(index as usize).copied().unwrap_or(0.0);
    let hi = positions.get(index as usize + 1).copied().unwrap_or(lo);
    hi - lo
}

fn cell_extent(snap: &TableSnapshot<'_>, cell: &Cell) -> Option<(f64, f64)> {
    let x1 = snap.x_positions.get(cell.col as usize).copied()?;
    let x2 = snap
        .x_positions
        .get((cell.col + cell.col_span) as usize)
        .copied()?;
    let y1 = snap.y_positions.get(cell.row as usize).copied()?;
    let y2 = snap
        .y_positions
        .get((cell.row + cell.row_span) as usize)
        .copied()?;
    Some((x2 - x1, y2 - y1))
}
