//! Table alignment post-processing.
//!
//! A pure string transform over the cached base HTML: rewrite the first
//! `<table>` tag's `style` attribute with the margin declaration for the
//! requested alignment. Never re-runs the serializer.

use serde::{Deserialize, Serialize};

/// Horizontal alignment of the generated table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TableAlignment {
    #[default]
    Left,
    Center,
    Right,
}

impl TableAlignment {
    /// Parse from the lowercase names used at the JS boundary.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "left" => Some(TableAlignment::Left),
            "center" => Some(TableAlignment::Center),
            "right" => Some(TableAlignment::Right),
            _ => None,
        }
    }

    fn margin_declaration(self) -> Option<&'static str> {
        match self {
            TableAlignment::Left => None,
            TableAlignment::Center => Some("margin: 0 auto"),
            TableAlignment::Right => Some("margin-left: auto"),
        }
    }
}

/// Apply `alignment` to the first `<table>` tag of `html`.
///
/// Existing `margin`/`margin-*` declarations are stripped before the new
/// one is appended, so the transform is idempotent. Inputs without a
/// `<table>` tag or a `style` attribute pass through unchanged.
#[must_use]
pub fn apply_alignment(html: &str, alignment: TableAlignment) -> String {
    rewrite_table_style(html, alignment).unwrap_or_else(|| html.to_string())
}

fn rewrite_table_style(html: &str, alignment: TableAlignment) -> Option<String> {
    let tag_start = find_ascii_ci(html, "<table")?;
    let tag_rest = html.get(tag_start..)?;
    let tag_len = tag_rest.find('>')? + 1;
    let tag = tag_rest.get(..tag_len)?;

    let style_attr = find_ascii_ci(tag, "style=\"")?;
    let value_start = tag_start + style_attr + "style=\"".len();
    let value_rest = html.get(value_start..)?;
    let value_len = value_rest.find('"')?;
    let style = value_rest.get(..value_len)?;

    let kept: Vec<&str> = style
        .split(';')
        .map(str::trim)
        .filter(|d| !d.is_empty() && !d.starts_with("margin"))
        .collect();
    let mut rebuilt = kept.join("; ");
    if let Some(margin) = alignment.margin_declaration() {
        if !rebuilt.is_empty() {
            rebuilt.push_str("; ");
        }
        rebuilt.push_str(margin);
    }

    let head = html.get(..value_start)?;
    let tail = html.get(value_start + value_len..)?;
    Some(format!("{head}{rebuilt}{tail}"))
}

/// ASCII case-insensitive substring search.
fn find_ascii_ci(haystack: &str, needle: &str) -> Option<usize> {
    let h = haystack.as_bytes();
    let n = needle.as_bytes();
    if n.is_empty() || h.len() < n.len() {
        return None;
    }
    (0..=h.len() - n.len())
        .find(|&i| h.get(i..i + n.len()).is_some_and(|w| w.eq_ignore_ascii_case(n)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    const BASE: &str = r#"<table border="0" style="width:100%; margin:0; padding:0; table-layout:fixed;">
  <tr></tr>
</table>"#;

    #[test]
    fn center_replaces_margin() {
        let out = apply_alignment(BASE, TableAlignment::Center);
        assert!(out.contains(r#"style="width:100%; padding:0; table-layout:fixed; margin: 0 auto""#));
        assert!(!out.contains("margin:0;"));
    }

    #[test]
    fn right_uses_margin_left() {
        let out = apply_alignment(BASE, TableAlignment::Right);
        assert!(out.contains("margin-left: auto\""));
    }

    #[test]
    fn left_strips_margins_entirely() {
        let out = apply_alignment(BASE, TableAlignment::Left);
        assert!(!out.contains("margin"));
    }

    #[test]
    fn idempotent_under_repeated_application() {
        let once = apply_alignment(BASE, TableAlignment::Center);
        let twice = apply_alignment(&once, TableAlignment::Center);
        assert_eq!(once, twice);
    }

    #[test]
    fn switching_alignment_does_not_stack() {
        let centered = apply_alignment(BASE, TableAlignment::Center);
        let righted = apply_alignment(&centered, TableAlignment::Right);
        assert!(!righted.contains("0 auto"));
        assert!(righted.contains("margin-left: auto"));
    }

    #[test]
    fn only_first_table_tag_is_touched() {
        let html = format!("{BASE}\n{BASE}");
        let out = apply_alignment(&html, TableAlignment::Center);
        assert_eq!(out.matches("margin: 0 auto").count(), 1);
    }

    #[test]
    fn passthrough_without_table() {
        assert_eq!(apply_alignment("<div/>", TableAlignment::Center), "<div/>");
    }
}
