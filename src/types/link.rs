//! Per-cell hyperlink records.

use serde::{Deserialize, Serialize};

/// A hyperlink attached to one cell, keyed by the cell's id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellLink {
    /// Id of the cell this link belongs to.
    pub cell_id: String,
    /// Destination URL. Must start with `http://` or `https://`.
    pub link_url: String,
}

/// Validate a link URL: an `http://` or `https://` scheme prefix,
/// case-insensitive.
#[must_use]
pub fn is_valid_link_url(url: &str) -> bool {
    let has_prefix = |prefix: &str| {
        url.get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    };
    has_prefix("http://") || has_prefix("https://")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https() {
        assert!(is_valid_link_url("http://example.com"));
        assert!(is_valid_link_url("https://example.com/path?q=1"));
        assert!(is_valid_link_url("HTTPS://EXAMPLE.COM"));
    }

    #[test]
    fn rejects_other_schemes() {
        assert!(!is_valid_link_url("ftp://example.com"));
        assert!(!is_valid_link_url("javascript:alert(1)"));
        assert!(!is_valid_link_url("example.com"));
        assert!(!is_valid_link_url(""));
    }

    #[test]
    fn bare_scheme_is_accepted() {
        // Prefix-only validation: nothing after the scheme is still valid.
        assert!(is_valid_link_url("https://"));
    }
}
