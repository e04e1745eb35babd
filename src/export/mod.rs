//! HTML and archive export pipeline.
//!
//! The serializer consumes a frozen snapshot of the grid and produces two
//! table strings in lock-step (external-path and data-URI variants); the
//! alignment transform is applied afterwards as a pure string rewrite.

pub(crate) mod archive;
mod align;
mod table_writer;

pub use align::{apply_alignment, TableAlignment};
pub use archive::archive_name;
pub use table_writer::{TablePair, TableSnapshot};

pub(crate) use archive::build_archive;
pub(crate) use table_writer::write_tables;

use serde::{Deserialize, Serialize};

/// Default base URL for externally hosted crops.
pub const DEFAULT_BASE_PATH: &str = "https://cdn.example.com/email";

/// Export settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportConfig {
    /// Base URL the external-path variant points its `<img>` tags at.
    pub base_path: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            base_path: DEFAULT_BASE_PATH.to_string(),
        }
    }
}
