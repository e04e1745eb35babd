//! Packages per-cell crops into a downloadable ZIP archive.

use std::collections::HashMap;
use std::io::{Cursor, Write};

use zip::write::FileOptions;
use zip::ZipWriter;

use crate::crop::{image_stem, CellCrop};
use crate::error::Result;

/// Build a ZIP archive from crops keyed by cell id.
///
/// Entries are written in filename order so the archive bytes are
/// deterministic for a given grid state.
pub(crate) fn build_archive(crops: &HashMap<String, CellCrop>) -> Result<Vec<u8>> {
    let mut entries: Vec<&CellCrop> = crops.values().collect();
    entries.sort_by(|a, b| a.filename.cmp(&b.filename));

    let buf: Vec<u8> = Vec::new();
    let mut writer = ZipWriter::new(Cursor::new(buf));
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for crop in entries {
        writer.start_file(&crop.filename, options)?;
        writer.write_all(&crop.png)?;
    }

    let cursor = writer.finish()?;
    Ok(cursor.into_inner())
}

/// Suggested archive file name: the image name with its extension
/// replaced by `.zip`.
#[must_use]
pub fn archive_name(image_name: &str) -> String {
    format!("{}.zip", image_stem(image_name))
}
