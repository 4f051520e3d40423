//! Gallery discovery.
//!
//! Lists the image files that sit directly in the gallery folder. Subfolders
//! are never entered and only the configured extensions are kept. The result
//! is sorted by name so the auto-numbering in [`naming`](crate::naming) comes
//! out the same on every run over the same folder.

use crate::config::OptimizerConfig;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Gallery directory not found: {0}")]
    GalleryNotFound(PathBuf),
}

/// An image file found in the gallery folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryEntry {
    /// File name including extension, e.g. `a.jpg`.
    pub file_name: String,
    /// Lowercased extension without the dot.
    pub extension: String,
    /// Size on disk at scan time.
    pub bytes: u64,
}

/// Scan `gallery` for image files allowed by `config`, sorted by name.
pub fn scan(gallery: &Path, config: &OptimizerConfig) -> Result<Vec<GalleryEntry>, ScanError> {
    if !gallery.is_dir() {
        return Err(ScanError::GalleryNotFound(gallery.to_path_buf()));
    }

    let mut entries = Vec::new();
    for entry in fs::read_dir(gallery)? {
        let entry = entry?;
        // Follows symlinks; dangling links are skipped like any non-file.
        let Ok(metadata) = fs::metadata(entry.path()) else {
            continue;
        };
        if !metadata.is_file() {
            continue;
        }
        // Names that aren't valid UTF-8 can't appear in the site's text files.
        let Ok(file_name) = entry.file_name().into_string() else {
            continue;
        };
        if !config.is_allowed(&file_name) {
            continue;
        }
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        entries.push(GalleryEntry {
            file_name,
            extension,
            bytes: metadata.len(),
        });
    }

    entries.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(entries)
}

/// Just the names of the scanned entries, in scan order.
pub fn file_names(entries: &[GalleryEntry]) -> Vec<String> {
    entries.iter().map(|e| e.file_name.clone()).collect()
}

/// Whether both paths exist and resolve to the same file.
///
/// Catches names that differ only in case on case-insensitive filesystems.
pub fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
