//! Removal of renamed originals.
//!
//! Runs after the text rewrite. Every entry whose name changed gets its old
//! file deleted, whatever happened to it during optimization. Entries whose
//! old and new paths resolve to the same file are kept: deleting one would
//! delete the other.

use crate::naming::NameMapping;
use crate::scan;
use std::fs;
use std::io;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalOutcome {
    Removed,
    /// Nothing to remove.
    AlreadyGone,
    /// Old and new name are the same file on this filesystem.
    SameFile,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    pub file_name: String,
    pub outcome: RemovalOutcome,
}

/// Delete the original of every renamed entry in `gallery`.
///
/// Errors are recorded per file and never stop the loop.
pub fn cleanup(mapping: &NameMapping, gallery: &Path) -> Vec<Removal> {
    mapping
        .renames()
        .map(|entry| {
            let old = gallery.join(&entry.old);
            let outcome = if scan::same_file(&old, &gallery.join(&entry.new)) {
                RemovalOutcome::SameFile
            } else {
                match fs::remove_file(&old) {
                    Ok(()) => RemovalOutcome::Removed,
                    Err(e) if e.kind() == io::ErrorKind::NotFound => RemovalOutcome::AlreadyGone,
                    Err(e) => {
                        tracing::warn!("could not remove {}: {}", old.display(), e);
                        RemovalOutcome::Failed(e.to_string())
                    }
                }
            };
            Removal {
                file_name: entry.old.clone(),
                outcome,
            }
        })
        .collect()
}
