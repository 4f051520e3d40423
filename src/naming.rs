//! Old name → new name mapping for every image in the gallery.
//!
//! Names come from two places:
//! - the curated override table in [`OptimizerConfig::overrides`], which wins
//!   whenever a file is listed there;
//! - an auto-generated sequential name, `<prefix>-NN.<ext>`, for everything
//!   else. The counter only advances for files that are *not* in the table,
//!   so `a.jpg`, `b.png` → `…-01.webp`, `…-02.webp` regardless of how many
//!   override files sort between them.
//!
//! [`plan_mapping`] is a pure function of the listing and the config and never
//! fails. [`build_mapping`] adds [`validate_mapping`] on top, which refuses
//! mappings that would make two files land on the same name or make one
//! rename's target another rename's source. The rest of the run relies on
//! those two properties: the encoder never overwrites a file it hasn't read
//! yet, and the text rewrite gives the same result in any order.

use crate::config::OptimizerConfig;
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MappingError {
    #[error("Auto-generated name {name} for {file} is also a curated override name")]
    AutoNameCollision { file: String, name: String },
    #[error("Both {first} and {second} would be renamed to {name}")]
    DuplicateTarget {
        name: String,
        first: String,
        second: String,
    },
    #[error("{file} would be renamed to {name}, which is the current name of another file")]
    ChainedRename { name: String, file: String },
}

/// Where an entry's new name came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NameOrigin {
    Override,
    /// Auto-generated with this counter value (1-based).
    Auto(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingEntry {
    pub old: String,
    pub new: String,
    pub origin: NameOrigin,
}

impl MappingEntry {
    /// Whether applying this entry actually renames anything.
    pub fn is_rename(&self) -> bool {
        self.old != self.new
    }
}

/// The full mapping for one run, in sorted old-name order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NameMapping {
    entries: Vec<MappingEntry>,
}

impl NameMapping {
    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// New name for `old`, if `old` was part of the listing.
    pub fn get(&self, old: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.old == old)
            .map(|e| e.new.as_str())
    }

    /// Entries whose name changes. Identity entries are never processed,
    /// rewritten or deleted.
    pub fn renames(&self) -> impl Iterator<Item = &MappingEntry> {
        self.entries.iter().filter(|e| e.is_rename())
    }
}

/// Format an auto-generated name: `auto_name("x", 3, "webp")` → `x-03.webp`.
pub fn auto_name(prefix: &str, counter: u32, extension: &str) -> String {
    format!("{prefix}-{counter:02}.{extension}")
}

/// Build the mapping without validating it.
///
/// `listing` is the raw directory listing; names without an allowed extension
/// are dropped and the rest sorted and de-duplicated before numbering.
pub fn plan_mapping(listing: &[String], config: &OptimizerConfig) -> NameMapping {
    let mut files: Vec<&String> = listing.iter().filter(|f| config.is_allowed(f)).collect();
    files.sort();
    files.dedup();

    let mut counter = 1;
    let entries = files
        .into_iter()
        .map(|file| match config.overrides.get(file) {
            Some(curated) => MappingEntry {
                old: file.clone(),
                new: curated.clone(),
                origin: NameOrigin::Override,
            },
            None => {
                let entry = MappingEntry {
                    old: file.clone(),
                    new: auto_name(
                        &config.auto_name_prefix,
                        counter,
                        &config.target_extension,
                    ),
                    origin: NameOrigin::Auto(counter),
                };
                counter += 1;
                entry
            }
        })
        .collect();

    NameMapping { entries }
}

/// Check the collision rules described in the [module docs](self).
///
/// Names are compared ASCII-case-insensitively: `A.webp` and `a.webp` are the
/// same file on the filesystems this site is deployed from.
pub fn validate_mapping(
    mapping: &NameMapping,
    config: &OptimizerConfig,
) -> Result<(), MappingError> {
    let curated: Vec<String> = config
        .overrides
        .values()
        .map(|n| n.to_ascii_lowercase())
        .collect();

    let mut targets: HashMap<String, &MappingEntry> = HashMap::new();
    for entry in mapping.entries() {
        let key = entry.new.to_ascii_lowercase();

        if matches!(entry.origin, NameOrigin::Auto(_)) && curated.contains(&key) {
            return Err(MappingError::AutoNameCollision {
                file: entry.old.clone(),
                name: entry.new.clone(),
            });
        }

        if let Some(first) = targets.insert(key, entry) {
            return Err(MappingError::DuplicateTarget {
                name: entry.new.clone(),
                first: first.old.clone(),
                second: entry.old.clone(),
            });
        }
    }

    for entry in mapping.renames() {
        let chained = mapping
            .entries()
            .iter()
            .any(|other| other.old != entry.old && other.old.eq_ignore_ascii_case(&entry.new));
        if chained {
            return Err(MappingError::ChainedRename {
                name: entry.new.clone(),
                file: entry.old.clone(),
            });
        }
    }

    Ok(())
}

/// Build and validate the mapping for a directory listing.
pub fn build_mapping(
    listing: &[String],
    config: &OptimizerConfig,
) -> Result<NameMapping, MappingError> {
    let mapping = plan_mapping(listing, config);
    validate_mapping(&mapping, config)?;
    Ok(mapping)
}
