//! Batch optimization and the full run.
//!
//! A run goes through these steps, in this order:
//!
//! ```text
//! 1. Check     config valid, codec can decode every source type and encode WebP
//! 2. Plan      scan gallery/  →  NameMapping           (fails loudly on collisions)
//! 3. Check     index.html + style.css are readable   (fails before any write)
//! 4. Optimize  each renamed entry  →  gallery/<new>.webp
//! 5. Rewrite   references in both documents, re-read and saved in place
//! 6. Cleanup   delete every renamed original still on disk
//! ```
//!
//! Steps 1–3 can abort the run. From step 4 on nothing does: every entry ends
//! in an [`EntryOutcome`], reported through the event callback as it happens
//! and collected into the [`RunReport`].
//!
//! Cleanup is gated only on the name having changed, not on the entry's
//! outcome. An original whose encode failed is still deleted if it exists.

use crate::cleanup::{self, Removal};
use crate::config::{ConfigError, OptimizerConfig};
use crate::imaging::{
    BackendError, ImageBackend, OptimizeConfig, Optimized, RustBackend, optimize_image,
};
use crate::naming::{self, MappingEntry, MappingError, NameMapping};
use crate::rewrite::{self, DocumentUpdate, RewriteError, SiteDocuments};
use crate::scan::{self, ScanError};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Codec(#[from] BackendError),
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
    #[error("Mapping error: {0}")]
    Mapping(#[from] MappingError),
    #[error("Rewrite error: {0}")]
    Rewrite(#[from] RewriteError),
}

/// How a single mapping entry ended.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryOutcome {
    /// Old and new name are the same file; nothing was done.
    Unchanged,
    /// The source vanished between the scan and its turn.
    Skipped,
    /// Written and within the byte budget.
    Optimized(Optimized),
    /// Written, but even the floor quality is over budget.
    OverBudget(Optimized),
    /// Decode, encode or write failed; the message is the underlying error.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntryReport {
    pub old: String,
    pub new: String,
    pub outcome: EntryOutcome,
}

/// Progress events, emitted in run order.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessEvent {
    Planned { total: usize, renames: usize },
    EntryProcessed(EntryReport),
    DocumentUpdated(DocumentUpdate),
    Removed(Removal),
}

/// Everything a run did.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub mapping: NameMapping,
    pub entries: Vec<EntryReport>,
    pub documents: Vec<DocumentUpdate>,
    pub removals: Vec<Removal>,
}

/// Tallies for the closing summary line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub optimized: usize,
    pub over_budget: usize,
    pub skipped: usize,
    pub failed: usize,
    pub removed: usize,
}

impl RunReport {
    pub fn summary(&self) -> RunSummary {
        let mut summary = RunSummary::default();
        for entry in &self.entries {
            match entry.outcome {
                EntryOutcome::Optimized(_) => summary.optimized += 1,
                EntryOutcome::OverBudget(_) => summary.over_budget += 1,
                EntryOutcome::Skipped => summary.skipped += 1,
                EntryOutcome::Failed(_) => summary.failed += 1,
                EntryOutcome::Unchanged => {}
            }
        }
        summary.removed = self
            .removals
            .iter()
            .filter(|r| r.outcome == cleanup::RemovalOutcome::Removed)
            .count();
        summary
    }
}

/// Optimize one mapping entry inside `gallery`.
///
/// Never returns an error: failures become [`EntryOutcome::Failed`].
pub fn process_entry(
    backend: &impl ImageBackend,
    gallery: &Path,
    entry: &MappingEntry,
    config: &OptimizeConfig,
) -> EntryOutcome {
    if !entry.is_rename() {
        return EntryOutcome::Unchanged;
    }
    let source = gallery.join(&entry.old);
    if !source.exists() {
        tracing::warn!("{} not found, skipping", source.display());
        return EntryOutcome::Skipped;
    }
    let destination = gallery.join(&entry.new);
    if scan::same_file(&source, &destination) {
        return EntryOutcome::Unchanged;
    }

    match optimize_image(backend, &source, &destination, config) {
        Ok(result) if result.within_budget => EntryOutcome::Optimized(result),
        Ok(result) => {
            tracing::warn!(
                "{} is {} bytes at the floor quality, over the {} byte budget",
                entry.new,
                result.bytes,
                config.max_bytes
            );
            EntryOutcome::OverBudget(result)
        }
        Err(e) => {
            tracing::warn!("{}: {}", entry.old, e);
            EntryOutcome::Failed(e.to_string())
        }
    }
}

/// Optimize every entry of `mapping` in order, reporting each as it finishes.
pub fn process_entries(
    backend: &impl ImageBackend,
    gallery: &Path,
    mapping: &NameMapping,
    config: &OptimizeConfig,
    mut on_entry: impl FnMut(&EntryReport),
) -> Vec<EntryReport> {
    mapping
        .entries()
        .iter()
        .map(|entry| {
            let report = EntryReport {
                old: entry.old.clone(),
                new: entry.new.clone(),
                outcome: process_entry(backend, gallery, entry, config),
            };
            on_entry(&report);
            report
        })
        .collect()
}

/// Scan the gallery and build the validated mapping, without writing anything.
pub fn plan(root: &Path, config: &OptimizerConfig) -> Result<NameMapping, RunError> {
    config.validate()?;
    let gallery = root.join(&config.gallery_dir);
    let entries = scan::scan(&gallery, config)?;
    Ok(naming::build_mapping(&scan::file_names(&entries), config)?)
}

/// Run the whole optimization with the production backend.
pub fn run(
    root: &Path,
    config: &OptimizerConfig,
    on_event: impl FnMut(&ProcessEvent),
) -> Result<RunReport, RunError> {
    run_with_backend(&RustBackend::new(), root, config, on_event)
}

/// Run the whole optimization using a specific backend (allows testing with mock).
pub fn run_with_backend(
    backend: &impl ImageBackend,
    root: &Path,
    config: &OptimizerConfig,
    mut on_event: impl FnMut(&ProcessEvent),
) -> Result<RunReport, RunError> {
    config.validate()?;
    backend.probe(&config.allowed_extensions)?;

    let mapping = plan(root, config)?;
    SiteDocuments::check(root, config)?;
    let gallery = root.join(&config.gallery_dir);

    tracing::info!(
        "{} images in {}, {} to rename",
        mapping.len(),
        gallery.display(),
        mapping.renames().count()
    );
    on_event(&ProcessEvent::Planned {
        total: mapping.len(),
        renames: mapping.renames().count(),
    });

    let optimize_config = OptimizeConfig::from_config(config);
    let entries = process_entries(backend, &gallery, &mapping, &optimize_config, |report| {
        on_event(&ProcessEvent::EntryProcessed(report.clone()))
    });

    let mut documents = SiteDocuments::load(root, config)?;
    let updates = documents.apply(&mapping, config);
    documents.save()?;
    for update in &updates {
        on_event(&ProcessEvent::DocumentUpdated(update.clone()));
    }

    let removals = cleanup::cleanup(&mapping, &gallery);
    for removal in &removals {
        on_event(&ProcessEvent::Removed(removal.clone()));
    }

    Ok(RunReport {
        mapping,
        entries,
        documents: updates,
        removals,
    })
}

/// Add `loading="lazy"` to gallery images in the markup document.
pub fn lazy_load(root: &Path, config: &OptimizerConfig) -> Result<DocumentUpdate, RunError> {
    config.validate()?;
    Ok(rewrite::add_lazy_loading_in_place(root, config)?)
}
