//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Run
//!
//! ```text
//! 18 images, 17 to rename
//!   a.jpg -> art-show-galeria-campinas-01.webp (143.2 KB) [OK]
//!   huge.png -> art-show-galeria-campinas-02.webp (231.0 KB) [>200KB]
//!   [skip] old.webp (not found)
//!   ERROR broken.png: Decode failed: ...
//! index.html updated (3 references)
//! style.css unchanged
//!   removed: a.jpg
//!   removed: huge.png
//! Done: 1 optimized, 1 over budget, 1 skipped, 1 failed, 2 originals removed
//! ```
//!
//! ## Plan
//!
//! ```text
//! 2 images, 1 to rename
//!   a.jpg -> art-show-galeria-campinas-01.webp
//!   keep.webp (unchanged)
//! ```
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::cleanup::{Removal, RemovalOutcome};
use crate::config::OptimizerConfig;
use crate::naming::NameMapping;
use crate::process::{EntryOutcome, EntryReport, ProcessEvent, RunSummary};
use crate::rewrite::DocumentUpdate;

// ============================================================================
// Shared helpers
// ============================================================================

/// Bytes as kilobytes with one decimal, e.g. `143.2 KB`.
fn format_kb(bytes: u64) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}

/// Status tag for an encoded file, e.g. `[OK]` or `[>200KB]`.
fn budget_tag(within_budget: bool, max_bytes: u64) -> String {
    if within_budget {
        "[OK]".to_string()
    } else {
        format!("[>{}KB]", max_bytes / 1024)
    }
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

fn format_header(total: usize, renames: usize) -> String {
    format!("{}, {} to rename", plural(total, "image", "images"), renames)
}

// ============================================================================
// Run output
// ============================================================================

/// Format one processed entry. Unchanged entries print nothing.
pub fn format_entry(report: &EntryReport, config: &OptimizerConfig) -> Vec<String> {
    match &report.outcome {
        EntryOutcome::Unchanged => vec![],
        EntryOutcome::Skipped => vec![format!("  [skip] {} (not found)", report.old)],
        EntryOutcome::Optimized(result) | EntryOutcome::OverBudget(result) => vec![format!(
            "  {} -> {} ({}) {}",
            report.old,
            report.new,
            format_kb(result.bytes),
            budget_tag(result.within_budget, config.max_bytes)
        )],
        EntryOutcome::Failed(reason) => vec![format!("  ERROR {}: {}", report.old, reason)],
    }
}

pub fn format_document(update: &DocumentUpdate) -> Vec<String> {
    if update.changed() {
        vec![format!(
            "{} updated ({})",
            update.name,
            plural(update.replacements, "reference", "references")
        )]
    } else {
        vec![format!("{} unchanged", update.name)]
    }
}

/// Format a cleanup result. Files that were already gone print nothing.
pub fn format_removal(removal: &Removal) -> Vec<String> {
    match &removal.outcome {
        RemovalOutcome::Removed => vec![format!("  removed: {}", removal.file_name)],
        RemovalOutcome::AlreadyGone => vec![],
        RemovalOutcome::SameFile => vec![format!(
            "  kept: {} (same file as new name)",
            removal.file_name
        )],
        RemovalOutcome::Failed(reason) => {
            vec![format!("  ERROR removing {}: {}", removal.file_name, reason)]
        }
    }
}

/// Format a single progress event as display lines.
pub fn format_process_event(event: &ProcessEvent, config: &OptimizerConfig) -> Vec<String> {
    match event {
        ProcessEvent::Planned { total, renames } => vec![format_header(*total, *renames)],
        ProcessEvent::EntryProcessed(report) => format_entry(report, config),
        ProcessEvent::DocumentUpdated(update) => format_document(update),
        ProcessEvent::Removed(removal) => format_removal(removal),
    }
}

pub fn print_process_event(event: &ProcessEvent, config: &OptimizerConfig) {
    for line in format_process_event(event, config) {
        println!("{}", line);
    }
}

pub fn format_summary(summary: &RunSummary) -> Vec<String> {
    vec![format!(
        "Done: {} optimized, {} over budget, {} skipped, {} failed, {} removed",
        summary.optimized,
        summary.over_budget,
        summary.skipped,
        summary.failed,
        plural(summary.removed, "original", "originals")
    )]
}

pub fn print_summary(summary: &RunSummary) {
    for line in format_summary(summary) {
        println!("{}", line);
    }
}

// ============================================================================
// Plan output
// ============================================================================

/// Format the mapping for a dry run.
pub fn format_plan(mapping: &NameMapping) -> Vec<String> {
    let mut lines = vec![format_header(mapping.len(), mapping.renames().count())];
    for entry in mapping.entries() {
        if entry.is_rename() {
            lines.push(format!("  {} -> {}", entry.old, entry.new));
        } else {
            lines.push(format!("  {} (unchanged)", entry.old));
        }
    }
    lines
}

pub fn print_plan(mapping: &NameMapping) {
    for line in format_plan(mapping) {
        println!("{}", line);
    }
}

// ============================================================================
// Lazy-loading output
// ============================================================================

pub fn format_lazy(update: &DocumentUpdate) -> Vec<String> {
    if update.changed() {
        vec![format!(
            "{}: {} set to lazy loading",
            update.name,
            plural(update.replacements, "image", "images")
        )]
    } else {
        vec![format!("{}: nothing to change", update.name)]
    }
}

pub fn print_lazy(update: &DocumentUpdate) {
    for line in format_lazy(update) {
        println!("{}", line);
    }
}
