//! Reference rewriting in the site's text documents.
//!
//! Renamed gallery files are referenced from two places: the markup
//! (`index.html`) and the stylesheet (`style.css`). Both are plain text
//! substitutions, no parsing. The markup is rewritten in two forms:
//!
//! ```text
//! galeria/a.jpg                                  →  galeria/<new>
//! https://www.artshow.com.br/galeria/a.jpg       →  https://www.artshow.com.br/galeria/<new>
//! ```
//!
//! The stylesheet only gets the relative form. Because the relative form is
//! a suffix of the absolute one, the absolute pass normally finds nothing
//! left to replace.
//!
//! Both documents are checked up front by [`SiteDocuments::check`] so a
//! missing file aborts the run before any image is written. They are read
//! again right before the rewrite.

use crate::config::OptimizerConfig;
use crate::naming::NameMapping;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RewriteError {
    #[error("Failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("Failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Markup,
    Stylesheet,
}

impl DocumentKind {
    /// Only the markup carries absolute URLs worth rewriting.
    pub fn rewrites_absolute(self) -> bool {
        matches!(self, DocumentKind::Markup)
    }
}

/// What happened to one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentUpdate {
    /// File name as configured, e.g. `index.html`.
    pub name: String,
    pub path: PathBuf,
    /// Occurrences replaced (or attributes inserted).
    pub replacements: usize,
}

impl DocumentUpdate {
    pub fn changed(&self) -> bool {
        self.replacements > 0
    }
}

/// Replace every reference to a renamed file in `text`.
///
/// Returns the new text and the number of occurrences replaced. Identity
/// entries are ignored, so applying the same mapping twice changes nothing
/// the second time.
pub fn rewrite_references(
    text: &str,
    mapping: &NameMapping,
    config: &OptimizerConfig,
    kind: DocumentKind,
) -> (String, usize) {
    let mut text = text.to_string();
    let mut count = 0;
    for entry in mapping.renames() {
        let mut forms = vec![(
            config.relative_ref(&entry.old),
            config.relative_ref(&entry.new),
        )];
        if kind.rewrites_absolute() {
            forms.push((
                config.absolute_ref(&entry.old),
                config.absolute_ref(&entry.new),
            ));
        }
        for (from, to) in forms {
            let hits = text.matches(from.as_str()).count();
            if hits > 0 {
                text = text.replace(&from, &to);
                count += hits;
            }
        }
    }
    (text, count)
}

#[derive(Debug)]
struct SiteDocument {
    kind: DocumentKind,
    name: String,
    path: PathBuf,
    original: String,
    text: String,
}

impl SiteDocument {
    fn load(root: &Path, name: &str, kind: DocumentKind) -> Result<Self, RewriteError> {
        let path = root.join(name);
        let original = fs::read_to_string(&path).map_err(|source| RewriteError::Read {
            path: path.clone(),
            source,
        })?;
        Ok(Self {
            kind,
            name: name.to_string(),
            path,
            text: original.clone(),
            original,
        })
    }

    fn save(&self) -> Result<(), RewriteError> {
        if self.text == self.original {
            return Ok(());
        }
        fs::write(&self.path, &self.text).map_err(|source| RewriteError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

/// The markup and stylesheet, held in memory between load and save.
#[derive(Debug)]
pub struct SiteDocuments {
    documents: Vec<SiteDocument>,
}

impl SiteDocuments {
    /// Read both documents from `root`. Fails if either is missing.
    pub fn load(root: &Path, config: &OptimizerConfig) -> Result<Self, RewriteError> {
        Ok(Self {
            documents: vec![
                SiteDocument::load(root, &config.markup_file, DocumentKind::Markup)?,
                SiteDocument::load(root, &config.stylesheet_file, DocumentKind::Stylesheet)?,
            ],
        })
    }

    /// Fail early if either document is missing or unreadable.
    pub fn check(root: &Path, config: &OptimizerConfig) -> Result<(), RewriteError> {
        Self::load(root, config).map(|_| ())
    }

    /// Rewrite references in memory. Nothing is written until [`save`](Self::save).
    pub fn apply(
        &mut self,
        mapping: &NameMapping,
        config: &OptimizerConfig,
    ) -> Vec<DocumentUpdate> {
        self.documents
            .iter_mut()
            .map(|doc| {
                let (text, replacements) = rewrite_references(&doc.text, mapping, config, doc.kind);
                doc.text = text;
                tracing::debug!("{}: {} references rewritten", doc.name, replacements);
                DocumentUpdate {
                    name: doc.name.clone(),
                    path: doc.path.clone(),
                    replacements,
                }
            })
            .collect()
    }

    /// Write back every document whose text changed.
    pub fn save(&self) -> Result<(), RewriteError> {
        self.documents.iter().try_for_each(SiteDocument::save)
    }
}

const LAZY_ATTRIBUTE: &str = "loading=\"lazy\" ";

/// Insert `loading="lazy"` before each `src="<gallery>/` attribute.
///
/// A tag that already has a `loading=` attribute, before or after `src`, is
/// left alone, as is a `src` that is only the tail of a longer attribute name
/// such as `data-src`. Returns the new text and the number of insertions.
pub fn add_lazy_loading(text: &str, gallery: &str) -> (String, usize) {
    let needle = format!("src=\"{gallery}/");
    let mut out = String::with_capacity(text.len());
    let mut added = 0;
    let mut cursor = 0;
    let mut last_tag = None;

    for (idx, _) in text.match_indices(&needle) {
        let tag_start = text[..idx].rfind('<').unwrap_or(0);
        let tag_end = text[idx..].find('>').map_or(text.len(), |p| idx + p);
        let has_loading = has_attribute(&text[tag_start..tag_end], "loading=");

        if starts_attribute(text, idx) && !has_loading && last_tag != Some(tag_start) {
            out.push_str(&text[cursor..idx]);
            out.push_str(LAZY_ATTRIBUTE);
            cursor = idx;
            added += 1;
            last_tag = Some(tag_start);
        }
    }
    out.push_str(&text[cursor..]);
    (out, added)
}

/// True when `idx` follows whitespace, so the match is a whole attribute name
/// rather than the tail of one like `data-src`.
fn starts_attribute(text: &str, idx: usize) -> bool {
    text[..idx]
        .chars()
        .next_back()
        .is_some_and(|c| c.is_ascii_whitespace())
}

fn has_attribute(tag: &str, name: &str) -> bool {
    tag.match_indices(name)
        .any(|(idx, _)| starts_attribute(tag, idx))
}

/// Run [`add_lazy_loading`] over the markup document on disk.
pub fn add_lazy_loading_in_place(
    root: &Path,
    config: &OptimizerConfig,
) -> Result<DocumentUpdate, RewriteError> {
    let mut doc = SiteDocument::load(root, &config.markup_file, DocumentKind::Markup)?;
    let (text, replacements) = add_lazy_loading(&doc.text, &config.gallery_dir);
    doc.text = text;
    doc.save()?;
    Ok(DocumentUpdate {
        name: doc.name,
        path: doc.path,
        replacements,
    })
}
