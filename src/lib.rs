//! # Gallery Optimizer
//!
//! A one-shot maintenance tool for a static marketing site's photo gallery.
//! It renames every image in the gallery folder to an SEO-friendly name,
//! re-encodes it as width-capped lossy WebP under a byte budget, rewrites the
//! references in the site's markup and stylesheet, and deletes the originals.
//!
//! # Pipeline
//!
//! ```text
//! 1. Scan      galeria/          →  sorted file list
//! 2. Name      file list         →  NameMapping (curated overrides, then auto names)
//! 3. Optimize  each rename       →  galeria/<new>.webp   (≤ 600px wide, ≤ 200 KB)
//! 4. Rewrite   index.html, style.css  →  references point at the new names
//! 5. Cleanup   renamed originals →  deleted
//! ```
//!
//! Per-image failures never stop the run. They are reported and the batch
//! moves on. Only setup problems (invalid config, missing codec, missing
//! gallery or documents, a colliding name mapping) abort before any write.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | The fixed thresholds, names, paths and the curated override table |
//! | [`scan`] | Lists candidate images in the gallery folder |
//! | [`naming`] | Builds and validates the old name → new name mapping |
//! | [`imaging`] | Decode, fit to width, quality search, WebP encode |
//! | [`process`] | Per-entry batch and the end-to-end run |
//! | [`rewrite`] | Text substitution in the markup and stylesheet, lazy-loading pass |
//! | [`cleanup`] | Deletes renamed originals |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Quality Ladder, Not Binary Search
//!
//! Encoding walks a short descending list of qualities (85, 75, 65, 55) and
//! stops at the first result under budget, then tries once more at 50. The
//! highest acceptable quality wins and each file costs at most five encodes.
//!
//! ## Plain Text Substitution
//!
//! References are rewritten as literal substrings (`galeria/<old>`), not by
//! parsing HTML or CSS. Any occurrence anywhere in the text is replaced, which
//! also covers inline styles, `srcset` entries and Open Graph URLs.
//!
//! ## Mapping Checked Before Any Write
//!
//! A mapping where two files get the same name, or where a file is renamed to
//! another file's current name, is rejected up front. Either case would let an
//! encode overwrite a source that has not been read yet.

pub mod cleanup;
pub mod config;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod process;
pub mod rewrite;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
