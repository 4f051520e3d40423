//! Shared test utilities for the gallery-optimizer test suite.
//!
//! Synthetic images are generated with `image::RgbImage::from_fn` so no binary
//! fixtures are needed. A site fixture is a project root holding the markup,
//! the stylesheet and an empty gallery folder:
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = tempfile::TempDir::new().unwrap();
//! setup_site(tmp.path(), r#"<img src="galeria/a.jpg">"#, "");
//! create_test_jpeg(&tmp.path().join("galeria/a.jpg"), 800, 400);
//! ```

use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::fs;
use std::path::Path;

// =========================================================================
// Site fixture
// =========================================================================

/// Write `index.html`, `style.css` and an empty `galeria/` under `root`.
pub fn setup_site(root: &Path, markup: &str, stylesheet: &str) {
    fs::create_dir_all(root.join("galeria")).unwrap();
    fs::write(root.join("index.html"), markup).unwrap();
    fs::write(root.join("style.css"), stylesheet).unwrap();
}

// =========================================================================
// Synthetic images
// =========================================================================

/// Smooth gradient JPEG. Compresses well, so it lands under any sane budget.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    img.save_with_format(path, ImageFormat::Jpeg).unwrap();
}

/// PNG with a varying alpha channel.
pub fn create_test_png_rgba(path: &Path, width: u32, height: u32) {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([200, (x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    img.save_with_format(path, ImageFormat::Png).unwrap();
}
