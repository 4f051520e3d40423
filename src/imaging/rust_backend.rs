//! Production backend: `image` for decode and resampling, `webp` for encoding.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, WebP) | `image::ImageReader` with content sniffing |
//! | Normalise colour | `DynamicImage::to_rgb8` (alpha dropped, palettes expanded) |
//! | Resize | `image::imageops::resize` with `Lanczos3` |
//! | Encode → WebP | `webp::Encoder::encode_advanced` (lossy, quality + method) |
//!
//! The `image` crate only ships a lossless WebP encoder, which has no quality
//! knob to search over, so encoding goes through libwebp via the `webp` crate.

use super::backend::{BackendError, ImageBackend};
use super::params::{EncodeParams, Effort, Quality};
use image::imageops::FilterType;
use image::{ImageFormat, ImageReader, RgbImage};
use std::path::Path;

/// Backend using the `image` and `webp` crates.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode RGB pixels as lossy WebP in memory.
fn encode_webp(
    image: &RgbImage,
    quality: Quality,
    effort: Effort,
) -> Result<Vec<u8>, BackendError> {
    let mut config = webp::WebPConfig::new()
        .map_err(|_| BackendError::Encode("libwebp rejected the default config".into()))?;
    config.lossless = 0;
    config.quality = quality.value() as f32;
    config.method = effort.value() as i32;

    let encoder = webp::Encoder::from_rgb(image.as_raw(), image.width(), image.height());
    let memory = encoder
        .encode_advanced(&config)
        .map_err(|e| BackendError::Encode(format!("WebP encode failed: {e:?}")))?;
    Ok(memory.to_vec())
}

impl ImageBackend for RustBackend {
    fn probe(&self, extensions: &[String]) -> Result<(), BackendError> {
        for ext in extensions {
            let readable = ImageFormat::from_extension(ext)
                .is_some_and(|f| f.reading_enabled());
            if !readable {
                return Err(BackendError::Unavailable(format!(
                    "no decoder compiled in for .{ext}"
                )));
            }
        }
        encode_webp(&RgbImage::new(1, 1), Quality::default(), Effort::new(0))
            .map(|_| ())
            .map_err(|e| BackendError::Unavailable(e.to_string()))
    }

    fn load(&self, path: &Path) -> Result<RgbImage, BackendError> {
        // Sniff the content: a file named .jpg may well hold a WebP.
        let image = ImageReader::open(path)?
            .with_guessed_format()?
            .decode()
            .map_err(|e| BackendError::Decode(format!("{}: {}", path.display(), e)))?;
        Ok(image.to_rgb8())
    }

    fn resize(&self, image: &RgbImage, width: u32, height: u32) -> RgbImage {
        image::imageops::resize(image, width, height, FilterType::Lanczos3)
    }

    fn encode(&self, image: &RgbImage, params: &EncodeParams) -> Result<u64, BackendError> {
        let bytes = encode_webp(image, params.quality, params.effort)?;
        std::fs::write(&params.output, &bytes)?;
        Ok(std::fs::metadata(&params.output)?.len())
    }
}
