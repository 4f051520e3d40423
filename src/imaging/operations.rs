//! High-level image operations.
//!
//! [`optimize_image`] is the whole per-file decision procedure: decode to RGB,
//! fit to the maximum width, then walk the quality ladder until an encode
//! fits the byte budget, with one last try at the floor quality.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::{calculate_fit_width, plan_attempts};
use super::params::{Effort, EncodeParams, Quality};
use crate::config::OptimizerConfig;
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Budgets and knobs for a single optimization.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizeConfig {
    pub max_width: u32,
    pub max_bytes: u64,
    pub ladder: Vec<Quality>,
    pub floor: Quality,
    pub effort: Effort,
}

impl OptimizeConfig {
    pub fn from_config(config: &OptimizerConfig) -> Self {
        Self {
            max_width: config.max_width,
            max_bytes: config.max_bytes,
            ladder: config
                .quality_ladder
                .iter()
                .map(|&q| Quality::new(q))
                .collect(),
            floor: Quality::new(config.floor_quality),
            effort: Effort::new(config.effort),
        }
    }
}

impl Default for OptimizeConfig {
    fn default() -> Self {
        Self::from_config(&OptimizerConfig::default())
    }
}

/// What one optimization produced. The destination file holds the final
/// attempt even when `within_budget` is false.
#[derive(Debug, Clone, PartialEq)]
pub struct Optimized {
    pub original: Dimensions,
    pub output: Dimensions,
    pub quality: Quality,
    pub bytes: u64,
    pub within_budget: bool,
    /// Number of encodes performed, fallback included.
    pub attempts: usize,
}

/// Optimize `source` into `destination`.
///
/// The caller guarantees `source != destination`; every attempt overwrites
/// `destination`, so the source must not be the file being written.
pub fn optimize_image(
    backend: &impl ImageBackend,
    source: &Path,
    destination: &Path,
    config: &OptimizeConfig,
) -> Result<Optimized> {
    let image = backend.load(source)?;
    let original = Dimensions::from(&image);

    let (width, height) = calculate_fit_width((original.width, original.height), config.max_width);
    let image = if (width, height) == (original.width, original.height) {
        image
    } else {
        tracing::debug!(
            "resizing {}x{} → {}x{}",
            original.width,
            original.height,
            width,
            height
        );
        backend.resize(&image, width, height)
    };
    let output = Dimensions::from(&image);

    let mut attempts = 0;
    let mut last = None;
    for attempt in plan_attempts(&config.ladder, config.floor) {
        let params = EncodeParams {
            output: destination.to_path_buf(),
            quality: attempt.quality,
            effort: config.effort,
        };
        let bytes = backend.encode(&image, &params)?;
        attempts += 1;
        let within_budget = bytes <= config.max_bytes;
        tracing::debug!(
            "{}: quality {} → {} bytes{}",
            destination.display(),
            attempt.quality.value(),
            bytes,
            if attempt.fallback { " (fallback)" } else { "" }
        );
        last = Some((attempt.quality, bytes, within_budget));
        if within_budget {
            break;
        }
    }

    // plan_attempts always yields at least the fallback attempt.
    let (quality, bytes, within_budget) =
        last.ok_or_else(|| BackendError::Encode("no encode attempted".into()))?;

    Ok(Optimized {
        original,
        output,
        quality,
        bytes,
        within_budget,
        attempts,
    })
}
