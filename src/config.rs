//! Optimizer configuration.
//!
//! Every threshold, name and path the optimizer uses lives in one immutable
//! [`OptimizerConfig`], built once in `main` and passed by reference into each
//! stage. Its [`Default`] is the site's fixed setup; tests construct variants
//! with struct-update syntax to exercise other thresholds or override tables:
//!
//! ```
//! # use gallery_optimizer::config::OptimizerConfig;
//! let config = OptimizerConfig {
//!     max_bytes: 10 * 1024,
//!     quality_ladder: vec![80, 40],
//!     floor_quality: 20,
//!     ..OptimizerConfig::default()
//! };
//! assert!(config.validate().is_ok());
//! ```
//!
//! ## Defaults
//!
//! ```toml
//! max_width = 600            # pixels; wider images are scaled down to this width
//! max_bytes = 204800         # 200 KB ceiling per output file
//! quality_ladder = [85, 75, 65, 55]
//! floor_quality = 50         # one last attempt when the ladder is exhausted
//! effort = 6                 # WebP method, 0 (fast) to 6 (smallest)
//! gallery_dir = "galeria"
//! site_url = "https://www.artshow.com.br"
//! markup_file = "index.html"
//! stylesheet_file = "style.css"
//! auto_name_prefix = "art-show-galeria-campinas"
//! target_extension = "webp"
//! allowed_extensions = ["jpg", "jpeg", "png", "webp"]
//!
//! [overrides]                # curated SEO names, old file name -> new file name
//! ```
//!
//! There is no config file: the `config` subcommand only prints these values.

use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Curated SEO names for images referenced from the site's markup and stylesheet.
const SEO_OVERRIDES: &[(&str, &str)] = &[
    (
        "293478001_1225890111558306_2940808128424761868_n.webp",
        "art-show-caixas-palco-campinas.webp",
    ),
    (
        "442444135_1478879569375192_8864412821347479224_n.webp",
        "art-show-trio-eletrico-campinas.webp",
    ),
    (
        "502420620_18159794353362702_8192347240069434232_n.webp",
        "art-show-caixas-convencionais-campinas.webp",
    ),
    (
        "293185017_1016084262417910_6325870842122377712_n.webp",
        "art-show-sonorizacao-igreja-campinas.webp",
    ),
    (
        "374825600_231661136540240_4952089351693513140_n.webp",
        "art-show-projeto-igreja-campinas.webp",
    ),
    (
        "613100333_18181645783362702_1956245873521371649_n.webp",
        "art-show-fernando-brandao-campinas.webp",
    ),
    (
        "503673647_18159794491362702_4914966978490652816_n.webp",
        "art-show-sistema-profissional-campinas.webp",
    ),
    (
        "619221047_18182455009362702_7887225675930888305_n.webp",
        "art-show-assistencia-tecnica-campinas.webp",
    ),
    (
        "620976806_18182454397362702_3303142640832268658_n.webp",
        "art-show-equipamentos-audio-campinas.webp",
    ),
    (
        "509625523_18159794470362702_4780033254899983658_n.webp",
        "art-show-instalacao-campinas.webp",
    ),
    (
        "81336463_878843765852196_7848251766494612310_n.jpg",
        "art-show-oficina-campinas.webp",
    ),
    (
        "350090559_265671312543127_6790261039290178527_n.webp",
        "art-show-equipamento-profissional-campinas.webp",
    ),
    (
        "339326676_236347085721065_7841393625073304836_n.webp",
        "art-show-caixa-acustica-campinas.webp",
    ),
    (
        "475232298_18146078692362702_8769153606323168882_n.webp",
        "art-show-projeto-especial-campinas.webp",
    ),
    (
        "475254357_18146078830362702_7050389205150858589_n.webp",
        "art-show-instalacao-completa-campinas.webp",
    ),
    (
        "475326366_18146078983362702_3701740997505269183_n.webp",
        "art-show-montagem-campinas.webp",
    ),
];

/// Everything the optimizer needs to know about the site and its budgets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptimizerConfig {
    /// Images wider than this are scaled down to exactly this width.
    pub max_width: u32,
    /// Byte ceiling for each encoded output file.
    pub max_bytes: u64,
    /// Encoder qualities tried in order; the first one under budget wins.
    pub quality_ladder: Vec<u32>,
    /// Quality of the final attempt once the ladder is exhausted.
    pub floor_quality: u32,
    /// WebP encoder method (0 = fastest, 6 = slowest and smallest).
    pub effort: u8,
    /// Gallery folder, relative to the project root. Also the prefix of every
    /// image reference in the markup and stylesheet.
    pub gallery_dir: String,
    /// Public site origin used in absolute image URLs (no trailing slash).
    pub site_url: String,
    pub markup_file: String,
    pub stylesheet_file: String,
    /// Stem of auto-generated names: `<prefix>-01.<target_extension>`, ...
    pub auto_name_prefix: String,
    pub target_extension: String,
    /// Source extensions picked up by the scan (case-insensitive).
    pub allowed_extensions: Vec<String>,
    /// Explicit old name → new name table; wins over auto-generated names.
    pub overrides: BTreeMap<String, String>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_width: 600,
            max_bytes: 200 * 1024,
            quality_ladder: quality_steps(85, 10, 50),
            floor_quality: 50,
            effort: 6,
            gallery_dir: "galeria".to_string(),
            site_url: "https://www.artshow.com.br".to_string(),
            markup_file: "index.html".to_string(),
            stylesheet_file: "style.css".to_string(),
            auto_name_prefix: "art-show-galeria-campinas".to_string(),
            target_extension: "webp".to_string(),
            allowed_extensions: ["jpg", "jpeg", "png", "webp"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
            overrides: SEO_OVERRIDES
                .iter()
                .map(|(old, new)| (old.to_string(), new.to_string()))
                .collect(),
        }
    }
}

impl OptimizerConfig {
    /// Validate values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_width == 0 {
            return Err(ConfigError::Validation("max_width must be non-zero".into()));
        }
        if self.max_bytes == 0 {
            return Err(ConfigError::Validation("max_bytes must be non-zero".into()));
        }
        if self.quality_ladder.is_empty() {
            return Err(ConfigError::Validation(
                "quality_ladder must not be empty".into(),
            ));
        }
        if let Some(q) = self
            .quality_ladder
            .iter()
            .chain(std::iter::once(&self.floor_quality))
            .find(|q| !(1..=100).contains(*q))
        {
            return Err(ConfigError::Validation(format!(
                "quality {q} is outside 1-100"
            )));
        }
        if self.quality_ladder.windows(2).any(|w| w[0] <= w[1]) {
            return Err(ConfigError::Validation(
                "quality_ladder must be strictly descending".into(),
            ));
        }
        // Checked non-empty above.
        let last = self.quality_ladder[self.quality_ladder.len() - 1];
        if self.floor_quality > last {
            return Err(ConfigError::Validation(format!(
                "floor_quality {} must not exceed the last ladder level {last}",
                self.floor_quality
            )));
        }
        if self.effort > 6 {
            return Err(ConfigError::Validation("effort must be 0-6".into()));
        }
        if self.auto_name_prefix.is_empty() || self.target_extension.is_empty() {
            return Err(ConfigError::Validation(
                "auto_name_prefix and target_extension must not be empty".into(),
            ));
        }
        if self.gallery_dir.is_empty() {
            return Err(ConfigError::Validation(
                "gallery_dir must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Whether `file_name` has one of the allowed source extensions.
    pub fn is_allowed(&self, file_name: &str) -> bool {
        match file_name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => self
                .allowed_extensions
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext)),
            _ => false,
        }
    }

    /// Site-relative reference to a gallery file, as written in the markup.
    pub fn relative_ref(&self, file_name: &str) -> String {
        format!("{}/{}", self.gallery_dir, file_name)
    }

    /// Fully-qualified URL of a gallery file.
    pub fn absolute_ref(&self, file_name: &str) -> String {
        format!("{}/{}/{}", self.site_url, self.gallery_dir, file_name)
    }
}

/// Descending quality levels from `start` in steps of `step`, never below `floor`.
///
/// `quality_steps(85, 10, 50)` → `[85, 75, 65, 55]`.
pub fn quality_steps(start: u32, step: u32, floor: u32) -> Vec<u32> {
    if start < floor {
        return Vec::new();
    }
    (floor..=start).rev().step_by(step.max(1) as usize).collect()
}

/// Render the effective configuration as TOML, for the `config` subcommand.
pub fn render_toml(config: &OptimizerConfig) -> Result<String, toml::ser::Error> {
    toml::to_string_pretty(config)
}
