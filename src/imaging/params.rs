//! Parameter types for image operations.
//!
//! These structs describe *what* to encode, not *how*. They are the interface
//! between [`operations`](super::operations), which decides the quality ladder,
//! and the [`backend`](super::backend), which does the pixel work.
//!
//! - [`Quality`]: lossy encoding quality (1–100). Clamped on construction.
//! - [`Effort`]: WebP encoder method (0–6). Clamped on construction.
//! - [`EncodeParams`]: output path plus the two knobs above.

use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(85)
    }
}

/// Encoder effort: higher is slower and produces smaller files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Effort(u8);

impl Effort {
    pub const MAX: u8 = 6;

    pub fn new(value: u8) -> Self {
        Self(value.min(Self::MAX))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Effort {
    fn default() -> Self {
        Self(Self::MAX)
    }
}

/// Parameters for a single encode-and-write attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeParams {
    pub output: PathBuf,
    pub quality: Quality,
    pub effort: Effort,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0).value(), 1);
        assert_eq!(Quality::new(50).value(), 50);
        assert_eq!(Quality::new(150).value(), 100);
    }

    #[test]
    fn quality_orders_numerically() {
        assert!(Quality::new(85) > Quality::new(75));
    }

    #[test]
    fn effort_clamps_to_six() {
        assert_eq!(Effort::new(9).value(), 6);
        assert_eq!(Effort::new(0).value(), 0);
        assert_eq!(Effort::default().value(), 6);
    }
}
