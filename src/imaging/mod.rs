//! Image optimization: decode, fit to width, encode under a byte budget.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode + normalise** | `image` crate, `to_rgb8` |
//! | **Resize** | Lanczos3 via `image::imageops::resize` |
//! | **Encode** | lossy WebP via the `webp` crate |
//!
//! The module is split into:
//! - **Calculations**: pure dimension math and the attempt plan (unit testable)
//! - **Parameters**: data structures describing an encode
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: [`optimize_image`], the quality search over a backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{Attempt, calculate_fit_width, plan_attempts};
pub use operations::{OptimizeConfig, Optimized, optimize_image};
pub use params::{EncodeParams, Effort, Quality};
pub use rust_backend::RustBackend;
