//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the seam between the optimizer's decisions
//! and the codec: decode to RGB, resample, encode-and-write. The production
//! implementation is [`RustBackend`](super::rust_backend::RustBackend); tests
//! use the recording [`MockBackend`](tests::MockBackend) so the quality search
//! can be driven with scripted file sizes.

use super::params::EncodeParams;
use image::RgbImage;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
    #[error("Codec unavailable: {0}")]
    Unavailable(String),
}

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl From<&RgbImage> for Dimensions {
    fn from(image: &RgbImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
        }
    }
}

/// Trait for image codec backends.
pub trait ImageBackend {
    /// Check that every listed source extension can be decoded and that the
    /// target encoder works. Called once before any file is touched.
    fn probe(&self, extensions: &[String]) -> Result<(), BackendError>;

    /// Decode `path` into 8-bit RGB, dropping alpha and expanding palettes.
    fn load(&self, path: &Path) -> Result<RgbImage, BackendError>;

    /// Resample to exactly `width`×`height`.
    fn resize(&self, image: &RgbImage, width: u32, height: u32) -> RgbImage;

    /// Encode `image`, write it to `params.output` (replacing any previous
    /// attempt) and return the size of the written file in bytes.
    fn encode(&self, image: &RgbImage, params: &EncodeParams) -> Result<u64, BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Mock backend that records operations without touching pixels or disk.
    ///
    /// `load` pops dimensions from the back of `load_results` (an empty stack
    /// is a decode error). `encode` returns the size scripted for that quality,
    /// or `default_size`.
    pub struct MockBackend {
        pub load_results: Mutex<Vec<Dimensions>>,
        pub encoded_sizes: HashMap<u32, u64>,
        pub default_size: u64,
        pub probe_error: Option<String>,
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Probe(Vec<String>),
        Load(String),
        Resize {
            width: u32,
            height: u32,
        },
        Encode {
            output: String,
            width: u32,
            height: u32,
            quality: u32,
            effort: u8,
        },
    }

    impl Default for MockBackend {
        fn default() -> Self {
            Self {
                load_results: Mutex::new(Vec::new()),
                encoded_sizes: HashMap::new(),
                default_size: 10_000,
                probe_error: None,
                operations: Mutex::new(Vec::new()),
            }
        }
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_dimensions(dims: Vec<Dimensions>) -> Self {
            Self {
                load_results: Mutex::new(dims),
                ..Self::default()
            }
        }

        /// Script the encoded size for specific qualities.
        pub fn with_sizes(mut self, sizes: &[(u32, u64)]) -> Self {
            self.encoded_sizes = sizes.iter().copied().collect();
            self
        }

        pub fn with_default_size(mut self, size: u64) -> Self {
            self.default_size = size;
            self
        }

        pub fn unavailable(reason: &str) -> Self {
            Self {
                probe_error: Some(reason.to_string()),
                ..Self::default()
            }
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        /// Qualities passed to `encode`, in call order.
        pub fn encoded_qualities(&self) -> Vec<u32> {
            self.get_operations()
                .into_iter()
                .filter_map(|op| match op {
                    RecordedOp::Encode { quality, .. } => Some(quality),
                    _ => None,
                })
                .collect()
        }
    }

    impl ImageBackend for MockBackend {
        fn probe(&self, extensions: &[String]) -> Result<(), BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Probe(extensions.to_vec()));
            match &self.probe_error {
                Some(reason) => Err(BackendError::Unavailable(reason.clone())),
                None => Ok(()),
            }
        }

        fn load(&self, path: &Path) -> Result<RgbImage, BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Load(path.to_string_lossy().to_string()));

            let dims = self
                .load_results
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| BackendError::Decode("No mock dimensions".to_string()))?;
            Ok(RgbImage::new(dims.width, dims.height))
        }

        fn resize(&self, _image: &RgbImage, width: u32, height: u32) -> RgbImage {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Resize { width, height });
            RgbImage::new(width, height)
        }

        fn encode(&self, image: &RgbImage, params: &EncodeParams) -> Result<u64, BackendError> {
            self.operations.lock().unwrap().push(RecordedOp::Encode {
                output: params.output.to_string_lossy().to_string(),
                width: image.width(),
                height: image.height(),
                quality: params.quality.value(),
                effort: params.effort.value(),
            });
            Ok(self
                .encoded_sizes
                .get(&params.quality.value())
                .copied()
                .unwrap_or(self.default_size))
        }
    }

    #[test]
    fn mock_records_load() {
        let backend = MockBackend::with_dimensions(vec![Dimensions {
            width: 800,
            height: 600,
        }]);

        let image = backend.load(Path::new("/test/image.jpg")).unwrap();
        assert_eq!(
            Dimensions::from(&image),
            Dimensions {
                width: 800,
                height: 600,
            }
        );

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(&ops[0], RecordedOp::Load(p) if p == "/test/image.jpg"));
    }

    #[test]
    fn mock_load_without_dimensions_is_decode_error() {
        let backend = MockBackend::new();
        let result = backend.load(Path::new("/broken.png"));
        assert!(matches!(result, Err(BackendError::Decode(_))));
    }

    #[test]
    fn mock_encode_returns_scripted_size() {
        use super::super::params::{Effort, Quality};

        let backend = MockBackend::new()
            .with_sizes(&[(85, 300_000)])
            .with_default_size(42);
        let image = RgbImage::new(4, 4);
        let at = |q| EncodeParams {
            output: "/out.webp".into(),
            quality: Quality::new(q),
            effort: Effort::default(),
        };

        assert_eq!(backend.encode(&image, &at(85)).unwrap(), 300_000);
        assert_eq!(backend.encode(&image, &at(75)).unwrap(), 42);
        assert_eq!(backend.encoded_qualities(), vec![85, 75]);
    }

    #[test]
    fn mock_probe_reports_unavailable() {
        let backend = MockBackend::unavailable("no webp");
        let result = backend.probe(&["jpg".to_string()]);
        assert!(matches!(result, Err(BackendError::Unavailable(r)) if r == "no webp"));
    }
}
