//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations every backend must
//! support: identify and process.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend) — pure Rust on the
//! `image` crate, statically linked into the binary.

use super::params::ProcessParams;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
///
/// Both operations must be implemented so the pipeline stays backend-agnostic:
/// `identify` doubles as the structural-intactness probe during validation
/// (corrupt or truncated headers fail here), `process` runs the full
/// decode → normalize → encode pass.
pub trait ImageBackend {
    /// Get image dimensions. Fails if the file is not a decodable image.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Execute a full normalization pass and write the JPEG output.
    fn process(&self, params: &ProcessParams) -> Result<(), BackendError>;
}
