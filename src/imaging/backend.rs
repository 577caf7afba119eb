//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations the pipeline
//! needs: decode, resize, and compress. Each backend chooses its own
//! in-memory image type, exposed through the [`Raster`] trait so the
//! pipeline can read dimensions without knowing the pixel layout.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend). Tests use a mock that
//! records operations and never allocates pixels.

use super::params::Quality;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {}: {reason}", .path.display())]
    Decode { path: PathBuf, reason: String },
    #[error("Invalid target dimensions {0}: width and height must be positive")]
    InvalidDimensions(Dimensions),
    #[error("Resize failed: {0}")]
    Resize(String),
    #[error("JPEG encode failed: {0}")]
    Encode(String),
}

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A decoded, in-memory image.
pub trait Raster {
    fn dimensions(&self) -> Dimensions;
}

/// Trait for image processing backends.
pub trait ImageBackend {
    type Image: Raster;

    /// Decode the file at `path`. Content is sniffed, not trusted from the
    /// extension.
    fn decode(&self, path: &Path) -> Result<Self::Image, BackendError>;

    /// Produce a new image of exactly `target` pixels. The source is left
    /// untouched and its resolution metadata is carried over unchanged.
    fn resize(&self, image: &Self::Image, target: Dimensions) -> Result<Self::Image, BackendError>;

    /// Encode `image` as JPEG at `quality` and write it to `output`,
    /// overwriting any existing file. The parent directory must exist.
    fn compress(
        &self,
        image: &Self::Image,
        output: &Path,
        quality: Quality,
    ) -> Result<(), BackendError>;
}
