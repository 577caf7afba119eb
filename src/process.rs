//! Batch compression and resizing.
//!
//! For each selected image in the source directory:
//!
//! ```text
//! decode ──► width > max_width? ──yes──► resize to (max_width, h * max_width / w) ──► compress
//!                    │                                                                  ▲
//!                    └──no────────────────────────────────────────────────────────────┘
//! ```
//!
//! Images that already fit are still re-encoded as JPEG at the requested
//! quality. Output goes to the destination folder inside the source
//! directory, which is created (idempotently) before the first image.
//!
//! ## Failure policy
//!
//! - [`OnError::Abort`]: the first failing image stops the batch. Outputs
//!   already written stay on disk.
//! - [`OnError::Continue`]: failures are recorded in the [`BatchReport`] and
//!   the remaining images are still processed.
//!
//! An image whose output name was already produced by an earlier image (only
//! possible with [`Naming::Jpg`]) fails instead of overwriting it.
//!
//! Images are processed one at a time, in file-name order.

use crate::config::{Naming, OnError, RunConfig};
use crate::imaging::{
    BackendError, Dimensions, ImageBackend, Quality, Raster, RustBackend,
    calculate_target_dimensions,
};
use crate::{naming, scan};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to process {}: {source}", .path.display())]
    Imaging {
        path: PathBuf,
        #[source]
        source: BackendError,
    },
    #[error("Source has no file name: {}", .0.display())]
    MissingFileName(PathBuf),
    #[error(
        "Output {} for {} was already written by an earlier image",
        .output.display(),
        .path.display()
    )]
    OutputCollision { path: PathBuf, output: PathBuf },
    #[error("Aborted after {written} image(s) written: {source}")]
    Aborted {
        written: usize,
        #[source]
        source: Box<ProcessError>,
    },
}

/// What happened to one successfully processed image.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedImage {
    pub source: PathBuf,
    pub output: PathBuf,
    pub original: Dimensions,
    pub output_dims: Dimensions,
}

impl ProcessedImage {
    /// True when the output was downscaled.
    pub fn resized(&self) -> bool {
        self.original != self.output_dims
    }
}

/// Result for one file of a batch.
#[derive(Debug)]
pub enum FileOutcome {
    Processed(ProcessedImage),
    Failed { source: PathBuf, error: String },
}

/// Per-file outcomes of a batch, in processing order.
#[derive(Debug)]
pub struct BatchReport {
    pub dest_dir: PathBuf,
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn processed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::Processed(_)))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.processed_count()
    }

    pub fn is_success(&self) -> bool {
        self.failed_count() == 0
    }
}

/// Decode, optionally downscale, and compress one image into `dest_dir`.
///
/// `dest_dir` must already exist.
pub fn process_image<B: ImageBackend>(
    backend: &B,
    source: &Path,
    dest_dir: &Path,
    quality: Quality,
    max_width: u32,
    naming: Naming,
) -> Result<ProcessedImage, ProcessError> {
    let output = naming::output_path(dest_dir, source, naming)
        .ok_or_else(|| ProcessError::MissingFileName(source.to_path_buf()))?;
    let imaging = |source_err: BackendError| ProcessError::Imaging {
        path: source.to_path_buf(),
        source: source_err,
    };

    let image = backend.decode(source).map_err(imaging)?;
    let original = image.dimensions();
    debug!(path = %source.display(), dims = %original, "decoded");

    let output_dims = match calculate_target_dimensions(original, max_width) {
        Some(target) => {
            let resized = backend.resize(&image, target).map_err(imaging)?;
            // Free the full-size buffer before encoding
            drop(image);
            debug!(path = %source.display(), from = %original, to = %target, "resized");
            backend
                .compress(&resized, &output, quality)
                .map_err(imaging)?;
            target
        }
        None => {
            backend.compress(&image, &output, quality).map_err(imaging)?;
            original
        }
    };
    debug!(output = %output.display(), %quality, "compressed");

    Ok(ProcessedImage {
        source: source.to_path_buf(),
        output,
        original,
        output_dims,
    })
}

/// Process every selected image of `config.source_dir` with `backend`.
pub fn run_batch<B: ImageBackend>(
    backend: &B,
    config: &RunConfig,
) -> Result<BatchReport, ProcessError> {
    fs::create_dir_all(&config.dest_dir)?;
    let images = scan::select_images(&config.source_dir)?;
    info!(
        count = images.len(),
        source = %config.source_dir.display(),
        "processing images"
    );

    let mut outcomes = Vec::with_capacity(images.len());
    let mut written: HashSet<PathBuf> = HashSet::new();
    for source in images {
        let result = check_output_free(&written, &source, config).and_then(|()| {
            process_image(
                backend,
                &source,
                &config.dest_dir,
                config.quality,
                config.max_width,
                config.naming,
            )
        });
        match result {
            Ok(processed) => {
                written.insert(processed.output.clone());
                outcomes.push(FileOutcome::Processed(processed));
            }
            Err(e) => match config.on_error {
                OnError::Abort => {
                    return Err(ProcessError::Aborted {
                        written: outcomes.len(),
                        source: Box::new(e),
                    });
                }
                OnError::Continue => {
                    warn!(path = %source.display(), error = %e, "skipping image");
                    outcomes.push(FileOutcome::Failed {
                        source,
                        error: e.to_string(),
                    });
                }
            },
        }
    }

    Ok(BatchReport {
        dest_dir: config.dest_dir.clone(),
        outcomes,
    })
}

/// Fail when `source` would land on an output an earlier image produced.
///
/// Only reachable with [`Naming::Jpg`], where `a.png` and `a.jpg` both
/// become `a.jpg`.
fn check_output_free(
    written: &HashSet<PathBuf>,
    source: &Path,
    config: &RunConfig,
) -> Result<(), ProcessError> {
    let Some(output) = naming::output_path(&config.dest_dir, source, config.naming) else {
        return Err(ProcessError::MissingFileName(source.to_path_buf()));
    };
    if written.contains(&output) {
        warn!(path = %source.display(), output = %output.display(), "output name collision");
        return Err(ProcessError::OutputCollision {
            path: source.to_path_buf(),
            output,
        });
    }
    Ok(())
}

/// Run a batch with the production backend.
pub fn run(config: &RunConfig) -> Result<BatchReport, ProcessError> {
    run_batch(&RustBackend::new(), config)
}
