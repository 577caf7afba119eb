//! # imgcr
//!
//! Batch image compressor and resizer. Point it at a directory and every
//! PNG/JPG file directly inside it is re-encoded as JPEG at a chosen quality,
//! downscaled first if it is wider than a maximum width.
//!
//! # Pipeline
//!
//! ```text
//! 1. Configure   flags / env / config.toml / prompt  →  RunConfig   (all validation)
//! 2. Select      source dir                          →  [a.png, b.JPG, ...]
//! 3. Process     each file: decode → resize? → compress into CompressedAndResizedImages/
//! 4. Report      BatchReport                         →  stdout
//! ```
//!
//! Every input is checked in step 1, before any file is created. The
//! pipeline itself never reads stdin or the environment: the interactive
//! prompt is just one way of filling a [`config::RunConfig`].
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `RunConfig`, optional `config.toml` loading, merging and validation, strict input parsers |
//! | [`prompt`] | Interactive fallback asking for source, quality and max width |
//! | [`scan`] | Non-recursive, case-insensitive `png`/`jpg` selection |
//! | [`naming`] | Output file naming policy |
//! | [`process`] | Per-image pipeline and batch failure policy |
//! | [`imaging`] | Decode, Catmull-Rom resize with mirrored edges, JPEG compress, DPI reading |
//! | [`output`] | CLI output formatting for the batch report |
//!
//! # Design Decisions
//!
//! ## Output keeps its original name
//!
//! Results are always JPEG, but by default keep the source's file name, so
//! `photo.png` is written as `CompressedAndResizedImages/photo.png` holding
//! JPEG bytes. `--jpg-extension` switches to `photo.jpg`.
//!
//! ## Fail fast by default
//!
//! The first image that cannot be decoded or written stops the batch; outputs
//! written so far stay on disk. `--keep-going` (or `on_error = "continue"`)
//! records the failure and carries on, and the run still exits non-zero.
//!
//! ## Mirrored edges
//!
//! Bicubic resampling reads beyond the image border. Those reads are served
//! from a mirrored copy of the edge rather than zero or clamped pixels.

pub mod config;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod process;
pub mod prompt;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
