//! Output file naming.
//!
//! The output always holds JPEG bytes. By default it keeps the source's file
//! name and extension, so `photo.png` is written as `photo.png`:
//! - `photo.png` → `CompressedAndResizedImages/photo.png` (JPEG content)
//! - `photo.PNG` with [`Naming::Jpg`] → `CompressedAndResizedImages/photo.jpg`

use crate::config::Naming;
use std::path::{Path, PathBuf};

/// Extension written by [`Naming::Jpg`].
const JPG_EXTENSION: &str = "jpg";

/// Where the output for `source` goes inside `dest_dir`.
///
/// Returns `None` when `source` has no file name (e.g. `..` or `/`).
pub fn output_path(dest_dir: &Path, source: &Path, naming: Naming) -> Option<PathBuf> {
    let file_name = source.file_name()?;
    let output = dest_dir.join(file_name);
    Some(match naming {
        Naming::Original => output,
        Naming::Jpg => output.with_extension(JPG_EXTENSION),
    })
}
