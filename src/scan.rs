//! Input discovery.
//!
//! Lists the files directly inside the source directory whose extension is
//! `png` or `jpg`, compared case-insensitively. Subdirectories are never
//! entered, so the destination folder created inside the source directory is
//! not picked up on a second run.
//!
//! ```text
//! photos/
//! ├── a.png                        # selected
//! ├── b.JPG                        # selected
//! ├── c.jpeg                       # skipped (only "jpg" matches)
//! ├── d.gif                        # skipped
//! ├── notes.txt                    # skipped
//! └── CompressedAndResizedImages/  # skipped (directory)
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extensions accepted as input, lowercase.
pub const INPUT_EXTENSIONS: &[&str] = &["png", "jpg"];

/// True when the path's extension is one of [`INPUT_EXTENSIONS`], ignoring case.
///
/// Looks at the name only; the file is not opened.
pub fn has_input_extension(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .is_some_and(|ext| INPUT_EXTENSIONS.contains(&ext.as_str()))
}

/// Select the images to process in `dir`, sorted by file name.
pub fn select_images(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            debug!(path = %path.display(), "skipping non-file entry");
            continue;
        }
        if !has_input_extension(&path) {
            debug!(path = %path.display(), "skipping unsupported extension");
            continue;
        }
        images.push(path);
    }
    images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(images)
}
