//! CLI output formatting.
//!
//! One line per image, led by its positional index and file name, followed
//! by what happened to it and where the result went:
//!
//! ```text
//! Source: /home/me/photos
//!     Quality: 80%, max width: 2000px
//!
//! 001 photo.png  8000x4000 → 2000x1000  CompressedAndResizedImages/photo.png
//! 002 small.jpg  800x600 (kept)  CompressedAndResizedImages/small.jpg
//! 003 broken.jpg  FAILED: Failed to process broken.jpg: ...
//!
//! Processed 2 of 3 images (1 failed)
//! ```
//!
//! Each `format_*` function returns `Vec<String>` and has no side effects;
//! the `print_*` wrappers write to stdout.

use crate::config::RunConfig;
use crate::process::{BatchReport, FileOutcome, ProcessedImage};
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Output path relative to the source directory, i.e. starting with the
/// destination folder name.
fn display_output(output: &Path, dest_dir: &Path) -> String {
    let base = dest_dir.parent().unwrap_or(dest_dir);
    output
        .strip_prefix(base)
        .unwrap_or(output)
        .display()
        .to_string()
}

fn processed_line(index: usize, image: &ProcessedImage, dest_dir: &Path) -> String {
    let sizes = if image.resized() {
        format!("{} → {}", image.original, image.output_dims)
    } else {
        format!("{} (kept)", image.original)
    };
    format!(
        "{} {}  {}  {}",
        format_index(index),
        file_name(&image.source),
        sizes,
        display_output(&image.output, dest_dir)
    )
}

/// Format the settings a batch is about to run with.
pub fn format_run_header(config: &RunConfig) -> Vec<String> {
    vec![
        format!("Source: {}", config.source_dir.display()),
        format!(
            "    Quality: {}, max width: {}px",
            config.quality, config.max_width
        ),
    ]
}

pub fn print_run_header(config: &RunConfig) {
    for line in format_run_header(config) {
        println!("{}", line);
    }
}

/// Format a finished batch: one line per file, then a summary.
pub fn format_report(report: &BatchReport) -> Vec<String> {
    let mut lines: Vec<String> = report
        .outcomes
        .iter()
        .enumerate()
        .map(|(i, outcome)| match outcome {
            FileOutcome::Processed(image) => processed_line(i + 1, image, &report.dest_dir),
            FileOutcome::Failed { source, error } => {
                format!("{} {}  FAILED: {}", format_index(i + 1), file_name(source), error)
            }
        })
        .collect();

    if !lines.is_empty() {
        lines.push(String::new());
    }
    let total = report.outcomes.len();
    let failed = report.failed_count();
    let mut summary = format!(
        "Processed {} of {} image{}",
        report.processed_count(),
        total,
        if total == 1 { "" } else { "s" }
    );
    if failed > 0 {
        summary.push_str(&format!(" ({} failed)", failed));
    }
    lines.push(summary);
    lines
}

/// Print a finished batch to stdout.
pub fn print_report(report: &BatchReport) {
    for line in format_report(report) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::imaging::Dimensions;
    use std::path::PathBuf;

    const DEST: &str = "/photos/CompressedAndResizedImages";

    fn processed(name: &str, original: (u32, u32), output: (u32, u32)) -> FileOutcome {
        FileOutcome::Processed(ProcessedImage {
            source: PathBuf::from("/photos").join(name),
            output: PathBuf::from(DEST).join(name),
            original: Dimensions {
                width: original.0,
                height: original.1,
            },
            output_dims: Dimensions {
                width: output.0,
                height: output.1,
            },
        })
    }

    fn report(outcomes: Vec<FileOutcome>) -> BatchReport {
        BatchReport {
            dest_dir: PathBuf::from(DEST),
            outcomes,
        }
    }

    #[test]
    fn format_index_pads_to_three_digits() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn resized_image_line() {
        let lines = format_report(&report(vec![processed(
            "photo.png",
            (8000, 4000),
            (2000, 1000),
        )]));
        assert_eq!(
            lines[0],
            "001 photo.png  8000x4000 → 2000x1000  CompressedAndResizedImages/photo.png"
        );
    }

    #[test]
    fn kept_image_line() {
        let lines = format_report(&report(vec![processed("small.jpg", (800, 600), (800, 600))]));
        assert_eq!(
            lines[0],
            "001 small.jpg  800x600 (kept)  CompressedAndResizedImages/small.jpg"
        );
    }

    #[test]
    fn failed_image_line() {
        let lines = format_report(&report(vec![FileOutcome::Failed {
            source: PathBuf::from("/photos/broken.jpg"),
            error: "Failed to decode".to_string(),
        }]));
        assert_eq!(lines[0], "001 broken.jpg  FAILED: Failed to decode");
    }

    #[test]
    fn summary_counts_failures() {
        let lines = format_report(&report(vec![
            processed("a.png", (10, 10), (10, 10)),
            processed("b.png", (10, 10), (10, 10)),
            FileOutcome::Failed {
                source: PathBuf::from("/photos/c.png"),
                error: "boom".to_string(),
            },
        ]));
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "Processed 2 of 3 images (1 failed)");
    }

    #[test]
    fn summary_without_failures() {
        let lines = format_report(&report(vec![processed("a.png", (10, 10), (10, 10))]));
        assert_eq!(lines.last().unwrap(), "Processed 1 of 1 image");
    }

    #[test]
    fn empty_report_is_summary_only() {
        let lines = format_report(&report(vec![]));
        assert_eq!(lines, vec!["Processed 0 of 0 images"]);
    }

    #[test]
    fn indices_follow_processing_order() {
        let lines = format_report(&report(vec![
            processed("a.png", (10, 10), (10, 10)),
            processed("b.png", (10, 10), (10, 10)),
        ]));
        assert!(lines[0].starts_with("001 a.png"));
        assert!(lines[1].starts_with("002 b.png"));
    }

    #[test]
    fn run_header_shows_settings() {
        let tmp = tempfile::TempDir::new().unwrap();
        let mut settings = Settings::default();
        settings.output.quality = 80;
        settings.output.max_width = 2000;
        let config = RunConfig::new(tmp.path().to_path_buf(), &settings).unwrap();

        let lines = format_run_header(&config);
        assert_eq!(lines[0], format!("Source: {}", tmp.path().display()));
        assert_eq!(lines[1], "    Quality: 80%, max width: 2000px");
    }
}
