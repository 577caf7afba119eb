//! Shared test utilities for the imgcr test suite.
//!
//! Synthetic image writers and output inspectors. Images are generated on
//! the fly so tests never depend on checked-in binaries.

use crate::imaging::Dimensions;
use image::codecs::jpeg::{JpegEncoder, PixelDensity};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageReader, RgbImage};
use std::path::Path;

// =========================================================================
// Synthetic images
// =========================================================================

/// Gradient pattern so encoders have real content to compress.
fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

/// Create a valid PNG file with the given dimensions.
pub fn create_test_png(path: &Path, width: u32, height: u32) {
    let img = gradient(width, height);
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    PngEncoder::new(writer)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
}

/// Create a valid JPEG file with the given dimensions.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = gradient(width, height);
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
}

/// Create a JPEG whose JFIF header declares `dpi` on both axes.
pub fn create_test_jpeg_with_dpi(path: &Path, width: u32, height: u32, dpi: u16) {
    let img = gradient(width, height);
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    let mut encoder = JpegEncoder::new(writer);
    encoder.set_pixel_density(PixelDensity::dpi(dpi));
    encoder
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
}

// =========================================================================
// Output inspection
// =========================================================================

/// Read dimensions from file content, ignoring the extension.
pub fn read_dimensions(path: &Path) -> Dimensions {
    let (width, height) = ImageReader::open(path)
        .unwrap()
        .with_guessed_format()
        .unwrap()
        .into_dimensions()
        .unwrap_or_else(|e| panic!("cannot read dimensions of {}: {e}", path.display()));
    Dimensions { width, height }
}

/// True when the file starts with a JPEG SOI marker.
pub fn is_jpeg(path: &Path) -> bool {
    std::fs::read(path)
        .map(|bytes| bytes.starts_with(&[0xFF, 0xD8, 0xFF]))
        .unwrap_or(false)
}
