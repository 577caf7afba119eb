//! Pure Rust image processing backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (PNG, JPEG) | `image::ImageReader` with content sniffing |
//! | Resolution metadata | custom [`density`](super::density) reader (JFIF APP0, PNG `pHYs`) |
//! | Resize | `fast_image_resize` Catmull-Rom convolution over a mirror-padded source |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` with quality + pixel density |

use super::backend::{BackendError, Dimensions, ImageBackend, Raster};
use super::calculations::{calculate_mirror_padding, mirror_index};
use super::density;
use super::params::{Quality, Resolution};
use fast_image_resize as fir;
use fir::images::{Image as FirImage, ImageRef as FirImageRef};
use fir::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::codecs::jpeg::{JpegEncoder, PixelDensity, PixelDensityUnit};
use image::{ExtendedColorType, ImageEncoder, ImageFormat, ImageReader, RgbImage};
use std::borrow::Cow;
use std::io::{BufWriter, Cursor, Write};
use std::path::Path;

/// Decoded RGB bitmap plus the resolution its source declared.
#[derive(Debug, Clone)]
pub struct Bitmap {
    pub pixels: RgbImage,
    pub resolution: Option<Resolution>,
}

impl Raster for Bitmap {
    fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.pixels.width(),
            height: self.pixels.height(),
        }
    }
}

/// Pure Rust backend using the `image` and `fast_image_resize` crates.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_error(path: &Path, reason: impl ToString) -> BackendError {
    BackendError::Decode {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Extend `pixels` by `pad_x`/`pad_y` mirrored pixels on every side.
fn mirror_pad(pixels: &RgbImage, pad_x: u32, pad_y: u32) -> Cow<'_, RgbImage> {
    if pad_x == 0 && pad_y == 0 {
        return Cow::Borrowed(pixels);
    }
    let (width, height) = pixels.dimensions();
    Cow::Owned(RgbImage::from_fn(
        width + 2 * pad_x,
        height + 2 * pad_y,
        |x, y| {
            let src_x = mirror_index(i64::from(x) - i64::from(pad_x), width);
            let src_y = mirror_index(i64::from(y) - i64::from(pad_y), height);
            *pixels.get_pixel(src_x, src_y)
        },
    ))
}

impl ImageBackend for RustBackend {
    type Image = Bitmap;

    fn decode(&self, path: &Path) -> Result<Bitmap, BackendError> {
        let data = std::fs::read(path)?;
        let reader = ImageReader::new(Cursor::new(&data)).with_guessed_format()?;

        match reader.format() {
            Some(ImageFormat::Png | ImageFormat::Jpeg) => {}
            Some(other) => {
                return Err(decode_error(path, format!("unsupported format {other:?}")));
            }
            None => return Err(decode_error(path, "unrecognised image data")),
        }

        let decoded = reader.decode().map_err(|e| decode_error(path, e))?;
        Ok(Bitmap {
            pixels: decoded.into_rgb8(),
            resolution: density::read_resolution(&data),
        })
    }

    fn resize(&self, image: &Bitmap, target: Dimensions) -> Result<Bitmap, BackendError> {
        if target.width == 0 || target.height == 0 {
            return Err(BackendError::InvalidDimensions(target));
        }
        let source = image.dimensions();
        if source.width == 0 || source.height == 0 {
            return Err(BackendError::Resize(format!("empty source image {source}")));
        }

        // The kernel reads the mirrored border; the crop box keeps the
        // output aligned to the original pixels.
        let pad_x = calculate_mirror_padding(source.width, target.width);
        let pad_y = calculate_mirror_padding(source.height, target.height);
        let padded = mirror_pad(&image.pixels, pad_x, pad_y);

        let src_view = FirImageRef::new(
            padded.width(),
            padded.height(),
            padded.as_raw(),
            PixelType::U8x3,
        )
        .map_err(|e| BackendError::Resize(e.to_string()))?;
        let mut dst = FirImage::new(target.width, target.height, PixelType::U8x3);

        let options = ResizeOptions::new()
            .resize_alg(ResizeAlg::Convolution(FilterType::CatmullRom))
            .crop(
                f64::from(pad_x),
                f64::from(pad_y),
                f64::from(source.width),
                f64::from(source.height),
            );
        Resizer::new()
            .resize(&src_view, &mut dst, &options)
            .map_err(|e| BackendError::Resize(e.to_string()))?;

        let pixels = RgbImage::from_raw(target.width, target.height, dst.into_vec())
            .ok_or_else(|| BackendError::Resize("resized buffer has wrong length".into()))?;

        Ok(Bitmap {
            pixels,
            resolution: image.resolution,
        })
    }

    fn compress(&self, image: &Bitmap, output: &Path, quality: Quality) -> Result<(), BackendError> {
        let file = std::fs::File::create(output)?;
        let mut writer = BufWriter::new(file);

        let mut encoder = JpegEncoder::new_with_quality(&mut writer, quality.encoder_value());
        if let Some(resolution) = image.resolution {
            encoder.set_pixel_density(PixelDensity {
                density: (resolution.horizontal, resolution.vertical),
                unit: PixelDensityUnit::Inches,
            });
        }

        let (width, height) = image.pixels.dimensions();
        encoder
            .write_image(image.pixels.as_raw(), width, height, ExtendedColorType::Rgb8)
            .map_err(|e| BackendError::Encode(e.to_string()))?;

        writer.flush()?;
        Ok(())
    }
}
