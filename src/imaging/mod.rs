//! Image processing in pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` with content sniffing (PNG, JPEG) |
//! | **Resolution** | custom reader (JFIF APP0 + PNG `pHYs`) |
//! | **Resize** | `fast_image_resize` Catmull-Rom over a mirror-padded source |
//! | **Compress** | `image::codecs::jpeg::JpegEncoder` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension and padding math (unit testable)
//! - **Parameters**: Validated [`Quality`] and [`Resolution`] values
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Density**: Byte-level resolution reader

pub mod backend;
mod calculations;
pub mod density;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend, Raster};
pub use calculations::calculate_target_dimensions;
pub use params::{Quality, Resolution};
pub use rust_backend::{Bitmap, RustBackend};
