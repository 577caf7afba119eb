//! Parameter types for image operations.
//!
//! - [`Quality`]: JPEG encoding quality, validated to 0-100 on construction.
//! - [`Resolution`]: physical pixel density (DPI) carried from source to output.

use std::fmt;

/// Quality setting for JPEG encoding (0-100).
///
/// Construction is fallible: out-of-range values are a configuration error,
/// never silently clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Quality(u8);

impl Quality {
    pub const MAX: u32 = 100;

    pub fn new(value: u32) -> Option<Self> {
        if value <= Self::MAX {
            Some(Self(value as u8))
        } else {
            None
        }
    }

    pub fn value(self) -> u32 {
        u32::from(self.0)
    }

    /// Value handed to the JPEG encoder, whose scale starts at 1.
    pub(crate) fn encoder_value(self) -> u8 {
        self.0.max(1)
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Horizontal and vertical pixel density in dots per inch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub horizontal: u16,
    pub vertical: u16,
}
