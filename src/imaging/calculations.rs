//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use super::backend::Dimensions;

/// Support radius of the Catmull-Rom kernel, in destination pixels.
const CATMULL_ROM_SUPPORT: f64 = 2.0;

/// Calculate the downscaled dimensions for an image wider than `max_width`.
///
/// Returns `None` when no resize is needed (`width <= max_width`). Otherwise
/// the width becomes exactly `max_width` and the height is scaled with
/// truncating integer division, so the aspect ratio is only preserved to
/// the nearest pixel below.
///
/// # Examples
/// ```
/// # use imgcr::imaging::{Dimensions, calculate_target_dimensions};
/// let original = Dimensions { width: 8000, height: 4000 };
/// assert_eq!(
///     calculate_target_dimensions(original, 2000),
///     Some(Dimensions { width: 2000, height: 1000 })
/// );
///
/// // Exactly at the limit: untouched
/// let original = Dimensions { width: 2000, height: 1500 };
/// assert_eq!(calculate_target_dimensions(original, 2000), None);
/// ```
pub fn calculate_target_dimensions(original: Dimensions, max_width: u32) -> Option<Dimensions> {
    if original.width <= max_width {
        return None;
    }

    // u64 so `height * max_width` cannot overflow for large sources
    let height = u64::from(original.height) * u64::from(max_width) / u64::from(original.width);

    // max_width < width, so the scaled height never exceeds the original
    Some(Dimensions {
        width: max_width,
        height: u32::try_from(height).unwrap_or(u32::MAX),
    })
}

/// Number of mirrored source pixels needed on each side of an axis so the
/// resampling kernel never reads past the border.
///
/// When downscaling, the kernel's footprint in source pixels grows with the
/// scale factor. The result is capped at the source length: beyond one full
/// reflection the extra pixels carry negligible weight.
pub fn calculate_mirror_padding(source_len: u32, target_len: u32) -> u32 {
    if source_len == 0 || target_len == 0 {
        return 0;
    }
    let scale = (f64::from(source_len) / f64::from(target_len)).max(1.0);
    let pad = (CATMULL_ROM_SUPPORT * scale).ceil() as u32 + 1;
    pad.min(source_len)
}

/// Map a possibly out-of-range coordinate onto `0..len` by tile-flip
/// reflection: `-1 → 0`, `-2 → 1`, `len → len - 1`, `len + 1 → len - 2`.
pub fn mirror_index(index: i64, len: u32) -> u32 {
    let len = i64::from(len);
    let period = 2 * len;
    let m = index.rem_euclid(period);
    if m < len {
        m as u32
    } else {
        (period - 1 - m) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(width: u32, height: u32) -> Dimensions {
        Dimensions { width, height }
    }

    // =========================================================================
    // calculate_target_dimensions
    // =========================================================================

    #[test]
    fn narrower_than_max_is_untouched() {
        assert_eq!(calculate_target_dimensions(dims(800, 600), 2000), None);
    }

    #[test]
    fn width_equal_to_max_is_untouched() {
        assert_eq!(calculate_target_dimensions(dims(2000, 3000), 2000), None);
    }

    #[test]
    fn one_pixel_over_max_is_resized() {
        assert_eq!(
            calculate_target_dimensions(dims(2001, 1000), 2000),
            Some(dims(2000, 999))
        );
    }

    #[test]
    fn landscape_halves_exactly() {
        assert_eq!(
            calculate_target_dimensions(dims(8000, 4000), 2000),
            Some(dims(2000, 1000))
        );
    }

    #[test]
    fn height_is_truncated_not_rounded() {
        // 999 * 500 / 1000 = 499.5 -> 499
        assert_eq!(
            calculate_target_dimensions(dims(1000, 999), 500),
            Some(dims(500, 499))
        );
    }

    #[test]
    fn portrait_keeps_aspect() {
        assert_eq!(
            calculate_target_dimensions(dims(3000, 4000), 1500),
            Some(dims(1500, 2000))
        );
    }

    #[test]
    fn very_wide_strip_truncates_to_zero_height() {
        // Surfaces as InvalidDimensions at the resizer
        assert_eq!(
            calculate_target_dimensions(dims(10_000, 1), 100),
            Some(dims(100, 0))
        );
    }

    #[test]
    fn large_values_do_not_overflow() {
        assert_eq!(
            calculate_target_dimensions(dims(u32::MAX, u32::MAX), 4096),
            Some(dims(4096, 4096))
        );
    }

    // =========================================================================
    // calculate_mirror_padding
    // =========================================================================

    #[test]
    fn padding_at_unit_scale_covers_kernel() {
        assert_eq!(calculate_mirror_padding(100, 100), 3);
    }

    #[test]
    fn padding_grows_with_downscale() {
        // 4x downscale: ceil(2 * 4) + 1
        assert_eq!(calculate_mirror_padding(8000, 2000), 9);
    }

    #[test]
    fn padding_capped_at_source_length() {
        assert_eq!(calculate_mirror_padding(10, 1), 10);
    }

    #[test]
    fn padding_for_empty_axis_is_zero() {
        assert_eq!(calculate_mirror_padding(0, 10), 0);
        assert_eq!(calculate_mirror_padding(10, 0), 0);
    }

    // =========================================================================
    // mirror_index
    // =========================================================================

    #[test]
    fn mirror_index_in_range_is_identity() {
        for i in 0..5 {
            assert_eq!(mirror_index(i, 5), i as u32);
        }
    }

    #[test]
    fn mirror_index_reflects_including_edge_pixel() {
        assert_eq!(mirror_index(-1, 3), 0);
        assert_eq!(mirror_index(-2, 3), 1);
        assert_eq!(mirror_index(3, 3), 2);
        assert_eq!(mirror_index(4, 3), 1);
    }

    #[test]
    fn mirror_index_wraps_past_one_reflection() {
        // period is 6 for len 3: [0,1,2,2,1,0]
        assert_eq!(mirror_index(6, 3), 0);
        assert_eq!(mirror_index(-7, 3), 0);
    }

    #[test]
    fn mirror_index_single_pixel_axis() {
        assert_eq!(mirror_index(-4, 1), 0);
        assert_eq!(mirror_index(9, 1), 0);
    }
}
