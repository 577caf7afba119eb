//! Minimal pixel-density reader for JPEG and PNG files.
//!
//! Extracts the physical resolution a source image declares so it can be
//! copied into the re-encoded output:
//! - JPEG: JFIF APP0 segment (`units`, `Xdensity`, `Ydensity`)
//! - PNG: `pHYs` chunk (pixels per unit, unit 1 = metre)
//!
//! Dispatch is by magic bytes, not extension. Anything missing, malformed,
//! or expressed as a bare aspect ratio yields `None`.

use super::params::Resolution;

const JPEG_SOI: &[u8] = &[0xFF, 0xD8];
const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";
const JFIF_IDENTIFIER: &[u8] = b"JFIF\0";

const CM_PER_INCH: f64 = 2.54;
const METRES_PER_INCH: f64 = 0.0254;

/// Read the declared resolution from raw file bytes.
pub fn read_resolution(data: &[u8]) -> Option<Resolution> {
    if data.starts_with(JPEG_SOI) {
        read_jfif_density(data)
    } else if data.starts_with(PNG_SIGNATURE) {
        read_png_phys(data)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// JPEG: JFIF APP0
// ---------------------------------------------------------------------------

/// JFIF APP0 layout after the 4-byte marker header:
///   Bytes 0-4:  "JFIF\0"
///   Bytes 5-6:  version
///   Byte 7:     units (0 = aspect ratio only, 1 = dots/inch, 2 = dots/cm)
///   Bytes 8-9:  Xdensity (big-endian u16)
///   Bytes 10-11: Ydensity (big-endian u16)
fn read_jfif_density(data: &[u8]) -> Option<Resolution> {
    let segment = find_jpeg_app0_jfif(data)?;
    if segment.len() < 12 {
        return None;
    }
    let units = segment[7];
    let x = u16::from_be_bytes([segment[8], segment[9]]);
    let y = u16::from_be_bytes([segment[10], segment[11]]);

    match units {
        1 => resolution_from(f64::from(x), f64::from(y)),
        2 => resolution_from(f64::from(x) * CM_PER_INCH, f64::from(y) * CM_PER_INCH),
        _ => None,
    }
}

/// Find the payload of the first APP0 segment carrying the JFIF identifier.
fn find_jpeg_app0_jfif(data: &[u8]) -> Option<&[u8]> {
    let mut pos = JPEG_SOI.len();
    while pos + 4 <= data.len() {
        if data[pos] != 0xFF {
            return None;
        }
        let marker = data[pos + 1];
        // Fill bytes before a marker
        if marker == 0xFF {
            pos += 1;
            continue;
        }
        // SOS (0xDA) means image data starts, stop scanning
        if marker == 0xDA {
            return None;
        }
        // Markers without length field
        if marker == 0x01 || (0xD0..=0xD9).contains(&marker) {
            pos += 2;
            continue;
        }

        let seg_len = u16::from_be_bytes([data[pos + 2], data[pos + 3]]) as usize;
        if seg_len < 2 {
            return None;
        }
        let seg_start = pos + 4;
        let seg_end = (pos + 2 + seg_len).min(data.len());

        if marker == 0xE0 && data[seg_start..seg_end].starts_with(JFIF_IDENTIFIER) {
            return Some(&data[seg_start..seg_end]);
        }
        pos += 2 + seg_len;
    }
    None
}

// ---------------------------------------------------------------------------
// PNG: pHYs chunk
// ---------------------------------------------------------------------------

/// Walk PNG chunks (length, type, data, CRC) until `pHYs` or `IDAT`.
///
/// `pHYs` data: X pixels per unit (u32 BE), Y pixels per unit (u32 BE),
/// unit specifier (0 = unknown/aspect only, 1 = metre). CRCs are not checked.
fn read_png_phys(data: &[u8]) -> Option<Resolution> {
    let mut pos = PNG_SIGNATURE.len();
    while pos + 8 <= data.len() {
        let length =
            u32::from_be_bytes([data[pos], data[pos + 1], data[pos + 2], data[pos + 3]]) as usize;
        let chunk_type = &data[pos + 4..pos + 8];
        let body_start = pos + 8;
        let body_end = body_start.checked_add(length)?;
        if body_end > data.len() {
            return None;
        }

        match chunk_type {
            b"pHYs" if length >= 9 => {
                let body = &data[body_start..body_end];
                let x = u32::from_be_bytes([body[0], body[1], body[2], body[3]]);
                let y = u32::from_be_bytes([body[4], body[5], body[6], body[7]]);
                return match body[8] {
                    1 => resolution_from(
                        f64::from(x) * METRES_PER_INCH,
                        f64::from(y) * METRES_PER_INCH,
                    ),
                    _ => None,
                };
            }
            // pHYs must precede image data
            b"IDAT" | b"IEND" => return None,
            _ => {}
        }

        pos = body_end + 4;
    }
    None
}

/// Round DPI values into a [`Resolution`], rejecting zero or out-of-range
/// densities.
fn resolution_from(horizontal: f64, vertical: f64) -> Option<Resolution> {
    let to_dpi = |v: f64| -> Option<u16> {
        let rounded = v.round();
        if rounded >= 1.0 && rounded <= f64::from(u16::MAX) {
            Some(rounded as u16)
        } else {
            None
        }
    };
    Some(Resolution {
        horizontal: to_dpi(horizontal)?,
        vertical: to_dpi(vertical)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jfif(units: u8, x: u16, y: u16) -> Vec<u8> {
        let mut data = vec![0xFF, 0xD8];
        // APP0, length 16
        data.extend_from_slice(&[0xFF, 0xE0, 0x00, 0x10]);
        data.extend_from_slice(b"JFIF\0");
        data.extend_from_slice(&[0x01, 0x02, units]);
        data.extend_from_slice(&x.to_be_bytes());
        data.extend_from_slice(&y.to_be_bytes());
        data.extend_from_slice(&[0x00, 0x00]); // no thumbnail
        data.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x02]);
        data
    }

    fn png_with_chunks(chunks: &[(&[u8; 4], Vec<u8>)]) -> Vec<u8> {
        let mut data = PNG_SIGNATURE.to_vec();
        for (kind, body) in chunks {
            data.extend_from_slice(&(body.len() as u32).to_be_bytes());
            data.extend_from_slice(*kind);
            data.extend_from_slice(body);
            data.extend_from_slice(&[0, 0, 0, 0]); // CRC, unchecked
        }
        data
    }

    fn phys(x: u32, y: u32, unit: u8) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(&x.to_be_bytes());
        body.extend_from_slice(&y.to_be_bytes());
        body.push(unit);
        body
    }

    #[test]
    fn empty_input_has_no_resolution() {
        assert_eq!(read_resolution(&[]), None);
    }

    #[test]
    fn unknown_format_has_no_resolution() {
        assert_eq!(read_resolution(b"GIF89a......"), None);
    }

    #[test]
    fn jfif_dots_per_inch() {
        assert_eq!(
            read_resolution(&jfif(1, 300, 150)),
            Some(Resolution {
                horizontal: 300,
                vertical: 150
            })
        );
    }

    #[test]
    fn jfif_dots_per_cm_converted() {
        // 118 dots/cm ≈ 299.72 dpi
        assert_eq!(
            read_resolution(&jfif(2, 118, 118)),
            Some(Resolution {
                horizontal: 300,
                vertical: 300
            })
        );
    }

    #[test]
    fn jfif_aspect_only_is_none() {
        assert_eq!(read_resolution(&jfif(0, 1, 1)), None);
    }

    #[test]
    fn jfif_zero_density_is_none() {
        assert_eq!(read_resolution(&jfif(1, 0, 72)), None);
    }

    #[test]
    fn jfif_after_other_segment() {
        let mut data = vec![0xFF, 0xD8];
        // APP1 with 4 bytes of payload
        data.extend_from_slice(&[0xFF, 0xE1, 0x00, 0x06, b'E', b'x', b'i', b'f']);
        data.extend_from_slice(&jfif(1, 72, 72)[2..]);
        assert_eq!(
            read_resolution(&data),
            Some(Resolution {
                horizontal: 72,
                vertical: 72
            })
        );
    }

    #[test]
    fn jpeg_without_app0_is_none() {
        let data = [0xFF, 0xD8, 0xFF, 0xDA, 0x00, 0x02];
        assert_eq!(read_resolution(&data), None);
    }

    #[test]
    fn truncated_jfif_is_none() {
        let data = jfif(1, 300, 300);
        assert_eq!(read_resolution(&data[..12]), None);
    }

    #[test]
    fn png_phys_per_metre_converted() {
        // 3780 px/m ≈ 96.01 dpi
        let data = png_with_chunks(&[
            (b"IHDR", vec![0; 13]),
            (b"pHYs", phys(3780, 11811, 1)),
            (b"IDAT", vec![0; 4]),
        ]);
        assert_eq!(
            read_resolution(&data),
            Some(Resolution {
                horizontal: 96,
                vertical: 300
            })
        );
    }

    #[test]
    fn png_phys_unknown_unit_is_none() {
        let data = png_with_chunks(&[(b"IHDR", vec![0; 13]), (b"pHYs", phys(1, 1, 0))]);
        assert_eq!(read_resolution(&data), None);
    }

    #[test]
    fn png_phys_after_idat_is_ignored() {
        let data = png_with_chunks(&[
            (b"IHDR", vec![0; 13]),
            (b"IDAT", vec![0; 4]),
            (b"pHYs", phys(3780, 3780, 1)),
        ]);
        assert_eq!(read_resolution(&data), None);
    }

    #[test]
    fn png_with_oversized_chunk_length_is_none() {
        let mut data = PNG_SIGNATURE.to_vec();
        data.extend_from_slice(&u32::MAX.to_be_bytes());
        data.extend_from_slice(b"IHDR");
        assert_eq!(read_resolution(&data), None);
    }
}
