//! High-density screenshot downscaling.
//!
//! macOS writes retina screenshots as PNGs whose physical density (the
//! `pHYs` chunk) is a multiple of the 72 DPI base, meaning the logical
//! size is smaller than the raw pixel dimensions. When resizing is
//! enabled, such images are re-rendered pixel-for-pixel at their logical
//! size and re-encoded as lossless PNG. Everything else is left alone.

use std::io::Cursor;

use image::imageops::FilterType;
use image::ImageFormat;

/// 72 DPI expressed in pixels per metre, the PNG `pHYs` unit.
const BASE_PIXELS_PER_METER: f64 = 2834.65;

/// PNG signature bytes.
const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Downscale a high-density image to its logical size.
///
/// Returns `Some(png_bytes)` only when a downscale was actually performed.
/// Returns `None` when resizing is disabled, the image is already at its
/// logical size, the density is unknown, or decoding/encoding fails; in
/// every `None` case the caller keeps the original bytes. Failures here
/// are best effort by design and are never surfaced to the user.
pub fn downscale_high_density(bytes: &[u8], enabled: bool) -> Option<Vec<u8>> {
    if !enabled {
        return None;
    }

    let factor = density_scale_factor(bytes)?;
    if factor < 2 {
        tracing::debug!("resize skipped: image is not high-density");
        return None;
    }

    let img = match image::load_from_memory(bytes) {
        Ok(img) => img,
        Err(err) => {
            tracing::debug!(%err, "resize skipped: unable to decode image");
            return None;
        }
    };

    let (width, height) = (img.width() / factor, img.height() / factor);
    if width == 0 || height == 0 {
        return None;
    }

    let resized = img.resize_exact(width, height, FilterType::Lanczos3);
    let mut buf = Vec::new();
    match resized.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png) {
        Ok(()) => Some(buf),
        Err(err) => {
            tracing::debug!(%err, "resize skipped: unable to re-encode image");
            None
        }
    }
}

/// Integer scale between physical and logical pixel size, from the `pHYs`
/// density. `None` when the image is not a PNG or carries no density.
fn density_scale_factor(bytes: &[u8]) -> Option<u32> {
    let ppm = png_pixels_per_meter(bytes)?;
    let factor = (f64::from(ppm) / BASE_PIXELS_PER_METER).round();
    if factor.is_finite() && factor >= 1.0 {
        Some(factor as u32)
    } else {
        None
    }
}

/// Read the horizontal pixels-per-metre from a PNG `pHYs` chunk.
///
/// Walks the chunk list up to the first `IDAT`; `pHYs` must precede the
/// image data per the PNG spec. Only the "per metre" unit (1) counts.
fn png_pixels_per_meter(bytes: &[u8]) -> Option<u32> {
    if bytes.len() < PNG_SIGNATURE.len() || bytes[..8] != PNG_SIGNATURE {
        return None;
    }

    let mut offset = PNG_SIGNATURE.len();
    // Each chunk: 4-byte length, 4-byte type, data, 4-byte CRC.
    while offset + 8 <= bytes.len() {
        let length = u32::from_be_bytes(bytes[offset..offset + 4].try_into().ok()?) as usize;
        let chunk_type = &bytes[offset + 4..offset + 8];
        let data_start = offset + 8;
        let data_end = data_start.checked_add(length)?;
        if data_end + 4 > bytes.len() {
            return None;
        }

        match chunk_type {
            b"pHYs" if length == 9 => {
                let data = &bytes[data_start..data_end];
                let ppm_x = u32::from_be_bytes(data[0..4].try_into().ok()?);
                let unit = data[8];
                return if unit == 1 { Some(ppm_x) } else { None };
            }
            b"IDAT" | b"IEND" => return None,
            _ => {}
        }

        offset = data_end + 4;
    }
    None
}
