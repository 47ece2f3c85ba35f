//! Image adapter (component C5): a narrow wrapper around the `image` crate.
//!
//! The core never touches codec internals directly — every decode, measure,
//! resize, or encode goes through this module, so swapping the underlying
//! codec crate only ever touches this one file.

use std::io::Cursor;

use image::{GenericImageView, ImageFormat, ImageReader};

use crate::error::{PictDbError, Result};

fn map_image_err(err: image::ImageError) -> PictDbError {
    PictDbError::Image(err.to_string())
}

/// Decodes `buf` as a JPEG and returns `(width, height)` in pixels.
///
/// Always returns width before height — every caller destructures the
/// tuple the same way, so there is no ambiguity about argument order.
pub fn get_dimensions(buf: &[u8]) -> Result<(u32, u32)> {
    let img = ImageReader::new(Cursor::new(buf))
        .with_guessed_format()
        .map_err(PictDbError::Io)?
        .decode()
        .map_err(map_image_err)?;

    Ok(img.dimensions())
}

/// Resizes `buf` to fit within `max_w` x `max_h`, preserving aspect ratio
/// and never upscaling beyond the fit ratio, then re-encodes as JPEG.
pub fn resize_to_fit(buf: &[u8], max_w: u32, max_h: u32) -> Result<Vec<u8>> {
    let img = ImageReader::new(Cursor::new(buf))
        .with_guessed_format()
        .map_err(PictDbError::Io)?
        .decode()
        .map_err(map_image_err)?;

    let (w, h) = img.dimensions();
    let ratio = (max_w as f64 / w as f64).min(max_h as f64 / h as f64).min(1.0);
    let new_w = ((w as f64 * ratio).round() as u32).max(1);
    let new_h = ((h as f64 * ratio).round() as u32).max(1);

    let resized = img.resize_exact(new_w, new_h, image::imageops::FilterType::Lanczos3);

    let mut out = Vec::new();
    resized
        .write_to(&mut Cursor::new(&mut out), ImageFormat::Jpeg)
        .map_err(map_image_err)?;

    Ok(out)
}
