//! Thin layer over the `image` codecs: decoding plus header-only probes.

use crate::error::DecodeError;
use image::{DynamicImage, ImageReader};
use std::io::Cursor;

/// Decode an encoded image buffer into a raster.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
    let image = image::load_from_memory(bytes)?;
    tracing::debug!(
        width = image.width(),
        height = image.height(),
        color = ?image.color(),
        "Decoded image"
    );
    Ok(image)
}

/// Read the pixel dimensions from the image header without decoding pixels.
pub fn image_dimensions(bytes: &[u8]) -> Result<(u32, u32), DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(image::ImageError::IoError)?;
    Ok(reader.into_dimensions()?)
}

/// MIME type inferred from the leading magic bytes, e.g. `image/png`.
pub fn detect_mime(bytes: &[u8]) -> Option<&'static str> {
    image::guess_format(bytes).ok().map(|format| format.to_mime_type())
}
