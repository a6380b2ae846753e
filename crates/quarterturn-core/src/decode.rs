//! Image decoding from raw bytes.
//!
//! Sources arrive as undifferentiated byte buffers (a file read or an HTTP
//! body), so the format is guessed from the content rather than trusted from
//! the locator. Decoded output is always RGB8.

use std::io::Cursor;

use image::ImageReader;
use thiserror::Error;

use crate::raster::Raster;

/// Errors that can occur while decoding source bytes.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The bytes do not match any supported image format.
    #[error("unrecognized image format")]
    UnrecognizedFormat,

    /// The bytes matched a format but could not be decoded.
    #[error("corrupted image data: {0}")]
    Corrupted(String),
}

/// Decode an image from raw bytes into an RGB8 raster.
///
/// The format is guessed from the content (JPEG and PNG are supported).
///
/// # Errors
///
/// Returns `DecodeError::UnrecognizedFormat` if the bytes are not a known
/// image format, or `DecodeError::Corrupted` if decoding fails partway.
pub fn decode_image(bytes: &[u8]) -> Result<Raster, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::Corrupted(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::UnrecognizedFormat);
    }

    let img = reader
        .decode()
        .map_err(|e| DecodeError::Corrupted(e.to_string()))?;

    Ok(Raster::from_rgb_image(img.into_rgb8()))
}
