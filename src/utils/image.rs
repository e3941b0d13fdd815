//! Utility functions for loading images.
//!
//! Formats are detected from the file content rather than the extension,
//! so an upload stored as `leaf.jpg` that is really a PNG still decodes,
//! and a text file renamed to `.png` fails with an image error.

use crate::core::errors::DiagnosisError;
use image::{DynamicImage, ImageReader, RgbImage};
use std::io::Cursor;
use std::path::Path;

/// Where an image to classify comes from.
#[derive(Debug, Clone, Copy)]
pub enum ImageSource<'a> {
    /// A file on disk.
    Path(&'a Path),
    /// An encoded image already in memory.
    Bytes(&'a [u8]),
}

impl<'a> From<&'a Path> for ImageSource<'a> {
    fn from(path: &'a Path) -> Self {
        ImageSource::Path(path)
    }
}

impl<'a> From<&'a [u8]> for ImageSource<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        ImageSource::Bytes(bytes)
    }
}

/// Decodes an image file of any supported format.
///
/// # Errors
///
/// Returns [`DiagnosisError::ImageDecode`] when the file cannot be opened or
/// does not hold a supported raster image.
pub fn load_dynamic_image(path: &Path) -> Result<DynamicImage, DiagnosisError> {
    let reader = ImageReader::open(path)
        .map_err(|e| DiagnosisError::ImageDecode(image::ImageError::IoError(e)))?
        .with_guessed_format()
        .map_err(|e| DiagnosisError::ImageDecode(image::ImageError::IoError(e)))?;
    reader.decode().map_err(DiagnosisError::ImageDecode)
}

/// Decodes an encoded image held in memory.
pub fn decode_image_bytes(bytes: &[u8]) -> Result<DynamicImage, DiagnosisError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DiagnosisError::ImageDecode(image::ImageError::IoError(e)))?;
    reader.decode().map_err(DiagnosisError::ImageDecode)
}

/// Decodes an image from either source.
pub fn decode_source(source: ImageSource<'_>) -> Result<DynamicImage, DiagnosisError> {
    match source {
        ImageSource::Path(path) => load_dynamic_image(path),
        ImageSource::Bytes(bytes) => decode_image_bytes(bytes),
    }
}

/// Loads an image from a file path and converts it to RgbImage.
pub fn load_image(path: &Path) -> Result<RgbImage, DiagnosisError> {
    Ok(load_dynamic_image(path)?.to_rgb8())
}
