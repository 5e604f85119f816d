//! Core types for image decoding.

use image::{DynamicImage, ImageFormat};
use thiserror::Error;

/// Error types for image decoding operations.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The URL is neither a well-formed data URL nor a usable path.
    #[error("Invalid image URL: {0}")]
    InvalidUrl(String),

    /// The base64 payload of a data URL could not be decoded.
    #[error("Invalid base64 payload: {0}")]
    InvalidBase64(String),

    /// The file format is not recognized or supported.
    #[error("Invalid or unsupported image format")]
    UnsupportedFormat,

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    /// I/O error while reading the image source.
    #[error("I/O error: {0}")]
    Io(String),
}

/// A fully loaded image, ready for pixel extraction.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    image: DynamicImage,
    format: Option<ImageFormat>,
}

impl DecodedImage {
    /// Wrap an already decoded image.
    pub fn new(image: DynamicImage, format: Option<ImageFormat>) -> Self {
        Self { image, format }
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// The container format the image was decoded from, when known.
    pub fn format(&self) -> Option<ImageFormat> {
        self.format
    }

    /// Borrow the underlying image.
    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// Check if this image has no pixels.
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}
