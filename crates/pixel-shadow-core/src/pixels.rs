//! RGBA pixel grids and pixel extraction from decoded images.

use thiserror::Error;

use crate::decode::DecodedImage;

/// Bytes per RGBA pixel.
pub const CHANNELS: usize = 4;

/// Errors for pixel grid construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    /// Pixel data length doesn't match width * height * 4.
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
}

/// A width x height grid of RGBA pixels, row-major, origin top-left.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelGrid {
    /// Create a grid from raw RGBA bytes.
    ///
    /// # Errors
    ///
    /// Returns `GridError::SizeMismatch` if `data.len() != width * height * 4`.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, GridError> {
        let expected = (width as usize) * (height as usize) * CHANNELS;
        if data.len() != expected {
            return Err(GridError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Create a grid from an `image::RgbaImage`.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the grid, returning its raw RGBA bytes.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Size of the pixel buffer in bytes.
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.data.len() / CHANNELS
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// RGBA value at `(x, y)`, or `None` if out of bounds.
    pub fn get(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + x as usize) * CHANNELS;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Iterate `(x, y, [r, g, b, a])` in row-major order (x fastest).
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, [u8; 4])> + '_ {
        let width = self.width.max(1) as usize;
        self.data
            .chunks_exact(CHANNELS)
            .enumerate()
            .map(move |(index, px)| {
                let x = (index % width) as u32;
                let y = (index / width) as u32;
                (x, y, [px[0], px[1], px[2], px[3]])
            })
    }
}

/// Rasterize a decoded image into an RGBA grid at its native size.
///
/// A zero-size image yields an empty grid.
pub fn extract_pixels(image: &DecodedImage) -> PixelGrid {
    PixelGrid::from_rgba_image(image.image().to_rgba8())
}
