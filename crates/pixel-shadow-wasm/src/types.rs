//! WASM-compatible wrapper types for pixel data and options.
//!
//! This module provides JavaScript-friendly types that wrap the core
//! pixel-shadow types, handling the conversion between Rust and JavaScript
//! data representations.

use pixel_shadow_core::pixels::PixelGrid;
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// An RGBA pixel grid wrapper for JavaScript.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. When you call `pixels()`, a copy is made
/// to JavaScript memory as a `Uint8Array`.
#[wasm_bindgen]
pub struct JsPixelGrid {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsPixelGrid {
    /// Create a new JsPixelGrid from dimensions and RGBA pixel data.
    ///
    /// # Errors
    /// Fails if `pixels.length != width * height * 4`.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<JsPixelGrid, JsValue> {
        PixelGrid::new(width, height, pixels)
            .map(JsPixelGrid::from_grid)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Get the grid width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the grid height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the number of bytes in the pixel buffer (width * height * 4)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGBA pixel data as Uint8Array (copied).
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }
}

impl JsPixelGrid {
    pub(crate) fn from_grid(grid: PixelGrid) -> Self {
        Self {
            width: grid.width(),
            height: grid.height(),
            pixels: grid.into_data(),
        }
    }

    /// Convert back to a core PixelGrid (clones the pixel data).
    pub(crate) fn to_grid(&self) -> PixelGrid {
        // Dimensions and length were validated when this wrapper was built
        PixelGrid::new(self.width, self.height, self.pixels.clone()).unwrap_or_default()
    }
}

/// Deserialize an options object from JavaScript.
///
/// `undefined` and `null` yield the default options; missing fields take
/// their defaults as well.
pub(crate) fn options_from_js<T>(value: JsValue) -> Result<T, JsValue>
where
    T: DeserializeOwned + Default,
{
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Best-effort text for a thrown JavaScript value.
pub(crate) fn js_error_message(value: &JsValue) -> String {
    if let Some(s) = value.as_string() {
        return s;
    }
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    format!("{:?}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_grid() {
        let grid = PixelGrid::new(3, 2, vec![7u8; 3 * 2 * 4]).unwrap();
        let js_grid = JsPixelGrid::from_grid(grid);
        assert_eq!(js_grid.width(), 3);
        assert_eq!(js_grid.height(), 2);
        assert_eq!(js_grid.byte_length(), 24);
    }

    #[test]
    fn test_to_grid() {
        let js_grid = JsPixelGrid {
            width: 2,
            height: 1,
            pixels: vec![1, 2, 3, 4, 5, 6, 7, 8],
        };
        let grid = js_grid.to_grid();
        assert_eq!(grid.get(1, 0), Some([5, 6, 7, 8]));
        assert_eq!(js_grid.pixels(), grid.into_data());
    }
}
