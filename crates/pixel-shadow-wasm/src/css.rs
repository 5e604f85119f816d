//! `box-shadow` encoding bindings.
//!
//! # Example
//!
//! ```typescript
//! import { encode_box_shadow } from '@pixel-shadow/wasm';
//!
//! const css = encode_box_shadow(grid.pixels(), grid.width, grid.height, {
//!   transparency: 'ZeroAlpha',
//!   alpha: 'Fraction',
//! });
//! output.style.boxShadow = css;
//! ```

use pixel_shadow_core::css::{self, EncodeOptions};
use pixel_shadow_core::pixels::PixelGrid;
use wasm_bindgen::prelude::*;

use crate::types::{options_from_js, JsPixelGrid};

/// Encode RGBA pixel data as a CSS `box-shadow` value.
///
/// # Arguments
///
/// * `pixels` - RGBA pixel data (4 bytes per pixel, row-major order)
/// * `width` - Width in pixels
/// * `height` - Height in pixels
/// * `options` - Optional `{ transparency, alpha }` object
///
/// # Errors
///
/// Returns an error if the pixel data length doesn't match width * height * 4
/// or the options object is malformed.
#[wasm_bindgen]
pub fn encode_box_shadow(
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    options: JsValue,
) -> Result<String, JsValue> {
    let options: EncodeOptions = options_from_js(options)?;
    let grid =
        PixelGrid::new(width, height, pixels).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(css::encode_box_shadow(&grid, &options))
}

/// Encode a JsPixelGrid with default options.
#[wasm_bindgen]
pub fn encode_grid(grid: &JsPixelGrid) -> String {
    css::encode_box_shadow(&grid.to_grid(), &EncodeOptions::default())
}

/// Count the shadows a grid produces under the default transparency rule.
#[wasm_bindgen]
pub fn count_shadows(grid: &JsPixelGrid) -> usize {
    css::shadow_count(&grid.to_grid(), EncodeOptions::default().transparency)
}
