//! Pixel extraction through an off-screen canvas.

use pixel_shadow_core::decode::DecodeError;
use pixel_shadow_core::pixels::PixelGrid;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::types::{js_error_message, JsPixelGrid};

fn rasterize(image: &HtmlImageElement) -> Result<PixelGrid, JsValue> {
    let width = image.natural_width();
    let height = image.natural_height();

    // getImageData throws on a zero-sized rectangle
    if width == 0 || height == 0 {
        return Ok(PixelGrid::default());
    }

    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let canvas = document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()?;
    canvas.set_width(width);
    canvas.set_height(height);
    let ctx = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into::<CanvasRenderingContext2d>()?;
    ctx.draw_image_with_html_image_element(image, 0.0, 0.0)?;
    let data = ctx.get_image_data(0.0, 0.0, width as f64, height as f64)?;

    PixelGrid::new(width, height, data.data().to_vec())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Rasterize a loaded image into an RGBA grid at its natural size.
pub(crate) fn extract_image_pixels(image: &HtmlImageElement) -> Result<PixelGrid, DecodeError> {
    let grid = rasterize(image).map_err(|e| DecodeError::CorruptedFile(js_error_message(&e)))?;
    log::debug!(
        "extracted {}x{} grid ({} bytes)",
        grid.width(),
        grid.height(),
        grid.byte_len()
    );
    Ok(grid)
}

/// Read the RGBA pixels of a loaded image element.
///
/// # Errors
///
/// Returns an error if no canvas is available or the canvas is tainted by a
/// cross-origin image.
#[wasm_bindgen]
pub fn extract_pixels(image: &HtmlImageElement) -> Result<JsPixelGrid, JsValue> {
    extract_image_pixels(image)
        .map(JsPixelGrid::from_grid)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_extract_unloaded_image_is_empty() {
        let img = HtmlImageElement::new().unwrap();
        let grid = extract_pixels(&img).unwrap();
        assert_eq!(grid.byte_length(), 0);
    }

    #[wasm_bindgen_test]
    async fn test_extract_loaded_image() {
        let url = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";
        let img = crate::decode::load_image(url.to_string()).await.unwrap();
        let grid = extract_pixels(&img).unwrap();
        assert_eq!((grid.width(), grid.height()), (1, 1));
        assert_eq!(grid.byte_length(), 4);
    }
}
