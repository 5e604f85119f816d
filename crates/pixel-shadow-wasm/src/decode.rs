//! Image decoding bindings.
//!
//! Two paths are exposed:
//!
//! - [`load_image`] lets the browser decode the image through an
//!   `HtmlImageElement`, which supports every format the browser does.
//! - [`decode_data_url`] decodes in WASM with the core decoder and returns
//!   the RGBA pixels directly, without touching the DOM.
//!
//! # Example
//!
//! ```typescript
//! import { read_file, load_image } from '@pixel-shadow/wasm';
//!
//! const url = await read_file(file, 'DataURL');
//! const img = await load_image(url);
//! console.log(`Loaded ${img.naturalWidth}x${img.naturalHeight}`);
//! ```

use js_sys::{Function, Promise};
use pixel_shadow_core::decode::{self, DecodeError};
use pixel_shadow_core::pixels::extract_pixels;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Event, HtmlImageElement};

use crate::types::{js_error_message, JsPixelGrid};

/// Wait for an image element to finish loading `url`. No timeout is applied.
pub(crate) async fn load_image_element(url: &str) -> Result<HtmlImageElement, DecodeError> {
    let image = HtmlImageElement::new().map_err(|e| DecodeError::CorruptedFile(js_error_message(&e)))?;

    let promise = Promise::new(&mut |resolve: Function, reject: Function| {
        let onload = Closure::once_into_js(move |_event: Event| {
            let _ = resolve.call0(&JsValue::NULL);
        });
        let onerror = Closure::once_into_js(move |_event: Event| {
            let _ = reject.call1(&JsValue::NULL, &JsValue::from_str("image failed to load"));
        });
        image.set_onload(Some(onload.unchecked_ref()));
        image.set_onerror(Some(onerror.unchecked_ref()));
    });

    image.set_src(url);

    JsFuture::from(promise)
        .await
        .map_err(|e| DecodeError::CorruptedFile(js_error_message(&e)))?;

    log::debug!(
        "image loaded: {}x{}",
        image.natural_width(),
        image.natural_height()
    );
    Ok(image)
}

/// Load an image from a URL (including data URLs) and resolve once decoded.
///
/// # Errors
///
/// Rejects if the browser fails to load or decode the image.
#[wasm_bindgen]
pub async fn load_image(url: String) -> Result<HtmlImageElement, JsValue> {
    load_image_element(&url)
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Decode a data URL in WASM and return its RGBA pixels.
///
/// # Errors
///
/// Returns an error if the URL is malformed or the payload is not a
/// supported image.
#[wasm_bindgen]
pub fn decode_data_url(url: &str) -> Result<JsPixelGrid, JsValue> {
    decode::decode_url(url)
        .map(|image| JsPixelGrid::from_grid(extract_pixels(&image)))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    // 1x1 RGBA PNG
    const ONE_PIXEL: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    #[wasm_bindgen_test]
    async fn test_load_image_data_url() {
        let img = load_image(ONE_PIXEL.to_string()).await.unwrap();
        assert_eq!(img.natural_width(), 1);
        assert_eq!(img.natural_height(), 1);
    }

    #[wasm_bindgen_test]
    async fn test_load_image_invalid() {
        let result = load_image("data:image/png;base64,AAAA".to_string()).await;
        assert!(result.is_err());
    }

    #[wasm_bindgen_test]
    fn test_decode_data_url() {
        let grid = decode_data_url(ONE_PIXEL).unwrap();
        assert_eq!(grid.width(), 1);
        assert_eq!(grid.byte_length(), 4);
    }

    #[wasm_bindgen_test]
    fn test_decode_data_url_invalid() {
        assert!(decode_data_url("data:,nope").is_err());
    }
}
