//! pixel-shadow WASM - WebAssembly bindings for pixel-shadow
//!
//! This crate exposes the pixel-shadow-core functionality to JavaScript and
//! provides the browser halves of the pipeline: file reading, image loading
//! and pixel extraction.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for pixel data
//! - `load` - `FileReader` based file loading
//! - `decode` - Image loading through `HtmlImageElement`, or in WASM
//! - `extract` - Pixel extraction through an off-screen canvas
//! - `css` - `box-shadow` encoding
//! - `scale` - Scale controller bindings
//! - `app` - Page controller wiring everything to the DOM
//!
//! # Usage
//!
//! ```typescript
//! import init, { App } from '@pixel-shadow/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! // Bind to #file, #output, #plus, #minus and #scale
//! const app = new App(undefined, undefined);
//! ```

use wasm_bindgen::prelude::*;

mod app;
mod css;
mod decode;
mod extract;
mod load;
mod logger;
mod scale;
mod types;

// Re-export public types
pub use app::{file_to_box_shadow, App};
pub use css::{count_shadows, encode_box_shadow, encode_grid};
pub use decode::{decode_data_url, load_image};
pub use extract::extract_pixels;
pub use load::read_file;
pub use scale::JsScaleController;
pub use types::JsPixelGrid;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    logger::init(level);
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
