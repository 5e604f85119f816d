//! Image decoding for pixel-shadow.
//!
//! This module provides functionality for:
//! - Parsing `data:` URLs produced by the file loader
//! - Decoding PNG, JPEG, GIF, BMP, WebP, ICO and TIFF images
//! - Loading images from plain paths or `file://` URLs
//!
//! # Architecture
//!
//! In the browser the decode step is handled by an `HtmlImageElement` (see the
//! wasm crate); this module is the target-independent counterpart used by
//! native callers and tests. All operations are synchronous.
//!
//! # Examples
//!
//! ```ignore
//! use pixel_shadow_core::decode::decode_url;
//!
//! let image = decode_url("data:image/png;base64,...").unwrap();
//! println!("Decoded {}x{} image", image.width(), image.height());
//! ```

mod data_url;
mod source;
mod types;

pub use source::{decode_bytes, decode_url};
pub use data_url::{is_data_url, parse_data_url, DataUrl};
pub use types::{DecodeError, DecodedImage};
