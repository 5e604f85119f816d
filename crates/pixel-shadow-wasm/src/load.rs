//! Browser file loading through `FileReader`.
//!
//! # Example
//!
//! ```typescript
//! import { read_file } from '@pixel-shadow/wasm';
//!
//! const url = await read_file(input.files[0], 'DataURL');
//! ```

use js_sys::{Function, Promise, Uint8Array};
use pixel_shadow_core::load::{Encoding, FileContents, LoadError};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Event, File, FileReader};

use crate::types::js_error_message;

/// Read a file into the raw `FileReader` result for the given encoding.
async fn read_raw(file: &File, encoding: Encoding) -> Result<JsValue, LoadError> {
    let reader = FileReader::new().map_err(|e| LoadError::Io(js_error_message(&e)))?;

    let promise = Promise::new(&mut |resolve: Function, reject: Function| {
        let done = reader.clone();
        let onload = Closure::once_into_js(move |_event: Event| {
            let result = done.result().unwrap_or(JsValue::NULL);
            let _ = resolve.call1(&JsValue::NULL, &result);
        });
        let onerror = Closure::once_into_js(move |_event: Event| {
            let _ = reject.call1(&JsValue::NULL, &JsValue::from_str("file read failed"));
        });
        reader.set_onload(Some(onload.unchecked_ref()));
        reader.set_onerror(Some(onerror.unchecked_ref()));
    });

    let started = match encoding {
        Encoding::DataUrl => reader.read_as_data_url(file),
        Encoding::ArrayBuffer => reader.read_as_array_buffer(file),
        Encoding::BinaryString => reader.read_as_binary_string(file),
        Encoding::Text => reader.read_as_text(file),
    };
    started.map_err(|e| LoadError::Io(js_error_message(&e)))?;

    JsFuture::from(promise)
        .await
        .map_err(|e| LoadError::Io(js_error_message(&e)))
}

/// Read a browser `File` into the requested encoding.
///
/// # Errors
///
/// Returns `LoadError::Io` if the reader fails or yields an unexpected result.
pub(crate) async fn read_file_as(file: &File, encoding: Encoding) -> Result<FileContents, LoadError> {
    let raw = read_raw(file, encoding).await?;
    log::debug!("read {} ({} bytes) as {}", file.name(), file.size(), encoding);

    let unexpected = || LoadError::Io(format!("unexpected FileReader result for {}", encoding));
    match encoding {
        Encoding::DataUrl => raw.as_string().map(FileContents::DataUrl).ok_or_else(unexpected),
        Encoding::BinaryString => raw
            .as_string()
            .map(FileContents::BinaryString)
            .ok_or_else(unexpected),
        Encoding::Text => raw.as_string().map(FileContents::Text).ok_or_else(unexpected),
        Encoding::ArrayBuffer => Ok(FileContents::ArrayBuffer(Uint8Array::new(&raw).to_vec())),
    }
}

/// Read a file as `DataURL`, `ArrayBuffer`, `BinaryString` or `Text`.
///
/// Resolves to a string for the string encodings and to a `Uint8Array` for
/// `ArrayBuffer`.
///
/// # Errors
///
/// Rejects if the encoding selector is not one of the four values above, or
/// if reading fails.
#[wasm_bindgen]
pub async fn read_file(file: File, encoding: String) -> Result<JsValue, JsValue> {
    let encoding: Encoding = encoding
        .parse()
        .map_err(|e: LoadError| JsValue::from_str(&e.to_string()))?;

    let contents = read_file_as(&file, encoding)
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    Ok(match contents {
        FileContents::ArrayBuffer(bytes) => Uint8Array::from(bytes.as_slice()).into(),
        FileContents::DataUrl(s) | FileContents::BinaryString(s) | FileContents::Text(s) => {
            JsValue::from_str(&s)
        }
    })
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use js_sys::Array;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn text_file(contents: &str) -> File {
        let parts = Array::of1(&JsValue::from_str(contents));
        File::new_with_str_sequence(&parts, "note.txt").unwrap()
    }

    #[wasm_bindgen_test]
    async fn test_read_file_text() {
        let value = read_file(text_file("hello"), "Text".to_string()).await.unwrap();
        assert_eq!(value.as_string().as_deref(), Some("hello"));
    }

    #[wasm_bindgen_test]
    async fn test_read_file_array_buffer() {
        let contents = read_file_as(&text_file("ab"), Encoding::ArrayBuffer).await.unwrap();
        assert_eq!(contents, FileContents::ArrayBuffer(vec![b'a', b'b']));
    }

    #[wasm_bindgen_test]
    async fn test_read_file_rejects_bad_selector() {
        let result = read_file(text_file("x"), "Blob".to_string()).await;
        assert!(result.is_err());
    }
}
