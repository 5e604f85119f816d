//! File loading into one of the four `FileReader`-style encodings.
//!
//! The browser bindings read a `File` through `FileReader`; native callers
//! go through [`read_path`]. Both produce the same [`FileContents`] for the
//! same bytes, so the rest of the pipeline does not care where the file
//! came from.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mime type used when the source does not report one.
pub const DEFAULT_MIME: &str = "application/octet-stream";

/// Errors that can occur while loading a file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The encoding selector is not one of the supported values.
    #[error("Invalid encoding selector: {0:?} (expected DataURL, ArrayBuffer, BinaryString or Text)")]
    InvalidArgument(String),

    /// Reading the file failed.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        LoadError::Io(err.to_string())
    }
}

/// The representation a file is read into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Encoding {
    /// `data:{mime};base64,...`
    #[default]
    #[serde(rename = "DataURL")]
    DataUrl,
    /// Raw bytes.
    ArrayBuffer,
    /// One char per byte, code points 0-255.
    BinaryString,
    /// UTF-8 text.
    Text,
}

impl Encoding {
    /// Selector name, matching the `FileReader.readAs*` suffixes.
    pub fn as_str(self) -> &'static str {
        match self {
            Encoding::DataUrl => "DataURL",
            Encoding::ArrayBuffer => "ArrayBuffer",
            Encoding::BinaryString => "BinaryString",
            Encoding::Text => "Text",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Encoding {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DataURL" => Ok(Encoding::DataUrl),
            "ArrayBuffer" => Ok(Encoding::ArrayBuffer),
            "BinaryString" => Ok(Encoding::BinaryString),
            "Text" => Ok(Encoding::Text),
            other => Err(LoadError::InvalidArgument(other.to_string())),
        }
    }
}

/// File content in the requested encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContents {
    DataUrl(String),
    ArrayBuffer(Vec<u8>),
    BinaryString(String),
    Text(String),
}

impl FileContents {
    /// The encoding this content was produced with.
    pub fn encoding(&self) -> Encoding {
        match self {
            FileContents::DataUrl(_) => Encoding::DataUrl,
            FileContents::ArrayBuffer(_) => Encoding::ArrayBuffer,
            FileContents::BinaryString(_) => Encoding::BinaryString,
            FileContents::Text(_) => Encoding::Text,
        }
    }

    /// Borrow the content as a string, if it is one of the string encodings.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FileContents::DataUrl(s) | FileContents::BinaryString(s) | FileContents::Text(s) => {
                Some(s)
            }
            FileContents::ArrayBuffer(_) => None,
        }
    }
}

/// Convert in-memory file bytes into the requested encoding.
///
/// # Arguments
///
/// * `bytes` - The file content
/// * `mime` - Mime type reported for the file; empty falls back to [`DEFAULT_MIME`]
/// * `encoding` - Target representation
pub fn read_bytes(bytes: &[u8], mime: &str, encoding: Encoding) -> FileContents {
    match encoding {
        Encoding::DataUrl => FileContents::DataUrl(to_data_url(bytes, mime)),
        Encoding::ArrayBuffer => FileContents::ArrayBuffer(bytes.to_vec()),
        Encoding::BinaryString => {
            FileContents::BinaryString(bytes.iter().map(|&b| char::from(b)).collect())
        }
        Encoding::Text => FileContents::Text(String::from_utf8_lossy(bytes).into_owned()),
    }
}

/// Read a file from disk into the requested encoding.
///
/// The mime type for data URLs is guessed from the file extension.
///
/// # Errors
///
/// Returns `LoadError::Io` if the file cannot be read.
pub fn read_path(path: impl AsRef<Path>, encoding: Encoding) -> Result<FileContents, LoadError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    log::debug!("read {} bytes from {}", bytes.len(), path.display());
    Ok(read_bytes(&bytes, mime_from_path(path), encoding))
}

/// Build a base64 data URL for the given bytes.
pub fn to_data_url(bytes: &[u8], mime: &str) -> String {
    let mime = if mime.is_empty() { DEFAULT_MIME } else { mime };
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Guess an image mime type from a file extension.
pub fn mime_from_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",
        Some("tif") | Some("tiff") => "image/tiff",
        _ => DEFAULT_MIME,
    }
}
