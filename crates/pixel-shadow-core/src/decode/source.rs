//! Image decoding from bytes, data URLs and file paths.

use std::io::Cursor;
use std::path::Path;

use image::ImageReader;

use super::data_url::{is_data_url, parse_data_url};
use super::{DecodeError, DecodedImage};

/// Decode an image from bytes, guessing the format from the content.
///
/// # Errors
///
/// Returns `DecodeError::UnsupportedFormat` if no decoder recognizes the bytes,
/// and `DecodeError::CorruptedFile` if decoding fails part way.
pub fn decode_bytes(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let format = reader.format().ok_or(DecodeError::UnsupportedFormat)?;

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    log::debug!(
        "decoded {:?} image {}x{}",
        format,
        img.width(),
        img.height()
    );
    Ok(DecodedImage::new(img, Some(format)))
}

/// Decode an image from a URL-like string.
///
/// Accepts `data:` URLs, `file://` URLs and plain filesystem paths.
///
/// # Errors
///
/// Returns `DecodeError::InvalidUrl` for other schemes or malformed data URLs,
/// `DecodeError::Io` when a path cannot be read, and the errors of
/// [`decode_bytes`] for the payload itself.
pub fn decode_url(url: &str) -> Result<DecodedImage, DecodeError> {
    if is_data_url(url) {
        let data = parse_data_url(url)?;
        return decode_bytes(&data.bytes);
    }

    let path = match url.strip_prefix("file://") {
        Some(path) => path,
        None if url.contains("://") => {
            return Err(DecodeError::InvalidUrl(format!(
                "unsupported scheme in {:?}",
                url
            )))
        }
        None => url,
    };

    if path.is_empty() {
        return Err(DecodeError::InvalidUrl("empty path".to_string()));
    }

    let bytes = std::fs::read(Path::new(path)).map_err(|e| DecodeError::Io(e.to_string()))?;
    decode_bytes(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::to_data_url;
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

    fn png_bytes(img: RgbaImage) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut buffer, ImageFormat::Png)
            .unwrap();
        buffer.into_inner()
    }

    fn two_pixel_png() -> Vec<u8> {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([0, 0, 0, 0]));
        png_bytes(img)
    }

    #[test]
    fn test_decode_bytes_png() {
        let decoded = decode_bytes(&two_pixel_png()).unwrap();
        assert_eq!(decoded.width(), 2);
        assert_eq!(decoded.height(), 1);
        assert_eq!(decoded.format(), Some(ImageFormat::Png));
    }

    #[test]
    fn test_decode_bytes_garbage() {
        let result = decode_bytes(&[0x00, 0x01, 0x02, 0x03]);
        assert!(matches!(result, Err(DecodeError::UnsupportedFormat)));
    }

    #[test]
    fn test_decode_bytes_empty() {
        assert!(decode_bytes(&[]).is_err());
    }

    #[test]
    fn test_decode_bytes_truncated_png() {
        let bytes = two_pixel_png();
        let result = decode_bytes(&bytes[..bytes.len() / 2]);
        assert!(matches!(result, Err(DecodeError::CorruptedFile(_))));
    }

    #[test]
    fn test_decode_url_data_url() {
        let url = to_data_url(&two_pixel_png(), "image/png");
        let decoded = decode_url(&url).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (2, 1));
    }

    #[test]
    fn test_decode_url_data_url_not_an_image() {
        let url = to_data_url(b"hello", "text/plain");
        assert!(decode_url(&url).is_err());
    }

    #[test]
    fn test_decode_url_path() {
        let path = std::env::temp_dir().join("pixel_shadow_decode_test.png");
        std::fs::write(&path, two_pixel_png()).unwrap();

        let plain = decode_url(path.to_str().unwrap()).unwrap();
        assert_eq!(plain.width(), 2);

        let file_url = format!("file://{}", path.display());
        let via_scheme = decode_url(&file_url).unwrap();
        assert_eq!(via_scheme.width(), 2);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_decode_url_missing_file() {
        let result = decode_url("/definitely/not/here.png");
        assert!(matches!(result, Err(DecodeError::Io(_))));
    }

    #[test]
    fn test_decode_url_rejects_remote_scheme() {
        let result = decode_url("https://example.com/a.png");
        assert!(matches!(result, Err(DecodeError::InvalidUrl(_))));
    }

    #[test]
    fn test_decode_url_empty() {
        assert!(matches!(decode_url(""), Err(DecodeError::InvalidUrl(_))));
    }
}
