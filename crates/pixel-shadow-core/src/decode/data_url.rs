//! Data URL parsing (`data:[<mime>][;base64],<payload>`).

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::DecodeError;

/// The pieces of a parsed data URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    /// Declared mime type; empty when the URL omits it.
    pub mime: String,
    /// Decoded payload bytes.
    pub bytes: Vec<u8>,
}

/// Returns true if the string uses the `data:` scheme.
pub fn is_data_url(url: &str) -> bool {
    url.get(..5)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"))
}

/// Parse a data URL and decode its payload.
///
/// # Errors
///
/// Returns `DecodeError::InvalidUrl` if the scheme or the `,` separator is
/// missing, and `DecodeError::InvalidBase64` if a base64 payload is malformed.
pub fn parse_data_url(url: &str) -> Result<DataUrl, DecodeError> {
    if !is_data_url(url) {
        return Err(DecodeError::InvalidUrl("missing data: scheme".to_string()));
    }

    let rest = &url[5..];
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| DecodeError::InvalidUrl("missing ',' separator".to_string()))?;

    let mut params = header.split(';');
    let mime = params.next().unwrap_or_default().trim().to_string();
    let is_base64 = params.any(|p| p.trim().eq_ignore_ascii_case("base64"));

    let bytes = if is_base64 {
        // Browsers tolerate whitespace inside the payload
        let cleaned: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        STANDARD
            .decode(cleaned.as_bytes())
            .map_err(|e| DecodeError::InvalidBase64(e.to_string()))?
    } else {
        percent_decode(payload)
    };

    Ok(DataUrl { mime, bytes })
}

/// Decode `%XX` escapes; malformed escapes are kept literally.
fn percent_decode(input: &str) -> Vec<u8> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                out.push(hi << 4 | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    out
}

#[inline]
fn hex_value(c: u8) -> Option<u8> {
    (c as char).to_digit(16).map(|d| d as u8)
}
