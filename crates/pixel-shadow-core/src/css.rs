//! Pixel grid to CSS `box-shadow` encoding.
//!
//! Every visible pixel becomes one zero-blur shadow offset by its
//! coordinates, so an element with a 1px box renders the whole image:
//!
//! ```text
//! 0px 0px 0 rgba(255,0,0,255),
//! 1px 0px 0 rgba(0,128,0,255)
//! ```
//!
//! Entries are emitted in row-major scan order and joined with `",\n"`.

use std::fmt::Write;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pixels::PixelGrid;

/// Separator between shadow entries.
pub const ENTRY_SEPARATOR: &str = ",\n";

/// Which pixels are left out of the shadow list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TransparencyRule {
    /// Skip any pixel with alpha 0, whatever its color channels hold.
    #[default]
    ZeroAlpha,
    /// Skip only pixels that are exactly `(0, 0, 0, 0)`.
    AllChannelsZero,
}

impl TransparencyRule {
    /// Returns true if the pixel is omitted under this rule.
    #[inline]
    pub fn skips(self, [r, g, b, a]: [u8; 4]) -> bool {
        match self {
            TransparencyRule::ZeroAlpha => a == 0,
            TransparencyRule::AllChannelsZero => r == 0 && g == 0 && b == 0 && a == 0,
        }
    }
}

/// How the alpha channel is written inside `rgba(...)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AlphaStyle {
    /// Raw byte value, 0-255. Browsers clamp anything above 1 to fully opaque.
    #[default]
    Byte,
    /// Normalized to 0-1 with at most three decimals.
    Fraction,
}

/// Options for [`encode_box_shadow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeOptions {
    pub transparency: TransparencyRule,
    pub alpha: AlphaStyle,
}

/// One `box-shadow` entry: a single pixel at `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShadowEntry {
    pub x: u32,
    pub y: u32,
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl ShadowEntry {
    fn write_css(&self, out: &mut String, alpha: AlphaStyle) {
        // Writing to a String cannot fail
        let _ = write!(
            out,
            "{}px {}px 0 rgba({},{},{},",
            self.x, self.y, self.r, self.g, self.b
        );
        match alpha {
            AlphaStyle::Byte => {
                let _ = write!(out, "{})", self.a);
            }
            AlphaStyle::Fraction => {
                out.push_str(&format_fraction(self.a));
                out.push(')');
            }
        }
    }
}

/// Errors from [`parse_box_shadow`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// An entry does not match `{x}px {y}px 0 rgba({r},{g},{b},{a})`.
    #[error("Invalid shadow entry at index {index}: {entry:?}")]
    InvalidEntry { index: usize, entry: String },
}

/// Iterate the shadow entries of a grid in row-major order.
pub fn shadow_entries(
    grid: &PixelGrid,
    rule: TransparencyRule,
) -> impl Iterator<Item = ShadowEntry> + '_ {
    grid.iter()
        .filter(move |&(_, _, px)| !rule.skips(px))
        .map(|(x, y, [r, g, b, a])| ShadowEntry { x, y, r, g, b, a })
}

/// Number of entries [`encode_box_shadow`] would emit.
pub fn shadow_count(grid: &PixelGrid, rule: TransparencyRule) -> usize {
    grid.data()
        .chunks_exact(4)
        .filter(|px| !rule.skips([px[0], px[1], px[2], px[3]]))
        .count()
}

/// Encode a pixel grid as a CSS `box-shadow` value.
///
/// Returns an empty string if the grid is empty or every pixel is skipped.
///
/// # Example
///
/// ```ignore
/// let grid = PixelGrid::new(2, 1, vec![255, 0, 0, 255, 0, 0, 0, 0]).unwrap();
/// assert_eq!(
///     encode_box_shadow(&grid, &EncodeOptions::default()),
///     "0px 0px 0 rgba(255,0,0,255)"
/// );
/// ```
pub fn encode_box_shadow(grid: &PixelGrid, options: &EncodeOptions) -> String {
    // ~30 bytes per entry is typical for opaque pixels
    let mut out = String::with_capacity(grid.pixel_count() * 30);

    for (i, entry) in shadow_entries(grid, options.transparency).enumerate() {
        if i > 0 {
            out.push_str(ENTRY_SEPARATOR);
        }
        entry.write_css(&mut out, options.alpha);
    }

    out
}

fn entry_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d+)px (\d+)px 0 rgba\((\d+),(\d+),(\d+),(\d+)\)$")
            .expect("shadow entry regex is valid")
    })
}

/// Parse a `box-shadow` value produced with [`AlphaStyle::Byte`] back into entries.
///
/// # Errors
///
/// Returns `ParseError::InvalidEntry` for the first entry that does not match
/// the encoder's format or whose channels exceed 255.
pub fn parse_box_shadow(css: &str) -> Result<Vec<ShadowEntry>, ParseError> {
    if css.is_empty() {
        return Ok(Vec::new());
    }

    css.split(ENTRY_SEPARATOR)
        .enumerate()
        .map(|(index, entry)| {
            parse_entry(entry).ok_or_else(|| ParseError::InvalidEntry {
                index,
                entry: entry.to_string(),
            })
        })
        .collect()
}

fn parse_entry(entry: &str) -> Option<ShadowEntry> {
    let caps = entry_regex().captures(entry)?;
    Some(ShadowEntry {
        x: caps[1].parse().ok()?,
        y: caps[2].parse().ok()?,
        r: caps[3].parse().ok()?,
        g: caps[4].parse().ok()?,
        b: caps[5].parse().ok()?,
        a: caps[6].parse().ok()?,
    })
}

fn format_fraction(a: u8) -> String {
    let s = format!("{:.3}", a as f32 / 255.0);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(width: u32, height: u32, pixels: &[[u8; 4]]) -> PixelGrid {
        PixelGrid::new(width, height, pixels.concat()).unwrap()
    }

    #[test]
    fn test_encode_skips_transparent_pixel() {
        let g = grid(2, 1, &[[255, 0, 0, 255], [0, 0, 0, 0]]);
        assert_eq!(
            encode_box_shadow(&g, &EncodeOptions::default()),
            "0px 0px 0 rgba(255,0,0,255)"
        );
    }

    #[test]
    fn test_encode_empty_grid() {
        let g = PixelGrid::default();
        assert_eq!(encode_box_shadow(&g, &EncodeOptions::default()), "");
    }

    #[test]
    fn test_encode_all_transparent() {
        let g = grid(2, 2, &[[0, 0, 0, 0]; 4]);
        assert_eq!(encode_box_shadow(&g, &EncodeOptions::default()), "");
    }

    #[test]
    fn test_encode_order_and_separator() {
        let g = grid(
            2,
            2,
            &[[1, 1, 1, 255], [2, 2, 2, 255], [3, 3, 3, 255], [4, 4, 4, 128]],
        );
        let css = encode_box_shadow(&g, &EncodeOptions::default());
        assert_eq!(
            css,
            "0px 0px 0 rgba(1,1,1,255),\n\
             1px 0px 0 rgba(2,2,2,255),\n\
             0px 1px 0 rgba(3,3,3,255),\n\
             1px 1px 0 rgba(4,4,4,128)"
        );
    }

    #[test]
    fn test_transparency_rules_differ_on_colored_zero_alpha() {
        let g = grid(2, 1, &[[9, 9, 9, 0], [0, 0, 0, 7]]);

        assert_eq!(shadow_count(&g, TransparencyRule::ZeroAlpha), 1);
        assert_eq!(shadow_count(&g, TransparencyRule::AllChannelsZero), 2);

        let literal = EncodeOptions {
            transparency: TransparencyRule::AllChannelsZero,
            ..Default::default()
        };
        assert_eq!(
            encode_box_shadow(&g, &literal),
            "0px 0px 0 rgba(9,9,9,0),\n1px 0px 0 rgba(0,0,0,7)"
        );
        assert_eq!(
            encode_box_shadow(&g, &EncodeOptions::default()),
            "1px 0px 0 rgba(0,0,0,7)"
        );
    }

    #[test]
    fn test_encode_fraction_alpha() {
        let g = grid(3, 1, &[[1, 2, 3, 255], [1, 2, 3, 128], [1, 2, 3, 1]]);
        let options = EncodeOptions {
            alpha: AlphaStyle::Fraction,
            ..Default::default()
        };
        assert_eq!(
            encode_box_shadow(&g, &options),
            "0px 0px 0 rgba(1,2,3,1),\n\
             1px 0px 0 rgba(1,2,3,0.502),\n\
             2px 0px 0 rgba(1,2,3,0.004)"
        );
    }

    #[test]
    fn test_parse_round_trip() {
        let g = grid(2, 1, &[[255, 0, 0, 255], [0, 10, 20, 30]]);
        let css = encode_box_shadow(&g, &EncodeOptions::default());
        let entries = parse_box_shadow(&css).unwrap();
        assert_eq!(
            entries,
            vec![
                ShadowEntry { x: 0, y: 0, r: 255, g: 0, b: 0, a: 255 },
                ShadowEntry { x: 1, y: 0, r: 0, g: 10, b: 20, a: 30 },
            ]
        );
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(parse_box_shadow("").unwrap(), vec![]);
    }

    #[test]
    fn test_parse_invalid_entry() {
        let err = parse_box_shadow("0px 0px 0 rgba(1,2,3,4),\n1px 0 red").unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidEntry {
                index: 1,
                entry: "1px 0 red".to_string()
            }
        );
    }

    #[test]
    fn test_parse_channel_overflow() {
        assert!(parse_box_shadow("0px 0px 0 rgba(256,0,0,1)").is_err());
    }

    #[test]
    fn test_format_fraction() {
        assert_eq!(format_fraction(0), "0");
        assert_eq!(format_fraction(255), "1");
        assert_eq!(format_fraction(51), "0.2");
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
