//! pixel-shadow core - image to CSS `box-shadow` conversion
//!
//! This crate provides the target-independent half of pixel-shadow: file
//! loading, image decoding, pixel extraction, the `box-shadow` encoder, the
//! display scale state machine and the pipeline that ties them together.
//!
//! # Module Structure
//!
//! - `load` - Reading files into data URL, byte, binary string or text form
//! - `decode` - Decoding images from data URLs, bytes or paths
//! - `pixels` - RGBA pixel grids and extraction from decoded images
//! - `css` - Encoding grids as `box-shadow` values (and parsing them back)
//! - `scale` - The `+` / `-` display scale controller
//! - `view` - Explicit view state rendered by the browser layer
//! - `pipeline` - The full pipeline, run guard and configuration

pub mod css;
pub mod decode;
pub mod load;
pub mod pipeline;
pub mod pixels;
pub mod scale;
pub mod view;

pub use css::{
    encode_box_shadow, parse_box_shadow, shadow_count, shadow_entries, AlphaStyle,
    EncodeOptions, ShadowEntry, TransparencyRule,
};
pub use decode::{decode_bytes, decode_url, DecodeError, DecodedImage};
pub use load::{read_bytes, read_path, Encoding, FileContents, LoadError};
pub use pipeline::{
    failure_message, Pipeline, PipelineConfig, PipelineError, PipelineOutput, RunGuard, RunTicket,
};
pub use pixels::{extract_pixels, GridError, PixelGrid};
pub use scale::{ScaleAction, ScaleConfig, ScaleError, ScaleState};
pub use view::{RenderedView, ViewState};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_by_one_skips_transparent() {
        let grid = PixelGrid::new(2, 1, vec![255, 0, 0, 255, 0, 0, 0, 0]).unwrap();
        assert_eq!(
            encode_box_shadow(&grid, &EncodeOptions::default()),
            "0px 0px 0 rgba(255,0,0,255)"
        );
    }

    #[test]
    fn test_default_configs_agree() {
        let config = PipelineConfig::default();
        let view = ViewState::from_scale_attribute(None, config.scale);
        assert_eq!(view.scale().size(), config.scale.initial);
    }
}
