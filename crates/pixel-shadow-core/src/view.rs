//! Explicit view state for the page.
//!
//! The DOM layer never reads state back from the page; it mutates a
//! [`ViewState`] and writes whatever [`ViewState::render`] returns.

use serde::Serialize;

use crate::scale::{ScaleAction, ScaleConfig, ScaleError, ScaleState};

/// Everything the page shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    box_shadow: String,
    scale: ScaleState,
}

/// The values the DOM layer writes for one render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedView {
    /// `box-shadow` for the output element
    pub box_shadow: String,
    /// `transform` for the output element
    pub transform: String,
    /// Text for the scale label
    pub label: String,
    /// Value for the persisted scale attribute
    pub scale_attribute: String,
}

impl ViewState {
    pub fn new(scale: ScaleState) -> Self {
        Self {
            box_shadow: String::new(),
            scale,
        }
    }

    /// Build a view state from a persisted scale attribute.
    pub fn from_scale_attribute(value: Option<&str>, config: ScaleConfig) -> Self {
        Self::new(ScaleState::from_attribute(value, config))
    }

    pub fn box_shadow(&self) -> &str {
        &self.box_shadow
    }

    pub fn scale(&self) -> &ScaleState {
        &self.scale
    }

    /// Replace the rendered image.
    pub fn set_box_shadow(&mut self, css: String) {
        self.box_shadow = css;
    }

    /// Apply a scale button press. A rejected press leaves the view untouched.
    pub fn apply_scale(&mut self, action: ScaleAction) -> Result<f64, ScaleError> {
        self.scale.apply(action)
    }

    pub fn render(&self) -> RenderedView {
        RenderedView {
            box_shadow: self.box_shadow.clone(),
            transform: self.scale.transform(),
            label: self.scale.label(),
            scale_attribute: self.scale.to_attribute(),
        }
    }
}
