//! Scale controller bindings for pages that do their own DOM wiring.

use pixel_shadow_core::scale::{ScaleAction, ScaleConfig, ScaleState};
use wasm_bindgen::prelude::*;

/// The `+` / `-` scale state machine.
#[wasm_bindgen]
pub struct JsScaleController {
    state: ScaleState,
}

#[wasm_bindgen]
impl JsScaleController {
    /// Restore from a persisted attribute value (`undefined` starts at 1).
    #[wasm_bindgen(constructor)]
    pub fn new(attribute: Option<String>) -> JsScaleController {
        JsScaleController {
            state: ScaleState::from_attribute(attribute.as_deref(), ScaleConfig::default()),
        }
    }

    /// Apply a button press by label. Returns false if the press was rejected
    /// or the label is unknown.
    pub fn press(&mut self, label: &str) -> bool {
        match ScaleAction::from_label(label) {
            Some(action) => self.state.apply(action).is_ok(),
            None => false,
        }
    }

    /// Increase by one step.
    pub fn increase(&mut self) -> bool {
        self.state.apply(ScaleAction::Increase).is_ok()
    }

    /// Decrease by one step. Returns false at the minimum.
    pub fn decrease(&mut self) -> bool {
        self.state.apply(ScaleAction::Decrease).is_ok()
    }

    #[wasm_bindgen(getter)]
    pub fn size(&self) -> f64 {
        self.state.size()
    }

    /// Value to persist in the scale attribute.
    pub fn attribute(&self) -> String {
        self.state.to_attribute()
    }

    /// CSS `transform` value, e.g. `scale(1.2)`.
    pub fn transform(&self) -> String {
        self.state.transform()
    }

    /// Label text, e.g. `1.2x`.
    pub fn label(&self) -> String {
        self.state.label()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_sequence() {
        let mut controller = JsScaleController::new(None);
        assert!(controller.press("+"));
        assert_eq!(controller.size(), 1.2);
        assert_eq!(controller.transform(), "scale(1.2)");

        assert!(!controller.press("?"));
        assert_eq!(controller.size(), 1.2);
    }

    #[test]
    fn test_decrease_rejected_at_minimum() {
        let mut controller = JsScaleController::new(Some("0.6".to_string()));
        assert!(controller.decrease());
        assert_eq!(controller.attribute(), "0.5");
        assert!(!controller.decrease());
        assert_eq!(controller.label(), "0.5x");
    }
}
