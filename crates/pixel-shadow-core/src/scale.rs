//! Display scale state machine driven by the `+` / `-` buttons.
//!
//! The scale starts at 1, moves in steps of 0.2 rounded to two decimals and
//! never drops below 0.5. A decrease that would overshoot the minimum lands
//! on it; a decrease while already at the minimum is rejected.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors for scale transitions.
#[derive(Debug, Error, PartialEq)]
pub enum ScaleError {
    /// The scale is already at its minimum.
    #[error("Scale {current} is already at the minimum of {min}")]
    AtMinimum { current: f64, min: f64 },
}

/// A button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScaleAction {
    Increase,
    Decrease,
}

impl ScaleAction {
    /// Map a button label (`"+"` / `"-"`) to an action.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "+" => Some(ScaleAction::Increase),
            "-" => Some(ScaleAction::Decrease),
            _ => None,
        }
    }
}

/// Limits and step for the scale controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleConfig {
    /// Scale used when no value has been persisted yet (1.0)
    pub initial: f64,
    /// Smallest allowed scale (0.5)
    pub min: f64,
    /// Amount added or removed per button press (0.2)
    pub step: f64,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            initial: 1.0,
            min: 0.5,
            step: 0.2,
        }
    }
}

/// Current display scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleState {
    size: f64,
    config: ScaleConfig,
}

impl Default for ScaleState {
    fn default() -> Self {
        Self::new(ScaleConfig::default())
    }
}

impl ScaleState {
    /// Create a state at the configured initial scale.
    pub fn new(config: ScaleConfig) -> Self {
        Self {
            size: round2(config.initial.max(config.min)),
            config,
        }
    }

    /// Restore a state from a persisted attribute value.
    ///
    /// Missing, unparsable or non-positive values fall back to the initial scale.
    pub fn from_attribute(value: Option<&str>, config: ScaleConfig) -> Self {
        let mut state = Self::new(config);
        if let Some(size) = value
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v > 0.0)
        {
            state.size = round2(size.max(config.min));
        }
        state
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn config(&self) -> &ScaleConfig {
        &self.config
    }

    /// Apply a button press, returning the new size.
    ///
    /// # Errors
    ///
    /// Returns `ScaleError::AtMinimum` for a decrease at the minimum; the
    /// state is left unchanged.
    pub fn apply(&mut self, action: ScaleAction) -> Result<f64, ScaleError> {
        let next = match action {
            ScaleAction::Increase => round2(self.size + self.config.step),
            ScaleAction::Decrease => round2(self.size - self.config.step),
        };

        if next < self.config.min {
            if self.size <= self.config.min {
                log::warn!("scale decrease rejected at {}", self.size);
                return Err(ScaleError::AtMinimum {
                    current: self.size,
                    min: self.config.min,
                });
            }
            self.size = self.config.min;
        } else {
            self.size = next;
        }

        Ok(self.size)
    }

    /// Value persisted in the scale attribute.
    pub fn to_attribute(&self) -> String {
        self.size.to_string()
    }

    /// CSS `transform` value for the output element.
    pub fn transform(&self) -> String {
        format!("scale({})", self.size)
    }

    /// Text for the scale label.
    pub fn label(&self) -> String {
        format!("{}x", self.size)
    }
}

#[inline]
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn action_strategy() -> impl Strategy<Value = ScaleAction> {
        prop_oneof![Just(ScaleAction::Increase), Just(ScaleAction::Decrease)]
    }

    proptest! {
        /// Property: no sequence of presses takes the scale below the minimum
        /// or off the two-decimal grid.
        #[test]
        fn prop_scale_stays_valid(actions in prop::collection::vec(action_strategy(), 0..60)) {
            let mut state = ScaleState::default();
            for action in actions {
                let _ = state.apply(action);
                prop_assert!(state.size() >= 0.5);
                prop_assert_eq!(round2(state.size()), state.size());
            }
        }
    }
}
