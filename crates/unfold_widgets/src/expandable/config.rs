//! Expandable configuration

use serde::{Deserialize, Serialize};
use thiserror::Error;
use unfold_animation::Easing;

/// Errors raised while loading an [`ExpandableConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse expandable config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid height {0}: expected -1 (auto) or a non-negative value")]
    InvalidHeight(f32),

    #[error("{field} must be at least 1ms")]
    ZeroDuration { field: &'static str },
}

/// Expandable configuration
///
/// ```toml
/// height = 120.0
/// expand_duration_ms = 300
/// expand_easing = "cubic_out"
/// rotate_indicator = true
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpandableConfig {
    /// Explicit expanded height of the secondary view; `-1` or `0` sizes to content
    pub height: f32,
    pub expand_duration_ms: u32,
    pub collapse_duration_ms: u32,
    pub expand_easing: Easing,
    pub collapse_easing: Easing,
    /// Whether a tap on the touch handler toggles the expanded state
    pub touch_to_expand: bool,
    /// Rotate the touch handler 180° along with the transition
    pub rotate_indicator: bool,
    /// Scale durations by the fraction of the full height being travelled
    pub proportional_duration: bool,
    /// Measure the secondary view without its vertical padding
    pub subtract_padding: bool,
}

impl Default for ExpandableConfig {
    fn default() -> Self {
        Self {
            height: -1.0,
            expand_duration_ms: 250,
            collapse_duration_ms: 250,
            expand_easing: Easing::Linear,
            collapse_easing: Easing::Linear,
            touch_to_expand: true,
            rotate_indicator: false,
            proportional_duration: true,
            subtract_padding: true,
        }
    }
}

impl ExpandableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.height < 0.0 && self.height != -1.0 {
            return Err(ConfigError::InvalidHeight(self.height));
        }
        if self.expand_duration_ms == 0 {
            return Err(ConfigError::ZeroDuration {
                field: "expand_duration_ms",
            });
        }
        if self.collapse_duration_ms == 0 {
            return Err(ConfigError::ZeroDuration {
                field: "collapse_duration_ms",
            });
        }
        Ok(())
    }

    /// The explicit expanded height, if one is configured
    pub fn configured_height(&self) -> Option<f32> {
        (self.height > 0.0).then_some(self.height)
    }

    /// Set the explicit expanded height
    pub fn height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    pub fn expand_duration(mut self, ms: u32) -> Self {
        self.expand_duration_ms = ms;
        self
    }

    pub fn collapse_duration(mut self, ms: u32) -> Self {
        self.collapse_duration_ms = ms;
        self
    }

    pub fn expand_easing(mut self, easing: Easing) -> Self {
        self.expand_easing = easing;
        self
    }

    pub fn collapse_easing(mut self, easing: Easing) -> Self {
        self.collapse_easing = easing;
        self
    }

    pub fn touch_to_expand(mut self, enabled: bool) -> Self {
        self.touch_to_expand = enabled;
        self
    }

    pub fn rotate_indicator(mut self, enabled: bool) -> Self {
        self.rotate_indicator = enabled;
        self
    }

    pub fn proportional_duration(mut self, enabled: bool) -> Self {
        self.proportional_duration = enabled;
        self
    }

    pub fn subtract_padding(mut self, enabled: bool) -> Self {
        self.subtract_padding = enabled;
        self
    }

    pub(crate) fn duration_ms(&self, expanding: bool) -> u32 {
        if expanding {
            self.expand_duration_ms
        } else {
            self.collapse_duration_ms
        }
    }

    pub(crate) fn easing_for(&self, expanding: bool) -> Easing {
        if expanding {
            self.expand_easing
        } else {
            self.collapse_easing
        }
    }
}
