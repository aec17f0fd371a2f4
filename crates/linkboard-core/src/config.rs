//! Editor configuration.

use crate::error::ConfigError;
use kurbo::Vec2;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunable distances, sizes and thresholds used by the diagram and editor.
///
/// Every field has a default, so a partial JSON document is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum distance at which a connector endpoint snaps to an anchor.
    pub snap_distance: f64,
    /// Slack around rectangles and text (and arrow endpoints) for hit testing.
    pub hit_buffer: f64,
    /// Maximum distance from an arrow shaft that still counts as a hit.
    pub arrow_tolerance: f64,
    /// Hit radius of resize handles, connection nodes and endpoint handles.
    pub handle_radius: f64,
    /// Minimum width/height enforced while resizing.
    pub min_size: f64,
    /// Offset applied to duplicated and pasted shapes.
    pub duplicate_offset: Vec2,
    /// Width given to a rectangle or text created by a quick click.
    pub default_width: f64,
    /// Height given to a rectangle or text created by a quick click.
    pub default_height: f64,
    /// Length given to an arrow created by a quick click.
    pub default_arrow_length: f64,
    /// Gestures shorter than this (milliseconds) count as a quick click.
    pub quick_click_ms: u64,
    /// Arrow-head length along the shaft.
    pub arrow_head_length: f64,
    /// Arrow-head half width across the shaft.
    pub arrow_head_width: f64,
    /// Padding around an arrow's render bounding box.
    pub bounds_padding: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            snap_distance: 20.0,
            hit_buffer: 5.0,
            arrow_tolerance: 6.0,
            handle_radius: 8.0,
            min_size: 10.0,
            duplicate_offset: Vec2::new(20.0, 20.0),
            default_width: 100.0,
            default_height: 50.0,
            default_arrow_length: 50.0,
            quick_click_ms: 250,
            arrow_head_length: 10.0,
            arrow_head_width: 6.0,
            bounds_padding: 10.0,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a config from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serialize the config to pretty JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would break hit testing or resizing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let distances = [
            ("snap_distance", self.snap_distance),
            ("hit_buffer", self.hit_buffer),
            ("arrow_tolerance", self.arrow_tolerance),
            ("handle_radius", self.handle_radius),
            ("default_width", self.default_width),
            ("default_height", self.default_height),
            ("default_arrow_length", self.default_arrow_length),
            ("arrow_head_length", self.arrow_head_length),
            ("arrow_head_width", self.arrow_head_width),
            ("bounds_padding", self.bounds_padding),
        ];
        for (name, value) in distances {
            if !value.is_finite() || value < 0.0 {
                log::warn!("Rejecting config: {} = {}", name, value);
                return Err(ConfigError::Invalid(format!(
                    "{} must be a finite non-negative number, got {}",
                    name, value
                )));
            }
        }
        if !self.min_size.is_finite() || self.min_size <= 0.0 {
            log::warn!("Rejecting config: min_size = {}", self.min_size);
            return Err(ConfigError::Invalid(format!(
                "min_size must be positive, got {}",
                self.min_size
            )));
        }
        if !self.duplicate_offset.is_finite() {
            return Err(ConfigError::Invalid(
                "duplicate_offset must be finite".to_string(),
            ));
        }
        Ok(())
    }
}
