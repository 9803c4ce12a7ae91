//! Engine configuration.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Tunable constants of the geometry and transform engine.
///
/// All distances are in viewbox units (the 0–100 space).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Maximum distance for endpoint/edge snapping.
    pub snap_threshold: f64,
    /// Minimum width and height an element can be resized to.
    pub min_size: f64,
    /// Line height as a multiple of font size.
    pub line_height: f64,
    /// Subdivision steps when sampling curved lines for hit-testing.
    pub bezier_steps: usize,
    /// Rotation snap increment in degrees.
    pub rotation_snap_increment: f64,
    /// Default hit-test tolerance.
    pub hit_tolerance: f64,
    /// Distance from the top edge to the rotation handle.
    pub rotate_handle_offset: f64,
    /// Hit radius of resize and rotation handles.
    pub handle_hit_radius: f64,
    /// Offset applied to duplicated elements.
    pub duplicate_offset: f64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            snap_threshold: 1.5,
            min_size: 1.0,
            line_height: 1.2,
            bezier_steps: 20,
            rotation_snap_increment: 15.0,
            hit_tolerance: 0.5,
            rotate_handle_offset: 3.0,
            handle_hit_radius: 1.0,
            duplicate_offset: 2.0,
        }
    }
}

impl GeometryConfig {
    /// Load a configuration from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the engine divide by zero or never snap.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("min_size", self.min_size),
            ("line_height", self.line_height),
            ("rotation_snap_increment", self.rotation_snap_increment),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidValue { field, value });
            }
        }
        let non_negative = [
            ("snap_threshold", self.snap_threshold),
            ("hit_tolerance", self.hit_tolerance),
            ("rotate_handle_offset", self.rotate_handle_offset),
            ("handle_hit_radius", self.handle_hit_radius),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::InvalidValue { field, value });
            }
        }
        if self.bezier_steps == 0 {
            return Err(ConfigError::InvalidValue {
                field: "bezier_steps",
                value: 0.0,
            });
        }
        Ok(())
    }
}
