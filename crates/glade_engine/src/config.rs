//! Engine configuration
//!
//! Small serde-backed configuration surface for the projection constants:
//! clip planes and the default field of view. Parsed from TOML; every field
//! falls back to its default when absent.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration parse errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML text could not be deserialized
    #[error("failed to parse engine configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Perspective projection settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Near clip plane
    pub near: f32,
    /// Far clip plane
    pub far: f32,
    /// Default field of view in degrees
    pub field_of_view: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            near: 1.0,
            far: 2000.0,
            field_of_view: 45.0,
        }
    }
}

/// Orthographic projection settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrthographicConfig {
    /// Near clip plane
    pub near: f32,
    /// Far clip plane
    pub far: f32,
}

impl Default for OrthographicConfig {
    fn default() -> Self {
        Self {
            near: 400.0,
            far: -400.0,
        }
    }
}

/// Top-level engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Perspective projection settings
    pub projection: ProjectionConfig,
    /// Orthographic projection settings
    pub orthographic: OrthographicConfig,
}

impl EngineConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn empty_document_yields_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();

        assert_relative_eq!(config.projection.near, 1.0);
        assert_relative_eq!(config.projection.far, 2000.0);
        assert_relative_eq!(config.projection.field_of_view, 45.0);
        assert_relative_eq!(config.orthographic.near, 400.0);
        assert_relative_eq!(config.orthographic.far, -400.0);
    }

    #[test]
    fn partial_document_overrides_selected_fields() {
        let config = EngineConfig::from_toml_str(
            "[projection]\nnear = 0.1\nfield_of_view = 60.0\n",
        )
        .unwrap();

        assert_relative_eq!(config.projection.near, 0.1);
        assert_relative_eq!(config.projection.far, 2000.0);
        assert_relative_eq!(config.projection.field_of_view, 60.0);
    }

    #[test]
    fn parse_error_is_reported() {
        assert!(matches!(
            EngineConfig::from_toml_str("projection = 3"),
            Err(ConfigError::Parse(_))
        ));
    }
}
