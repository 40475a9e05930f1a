//! Display configuration
//!
//! Pinout, resolution and buffering are the whole configuration surface.
//! The text console only uses the pinout.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{Pinout, Resolution};
use crate::error::Result;

/// Display configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// HSTX pin assignment
    pub pinout: Pinout,
    /// Pixel resolution for pixel surfaces
    pub resolution: Resolution,
    /// Whether `swap` exchanges buffers or does nothing
    pub double_buffered: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            pinout: Pinout::default(),
            resolution: Resolution::default(),
            double_buffered: false,
        }
    }
}

impl DisplayConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Save configuration as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_config_default() {
        let config = DisplayConfig::default();
        assert_eq!(config.pinout.pins(), [12, 14, 16, 18]);
        assert_eq!(config.resolution, Resolution::R640x360);
        assert!(!config.double_buffered);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = DisplayConfig::from_json(r#"{"resolution": "320x240"}"#).unwrap();
        assert_eq!(config.resolution, Resolution::R320x240);
        assert_eq!(config.pinout, Pinout::default());
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            DisplayConfig::from_json(r#"{"resolution": "1x1"}"#),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("display.json");
        let config = DisplayConfig {
            pinout: Pinout::new(13, 15, 17, 19),
            resolution: Resolution::R400x300,
            double_buffered: true,
        };
        config.save(&path).unwrap();
        assert_eq!(DisplayConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            DisplayConfig::load(&dir.path().join("missing.json")),
            Err(Error::Io(_))
        ));
    }
}
