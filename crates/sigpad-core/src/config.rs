//! Pad configuration.

use crate::stroke::{DRAW_WIDTH, ERASE_WIDTH, Mode, PenColor, StrokeParams};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Drawing settings for a pad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PadConfig {
    /// Pen color as a CSS hex string.
    pub pen_color: String,
    /// Stroke width in draw mode.
    pub draw_width: f32,
    /// Stroke width in erase mode.
    pub erase_width: f32,
}

impl Default for PadConfig {
    fn default() -> Self {
        Self {
            pen_color: "#000".to_string(),
            draw_width: DRAW_WIDTH,
            erase_width: ERASE_WIDTH,
        }
    }
}

impl PadConfig {
    /// Stroke parameters for a mode under this configuration.
    ///
    /// An unparseable pen color falls back to black.
    pub fn stroke_params(&self, mode: Mode) -> StrokeParams {
        let color = PenColor::from_hex(&self.pen_color).unwrap_or_else(|| {
            log::warn!("Invalid pen color '{}', using black", self.pen_color);
            PenColor::BLACK
        });
        StrokeParams::for_mode_with(mode, color, self.draw_width, self.erase_width)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load from a JSON file.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// Default config file location.
    ///
    /// On Unix: `~/.config/sigpad/config.json`
    /// On Windows: `%APPDATA%\sigpad\config.json`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<std::path::PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sigpad").join("config.json"))
    }

    /// Load from the default location, falling back to defaults.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring config: {}", e);
                Self::default()
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn load_or_default() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::Compositing;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = PadConfig::default();
        assert_eq!(config.stroke_params(Mode::Draw), StrokeParams::for_mode(Mode::Draw));
        assert_eq!(config.stroke_params(Mode::Erase), StrokeParams::for_mode(Mode::Erase));
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let config = PadConfig::from_json(r##"{ "pen_color": "#1e3a8a" }"##).unwrap();
        assert_eq!(config.pen_color, "#1e3a8a");
        assert_eq!(config.draw_width, DRAW_WIDTH);
        assert_eq!(config.erase_width, ERASE_WIDTH);
    }

    #[test]
    fn test_non_ascii_pen_color_falls_back_to_black() {
        let config = PadConfig::from_json(r##"{ "pen_color": "#a€bc" }"##).unwrap();
        assert_eq!(config.stroke_params(Mode::Draw).color, PenColor::BLACK);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = PadConfig {
            erase_width: 32.0,
            ..Default::default()
        };
        let json = config.to_json().unwrap();
        assert_eq!(PadConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(PadConfig::from_json("{ nope"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_invalid_pen_color_falls_back_to_black() {
        let config = PadConfig {
            pen_color: "blue".to_string(),
            ..Default::default()
        };
        let params = config.stroke_params(Mode::Draw);
        assert_eq!(params.color, PenColor::BLACK);
        assert_eq!(params.compositing, Compositing::SourceOver);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "draw_width": 3.5 }"#).unwrap();

        let config = PadConfig::load(&path).unwrap();
        assert_eq!(config.draw_width, 3.5);

        let missing = PadConfig::load(&dir.path().join("missing.json"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }
}
