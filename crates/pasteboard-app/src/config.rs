//! Application configuration.

use crate::error::AppError;
use pasteboard_core::shapes::SerializableColor;
use pasteboard_core::widget::HANDLE_SIZE;
use peniko::Color;
use serde::{Deserialize, Serialize};

/// Environment variable holding inline JSON or a path to a JSON file.
pub const CONFIG_ENV_VAR: &str = "PASTEBOARD_CONFIG";

/// Application configuration. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub title: String,
    /// Initial window size in logical pixels.
    pub width: u32,
    pub height: u32,
    /// Canvas background as `#rrggbb`.
    pub background_color: String,
    /// Transformer anchor size in screen pixels.
    pub handle_size: f64,
    /// Transformer border and rubber band stroke.
    pub selection_color: SerializableColor,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Pasteboard".to_string(),
            width: 1280,
            height: 800,
            background_color: "#ffffff".to_string(),
            handle_size: HANDLE_SIZE,
            selection_color: SerializableColor::new(59, 130, 246, 255),
        }
    }
}

impl AppConfig {
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from [`CONFIG_ENV_VAR`], falling back to defaults.
    pub fn from_env() -> Self {
        let Ok(value) = std::env::var(CONFIG_ENV_VAR) else {
            return Self::default();
        };
        match Self::from_source(&value) {
            Ok(config) => {
                log::info!("Loaded config from {CONFIG_ENV_VAR}");
                config
            }
            Err(e) => {
                log::warn!("Ignoring {CONFIG_ENV_VAR}: {e}");
                Self::default()
            }
        }
    }

    /// Inline JSON if it looks like an object, otherwise a file path.
    fn from_source(value: &str) -> Result<Self, AppError> {
        let value = value.trim();
        if value.starts_with('{') {
            Self::from_json(value)
        } else {
            Self::from_json(&std::fs::read_to_string(value)?)
        }
    }

    pub fn background(&self) -> Color {
        SerializableColor::from_hex(&self.background_color)
            .map(Color::from)
            .unwrap_or(Color::WHITE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = AppConfig::from_json(r#"{ "title": "Board", "handle_size": 14 }"#).unwrap();
        assert_eq!(config.title, "Board");
        assert!((config.handle_size - 14.0).abs() < f64::EPSILON);
        assert_eq!(config.width, 1280);
        assert_eq!(config.background_color, "#ffffff");
    }

    #[test]
    fn test_selection_color_from_json() {
        let config = AppConfig::from_json(
            r#"{ "selection_color": { "r": 255, "g": 0, "b": 128, "a": 255 } }"#,
        )
        .unwrap();
        assert_eq!(config.selection_color, SerializableColor::new(255, 0, 128, 255));
        assert_eq!(AppConfig::default().selection_color.b, 246);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(matches!(AppConfig::from_json("{ width: }"), Err(AppError::Config(_))));
        assert!(matches!(
            AppConfig::from_source("/nonexistent/pasteboard.json"),
            Err(AppError::Io(_))
        ));
    }

    #[test]
    fn test_background_parses_or_falls_back() {
        let mut config = AppConfig {
            background_color: "#102030".into(),
            ..AppConfig::default()
        };
        let rgba = config.background().to_rgba8();
        assert_eq!((rgba.r, rgba.g, rgba.b), (0x10, 0x20, 0x30));

        config.background_color = "teal".into();
        let rgba = config.background().to_rgba8();
        assert_eq!((rgba.r, rgba.g, rgba.b), (255, 255, 255));
    }
}
