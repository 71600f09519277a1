use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::style::{FontSize, FontSpec, StyleFlags};
use crate::app::infrastructure::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Family of new documents and of "clear formatting"
    #[serde(default = "default_font_family")]
    pub default_font_family: String,

    /// Size in points of new documents and of "clear formatting"
    #[serde(default = "default_font_size")]
    pub default_font_size: u32,

    /// Sizes offered by the toolbar size choice
    #[serde(default = "default_font_size_presets")]
    pub font_size_presets: Vec<u32>,

    #[serde(default = "default_word_wrap")]
    pub word_wrap_enabled: bool,

    /// Directory the open/save dialogs start in
    #[serde(default)]
    pub last_open_directory: Option<PathBuf>,
}

fn default_font_family() -> String {
    "Segoe UI".to_string()
}

fn default_font_size() -> u32 {
    12
}

fn default_font_size_presets() -> Vec<u32> {
    vec![8, 9, 10, 11, 12, 14, 16, 18, 20, 24, 28, 32]
}

fn default_word_wrap() -> bool {
    true
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_font_family: default_font_family(),
            default_font_size: default_font_size(),
            font_size_presets: default_font_size_presets(),
            word_wrap_enabled: default_word_wrap(),
            last_open_directory: None,
        }
    }
}

impl AppSettings {
    /// Regular-style font documents start from. Falls back to the built-in
    /// default when the configured size is unusable.
    pub fn default_font(&self) -> FontSpec {
        let size = FontSize::from_points(self.default_font_size).unwrap_or_else(|| {
            tracing::warn!(size = self.default_font_size, "invalid default font size, using 12");
            FontSize::DEFAULT
        });
        let family = if self.default_font_family.trim().is_empty() {
            default_font_family()
        } else {
            self.default_font_family.clone()
        };
        FontSpec::new(family, size, StyleFlags::REGULAR)
    }

    /// Presets with zero entries removed, sorted and deduplicated.
    pub fn size_presets(&self) -> Vec<u32> {
        let mut presets: Vec<u32> = self
            .font_size_presets
            .iter()
            .copied()
            .filter(|s| *s > 0)
            .collect();
        presets.sort_unstable();
        presets.dedup();
        if presets.is_empty() {
            default_font_size_presets()
        } else {
            presets
        }
    }

    /// Load settings from disk, or create default if not exists
    pub fn load() -> Self {
        Self::load_from(&Self::get_config_path())
    }

    pub fn load_from(config_path: &Path) -> Self {
        match fs::read_to_string(config_path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to parse settings, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                // File doesn't exist, use defaults
                let default = Self::default();
                // Try to save defaults for next time
                if let Err(e) = default.save_to(config_path) {
                    tracing::debug!(error = %e, "could not write default settings");
                }
                default
            }
        }
    }

    /// Save settings to disk
    pub fn save(&self) -> Result<(), AppError> {
        self.save_to(&Self::get_config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<(), AppError> {
        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(config_path, json)?;

        Ok(())
    }

    /// Get config file path (cross-platform)
    pub fn get_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("richnotes");
        path.push("settings.json");
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.default_font_family, "Segoe UI");
        assert_eq!(settings.default_font_size, 12);
        assert!(settings.word_wrap_enabled);
        assert!(settings.last_open_directory.is_none());
        assert_eq!(settings.font_size_presets.first(), Some(&8));
        assert_eq!(settings.font_size_presets.last(), Some(&32));
    }

    #[test]
    fn test_default_font_is_regular() {
        let font = AppSettings::default().default_font();
        assert_eq!(font.family, "Segoe UI");
        assert_eq!(font.size.half_points(), 24);
        assert!(font.flags.is_regular());
    }

    #[test]
    fn test_invalid_default_size_falls_back() {
        let settings = AppSettings {
            default_font_size: 0,
            default_font_family: "  ".to_string(),
            ..Default::default()
        };
        let font = settings.default_font();
        assert_eq!(font.size.half_points(), 24);
        assert_eq!(font.family, "Segoe UI");
    }

    #[test]
    fn test_size_presets_are_cleaned() {
        let settings = AppSettings {
            font_size_presets: vec![14, 0, 9, 14],
            ..Default::default()
        };
        assert_eq!(settings.size_presets(), vec![9, 14]);

        let empty = AppSettings {
            font_size_presets: vec![0],
            ..Default::default()
        };
        assert_eq!(empty.size_presets(), default_font_size_presets());
    }

    #[test]
    fn test_serialize_deserialize() {
        let settings = AppSettings {
            last_open_directory: Some(PathBuf::from("/tmp/notes")),
            ..Default::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        let loaded: AppSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(settings, loaded);
    }

    #[test]
    fn test_partial_config() {
        // Simulate old config missing new fields
        let json = r#"{"default_font_size": 16}"#;
        let settings: AppSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.default_font_size, 16);
        assert_eq!(settings.default_font_family, "Segoe UI");
        assert!(settings.word_wrap_enabled);
    }

    #[test]
    fn test_save_and_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = AppSettings {
            default_font_family: "Georgia".to_string(),
            word_wrap_enabled: false,
            ..Default::default()
        };
        settings.save_to(&path).unwrap();
        assert_eq!(AppSettings::load_from(&path), settings);
    }

    #[test]
    fn test_load_missing_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        assert_eq!(AppSettings::load_from(&path), AppSettings::default());
        assert!(path.exists());
    }

    #[test]
    fn test_load_invalid_json_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(AppSettings::load_from(&path), AppSettings::default());
    }
}
