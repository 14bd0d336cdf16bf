use crate::color::ColorScheme;
use crate::error::{FieldError, Result};
use crate::settings::FieldConfig;
use crate::viewport::CellSize;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Complete application configuration for export/import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Version field for future compatibility
    pub version: u32,
    /// Particle field parameters
    pub field: FieldConfig,
    /// Scheme shown in the sidebar; the field colors may differ if set explicitly
    pub color_scheme: ColorScheme,
    /// Logical pixel size of one terminal cell
    pub cell_size: CellSize,
    /// Fixed RNG seed for reproducible particle layouts
    pub seed: Option<u64>,
}

impl AppConfig {
    /// Export config to a JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|e| FieldError::io(path, e))?;
        tracing::info!(path = %path.display(), "config exported");
        Ok(())
    }

    /// Import config from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| FieldError::io(path, e))?;
        let config: Self = serde_json::from_str(&content)?;
        tracing::info!(path = %path.display(), version = config.version, "config loaded");
        Ok(config)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            field: FieldConfig::default(),
            color_scheme: ColorScheme::default(),
            cell_size: CellSize::default(),
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_file_save_and_load() {
        let config = AppConfig {
            version: 1,
            field: FieldConfig {
                particle_count: 80,
                connection_distance: 120.0,
                mouse_radius: 90.0,
                base_color: Rgba::new(251, 146, 60, 0.5),
                line_color: Rgba::new(251, 146, 60, 0.2),
                particle_speed: 0.5,
                mobile_breakpoint: 640.0,
                margin: 4.0,
            },
            color_scheme: ColorScheme::Ember,
            cell_size: CellSize {
                width: 8.0,
                height: 16.0,
            },
            seed: Some(42),
        };

        let temp_file = NamedTempFile::new().unwrap();
        config.save_to_file(temp_file.path()).unwrap();

        let loaded = AppConfig::load_from_file(temp_file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_colors_are_css_strings_on_disk() {
        let temp_file = NamedTempFile::new().unwrap();
        AppConfig::default().save_to_file(temp_file.path()).unwrap();

        let raw = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(raw.contains("\"base_color\": \"rgba(56, 189, 248, 0.5)\""));
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), r#"{"field": {"connection_distance": 90.0}}"#).unwrap();

        let loaded = AppConfig::load_from_file(temp_file.path()).unwrap();
        assert_eq!(loaded.version, 1);
        assert_eq!(loaded.field.connection_distance, 90.0);
        assert_eq!(loaded.field.particle_count, 60);
        assert_eq!(loaded.cell_size, CellSize::default());
    }

    #[test]
    fn test_invalid_config_file() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), "not valid json").unwrap();

        let result = AppConfig::load_from_file(temp_file.path());
        assert!(matches!(result, Err(FieldError::Json(_))));
    }

    #[test]
    fn test_invalid_color_in_config_file() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), r#"{"field": {"base_color": "blue-ish"}}"#).unwrap();

        assert!(AppConfig::load_from_file(temp_file.path()).is_err());
    }

    #[test]
    fn test_missing_config_file() {
        let result = AppConfig::load_from_file(Path::new("/nonexistent/path/config.json"));
        assert!(matches!(result, Err(FieldError::Io { .. })));
    }
}
