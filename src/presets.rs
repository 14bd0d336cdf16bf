use crate::color::ColorScheme;
use crate::error::{FieldError, Result};
use crate::settings::FieldConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A named preset containing field settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub description: String,
    pub field: FieldConfig,
    pub color_scheme: ColorScheme,
}

impl Preset {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        field: FieldConfig,
        color_scheme: ColorScheme,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            field,
            color_scheme,
        }
    }
}

/// Manager for loading and saving presets
pub struct PresetManager {
    /// Built-in presets that ship with the app
    pub builtin: Vec<Preset>,
    /// User-created presets loaded from disk
    pub user: Vec<Preset>,
    /// Where user presets live; `None` when no config directory exists
    dir: Option<PathBuf>,
}

impl PresetManager {
    /// Built-in presets plus user presets from the platform config directory
    pub fn new() -> Self {
        Self::with_dir(Self::default_dir())
    }

    /// Built-in presets plus user presets from `dir`
    pub fn with_dir(dir: Option<PathBuf>) -> Self {
        let mut manager = Self {
            builtin: builtin_presets(),
            user: Vec::new(),
            dir,
        };
        manager.load_user_presets();
        manager
    }

    /// Get the presets directory path
    fn default_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("particle-field").join("presets"))
    }

    /// Load user presets from disk. Unreadable files are skipped.
    fn load_user_presets(&mut self) {
        let Some(dir) = &self.dir else {
            return;
        };
        let Ok(entries) = fs::read_dir(dir) else {
            return;
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if !path.extension().is_some_and(|e| e == "json") {
                continue;
            }
            match read_preset(&path) {
                Ok(preset) => self.user.push(preset),
                Err(err) => tracing::warn!(path = %path.display(), %err, "skipping user preset"),
            }
        }
        self.user.sort_by(|a, b| a.name.cmp(&b.name));
    }

    /// Save a preset to disk, replacing any user preset of the same name
    pub fn save_preset(&mut self, preset: Preset) -> Result<PathBuf> {
        let dir = self.dir.as_ref().ok_or(FieldError::NoConfigDir)?;
        fs::create_dir_all(dir).map_err(|e| FieldError::io(dir, e))?;

        let path = dir.join(format!("{}.json", sanitize_filename(&preset.name)));
        let json = serde_json::to_string_pretty(&preset)?;
        fs::write(&path, json).map_err(|e| FieldError::io(&path, e))?;
        tracing::info!(name = %preset.name, path = %path.display(), "preset saved");

        self.user.retain(|p| p.name != preset.name);
        self.user.push(preset);
        Ok(path)
    }

    /// Delete a user preset. Fails with `UnknownPreset` when nothing matched.
    pub fn delete_preset(&mut self, name: &str) -> Result<()> {
        let dir = self.dir.as_ref().ok_or(FieldError::NoConfigDir)?;
        let before = self.user.len();
        self.user.retain(|p| p.name != name);
        let mut deleted = self.user.len() != before;

        let path = dir.join(format!("{}.json", sanitize_filename(name)));
        if path.exists() {
            fs::remove_file(&path).map_err(|e| FieldError::io(&path, e))?;
            deleted = true;
        }

        if !deleted {
            return Err(FieldError::UnknownPreset(name.to_string()));
        }
        tracing::info!(name, "preset deleted");
        Ok(())
    }

    /// Get all presets (builtin + user)
    pub fn all_presets(&self) -> impl Iterator<Item = &Preset> {
        self.builtin.iter().chain(self.user.iter())
    }

    /// Find a preset by name (case-insensitive)
    pub fn find(&self, name: &str) -> Result<&Preset> {
        self.all_presets()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| FieldError::UnknownPreset(name.to_string()))
    }
}

fn read_preset(path: &Path) -> Result<Preset> {
    let content = fs::read_to_string(path).map_err(|e| FieldError::io(path, e))?;
    Ok(serde_json::from_str(&content)?)
}

fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

fn builtin_presets() -> Vec<Preset> {
    let defaults = FieldConfig::default();
    vec![
        Preset::new(
            "constellation",
            "The classic: 60 slow particles, 150px links",
            defaults.clone(),
            ColorScheme::Sky,
        ),
        Preset::new(
            "dense",
            "Twice the particles with shorter links",
            FieldConfig {
                particle_count: 120,
                connection_distance: 110.0,
                ..defaults.clone()
            },
            ColorScheme::Sky,
        ),
        Preset::new(
            "calm",
            "Barely drifting, long warm links",
            {
                let mut field = FieldConfig {
                    particle_count: 45,
                    connection_distance: 180.0,
                    particle_speed: 0.15,
                    ..defaults.clone()
                };
                field.apply_scheme(ColorScheme::Ember);
                field
            },
            ColorScheme::Ember,
        ),
        Preset::new(
            "sparse",
            "A few fast particles that rarely meet",
            {
                let mut field = FieldConfig {
                    particle_count: 24,
                    connection_distance: 200.0,
                    particle_speed: 0.8,
                    ..defaults
                };
                field.apply_scheme(ColorScheme::Mint);
                field
            },
            ColorScheme::Mint,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_builtin_presets() {
        let manager = PresetManager::with_dir(None);
        let names: Vec<&str> = manager.all_presets().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["constellation", "dense", "calm", "sparse"]);
        assert_eq!(manager.find("constellation").unwrap().field, FieldConfig::default());
        assert_eq!(manager.find("CALM").unwrap().color_scheme, ColorScheme::Ember);
        assert!(matches!(manager.find("nope"), Err(FieldError::UnknownPreset(_))));
    }

    #[test]
    fn test_save_requires_dir() {
        let mut manager = PresetManager::with_dir(None);
        let preset = Preset::new("x", "", FieldConfig::default(), ColorScheme::Sky);
        assert!(matches!(manager.save_preset(preset), Err(FieldError::NoConfigDir)));
    }

    #[test]
    fn test_save_load_delete() {
        let dir = TempDir::new().unwrap();
        let presets_dir = dir.path().join("presets");

        let mut manager = PresetManager::with_dir(Some(presets_dir.clone()));
        let preset = Preset::new(
            "My Field!",
            "custom",
            FieldConfig {
                particle_count: 33,
                ..FieldConfig::default()
            },
            ColorScheme::Mono,
        );
        let path = manager.save_preset(preset.clone()).unwrap();
        assert_eq!(path, presets_dir.join("My_Field_.json"));

        // Saving again replaces rather than duplicates
        manager.save_preset(preset.clone()).unwrap();
        assert_eq!(manager.user.len(), 1);

        let reloaded = PresetManager::with_dir(Some(presets_dir.clone()));
        assert_eq!(reloaded.find("my field!").unwrap(), &preset);

        manager.delete_preset("My Field!").unwrap();
        assert!(manager.user.is_empty());
        assert!(!path.exists());

        // Nothing left to delete
        assert!(matches!(
            manager.delete_preset("My Field!"),
            Err(FieldError::UnknownPreset(_))
        ));
        assert!(matches!(
            manager.delete_preset("constellation"),
            Err(FieldError::UnknownPreset(_))
        ));
    }

    #[test]
    fn test_broken_user_preset_is_skipped() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("broken.json"), "{").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let manager = PresetManager::with_dir(Some(dir.path().to_path_buf()));
        assert!(manager.user.is_empty());
        assert_eq!(manager.builtin.len(), 4);
    }
}
