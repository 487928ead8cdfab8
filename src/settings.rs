// src/settings.rs
//! JSON persistence for the active configuration and named presets.
//!
//! Two documents on disk: `settings.json` holds the configuration restored
//! at startup, `presets.json` a name -> configuration map. A missing or
//! unreadable settings file falls back to defaults rather than failing
//! startup; preset writes are explicit and do fail loudly.

use crate::config::RenderConfig;
use crate::error::PipelineError;
use log::warn;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub type Presets = BTreeMap<String, RenderConfig>;

pub struct SettingsStore {
    settings_path: PathBuf,
    presets_path: PathBuf,
}

impl SettingsStore {
    /// Store rooted at `dir`, using the conventional file names.
    pub fn new(dir: &Path) -> Self {
        Self {
            settings_path: dir.join("settings.json"),
            presets_path: dir.join("presets.json"),
        }
    }

    /// Loads the saved configuration, or defaults when the file is missing
    /// or unreadable. Corruption is logged, not fatal.
    pub fn load_settings(&self) -> RenderConfig {
        match fs::read_to_string(&self.settings_path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(config) => config,
                Err(e) => {
                    warn!(
                        "[SETTINGS] {} is corrupt ({}), using defaults",
                        self.settings_path.display(),
                        e
                    );
                    RenderConfig::default()
                }
            },
            Err(_) => RenderConfig::default(),
        }
    }

    pub fn save_settings(&self, config: &RenderConfig) -> Result<(), PipelineError> {
        let json = serde_json::to_string_pretty(config)?;
        fs::write(&self.settings_path, json)?;
        Ok(())
    }

    /// Loads all named presets; missing or corrupt files yield an empty map.
    pub fn load_presets(&self) -> Presets {
        match fs::read_to_string(&self.presets_path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(presets) => presets,
                Err(e) => {
                    warn!(
                        "[SETTINGS] {} is corrupt ({}), ignoring presets",
                        self.presets_path.display(),
                        e
                    );
                    Presets::new()
                }
            },
            Err(_) => Presets::new(),
        }
    }

    /// Adds or replaces one named preset.
    pub fn save_preset(&self, name: &str, config: &RenderConfig) -> Result<(), PipelineError> {
        let mut presets = self.load_presets();
        presets.insert(name.to_string(), config.clone());
        self.write_presets(&presets)
    }

    /// Removes a preset. Returns true when it existed.
    pub fn delete_preset(&self, name: &str) -> Result<bool, PipelineError> {
        let mut presets = self.load_presets();
        let existed = presets.remove(name).is_some();
        if existed {
            self.write_presets(&presets)?;
        }
        Ok(existed)
    }

    fn write_presets(&self, presets: &Presets) -> Result<(), PipelineError> {
        let json = serde_json::to_string_pretty(presets)?;
        fs::write(&self.presets_path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_settings_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path());
        assert_eq!(store.load_settings(), RenderConfig::default());
    }

    #[test]
    fn settings_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path());
        let config = RenderConfig {
            font_family: "Caveat".to_string(),
            font_size: 36,
            line_spacing: 90,
            ..Default::default()
        };
        store.save_settings(&config).unwrap();
        assert_eq!(store.load_settings(), config);
    }

    #[test]
    fn corrupt_settings_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("settings.json"), "{not json").unwrap();
        let store = SettingsStore::new(dir.path());
        assert_eq!(store.load_settings(), RenderConfig::default());
    }

    #[test]
    fn presets_save_load_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path());
        assert!(store.load_presets().is_empty());

        let config = RenderConfig::default();
        store.save_preset("exam notes", &config).unwrap();
        store.save_preset("diary", &config).unwrap();

        let presets = store.load_presets();
        assert_eq!(presets.len(), 2);
        assert!(presets.contains_key("exam notes"));

        assert!(store.delete_preset("diary").unwrap());
        assert!(!store.delete_preset("diary").unwrap());
        assert_eq!(store.load_presets().len(), 1);
    }

    #[test]
    fn saving_a_preset_overwrites_same_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path());
        let mut config = RenderConfig::default();
        store.save_preset("p", &config).unwrap();
        config.font_size = 64;
        store.save_preset("p", &config).unwrap();
        assert_eq!(store.load_presets()["p"].font_size, 64);
    }
}
