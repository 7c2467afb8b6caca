// SPDX-License-Identifier: AGPL-3.0
// Fishing Log Core - Settings persistence
//
// Settings are stored in a local JSON file in the platform config directory.

use crate::types::{AppError, AppSettings};
use std::fs;
use std::path::{Path, PathBuf};

/// In-memory copy of the settings, persisted to disk on changes
pub struct SettingsStore {
    settings: AppSettings,
    file_path: PathBuf,
}

impl SettingsStore {
    /// Open the settings file in the platform config directory
    pub fn new() -> Result<Self, AppError> {
        Self::at(Self::get_settings_path()?)
    }

    /// Open a settings file at an explicit path, creating it with defaults
    /// if it does not exist
    pub fn at(file_path: PathBuf) -> Result<Self, AppError> {
        tracing::info!("Settings file path: {:?}", file_path);

        let settings = if file_path.exists() {
            tracing::info!("Loading settings from disk");
            let content = fs::read_to_string(&file_path)
                .map_err(|e| AppError::FileIo(format!("Failed to read settings: {}", e)))?;

            serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse settings, using defaults: {}", e);
                AppSettings::default()
            })
        } else {
            tracing::info!("No settings file found, using defaults");
            AppSettings::default()
        };

        let store = Self {
            settings,
            file_path,
        };

        if !store.file_path.exists() {
            tracing::info!("Creating initial settings file");
            store.persist()?;
        }

        Ok(store)
    }

    /// Get the path to the settings file
    fn get_settings_path() -> Result<PathBuf, AppError> {
        let config_dir = crate::project_dirs()
            .ok_or_else(|| AppError::FileIo("Could not determine config directory".to_string()))?
            .config_dir()
            .to_path_buf();

        Ok(config_dir.join("settings.json"))
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Persist settings to disk
    fn persist(&self) -> Result<(), AppError> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::FileIo(format!("Failed to create config dir: {}", e)))?;
        }

        let content = serde_json::to_string_pretty(&self.settings)
            .map_err(|e| AppError::Serialization(format!("Failed to serialize settings: {}", e)))?;

        fs::write(&self.file_path, content)
            .map_err(|e| AppError::FileIo(format!("Failed to write settings: {}", e)))?;

        Ok(())
    }

    /// Get current settings
    pub fn get(&self) -> AppSettings {
        self.settings.clone()
    }

    /// Validate, replace and persist the settings
    pub fn update(&mut self, new_settings: AppSettings) -> Result<(), AppError> {
        let percent = new_settings.fill_warning_percent;
        if !percent.is_finite() || percent <= 0.0 {
            return Err(AppError::Validation(
                "Warning threshold must be greater than 0".to_string(),
            ));
        }

        tracing::info!(
            "Updating settings, warning threshold: {}%",
            new_settings.fill_warning_percent
        );
        let previous = std::mem::replace(&mut self.settings, new_settings);

        let result = self.persist();
        if result.is_ok() {
            tracing::info!("Settings persisted successfully");
        } else {
            tracing::error!("Failed to persist settings: {:?}", result);
            self.settings = previous;
        }
        result
    }
}
