//! Store settings management
//!
//! This module provides persistence, loading, and updating of the
//! template store configuration.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Storage slot holding the serialized template collection
pub const TEMPLATES_KEY: &str = "invoice_templates";

/// Storage slot holding the active template identity
pub const ACTIVE_TEMPLATE_KEY: &str = "active_template_id";

/// Template store configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StoreSettings {
    /// Directory where slot files live (relative paths resolve against the app data dir)
    pub storage_dir: PathBuf,
    /// Slot name of the template collection
    pub templates_key: String,
    /// Slot name of the active template pointer
    pub active_key: String,
    /// Reject templates whose identity is already stored
    pub reject_duplicate_ids: bool,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from("storage"),
            templates_key: TEMPLATES_KEY.to_string(),
            active_key: ACTIVE_TEMPLATE_KEY.to_string(),
            reject_duplicate_ids: false,
        }
    }
}

impl StoreSettings {
    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = dir.into();
        self
    }

    pub fn with_keys(mut self, templates_key: impl Into<String>, active_key: impl Into<String>) -> Self {
        self.templates_key = templates_key.into();
        self.active_key = active_key.into();
        self
    }

    /// Reject duplicate identities on add instead of storing twins
    pub fn strict(mut self) -> Self {
        self.reject_duplicate_ids = true;
        self
    }

    /// Storage directory resolved against `base` when relative
    pub fn resolve_storage_dir(&self, base: &Path) -> PathBuf {
        if self.storage_dir.is_absolute() {
            self.storage_dir.clone()
        } else {
            base.join(&self.storage_dir)
        }
    }
}

/// Settings manager for loading, saving, and updating store settings
pub struct SettingsManager {
    /// Path to the settings file
    settings_path: PathBuf,
    /// Current settings (cached)
    current: StoreSettings,
}

impl SettingsManager {
    /// Create a new settings manager with the given app data directory
    pub fn new(app_data_dir: impl AsRef<Path>) -> Self {
        Self {
            settings_path: app_data_dir.as_ref().join("settings.json"),
            current: StoreSettings::default(),
        }
    }

    /// Get the path to the settings file
    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    fn apply_loaded(&mut self, content: &str) {
        match serde_json::from_str::<StoreSettings>(content) {
            Ok(settings) => self.current = settings,
            Err(e) => {
                tracing::warn!(
                    path = %self.settings_path.display(),
                    "Failed to parse settings file, using defaults: {}",
                    e
                );
                self.current = StoreSettings::default();
            }
        }
    }

    /// Load settings from disk, or return defaults if the file doesn't exist
    pub async fn load(&mut self) -> Result<&StoreSettings> {
        if self.settings_path.exists() {
            let content = tokio::fs::read_to_string(&self.settings_path).await?;
            self.apply_loaded(&content);
        } else {
            self.current = StoreSettings::default();
        }
        Ok(&self.current)
    }

    /// Load settings synchronously (for use during app startup)
    pub fn load_sync(&mut self) -> Result<&StoreSettings> {
        if self.settings_path.exists() {
            let content = std::fs::read_to_string(&self.settings_path)?;
            self.apply_loaded(&content);
        } else {
            self.current = StoreSettings::default();
        }
        Ok(&self.current)
    }

    /// Save current settings to disk
    pub async fn save(&self) -> Result<()> {
        if let Some(parent) = self.settings_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(&self.current)?;
        tokio::fs::write(&self.settings_path, content).await?;
        Ok(())
    }

    /// Save settings synchronously
    pub fn save_sync(&self) -> Result<()> {
        if let Some(parent) = self.settings_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(&self.current)?;
        std::fs::write(&self.settings_path, content)?;
        Ok(())
    }

    /// Get current settings
    pub fn get(&self) -> &StoreSettings {
        &self.current
    }

    /// Update settings and save to disk
    pub async fn update(&mut self, settings: StoreSettings) -> Result<()> {
        self.current = settings;
        self.save().await
    }

    /// Update settings synchronously
    pub fn update_sync(&mut self, settings: StoreSettings) -> Result<()> {
        self.current = settings;
        self.save_sync()
    }

    /// Reset settings to defaults synchronously
    pub fn reset_sync(&mut self) -> Result<&StoreSettings> {
        self.current = StoreSettings::default();
        self.save_sync()?;
        Ok(&self.current)
    }
}
