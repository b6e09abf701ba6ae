//! Configuration manager for loading and saving app configuration

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::AppConfig;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialize(#[from] ron::Error),
    #[error("deserialization error: {0}")]
    Deserialize(#[from] ron::error::SpannedError),
}

/// Loads, caches, and saves the app configuration.
pub struct ConfigManager {
    config: AppConfig,
    config_path: PathBuf,
    dirty: bool,
}

impl ConfigManager {
    /// Creates a manager, loading from disk if a config file exists.
    pub fn new() -> Self {
        let config_path = Self::default_config_path();
        Self::with_path(config_path)
    }

    /// Creates a manager backed by an explicit path.
    pub fn with_path(config_path: PathBuf) -> Self {
        let config = match Self::load_from_path(&config_path) {
            Ok(Some(config)) => config,
            Ok(None) => {
                tracing::info!("No config file found, using defaults");
                AppConfig::new()
            }
            Err(error) => {
                tracing::warn!("Failed to load config ({error}), using defaults");
                AppConfig::new()
            }
        };

        Self {
            config,
            config_path,
            dirty: false,
        }
    }

    fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gizmo-demo")
            .join("config.ron")
    }

    fn load_from_path(path: &Path) -> Result<Option<AppConfig>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        Ok(Some(ron::from_str(&content)?))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Mutates the configuration and marks it for saving.
    pub fn update(&mut self, f: impl FnOnce(&mut AppConfig)) {
        f(&mut self.config);
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Writes the configuration to disk.
    pub fn save(&mut self) -> Result<(), ConfigError> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = ron::ser::to_string_pretty(&self.config, ron::ser::PrettyConfig::default())?;
        std::fs::write(&self.config_path, content)?;
        self.dirty = false;
        tracing::debug!("config saved to {}", self.config_path.display());
        Ok(())
    }

    /// Saves only if something changed since the last save.
    pub fn save_if_dirty(&mut self) {
        if self.dirty
            && let Err(error) = self.save()
        {
            tracing::warn!("Failed to save config: {error}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_path(dir.path().join("config.ron"));
        assert_eq!(*manager.config(), AppConfig::default());
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ron");

        let mut manager = ConfigManager::with_path(path.clone());
        manager.update(|config| {
            config.scene.box_count = 25;
            config.drag_log_throttle_ms = 250;
        });
        manager.save().unwrap();

        let reloaded = ConfigManager::with_path(path);
        assert_eq!(reloaded.config().scene.box_count, 25);
        assert_eq!(reloaded.config().drag_log_throttle_ms, 250);
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ron");
        std::fs::write(&path, "not a config").unwrap();

        let manager = ConfigManager::with_path(path);
        assert_eq!(*manager.config(), AppConfig::default());
    }

    #[test]
    fn test_update_marks_dirty_and_save_clears_it() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = ConfigManager::with_path(dir.path().join("config.ron"));
        assert!(!manager.is_dirty());

        manager.update(|config| config.scene.spread = 4.0);
        assert!(manager.is_dirty());

        manager.save().unwrap();
        assert!(!manager.is_dirty());
    }
}
