//! Default migration settings stored as TOML.
//!
//! The file only seeds the session's initial settings; runs never write it.

use crate::paths::ChimeraPaths;
use chimera_core::settings::MigrationSettings;
use std::fs::{self, File};
use std::io::Write as IoWrite;
use std::path::PathBuf;

/// Errors that can occur while reading or writing `settings.toml`.
#[derive(Debug)]
pub enum SettingsStorageError {
    /// File I/O error.
    IoError(std::io::Error),
    /// TOML parse error.
    TomlError(toml::de::Error),
    /// TOML serialization error.
    TomlSerError(toml::ser::Error),
    /// Settings parsed but hold out-of-range values.
    Invalid(String),
    /// Config directory not found.
    ConfigDirNotFound,
}

impl std::fmt::Display for SettingsStorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsStorageError::IoError(e) => write!(f, "I/O error: {}", e),
            SettingsStorageError::TomlError(e) => write!(f, "TOML parse error: {}", e),
            SettingsStorageError::TomlSerError(e) => write!(f, "TOML serialization error: {}", e),
            SettingsStorageError::Invalid(e) => write!(f, "Invalid settings: {}", e),
            SettingsStorageError::ConfigDirNotFound => {
                write!(f, "Could not determine home directory")
            }
        }
    }
}

impl std::error::Error for SettingsStorageError {}

impl From<std::io::Error> for SettingsStorageError {
    fn from(e: std::io::Error) -> Self {
        SettingsStorageError::IoError(e)
    }
}

impl From<toml::de::Error> for SettingsStorageError {
    fn from(e: toml::de::Error) -> Self {
        SettingsStorageError::TomlError(e)
    }
}

impl From<toml::ser::Error> for SettingsStorageError {
    fn from(e: toml::ser::Error) -> Self {
        SettingsStorageError::TomlSerError(e)
    }
}

impl From<SettingsStorageError> for chimera_core::ChimeraError {
    fn from(e: SettingsStorageError) -> Self {
        chimera_core::ChimeraError::configuration(e.to_string())
    }
}

/// Storage for `settings.toml`.
pub struct SettingsStorage {
    path: PathBuf,
}

impl SettingsStorage {
    /// Creates a SettingsStorage at the default path (~/.config/chimera/settings.toml).
    pub fn new() -> Result<Self, SettingsStorageError> {
        let path =
            ChimeraPaths::settings_file().map_err(|_| SettingsStorageError::ConfigDirNotFound)?;
        Ok(Self { path })
    }

    /// Creates a SettingsStorage with a custom path.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Loads the settings file.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(settings))`: Loaded and validated; absent keys take their defaults
    /// - `Ok(None)`: File doesn't exist or is empty
    /// - `Err`: Failed to read, parse or validate the file
    pub fn load(&self) -> Result<Option<MigrationSettings>, SettingsStorageError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        let settings: MigrationSettings = toml::from_str(&content)?;
        settings
            .validate()
            .map_err(|e| SettingsStorageError::Invalid(e.to_string()))?;
        Ok(Some(settings))
    }

    /// Loads the settings file, falling back to built-in defaults when absent.
    pub fn load_or_default(&self) -> Result<MigrationSettings, SettingsStorageError> {
        Ok(self.load()?.unwrap_or_default())
    }

    /// Saves settings atomically (temporary file + rename).
    pub fn save(&self, settings: &MigrationSettings) -> Result<(), SettingsStorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(settings)?;

        let tmp_path = self.temp_path();
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(toml_string.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        tracing::debug!("[Settings] Saved settings to {}", self.path.display());

        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "settings.toml".to_string());
        self.path.with_file_name(format!(".{file_name}.tmp"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chimera_core::settings::MigrationStrategy;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_returns_none() {
        let temp_dir = TempDir::new().unwrap();
        let storage = SettingsStorage::with_path(temp_dir.path().join("settings.toml"));

        assert!(storage.load().unwrap().is_none());
        assert_eq!(storage.load_or_default().unwrap(), MigrationSettings::default());
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let storage = SettingsStorage::with_path(temp_dir.path().join("nested/settings.toml"));

        let mut settings = MigrationSettings::default();
        settings.migration_strategy = MigrationStrategy::Incremental;
        settings.enable_security_scan = true;
        storage.save(&settings).unwrap();

        let loaded = storage.load().unwrap().unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.toml");
        fs::write(&path, "enable_security_scan = true\nmigration_strategy = \"incremental\"\n")
            .unwrap();

        let loaded = SettingsStorage::with_path(path).load().unwrap().unwrap();
        assert!(loaded.enable_security_scan);
        assert_eq!(loaded.migration_strategy, MigrationStrategy::Incremental);
        assert_eq!(loaded.ai_config.max_tokens, 4096);
    }

    #[test]
    fn test_out_of_range_values_are_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.toml");
        fs::write(
            &path,
            "[ai_config]\nprovider = \"gemini\"\nmodel_name = \"m\"\ntemperature = 9.0\nmax_tokens = 10\ntop_p = 0.5\n",
        )
        .unwrap();

        let result = SettingsStorage::with_path(path).load();
        assert!(matches!(result, Err(SettingsStorageError::Invalid(_))));
    }
}
