//! Unified path management for chimera configuration files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/chimera/           # Config directory
//! ├── settings.toml            # Default migration settings
//! └── secret.json              # API keys
//! ```

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Resolves chimera's configuration locations.
pub struct ChimeraPaths;

impl ChimeraPaths {
    const APP_DIR: &'static str = "chimera";
    const SETTINGS_FILE: &'static str = "settings.toml";
    const SECRET_FILE: &'static str = "secret.json";

    /// Returns `~/.config/chimera`.
    pub fn config_dir() -> Result<PathBuf, PathError> {
        let home = dirs::home_dir().ok_or(PathError::HomeDirNotFound)?;
        Ok(home.join(".config").join(Self::APP_DIR))
    }

    /// Returns `~/.config/chimera/settings.toml`.
    pub fn settings_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join(Self::SETTINGS_FILE))
    }

    /// Returns `~/.config/chimera/secret.json`.
    pub fn secret_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join(Self::SECRET_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_files_live_under_config_dir() {
        // Skip on machines without a home directory.
        let Ok(dir) = ChimeraPaths::config_dir() else {
            return;
        };
        assert!(dir.ends_with(".config/chimera"));
        assert_eq!(
            ChimeraPaths::settings_file().unwrap(),
            dir.join("settings.toml")
        );
        assert_eq!(ChimeraPaths::secret_file().unwrap(), dir.join("secret.json"));
    }
}
