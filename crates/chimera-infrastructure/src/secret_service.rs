//! Secret service implementation.
//!
//! Credential lookup order:
//! 1. `~/.config/chimera/secret.json`
//! 2. `GEMINI_API_KEY` environment variable
//! 3. `API_KEY` environment variable
//!
//! An unreadable or malformed secret file does not hide a key set in the
//! environment. The file error is only reported when no fallback applies.

use crate::paths::ChimeraPaths;
use chimera_core::ChimeraError;
use chimera_core::config::{GeminiConfig, SecretConfig};
use chimera_core::secret::SecretService;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Environment variables consulted when secret.json has no Gemini entry.
pub const API_KEY_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

/// Loads secrets once and caches them for the lifetime of the service.
///
/// # Security Note
///
/// `secret.json` is plaintext and should have restrictive permissions (600).
#[derive(Clone)]
pub struct SecretServiceImpl {
    path: PathBuf,
    env_vars: Vec<String>,
    cached: Arc<OnceCell<SecretConfig>>,
}

impl SecretServiceImpl {
    /// Creates a service reading the default secret file.
    pub fn new() -> Result<Self, ChimeraError> {
        let path = ChimeraPaths::secret_file()
            .map_err(|e| ChimeraError::configuration(format!("Cannot locate secret file: {e}")))?;
        Ok(Self::with_path(path))
    }

    /// Creates a service reading a custom secret file.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            env_vars: API_KEY_ENV_VARS.iter().map(|v| v.to_string()).collect(),
            cached: Arc::new(OnceCell::new()),
        }
    }

    /// Overrides the environment variables used as fallback.
    pub fn with_env_vars(mut self, vars: &[&str]) -> Self {
        self.env_vars = vars.iter().map(|v| v.to_string()).collect();
        self
    }

    /// Reads `secret.json`; a missing file is an empty config.
    fn read_file(&self) -> Result<SecretConfig, String> {
        if !self.path.exists() {
            tracing::debug!("[Secret] No secret file at {}", self.path.display());
            return Ok(SecretConfig::default());
        }
        let content = fs::read_to_string(&self.path)
            .map_err(|e| format!("Failed to read {}: {e}", self.path.display()))?;
        serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse {}: {e}", self.path.display()))
    }

    fn key_from_env(&self) -> Option<GeminiConfig> {
        self.env_vars.iter().find_map(|var| {
            env::var(var)
                .ok()
                .filter(|value| !value.trim().is_empty())
                .map(|api_key| {
                    tracing::debug!("[Secret] Using Gemini API key from ${}", var);
                    GeminiConfig {
                        api_key,
                        model_name: None,
                    }
                })
        })
    }

    fn load_uncached(&self) -> Result<SecretConfig, String> {
        match self.read_file() {
            Ok(mut config) => {
                if config.gemini.is_none() {
                    config.gemini = self.key_from_env();
                }
                Ok(config)
            }
            Err(e) => match self.key_from_env() {
                Some(gemini) => {
                    tracing::warn!("[Secret] Ignoring secret file: {}", e);
                    Ok(SecretConfig {
                        gemini: Some(gemini),
                    })
                }
                None => Err(e),
            },
        }
    }
}

#[async_trait::async_trait]
impl SecretService for SecretServiceImpl {
    async fn load_secrets(&self) -> Result<SecretConfig, String> {
        self.cached
            .get_or_try_init(|| async { self.load_uncached() })
            .await
            .cloned()
    }
}
