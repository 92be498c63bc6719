//! Secret management service trait.
//!
//! Defines the interface for loading the provider credential.

use crate::config::SecretConfig;

/// Service for loading secret configuration (API keys).
///
/// # Security Note
///
/// Implementations should ensure that:
/// - Secret files have appropriate permissions (e.g., 600 on Unix)
/// - Secrets are never logged or exposed in error messages
#[async_trait::async_trait]
pub trait SecretService: Send + Sync {
    /// Loads the secret configuration.
    ///
    /// # Returns
    ///
    /// - `Ok(SecretConfig)`: Successfully loaded secrets (possibly without a Gemini entry)
    /// - `Err(String)`: Failed to load (error message must not contain secrets)
    async fn load_secrets(&self) -> Result<SecretConfig, String>;

    /// Returns the Gemini API key.
    ///
    /// `Ok(None)` means no key is configured anywhere; a load failure is
    /// passed through so callers can report its cause.
    async fn gemini_api_key(&self) -> Result<Option<String>, String> {
        Ok(self
            .load_secrets()
            .await?
            .gemini
            .map(|gemini| gemini.api_key)
            .filter(|key| !key.trim().is_empty()))
    }
}
