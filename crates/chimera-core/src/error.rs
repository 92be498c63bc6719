//! Error types for the Chimera migrator.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::notification::Notification;

/// A shared error type for the entire Chimera workspace.
///
/// Variants follow the migration pipeline's taxonomy: input validation,
/// configuration, the external generation call, admission/cancellation of a
/// run, isolated post-processing failures, and infrastructure errors.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum ChimeraError {
    /// Empty or invalid input detected before any external call.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Missing credential or unusable configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The external LLM provider failed (network, quota, invalid model).
    #[error("Generation error: {message}")]
    Generation {
        message: String,
        status_code: Option<u16>,
    },

    /// Another migration run is already in flight.
    #[error("A migration is already in progress")]
    Busy,

    /// The caller abandoned the run before it finished.
    #[error("Migration cancelled")]
    Cancelled,

    /// A cosmetic post-processing service failed.
    #[error("Post-processing error in {step}: {message}")]
    PostProcessing { step: String, message: String },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ChimeraError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a Configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates a Generation error without an HTTP status
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
            status_code: None,
        }
    }

    /// Creates a Generation error tagged with the upstream HTTP status
    pub fn generation_with_status(status_code: u16, message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
            status_code: Some(status_code),
        }
    }

    /// Creates a PostProcessing error for the named step
    pub fn post_processing(step: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PostProcessing {
            step: step.into(),
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a Validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a Configuration error
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Check if this is a Generation error
    pub fn is_generation(&self) -> bool {
        matches!(self, Self::Generation { .. })
    }

    /// The terminal notification shown to the user when a run ends with this error.
    pub fn notification(&self) -> Notification {
        match self {
            Self::Validation(message) => Notification::error(message.clone()),
            Self::Busy => Notification::warning("A migration is already in progress"),
            Self::Cancelled => Notification::info("Migration cancelled"),
            other => Notification::error(format!("Migration failed: {other}")),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for ChimeraError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for ChimeraError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ChimeraError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for ChimeraError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, ChimeraError>`.
pub type Result<T> = std::result::Result<T, ChimeraError>;
