//! Domain layer for the Chimera code migrator.
//!
//! Holds the data model (settings, reports, history), the error taxonomy,
//! the language catalog and detector, fence extraction, and the traits at
//! the seams to the generation provider and the post-processing services.

pub mod config;
pub mod error;
pub mod fence;
pub mod generation;
pub mod history;
pub mod language;
pub mod notification;
pub mod report;
pub mod secret;
pub mod services;
pub mod settings;

// Re-export common types
pub use error::{ChimeraError, Result};
pub use generation::{GenerationClient, GenerationRequest, NO_OUTPUT_PLACEHOLDER};
pub use history::{MigrationHistory, MigrationHistoryEntry, MigrationStatus};
pub use notification::{MigrationEvent, Notification, NotificationLevel};
pub use report::CodeAnalysisReport;
pub use settings::{AIModelConfig, AIProvider, MigrationSettings, SettingsChange};
