//! File-backed storage for chimera configuration.

pub mod settings_storage;

pub use settings_storage::{SettingsStorage, SettingsStorageError};
