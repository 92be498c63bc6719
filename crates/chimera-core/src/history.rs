//! Migration history model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;
use uuid::Uuid;

use crate::settings::MigrationSettings;

/// Outcome recorded for a migration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MigrationStatus {
    Success,
    Failed,
    /// Generation succeeded but at least one post-processing step failed.
    Partial,
}

/// Immutable record of one completed run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationHistoryEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub input_code: String,
    pub output_code: String,
    pub from_lang: String,
    pub to_lang: String,
    pub settings: MigrationSettings,
    pub status: MigrationStatus,
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_estimate_usd: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
}

impl MigrationHistoryEntry {
    /// Creates an entry with a fresh UUID and the current timestamp.
    pub fn new(
        input_code: impl Into<String>,
        output_code: impl Into<String>,
        from_lang: impl Into<String>,
        to_lang: impl Into<String>,
        settings: MigrationSettings,
        status: MigrationStatus,
        duration_ms: u64,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            input_code: input_code.into(),
            output_code: output_code.into(),
            from_lang: from_lang.into(),
            to_lang: to_lang.into(),
            settings,
            status,
            duration_ms,
            cost_estimate_usd: None,
            feedback: None,
            error_message: None,
            diff: None,
        }
    }
}

/// Session-scoped, most-recent-first sequence of history entries.
///
/// Entries can only be prepended; nothing is edited or removed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MigrationHistory {
    entries: Vec<MigrationHistoryEntry>,
}

impl MigrationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts `entry` at the front of the sequence.
    pub fn prepend(&mut self, entry: MigrationHistoryEntry) {
        self.entries.insert(0, entry);
    }

    pub fn entries(&self) -> &[MigrationHistoryEntry] {
        &self.entries
    }

    pub fn latest(&self) -> Option<&MigrationHistoryEntry> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
