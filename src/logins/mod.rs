//! Login list core: record type, sectioned data source, selection, favicons and
//! the controller that ties them to the store.

pub mod controller;
pub mod data_source;
pub mod domain;
pub mod favicons;
pub mod selection;

#[cfg(test)]
pub(crate) mod testing;

use serde::{Deserialize, Serialize};

/// Stable identifier of a stored login.
pub type Guid = String;

/// Sync state of a stored login, as recorded by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    #[default]
    New,
    Changed,
    Synced,
}

impl SyncStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SyncStatus::New => "new",
            SyncStatus::Changed => "changed",
            SyncStatus::Synced => "synced",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "changed" => SyncStatus::Changed,
            "synced" => SyncStatus::Synced,
            _ => SyncStatus::New,
        }
    }
}

/// A saved credential. Read-only to the list core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Login {
    pub guid: Guid,
    pub hostname: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub http_realm: Option<String>,
    #[serde(default)]
    pub form_submit_url: Option<String>,
    /// Milliseconds since the Unix epoch
    #[serde(default)]
    pub time_created: i64,
    #[serde(default)]
    pub time_last_used: i64,
    #[serde(default)]
    pub sync_status: SyncStatus,
}

/// A (section, row) pair in the current section layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub section: usize,
    pub row: usize,
}

impl Position {
    pub fn new(section: usize, row: usize) -> Self {
        Self { section, row }
    }
}
