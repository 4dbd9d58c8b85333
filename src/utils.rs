//! Utility functions

use crate::constants::APP_NAME;
use chrono::{Local, TimeZone};
use std::path::PathBuf;

/// Per-user data directory holding the database, settings and logs
pub fn get_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Get the cache directory path
pub fn get_cache_dir() -> PathBuf {
    get_data_dir().join("cache")
}

/// Format a millisecond Unix timestamp for display, "Never" for zero
pub fn format_timestamp(millis: i64) -> String {
    if millis <= 0 {
        return "Never".to_string();
    }
    match Local.timestamp_millis_opt(millis).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None => "Unknown".to_string(),
    }
}

/// Hostname without scheme for row subtitles
pub fn display_host(hostname: &str) -> &str {
    hostname
        .split_once("://")
        .map_or(hostname, |(_, rest)| rest)
        .trim_end_matches('/')
}
