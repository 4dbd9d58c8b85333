//! Application constants and configuration

pub const APP_NAME: &str = "Login Manager";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Database file inside the data directory
pub const DB_FILE: &str = "logins.db";
/// Logins imported into an empty database on first start
pub const IMPORT_FILE: &str = "logins.json";
