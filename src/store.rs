//! Login storage contract consumed by the list controller

use crate::logins::{Guid, Login};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error("failed to read import file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse import file: {0}")]
    Json(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait LoginStore: Send + Sync {
    async fn get_all_logins(&self) -> StoreResult<Vec<Login>>;

    /// Logins matching `query`; the empty string matches everything.
    async fn search_logins(&self, query: &str) -> StoreResult<Vec<Login>>;

    async fn remove_logins(&self, ids: &[Guid]) -> StoreResult<()>;

    async fn has_synced_logins(&self) -> StoreResult<bool>;
}
