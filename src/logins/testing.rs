//! In-memory fakes shared by the list tests

use super::{Guid, Login};
use crate::icons::{FaviconError, FaviconService, Icon};
use crate::store::{LoginStore, StoreError, StoreResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use url::Url;

pub(crate) fn login(guid: &str, hostname: &str) -> Login {
    Login {
        guid: guid.to_string(),
        hostname: hostname.to_string(),
        username: format!("user-{}", guid),
        password: "hunter2".to_string(),
        http_realm: None,
        form_submit_url: None,
        time_created: 0,
        time_last_used: 0,
        sync_status: Default::default(),
    }
}

pub(crate) fn icon(url: &str) -> Icon {
    Icon {
        url: url.to_string(),
        data: vec![0u8; 4],
    }
}

fn failure() -> StoreError {
    StoreError::Sqlite(rusqlite::Error::InvalidQuery)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StoreCall {
    GetAll,
    Search(String),
    Remove(Vec<Guid>),
    HasSynced,
}

/// Store backed by a vector, recording every call. Searches and removals can
/// be held open with [`MockStore::hold`] and [`MockStore::hold_remove`] to
/// exercise out-of-order completion.
#[derive(Default)]
pub(crate) struct MockStore {
    logins: Mutex<Vec<Login>>,
    calls: Mutex<Vec<StoreCall>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    remove_gate: Mutex<Option<Arc<Notify>>>,
    pub synced: AtomicBool,
    pub fail_queries: AtomicBool,
    pub fail_remove: AtomicBool,
    pub fail_synced_check: AtomicBool,
}

impl MockStore {
    pub fn with_logins(logins: Vec<Login>) -> Arc<Self> {
        let store = Self::default();
        *store.logins.lock().unwrap() = logins;
        Arc::new(store)
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn set_logins(&self, logins: Vec<Login>) {
        *self.logins.lock().unwrap() = logins;
    }

    /// Block searches for `query` until [`MockStore::release`] is called.
    pub fn hold(&self, query: &str) {
        self.gates
            .lock()
            .unwrap()
            .insert(query.to_string(), Arc::new(Notify::new()));
    }

    pub fn release(&self, query: &str) {
        if let Some(gate) = self.gates.lock().unwrap().remove(query) {
            gate.notify_one();
        }
    }

    /// Block removals until [`MockStore::release_remove`] is called.
    pub fn hold_remove(&self) {
        *self.remove_gate.lock().unwrap() = Some(Arc::new(Notify::new()));
    }

    pub fn release_remove(&self) {
        if let Some(gate) = self.remove_gate.lock().unwrap().take() {
            gate.notify_one();
        }
    }

    fn record(&self, call: StoreCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl LoginStore for MockStore {
    async fn get_all_logins(&self) -> StoreResult<Vec<Login>> {
        self.record(StoreCall::GetAll);
        if self.fail_queries.load(Ordering::SeqCst) {
            return Err(failure());
        }
        Ok(self.logins.lock().unwrap().clone())
    }

    async fn search_logins(&self, query: &str) -> StoreResult<Vec<Login>> {
        self.record(StoreCall::Search(query.to_string()));
        let gate = self.gates.lock().unwrap().get(query).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.fail_queries.load(Ordering::SeqCst) {
            return Err(failure());
        }
        let needle = query.to_lowercase();
        Ok(self
            .logins
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.hostname.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn remove_logins(&self, ids: &[Guid]) -> StoreResult<()> {
        self.record(StoreCall::Remove(ids.to_vec()));
        let gate = self.remove_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.fail_remove.load(Ordering::SeqCst) {
            return Err(failure());
        }
        self.logins.lock().unwrap().retain(|l| !ids.contains(&l.guid));
        Ok(())
    }

    async fn has_synced_logins(&self) -> StoreResult<bool> {
        self.record(StoreCall::HasSynced);
        if self.fail_synced_check.load(Ordering::SeqCst) {
            return Err(failure());
        }
        Ok(self.synced.load(Ordering::SeqCst))
    }
}

/// Favicon service answering from a host → icons table; unknown hosts fail.
#[derive(Default)]
pub(crate) struct MockIcons {
    icons: HashMap<String, Vec<Icon>>,
}

impl MockIcons {
    pub fn with(mut self, host: &str, icons: Vec<Icon>) -> Self {
        self.icons.insert(host.to_string(), icons);
        self
    }
}

#[async_trait]
impl FaviconService for MockIcons {
    async fn fetch_icons(&self, url: &Url) -> Result<Vec<Icon>, FaviconError> {
        let host = url.host_str().unwrap_or_default();
        self.icons
            .get(host)
            .cloned()
            .ok_or_else(|| FaviconError::NotFound(host.to_string()))
    }
}
