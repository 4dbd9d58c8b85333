//! Per-login favicon candidates and their background loading

use super::domain::site_url;
use super::{Guid, Login};
use crate::icons::{FaviconService, Icon};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub struct FaviconCache {
    icons: HashMap<Guid, Vec<Icon>>,
    pending: HashSet<Guid>,
    /// Records whose fetch produced nothing; not retried this session
    failed: HashSet<Guid>,
    service: Arc<dyn FaviconService>,
    limiter: Arc<Semaphore>,
    cancel: CancellationToken,
}

impl FaviconCache {
    pub fn new(service: Arc<dyn FaviconService>, max_concurrent: usize) -> Self {
        Self {
            icons: HashMap::new(),
            pending: HashSet::new(),
            failed: HashSet::new(),
            service,
            limiter: Arc::new(Semaphore::new(max_concurrent.max(1))),
            cancel: CancellationToken::new(),
        }
    }

    /// Store the candidates for `id`, replacing whatever was there.
    pub fn record_association(&mut self, id: Guid, icons: Vec<Icon>) {
        self.pending.remove(&id);
        self.icons.insert(id, icons);
    }

    /// Record that the fetch for `id` produced nothing.
    pub fn mark_failed(&mut self, id: &str) {
        if self.pending.remove(id) {
            self.failed.insert(id.to_string());
        }
    }

    /// Drop the in-flight marker for `id` without storing anything.
    pub fn forget(&mut self, id: &str) {
        self.pending.remove(id);
    }

    /// The most recently arrived candidate for `id`.
    pub fn best_icon(&self, id: &str) -> Option<&Icon> {
        self.icons.get(id)?.last()
    }

    /// Start one fetch per record that has a parseable hostname and no stored
    /// association, request in flight or earlier failure. `on_complete` runs on a
    /// runtime worker with the record and its icons and is never called for a
    /// failed fetch; `on_failed` gets the guid instead so the caller can mark it
    /// with [`FaviconCache::mark_failed`]. Neither may touch UI state directly.
    ///
    /// Returns the number of fetches started.
    pub fn request_load<'a, F, G>(
        &mut self,
        records: impl IntoIterator<Item = &'a Login>,
        runtime: &Handle,
        on_complete: F,
        on_failed: G,
    ) -> usize
    where
        F: Fn(Login, Vec<Icon>) + Send + Sync + 'static,
        G: Fn(Guid) + Send + Sync + 'static,
    {
        let on_complete = Arc::new(on_complete);
        let on_failed = Arc::new(on_failed);
        let mut started = 0;

        for record in records {
            if self.icons.contains_key(&record.guid)
                || self.pending.contains(&record.guid)
                || self.failed.contains(&record.guid)
            {
                continue;
            }
            let Some(url) = site_url(&record.hostname) else {
                continue;
            };

            self.pending.insert(record.guid.clone());
            started += 1;

            let record = record.clone();
            let service = self.service.clone();
            let limiter = self.limiter.clone();
            let cancel = self.cancel.clone();
            let on_complete = on_complete.clone();
            let on_failed = on_failed.clone();

            runtime.spawn(async move {
                let result = tokio::select! {
                    _ = cancel.cancelled() => None,
                    result = async {
                        let _permit = limiter.acquire_owned().await.ok();
                        service.fetch_icons(&url).await
                    } => match result {
                        Ok(icons) => Some(icons),
                        Err(e) => {
                            debug!(guid = %record.guid, error = %e, "Favicon fetch failed");
                            None
                        }
                    },
                };
                match result {
                    Some(icons) => on_complete(record, icons),
                    None => on_failed(record.guid),
                }
            });
        }

        if started > 0 {
            debug!(count = started, "Favicon fetches started");
        }
        started
    }

    /// Cancel every outstanding fetch.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
impl FaviconCache {
    fn is_pending(&self, id: &str) -> bool {
        self.pending.contains(id)
    }
}
