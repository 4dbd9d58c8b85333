//! List screen controller
//!
//! Owns the data source, selection and favicon cache and drives the store.
//! Store calls and favicon fetches run on the tokio runtime; their results come
//! back through a channel that the UI drains with [`ListController::poll`], so
//! every mutation of list state happens on the UI thread.
//!
//! Each list query gets a generation number. Only the result of the most
//! recently issued query may replace the snapshot; anything older is dropped
//! when it arrives. Queries requested while a delete is running are held back
//! and the latest one is issued once the delete and its refresh have finished.

use super::data_source::SectionedDataSource;
use super::favicons::FaviconCache;
use super::selection::SelectionTracker;
use super::{Guid, Login, Position};
use crate::icons::{FaviconService, Icon};
use crate::store::{LoginStore, StoreResult};
use std::future::Future;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

/// Called from background tasks after a result has been queued.
pub type Waker = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Viewing,
    Searching,
}

/// What a row tap did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowTap {
    OpenDetail(Login),
    Toggled { selected: bool },
    Ignored,
}

/// Pending bulk-delete confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteConfirmation {
    pub count: usize,
    /// Some logins are synced, so the delete reaches other devices
    pub synced: bool,
}

impl DeleteConfirmation {
    pub fn title(&self) -> String {
        if self.count == 1 {
            "Remove Login?".to_string()
        } else {
            format!("Remove {} Logins?", self.count)
        }
    }

    pub fn message(&self) -> &'static str {
        if self.synced {
            "Logins will be removed from all of your synced devices."
        } else {
            "Logins will be permanently removed from this device."
        }
    }
}

#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub load_favicons: bool,
    pub favicon_concurrency: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            load_favicons: true,
            favicon_concurrency: 8,
        }
    }
}

enum Query {
    All,
    Search(String),
}

enum UiEvent {
    QueryFinished {
        generation: u64,
        result: StoreResult<Vec<Login>>,
    },
    SyncChecked {
        session: u64,
        result: StoreResult<bool>,
    },
    DeleteFinished {
        generation: u64,
        session: u64,
        removed: StoreResult<()>,
        refreshed: Option<StoreResult<Vec<Login>>>,
    },
    FaviconLoaded {
        login: Login,
        icons: Vec<Icon>,
    },
    FaviconFailed {
        guid: Guid,
    },
}

pub struct ListController {
    store: Arc<dyn LoginStore>,
    runtime: Handle,
    data: SectionedDataSource,
    selection: SelectionTracker<Guid>,
    favicons: FaviconCache,
    load_favicons: bool,
    mode: Mode,
    editing: bool,
    /// Bumped every time edit mode is entered
    edit_session: u64,
    search_text: String,
    latest_generation: u64,
    loading: bool,
    checking_sync: bool,
    deleting: bool,
    /// Latest query requested while a delete was running
    deferred: Option<Query>,
    confirmation: Option<DeleteConfirmation>,
    events_tx: UnboundedSender<UiEvent>,
    events_rx: UnboundedReceiver<UiEvent>,
    /// Spawned tasks whose result has not been handled yet
    outstanding: usize,
    waker: Waker,
}

impl ListController {
    pub fn new(
        store: Arc<dyn LoginStore>,
        icons: Arc<dyn FaviconService>,
        runtime: Handle,
        config: ControllerConfig,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            store,
            runtime,
            data: SectionedDataSource::new(),
            selection: SelectionTracker::new(),
            favicons: FaviconCache::new(icons, config.favicon_concurrency),
            load_favicons: config.load_favicons,
            mode: Mode::Viewing,
            editing: false,
            edit_session: 0,
            search_text: String::new(),
            latest_generation: 0,
            loading: false,
            checking_sync: false,
            deleting: false,
            deferred: None,
            confirmation: None,
            events_tx,
            events_rx,
            outstanding: 0,
            waker: Arc::new(|| {}),
        }
    }

    pub fn set_waker(&mut self, waker: Waker) {
        self.waker = waker;
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Load the full list.
    pub fn load(&mut self) {
        self.issue_query(Query::All);
    }

    fn next_generation(&mut self) -> u64 {
        self.latest_generation += 1;
        self.loading = true;
        self.latest_generation
    }

    fn issue_query(&mut self, query: Query) {
        if self.deleting {
            debug!("Delete running, deferring query");
            self.deferred = Some(query);
            return;
        }
        let generation = self.next_generation();
        let store = self.store.clone();
        match query {
            Query::All => {
                debug!(generation, "Loading all logins");
                self.spawn(async move {
                    let result = store.get_all_logins().await;
                    UiEvent::QueryFinished { generation, result }
                });
            }
            Query::Search(text) => {
                debug!(generation, query = %text, "Searching logins");
                self.spawn(async move {
                    let result = store.search_logins(&text).await;
                    UiEvent::QueryFinished { generation, result }
                });
            }
        }
    }

    fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = UiEvent> + Send + 'static,
    {
        self.outstanding += 1;
        let tx = self.events_tx.clone();
        let waker = self.waker.clone();
        self.runtime.spawn(async move {
            let event = task.await;
            if tx.send(event).is_ok() {
                waker();
            }
        });
    }

    // ------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------

    /// Search field gained focus.
    pub fn begin_search(&mut self) {
        if self.mode == Mode::Searching {
            return;
        }
        if self.editing {
            self.cancel_editing();
        }
        self.mode = Mode::Searching;
        self.issue_query(Query::All);
    }

    /// Search field lost focus.
    pub fn end_search(&mut self) {
        if self.mode != Mode::Searching {
            return;
        }
        self.mode = Mode::Viewing;
        self.search_text.clear();
        self.issue_query(Query::All);
    }

    pub fn search_text_changed(&mut self, text: &str) {
        self.search_text = text.to_string();
        if self.mode == Mode::Searching {
            self.issue_query(Query::Search(self.search_text.clone()));
        }
    }

    // ------------------------------------------------------------------
    // Editing and selection
    // ------------------------------------------------------------------

    /// Enter multi-select mode. Only allowed while viewing the full list.
    pub fn begin_editing(&mut self) -> bool {
        if self.mode != Mode::Viewing || self.editing || self.deleting {
            return false;
        }
        self.editing = true;
        self.edit_session += 1;
        debug!(session = self.edit_session, "Edit mode entered");
        true
    }

    pub fn cancel_editing(&mut self) {
        if !self.editing {
            return;
        }
        self.editing = false;
        self.selection.deselect_all();
        self.confirmation = None;
        self.checking_sync = false;
        debug!("Edit mode left");
    }

    pub fn tap_row(&mut self, position: Position) -> RowTap {
        let Ok(login) = self.data.record_at(position) else {
            return RowTap::Ignored;
        };
        if self.editing {
            let selected = self.selection.toggle(login.guid.clone());
            RowTap::Toggled { selected }
        } else {
            RowTap::OpenDetail(login.clone())
        }
    }

    /// Select every visible login, or clear the selection when all of them
    /// are already selected.
    pub fn toggle_select_all(&mut self) {
        if !self.editing {
            return;
        }
        if self.selection.count() < self.data.visible_count() {
            for (_, login) in self.data.visible() {
                if !self.selection.is_selected(&login.guid) {
                    self.selection.select(login.guid.clone());
                }
            }
        } else {
            self.selection.deselect_all();
        }
    }

    pub fn select_all_label(&self) -> &'static str {
        if self.selection.count() == self.data.visible_count() && self.data.visible_count() > 0 {
            "Deselect All"
        } else {
            "Select All"
        }
    }

    /// Selected guids in display order.
    pub fn selected_ids(&self) -> Vec<Guid> {
        self.data
            .visible()
            .filter(|(_, login)| self.selection.is_selected(&login.guid))
            .map(|(_, login)| login.guid.clone())
            .collect()
    }

    pub fn is_selected(&self, position: Position) -> bool {
        self.data
            .record_at(position)
            .is_ok_and(|login| self.selection.is_selected(&login.guid))
    }

    // ------------------------------------------------------------------
    // Delete
    // ------------------------------------------------------------------

    /// Ask the store whether synced logins exist, then present a confirmation.
    pub fn request_delete(&mut self) {
        if !self.delete_enabled() {
            return;
        }
        self.checking_sync = true;
        let session = self.edit_session;
        let store = self.store.clone();
        self.spawn(async move {
            let result = store.has_synced_logins().await;
            UiEvent::SyncChecked { session, result }
        });
    }

    pub fn confirm_delete(&mut self) {
        if self.confirmation.take().is_none() {
            return;
        }
        let ids = self.selected_ids();
        if ids.is_empty() {
            return;
        }

        info!(count = ids.len(), "Removing logins");
        self.deleting = true;
        let generation = self.next_generation();
        let session = self.edit_session;
        let store = self.store.clone();
        self.spawn(async move {
            let removed = store.remove_logins(&ids).await;
            let refreshed = match removed {
                Ok(()) => Some(store.get_all_logins().await),
                Err(_) => None,
            };
            UiEvent::DeleteFinished {
                generation,
                session,
                removed,
                refreshed,
            }
        });
    }

    pub fn decline_delete(&mut self) {
        self.confirmation = None;
    }

    // ------------------------------------------------------------------
    // Event handling
    // ------------------------------------------------------------------

    /// Apply every queued background result. Returns true if anything arrived.
    pub fn poll(&mut self) -> bool {
        let mut handled = false;
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
            handled = true;
        }
        handled
    }

    fn handle_event(&mut self, event: UiEvent) {
        self.outstanding = self.outstanding.saturating_sub(1);
        match event {
            UiEvent::QueryFinished { generation, result } => {
                if generation != self.latest_generation {
                    debug!(generation, latest = self.latest_generation, "Discarding superseded query");
                    return;
                }
                self.loading = false;
                match result {
                    Ok(logins) => self.apply_snapshot(logins),
                    Err(e) => warn!(error = %e, "Login query failed"),
                }
            }
            UiEvent::SyncChecked { session, result } => {
                self.checking_sync = false;
                if !self.editing || session != self.edit_session || self.selection.is_empty() {
                    return;
                }
                let synced = result.unwrap_or_else(|e| {
                    warn!(error = %e, "Synced login check failed");
                    true
                });
                self.confirmation = Some(DeleteConfirmation {
                    count: self.selection.count(),
                    synced,
                });
            }
            UiEvent::DeleteFinished {
                generation,
                session,
                removed,
                refreshed,
            } => {
                self.deleting = false;
                let current = generation == self.latest_generation;
                if current {
                    self.loading = false;
                }
                match removed {
                    Err(e) => warn!(error = %e, "Removing logins failed"),
                    Ok(()) => {
                        if self.editing && session == self.edit_session {
                            self.cancel_editing();
                        }
                        match refreshed {
                            Some(Ok(logins)) if current => self.apply_snapshot(logins),
                            Some(Ok(_)) => debug!(generation, "Discarding superseded refresh"),
                            Some(Err(e)) => warn!(error = %e, "Refresh after delete failed"),
                            None => {}
                        }
                    }
                }
                if let Some(query) = self.deferred.take() {
                    self.issue_query(query);
                }
            }
            UiEvent::FaviconLoaded { login, icons } => match self.data.position_of(&login) {
                Some(position) => {
                    debug!(
                        guid = %login.guid,
                        section = position.section,
                        row = position.row,
                        "Favicon loaded"
                    );
                    self.favicons.record_association(login.guid, icons);
                }
                None => self.favicons.forget(&login.guid),
            },
            UiEvent::FaviconFailed { guid } => self.favicons.mark_failed(&guid),
        }
    }

    fn apply_snapshot(&mut self, logins: Vec<Login>) {
        self.data.replace_snapshot(logins);
        let data = &self.data;
        self.selection.retain(|guid| data.is_visible(guid));
        debug!(
            total = self.data.snapshot().len(),
            visible = self.data.visible_count(),
            sections = self.data.section_count(),
            "Snapshot replaced"
        );

        if self.load_favicons {
            let (tx, failed_tx) = (self.events_tx.clone(), self.events_tx.clone());
            let (waker, failed_waker) = (self.waker.clone(), self.waker.clone());
            let started = self.favicons.request_load(
                self.data.visible().map(|(_, login)| login),
                &self.runtime,
                move |login, icons| {
                    if tx.send(UiEvent::FaviconLoaded { login, icons }).is_ok() {
                        waker();
                    }
                },
                move |guid| {
                    if failed_tx.send(UiEvent::FaviconFailed { guid }).is_ok() {
                        failed_waker();
                    }
                },
            );
            self.outstanding += started;
        }
    }

    /// Cancel outstanding favicon fetches.
    pub fn shutdown(&self) {
        self.favicons.shutdown();
    }

    // ------------------------------------------------------------------
    // Read-only state for the view
    // ------------------------------------------------------------------

    pub fn data_source(&self) -> &SectionedDataSource {
        &self.data
    }

    pub fn best_icon(&self, guid: &str) -> Option<&Icon> {
        self.favicons.best_icon(guid)
    }

    pub fn is_searching(&self) -> bool {
        self.mode == Mode::Searching
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting
    }

    pub fn title(&self) -> String {
        if self.editing && !self.selection.is_empty() {
            format!("{} Selected", self.selection.count())
        } else {
            "Logins".to_string()
        }
    }

    /// The edit button is hidden while searching.
    pub fn edit_enabled(&self) -> bool {
        self.mode == Mode::Viewing && !self.deleting
    }

    pub fn select_all_visible(&self) -> bool {
        self.editing
    }

    pub fn delete_enabled(&self) -> bool {
        self.editing && !self.selection.is_empty() && !self.deleting && !self.checking_sync
    }

    pub fn pending_confirmation(&self) -> Option<DeleteConfirmation> {
        self.confirmation
    }
}

#[cfg(test)]
impl ListController {
    fn mode(&self) -> Mode {
        self.mode
    }

    fn search_text(&self) -> &str {
        &self.search_text
    }

    fn selection_count(&self) -> usize {
        self.selection.count()
    }

    /// Wait for and handle exactly one background result.
    async fn next_event(&mut self) {
        if let Some(event) = self.events_rx.recv().await {
            self.handle_event(event);
        }
    }

    /// Handle results until no spawned task is outstanding.
    async fn settle(&mut self) {
        while self.outstanding > 0 {
            self.next_event().await;
        }
    }

    fn visible_guids(&self) -> Vec<String> {
        self.data.visible().map(|(_, l)| l.guid.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logins::testing::{icon, login, MockIcons, MockStore, StoreCall};
    use std::sync::atomic::Ordering;

    fn controller(store: Arc<MockStore>) -> ListController {
        controller_with_icons(store, MockIcons::default())
    }

    fn controller_with_icons(store: Arc<MockStore>, icons: MockIcons) -> ListController {
        ListController::new(store, Arc::new(icons), Handle::current(), ControllerConfig::default())
    }

    fn three_sites() -> Vec<Login> {
        vec![
            login("g1", "https://alpha.com"),
            login("g2", "https://beta.com"),
            login("g3", "https://gamma.com"),
        ]
    }

    async fn loaded(store: &Arc<MockStore>) -> ListController {
        let mut c = controller(store.clone());
        c.load();
        c.settle().await;
        c
    }

    #[tokio::test]
    async fn load_populates_sections_and_favicons() {
        let store = MockStore::with_logins(vec![
            login("g1", "https://mail.example.com"),
            login("g2", "https://a.test.com"),
            login("g3", "https://zeta.org"),
            login("g4", "not a host ::"),
        ]);
        let icons = MockIcons::default().with("mail.example.com", vec![icon("ico"), icon("png")]);
        let mut c = controller_with_icons(store, icons);
        c.load();
        assert!(c.is_loading());
        c.settle().await;

        assert!(!c.is_loading());
        assert_eq!(c.data_source().section_titles(), vec!["E", "T", "Z"]);
        assert_eq!(c.data_source().row_count(0), 1);
        assert_eq!(c.best_icon("g1").unwrap().url, "png");
        assert!(c.best_icon("g2").is_none());
    }

    #[tokio::test]
    async fn newer_search_wins_over_slow_older_one() {
        let store = MockStore::with_logins(vec![
            login("g1", "https://abc.com"),
            login("g2", "https://abcd.com"),
            login("g3", "https://xyz.com"),
        ]);
        let mut c = controller(store.clone());
        c.begin_search();
        c.settle().await;
        assert_eq!(c.visible_guids().len(), 3);

        store.hold("abc");
        c.search_text_changed("abc");
        c.search_text_changed("abcd");

        // "abc" is held, so the only result that can arrive is "abcd"
        c.next_event().await;
        assert_eq!(c.visible_guids(), vec!["g2"]);
        assert!(!c.is_loading());

        store.release("abc");
        c.next_event().await;
        assert_eq!(c.visible_guids(), vec!["g2"]);
        assert_eq!(c.outstanding, 0);
    }

    #[tokio::test]
    async fn search_with_empty_text_is_forwarded() {
        let store = MockStore::with_logins(three_sites());
        let mut c = loaded(&store).await;
        c.begin_search();
        c.search_text_changed("");
        c.settle().await;
        assert!(store.calls().contains(&StoreCall::Search(String::new())));
        assert_eq!(c.visible_guids().len(), 3);
    }

    #[tokio::test]
    async fn text_changes_outside_search_issue_nothing() {
        let store = MockStore::with_logins(three_sites());
        let mut c = loaded(&store).await;
        store.clear_calls();
        c.search_text_changed("alp");
        c.settle().await;
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn focus_and_blur_reload_full_list() {
        let store = MockStore::with_logins(three_sites());
        let mut c = loaded(&store).await;
        store.clear_calls();

        c.begin_search();
        assert!(!c.edit_enabled());
        c.search_text_changed("alpha");
        c.settle().await;
        assert_eq!(c.visible_guids(), vec!["g1"]);

        c.end_search();
        c.settle().await;
        assert!(c.edit_enabled());
        assert_eq!(c.mode(), Mode::Viewing);
        assert_eq!(c.visible_guids().len(), 3);
        assert_eq!(
            store.calls(),
            vec![StoreCall::GetAll, StoreCall::Search("alpha".into()), StoreCall::GetAll]
        );
    }

    #[tokio::test]
    async fn searching_cancels_editing() {
        let store = MockStore::with_logins(three_sites());
        let mut c = loaded(&store).await;
        assert!(c.begin_editing());
        c.tap_row(Position::new(0, 0));
        assert_eq!(c.selection_count(), 1);

        c.begin_search();
        assert!(!c.is_editing());
        assert_eq!(c.selection_count(), 0);
        assert!(!c.begin_editing());
    }

    #[tokio::test]
    async fn row_tap_navigates_or_toggles() {
        let store = MockStore::with_logins(three_sites());
        let mut c = loaded(&store).await;

        assert_eq!(
            c.tap_row(Position::new(1, 0)),
            RowTap::OpenDetail(login("g2", "https://beta.com"))
        );
        assert_eq!(c.tap_row(Position::new(9, 0)), RowTap::Ignored);

        c.begin_editing();
        assert_eq!(c.tap_row(Position::new(1, 0)), RowTap::Toggled { selected: true });
        assert!(c.is_selected(Position::new(1, 0)));
        assert_eq!(c.title(), "1 Selected");
        assert_eq!(c.tap_row(Position::new(1, 0)), RowTap::Toggled { selected: false });
        assert_eq!(c.title(), "Logins");
    }

    #[tokio::test]
    async fn select_all_toggles_in_pairs() {
        let store = MockStore::with_logins(three_sites());
        let mut c = loaded(&store).await;
        c.begin_editing();
        assert!(c.select_all_visible());
        assert_eq!(c.select_all_label(), "Select All");

        c.toggle_select_all();
        assert_eq!(c.selection_count(), 3);
        assert_eq!(c.select_all_label(), "Deselect All");

        c.toggle_select_all();
        assert_eq!(c.selection_count(), 0);
        assert_eq!(c.select_all_label(), "Select All");
    }

    #[tokio::test]
    async fn select_all_fills_partial_selection() {
        let store = MockStore::with_logins(three_sites());
        let mut c = loaded(&store).await;
        c.begin_editing();
        c.tap_row(Position::new(2, 0));
        c.toggle_select_all();
        assert_eq!(c.selection_count(), 3);
    }

    #[tokio::test]
    async fn cancel_editing_clears_selection() {
        let store = MockStore::with_logins(three_sites());
        let mut c = loaded(&store).await;
        c.begin_editing();
        c.toggle_select_all();
        c.cancel_editing();
        assert!(!c.is_editing());
        assert!(!c.select_all_visible());
        assert_eq!(c.selection_count(), 0);
        assert_eq!(c.title(), "Logins");
    }

    #[tokio::test]
    async fn delete_removes_selection_then_refreshes_once() {
        let store = MockStore::with_logins(three_sites());
        let mut c = loaded(&store).await;
        c.begin_editing();
        c.tap_row(Position::new(1, 0));
        c.tap_row(Position::new(0, 0));
        assert!(c.delete_enabled());

        c.request_delete();
        c.settle().await;
        let confirmation = c.pending_confirmation().unwrap();
        assert_eq!(confirmation.count, 2);
        assert!(!confirmation.synced);

        store.clear_calls();
        c.confirm_delete();
        c.settle().await;

        assert_eq!(
            store.calls(),
            vec![
                StoreCall::Remove(vec!["g1".into(), "g2".into()]),
                StoreCall::GetAll
            ]
        );
        assert_eq!(c.selection_count(), 0);
        assert!(!c.is_editing());
        assert_eq!(c.visible_guids(), vec!["g3"]);
        assert!(c.pending_confirmation().is_none());
    }

    #[tokio::test]
    async fn query_during_delete_waits_for_refresh() {
        let store = MockStore::with_logins(three_sites());
        let mut c = loaded(&store).await;
        c.begin_editing();
        c.tap_row(Position::new(0, 0));
        c.request_delete();
        c.settle().await;

        store.hold_remove();
        store.clear_calls();
        c.confirm_delete();
        c.begin_search();
        assert!(c.is_searching());
        assert!(!c.is_editing());

        store.release_remove();
        c.settle().await;

        assert_eq!(
            store.calls(),
            vec![
                StoreCall::Remove(vec!["g1".into()]),
                StoreCall::GetAll,
                StoreCall::GetAll
            ]
        );
        assert_eq!(c.visible_guids(), vec!["g2", "g3"]);
        assert!(!c.is_deleting());
        assert!(!c.is_loading());
    }

    #[tokio::test]
    async fn latest_search_during_delete_is_issued_after_it() {
        let store = MockStore::with_logins(three_sites());
        let mut c = loaded(&store).await;
        c.begin_editing();
        c.toggle_select_all();
        c.tap_row(Position::new(2, 0));
        c.request_delete();
        c.settle().await;

        store.hold_remove();
        store.clear_calls();
        c.confirm_delete();
        c.begin_search();
        c.search_text_changed("a");
        c.search_text_changed("alpha");

        store.release_remove();
        c.settle().await;

        assert_eq!(
            store.calls(),
            vec![
                StoreCall::Remove(vec!["g1".into(), "g2".into()]),
                StoreCall::GetAll,
                StoreCall::Search("alpha".into())
            ]
        );
        assert!(c.visible_guids().is_empty());
        assert_eq!(c.search_text(), "alpha");
    }

    #[tokio::test]
    async fn synced_logins_change_confirmation_wording() {
        let store = MockStore::with_logins(three_sites());
        store.synced.store(true, Ordering::SeqCst);
        let mut c = loaded(&store).await;
        c.begin_editing();
        c.tap_row(Position::new(0, 0));
        c.request_delete();
        c.settle().await;
        let confirmation = c.pending_confirmation().unwrap();
        assert!(confirmation.synced);
        assert!(confirmation.message().contains("synced devices"));
        assert_eq!(confirmation.title(), "Remove Login?");
    }

    #[tokio::test]
    async fn failed_sync_check_warns_about_sync() {
        let store = MockStore::with_logins(three_sites());
        store.fail_synced_check.store(true, Ordering::SeqCst);
        let mut c = loaded(&store).await;
        c.begin_editing();
        c.tap_row(Position::new(0, 0));
        c.request_delete();
        c.settle().await;
        assert!(c.pending_confirmation().unwrap().synced);
    }

    #[tokio::test]
    async fn declined_delete_changes_nothing() {
        let store = MockStore::with_logins(three_sites());
        let mut c = loaded(&store).await;
        c.begin_editing();
        c.tap_row(Position::new(0, 0));
        c.request_delete();
        c.settle().await;

        store.clear_calls();
        c.decline_delete();
        c.confirm_delete();
        c.settle().await;

        assert!(store.calls().is_empty());
        assert!(c.is_editing());
        assert_eq!(c.selection_count(), 1);
        assert_eq!(c.visible_guids().len(), 3);
    }

    #[tokio::test]
    async fn failed_delete_keeps_state() {
        let store = MockStore::with_logins(three_sites());
        store.fail_remove.store(true, Ordering::SeqCst);
        let mut c = loaded(&store).await;
        c.begin_editing();
        c.tap_row(Position::new(0, 0));
        c.request_delete();
        c.settle().await;

        store.clear_calls();
        c.confirm_delete();
        c.settle().await;

        assert_eq!(store.calls(), vec![StoreCall::Remove(vec!["g1".into()])]);
        assert!(c.is_editing());
        assert_eq!(c.selection_count(), 1);
        assert_eq!(c.visible_guids().len(), 3);
        assert!(!c.is_deleting());
    }

    #[tokio::test]
    async fn failed_query_keeps_snapshot_and_selection() {
        let store = MockStore::with_logins(three_sites());
        let mut c = loaded(&store).await;
        c.begin_editing();
        c.tap_row(Position::new(0, 0));

        store.fail_queries.store(true, Ordering::SeqCst);
        c.load();
        c.settle().await;

        assert!(!c.is_loading());
        assert_eq!(c.visible_guids().len(), 3);
        assert_eq!(c.selection_count(), 1);
    }

    #[tokio::test]
    async fn reload_drops_selection_of_vanished_logins() {
        let store = MockStore::with_logins(three_sites());
        let mut c = loaded(&store).await;
        c.begin_editing();
        c.toggle_select_all();

        store.set_logins(vec![login("g3", "https://gamma.com"), login("g4", "https://delta.com")]);
        c.load();
        c.settle().await;

        assert_eq!(c.selected_ids(), vec!["g3".to_string()]);
        assert_eq!(c.select_all_label(), "Select All");
    }

    #[tokio::test]
    async fn favicon_for_removed_login_is_ignored() {
        let store = MockStore::with_logins(vec![login("g1", "https://alpha.com")]);
        let mut c = loaded(&store).await;

        store.set_logins(Vec::new());
        c.load();
        c.settle().await;
        assert_eq!(c.data_source().section_count(), 0);

        c.outstanding += 1;
        c.handle_event(UiEvent::FaviconLoaded {
            login: login("g1", "https://alpha.com"),
            icons: vec![icon("late")],
        });
        assert!(c.best_icon("g1").is_none());
    }

    #[tokio::test]
    async fn delete_requires_editing_with_selection() {
        let store = MockStore::with_logins(three_sites());
        let mut c = loaded(&store).await;
        store.clear_calls();

        c.request_delete();
        c.begin_editing();
        c.request_delete();
        c.settle().await;

        assert!(store.calls().is_empty());
        assert!(c.pending_confirmation().is_none());
    }
}
