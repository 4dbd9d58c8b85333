//! Database module for Login Manager
//! SQLite storage for saved logins

use crate::logins::{Guid, Login, SyncStatus};
use crate::store::{LoginStore, StoreResult};
use async_trait::async_trait;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, error};

const LOGIN_COLUMNS: &str = "guid, hostname, username, password, http_realm, form_submit_url,
     time_created, time_last_used, sync_status";

pub struct SqliteLoginStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteLoginStore {
    /// Open or create the database at the given path
    pub fn open(path: &Path) -> rusqlite::Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        debug!(path = %path.display(), "Database opened");
        Ok(store)
    }

    fn init_schema(&self) -> rusqlite::Result<()> {
        self.lock().execute_batch(
            "CREATE TABLE IF NOT EXISTS logins (
                guid TEXT PRIMARY KEY NOT NULL,
                hostname TEXT NOT NULL,
                username TEXT NOT NULL DEFAULT '',
                password TEXT NOT NULL DEFAULT '',
                http_realm TEXT,
                form_submit_url TEXT,
                time_created INTEGER NOT NULL DEFAULT 0,
                time_last_used INTEGER NOT NULL DEFAULT 0,
                sync_status TEXT NOT NULL DEFAULT 'new'
            );

            CREATE INDEX IF NOT EXISTS idx_logins_hostname ON logins(hostname);
            CREATE INDEX IF NOT EXISTS idx_logins_sync_status ON logins(sync_status);",
        )
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run a blocking closure against the connection off the async runtime.
    async fn with_conn<T, F>(&self, f: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> rusqlite::Result<T> + Send + 'static,
    {
        let conn = self.conn.clone();
        let result = tokio::task::spawn_blocking(move || {
            let mut conn = conn.lock().unwrap_or_else(PoisonError::into_inner);
            f(&mut conn)
        })
        .await??;
        Ok(result)
    }

    /// Number of stored logins
    pub fn login_count(&self) -> StoreResult<usize> {
        let count: i64 = self
            .lock()
            .query_row("SELECT COUNT(*) FROM logins", [], |r| r.get(0))?;
        Ok(count as usize)
    }

    /// Insert or update logins by guid
    pub fn import_logins(&self, logins: &[Login]) -> StoreResult<usize> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        let mut imported = 0;

        for login in logins {
            let result = tx.execute(
                "INSERT INTO logins (guid, hostname, username, password, http_realm,
                                     form_submit_url, time_created, time_last_used, sync_status)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                 ON CONFLICT(guid) DO UPDATE SET
                    hostname = excluded.hostname,
                    username = excluded.username,
                    password = excluded.password,
                    http_realm = excluded.http_realm,
                    form_submit_url = excluded.form_submit_url,
                    time_created = excluded.time_created,
                    time_last_used = excluded.time_last_used,
                    sync_status = excluded.sync_status",
                params![
                    login.guid,
                    login.hostname,
                    login.username,
                    login.password,
                    login.http_realm,
                    login.form_submit_url,
                    login.time_created,
                    login.time_last_used,
                    login.sync_status.as_str(),
                ],
            );

            match result {
                Ok(_) => imported += 1,
                Err(e) => error!(guid = %login.guid, error = %e, "Failed to import login"),
            }
        }

        tx.commit()?;
        debug!(imported = imported, total = logins.len(), "Logins imported");
        Ok(imported)
    }

    /// Import a JSON array of logins from disk
    pub fn import_file(&self, path: &Path) -> StoreResult<usize> {
        let data = std::fs::read_to_string(path)?;
        let logins: Vec<Login> = serde_json::from_str(&data)?;
        self.import_logins(&logins)
    }
}

fn row_to_login(row: &Row<'_>) -> rusqlite::Result<Login> {
    Ok(Login {
        guid: row.get(0)?,
        hostname: row.get(1)?,
        username: row.get(2)?,
        password: row.get(3)?,
        http_realm: row.get(4)?,
        form_submit_url: row.get(5)?,
        time_created: row.get(6)?,
        time_last_used: row.get(7)?,
        sync_status: SyncStatus::parse(&row.get::<_, String>(8)?),
    })
}

/// Escape LIKE wildcards so the query matches literally.
fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl LoginStore for SqliteLoginStore {
    async fn get_all_logins(&self) -> StoreResult<Vec<Login>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {LOGIN_COLUMNS} FROM logins ORDER BY hostname COLLATE NOCASE"
            ))?;
            let logins = stmt
                .query_map([], row_to_login)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(logins)
        })
        .await
    }

    async fn search_logins(&self, query: &str) -> StoreResult<Vec<Login>> {
        let pattern = like_pattern(query);
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {LOGIN_COLUMNS} FROM logins
                 WHERE hostname LIKE ?1 ESCAPE '\\'
                    OR username LIKE ?1 ESCAPE '\\'
                    OR http_realm LIKE ?1 ESCAPE '\\'
                 ORDER BY hostname COLLATE NOCASE"
            ))?;
            let logins = stmt
                .query_map(params![pattern], row_to_login)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(logins)
        })
        .await
    }

    async fn remove_logins(&self, ids: &[Guid]) -> StoreResult<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let ids = ids.to_vec();
        let removed = self
            .with_conn(move |conn| {
                let tx = conn.transaction()?;
                let mut removed = 0;
                for chunk in ids.chunks(500) {
                    let placeholders = vec!["?"; chunk.len()].join(", ");
                    removed += tx.execute(
                        &format!("DELETE FROM logins WHERE guid IN ({placeholders})"),
                        params_from_iter(chunk.iter()),
                    )?;
                }
                tx.commit()?;
                Ok(removed)
            })
            .await?;
        debug!(removed = removed, "Logins removed");
        Ok(())
    }

    async fn has_synced_logins(&self) -> StoreResult<bool> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM logins WHERE sync_status != 'new')",
                [],
                |r| r.get(0),
            )
        })
        .await
    }
}
