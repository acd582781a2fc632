use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::CatalogSource;
use crate::error::{LoadError, NotFoundError};
use crate::state::data::{CatalogItem, ItemId};

/// The Library manages the SQLite catalog snapshot.
/// It stores the last fetched product list so the storefront can skip
/// requests while the snapshot is fresh, and fall back to it when the
/// API is down.
pub struct Library {
    conn: Connection,
    db_path: PathBuf,
}

/// The stored product list plus when and how it was fetched
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Unix timestamp (seconds) of the fetch
    pub fetched_at: i64,
    /// `limit` the snapshot was requested with
    pub requested_limit: usize,
    /// Products in catalog order
    pub items: Vec<CatalogItem>,
}

impl Snapshot {
    /// Younger than `max_age` at `now`
    pub fn is_fresh(&self, now: i64, max_age: Duration) -> bool {
        let max_age = i64::try_from(max_age.as_secs()).unwrap_or(i64::MAX);
        now.saturating_sub(self.fetched_at) < max_age
    }

    /// Holds everything a request for `limit` products would return
    pub fn covers(&self, limit: usize) -> bool {
        self.requested_limit >= limit
    }

    /// First `limit` products
    pub fn take(&self, limit: usize) -> Vec<CatalogItem> {
        self.items.iter().take(limit).cloned().collect()
    }
}

impl Library {
    /// Open (or create) the snapshot database at `db_path`.
    ///
    /// The parent directory is created if needed.
    pub fn open(db_path: &Path) -> Result<Self, LoadError> {
        // Ensure the parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                LoadError::Cache(format!("Failed to create cache directory: {}", e))
            })?;
        }

        let conn = Connection::open(db_path)?;

        let library = Library {
            conn,
            db_path: db_path.to_path_buf(),
        };
        library.init_schema()?;

        Ok(library)
    }

    /// Initialize the database schema.
    /// Creates all necessary tables and indexes if they don't exist.
    fn init_schema(&self) -> Result<(), LoadError> {
        // One row per product; payload is the API JSON as received
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS products (
                id              INTEGER PRIMARY KEY,
                position        INTEGER NOT NULL,
                payload_json    TEXT NOT NULL
            )",
            [],
        )?;

        // Single row describing the current snapshot
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS snapshot (
                id              INTEGER PRIMARY KEY CHECK (id = 1),
                fetched_at      INTEGER NOT NULL,
                requested_limit INTEGER NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_products_position
             ON products(position)",
            [],
        )?;

        Ok(())
    }

    /// Replace the snapshot with `items`
    pub fn store_snapshot(
        &mut self,
        items: &[CatalogItem],
        requested_limit: usize,
        fetched_at: i64,
    ) -> Result<(), LoadError> {
        let tx = self.conn.transaction()?;

        tx.execute("DELETE FROM products", [])?;
        {
            let mut insert = tx.prepare(
                "INSERT OR REPLACE INTO products (id, position, payload_json) VALUES (?1, ?2, ?3)",
            )?;
            for (position, item) in items.iter().enumerate() {
                let payload = serde_json::to_string(item)?;
                insert.execute(params![item.id as i64, position as i64, payload])?;
            }
        }
        tx.execute(
            "INSERT OR REPLACE INTO snapshot (id, fetched_at, requested_limit) VALUES (1, ?1, ?2)",
            params![fetched_at, requested_limit as i64],
        )?;

        tx.commit()?;
        debug!("Stored snapshot of {} products", items.len());
        Ok(())
    }

    /// Current snapshot, if one was ever stored
    pub fn snapshot(&self) -> Result<Option<Snapshot>, LoadError> {
        let meta: Option<(i64, i64)> = self
            .conn
            .query_row(
                "SELECT fetched_at, requested_limit FROM snapshot WHERE id = 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((fetched_at, requested_limit)) = meta else {
            return Ok(None);
        };

        let mut stmt = self
            .conn
            .prepare("SELECT payload_json FROM products ORDER BY position")?;
        let payloads = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut items = Vec::new();
        for payload in payloads {
            items.push(serde_json::from_str(&payload?)?);
        }

        Ok(Some(Snapshot {
            fetched_at,
            requested_limit: usize::try_from(requested_limit).unwrap_or_default(),
            items,
        }))
    }

    /// One cached product, if the snapshot is younger than `max_age`
    pub fn fresh_item(
        &self,
        id: ItemId,
        now: i64,
        max_age: Duration,
    ) -> Result<Option<CatalogItem>, LoadError> {
        let fetched_at: Option<i64> = self
            .conn
            .query_row("SELECT fetched_at FROM snapshot WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()?;

        let max_age = i64::try_from(max_age.as_secs()).unwrap_or(i64::MAX);
        match fetched_at {
            Some(fetched_at) if now.saturating_sub(fetched_at) < max_age => {}
            _ => return Ok(None),
        }

        let payload: Option<String> = self
            .conn
            .query_row(
                "SELECT payload_json FROM products WHERE id = ?1",
                params![id as i64],
                |row| row.get(0),
            )
            .optional()?;

        payload
            .map(|json| serde_json::from_str(&json).map_err(LoadError::from))
            .transpose()
    }
}

// Implement Debug for better error messages
impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("db_path", &self.db_path)
            .finish()
    }
}

/// Catalog source that revalidates through a local snapshot.
///
/// A fresh snapshot answers without touching `upstream`; a stale one is
/// refreshed, and still served if the refresh fails.
#[derive(Debug, Clone)]
pub struct CachedSource<S> {
    upstream: S,
    db_path: PathBuf,
    revalidate: Duration,
}

impl<S: CatalogSource> CachedSource<S> {
    pub fn new(upstream: S, db_path: PathBuf, revalidate: Duration) -> Self {
        Self {
            upstream,
            db_path,
            revalidate,
        }
    }

    /// Run `f` against the database on the blocking pool.
    ///
    /// rusqlite::Connection is not Send, so each task opens its own.
    async fn with_library<T, F>(&self, f: F) -> Result<T, LoadError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Library) -> Result<T, LoadError> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        tokio::task::spawn_blocking(move || {
            let mut library = Library::open(&db_path)?;
            f(&mut library)
        })
        .await
        .map_err(|e| LoadError::Cache(format!("Task join error: {}", e)))?
    }
}

impl<S: CatalogSource> CatalogSource for CachedSource<S> {
    async fn fetch_catalog(&self, limit: usize) -> Result<Vec<CatalogItem>, LoadError> {
        let now = Utc::now().timestamp();

        // A broken cache only costs us the shortcut
        let snapshot = self
            .with_library(|library| library.snapshot())
            .await
            .unwrap_or_else(|e| {
                warn!("Catalog cache unavailable: {}", e);
                None
            });

        if let Some(snapshot) = &snapshot {
            if snapshot.is_fresh(now, self.revalidate) && snapshot.covers(limit) {
                info!("Serving {} products from cache", snapshot.items.len().min(limit));
                return Ok(snapshot.take(limit));
            }
        }

        match self.upstream.fetch_catalog(limit).await {
            Ok(items) => {
                let stored = items.clone();
                if let Err(e) = self
                    .with_library(move |library| library.store_snapshot(&stored, limit, now))
                    .await
                {
                    warn!("Failed to update catalog cache: {}", e);
                }
                Ok(items)
            }
            Err(err) => match snapshot {
                Some(snapshot) if !snapshot.items.is_empty() => {
                    warn!(
                        "Catalog fetch failed ({}); serving {} products from a stale snapshot",
                        err,
                        snapshot.items.len().min(limit)
                    );
                    Ok(snapshot.take(limit))
                }
                _ => Err(err),
            },
        }
    }

    async fn fetch_item(&self, id: ItemId) -> Result<CatalogItem, NotFoundError> {
        let now = Utc::now().timestamp();
        let max_age = self.revalidate;

        match self
            .with_library(move |library| library.fresh_item(id, now, max_age))
            .await
        {
            Ok(Some(item)) => {
                debug!("Product {} served from cache", id);
                return Ok(item);
            }
            Ok(None) => {}
            Err(e) => warn!("Catalog cache unavailable: {}", e),
        }

        self.upstream.fetch_item(id).await
    }
}
