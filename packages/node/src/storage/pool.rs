//! The shared database handle.
//!
//! A [`Pool`] wraps one `rusqlite` connection in an `Arc<Mutex<_>>` so it can
//! be cloned into every component that needs storage. Blocking calls are
//! offloaded with `tokio::task::spawn_blocking`; the lock is held only for
//! the duration of a single [`Pool::run`] closure.
//!
//! The pool is built once at startup and passed down explicitly. Opening
//! fails in the constructor, so there is no way to reach the database before
//! it exists. A closed pool fails every later call, including calls made
//! through clones.
//!
//! # Schema
//!
//! - `groups`: collections of organizations.
//! - `organizations`: podcast owners.
//! - `podcasts`: audio items.
//!
//! Timestamps are `TEXT` columns defaulting to `CURRENT_TIMESTAMP`.

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use super::StorageError;

pub(crate) const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS groups (
    slug        TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    note        TEXT NOT NULL DEFAULT '',
    created_at  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS organizations (
    slug        TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    note        TEXT NOT NULL DEFAULT '',
    created_at  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS podcasts (
    slug          TEXT PRIMARY KEY,
    name          TEXT NOT NULL,
    note          TEXT NOT NULL DEFAULT '',
    thumbnail_url TEXT NOT NULL DEFAULT '',
    audio_url     TEXT NOT NULL DEFAULT '',
    media_type    TEXT NOT NULL DEFAULT '',
    posted_at     TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    created_at    TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at    TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);
";

/// Cloneable handle to the node's database connection.
#[derive(Clone)]
pub struct Pool {
    /// `None` once [`Pool::close`] has run.
    conn: Arc<Mutex<Option<Connection>>>,
}

impl Pool {
    /// Open (or create) the SQLite database at `path` and apply the schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        Self::with_schema(conn)
    }

    /// Open an in-memory database (data is lost when the pool is dropped).
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        Self::with_schema(conn)
    }

    fn with_schema(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self::from_connection(conn))
    }

    pub(crate) fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(Some(conn))),
        }
    }

    /// Close the connection for every clone of this pool.
    ///
    /// SQLite discards an open transaction when its connection closes.
    pub(crate) fn close(&self) -> Result<(), StorageError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| StorageError::Internal("connection mutex poisoned".into()))?
            .take();
        if let Some(conn) = conn {
            conn.close().map_err(|(_, e)| StorageError::from(e))?;
        }
        Ok(())
    }

    /// Run `f` against the shared connection on the blocking thread pool.
    pub async fn run<T, F>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || -> Result<T, StorageError> {
            let guard = conn
                .lock()
                .map_err(|_| StorageError::Internal("connection mutex poisoned".into()))?;
            let conn = open_connection(&guard)?;
            f(conn)
        })
        .await
        .map_err(|e| StorageError::Internal(format!("task join error: {e}")))?
    }
}

fn open_connection(slot: &Option<Connection>) -> Result<&Connection, StorageError> {
    slot.as_ref()
        .ok_or_else(|| StorageError::Internal("connection closed".into()))
}

impl std::fmt::Debug for Pool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pool").finish_non_exhaustive()
    }
}
