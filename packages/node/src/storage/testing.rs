//! Transactional storage for tests.
//!
//! A [`TxHarness`] owns a prepared database file: schema applied, shared
//! fixtures committed. [`TxHarness::begin`] hands out a [`TxStorage`] whose
//! connection sits inside a transaction that is never committed; dropping it
//! closes the connection, which discards the transaction. Pool clones taken
//! from the handle are closed with it. Each test therefore starts from exactly the
//! fixture data, whatever earlier tests wrote.
//!
//! Handles from one harness are leased one at a time, so tests running
//! concurrently queue on [`TxHarness::begin`] instead of contending for
//! SQLite's write lock.
//!
//! ```rust,ignore
//! let harness = TxHarness::temporary()?;
//! harness.load_fixtures("INSERT INTO groups (slug, name) VALUES ('news', 'News')").await?;
//!
//! {
//!     let storage = harness.begin().await?;
//!     storage.put_organization("planet", "").await?;
//! } // rolled back here
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use pubcast::{Group, NewPodcast, Organization, Podcast};
use rusqlite::Connection;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{
    pool::{Pool, SCHEMA},
    sqlite::SqliteStorage,
    Storage, StorageError,
};

// ---------------------------------------------------------------------------
// TxHarness
// ---------------------------------------------------------------------------

/// Factory for rolled-back [`TxStorage`] handles over one database file.
#[derive(Debug)]
pub struct TxHarness {
    path: PathBuf,
    lease: Arc<Mutex<()>>,
    /// Remove the database file when the harness is dropped.
    temporary: bool,
}

impl TxHarness {
    /// Prepare the database at `path`, creating it and its schema if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        Connection::open(&path)?.execute_batch(SCHEMA)?;
        Ok(Self {
            path,
            lease: Arc::new(Mutex::new(())),
            temporary: false,
        })
    }

    /// Prepare a fresh database in the system temp directory. The file is
    /// deleted when the harness is dropped.
    pub fn temporary() -> Result<Self, StorageError> {
        let path = std::env::temp_dir().join(format!("pubcast-test-{}.db", uuid::Uuid::now_v7()));
        let mut harness = Self::open(path)?;
        harness.temporary = true;
        Ok(harness)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Execute `sql` and commit it. Fixtures are visible to every handle
    /// opened afterwards.
    pub async fn load_fixtures(&self, sql: &str) -> Result<(), StorageError> {
        let _lease = Arc::clone(&self.lease).lock_owned().await;
        let path = self.path.clone();
        let sql = sql.to_string();
        tokio::task::spawn_blocking(move || -> Result<(), StorageError> {
            Connection::open(&path)?.execute_batch(&sql)?;
            Ok(())
        })
        .await
        .map_err(|e| StorageError::Internal(format!("task join error: {e}")))?
    }

    /// Open a handle whose writes are discarded when it is dropped.
    ///
    /// Waits until any previously issued handle has been dropped.
    pub async fn begin(&self) -> Result<TxStorage, StorageError> {
        let lease = Arc::clone(&self.lease).lock_owned().await;
        let conn = Connection::open(&self.path)?;
        conn.execute_batch("BEGIN")?;
        let pool = Pool::from_connection(conn);
        Ok(TxStorage {
            storage: SqliteStorage::new(pool),
            _lease: lease,
        })
    }
}

impl Drop for TxHarness {
    fn drop(&mut self) {
        if self.temporary {
            if let Err(e) = std::fs::remove_file(&self.path) {
                tracing::warn!("failed to remove test database {}: {e}", self.path.display());
            }
        }
    }
}

// ---------------------------------------------------------------------------
// TxStorage
// ---------------------------------------------------------------------------

/// A [`Storage`] whose writes live in one uncommitted transaction.
#[derive(Debug)]
pub struct TxStorage {
    storage: SqliteStorage,
    _lease: OwnedMutexGuard<()>,
}

impl TxStorage {
    pub fn pool(&self) -> &Pool {
        self.storage.pool()
    }
}

impl Drop for TxStorage {
    fn drop(&mut self) {
        if let Err(e) = self.storage.pool().close() {
            tracing::warn!("closing test transaction failed: {e}");
        }
    }
}

#[async_trait]
impl Storage for TxStorage {
    async fn get_group(&self, slug: &str) -> Result<Option<Group>, StorageError> {
        self.storage.get_group(slug).await
    }

    async fn put_group(&self, name: &str, note: &str) -> Result<String, StorageError> {
        self.storage.put_group(name, note).await
    }

    async fn get_organization(&self, slug: &str) -> Result<Option<Organization>, StorageError> {
        self.storage.get_organization(slug).await
    }

    async fn put_organization(&self, name: &str, note: &str) -> Result<String, StorageError> {
        self.storage.put_organization(name, note).await
    }

    async fn get_podcast(&self, slug: &str) -> Result<Option<Podcast>, StorageError> {
        self.storage.get_podcast(slug).await
    }

    async fn put_podcast(&self, podcast: &NewPodcast) -> Result<String, StorageError> {
        self.storage.put_podcast(podcast).await
    }
}
