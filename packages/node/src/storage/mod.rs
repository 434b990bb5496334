//! Storage layer for the pubcast node.
//!
//! The [`Storage`] trait is the contract between the HTTP handlers and
//! persistence. Handlers only ever see `Option<Entity>` for lookups: a slug
//! with no row is `Ok(None)`, never an error.
//!
//! # Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`pool`] | [`Pool`], the one shared database handle |
//! | [`repository`] | Synchronous get/put queries against a connection |
//! | [`sqlite`] | [`SqliteStorage`], the production [`Storage`] |
//! | [`testing`] | [`TxHarness`], transactional storage for tests |
//!
//! [`Pool`]: pool::Pool
//! [`SqliteStorage`]: sqlite::SqliteStorage
//! [`TxHarness`]: testing::TxHarness

pub mod pool;
pub mod repository;
pub mod sqlite;
pub mod testing;

use async_trait::async_trait;
use pubcast::{Group, NewPodcast, Organization, Podcast};

// ---------------------------------------------------------------------------
// StorageError
// ---------------------------------------------------------------------------

/// Errors that storage operations can return.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// An entity with the same slug already exists.
    #[error("conflict: {0}")]
    Conflict(String),

    /// An unexpected error in the underlying storage backend.
    #[error("internal storage error: {0}")]
    Internal(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        StorageError::Internal(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Storage trait
// ---------------------------------------------------------------------------

/// The persistence contract for a pubcast node.
///
/// `put_*` derive the slug from the name, insert, and return the slug.
/// Inserting a name whose slug is already taken returns
/// [`StorageError::Conflict`].
#[async_trait]
pub trait Storage: Send + Sync + 'static {
    // --- Groups --------------------------------------------------------------

    async fn get_group(&self, slug: &str) -> Result<Option<Group>, StorageError>;

    async fn put_group(&self, name: &str, note: &str) -> Result<String, StorageError>;

    // --- Organizations -------------------------------------------------------

    async fn get_organization(&self, slug: &str) -> Result<Option<Organization>, StorageError>;

    async fn put_organization(&self, name: &str, note: &str) -> Result<String, StorageError>;

    // --- Podcasts ------------------------------------------------------------

    async fn get_podcast(&self, slug: &str) -> Result<Option<Podcast>, StorageError>;

    async fn put_podcast(&self, podcast: &NewPodcast) -> Result<String, StorageError>;
}
