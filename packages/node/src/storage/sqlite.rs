//! SQLite-backed storage implementation.
//!
//! A thin async adapter: each [`Storage`] method hands one
//! [`repository`](super::repository) query to [`Pool::run`].

use async_trait::async_trait;
use pubcast::{Group, NewPodcast, Organization, Podcast};

use super::{pool::Pool, repository, Storage, StorageError};

/// Production implementation of [`Storage`].
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    pool: Pool,
}

impl SqliteStorage {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    // --- Groups --------------------------------------------------------------

    async fn get_group(&self, slug: &str) -> Result<Option<Group>, StorageError> {
        let slug = slug.to_string();
        self.pool
            .run(move |conn| repository::get_group(conn, &slug))
            .await
    }

    async fn put_group(&self, name: &str, note: &str) -> Result<String, StorageError> {
        let (name, note) = (name.to_string(), note.to_string());
        let slug = self
            .pool
            .run(move |conn| repository::put_group(conn, &name, &note))
            .await?;
        tracing::debug!(%slug, "group created");
        Ok(slug)
    }

    // --- Organizations -------------------------------------------------------

    async fn get_organization(&self, slug: &str) -> Result<Option<Organization>, StorageError> {
        let slug = slug.to_string();
        self.pool
            .run(move |conn| repository::get_organization(conn, &slug))
            .await
    }

    async fn put_organization(&self, name: &str, note: &str) -> Result<String, StorageError> {
        let (name, note) = (name.to_string(), note.to_string());
        let slug = self
            .pool
            .run(move |conn| repository::put_organization(conn, &name, &note))
            .await?;
        tracing::debug!(%slug, "organization created");
        Ok(slug)
    }

    // --- Podcasts ------------------------------------------------------------

    async fn get_podcast(&self, slug: &str) -> Result<Option<Podcast>, StorageError> {
        let slug = slug.to_string();
        self.pool
            .run(move |conn| repository::get_podcast(conn, &slug))
            .await
    }

    async fn put_podcast(&self, podcast: &NewPodcast) -> Result<String, StorageError> {
        let podcast = podcast.clone();
        let slug = self
            .pool
            .run(move |conn| repository::put_podcast(conn, &podcast))
            .await?;
        tracing::debug!(%slug, "podcast created");
        Ok(slug)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
