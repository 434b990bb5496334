//! Typed queries for the three entity tables.
//!
//! Every function takes a borrowed connection so the same queries run on the
//! production pool and inside a test transaction. Lookups filter on the
//! requested slug; "no row" comes back as `Ok(None)`.

use pubcast::{slug, Group, NewPodcast, Organization, Podcast, Timestamp};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};

use super::StorageError;

fn timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<Timestamp> {
    let raw: String = row.get(idx)?;
    Timestamp::parse(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Map an insert error, turning a slug collision into [`StorageError::Conflict`].
fn map_insert_err(table: &str, slug: &str, e: rusqlite::Error) -> StorageError {
    match e.sqlite_error_code() {
        Some(ErrorCode::ConstraintViolation) => {
            StorageError::Conflict(format!("{table} slug {slug:?} already exists"))
        }
        _ => StorageError::from(e),
    }
}

// ---------------------------------------------------------------------------
// Groups
// ---------------------------------------------------------------------------

/// Return the group with `slug`, or `None`.
pub fn get_group(conn: &Connection, slug: &str) -> Result<Option<Group>, StorageError> {
    let group = conn
        .query_row(
            "SELECT slug, name, note, created_at, updated_at
             FROM groups WHERE slug = ?1",
            params![slug],
            |row| {
                Ok(Group {
                    slug: row.get(0)?,
                    name: row.get(1)?,
                    note: row.get(2)?,
                    created_at: timestamp(row, 3)?,
                    updated_at: timestamp(row, 4)?,
                })
            },
        )
        .optional()?;
    Ok(group)
}

/// Create a group with this name and note, returning its slug.
pub fn put_group(conn: &Connection, name: &str, note: &str) -> Result<String, StorageError> {
    let slug = slug::derive(name);
    conn.execute(
        "INSERT INTO groups (slug, name, note) VALUES (?1, ?2, ?3)",
        params![slug, name, note],
    )
    .map_err(|e| map_insert_err("group", &slug, e))?;
    Ok(slug)
}

// ---------------------------------------------------------------------------
// Organizations
// ---------------------------------------------------------------------------

pub fn get_organization(
    conn: &Connection,
    slug: &str,
) -> Result<Option<Organization>, StorageError> {
    let org = conn
        .query_row(
            "SELECT slug, name, note, created_at, updated_at
             FROM organizations WHERE slug = ?1",
            params![slug],
            |row| {
                Ok(Organization {
                    slug: row.get(0)?,
                    name: row.get(1)?,
                    note: row.get(2)?,
                    created_at: timestamp(row, 3)?,
                    updated_at: timestamp(row, 4)?,
                })
            },
        )
        .optional()?;
    Ok(org)
}

pub fn put_organization(conn: &Connection, name: &str, note: &str) -> Result<String, StorageError> {
    let slug = slug::derive(name);
    conn.execute(
        "INSERT INTO organizations (slug, name, note) VALUES (?1, ?2, ?3)",
        params![slug, name, note],
    )
    .map_err(|e| map_insert_err("organization", &slug, e))?;
    Ok(slug)
}

// ---------------------------------------------------------------------------
// Podcasts
// ---------------------------------------------------------------------------

pub fn get_podcast(conn: &Connection, slug: &str) -> Result<Option<Podcast>, StorageError> {
    let podcast = conn
        .query_row(
            "SELECT slug, name, note, thumbnail_url, audio_url, media_type,
                    posted_at, created_at, updated_at
             FROM podcasts WHERE slug = ?1",
            params![slug],
            |row| {
                Ok(Podcast {
                    slug: row.get(0)?,
                    name: row.get(1)?,
                    note: row.get(2)?,
                    thumbnail_url: row.get(3)?,
                    audio_url: row.get(4)?,
                    media_type: row.get(5)?,
                    posted_at: timestamp(row, 6)?,
                    created_at: timestamp(row, 7)?,
                    updated_at: timestamp(row, 8)?,
                })
            },
        )
        .optional()?;
    Ok(podcast)
}

/// Create a podcast. `posted_at` defaults to the insert time.
pub fn put_podcast(conn: &Connection, podcast: &NewPodcast) -> Result<String, StorageError> {
    let slug = slug::derive(&podcast.name);
    let posted_at = podcast.posted_at.map(|ts| ts.to_storage_string());
    conn.execute(
        "INSERT INTO podcasts (slug, name, note, thumbnail_url, audio_url, media_type, posted_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, COALESCE(?7, CURRENT_TIMESTAMP))",
        params![
            slug,
            podcast.name,
            podcast.note,
            podcast.thumbnail_url,
            podcast.audio_url,
            podcast.media_type,
            posted_at,
        ],
    )
    .map_err(|e| map_insert_err("podcast", &slug, e))?;
    Ok(slug)
}
