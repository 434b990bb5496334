//! Stored entity types.
//!
//! Each entity is a row keyed by its [slug](crate::slug). The serialised
//! field names match the column names of the backing tables.

use serde::{Deserialize, Serialize};

use crate::time::Timestamp;

/// A collection of Organizations.
///
/// See <https://www.w3.org/TR/activitystreams-vocabulary/#dfn-group>.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Group {
    pub slug: String,
    pub name: String,
    pub note: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Someone who owns podcasts.
///
/// See <https://www.w3.org/TR/activitystreams-vocabulary/#dfn-organization>.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Organization {
    pub slug: String,
    pub name: String,
    pub note: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A single audio item with a name, a note, and a link to the media.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Podcast {
    pub slug: String,
    pub name: String,
    pub note: String,
    pub thumbnail_url: String,
    pub audio_url: String,
    pub media_type: String,
    pub posted_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Input for creating a [`Podcast`]. The slug is derived from `name`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPodcast {
    pub name: String,
    pub note: String,
    pub thumbnail_url: String,
    pub audio_url: String,
    pub media_type: String,
    /// `None` means "posted now".
    pub posted_at: Option<Timestamp>,
}

impl NewPodcast {
    pub fn new(name: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            note: note.into(),
            ..Default::default()
        }
    }
}
