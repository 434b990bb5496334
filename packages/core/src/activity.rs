//! ActivityStreams representations of stored entities.
//!
//! Organizations and Groups are published as actors; Podcasts as `Audio`
//! objects. Every representation carries a canonical `id` of the form
//! `{base}/api/{segment}/{slug}`, where `base` is the server's externally
//! visible URL and `segment` is the entity's API path (see [`Project::SEGMENT`]).
//!
//! Projection performs no I/O. The only failure is a base URL that cannot be
//! used to build an absolute http(s) identifier.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::models::{Group, Organization, Podcast};
use crate::time::Timestamp;

/// JSON-LD context for every published document.
pub const ACTIVITY_STREAMS_CONTEXT: &str = "https://www.w3.org/ns/activitystreams";

/// Media type served for ActivityStreams documents.
pub const ACTIVITY_JSON: &str = "application/activity+json";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProjectionError {
    #[error("invalid base url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

fn default_context() -> String {
    ACTIVITY_STREAMS_CONTEXT.to_string()
}

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

/// The ActivityStreams actor type an entity is published as.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ActorKind {
    Organization,
    Group,
}

/// An actor document for an Organization or a Group.
///
/// ```json
/// {
///   "@context": "https://www.w3.org/ns/activitystreams",
///   "type": "Organization",
///   "id": "https://pubcast.example/api/org/planet",
///   "name": "planet",
///   "preferredUsername": "planet",
///   "url": "https://pubcast.example/api/org/planet",
///   "published": "2026-10-15T08:30:00Z",
///   "updated": "2026-10-15T08:30:00Z"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Actor {
    #[serde(rename = "@context", default = "default_context")]
    pub context: String,

    #[serde(rename = "type")]
    pub kind: ActorKind,

    pub id: String,

    pub name: String,

    /// The actor's slug.
    #[serde(rename = "preferredUsername")]
    pub preferred_username: String,

    /// The entity's note. Omitted when the note is empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    pub url: String,

    pub published: Timestamp,

    pub updated: Timestamp,
}

impl Actor {
    fn new(
        kind: ActorKind,
        id: String,
        slug: &str,
        name: &str,
        note: &str,
        published: Timestamp,
        updated: Timestamp,
    ) -> Self {
        Self {
            context: default_context(),
            kind,
            url: id.clone(),
            id,
            name: name.to_string(),
            preferred_username: slug.to_string(),
            summary: non_empty(note),
            published,
            updated,
        }
    }
}

// ---------------------------------------------------------------------------
// Audio object
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ObjectKind {
    Audio,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LinkKind {
    Link,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ImageKind {
    Image,
}

/// A link to the audio file itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MediaLink {
    #[serde(rename = "type")]
    pub kind: LinkKind,
    pub href: String,
    #[serde(rename = "mediaType", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Image {
    #[serde(rename = "type")]
    pub kind: ImageKind,
    pub url: String,
}

/// An `Audio` object for a Podcast.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AudioObject {
    #[serde(rename = "@context", default = "default_context")]
    pub context: String,

    #[serde(rename = "type")]
    pub kind: ObjectKind,

    pub id: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Absent when the podcast has no audio link yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<MediaLink>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Image>,

    /// When the episode was posted.
    pub published: Timestamp,

    pub updated: Timestamp,
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// Conversion of a stored entity into its published representation.
pub trait Project {
    /// Path segment under `/api/` that serves this entity kind.
    const SEGMENT: &'static str;

    type Repr: Serialize;

    fn slug(&self) -> &str;

    fn project(&self, base: &str) -> Result<Self::Repr, ProjectionError>;

    /// The canonical identifier of this entity under `base`.
    fn canonical_id(&self, base: &str) -> Result<String, ProjectionError> {
        canonical_id(base, Self::SEGMENT, self.slug())
    }
}

/// Build `{base}/api/{segment}/{slug}`.
///
/// `base` must be an absolute `http` or `https` URL. A path prefix on the
/// base is kept (`https://host/pods` → `https://host/pods/api/org/x`);
/// trailing slashes, query and fragment are dropped.
pub fn canonical_id(base: &str, segment: &str, slug: &str) -> Result<String, ProjectionError> {
    let invalid = |reason: &str| ProjectionError::InvalidBaseUrl {
        url: base.to_string(),
        reason: reason.to_string(),
    };

    let mut url = Url::parse(base).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host"));
    }
    url.set_query(None);
    url.set_fragment(None);
    url.path_segments_mut()
        .map_err(|()| invalid("cannot be a base"))?
        .pop_if_empty()
        .extend(["api", segment, slug]);

    Ok(url.to_string())
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

impl Project for Organization {
    const SEGMENT: &'static str = "org";
    type Repr = Actor;

    fn slug(&self) -> &str {
        &self.slug
    }

    fn project(&self, base: &str) -> Result<Actor, ProjectionError> {
        Ok(Actor::new(
            ActorKind::Organization,
            self.canonical_id(base)?,
            &self.slug,
            &self.name,
            &self.note,
            self.created_at,
            self.updated_at,
        ))
    }
}

impl Project for Group {
    const SEGMENT: &'static str = "group";
    type Repr = Actor;

    fn slug(&self) -> &str {
        &self.slug
    }

    fn project(&self, base: &str) -> Result<Actor, ProjectionError> {
        Ok(Actor::new(
            ActorKind::Group,
            self.canonical_id(base)?,
            &self.slug,
            &self.name,
            &self.note,
            self.created_at,
            self.updated_at,
        ))
    }
}

impl Project for Podcast {
    const SEGMENT: &'static str = "podcast";
    type Repr = AudioObject;

    fn slug(&self) -> &str {
        &self.slug
    }

    fn project(&self, base: &str) -> Result<AudioObject, ProjectionError> {
        let url = non_empty(&self.audio_url).map(|href| MediaLink {
            kind: LinkKind::Link,
            href,
            media_type: non_empty(&self.media_type),
        });
        let icon = non_empty(&self.thumbnail_url).map(|url| Image {
            kind: ImageKind::Image,
            url,
        });

        Ok(AudioObject {
            context: default_context(),
            kind: ObjectKind::Audio,
            id: self.canonical_id(base)?,
            name: self.name.clone(),
            summary: non_empty(&self.note),
            url,
            icon,
            published: self.posted_at,
            updated: self.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(raw: &str) -> Timestamp {
        Timestamp::parse(raw).unwrap()
    }

    fn org(slug: &str, note: &str) -> Organization {
        Organization {
            slug: slug.into(),
            name: slug.into(),
            note: note.into(),
            created_at: ts("2026-10-15 08:30:00"),
            updated_at: ts("2026-10-15 09:00:00"),
        }
    }

    #[test]
    fn canonical_id_joins_base_and_slug() {
        assert_eq!(
            canonical_id("https://localhost:8080", "org", "planet").unwrap(),
            "https://localhost:8080/api/org/planet"
        );
    }

    #[test]
    fn canonical_id_tolerates_trailing_slash_and_prefix() {
        assert_eq!(
            canonical_id("https://pods.example/", "group", "news").unwrap(),
            "https://pods.example/api/group/news"
        );
        assert_eq!(
            canonical_id("https://example.com/pubcast/?x=1#top", "org", "a").unwrap(),
            "https://example.com/pubcast/api/org/a"
        );
    }

    #[test]
    fn canonical_id_rejects_bad_bases() {
        for base in ["", "localhost:8080", "ftp://example.com", "mailto:me@example.com"] {
            let err = canonical_id(base, "org", "planet").unwrap_err();
            assert!(
                matches!(err, ProjectionError::InvalidBaseUrl { .. }),
                "expected InvalidBaseUrl for {base:?}"
            );
        }
    }

    #[test]
    fn organization_projects_to_actor() {
        let actor = org("planet", "").project("https://localhost:8080").unwrap();
        assert_eq!(actor.kind, ActorKind::Organization);
        assert_eq!(actor.id, "https://localhost:8080/api/org/planet");
        assert_eq!(actor.name, "planet");
        assert_eq!(actor.preferred_username, "planet");
        assert_eq!(actor.summary, None);

        let json = serde_json::to_value(&actor).unwrap();
        assert_eq!(json["@context"], ACTIVITY_STREAMS_CONTEXT);
        assert_eq!(json["type"], "Organization");
        assert_eq!(json["published"], "2026-10-15T08:30:00Z");
        assert_eq!(json["updated"], "2026-10-15T09:00:00Z");
        assert!(json.get("summary").is_none());
    }

    #[test]
    fn group_projects_with_summary() {
        let group = Group {
            slug: "indie-network".into(),
            name: "Indie Network".into(),
            note: "a collective".into(),
            created_at: ts("2026-10-15 08:30:00"),
            updated_at: ts("2026-10-15 08:30:00"),
        };
        let actor = group.project("http://example.com").unwrap();
        assert_eq!(actor.kind, ActorKind::Group);
        assert_eq!(actor.id, "http://example.com/api/group/indie-network");
        assert_eq!(actor.name, "Indie Network");
        assert_eq!(actor.summary.as_deref(), Some("a collective"));
    }

    #[test]
    fn podcast_projects_to_audio() {
        let podcast = Podcast {
            slug: "episode-1".into(),
            name: "Episode 1".into(),
            note: "".into(),
            thumbnail_url: "https://cdn.example/ep1.png".into(),
            audio_url: "https://cdn.example/ep1.mp3".into(),
            media_type: "audio/mpeg".into(),
            posted_at: ts("2026-10-01 12:00:00"),
            created_at: ts("2026-10-15 08:30:00"),
            updated_at: ts("2026-10-15 08:30:00"),
        };
        let json = serde_json::to_value(podcast.project("https://pods.example").unwrap()).unwrap();
        assert_eq!(json["type"], "Audio");
        assert_eq!(json["id"], "https://pods.example/api/podcast/episode-1");
        assert_eq!(json["url"]["href"], "https://cdn.example/ep1.mp3");
        assert_eq!(json["url"]["mediaType"], "audio/mpeg");
        assert_eq!(json["icon"]["type"], "Image");
        assert_eq!(json["published"], "2026-10-01T12:00:00Z");
    }

    #[test]
    fn podcast_without_media_omits_links() {
        let podcast = Podcast {
            slug: "draft".into(),
            name: "Draft".into(),
            note: "".into(),
            thumbnail_url: "".into(),
            audio_url: "".into(),
            media_type: "".into(),
            posted_at: ts("2026-10-01 12:00:00"),
            created_at: ts("2026-10-01 12:00:00"),
            updated_at: ts("2026-10-01 12:00:00"),
        };
        let audio = podcast.project("https://pods.example").unwrap();
        assert!(audio.url.is_none());
        assert!(audio.icon.is_none());
    }

    #[test]
    fn invalid_base_fails_projection() {
        let err = org("planet", "").project("not a url").unwrap_err();
        assert!(matches!(err, ProjectionError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn actor_parses_back() {
        let actor = org("planet", "foo").project("https://localhost:8080").unwrap();
        let json = serde_json::to_string(&actor).unwrap();
        let back: Actor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, actor);
    }
}
