//! Domain library for pubcast.
//!
//! Pubcast publishes podcast-hosting entities as ActivityStreams documents.
//! This crate holds everything that does not touch the network or the
//! database:
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`models`] | Stored entities: [`Group`], [`Organization`], [`Podcast`] |
//! | [`slug`] | Deriving the immutable public identifier from a display name |
//! | [`time`] | [`Timestamp`], the single wire format for stored times |
//! | [`activity`] | Projecting entities into actor and `Audio` documents |
//!
//! # Quick start
//!
//! ```rust,ignore
//! use pubcast::{slug, Project};
//!
//! let slug = slug::derive("Planet Money"); // "planet-money"
//! let actor = organization.project("https://pubcast.example")?;
//! assert_eq!(actor.id, "https://pubcast.example/api/org/planet-money");
//! ```

pub mod activity;
pub mod models;
pub mod slug;
pub mod time;

pub use activity::{Actor, ActorKind, AudioObject, Project, ProjectionError};
pub use models::{Group, NewPodcast, Organization, Podcast};
pub use time::{Timestamp, TimestampError};
