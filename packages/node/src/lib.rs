//! Public surface for the `pubcast-node` crate.
//!
//! Exposes the router builder, config and storage types so that tests and
//! other crates can run an in-process node without spawning a subprocess.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod storage;

pub use config::NodeConfig;
pub use router::build_router;
pub use storage::{pool::Pool, sqlite::SqliteStorage, Storage, StorageError};
