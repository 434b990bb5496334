//! `pubcast-node` serves Groups, Organizations and Podcasts as
//! ActivityStreams documents.
//!
//! # Quick start
//!
//! ```sh
//! # In-memory node on the default port:
//! pubcast-node
//!
//! # Persistent SQLite node advertised under a public hostname:
//! PUBCAST_DB=./pubcast.db PUBCAST_BASE_URL=https://pods.example pubcast-node
//! ```
//!
//! # Environment variables
//!
//! See [`pubcast_node::config::NodeConfig::from_env`] for the full list.

use std::process::ExitCode;
use std::sync::Arc;

use pubcast_node::{build_router, NodeConfig, Pool, SqliteStorage, Storage};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pubcast_node=info,tower_http=debug".into()),
        )
        .init();

    let config = match NodeConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let pool = match &config.db_path {
        Some(path) => {
            tracing::info!("storage: SQLite at {path}");
            Pool::open(path)
        }
        None => {
            tracing::info!("storage: in-memory (data will not survive restart)");
            Pool::open_in_memory()
        }
    };
    let pool = match pool {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("cannot open the database, refusing to start: {e}");
            return ExitCode::FAILURE;
        }
    };

    let storage: Arc<dyn Storage> = Arc::new(SqliteStorage::new(pool));
    let app = build_router(storage, config.clone());

    let listener = match tokio::net::TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("failed to bind {}: {e}", config.bind_addr);
            return ExitCode::FAILURE;
        }
    };
    tracing::info!("listening on {} as {}", config.bind_addr, config.base_url);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
