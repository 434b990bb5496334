//! Node configuration, populated from environment variables.

use std::net::SocketAddr;

use url::Url;

/// Errors raised while reading configuration at startup.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("PUBCAST_BIND must be a valid socket address (e.g. 0.0.0.0:8080), got {0:?}")]
    InvalidBind(String),

    #[error("PUBCAST_BASE_URL must be an absolute http(s) URL, got {0:?}")]
    InvalidBaseUrl(String),
}

/// Runtime configuration for a pubcast node.
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | `PUBCAST_BIND` | `0.0.0.0:8080` | TCP socket address to listen on |
/// | `PUBCAST_BASE_URL` | derived from PUBCAST_BIND | Externally visible base URL used in actor ids |
/// | `PUBCAST_DB` | (absent = in-memory) | Path to the SQLite database file |
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Socket address the server binds to.
    pub bind_addr: SocketAddr,

    /// Scheme, host and optional path prefix under which this node is
    /// reachable, without a trailing slash.
    /// Example: `"https://pubcast.example"`.
    pub base_url: String,

    /// Path to the SQLite database file.
    /// `None` means use an in-memory store (data is lost on restart).
    pub db_path: Option<String>,
}

impl NodeConfig {
    /// Populate config from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Populate config from an arbitrary key lookup, applying defaults where
    /// a key is absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_raw = lookup("PUBCAST_BIND").unwrap_or_else(|| "0.0.0.0:8080".into());
        let bind_addr: SocketAddr = bind_raw
            .parse()
            .map_err(|_| ConfigError::InvalidBind(bind_raw.clone()))?;

        let base_url = match lookup("PUBCAST_BASE_URL") {
            Some(raw) => validate_base_url(&raw)?,
            None => format!("http://{bind_addr}"),
        };

        Ok(Self {
            bind_addr,
            base_url,
            db_path: lookup("PUBCAST_DB").filter(|p| !p.is_empty()),
        })
    }
}

fn validate_base_url(raw: &str) -> Result<String, ConfigError> {
    let invalid = || ConfigError::InvalidBaseUrl(raw.to_string());
    let url = Url::parse(raw).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(invalid());
    }
    Ok(raw.trim_end_matches('/').to_string())
}
