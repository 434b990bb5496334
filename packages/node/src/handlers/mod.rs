//! HTTP request handlers for the pubcast node.
//!
//! Each submodule serves one entity kind under `/api/{segment}`. A lookup
//! runs through the same steps for every kind:
//!
//! 1. take `slug` from the path parameters ([`slug_param`]),
//! 2. fetch the entity from [`Storage`],
//! 3. project it against the configured base URL,
//! 4. serialise and respond ([`represent`]).
//!
//! A missing or empty `slug` parameter means the route was registered
//! wrongly, so it is reported as a 500 rather than blamed on the client.

pub mod groups;
pub mod organizations;
pub mod podcasts;

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{rejection::PathRejection, Path},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use pubcast::{activity::ACTIVITY_JSON, Project};
use serde::Deserialize;

use crate::{config::NodeConfig, error::AppError, storage::Storage};

/// Shared application state threaded through all Axum handlers via [`axum::extract::State`].
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub config: NodeConfig,
}

/// Path parameters as the router matched them.
pub type PathParams = Result<Path<HashMap<String, String>>, PathRejection>;

/// Request body for `POST /api/org` and `POST /api/group`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRequest {
    pub name: String,
    #[serde(default)]
    pub note: String,
}

/// Pull the `slug` variable out of the matched path parameters.
pub fn slug_param(params: PathParams) -> Result<String, AppError> {
    let Path(mut vars) = params.map_err(|e| {
        tracing::error!("path parameters unavailable: {e}");
        AppError::Internal("Bad request".into())
    })?;

    match vars.remove("slug") {
        Some(slug) if !slug.is_empty() => Ok(slug),
        _ => Err(AppError::Internal("Bad request, no slug in url".into())),
    }
}

pub fn not_found(slug: &str) -> AppError {
    AppError::NotFound(format!("{slug} does not exist on this server"))
}

/// Reject names that would only ever produce the fallback slug.
pub fn require_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::BadRequest("name must not be empty".into()));
    }
    Ok(())
}

/// Project `entity`, serialise it, and build the response.
///
/// A `201 Created` response also carries the canonical id in `Location`.
pub fn represent<E: Project>(
    entity: &E,
    base_url: &str,
    status: StatusCode,
) -> Result<Response, AppError> {
    let repr = entity.project(base_url)?;
    let body = serde_json::to_vec(&repr)?;

    let mut resp = (
        status,
        [(header::CONTENT_TYPE, HeaderValue::from_static(ACTIVITY_JSON))],
        body,
    )
        .into_response();

    if status == StatusCode::CREATED {
        let id = entity.canonical_id(base_url)?;
        let location = HeaderValue::from_str(&id)
            .map_err(|e| AppError::Internal(format!("invalid Location header {id:?}: {e}")))?;
        resp.headers_mut().insert(header::LOCATION, location);
    }

    Ok(resp)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> PathParams {
        Ok(Path(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ))
    }

    #[test]
    fn slug_is_extracted() {
        assert_eq!(slug_param(params(&[("slug", "planet")])).unwrap(), "planet");
    }

    #[test]
    fn missing_or_empty_slug_is_internal() {
        for p in [params(&[]), params(&[("something-other", "boop")]), params(&[("slug", "")])] {
            let err = slug_param(p).unwrap_err();
            assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn blank_names_are_rejected() {
        assert!(require_name("planet").is_ok());
        let err = require_name("   ").unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_message_names_the_slug() {
        match not_found("i-dont-exist") {
            AppError::NotFound(msg) => assert_eq!(msg, "i-dont-exist does not exist on this server"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
