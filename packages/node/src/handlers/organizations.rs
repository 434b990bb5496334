//! Organization handlers.
//!
//! - `GET  /api/org/{slug}`: the organization as an ActivityStreams actor.
//! - `POST /api/org`: create an organization from `{ "name", "note" }`.

use axum::{
    extract::State,
    http::StatusCode,
    response::Response,
    Json,
};

use crate::error::AppError;

use super::{not_found, represent, require_name, slug_param, AppState, CreateRequest, PathParams};

/// `GET /api/org/{slug}`
///
/// Expects a `{slug}` path variable. Returns 404 when no organization has
/// that slug.
pub async fn get(State(state): State<AppState>, params: PathParams) -> Result<Response, AppError> {
    let slug = slug_param(params)?;

    let org = state
        .storage
        .get_organization(&slug)
        .await?
        .ok_or_else(|| not_found(&slug))?;

    represent(&org, &state.config.base_url, StatusCode::OK)
}

/// `POST /api/org`
///
/// Returns 201 with the new actor, or 409 when the derived slug is taken.
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateRequest>,
) -> Result<Response, AppError> {
    require_name(&req.name)?;

    let slug = state.storage.put_organization(&req.name, &req.note).await?;
    tracing::info!(%slug, "organization created");

    let org = state
        .storage
        .get_organization(&slug)
        .await?
        .ok_or_else(|| AppError::Internal(format!("organization {slug} vanished after insert")))?;

    represent(&org, &state.config.base_url, StatusCode::CREATED)
}
