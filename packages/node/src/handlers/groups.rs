//! Group handlers: `GET /api/group/{slug}` and `POST /api/group`.

use axum::{extract::State, http::StatusCode, response::Response, Json};

use crate::error::AppError;

use super::{not_found, represent, require_name, slug_param, AppState, CreateRequest, PathParams};

/// `GET /api/group/{slug}`: the group as an ActivityStreams `Group` actor.
pub async fn get(State(state): State<AppState>, params: PathParams) -> Result<Response, AppError> {
    let slug = slug_param(params)?;

    let group = state
        .storage
        .get_group(&slug)
        .await?
        .ok_or_else(|| not_found(&slug))?;

    represent(&group, &state.config.base_url, StatusCode::OK)
}

/// `POST /api/group`: create a group.
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateRequest>,
) -> Result<Response, AppError> {
    require_name(&req.name)?;

    let slug = state.storage.put_group(&req.name, &req.note).await?;
    tracing::info!(%slug, "group created");

    let group = state
        .storage
        .get_group(&slug)
        .await?
        .ok_or_else(|| AppError::Internal(format!("group {slug} vanished after insert")))?;

    represent(&group, &state.config.base_url, StatusCode::CREATED)
}
