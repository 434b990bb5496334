//! Podcast handlers: `GET /api/podcast/{slug}` and `POST /api/podcast`.
//!
//! Podcasts are published as ActivityStreams `Audio` objects rather than
//! actors.

use axum::{extract::State, http::StatusCode, response::Response, Json};
use pubcast::{NewPodcast, Timestamp};
use serde::Deserialize;

use crate::error::AppError;

use super::{not_found, represent, require_name, slug_param, AppState, PathParams};

/// Request body for `POST /api/podcast`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePodcastRequest {
    pub name: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub thumbnail_url: String,
    #[serde(default)]
    pub audio_url: String,
    #[serde(default)]
    pub media_type: String,
    /// Defaults to the time of the request.
    #[serde(default)]
    pub posted_at: Option<Timestamp>,
}

impl From<CreatePodcastRequest> for NewPodcast {
    fn from(req: CreatePodcastRequest) -> Self {
        NewPodcast {
            name: req.name,
            note: req.note,
            thumbnail_url: req.thumbnail_url,
            audio_url: req.audio_url,
            media_type: req.media_type,
            posted_at: req.posted_at,
        }
    }
}

pub async fn get(State(state): State<AppState>, params: PathParams) -> Result<Response, AppError> {
    let slug = slug_param(params)?;

    let podcast = state
        .storage
        .get_podcast(&slug)
        .await?
        .ok_or_else(|| not_found(&slug))?;

    represent(&podcast, &state.config.base_url, StatusCode::OK)
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreatePodcastRequest>,
) -> Result<Response, AppError> {
    require_name(&req.name)?;

    let slug = state.storage.put_podcast(&req.into()).await?;
    tracing::info!(%slug, "podcast created");

    let podcast = state
        .storage
        .get_podcast(&slug)
        .await?
        .ok_or_else(|| AppError::Internal(format!("podcast {slug} vanished after insert")))?;

    represent(&podcast, &state.config.base_url, StatusCode::CREATED)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::{
        config::NodeConfig,
        router::build_router,
        storage::{pool::Pool, sqlite::SqliteStorage, Storage},
    };

    fn config() -> NodeConfig {
        NodeConfig {
            bind_addr: "127.0.0.1:8080".parse().unwrap(),
            base_url: "https://pods.example".into(),
            db_path: None,
        }
    }

    #[tokio::test]
    async fn create_then_fetch_audio_object() {
        let storage: Arc<dyn Storage> = Arc::new(SqliteStorage::new(Pool::open_in_memory().unwrap()));
        let app = build_router(storage, config());

        let create = Request::builder()
            .method("POST")
            .uri("/api/podcast")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{
                    "name": "Episode 1: Pilot",
                    "audio_url": "https://cdn.example/ep1.mp3",
                    "media_type": "audio/mpeg",
                    "posted_at": "2026-09-30T18:00:00Z"
                }"#,
            ))
            .unwrap();
        let resp = app.clone().oneshot(create).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);

        let fetch = Request::builder()
            .uri("/api/podcast/episode-1-pilot")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(fetch).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["type"], "Audio");
        assert_eq!(json["id"], "https://pods.example/api/podcast/episode-1-pilot");
        assert_eq!(json["url"]["href"], "https://cdn.example/ep1.mp3");
        assert_eq!(json["published"], "2026-09-30T18:00:00Z");
    }

    #[tokio::test]
    async fn malformed_posted_at_is_rejected() {
        let storage: Arc<dyn Storage> = Arc::new(SqliteStorage::new(Pool::open_in_memory().unwrap()));
        let app = build_router(storage, config());
        let req = Request::builder()
            .method("POST")
            .uri("/api/podcast")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"name":"Ep","posted_at":"last tuesday"}"#))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert!(resp.status().is_client_error());
    }

    #[tokio::test]
    async fn unknown_podcast_returns_404() {
        let storage: Arc<dyn Storage> = Arc::new(SqliteStorage::new(Pool::open_in_memory().unwrap()));
        let app = build_router(storage, config());
        let req = Request::builder()
            .uri("/api/podcast/ghost")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
