//! End-to-end tests against the transactional harness.
//!
//! All tests in this file share one [`TxHarness`] with committed fixtures.
//! Each test writes through its own [`TxStorage`]; none of those writes may
//! leak into another test, whatever order the tests run in.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use pubcast::{Actor, ActorKind};
use pubcast_node::{
    build_router,
    storage::testing::{TxHarness, TxStorage},
    NodeConfig, Storage,
};
use tokio::sync::OnceCell;
use tower::ServiceExt;

const FIXTURES: &str = "
INSERT INTO groups (slug, name, note) VALUES ('fixture-group', 'Fixture Group', 'loaded once');
INSERT INTO organizations (slug, name, note) VALUES ('fixture-org', 'Fixture Org', '');
";

static HARNESS: OnceCell<TxHarness> = OnceCell::const_new();

/// Fixed location under cargo's per-target scratch directory, so each run
/// replaces the previous run's file instead of adding another one.
fn database_path() -> PathBuf {
    Path::new(env!("CARGO_TARGET_TMPDIR")).join("pubcast-transactional.db")
}

async fn harness() -> &'static TxHarness {
    HARNESS
        .get_or_init(|| async {
            let path = database_path();
            if path.exists() {
                std::fs::remove_file(&path).expect("remove stale test database");
            }
            let harness = TxHarness::open(&path).expect("prepare test database");
            harness.load_fixtures(FIXTURES).await.expect("load fixtures");
            harness
        })
        .await
}

async fn app() -> (Router, Arc<TxStorage>) {
    let storage = Arc::new(harness().await.begin().await.expect("begin test transaction"));
    let config = NodeConfig {
        bind_addr: "127.0.0.1:8080".parse().unwrap(),
        base_url: "https://localhost:8080".into(),
        db_path: None,
    };
    let router = build_router(Arc::clone(&storage) as Arc<dyn Storage>, config);
    (router, storage)
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, String) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn create_org(name: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/org")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(format!(r#"{{"name":"{name}","note":"foo"}}"#)))
        .unwrap()
}

#[tokio::test]
async fn first_test_creates_planet() {
    let (app, _storage) = app().await;

    let (status, _) = send(&app, get("/api/org/planet")).await;
    assert_eq!(status, StatusCode::NOT_FOUND, "planet leaked in from another test");

    let (status, _) = send(&app, create_org("planet")).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, get("/api/org/planet")).await;
    assert_eq!(status, StatusCode::OK);
    let actor: Actor = serde_json::from_str(&body).unwrap();
    assert_eq!(actor.name, "planet");
    assert_eq!(actor.kind, ActorKind::Organization);
}

#[tokio::test]
async fn second_test_creates_planet_too() {
    let (app, storage) = app().await;

    assert!(storage.get_organization("planet").await.unwrap().is_none());

    let (status, body) = send(&app, create_org("planet")).await;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {body}");
}

#[tokio::test]
async fn fixtures_are_visible() {
    let (app, _storage) = app().await;

    let (status, body) = send(&app, get("/api/group/fixture-group")).await;
    assert_eq!(status, StatusCode::OK);
    let actor: Actor = serde_json::from_str(&body).unwrap();
    assert_eq!(actor.kind, ActorKind::Group);
    assert_eq!(actor.summary.as_deref(), Some("loaded once"));

    let (status, _) = send(&app, get("/api/org/fixture-org")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn fixture_slug_collides_inside_a_test() {
    let (app, _storage) = app().await;

    let (status, _) = send(&app, create_org("Fixture Org")).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn missing_slug_reports_its_name() {
    let (app, _storage) = app().await;

    let (status, body) = send(&app, get("/api/org/i-dont-exist")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "i-dont-exist does not exist on this server");
}

#[tokio::test]
async fn database_lives_under_target_tmpdir() {
    let harness = harness().await;
    assert_eq!(harness.path(), database_path().as_path());
    assert!(harness.path().starts_with(env!("CARGO_TARGET_TMPDIR")));
}
