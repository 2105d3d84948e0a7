#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use smart_scene_api::auth::jwt::{generate_access_token, JwtConfig};
use smart_scene_api::config::ServerConfig;
use smart_scene_api::engine::SceneFinder;
use smart_scene_api::router::build_app_router;
use smart_scene_api::state::AppState;
use smart_scene_db::repositories::PgAppearanceSource;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database_url: String::new(),
        db_max_connections: 5,
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router over `pool`, with the same middleware
/// stack production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let scene_finder = Arc::new(SceneFinder::new(Arc::new(PgAppearanceSource::new(pool.clone()))));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        scene_finder,
    };

    build_app_router(state, &config)
}

/// A valid bearer token signed with the test secret.
pub fn auth_token() -> String {
    generate_access_token(Uuid::new_v4(), "viewer", &test_config().jwt).unwrap()
}

/// Send an unauthenticated GET.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a GET with a valid bearer token.
pub async fn get_authed(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("Authorization", format!("Bearer {}", auth_token()))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Seed helpers
// ---------------------------------------------------------------------------

pub async fn insert_video(pool: &PgPool) -> Uuid {
    let (id,): (Uuid,) = sqlx::query_as("INSERT INTO videos (title) VALUES ('Episode 1') RETURNING id")
        .fetch_one(pool)
        .await
        .unwrap();
    id
}

pub async fn insert_character(pool: &PgPool, name: &str) -> Uuid {
    let (id,): (Uuid,) = sqlx::query_as("INSERT INTO characters (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap();
    id
}

/// Insert one appearance at 25 fps with confidence `confidence`.
pub async fn insert_appearance(
    pool: &PgPool,
    video_id: Uuid,
    character_id: Uuid,
    start: f64,
    end: f64,
    confidence: f64,
) {
    sqlx::query(
        "INSERT INTO character_appearances
            (video_id, character_id, start_frame, end_frame, start_time, end_time, confidence)
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(video_id)
    .bind(character_id)
    .bind((start * 25.0) as i32)
    .bind((end * 25.0) as i32)
    .bind(start)
    .bind(end)
    .bind(confidence)
    .execute(pool)
    .await
    .unwrap();
}
