use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

const SERVICE_NAME: &str = "smart-scene";

#[derive(Serialize)]
pub struct HealthResponse {
    pub service: &'static str,
    /// `ok`, or `degraded` when the appearance store is unreachable.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
}

/// GET /health
///
/// Unauthenticated. Scene and summary requests need the database, so a failed
/// ping reports the service as degraded while still answering 200.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = smart_scene_db::health_check(&state.pool).await.is_ok();
    if !db_healthy {
        tracing::warn!("Health check could not reach the appearance store");
    }

    Json(HealthResponse {
        service: SERVICE_NAME,
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}

/// Mounted at the root, outside `/api/v1` and its bearer-token extractors.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
