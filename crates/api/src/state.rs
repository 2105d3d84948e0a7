use std::sync::Arc;

use crate::config::ServerConfig;
use crate::engine::SceneFinder;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: inner data is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (health checks).
    pub pool: smart_scene_db::DbPool,
    /// Server configuration (read by the auth extractor).
    pub config: Arc<ServerConfig>,
    /// Scene engine boundary with its injected appearance source.
    pub scene_finder: Arc<SceneFinder>,
}
