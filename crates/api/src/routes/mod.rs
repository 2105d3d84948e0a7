pub mod health;
pub mod video;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Every route requires a Bearer token.
///
/// ```text
/// /videos/{video_id}/scenes                        scenes matching include/exclude filters
/// /videos/{video_id}/characters                    per-character screen-time summary
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/videos", video::router())
}
