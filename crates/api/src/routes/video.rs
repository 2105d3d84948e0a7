//! Route definitions for per-video scene queries.
//!
//! Mounted at `/videos`.
//!
//! ```text
//! GET  /{video_id}/scenes        list_scenes
//! GET  /{video_id}/characters    list_characters
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::video;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{video_id}/scenes", get(video::list_scenes))
        .route("/{video_id}/characters", get(video::list_characters))
}
