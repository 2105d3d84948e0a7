//! Handlers for the per-video scene and character endpoints.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use smart_scene_core::error::CoreError;
use smart_scene_core::scene::ScenePage;
use smart_scene_core::summary::SummaryPage;
use smart_scene_core::types::VideoId;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::{SceneParams, SummaryParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/videos/{video_id}/scenes
pub async fn list_scenes(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    params: Result<Query<SceneParams>, QueryRejection>,
) -> AppResult<Json<DataResponse<ScenePage>>> {
    let video_id = parse_video_id(&video_id)?;
    let Query(params) = params?;
    let query = params.to_query()?;

    tracing::debug!(user_id = %auth.user_id, %video_id, "Listing scenes");

    let page = state
        .scene_finder
        .compute_scenes(video_id, &query, params.to_page())
        .await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/videos/{video_id}/characters
pub async fn list_characters(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    params: Result<Query<SummaryParams>, QueryRejection>,
) -> AppResult<Json<DataResponse<SummaryPage>>> {
    let video_id = parse_video_id(&video_id)?;
    let Query(params) = params?;
    let sort = params.to_sort()?;
    let filter = params.to_filter()?;

    tracing::debug!(user_id = %auth.user_id, %video_id, "Listing character summary");

    let page = state
        .scene_finder
        .compute_character_summary(video_id, sort, &filter, params.to_page())
        .await?;
    Ok(Json(DataResponse { data: page }))
}

/// Path ids are parsed here, not by `Path<Uuid>`, so a malformed id gets
/// the standard JSON validation error.
fn parse_video_id(raw: &str) -> Result<VideoId, CoreError> {
    Uuid::parse_str(raw).map_err(|_| CoreError::Validation(format!("Invalid video id '{raw}'")))
}
