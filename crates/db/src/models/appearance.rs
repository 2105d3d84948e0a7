//! Character appearance rows and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smart_scene_core::appearance::Appearance;
use smart_scene_core::types::{CharacterId, VideoId};
use sqlx::FromRow;

/// A `character_appearances` row joined with its character's profile.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AppearanceRow {
    pub id: i64,
    pub video_id: VideoId,
    pub character_id: CharacterId,
    pub character_name: String,
    pub character_avatar: Option<String>,
    pub start_frame: i32,
    pub end_frame: i32,
    pub start_time: f64,
    pub end_time: f64,
    pub confidence: f64,
    pub created_at: DateTime<Utc>,
}

impl From<AppearanceRow> for Appearance {
    fn from(row: AppearanceRow) -> Self {
        Appearance {
            character_id: row.character_id,
            character_name: row.character_name,
            character_avatar: row.character_avatar,
            video_id: row.video_id,
            start_time: row.start_time,
            end_time: row.end_time,
            confidence: row.confidence,
            start_frame: row.start_frame,
            end_frame: row.end_frame,
        }
    }
}

/// DTO for recording a new appearance.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAppearance {
    pub video_id: VideoId,
    pub character_id: CharacterId,
    pub start_frame: i32,
    pub end_frame: i32,
    pub start_time: f64,
    pub end_time: f64,
    pub confidence: f64,
}
