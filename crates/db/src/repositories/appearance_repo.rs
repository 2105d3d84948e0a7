//! Repository for the `character_appearances` table.

use async_trait::async_trait;
use smart_scene_core::appearance::Appearance;
use smart_scene_core::error::CoreError;
use smart_scene_core::source::AppearanceSource;
use smart_scene_core::types::VideoId;
use sqlx::PgPool;

use crate::models::appearance::{AppearanceRow, CreateAppearance};

/// Joined column list shared by the read queries.
const JOINED_COLUMNS: &str = "a.id, a.video_id, a.character_id, \
     c.name AS character_name, c.avatar AS character_avatar, \
     a.start_frame, a.end_frame, a.start_time, a.end_time, a.confidence, a.created_at";

pub struct AppearanceRepo;

impl AppearanceRepo {
    /// Insert an appearance, returning its id.
    pub async fn create(pool: &PgPool, input: &CreateAppearance) -> Result<i64, sqlx::Error> {
        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO character_appearances
                (video_id, character_id, start_frame, end_frame, start_time, end_time, confidence)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id",
        )
        .bind(input.video_id)
        .bind(input.character_id)
        .bind(input.start_frame)
        .bind(input.end_frame)
        .bind(input.start_time)
        .bind(input.end_time)
        .bind(input.confidence)
        .fetch_one(pool)
        .await?;
        Ok(id)
    }

    /// All appearances of active characters in a video, ordered by
    /// `start_time` then `character_id`.
    pub async fn list_by_video(pool: &PgPool, video_id: VideoId) -> Result<Vec<AppearanceRow>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}
             FROM character_appearances a
             JOIN characters c ON c.id = a.character_id
             WHERE a.video_id = $1 AND c.is_active = true
             ORDER BY a.start_time ASC, a.character_id ASC"
        );
        sqlx::query_as::<_, AppearanceRow>(&query)
            .bind(video_id)
            .fetch_all(pool)
            .await
    }
}

// ---------------------------------------------------------------------------
// Engine collaborator
// ---------------------------------------------------------------------------

/// [`AppearanceSource`] backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgAppearanceSource {
    pool: PgPool,
}

impl PgAppearanceSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppearanceSource for PgAppearanceSource {
    async fn fetch_appearances(&self, video_id: VideoId) -> Result<Vec<Appearance>, CoreError> {
        let rows = AppearanceRepo::list_by_video(&self.pool, video_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, %video_id, "Failed to load appearances");
                CoreError::Internal(format!("Failed to load appearances: {e}"))
            })?;
        tracing::debug!(%video_id, rows = rows.len(), "Loaded appearances");
        Ok(rows.into_iter().map(Appearance::from).collect())
    }
}
