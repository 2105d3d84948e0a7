use std::sync::Arc;

use smart_scene_core::appearance::{screen_appearances, Appearance};
use smart_scene_core::error::CoreError;
use smart_scene_core::pagination::{paginate, PageRequest};
use smart_scene_core::scene::{find_scenes, ScenePage};
use smart_scene_core::scene_query::SceneQuery;
use smart_scene_core::source::AppearanceSource;
use smart_scene_core::summary::{character_summary, SummaryFilter, SummaryPage, SummarySort};
use smart_scene_core::types::VideoId;

/// Computes scenes and character summaries for one video per call.
///
/// Holds no per-request state, so one instance is shared by all handlers.
pub struct SceneFinder {
    source: Arc<dyn AppearanceSource>,
}

impl SceneFinder {
    pub fn new(source: Arc<dyn AppearanceSource>) -> Self {
        Self { source }
    }

    /// Scenes of `video_id` matching `query`, one page at a time.
    ///
    /// The query is validated before the store is touched.
    pub async fn compute_scenes(
        &self,
        video_id: VideoId,
        query: &SceneQuery,
        page: PageRequest,
    ) -> Result<ScenePage, CoreError> {
        query.validate()?;

        let appearances = self.load(video_id).await?;
        let scenes = find_scenes(video_id, appearances, query)?;

        tracing::info!(
            %video_id,
            include = query.include.len(),
            exclude = query.exclude.len(),
            scenes = scenes.len(),
            "Computed scenes"
        );
        Ok(paginate(scenes, page))
    }

    /// Per-character rollup of `video_id`, filtered and sorted, one page at a
    /// time.
    pub async fn compute_character_summary(
        &self,
        video_id: VideoId,
        sort: SummarySort,
        filter: &SummaryFilter,
        page: PageRequest,
    ) -> Result<SummaryPage, CoreError> {
        filter.validate()?;

        let appearances = self.load(video_id).await?;
        let summaries = character_summary(&appearances, filter, sort)?;

        tracing::info!(
            %video_id,
            sort_by = %sort.field,
            summaries = summaries.len(),
            "Computed character summary"
        );
        Ok(paginate(summaries, page))
    }

    /// Fetch and screen the video's appearances. Bad records are logged and
    /// skipped.
    async fn load(&self, video_id: VideoId) -> Result<Vec<Appearance>, CoreError> {
        let raw = self.source.fetch_appearances(video_id).await?;
        let fetched = raw.len();

        let screened = screen_appearances(video_id, raw);
        for rejected in &screened.rejected {
            tracing::warn!(%video_id, error = %rejected, "Skipping invalid appearance");
        }

        tracing::debug!(
            %video_id,
            fetched,
            skipped = screened.rejected.len(),
            "Screened appearances"
        );
        Ok(screened.valid)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
