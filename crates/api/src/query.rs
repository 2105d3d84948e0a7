//! Query parameter types for the video endpoints.
//!
//! Raw strings are deserialized here and converted into core criteria
//! types, so handlers only see validated values.

use serde::Deserialize;
use smart_scene_core::error::CoreError;
use smart_scene_core::pagination::PageRequest;
use smart_scene_core::scene_query::{parse_character_ids, SceneQuery};
use smart_scene_core::summary::{SummaryFilter, SummarySort};

/// `GET /videos/{video_id}/scenes` parameters.
///
/// Character lists are comma-separated UUIDs. Paging values are normalized
/// by [`PageRequest::new`].
#[derive(Debug, Default, Deserialize)]
pub struct SceneParams {
    pub include_characters: Option<String>,
    pub exclude_characters: Option<String>,
    pub min_confidence: Option<f64>,
    pub min_duration: Option<f64>,
    pub max_duration: Option<f64>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl SceneParams {
    pub fn to_page(&self) -> PageRequest {
        PageRequest::new(self.page, self.page_size)
    }

    pub fn to_query(&self) -> Result<SceneQuery, CoreError> {
        let query = SceneQuery {
            include: parse_character_ids(self.include_characters.as_deref(), "include_characters")?,
            exclude: parse_character_ids(self.exclude_characters.as_deref(), "exclude_characters")?,
            min_confidence: self.min_confidence,
            min_duration: self.min_duration,
            max_duration: self.max_duration,
        };
        query.validate()?;
        Ok(query)
    }
}

/// `GET /videos/{video_id}/characters` parameters.
#[derive(Debug, Default, Deserialize)]
pub struct SummaryParams {
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    /// Combined `field.order` form, e.g. `total_duration.desc`.
    pub sort: Option<String>,
    pub character_name: Option<String>,
    pub min_confidence: Option<f64>,
    pub min_appearances: Option<usize>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl SummaryParams {
    pub fn to_page(&self) -> PageRequest {
        PageRequest::new(self.page, self.page_size)
    }

    pub fn to_sort(&self) -> Result<SummarySort, CoreError> {
        SummarySort::parse(
            self.sort_by.as_deref(),
            self.sort_order.as_deref(),
            self.sort.as_deref(),
        )
    }

    pub fn to_filter(&self) -> Result<SummaryFilter, CoreError> {
        let filter = SummaryFilter {
            character_name: self
                .character_name
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            min_confidence: self.min_confidence,
            min_appearances: self.min_appearances,
        };
        filter.validate()?;
        Ok(filter)
    }
}
