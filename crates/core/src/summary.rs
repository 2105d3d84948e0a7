//! Per-character screen-time rollup.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::appearance::Appearance;
use crate::error::CoreError;
use crate::pagination::Page;
use crate::timecode::format_hms;
use crate::types::{CharacterId, Seconds, VideoId};

/// Screen-time statistics for one character in one video.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterSummary {
    pub video_id: VideoId,
    pub character_id: CharacterId,
    pub character_name: String,
    pub character_avatar: Option<String>,
    pub appearance_count: usize,
    /// Sum of appearance durations; overlapping appearances count twice.
    pub total_duration: Seconds,
    pub first_appearance: Seconds,
    pub last_appearance: Seconds,
    pub avg_confidence: f64,
    pub first_appearance_frame: i32,
    pub last_appearance_frame: i32,
    pub first_appearance_formatted: String,
    pub last_appearance_formatted: String,
}

pub type SummaryPage = Page<CharacterSummary>;

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummarySortField {
    AppearanceCount,
    TotalDuration,
    FirstAppearance,
    CharacterName,
    AvgConfidence,
}

impl FromStr for SummarySortField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "appearance_count" => Ok(Self::AppearanceCount),
            "total_duration" => Ok(Self::TotalDuration),
            "first_appearance" => Ok(Self::FirstAppearance),
            "character_name" => Ok(Self::CharacterName),
            "avg_confidence" | "confidence" => Ok(Self::AvgConfidence),
            other => Err(CoreError::Validation(format!(
                "Unknown sort field '{other}'. Allowed: appearance_count, total_duration, \
                 first_appearance, character_name, avg_confidence"
            ))),
        }
    }
}

impl fmt::Display for SummarySortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AppearanceCount => "appearance_count",
            Self::TotalDuration => "total_duration",
            Self::FirstAppearance => "first_appearance",
            Self::CharacterName => "character_name",
            Self::AvgConfidence => "avg_confidence",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(CoreError::Validation(format!(
                "Unknown sort order '{s}'. Allowed: asc, desc"
            ))),
        }
    }
}

/// Sort key for summaries. Defaults to `appearance_count desc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummarySort {
    pub field: SummarySortField,
    pub order: SortOrder,
}

impl Default for SummarySort {
    fn default() -> Self {
        Self {
            field: SummarySortField::AppearanceCount,
            order: SortOrder::Desc,
        }
    }
}

impl SummarySort {
    /// Build a sort from query parameters.
    ///
    /// `combined` is the `field.order` form (`sort=total_duration.asc`); when
    /// present it wins over `sort_by` / `sort_order`. A combined value without
    /// an order, or a `sort_by` without `sort_order`, sorts descending.
    pub fn parse(
        sort_by: Option<&str>,
        sort_order: Option<&str>,
        combined: Option<&str>,
    ) -> Result<Self, CoreError> {
        let (field, order) = match combined.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => match raw.split_once('.') {
                Some((field, order)) => (Some(field), Some(order)),
                None => (Some(raw), None),
            },
            None => (sort_by, sort_order),
        };

        let mut sort = Self::default();
        if let Some(field) = field.map(str::trim).filter(|s| !s.is_empty()) {
            sort.field = field.parse()?;
        }
        if let Some(order) = order.map(str::trim).filter(|s| !s.is_empty()) {
            sort.order = order.parse()?;
        }
        Ok(sort)
    }

    fn compare(&self, a: &CharacterSummary, b: &CharacterSummary) -> Ordering {
        let primary = match self.field {
            SummarySortField::AppearanceCount => a.appearance_count.cmp(&b.appearance_count),
            SummarySortField::TotalDuration => a.total_duration.total_cmp(&b.total_duration),
            SummarySortField::FirstAppearance => a.first_appearance.total_cmp(&b.first_appearance),
            SummarySortField::CharacterName => a
                .character_name
                .to_lowercase()
                .cmp(&b.character_name.to_lowercase()),
            SummarySortField::AvgConfidence => a.avg_confidence.total_cmp(&b.avg_confidence),
        };
        let primary = match self.order {
            SortOrder::Asc => primary,
            SortOrder::Desc => primary.reverse(),
        };
        primary.then_with(|| a.character_id.cmp(&b.character_id))
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Optional post-aggregation filters. All bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryFilter {
    /// Case-insensitive substring of the character name.
    pub character_name: Option<String>,
    pub min_confidence: Option<f64>,
    pub min_appearances: Option<usize>,
}

impl SummaryFilter {
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(min) = self.min_confidence {
            if !min.is_finite() || min < 0.0 {
                return Err(CoreError::Validation(
                    "min_confidence must be a non-negative number".to_string(),
                ));
            }
        }
        Ok(())
    }

    pub fn matches(&self, summary: &CharacterSummary) -> bool {
        let name_ok = self.character_name.as_deref().map_or(true, |needle| {
            summary
                .character_name
                .to_lowercase()
                .contains(&needle.to_lowercase())
        });
        name_ok
            && self
                .min_confidence
                .map_or(true, |min| summary.avg_confidence >= min)
            && self
                .min_appearances
                .map_or(true, |min| summary.appearance_count >= min)
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Roll appearances up per character, in `character_id` order.
///
/// `appearances` must already have passed
/// [`screen_appearances`](crate::appearance::screen_appearances).
pub fn summarize(appearances: &[Appearance]) -> Vec<CharacterSummary> {
    let mut groups: BTreeMap<CharacterId, Vec<&Appearance>> = BTreeMap::new();
    for appearance in appearances {
        groups.entry(appearance.character_id).or_default().push(appearance);
    }

    groups.into_values().filter_map(|group| rollup(&group)).collect()
}

fn rollup(group: &[&Appearance]) -> Option<CharacterSummary> {
    let head = *group.first()?;
    let count = group.len();

    let total_duration = group.iter().map(|a| a.duration()).sum::<f64>();
    let first_appearance = group.iter().map(|a| a.start_time).fold(f64::INFINITY, f64::min);
    let last_appearance = group.iter().map(|a| a.end_time).fold(f64::NEG_INFINITY, f64::max);
    let avg_confidence = group.iter().map(|a| a.confidence).sum::<f64>() / count as f64;
    let first_appearance_frame = group.iter().map(|a| a.start_frame).min().unwrap_or_default();
    let last_appearance_frame = group.iter().map(|a| a.end_frame).max().unwrap_or_default();

    Some(CharacterSummary {
        video_id: head.video_id,
        character_id: head.character_id,
        character_name: head.character_name.clone(),
        character_avatar: head.character_avatar.clone(),
        appearance_count: count,
        total_duration,
        first_appearance,
        last_appearance,
        avg_confidence,
        first_appearance_frame,
        last_appearance_frame,
        first_appearance_formatted: format_hms(first_appearance),
        last_appearance_formatted: format_hms(last_appearance),
    })
}

/// Summarize, filter and sort in one pass. An empty input yields an empty
/// list.
pub fn character_summary(
    appearances: &[Appearance],
    filter: &SummaryFilter,
    sort: SummarySort,
) -> Result<Vec<CharacterSummary>, CoreError> {
    filter.validate()?;

    let mut summaries: Vec<CharacterSummary> = summarize(appearances)
        .into_iter()
        .filter(|s| filter.matches(s))
        .collect();
    summaries.sort_by(|a, b| sort.compare(a, b));
    Ok(summaries)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
