//! Character appearances as supplied by the appearance store.
//!
//! An [`Appearance`] is one detected time range of one character in one
//! video, already joined with the character's display fields. Records are
//! screened with [`screen_appearances`] before any interval work: invalid
//! rows are set aside (never fatal) so one bad row cannot hide every scene.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::interval::Interval;
use crate::types::{CharacterId, Seconds, VideoId};

/// One recorded appearance of a character in a video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appearance {
    pub character_id: CharacterId,
    pub character_name: String,
    pub character_avatar: Option<String>,
    pub video_id: VideoId,
    pub start_time: Seconds,
    pub end_time: Seconds,
    pub confidence: f64,
    pub start_frame: i32,
    pub end_frame: i32,
}

impl Appearance {
    /// Check the record's data invariants.
    pub fn validate(&self) -> Result<(), CoreError> {
        let reason = if !self.start_time.is_finite() || !self.end_time.is_finite() {
            Some("time bounds are not finite")
        } else if self.start_time > self.end_time {
            Some("start_time is after end_time")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(self.integrity_error(reason)),
            None => Ok(()),
        }
    }

    /// The appearance as an interval owned by its character.
    pub fn interval(&self) -> Interval {
        Interval::owned(self.start_time, self.end_time, self.character_id)
    }

    /// Length of the appearance, never negative.
    pub fn duration(&self) -> Seconds {
        (self.end_time - self.start_time).max(0.0)
    }

    /// Frame number at media time `t`, interpolated linearly between the
    /// recorded frame bounds and clamped to them.
    pub fn frame_at(&self, t: Seconds) -> i32 {
        let span = self.end_time - self.start_time;
        if span <= 0.0 {
            return self.start_frame;
        }
        let ratio = ((t - self.start_time) / span).clamp(0.0, 1.0);
        let frames = f64::from(self.end_frame - self.start_frame);
        self.start_frame + (ratio * frames).round() as i32
    }

    fn integrity_error(&self, reason: &'static str) -> CoreError {
        CoreError::DataIntegrity {
            character_id: self.character_id,
            start_time: self.start_time,
            end_time: self.end_time,
            reason,
        }
    }
}

// ---------------------------------------------------------------------------
// Screening
// ---------------------------------------------------------------------------

/// Outcome of [`screen_appearances`].
#[derive(Debug, Default)]
pub struct Screened {
    /// Records safe to feed into the interval engine.
    pub valid: Vec<Appearance>,
    /// One [`CoreError::DataIntegrity`] per skipped record.
    pub rejected: Vec<CoreError>,
}

/// Split fetched appearances into valid records and integrity violations.
///
/// A record is rejected when its time bounds are inverted or not finite, or
/// when it belongs to a video other than `video_id`.
pub fn screen_appearances(video_id: VideoId, appearances: Vec<Appearance>) -> Screened {
    let mut screened = Screened::default();
    for appearance in appearances {
        let check = if appearance.video_id != video_id {
            Err(appearance.integrity_error("belongs to a different video"))
        } else {
            appearance.validate()
        };
        match check {
            Ok(()) => screened.valid.push(appearance),
            Err(e) => screened.rejected.push(e),
        }
    }
    screened
}

/// Keep only appearances at or above `min_confidence`, when one is given.
pub fn filter_by_confidence(appearances: Vec<Appearance>, min_confidence: Option<f64>) -> Vec<Appearance> {
    match min_confidence {
        Some(min) => appearances
            .into_iter()
            .filter(|a| a.confidence >= min)
            .collect(),
        None => appearances,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
