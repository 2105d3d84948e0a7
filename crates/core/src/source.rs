//! The appearance store as seen by the engine.

use async_trait::async_trait;

use crate::appearance::Appearance;
use crate::error::CoreError;
use crate::types::VideoId;

/// Supplies the raw appearances of one video.
///
/// Implementations return every appearance row of active characters for the
/// video, in any order. Rows are not validated here; the caller screens them.
/// A video with no appearances is `Ok(vec![])`, not an error.
#[async_trait]
pub trait AppearanceSource: Send + Sync {
    async fn fetch_appearances(&self, video_id: VideoId) -> Result<Vec<Appearance>, CoreError>;
}
