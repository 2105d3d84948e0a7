//! Smart Scene core library.
//!
//! Pure, synchronous domain logic: the interval algebra used to find scenes
//! in a video, the per-character summary rollup, pagination and sorting
//! helpers, and the [`source::AppearanceSource`] trait the persistence layer
//! implements. This crate has no database or HTTP dependencies; all data is
//! passed in by the caller.

pub mod appearance;
pub mod error;
pub mod interval;
pub mod pagination;
pub mod scene;
pub mod scene_query;
pub mod source;
pub mod summary;
pub mod timecode;
pub mod types;
