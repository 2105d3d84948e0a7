//! Scene engine boundary.
//!
//! Wraps the pure core pipeline with the fetch from an injected
//! [`AppearanceSource`](smart_scene_core::source::AppearanceSource), record
//! screening, logging, and pagination.

pub mod scene_finder;

pub use scene_finder::SceneFinder;
