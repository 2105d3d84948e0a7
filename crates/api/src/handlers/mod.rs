//! Request handlers.
//!
//! Handlers parse and validate input, delegate to the
//! [`SceneFinder`](crate::engine::SceneFinder) held in state, and map errors
//! via [`AppError`](crate::error::AppError).

pub mod video;
