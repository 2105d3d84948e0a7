//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod appearance_repo;

pub use appearance_repo::{AppearanceRepo, PgAppearanceSource};
