//! Row models.

pub mod appearance;
