use crate::types::{CharacterId, Seconds};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A stored record violates a data invariant. Computations skip the
    /// offending record instead of failing.
    #[error("Data integrity violation for character {character_id} [{start_time}, {end_time}]: {reason}")]
    DataIntegrity {
        character_id: CharacterId,
        start_time: Seconds,
        end_time: Seconds,
        reason: &'static str,
    },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
