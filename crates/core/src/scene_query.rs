//! Scene search criteria and their validation.

use std::collections::HashSet;

use uuid::Uuid;

use crate::error::CoreError;
use crate::types::{CharacterId, Seconds};

/// Criteria for a scene search within one video.
///
/// `include` uses AND semantics: every listed character must be on screen.
/// `exclude` uses NOT semantics: none of them may be. An empty `include`
/// means "no required characters" and returns every presence window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneQuery {
    pub include: Vec<CharacterId>,
    pub exclude: Vec<CharacterId>,
    /// Appearances below this confidence are ignored.
    pub min_confidence: Option<f64>,
    /// Inclusive lower bound on scene duration.
    pub min_duration: Option<Seconds>,
    /// Inclusive upper bound on scene duration.
    pub max_duration: Option<Seconds>,
}

impl SceneQuery {
    pub fn new(include: Vec<CharacterId>, exclude: Vec<CharacterId>) -> Self {
        Self {
            include,
            exclude,
            ..Self::default()
        }
    }

    /// Reject contradictory or out-of-range criteria.
    pub fn validate(&self) -> Result<(), CoreError> {
        let excluded: HashSet<_> = self.exclude.iter().collect();
        if let Some(id) = self.include.iter().find(|id| excluded.contains(id)) {
            return Err(CoreError::Validation(format!(
                "Character {id} cannot be both included and excluded"
            )));
        }

        check_non_negative("min_confidence", self.min_confidence)?;
        check_non_negative("min_duration", self.min_duration)?;
        check_non_negative("max_duration", self.max_duration)?;

        if let (Some(min), Some(max)) = (self.min_duration, self.max_duration) {
            if min > max {
                return Err(CoreError::Validation(format!(
                    "min_duration ({min}) must not exceed max_duration ({max})"
                )));
            }
        }
        Ok(())
    }

    /// Whether a scene of `duration` seconds passes the duration bounds.
    pub fn accepts_duration(&self, duration: Seconds) -> bool {
        self.min_duration.map_or(true, |min| duration >= min)
            && self.max_duration.map_or(true, |max| duration <= max)
    }
}

fn check_non_negative(name: &str, value: Option<f64>) -> Result<(), CoreError> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(CoreError::Validation(format!(
            "{name} must be a non-negative number"
        ))),
        _ => Ok(()),
    }
}

/// Parse a comma-separated list of character UUIDs from query parameter
/// `param`.
///
/// Blank entries are ignored and duplicates collapsed, keeping first-seen
/// order. `None` yields an empty list.
pub fn parse_character_ids(raw: Option<&str>, param: &str) -> Result<Vec<CharacterId>, CoreError> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };

    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let id = Uuid::parse_str(part).map_err(|_| {
            CoreError::Validation(format!("Invalid character id '{part}' in {param}"))
        })?;
        if seen.insert(id) {
            ids.push(id);
        }
    }
    Ok(ids)
}
