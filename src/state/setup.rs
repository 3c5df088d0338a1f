//! Checks applied to the setup form before a game may start

use super::GameError;
use crate::types::{max_imposters, GameSettings, MAX_PLAYERS, MIN_PLAYERS};

/// Trim names, drop blanks, and check the roster and imposter count bounds.
/// Returns the cleaned names in their submitted order.
pub fn validate_setup(names: &[String], settings: &GameSettings) -> Result<Vec<String>, GameError> {
    let names: Vec<String> = names
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect();

    if names.len() < MIN_PLAYERS {
        return Err(GameError::InvalidSetup(format!(
            "You need at least {} players to start",
            MIN_PLAYERS
        )));
    }
    if names.len() > MAX_PLAYERS {
        return Err(GameError::InvalidSetup(format!(
            "At most {} players can play",
            MAX_PLAYERS
        )));
    }

    let max = max_imposters(names.len());
    if settings.imposter_count < 1 || settings.imposter_count > max {
        return Err(GameError::InvalidSetup(format!(
            "Imposter count must be between 1 and {} for {} players",
            max,
            names.len()
        )));
    }

    Ok(names)
}
