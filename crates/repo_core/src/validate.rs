use crate::core_api::{PlayerUpgrades, SaveError, SaveErrorKind, WorldRecord};
use crate::document::SaveDocument;

pub const HEALTH_MIN: i64 = 0;
pub const HEALTH_MAX: i64 = 200;
pub const LEVEL_MIN: i64 = 1;

/// Checks a proposed player mutation: the id must exist in `playerNames`,
/// health must lie in `[0, 200]`, every upgrade must be non-negative.
/// Short-circuits on the first violated rule.
pub fn validate_player(
    document: &SaveDocument,
    id: &str,
    health: i64,
    upgrades: &PlayerUpgrades,
) -> Result<(), SaveError> {
    if !document.has_player(id) {
        return Err(violation(format!("unknown player id: {id}")));
    }
    if !(HEALTH_MIN..=HEALTH_MAX).contains(&health) {
        return Err(violation(format!(
            "health must be between {HEALTH_MIN} and {HEALTH_MAX}, got {health}"
        )));
    }
    for (name, value) in upgrades.named() {
        if value < 0 {
            return Err(violation(format!(
                "upgrade {name} must be non-negative, got {value}"
            )));
        }
    }
    Ok(())
}

/// Checks a proposed world mutation. Field presence is guaranteed by the
/// record type, so only range rules remain; short-circuits on the first
/// violation.
pub fn validate_world(record: &WorldRecord) -> Result<(), SaveError> {
    if record.level < LEVEL_MIN {
        return Err(violation(format!(
            "level must be at least {LEVEL_MIN}, got {}",
            record.level
        )));
    }
    if record.currency < 0 {
        return Err(violation(format!(
            "currency must be non-negative, got {}",
            record.currency
        )));
    }
    if record.lives < 0 {
        return Err(violation(format!(
            "lives must be non-negative, got {}",
            record.lives
        )));
    }
    if record.charging_station < 0 {
        return Err(violation(format!(
            "charging station charge must be non-negative, got {}",
            record.charging_station
        )));
    }
    if record.total_haul < 0 {
        return Err(violation(format!(
            "total haul must be non-negative, got {}",
            record.total_haul
        )));
    }
    if record.team_name.is_empty() {
        return Err(violation("team name must not be empty"));
    }
    Ok(())
}

fn violation(message: impl Into<String>) -> SaveError {
    SaveError::new(SaveErrorKind::Validation, message)
}
