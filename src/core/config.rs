//! Engine and validator configuration.
//!
//! Configuration is plain serde data with `Default` values and
//! builder-style setters:
//! - `ValidatorConfig`: roster size, move arity and timeout parameters
//!   consumed by the default validator.
//! - `EngineConfig`: engine-wide settings, carrying the validator defaults.

use serde::{Deserialize, Serialize};

/// Largest roster a side may field. Bounded by the packed KO bitmap width.
pub const MAX_TEAM_SIZE: usize = 8;

/// Largest move list a combatant may carry.
pub const MAX_MOVES_PER_MON: usize = 8;

/// Parameters of the default validator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Roster size every team must have.
    pub mons_per_team: usize,

    /// Number of moves every combatant must carry.
    pub moves_per_mon: usize,

    /// Time units a player may stay idle before forfeiting.
    pub timeout_duration: u64,

    /// Timeout multiplier applied on single-player decision turns.
    pub single_player_timeout_multiplier: u64,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            mons_per_team: 4,
            moves_per_mon: 4,
            timeout_duration: 60,
            single_player_timeout_multiplier: 2,
        }
    }
}

impl ValidatorConfig {
    #[must_use]
    pub fn with_mons_per_team(mut self, count: usize) -> Self {
        assert!(
            (1..=MAX_TEAM_SIZE).contains(&count),
            "mons_per_team must be 1..={MAX_TEAM_SIZE}"
        );
        self.mons_per_team = count;
        self
    }

    #[must_use]
    pub fn with_moves_per_mon(mut self, count: usize) -> Self {
        assert!(count <= MAX_MOVES_PER_MON, "moves_per_mon must be <= {MAX_MOVES_PER_MON}");
        self.moves_per_mon = count;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, duration: u64) -> Self {
        self.timeout_duration = duration;
        self
    }

    #[must_use]
    pub fn with_single_player_multiplier(mut self, multiplier: u64) -> Self {
        self.single_player_timeout_multiplier = multiplier;
        self
    }

    /// Idle allowance on a single-player decision turn.
    #[must_use]
    pub fn single_player_timeout(&self) -> u64 {
        self.timeout_duration
            .saturating_mul(self.single_player_timeout_multiplier)
    }
}

/// Engine-wide configuration.
///
/// ```
/// use monclash::core::EngineConfig;
///
/// let config = EngineConfig::default().with_timeout(30);
/// assert_eq!(config.validator.timeout_duration, 30);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Defaults handed to validators built by `DefaultValidator::from_engine`.
    pub validator: ValidatorConfig,

    /// Log every effect invocation at `trace` level.
    pub trace_effects: bool,
}

impl EngineConfig {
    #[must_use]
    pub fn with_validator(mut self, validator: ValidatorConfig) -> Self {
        self.validator = validator;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, duration: u64) -> Self {
        self.validator.timeout_duration = duration;
        self
    }

    #[must_use]
    pub fn with_effect_tracing(mut self, enabled: bool) -> Self {
        self.trace_effects = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ValidatorConfig::default();
        assert_eq!(config.mons_per_team, 4);
        assert_eq!(config.moves_per_mon, 4);
        assert_eq!(config.single_player_timeout(), 120);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{ "validator": { "timeout_duration": 10 } }"#).unwrap();
        assert_eq!(config.validator.timeout_duration, 10);
        assert_eq!(config.validator.mons_per_team, 4);
        assert!(!config.trace_effects);
    }

    #[test]
    fn test_round_trip() {
        let config = EngineConfig::default()
            .with_validator(ValidatorConfig::default().with_mons_per_team(6))
            .with_effect_tracing(true);
        let json = serde_json::to_string(&config).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    #[should_panic(expected = "mons_per_team must be")]
    fn test_team_size_bound() {
        let _ = ValidatorConfig::default().with_mons_per_team(MAX_TEAM_SIZE + 1);
    }
}
