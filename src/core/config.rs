//! Battle configuration with documented constants
//!
//! All magic numbers of the resolution engine are collected here with
//! explanations of their purpose and how they interact with each other.

use serde::{Deserialize, Serialize};

use crate::battle::constants::{CASUALTY_RATE_CAP, MORALE_MAX, MORALE_MIN};
use crate::core::error::{BattleError, Result};

/// Configuration for battle resolution
///
/// The defaults reproduce the classic rules. Scenario files may override
/// any subset of them through a `[config]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    // === CASUALTIES ===
    /// Fraction of a side lost per phase when both sides are equally strong
    ///
    /// Scaled by the power ratio: the stronger side's rate shrinks, the
    /// weaker side's rate grows by the same factor.
    pub base_casualty_rate: f32,

    /// Hard cap on the per-phase casualty rate of a side
    ///
    /// May be lowered but never raised above `CASUALTY_RATE_CAP`.
    pub max_casualty_rate: f32,

    /// Power ratio used when one side has no power at all
    ///
    /// Treated as an overwhelming advantage for the other side.
    pub zero_power_ratio: f32,

    // === MORALE ===
    /// Size-weighted average morale below which a side collapses
    ///
    /// Must sit above the unit morale floor, otherwise collapse can never fire.
    pub morale_collapse_threshold: f32,

    // === DUEL ===
    /// Chance that champions duel before the first round
    pub duel_chance: f32,

    /// Morale gained by the duel winner's units (and lost by the loser's)
    pub duel_morale_swing: u32,

    // === OUTCOME ===
    /// Survivor ratio at or above which a victory is decisive
    pub decisive_survivor_ratio: f32,

    /// Fatigue added to the winner's units after the battle
    pub victory_fatigue: u32,

    /// Fatigue added to both sides' units after a draw
    pub draw_fatigue: u32,

    // === EXPERIENCE ===
    /// Experience every unit gains per phase fought
    pub unit_experience_per_phase: u32,

    /// Phase casualties per commander experience point
    pub commander_experience_divisor: u32,

    /// Total casualties per reported experience point
    pub result_experience_divisor: u32,

    /// Minimum reported experience of a battle
    pub min_result_experience: u32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            // Casualties
            base_casualty_rate: 0.05,
            max_casualty_rate: 0.3,
            zero_power_ratio: 10.0,

            // Morale
            morale_collapse_threshold: 20.0,

            // Duel
            duel_chance: 0.3,
            duel_morale_swing: 10,

            // Outcome
            decisive_survivor_ratio: 0.6,
            victory_fatigue: 30,
            draw_fatigue: 20,

            // Experience
            unit_experience_per_phase: 1,
            commander_experience_divisor: 200,
            result_experience_divisor: 100,
            min_result_experience: 10,
        }
    }
}

impl BattleConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| -> Result<()> { Err(BattleError::InvalidConfiguration(msg)) };

        if !(0.0..=CASUALTY_RATE_CAP).contains(&self.base_casualty_rate)
            || !(0.0..=CASUALTY_RATE_CAP).contains(&self.max_casualty_rate)
        {
            return invalid(format!(
                "casualty rates must lie in [0, {}] (base {}, max {})",
                CASUALTY_RATE_CAP, self.base_casualty_rate, self.max_casualty_rate
            ));
        }

        if self.max_casualty_rate < self.base_casualty_rate {
            return invalid(format!(
                "max_casualty_rate ({}) should be >= base_casualty_rate ({})",
                self.max_casualty_rate, self.base_casualty_rate
            ));
        }

        if self.zero_power_ratio < 1.0 {
            return invalid(format!(
                "zero_power_ratio ({}) must be at least 1",
                self.zero_power_ratio
            ));
        }

        if self.morale_collapse_threshold <= MORALE_MIN as f32
            || self.morale_collapse_threshold > MORALE_MAX as f32
        {
            return invalid(format!(
                "morale_collapse_threshold ({}) must lie in ({}, {}]",
                self.morale_collapse_threshold, MORALE_MIN, MORALE_MAX
            ));
        }

        if !(0.0..=1.0).contains(&self.duel_chance) {
            return invalid(format!("duel_chance ({}) must lie in [0, 1]", self.duel_chance));
        }

        if self.commander_experience_divisor == 0 || self.result_experience_divisor == 0 {
            return invalid("experience divisors must be positive".into());
        }

        Ok(())
    }
}

// === GLOBAL CONFIG ACCESS ===

use std::sync::OnceLock;

static CONFIG: OnceLock<BattleConfig> = OnceLock::new();

/// Get the global battle config (initializes with defaults if not set)
pub fn config() -> &'static BattleConfig {
    CONFIG.get_or_init(BattleConfig::default)
}

/// Set the global battle config (can only be called once)
///
/// The config is validated first. Returns Err if it is invalid or if a
/// config was already set or read.
pub fn set_config(config: BattleConfig) -> Result<()> {
    config.validate()?;
    CONFIG.set(config).map_err(|_| BattleError::ConfigAlreadySet)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(BattleConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unreachable_collapse() {
        let config = BattleConfig {
            morale_collapse_threshold: 5.0,
            ..BattleConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_rates() {
        let config = BattleConfig {
            base_casualty_rate: 0.25,
            max_casualty_rate: 0.2,
            ..BattleConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(BattleError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_validate_rejects_rate_cap_above_limit() {
        let config = BattleConfig {
            max_casualty_rate: 0.9,
            ..BattleConfig::default()
        };
        assert!(config.validate().is_err());

        let lowered = BattleConfig {
            max_casualty_rate: 0.2,
            ..BattleConfig::default()
        };
        assert!(lowered.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_duel_chance() {
        let config = BattleConfig {
            duel_chance: 1.5,
            ..BattleConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_set_config_rejects_invalid() {
        let config = BattleConfig {
            max_casualty_rate: 0.9,
            ..BattleConfig::default()
        };
        assert!(matches!(
            set_config(config),
            Err(BattleError::InvalidConfiguration(_))
        ));
        assert!(super::config().validate().is_ok());
    }

    #[test]
    fn test_set_config_only_once() {
        // Another test may already have read the defaults
        match set_config(BattleConfig::default()) {
            Ok(()) | Err(BattleError::ConfigAlreadySet) => {}
            Err(e) => panic!("unexpected error: {}", e),
        }
        assert!(matches!(
            set_config(BattleConfig::default()),
            Err(BattleError::ConfigAlreadySet)
        ));
        assert_eq!(*super::config(), BattleConfig::default());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: BattleConfig = toml::from_str("duel_chance = 1.0").unwrap();
        assert_eq!(config.duel_chance, 1.0);
        assert_eq!(config.max_casualty_rate, 0.3);
    }
}
