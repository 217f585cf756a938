//! Tunable battle rule constants.
//!
//! Every number the turn engine uses to decide odds, durations or multipliers
//! lives here so that a game can rebalance without touching engine code. A
//! config file only needs to name the fields it overrides:
//!
//! ```ron
//! (level_cap: 50, paralysis_skip_chance: 50)
//! ```

use crate::errors::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Critical hit chance (percent) indexed by a move's crit stage. Stages past the end use the last entry.
    pub crit_chances: Vec<u8>,
    pub crit_multiplier: f32,
    /// Lowest damage roll as a percentage of full damage.
    pub damage_variance_floor: u8,
    pub stab_multiplier: f32,
    pub trainer_exp_bonus: f32,
    pub level_cap: u8,
    pub paralysis_skip_chance: u8,
    pub freeze_thaw_chance: u8,
    pub confusion_self_hit_chance: u8,
    /// Inclusive range of turns a monster stays asleep.
    pub sleep_turns: (u8, u8),
    pub confusion_turns: (u8, u8),
    pub poison_damage_divisor: u16,
    pub burn_damage_divisor: u16,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            crit_chances: vec![6, 13, 25, 50],
            crit_multiplier: 2.0,
            damage_variance_floor: 85,
            stab_multiplier: 1.5,
            trainer_exp_bonus: 1.5,
            level_cap: 100,
            paralysis_skip_chance: 25,
            freeze_thaw_chance: 20,
            confusion_self_hit_chance: 50,
            sleep_turns: (1, 3),
            confusion_turns: (1, 4),
            poison_damage_divisor: 8,
            burn_damage_divisor: 16,
        }
    }
}

impl BattleConfig {
    pub fn from_ron_str(source: &str) -> ConfigResult<Self> {
        let config: BattleConfig =
            ron::from_str(source).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|err| ConfigError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        log::info!("Loaded battle config from {}", path.display());
        Self::from_ron_str(&source)
    }

    /// Critical hit chance in percent for the given crit stage.
    pub fn crit_chance(&self, crit_stage: u8) -> u8 {
        let index = (crit_stage as usize).min(self.crit_chances.len().saturating_sub(1));
        self.crit_chances.get(index).copied().unwrap_or(0)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.crit_chances.is_empty() {
            return Err(invalid("crit_chances", "at least one stage is required"));
        }
        if let Some(chance) = self.crit_chances.iter().find(|chance| **chance > 100) {
            return Err(invalid("crit_chances", format!("{chance} is above 100")));
        }
        if !(1..=100).contains(&self.damage_variance_floor) {
            return Err(invalid(
                "damage_variance_floor",
                format!("must be between 1 and 100 (got {})", self.damage_variance_floor),
            ));
        }
        for (field, value) in [
            ("crit_multiplier", self.crit_multiplier),
            ("stab_multiplier", self.stab_multiplier),
            ("trainer_exp_bonus", self.trainer_exp_bonus),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(field, format!("must be positive (got {value})")));
            }
        }
        if !(1..=100).contains(&self.level_cap) {
            return Err(invalid(
                "level_cap",
                format!("must be between 1 and 100 (got {})", self.level_cap),
            ));
        }
        for (field, chance) in [
            ("paralysis_skip_chance", self.paralysis_skip_chance),
            ("freeze_thaw_chance", self.freeze_thaw_chance),
            ("confusion_self_hit_chance", self.confusion_self_hit_chance),
        ] {
            if chance > 100 {
                return Err(invalid(field, format!("{chance} is above 100")));
            }
        }
        for (field, (min, max)) in [
            ("sleep_turns", self.sleep_turns),
            ("confusion_turns", self.confusion_turns),
        ] {
            if min == 0 || min > max {
                return Err(invalid(field, format!("range ({min}, {max}) is empty or starts at 0")));
            }
        }
        if self.poison_damage_divisor == 0 {
            return Err(invalid("poison_damage_divisor", "must not be 0"));
        }
        if self.burn_damage_divisor == 0 {
            return Err(invalid("burn_damage_divisor", "must not be 0"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}
