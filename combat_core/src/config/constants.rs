//! Combat constants configuration

use super::ConfigError;
use crate::log::LogFilter;
use serde::{Deserialize, Serialize};

/// Tunable combat constants
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CombatConstants {
    #[serde(default)]
    pub turns: TurnConstants,
    #[serde(default)]
    pub damage: DamageConstants,
    #[serde(default)]
    pub resources: ResourceConstants,
    #[serde(default)]
    pub cards: CardConstants,
    #[serde(default)]
    pub reactions: ReactionConstants,
    #[serde(default)]
    pub log: LogFilter,
}

impl CombatConstants {
    /// Damage multiplier for a unit level: `1 + scaling × (level - 1)`
    pub fn level_multiplier(&self, level: u32) -> f64 {
        1.0 + self.damage.level_damage_scaling * level.saturating_sub(1) as f64
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..1.0).contains(&self.turns.jitter) {
            return Err(ConfigError::ValidationError(format!(
                "turns.jitter {} must be within [0, 1)",
                self.turns.jitter
            )));
        }
        if self.turns.max_rounds == 0 {
            return Err(ConfigError::ValidationError("turns.max_rounds must be at least 1".to_string()));
        }
        if self.damage.level_damage_scaling < 0.0 || self.damage.unarmed_damage < 0.0 {
            return Err(ConfigError::ValidationError("damage constants cannot be negative".to_string()));
        }
        if self.resources.spirit_regen_percent < 0.0 {
            return Err(ConfigError::ValidationError(
                "resources.spirit_regen_percent cannot be negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnConstants {
    /// Speed jitter for turn order (0.10 = ±10%)
    #[serde(default = "default_turn_jitter")]
    pub jitter: f64,
    /// Rounds before combat is called without a winner
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,
}

impl Default for TurnConstants {
    fn default() -> Self {
        TurnConstants {
            jitter: default_turn_jitter(),
            max_rounds: default_max_rounds(),
        }
    }
}

fn default_turn_jitter() -> f64 {
    0.10
}
fn default_max_rounds() -> u32 {
    200
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DamageConstants {
    /// Extra damage per level above 1 (0.10 = +10%)
    #[serde(default = "default_level_damage_scaling")]
    pub level_damage_scaling: f64,
    /// Weapon base damage for units without a weapon
    #[serde(default = "default_unarmed_damage")]
    pub unarmed_damage: f64,
}

impl Default for DamageConstants {
    fn default() -> Self {
        DamageConstants {
            level_damage_scaling: default_level_damage_scaling(),
            unarmed_damage: default_unarmed_damage(),
        }
    }
}

fn default_level_damage_scaling() -> f64 {
    0.10
}
fn default_unarmed_damage() -> f64 {
    5.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceConstants {
    /// Spirit regenerated at round end, as percent of max
    #[serde(default = "default_spirit_regen_percent")]
    pub spirit_regen_percent: f64,
}

impl Default for ResourceConstants {
    fn default() -> Self {
        ResourceConstants {
            spirit_regen_percent: default_spirit_regen_percent(),
        }
    }
}

fn default_spirit_regen_percent() -> f64 {
    10.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardConstants {
    /// Card forced on enraged units
    #[serde(default = "default_enrage_card")]
    pub enrage_card: String,
    /// Card played instead of one the unit cannot pay for
    #[serde(default = "default_drained_card")]
    pub drained_card: String,
}

impl Default for CardConstants {
    fn default() -> Self {
        CardConstants {
            enrage_card: default_enrage_card(),
            drained_card: default_drained_card(),
        }
    }
}

fn default_enrage_card() -> String {
    "enraged_frenzy".to_string()
}
fn default_drained_card() -> String {
    "drained".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionConstants {
    /// Actions at this reaction depth or deeper do not check hit triggers.
    /// 1 means only card-initiated actions trigger reactions.
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,
}

impl Default for ReactionConstants {
    fn default() -> Self {
        ReactionConstants {
            max_depth: default_max_depth(),
        }
    }
}

fn default_max_depth() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::Severity;

    #[test]
    fn test_default_constants() {
        let constants = CombatConstants::default();
        assert!((constants.turns.jitter - 0.10).abs() < f64::EPSILON);
        assert!((constants.resources.spirit_regen_percent - 10.0).abs() < f64::EPSILON);
        assert_eq!(constants.cards.enrage_card, "enraged_frenzy");
        assert_eq!(constants.reactions.max_depth, 1);
    }

    #[test]
    fn test_level_multiplier() {
        let constants = CombatConstants::default();
        assert!((constants.level_multiplier(1) - 1.0).abs() < f64::EPSILON);
        assert!((constants.level_multiplier(2) - 1.10).abs() < 1e-9);
        assert!((constants.level_multiplier(0) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_constants() {
        let toml = r#"
[turns]
jitter = 0.05
max_rounds = 50

[damage]
level_damage_scaling = 0.2

[cards]
drained_card = "exhausted"

[log]
min_severity = "debug"
categories = ["damage", "death"]
"#;

        let constants: CombatConstants = toml::from_str(toml).unwrap();
        assert!((constants.turns.jitter - 0.05).abs() < f64::EPSILON);
        assert_eq!(constants.turns.max_rounds, 50);
        assert!((constants.damage.unarmed_damage - 5.0).abs() < f64::EPSILON);
        assert_eq!(constants.cards.drained_card, "exhausted");
        assert_eq!(constants.cards.enrage_card, "enraged_frenzy");
        assert_eq!(constants.log.min_severity, Severity::Debug);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(CombatConstants::default().validate().is_ok());

        let mut constants = CombatConstants::default();
        constants.turns.jitter = 1.5;
        assert!(matches!(constants.validate(), Err(ConfigError::ValidationError(_))));

        let mut constants = CombatConstants::default();
        constants.turns.max_rounds = 0;
        assert!(matches!(constants.validate(), Err(ConfigError::ValidationError(_))));

        let mut constants = CombatConstants::default();
        constants.resources.spirit_regen_percent = -5.0;
        assert!(matches!(constants.validate(), Err(ConfigError::ValidationError(_))));
    }
}
