//! Core types shared across the combat engine

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier assigned to a unit when it joins the roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which side of the fight a unit belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Friendly,
    Enemy,
}

impl Side {
    /// The opposing side
    pub fn opponent(self) -> Side {
        match self {
            Side::Friendly => Side::Enemy,
            Side::Enemy => Side::Friendly,
        }
    }
}

/// Damage type tags carried by packets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageType {
    Physical,
    Fire,
    Cold,
    Lightning,
    Chaos,
    Holy,
}

/// Broad category of an action, used by hit-chance modifiers and trigger filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Melee,
    Ranged,
    Spell,
    Heal,
    Utility,
    /// Packets produced by periodic status effects
    Periodic,
}

/// Dispel grouping for status effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Magic,
    Poison,
    Bleed,
    Physical,
    Mental,
    Innate,
}

/// How an action picks its targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetMode {
    #[serde(rename = "self")]
    SelfOnly,
    /// Weighted by aggro
    RandomEnemy,
    /// Uniform over enemies with non-zero aggro
    RandomEnemyTrue,
    RandomAlly,
    AllEnemies,
    AllAllies,
    LowestHppAlly,
    LowestHppEnemy,
    /// Targets chosen by the previous action in the chain
    Same,
    /// Targets actually hit by the previous action in the chain
    Linked,
    /// The actor, if the previous action hit anyone
    SelfAfterHit,
    /// Target fixed by the triggering event
    Reaction,
}

/// When an action trigger fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerMoment {
    OnHit,
    OnGetHit,
}

/// A countdown that may be unlimited
///
/// Used for both status effect clocks: duration (rounds) and charges (cards).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Remaining {
    Unlimited,
    Finite(u32),
}

impl Default for Remaining {
    fn default() -> Self {
        Remaining::Unlimited
    }
}

impl Remaining {
    /// Build from an optional count, `None` meaning unlimited
    pub fn from_option(value: Option<u32>) -> Self {
        match value {
            Some(n) => Remaining::Finite(n),
            None => Remaining::Unlimited,
        }
    }

    pub fn is_unlimited(&self) -> bool {
        matches!(self, Remaining::Unlimited)
    }

    /// Whether the counter has run out
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Remaining::Finite(0))
    }

    /// Count down by one. Unlimited counters never change.
    pub fn decrement(&mut self) {
        if let Remaining::Finite(n) = self {
            *n = n.saturating_sub(1);
        }
    }

    pub fn value(&self) -> Option<u32> {
        match self {
            Remaining::Unlimited => None,
            Remaining::Finite(n) => Some(*n),
        }
    }
}

impl fmt::Display for Remaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Remaining::Unlimited => write!(f, "unlimited"),
            Remaining::Finite(n) => write!(f, "{}", n),
        }
    }
}
