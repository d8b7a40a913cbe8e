//! combat_core - Turn-based card combat engine
//!
//! This library provides:
//! - ResourcePool: Clamped health, armor, focus, spirit and rage pools
//! - DamagePacket: Signed damage/healing with a pierce/crush split
//! - Action/Card: Immutable descriptors loaded from a catalog
//! - StatusEffectSet: Timed and charged modifiers per unit
//! - Targeting: Aggro-weighted target selection
//! - CombatEngine: Rounds, turns and the reaction queue

pub mod action;
pub mod config;
pub mod damage;
pub mod engine;
pub mod log;
pub mod prelude;
pub mod resource;
pub mod status;
pub mod targeting;
pub mod types;
pub mod unit;

// Re-export core types for convenience
pub use action::{Action, ActionKind, Card, Conditional};
pub use config::{default_catalog, load_catalog, parse_catalog, Catalog, CombatConstants, ConfigError};
pub use damage::{apply_damage, DamageOutcome, DamagePacket, DamageTemplate, FinalDamage};
pub use engine::{CombatEngine, CombatError, CombatOutcome, UnitSummary};
pub use log::{CombatLog, LogCategory, LogEntry, LogFilter, LogSink, Severity, SharedLog, TracingSink};
pub use resource::{ResourceKind, ResourcePool, ResourcePools, FOCUS_MAX};
pub use status::{StatusEffect, StatusEffectSet, StatusKind, StatusTemplate};
pub use targeting::{select_targets, ChainState};
pub use types::{
    ActionType, Classification, DamageType, Remaining, Side, TargetMode, TriggerMoment, UnitId,
};
pub use unit::{CombatUnit, Deck, Roster, UnitFactory, UnitTemplate, WeaponType};
