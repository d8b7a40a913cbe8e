//! Prelude module for convenient imports
//!
//! ```rust
//! use combat_core::prelude::*;
//! ```

// Core types
pub use crate::types::{ActionType, Classification, DamageType, Remaining, Side, TargetMode, TriggerMoment, UnitId};
pub use crate::resource::{ResourceKind, ResourcePool, ResourcePools};

// Descriptors
pub use crate::action::{Action, ActionKind, Card, Comparison, ConditionSubject, Conditional};
pub use crate::status::{StatusEffect, StatusEffectSet, StatusKind, StatusTemplate};

// Damage system
pub use crate::damage::{apply_damage, DamagePacket, DamageTemplate, FinalDamage};

// Units
pub use crate::unit::{CombatUnit, UnitFactory, UnitTemplate, WeaponType};

// Combat
pub use crate::engine::{CombatEngine, CombatError, CombatOutcome};
pub use crate::log::{CombatLog, LogCategory, LogSink, Severity, SharedLog};

// Config
pub use crate::config::{default_catalog, parse_catalog, Catalog, CombatConstants};
