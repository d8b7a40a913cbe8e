//! Unit construction - Templates, weapons and the factory seam

use super::{CombatUnit, Deck};
use crate::action::Card;
use crate::resource::{ResourcePool, ResourcePools, FOCUS_MAX};
use crate::status::StatusEffectSet;
use crate::types::{DamageType, Side, UnitId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A weapon's base damage profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeaponType {
    pub name: String,
    pub base_damage: f64,
    #[serde(default)]
    pub pierce: f64,
    #[serde(default)]
    pub crush: f64,
    #[serde(default)]
    pub damage_types: Vec<DamageType>,
}

/// Produces fully formed units, before combat and for summons
pub trait UnitFactory: Send + Sync {
    /// Build a unit of the given kind, or `None` if the kind is unknown
    fn create_unit(&self, kind: &str, id: UnitId, side: Side) -> Option<CombatUnit>;
}

/// Resolved stats and deck for one kind of unit
#[derive(Debug, Clone)]
pub struct UnitTemplate {
    pub kind: String,
    pub name: String,
    pub level: u32,
    pub speed: u32,
    pub weapon: Option<Arc<WeaponType>>,
    pub health: u32,
    /// Starting armor
    pub armor: u32,
    pub armor_max: u32,
    pub spirit: u32,
    pub rage_max: u32,
    /// Rounds an enrage lasts once armed
    pub enrage_duration: u32,
    pub deck: Vec<Arc<Card>>,
}

impl UnitTemplate {
    /// Build a fresh unit from this template
    pub fn build(&self, id: UnitId, side: Side) -> CombatUnit {
        CombatUnit {
            id,
            name: self.name.clone(),
            kind: self.kind.clone(),
            side,
            level: self.level,
            speed: self.speed,
            weapon: self.weapon.clone(),
            resources: ResourcePools {
                health: ResourcePool::full(self.health),
                armor: ResourcePool::with_current(self.armor as f64, self.armor_max),
                focus: ResourcePool::empty(FOCUS_MAX),
                spirit: ResourcePool::full(self.spirit),
                rage: ResourcePool::empty(self.rage_max),
                enrage_timer: ResourcePool::empty(self.enrage_duration),
            },
            deck: Deck::new(self.deck.clone()),
            status: StatusEffectSet::new(),
            is_temporary: false,
            duration: 0,
        }
    }
}
