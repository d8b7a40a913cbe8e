//! CombatUnit - A participant in combat

mod deck;
mod factory;
mod roster;

pub use deck::Deck;
pub use factory::{UnitFactory, UnitTemplate, WeaponType};
pub use roster::Roster;

use crate::resource::ResourcePools;
use crate::status::StatusEffectSet;
use crate::types::{Side, UnitId};
use std::sync::Arc;

/// Everything the engine tracks about one unit
#[derive(Debug, Clone)]
pub struct CombatUnit {
    // === Identity ===
    pub id: UnitId,
    pub name: String,
    /// Template the unit was built from
    pub kind: String,
    pub side: Side,
    pub level: u32,
    pub speed: u32,
    pub weapon: Option<Arc<WeaponType>>,

    // === State ===
    pub resources: ResourcePools,
    pub deck: Deck,
    pub status: StatusEffectSet,

    // === Summons ===
    pub is_temporary: bool,
    /// Rounds left for temporary units
    pub duration: u32,
}

impl CombatUnit {
    pub fn is_alive(&self) -> bool {
        !self.resources.health.is_empty()
    }

    pub fn health_percent(&self) -> f64 {
        self.resources.health.percent()
    }

    /// Mark the unit as a summon that leaves after `duration` rounds
    pub fn make_temporary(&mut self, duration: u32) {
        self.is_temporary = true;
        self.duration = duration;
    }

    /// Count down a temporary unit. Returns true once it should leave.
    pub fn tick_duration(&mut self) -> bool {
        if !self.is_temporary {
            return false;
        }
        self.duration = self.duration.saturating_sub(1);
        self.duration == 0
    }
}

/// Minimal unit for tests across the crate
#[cfg(test)]
pub(crate) fn test_unit(id: u32, side: Side, health: u32) -> CombatUnit {
    use crate::resource::{ResourcePool, FOCUS_MAX};

    CombatUnit {
        id: UnitId(id),
        name: format!("unit{}", id),
        kind: "test".to_string(),
        side,
        level: 1,
        speed: 100,
        weapon: None,
        resources: ResourcePools {
            health: ResourcePool::full(health),
            armor: ResourcePool::empty(100),
            focus: ResourcePool::empty(FOCUS_MAX),
            spirit: ResourcePool::full(10),
            rage: ResourcePool::empty(100),
            enrage_timer: ResourcePool::empty(3),
        },
        deck: Deck::default(),
        status: StatusEffectSet::new(),
        is_temporary: false,
        duration: 0,
    }
}
