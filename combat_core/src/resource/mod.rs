//! Unit resources - Health, Armor, Focus, Spirit, Rage and the enrage timer

mod pool;

pub use pool::ResourcePool;

use serde::{Deserialize, Serialize};

/// Focus is capped at 3 for every unit
pub const FOCUS_MAX: u32 = 3;

/// The six named resources every unit carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Health,
    Armor,
    Focus,
    Spirit,
    Rage,
    EnrageTimer,
}

impl ResourceKind {
    pub fn all() -> &'static [ResourceKind] {
        &[
            ResourceKind::Health,
            ResourceKind::Armor,
            ResourceKind::Focus,
            ResourceKind::Spirit,
            ResourceKind::Rage,
            ResourceKind::EnrageTimer,
        ]
    }
}

/// The full set of resource pools for a unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourcePools {
    pub health: ResourcePool,
    pub armor: ResourcePool,
    pub focus: ResourcePool,
    pub spirit: ResourcePool,
    pub rage: ResourcePool,
    pub enrage_timer: ResourcePool,
}

impl ResourcePools {
    pub fn get(&self, kind: ResourceKind) -> &ResourcePool {
        match kind {
            ResourceKind::Health => &self.health,
            ResourceKind::Armor => &self.armor,
            ResourceKind::Focus => &self.focus,
            ResourceKind::Spirit => &self.spirit,
            ResourceKind::Rage => &self.rage,
            ResourceKind::EnrageTimer => &self.enrage_timer,
        }
    }

    pub fn get_mut(&mut self, kind: ResourceKind) -> &mut ResourcePool {
        match kind {
            ResourceKind::Health => &mut self.health,
            ResourceKind::Armor => &mut self.armor,
            ResourceKind::Focus => &mut self.focus,
            ResourceKind::Spirit => &mut self.spirit,
            ResourceKind::Rage => &mut self.rage,
            ResourceKind::EnrageTimer => &mut self.enrage_timer,
        }
    }
}
