//! Apply a finalized packet to a unit's resource pools

use super::FinalDamage;
use crate::resource::ResourcePools;
use serde::{Deserialize, Serialize};

/// What a packet did to its target
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DamageOutcome {
    /// Armor removed by crushing damage
    pub armor_crushed: f64,
    /// Standard damage soaked by armor
    pub absorbed_by_armor: f64,
    /// Total health removed
    pub health_lost: f64,
    /// Total health restored
    pub health_restored: f64,

    pub armor_before: f64,
    pub armor_after: f64,
    pub health_before: f64,
    pub health_after: f64,

    /// Whether this packet brought health to zero
    pub is_killing_blow: bool,
}

impl DamageOutcome {
    /// Short human-readable description
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();

        if self.health_lost > 0.0 {
            parts.push(format!("{:.0} damage taken", self.health_lost));
        }
        if self.health_restored > 0.0 {
            parts.push(format!("{:.0} healed", self.health_restored));
        }
        if self.absorbed_by_armor > 0.0 {
            parts.push(format!("{:.0} absorbed by armor", self.absorbed_by_armor));
        }
        if self.armor_crushed > 0.0 {
            parts.push(format!("{:.0} armor crushed", self.armor_crushed));
        }
        if self.is_killing_blow {
            parts.push("FATAL".to_string());
        }

        if parts.is_empty() {
            "No effect".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// Apply a finalized packet to a set of pools
///
/// Damage is applied in a fixed order:
/// 1. Crushing damage reduces armor and health by the same amount
/// 2. Piercing damage reduces health only
/// 3. Standard damage is absorbed by armor, the excess spills to health
///
/// Healing (negative amounts) restores health only.
pub fn apply_damage(pools: &mut ResourcePools, damage: &FinalDamage) -> DamageOutcome {
    let mut outcome = DamageOutcome {
        armor_before: pools.armor.current(),
        health_before: pools.health.current(),
        ..Default::default()
    };

    if damage.is_healing() {
        outcome.health_restored = pools.health.adjust(-damage.amount());
    } else if damage.amount() > 0.0 {
        let split = damage.split();

        // Step 1: crushing
        outcome.armor_crushed = -pools.armor.adjust(-split.crushing);
        outcome.health_lost -= pools.health.adjust(-split.crushing);

        // Step 2: piercing
        outcome.health_lost -= pools.health.adjust(-split.piercing);

        // Step 3: standard, armor first
        let absorbed = split.standard.min(pools.armor.current());
        pools.armor.adjust(-absorbed);
        outcome.absorbed_by_armor = absorbed;
        outcome.health_lost -= pools.health.adjust(-(split.standard - absorbed));

        outcome.is_killing_blow = outcome.health_before > 0.0 && pools.health.is_empty();
    }

    outcome.armor_after = pools.armor.current();
    outcome.health_after = pools.health.current();
    outcome
}
