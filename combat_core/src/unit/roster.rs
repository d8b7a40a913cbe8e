//! Roster - The units taking part in one combat

use super::CombatUnit;
use crate::types::{Side, UnitId};
use std::collections::BTreeMap;

/// All units in a combat, keyed by id.
///
/// Iteration is ordered by id so selection stays deterministic for a seed.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    units: BTreeMap<UnitId, CombatUnit>,
    next_id: u32,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a fresh id
    pub fn allocate_id(&mut self) -> UnitId {
        let id = UnitId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a unit under its own id
    pub fn insert(&mut self, unit: CombatUnit) {
        self.next_id = self.next_id.max(unit.id.0 + 1);
        self.units.insert(unit.id, unit);
    }

    pub fn get(&self, id: UnitId) -> Option<&CombatUnit> {
        self.units.get(&id)
    }

    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut CombatUnit> {
        self.units.get_mut(&id)
    }

    pub fn remove(&mut self, id: UnitId) -> Option<CombatUnit> {
        self.units.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CombatUnit> {
        self.units.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut CombatUnit> {
        self.units.values_mut()
    }

    pub fn ids(&self) -> Vec<UnitId> {
        self.units.keys().copied().collect()
    }

    /// Whether the unit is present and has health left
    pub fn is_alive(&self, id: UnitId) -> bool {
        self.units.get(&id).map_or(false, |u| u.is_alive())
    }

    pub fn living(&self) -> impl Iterator<Item = &CombatUnit> {
        self.units.values().filter(|u| u.is_alive())
    }

    pub fn living_on_side(&self, side: Side) -> impl Iterator<Item = &CombatUnit> {
        self.living().filter(move |u| u.side == side)
    }

    pub fn count_living(&self, side: Side) -> usize {
        self.living_on_side(side).count()
    }

    /// Take every unit with zero health out of the roster
    pub fn remove_dead(&mut self) -> Vec<CombatUnit> {
        let dead: Vec<UnitId> = self
            .units
            .values()
            .filter(|u| !u.is_alive())
            .map(|u| u.id)
            .collect();
        dead.into_iter().filter_map(|id| self.units.remove(&id)).collect()
    }
}
