//! CombatOutcome - Result of a finished combat

use crate::types::{Side, UnitId};
use crate::unit::CombatUnit;
use serde::{Deserialize, Serialize};

/// Snapshot of a unit at the end of combat or at its death
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitSummary {
    pub id: UnitId,
    pub name: String,
    pub kind: String,
    pub side: Side,
    pub health: f64,
    pub health_max: u32,
    pub is_temporary: bool,
    /// Round the unit died in, if it died
    pub died_in_round: Option<u32>,
}

impl UnitSummary {
    pub fn survivor(unit: &CombatUnit) -> Self {
        UnitSummary {
            id: unit.id,
            name: unit.name.clone(),
            kind: unit.kind.clone(),
            side: unit.side,
            health: unit.resources.health.current(),
            health_max: unit.resources.health.max(),
            is_temporary: unit.is_temporary,
            died_in_round: None,
        }
    }

    pub fn casualty(unit: &CombatUnit, round: u32) -> Self {
        UnitSummary {
            died_in_round: Some(round),
            ..UnitSummary::survivor(unit)
        }
    }
}

/// Result of [`super::CombatEngine::execute`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatOutcome {
    /// `None` when the round cap was reached with both sides standing
    pub winner: Option<Side>,
    /// Rounds started
    pub rounds: u32,
    pub survivors: Vec<UnitSummary>,
    /// Units that died, in order of death
    pub casualties: Vec<UnitSummary>,
}

impl CombatOutcome {
    pub fn is_victory_for(&self, side: Side) -> bool {
        self.winner == Some(side)
    }

    pub fn survivors_on(&self, side: Side) -> impl Iterator<Item = &UnitSummary> {
        self.survivors.iter().filter(move |s| s.side == side)
    }

    /// Get a summary string
    pub fn summary(&self) -> String {
        let winner = match self.winner {
            Some(Side::Friendly) => "Friendly side wins",
            Some(Side::Enemy) => "Enemy side wins",
            None => "No winner",
        };
        format!(
            "{} after {} rounds ({} survivors, {} casualties)",
            winner,
            self.rounds,
            self.survivors.len(),
            self.casualties.len()
        )
    }
}
