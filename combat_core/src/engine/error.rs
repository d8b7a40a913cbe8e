//! Engine errors

use crate::types::UnitId;
use thiserror::Error;

/// Runtime invariant violations. Combat cannot continue after one.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CombatError {
    #[error("Unit {0} is not in the roster")]
    UnitNotFound(UnitId),
    #[error("Unknown unit kind: {0}")]
    UnknownUnitKind(String),
    #[error("Summon kind '{0}' cannot be produced by the unit factory")]
    UnknownSummonKind(String),
    #[error("Card '{0}' is not in the catalog")]
    MissingCard(String),
    #[error("Combat needs at least one unit on each side")]
    EmptyRoster,
}
