//! Damage system - DamagePacket and its application to resource pools

mod application;
mod packet;

pub use application::{apply_damage, DamageOutcome};
pub use packet::{DamagePacket, DamageSplit, DamageTemplate, FinalDamage};
