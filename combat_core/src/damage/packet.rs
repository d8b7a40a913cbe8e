//! DamagePacket - An in-flight quantity of damage or healing

use crate::types::{ActionType, DamageType, UnitId};
use serde::{Deserialize, Serialize};

/// Damage (positive) or healing (negative) on its way to a target
///
/// A packet is freely modified by status effects, then consumed by
/// [`DamagePacket::finalize`] which produces an immutable [`FinalDamage`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamagePacket {
    // === Source Info ===
    /// Unit that produced this packet, if any
    pub source_id: Option<UnitId>,
    /// Kind of action that produced it
    pub action_type: ActionType,

    // === Amounts ===
    /// Amount before modifiers; its sign decides damage vs healing
    base_amount: f64,
    /// Amount after modifiers
    amount: f64,

    // === Tags ===
    damage_types: Vec<DamageType>,

    // === Split ===
    /// Fraction that bypasses armor
    pierce: f64,
    /// Fraction that hits armor and health at once
    crush: f64,
}

impl DamagePacket {
    /// Create a packet with no type tags and a purely standard split
    pub fn new(base_amount: f64, action_type: ActionType) -> Self {
        DamagePacket {
            source_id: None,
            action_type,
            base_amount,
            amount: base_amount,
            damage_types: Vec::new(),
            pierce: 0.0,
            crush: 0.0,
        }
    }

    pub fn with_source(mut self, source_id: UnitId) -> Self {
        self.source_id = Some(source_id);
        self
    }

    pub fn with_types(mut self, damage_types: &[DamageType]) -> Self {
        self.add_types(damage_types);
        self
    }

    pub fn with_split(mut self, pierce: f64, crush: f64) -> Self {
        self.pierce = pierce;
        self.crush = crush;
        self
    }

    pub fn base_amount(&self) -> f64 {
        self.base_amount
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn damage_types(&self) -> &[DamageType] {
        &self.damage_types
    }

    pub fn pierce(&self) -> f64 {
        self.pierce
    }

    pub fn crush(&self) -> f64 {
        self.crush
    }

    /// Whether this packet heals rather than harms
    pub fn is_healing(&self) -> bool {
        self.base_amount < 0.0
    }

    /// Whether the packet carries any of the given tags
    pub fn has_any_type(&self, types: &[DamageType]) -> bool {
        types.iter().any(|t| self.damage_types.contains(t))
    }

    /// Multiply the current amount
    pub fn scale(&mut self, multiplier: f64) {
        self.amount *= multiplier;
    }

    /// Add to the magnitude of the packet.
    ///
    /// Positive values grow damage on a damage packet and healing on a
    /// healing packet.
    pub fn add_magnitude(&mut self, scalar: f64) {
        if self.is_healing() {
            self.amount -= scalar;
        } else {
            self.amount += scalar;
        }
    }

    /// Add type tags, skipping duplicates
    pub fn add_types(&mut self, types: &[DamageType]) {
        for t in types {
            if !self.damage_types.contains(t) {
                self.damage_types.push(*t);
            }
        }
    }

    /// Lock in the packet.
    ///
    /// Clamps the split to [0, 1] with crush taking priority, rounds the
    /// amount, and zeroes it if modifiers flipped its sign.
    pub fn finalize(self) -> FinalDamage {
        let crush = sanitize_fraction(self.crush);
        let mut pierce = sanitize_fraction(self.pierce);
        if pierce + crush > 1.0 {
            pierce = 1.0 - crush;
        }

        let mut amount = self.amount.round();
        if !amount.is_finite() || (amount != 0.0 && sign(amount) != sign(self.base_amount)) {
            amount = 0.0;
        }

        FinalDamage {
            source_id: self.source_id,
            action_type: self.action_type,
            base_amount: self.base_amount,
            amount,
            damage_types: self.damage_types,
            pierce,
            crush,
        }
    }
}

fn sanitize_fraction(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

fn sign(value: f64) -> i8 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

/// A finalized packet, ready to be applied to resource pools
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalDamage {
    source_id: Option<UnitId>,
    action_type: ActionType,
    base_amount: f64,
    amount: f64,
    damage_types: Vec<DamageType>,
    pierce: f64,
    crush: f64,
}

impl FinalDamage {
    pub fn source_id(&self) -> Option<UnitId> {
        self.source_id
    }

    pub fn action_type(&self) -> ActionType {
        self.action_type
    }

    pub fn base_amount(&self) -> f64 {
        self.base_amount
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn damage_types(&self) -> &[DamageType] {
        &self.damage_types
    }

    pub fn pierce(&self) -> f64 {
        self.pierce
    }

    pub fn crush(&self) -> f64 {
        self.crush
    }

    pub fn is_healing(&self) -> bool {
        self.amount < 0.0
    }

    /// Break the amount into its crushing, piercing and standard portions
    pub fn split(&self) -> DamageSplit {
        let crushing = self.amount * self.crush;
        let piercing = self.amount * self.pierce;
        DamageSplit {
            crushing,
            piercing,
            standard: self.amount - crushing - piercing,
        }
    }
}

/// Portions of a finalized amount by how they interact with armor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageSplit {
    /// Removed from armor and health simultaneously
    pub crushing: f64,
    /// Removed from health only
    pub piercing: f64,
    /// Absorbed by armor first, remainder to health
    pub standard: f64,
}

/// Config-side description of a packet, used by periodic effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageTemplate {
    /// Positive for damage, negative for healing
    pub amount: f64,
    #[serde(default)]
    pub damage_types: Vec<DamageType>,
    #[serde(default)]
    pub pierce: f64,
    #[serde(default)]
    pub crush: f64,
}

impl DamageTemplate {
    /// Instantiate a fresh packet from this template
    pub fn to_packet(&self, action_type: ActionType, source_id: UnitId) -> DamagePacket {
        DamagePacket::new(self.amount, action_type)
            .with_source(source_id)
            .with_types(&self.damage_types)
            .with_split(self.pierce, self.crush)
    }
}
