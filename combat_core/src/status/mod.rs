//! Status effects - Timed and charged modifiers attached to units
//!
//! Effects carry two independent clocks:
//! - `duration`: rounds, ticked at round end (per turn for action prevention)
//! - `charges`: cards, ticked once per card in which the effect altered an outcome

mod set;

pub use set::{StatusEffectSet, TriggeredAction};

use crate::action::Action;
use crate::damage::DamageTemplate;
use crate::types::{ActionType, Classification, DamageType, Remaining, TriggerMoment, UnitId};
use std::sync::Arc;

/// Kind-specific status payload
#[derive(Debug, Clone, PartialEq)]
pub enum StatusKind {
    /// Applies a packet to the holder at every round end
    PeriodicDamage { template: DamageTemplate },
    /// Transforms packets when the holder is attacker (`applies_as_actor`) or defender
    DamageModification {
        applies_as_actor: bool,
        scale: f64,
        additive: f64,
        /// Empty matches every packet
        affected_types: Vec<DamageType>,
        added_types: Vec<DamageType>,
    },
    /// Multiplies the holder's weight for weighted enemy selection
    AggroModification { multiplier: f64 },
    /// Additive hit chance delta
    ChanceToHitModification {
        applies_as_actor: bool,
        scaling_percent: i32,
        /// Empty matches every action type
        affected_action_types: Vec<ActionType>,
    },
    /// May cancel the holder's whole turn
    ActionPrevention { stun_chance: u32 },
    /// Enqueues reactions on hit events
    ActionTrigger {
        moment: TriggerMoment,
        /// Empty matches every action type
        action_types: Vec<ActionType>,
        /// Empty matches every packet
        damage_types: Vec<DamageType>,
        reactions: Vec<Arc<Action>>,
    },
}

/// Discriminant of [`StatusKind`], used to key non-stacking replacement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKindTag {
    PeriodicDamage,
    DamageModification,
    AggroModification,
    ChanceToHitModification,
    ActionPrevention,
    ActionTrigger,
}

impl StatusKind {
    pub fn tag(&self) -> StatusKindTag {
        match self {
            StatusKind::PeriodicDamage { .. } => StatusKindTag::PeriodicDamage,
            StatusKind::DamageModification { .. } => StatusKindTag::DamageModification,
            StatusKind::AggroModification { .. } => StatusKindTag::AggroModification,
            StatusKind::ChanceToHitModification { .. } => StatusKindTag::ChanceToHitModification,
            StatusKind::ActionPrevention { .. } => StatusKindTag::ActionPrevention,
            StatusKind::ActionTrigger { .. } => StatusKindTag::ActionTrigger,
        }
    }

    /// Kinds whose only clock is duration
    pub fn is_duration_only(&self) -> bool {
        matches!(
            self,
            StatusKind::PeriodicDamage { .. } | StatusKind::AggroModification { .. }
        )
    }
}

/// Effect description carried by a status-apply action
#[derive(Debug, Clone, PartialEq)]
pub struct StatusTemplate {
    pub name: String,
    pub classification: Classification,
    pub beneficial: bool,
    pub duration: Remaining,
    pub charges: Remaining,
    pub kind: StatusKind,
}

impl StatusTemplate {
    /// Create an active effect applied by `source_id`
    pub fn instantiate(&self, source_id: UnitId) -> StatusEffect {
        let charges = if self.kind.is_duration_only() {
            Remaining::Unlimited
        } else {
            self.charges
        };
        StatusEffect {
            name: self.name.clone(),
            classification: self.classification,
            beneficial: self.beneficial,
            duration: self.duration,
            charges,
            source_id,
            kind: self.kind.clone(),
            charge_used: false,
        }
    }

    /// Reaction actions carried by a trigger payload
    pub fn reactions(&self) -> &[Arc<Action>] {
        match &self.kind {
            StatusKind::ActionTrigger { reactions, .. } => reactions,
            _ => &[],
        }
    }
}

/// An effect currently attached to a unit
#[derive(Debug, Clone, PartialEq)]
pub struct StatusEffect {
    pub name: String,
    pub classification: Classification,
    pub beneficial: bool,
    /// Rounds remaining (turns for action prevention)
    pub duration: Remaining,
    /// Cards remaining
    pub charges: Remaining,
    /// Unit that applied the effect; with `name` this is the stacking identity
    pub source_id: UnitId,
    pub kind: StatusKind,
    /// Set when the effect altered an outcome during the current card
    charge_used: bool,
}

impl StatusEffect {
    pub fn is_active(&self) -> bool {
        !self.duration.is_exhausted() && !self.charges.is_exhausted()
    }

    pub fn is_charge_limited(&self) -> bool {
        !self.charges.is_unlimited()
    }

    /// Whether `other` should replace this effect instead of stacking
    pub fn same_identity(&self, other: &StatusEffect) -> bool {
        self.kind.tag() == other.kind.tag() && self.name == other.name && self.source_id == other.source_id
    }

    /// Note that this effect changed an outcome; drained once per card
    pub fn report_charge_usage(&mut self) {
        if self.is_charge_limited() {
            self.charge_used = true;
        }
    }

    pub fn has_pending_charge_use(&self) -> bool {
        self.charge_used
    }

    /// Spend one charge if usage was reported, clearing the report
    fn drain_charge_usage(&mut self) {
        if self.charge_used {
            self.charges.decrement();
            self.charge_used = false;
        }
    }
}
