//! Actions and Cards - Immutable descriptors loaded from the catalog
//!
//! An [`Action`] is one effect-producing step. Every action shares a common
//! header (targeting, hit chance, optional condition) and carries a
//! kind-specific payload in [`ActionKind`]. A [`Card`] bundles a cost with an
//! ordered list of actions.

mod card;
mod condition;
mod finisher;

pub use card::Card;
pub use condition::{Comparison, ConditionSubject, Conditional};
pub use finisher::focus_scale;

use crate::resource::ResourceKind;
use crate::status::StatusTemplate;
use crate::types::{ActionType, Classification, DamageType, TargetMode};
use std::sync::Arc;

/// A single resolvable step of a card
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    /// Unique name in the catalog
    pub name: String,
    pub action_type: ActionType,
    /// Hostile actions pick from the opposing side, friendly ones from the actor's side
    pub hostile: bool,
    pub target: TargetMode,
    /// Extra uniformly chosen targets after primary selection
    pub splash: u32,
    /// Base chance to hit, 0 - 100
    pub hit_chance: i32,
    /// Resource predicate gating the action
    pub condition: Option<Conditional>,
    pub kind: ActionKind,
}

/// Kind-specific action payload
#[derive(Debug, Clone, PartialEq)]
pub enum ActionKind {
    /// Damage from the actor's weapon
    WeaponAttack { multiplier: f64 },
    /// Damage from the action itself
    NonweaponAttack {
        base_quantity: f64,
        damage_types: Vec<DamageType>,
        pierce: f64,
        crush: f64,
    },
    /// Always produces a fully piercing healing packet
    Heal { base_quantity: f64 },
    ArmorGrant { base_quantity: f64 },
    AdjustResource { resource: ResourceKind, quantity: f64 },
    StatusApply(StatusTemplate),
    Summon {
        count: u32,
        summon_kind: String,
        /// Rounds the summoned units stay
        duration: u32,
    },
    Dispel {
        clears_beneficial: bool,
        /// `None` removes every eligible effect
        count: Option<u32>,
        classification: Option<Classification>,
    },
    /// Resolves a copy of `inner` scaled by the actor's focus, then spends all focus
    Finisher {
        inner: Arc<Action>,
        /// Percent scale indexed by focus 0 - 3
        scale_table: [u32; 4],
    },
}

impl ActionKind {
    /// Short name of the variant, for logs
    pub fn label(&self) -> &'static str {
        match self {
            ActionKind::WeaponAttack { .. } => "weapon_attack",
            ActionKind::NonweaponAttack { .. } => "nonweapon_attack",
            ActionKind::Heal { .. } => "heal",
            ActionKind::ArmorGrant { .. } => "armor_grant",
            ActionKind::AdjustResource { .. } => "adjust_resource",
            ActionKind::StatusApply(_) => "status_apply",
            ActionKind::Summon { .. } => "summon",
            ActionKind::Dispel { .. } => "dispel",
            ActionKind::Finisher { .. } => "finisher",
        }
    }
}

impl Action {
    /// Create an action with default header values
    pub fn new(name: impl Into<String>, action_type: ActionType, kind: ActionKind) -> Self {
        Action {
            name: name.into(),
            action_type,
            hostile: false,
            target: TargetMode::SelfOnly,
            splash: 0,
            hit_chance: 100,
            condition: None,
            kind,
        }
    }

    pub fn hostile(mut self, target: TargetMode) -> Self {
        self.hostile = true;
        self.target = target;
        self
    }

    pub fn friendly(mut self, target: TargetMode) -> Self {
        self.hostile = false;
        self.target = target;
        self
    }

    pub fn with_splash(mut self, splash: u32) -> Self {
        self.splash = splash;
        self
    }

    pub fn with_hit_chance(mut self, hit_chance: i32) -> Self {
        self.hit_chance = hit_chance;
        self
    }

    pub fn with_condition(mut self, condition: Conditional) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Action names this action refers to (finisher inner, reaction payloads)
    pub fn referenced_actions(&self) -> Vec<&Arc<Action>> {
        match &self.kind {
            ActionKind::Finisher { inner, .. } => vec![inner],
            ActionKind::StatusApply(template) => template.reactions().iter().collect(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let action = Action::new("slash", ActionType::Melee, ActionKind::WeaponAttack { multiplier: 1.0 })
            .hostile(TargetMode::RandomEnemy)
            .with_splash(1);

        assert!(action.hostile);
        assert_eq!(action.target, TargetMode::RandomEnemy);
        assert_eq!(action.splash, 1);
        assert_eq!(action.hit_chance, 100);
        assert_eq!(action.kind.label(), "weapon_attack");
    }

    #[test]
    fn test_finisher_references_inner() {
        let inner = Arc::new(Action::new(
            "slash",
            ActionType::Melee,
            ActionKind::WeaponAttack { multiplier: 1.0 },
        ));
        let finisher = Action::new(
            "eviscerate",
            ActionType::Melee,
            ActionKind::Finisher {
                inner: inner.clone(),
                scale_table: [50, 100, 150, 200],
            },
        );

        let refs = finisher.referenced_actions();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].name, "slash");
        assert_eq!(finisher.kind.label(), "finisher");
    }
}
