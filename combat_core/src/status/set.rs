//! StatusEffectSet - Per-unit collection of active effects

use super::{StatusEffect, StatusKind, StatusKindTag};
use crate::action::Action;
use crate::damage::DamagePacket;
use crate::types::{ActionType, Classification, DamageType, TargetMode, TriggerMoment, UnitId};
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;

/// A reaction produced by an action trigger
#[derive(Debug, Clone, PartialEq)]
pub struct TriggeredAction {
    pub action: Arc<Action>,
    /// The holder of the trigger, who performs the reaction
    pub actor: UnitId,
    /// Set for reactions using [`TargetMode::Reaction`]
    pub forced_target: Option<UnitId>,
}

/// Active effects on one unit, kept in attachment order
#[derive(Debug, Clone, Default)]
pub struct StatusEffectSet {
    effects: Vec<StatusEffect>,
}

impl StatusEffectSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn effects(&self) -> &[StatusEffect] {
        &self.effects
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Find an effect by name and source
    pub fn get(&self, name: &str, source_id: UnitId) -> Option<&StatusEffect> {
        self.effects
            .iter()
            .find(|e| e.name == name && e.source_id == source_id)
    }

    /// Whether any effect with this name is attached
    pub fn contains(&self, name: &str) -> bool {
        self.effects.iter().any(|e| e.name == name)
    }

    /// Attach an effect.
    ///
    /// An existing effect of the same kind, name and source is replaced in
    /// place. Returns true if a replacement happened.
    pub fn attach(&mut self, effect: StatusEffect) -> bool {
        if let Some(existing) = self.effects.iter_mut().find(|e| e.same_identity(&effect)) {
            *existing = effect;
            true
        } else {
            self.effects.push(effect);
            false
        }
    }

    /// Per-turn tick: only action prevention runs on this clock.
    ///
    /// Called once the holder's turn ends. Returns names of removed effects.
    pub fn tick_after_card(&mut self) -> Vec<String> {
        for effect in self.effects.iter_mut() {
            if effect.kind.tag() == StatusKindTag::ActionPrevention {
                effect.duration.decrement();
            }
        }
        self.remove_where(|e| e.kind.tag() == StatusKindTag::ActionPrevention && !e.is_active())
    }

    /// Per-round tick for every kind except action prevention
    pub fn tick_end_of_round(&mut self) -> Vec<String> {
        for effect in self.effects.iter_mut() {
            if effect.kind.tag() != StatusKindTag::ActionPrevention {
                effect.duration.decrement();
            }
        }
        self.remove_where(|e| e.kind.tag() != StatusKindTag::ActionPrevention && !e.is_active())
    }

    /// Spend one charge on every effect that reported usage during the
    /// card just played, then drop exhausted effects.
    pub fn tick_charge_usage(&mut self) -> Vec<String> {
        for effect in self.effects.iter_mut() {
            effect.drain_charge_usage();
        }
        self.remove_where(|e| !e.is_active())
    }

    /// Roll each action prevention effect in attachment order.
    ///
    /// The first success spends a charge immediately and cancels the turn.
    pub fn is_action_prevented(&mut self, rng: &mut impl Rng) -> bool {
        for effect in self.effects.iter_mut() {
            if !effect.is_active() {
                continue;
            }
            if let StatusKind::ActionPrevention { stun_chance } = effect.kind {
                if rng.gen_range(0..100) < stun_chance {
                    effect.charges.decrement();
                    return true;
                }
            }
        }
        false
    }

    /// Fold every matching damage modifier into the packet, in attachment order
    pub fn process_damage_packet_modifiers(&mut self, is_actor: bool, packet: &mut DamagePacket) {
        for effect in self.effects.iter_mut() {
            if !effect.is_active() {
                continue;
            }
            let charge_limited = effect.is_charge_limited();
            if let StatusKind::DamageModification {
                applies_as_actor,
                scale,
                additive,
                affected_types,
                added_types,
            } = &effect.kind
            {
                if *applies_as_actor != is_actor {
                    continue;
                }
                if charge_limited && packet.action_type == ActionType::Periodic {
                    continue;
                }
                if !affected_types.is_empty() && !packet.has_any_type(affected_types) {
                    continue;
                }

                packet.scale(*scale);
                packet.add_magnitude(*additive);
                packet.add_types(added_types);
                effect.report_charge_usage();
            }
        }
    }

    /// Product of all aggro multipliers, 1.0 when there are none
    pub fn compute_aggro_weight_multiplier(&self) -> f64 {
        self.effects
            .iter()
            .filter(|e| e.is_active())
            .filter_map(|e| match e.kind {
                StatusKind::AggroModification { multiplier } => Some(multiplier),
                _ => None,
            })
            .product()
    }

    /// Sum of matching hit chance deltas for the evaluating side
    pub fn compute_to_hit_modifier(&mut self, action_type: ActionType, is_actor: bool) -> i32 {
        let mut total = 0;
        for effect in self.effects.iter_mut() {
            if !effect.is_active() {
                continue;
            }
            if let StatusKind::ChanceToHitModification {
                applies_as_actor,
                scaling_percent,
                affected_action_types,
            } = &effect.kind
            {
                if *applies_as_actor != is_actor {
                    continue;
                }
                if !affected_action_types.is_empty() && !affected_action_types.contains(&action_type) {
                    continue;
                }
                total += *scaling_percent;
                effect.report_charge_usage();
            }
        }
        total
    }

    /// Collect reactions from triggers matching a hit event.
    ///
    /// `self_id` is the holder, `other_id` the counterpart of the event.
    /// Reactions targeting [`TargetMode::Reaction`] are forced onto `other_id`.
    pub fn get_triggered_actions(
        &mut self,
        moment: TriggerMoment,
        action_type: ActionType,
        damage_types: &[DamageType],
        self_id: UnitId,
        other_id: UnitId,
    ) -> Vec<TriggeredAction> {
        let mut triggered = Vec::new();
        for effect in self.effects.iter_mut() {
            if !effect.is_active() {
                continue;
            }
            if let StatusKind::ActionTrigger {
                moment: trigger_moment,
                action_types,
                damage_types: type_filter,
                reactions,
            } = &effect.kind
            {
                if *trigger_moment != moment {
                    continue;
                }
                if !action_types.is_empty() && !action_types.contains(&action_type) {
                    continue;
                }
                if !type_filter.is_empty() && !type_filter.iter().any(|t| damage_types.contains(t)) {
                    continue;
                }

                for reaction in reactions {
                    let forced_target = if reaction.target == TargetMode::Reaction {
                        Some(other_id)
                    } else {
                        None
                    };
                    triggered.push(TriggeredAction {
                        action: reaction.clone(),
                        actor: self_id,
                        forced_target,
                    });
                }
                effect.report_charge_usage();
            }
        }
        triggered
    }

    /// Packets from every periodic effect, one per effect
    pub fn periodic_packets(&self) -> Vec<(String, DamagePacket)> {
        self.effects
            .iter()
            .filter(|e| e.is_active())
            .filter_map(|e| match &e.kind {
                StatusKind::PeriodicDamage { template } => Some((
                    e.name.clone(),
                    template.to_packet(ActionType::Periodic, e.source_id),
                )),
                _ => None,
            })
            .collect()
    }

    /// Remove up to `count` random effects matching the beneficial flag and
    /// optional classification. `None` removes every eligible effect.
    pub fn process_dispel(
        &mut self,
        clears_beneficial: bool,
        count: Option<u32>,
        classification: Option<Classification>,
        rng: &mut impl Rng,
    ) -> Vec<StatusEffect> {
        let mut eligible: Vec<usize> = self
            .effects
            .iter()
            .enumerate()
            .filter(|(_, e)| e.beneficial == clears_beneficial)
            .filter(|(_, e)| classification.map_or(true, |c| e.classification == c))
            .map(|(i, _)| i)
            .collect();

        eligible.shuffle(rng);
        if let Some(count) = count {
            eligible.truncate(count as usize);
        }

        // Remove from the back so earlier indices stay valid
        eligible.sort_unstable_by(|a, b| b.cmp(a));
        let mut removed: Vec<StatusEffect> = eligible.into_iter().map(|i| self.effects.remove(i)).collect();
        removed.reverse();
        removed
    }

    /// Drop every effect
    pub fn clear(&mut self) {
        self.effects.clear();
    }

    fn remove_where(&mut self, predicate: impl Fn(&StatusEffect) -> bool) -> Vec<String> {
        let mut removed = Vec::new();
        self.effects.retain(|e| {
            if predicate(e) {
                removed.push(e.name.clone());
                false
            } else {
                true
            }
        });
        removed
    }
}
