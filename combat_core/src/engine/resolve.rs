//! Action resolution - Targets, hit rolls, packets and the reaction queue

use super::{CombatEngine, CombatError};
use crate::action::{focus_scale, Action, ActionKind, ConditionSubject};
use crate::config::CombatConstants;
use crate::damage::{apply_damage, DamageOutcome, DamagePacket, FinalDamage};
use crate::log::{LogCategory, Severity};
use crate::status::TriggeredAction;
use crate::targeting::{select_targets, ChainState};
use crate::types::{DamageType, TriggerMoment, UnitId};
use crate::unit::CombatUnit;
use rand::Rng;
use std::collections::VecDeque;
use std::sync::Arc;

/// An action waiting in the reaction queue
#[derive(Debug, Clone)]
struct PendingAction {
    action: Arc<Action>,
    actor: UnitId,
    forced_target: Option<UnitId>,
    /// 0 for card actions, +1 per reaction level
    depth: u32,
    /// Index of the chain this action reads and extends
    chain: usize,
}

/// Build the unmodified packet for a damage or heal action.
///
/// Returns `None` for kinds that do not produce packets.
pub fn base_packet(constants: &CombatConstants, actor: &CombatUnit, action: &Action) -> Option<DamagePacket> {
    let level_multiplier = constants.level_multiplier(actor.level);

    let packet = match &action.kind {
        ActionKind::WeaponAttack { multiplier } => {
            let packet = match &actor.weapon {
                Some(weapon) => DamagePacket::new(
                    (weapon.base_damage * level_multiplier * multiplier).round(),
                    action.action_type,
                )
                .with_types(&weapon.damage_types)
                .with_split(weapon.pierce, weapon.crush),
                None => DamagePacket::new(
                    (constants.damage.unarmed_damage * level_multiplier * multiplier).round(),
                    action.action_type,
                )
                .with_types(&[DamageType::Physical]),
            };
            packet.with_source(actor.id)
        }
        ActionKind::NonweaponAttack {
            base_quantity,
            damage_types,
            pierce,
            crush,
        } => DamagePacket::new((base_quantity * level_multiplier).round(), action.action_type)
            .with_source(actor.id)
            .with_types(damage_types)
            .with_split(*pierce, *crush),
        ActionKind::Heal { base_quantity } => {
            DamagePacket::new(-(base_quantity * level_multiplier).round(), action.action_type)
                .with_source(actor.id)
                .with_split(1.0, 0.0)
        }
        _ => return None,
    };
    Some(packet)
}

/// Hit chance after modifiers, clamped to 0 - 100
pub fn effective_hit_chance(base: i32, actor_modifier: i32, target_modifier: i32) -> i32 {
    (base + actor_modifier + target_modifier).clamp(0, 100)
}

impl CombatEngine {
    /// Resolve one top-level action and every reaction it causes.
    ///
    /// Reactions are queued in front of anything still pending, in trigger
    /// order, so a reaction's own reactions finish before its siblings run.
    /// Returns the chain state left by the top-level action.
    pub fn resolve_action(
        &mut self,
        actor: UnitId,
        action: Arc<Action>,
        chain: ChainState,
    ) -> Result<ChainState, CombatError> {
        let mut chains = vec![chain];
        let mut queue = VecDeque::new();
        queue.push_back(PendingAction {
            action,
            actor,
            forced_target: None,
            depth: 0,
            chain: 0,
        });

        while let Some(pending) = queue.pop_front() {
            let (next_chain, triggered) = self.resolve_pending(&pending, &chains[pending.chain])?;
            chains[pending.chain] = next_chain;

            if triggered.is_empty() {
                continue;
            }
            let batch = chains.len();
            chains.push(ChainState::default());
            for reaction in triggered.into_iter().rev() {
                queue.push_front(PendingAction {
                    action: reaction.action,
                    actor: reaction.actor,
                    forced_target: reaction.forced_target,
                    depth: pending.depth + 1,
                    chain: batch,
                });
            }
        }

        Ok(chains.into_iter().next().unwrap_or_default())
    }

    fn resolve_pending(
        &mut self,
        pending: &PendingAction,
        chain: &ChainState,
    ) -> Result<(ChainState, Vec<TriggeredAction>), CombatError> {
        let Some(actor) = self.roster.get(pending.actor).filter(|u| u.is_alive()) else {
            self.log(
                LogCategory::Action,
                Severity::Debug,
                format!("{} skipped: actor {} is gone", pending.action.name, pending.actor),
            );
            return Ok((ChainState::default(), Vec::new()));
        };

        let (action, focus_spent) = match &pending.action.kind {
            ActionKind::Finisher { inner, scale_table } => {
                let scale = focus_scale(scale_table, actor.resources.focus.current());
                let scaled = inner.scaled_by(scale).map(Arc::new).unwrap_or_else(|| inner.clone());
                self.log(
                    LogCategory::Action,
                    Severity::Debug,
                    format!("{} finisher scales {} by {:.2}", pending.action.name, inner.name, scale),
                );
                (scaled, true)
            }
            _ => (pending.action.clone(), false),
        };

        let result = self.resolve_targets(pending, &action, chain);

        if focus_spent {
            if let Some(actor) = self.roster.get_mut(pending.actor) {
                actor.resources.focus.clear();
            }
        }
        result
    }

    fn resolve_targets(
        &mut self,
        pending: &PendingAction,
        action: &Action,
        chain: &ChainState,
    ) -> Result<(ChainState, Vec<TriggeredAction>), CombatError> {
        let actor_id = pending.actor;
        let actor_label = self.label(actor_id);

        if let Some(condition) = action.condition.as_ref().filter(|c| c.subject == ConditionSubject::Actor) {
            let passes = self
                .roster
                .get(actor_id)
                .map_or(false, |actor| condition.evaluate(&actor.resources));
            if !passes {
                self.log(
                    LogCategory::Action,
                    Severity::Debug,
                    format!("{} {}: condition not met", actor_label, action.name),
                );
                return Ok((ChainState::default(), Vec::new()));
            }
        }

        let targets = select_targets(
            &self.roster,
            actor_id,
            action,
            chain,
            pending.forced_target,
            &mut self.rng,
        );
        if targets.is_empty() {
            self.log(
                LogCategory::Action,
                Severity::Debug,
                format!("{} {} ({}): no targets", actor_label, action.name, action.kind.label()),
            );
        }

        let mut hits = Vec::new();
        let mut triggered = Vec::new();

        for &target_id in &targets {
            if !self.roster.is_alive(actor_id) {
                break;
            }
            if !self.roster.is_alive(target_id) {
                continue;
            }
            if !self.target_condition_holds(action, target_id) {
                continue;
            }
            if !self.roll_hit(actor_id, target_id, action) {
                self.log(
                    LogCategory::Action,
                    Severity::Info,
                    format!("{} {} misses {}", actor_label, action.name, self.label(target_id)),
                );
                continue;
            }

            hits.push(target_id);
            let damage = self.apply_action(actor_id, target_id, action)?;

            if let Some(damage) = damage {
                if pending.depth < self.constants.reactions.max_depth {
                    triggered.extend(self.collect_triggers(actor_id, target_id, action, &damage));
                }
            }
            self.remove_if_dead(target_id);
        }

        Ok((ChainState { targets, hits }, triggered))
    }

    fn target_condition_holds(&mut self, action: &Action, target_id: UnitId) -> bool {
        let Some(condition) = action.condition.as_ref().filter(|c| c.subject == ConditionSubject::Target) else {
            return true;
        };
        let holds = self
            .roster
            .get(target_id)
            .map_or(false, |target| condition.evaluate(&target.resources));
        if !holds {
            let message = format!("{}: condition not met on {}", action.name, self.label(target_id));
            self.log(LogCategory::Action, Severity::Debug, message);
        }
        holds
    }

    /// Roll `0..100` against the modified hit chance.
    ///
    /// Actor-side modifiers always count; target-side ones only for hostile actions.
    fn roll_hit(&mut self, actor_id: UnitId, target_id: UnitId, action: &Action) -> bool {
        let actor_modifier = self
            .roster
            .get_mut(actor_id)
            .map_or(0, |actor| actor.status.compute_to_hit_modifier(action.action_type, true));
        let target_modifier = if action.hostile {
            self.roster
                .get_mut(target_id)
                .map_or(0, |target| target.status.compute_to_hit_modifier(action.action_type, false))
        } else {
            0
        };

        let chance = effective_hit_chance(action.hit_chance, actor_modifier, target_modifier);
        self.rng.gen_range(0..100) < chance
    }

    /// Apply the action's effect to one target that was hit.
    ///
    /// Returns the finalized packet for damage and heal kinds.
    fn apply_action(
        &mut self,
        actor_id: UnitId,
        target_id: UnitId,
        action: &Action,
    ) -> Result<Option<FinalDamage>, CombatError> {
        let actor_label = self.label(actor_id);
        let target_label = self.label(target_id);

        match &action.kind {
            ActionKind::WeaponAttack { .. } | ActionKind::NonweaponAttack { .. } | ActionKind::Heal { .. } => {
                let actor = self.roster.get(actor_id).ok_or(CombatError::UnitNotFound(actor_id))?;
                let Some(packet) = base_packet(&self.constants, actor, action) else {
                    return Ok(None);
                };
                let Some((damage, outcome)) = self.deliver_packet(Some(actor_id), target_id, packet) else {
                    return Ok(None);
                };
                let (category, verb) = if damage.is_healing() {
                    (LogCategory::Healing, "heals")
                } else {
                    (LogCategory::Damage, "hits")
                };
                self.log(
                    category,
                    Severity::Info,
                    format!(
                        "{} {} {} with {} for {:.0} ({})",
                        actor_label,
                        verb,
                        target_label,
                        action.name,
                        damage.amount().abs(),
                        outcome.summary()
                    ),
                );
                return Ok(Some(damage));
            }
            ActionKind::ArmorGrant { base_quantity } => {
                let target = self.roster.get_mut(target_id).ok_or(CombatError::UnitNotFound(target_id))?;
                let applied = target.resources.armor.adjust(*base_quantity);
                self.log(
                    LogCategory::Action,
                    Severity::Info,
                    format!("{} grants {} {:.0} armor", actor_label, target_label, applied),
                );
            }
            ActionKind::AdjustResource { resource, quantity } => {
                let target = self.roster.get_mut(target_id).ok_or(CombatError::UnitNotFound(target_id))?;
                let applied = target.resources.get_mut(*resource).adjust(*quantity);
                self.log(
                    LogCategory::Action,
                    Severity::Debug,
                    format!("{} adjusts {:?} of {} by {:.0}", actor_label, resource, target_label, applied),
                );
            }
            ActionKind::StatusApply(template) => {
                let target = self.roster.get_mut(target_id).ok_or(CombatError::UnitNotFound(target_id))?;
                let replaced = target.status.attach(template.instantiate(actor_id));
                let verb = if replaced { "refreshes" } else { "applies" };
                self.log(
                    LogCategory::Status,
                    Severity::Info,
                    format!("{} {} {} on {}", actor_label, verb, template.name, target_label),
                );
            }
            ActionKind::Summon {
                count,
                summon_kind,
                duration,
            } => {
                let side = self
                    .roster
                    .get(target_id)
                    .map(|u| u.side)
                    .ok_or(CombatError::UnitNotFound(target_id))?;
                for _ in 0..*count {
                    let id = self.summon(summon_kind, side, *duration)?;
                    let message = format!("{} summons {} for {} rounds", actor_label, self.label(id), duration);
                    self.log(LogCategory::Summon, Severity::Info, message);
                }
            }
            ActionKind::Dispel {
                clears_beneficial,
                count,
                classification,
            } => {
                let target = self.roster.get_mut(target_id).ok_or(CombatError::UnitNotFound(target_id))?;
                let removed = target
                    .status
                    .process_dispel(*clears_beneficial, *count, *classification, &mut self.rng);
                for effect in removed {
                    self.log(
                        LogCategory::Status,
                        Severity::Info,
                        format!("{} dispels {} from {}", actor_label, effect.name, target_label),
                    );
                }
            }
            ActionKind::Finisher { .. } => {
                self.log(
                    LogCategory::Action,
                    Severity::Warn,
                    format!("{}: nested {} ignored", action.name, action.kind.label()),
                );
            }
        }
        Ok(None)
    }

    /// Run a packet through the source's and holder's modifiers, finalize
    /// it and apply it to the holder.
    pub(super) fn deliver_packet(
        &mut self,
        source_id: Option<UnitId>,
        target_id: UnitId,
        mut packet: DamagePacket,
    ) -> Option<(FinalDamage, DamageOutcome)> {
        if let Some(source) = source_id.and_then(|id| self.roster.get_mut(id)) {
            source.status.process_damage_packet_modifiers(true, &mut packet);
        }
        let target = self.roster.get_mut(target_id)?;
        target.status.process_damage_packet_modifiers(false, &mut packet);

        let damage = packet.finalize();
        let outcome = apply_damage(&mut target.resources, &damage);
        Some((damage, outcome))
    }

    /// Reactions caused by a landed packet: on-hit on the actor, and
    /// on-get-hit on a surviving target of the other side.
    fn collect_triggers(
        &mut self,
        actor_id: UnitId,
        target_id: UnitId,
        action: &Action,
        damage: &FinalDamage,
    ) -> Vec<TriggeredAction> {
        let damage_types = damage.damage_types().to_vec();
        let mut triggered = Vec::new();

        let actor_side = self.roster.get(actor_id).map(|u| u.side);
        if let Some(actor) = self.roster.get_mut(actor_id) {
            triggered.extend(actor.status.get_triggered_actions(
                TriggerMoment::OnHit,
                action.action_type,
                &damage_types,
                actor_id,
                target_id,
            ));
        }

        if let Some(target) = self.roster.get_mut(target_id).filter(|t| t.is_alive()) {
            if Some(target.side) != actor_side {
                triggered.extend(target.status.get_triggered_actions(
                    TriggerMoment::OnGetHit,
                    action.action_type,
                    &damage_types,
                    target_id,
                    actor_id,
                ));
            }
        }

        for reaction in &triggered {
            let message = format!("{} reacts with {}", self.label(reaction.actor), reaction.action.name);
            self.log(LogCategory::Reaction, Severity::Info, message);
        }
        triggered
    }
}
