//! Target selection - Stateless algorithms over a roster snapshot
//!
//! Hostile actions draw from the actor's opponents, friendly actions from the
//! actor's own side. Hostile candidates are weighted by aggro
//! (`100 × multiplier`); zero-weight candidates are never picked at random.

use crate::action::Action;
use crate::types::{TargetMode, UnitId};
use crate::unit::Roster;
use rand::seq::SliceRandom;
use rand::Rng;

/// Weight of a candidate with no aggro modifiers
pub const BASE_AGGRO_WEIGHT: f64 = 100.0;

/// What the previous action in a resolution chain did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChainState {
    /// Units the previous action selected
    pub targets: Vec<UnitId>,
    /// Units the previous action actually hit
    pub hits: Vec<UnitId>,
}

/// A unit eligible for selection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub id: UnitId,
    pub weight: f64,
    pub health_percent: f64,
}

/// Build the live candidate pool for an action
pub fn candidates(roster: &Roster, actor_id: UnitId, action: &Action) -> Vec<Candidate> {
    let Some(actor) = roster.get(actor_id) else {
        return Vec::new();
    };
    let side = if action.hostile {
        actor.side.opponent()
    } else {
        actor.side
    };

    roster
        .living_on_side(side)
        .map(|unit| Candidate {
            id: unit.id,
            weight: if action.hostile {
                BASE_AGGRO_WEIGHT * unit.status.compute_aggro_weight_multiplier()
            } else {
                BASE_AGGRO_WEIGHT
            },
            health_percent: unit.health_percent(),
        })
        .collect()
}

/// Select targets for an action.
///
/// `forced_target` is only consulted in [`TargetMode::Reaction`] mode.
pub fn select_targets(
    roster: &Roster,
    actor_id: UnitId,
    action: &Action,
    chain: &ChainState,
    forced_target: Option<UnitId>,
    rng: &mut impl Rng,
) -> Vec<UnitId> {
    if !roster.is_alive(actor_id) {
        return Vec::new();
    }

    let pool = candidates(roster, actor_id, action);

    let primary: Vec<UnitId> = match action.target {
        TargetMode::Reaction => {
            // Fixed by the triggering event, never extended by splash
            return forced_target
                .filter(|id| roster.is_alive(*id))
                .into_iter()
                .collect();
        }
        TargetMode::SelfOnly => vec![actor_id],
        TargetMode::Same => living(roster, &chain.targets),
        TargetMode::Linked => living(roster, &chain.hits),
        TargetMode::SelfAfterHit => {
            if chain.hits.is_empty() {
                Vec::new()
            } else {
                vec![actor_id]
            }
        }
        TargetMode::RandomEnemy => weighted_pick(&pool, rng).into_iter().collect(),
        TargetMode::RandomEnemyTrue => {
            let threatening: Vec<&Candidate> = pool.iter().filter(|c| c.weight > 0.0).collect();
            threatening.choose(rng).map(|c| c.id).into_iter().collect()
        }
        TargetMode::RandomAlly => pool.choose(rng).map(|c| c.id).into_iter().collect(),
        TargetMode::AllEnemies | TargetMode::AllAllies => {
            if action.hostile && pool.iter().all(|c| c.weight <= 0.0) {
                Vec::new()
            } else {
                pool.iter().map(|c| c.id).collect()
            }
        }
        TargetMode::LowestHppAlly | TargetMode::LowestHppEnemy => lowest_health(&pool).into_iter().collect(),
    };

    if action.splash == 0 || primary.is_empty() {
        return primary;
    }
    add_splash(primary, &pool, action.hostile, action.splash, rng)
}

/// Weighted random choice; zero-weight candidates are excluded
pub fn weighted_pick(pool: &[Candidate], rng: &mut impl Rng) -> Option<UnitId> {
    let weighted: Vec<&Candidate> = pool.iter().filter(|c| c.weight > 0.0).collect();
    let total: f64 = weighted.iter().map(|c| c.weight).sum();
    if weighted.is_empty() || total <= 0.0 {
        return None;
    }

    let roll = rng.gen::<f64>() * total;
    let mut cumulative = 0.0;
    for candidate in &weighted {
        cumulative += candidate.weight;
        if roll < cumulative {
            return Some(candidate.id);
        }
    }
    // Floating point drift can leave roll == total
    weighted.last().map(|c| c.id)
}

/// Candidate with the lowest health percentage; ties go to the first seen
pub fn lowest_health(pool: &[Candidate]) -> Option<UnitId> {
    let mut best: Option<&Candidate> = None;
    for candidate in pool {
        if best.map_or(true, |b| candidate.health_percent < b.health_percent) {
            best = Some(candidate);
        }
    }
    best.map(|c| c.id)
}

fn living(roster: &Roster, ids: &[UnitId]) -> Vec<UnitId> {
    ids.iter().copied().filter(|id| roster.is_alive(*id)).collect()
}

fn add_splash(
    mut selected: Vec<UnitId>,
    pool: &[Candidate],
    hostile: bool,
    splash: u32,
    rng: &mut impl Rng,
) -> Vec<UnitId> {
    let remaining: Vec<UnitId> = pool
        .iter()
        .filter(|c| !selected.contains(&c.id))
        .filter(|c| !hostile || c.weight > 0.0)
        .map(|c| c.id)
        .collect();

    selected.extend(remaining.choose_multiple(rng, splash as usize).copied());
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionKind;
    use crate::status::{StatusKind, StatusTemplate};
    use crate::types::{ActionType, Classification, Remaining, Side};
    use crate::unit::test_unit;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn roster() -> Roster {
        let mut roster = Roster::new();
        roster.insert(test_unit(0, Side::Friendly, 100));
        roster.insert(test_unit(1, Side::Friendly, 100));
        roster.insert(test_unit(2, Side::Enemy, 100));
        roster.insert(test_unit(3, Side::Enemy, 100));
        roster.insert(test_unit(4, Side::Enemy, 100));
        roster
    }

    fn attack(target: TargetMode) -> Action {
        Action::new("strike", ActionType::Melee, ActionKind::WeaponAttack { multiplier: 1.0 }).hostile(target)
    }

    fn buff(target: TargetMode) -> Action {
        Action::new("mend", ActionType::Heal, ActionKind::Heal { base_quantity: 5.0 }).friendly(target)
    }

    fn set_aggro(roster: &mut Roster, id: u32, multiplier: f64) {
        let effect = StatusTemplate {
            name: "aggro".to_string(),
            classification: Classification::Innate,
            beneficial: false,
            duration: Remaining::Unlimited,
            charges: Remaining::Unlimited,
            kind: StatusKind::AggroModification { multiplier },
        }
        .instantiate(UnitId(id));
        roster.get_mut(UnitId(id)).unwrap().status.attach(effect);
    }

    #[test]
    fn test_self_target() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let targets = select_targets(
            &roster(),
            UnitId(1),
            &buff(TargetMode::SelfOnly),
            &ChainState::default(),
            None,
            &mut rng,
        );
        assert_eq!(targets, vec![UnitId(1)]);
    }

    #[test]
    fn test_random_enemy_picks_opponents() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let roster = roster();
        for _ in 0..20 {
            let targets = select_targets(
                &roster,
                UnitId(0),
                &attack(TargetMode::RandomEnemy),
                &ChainState::default(),
                None,
                &mut rng,
            );
            assert_eq!(targets.len(), 1);
            assert_eq!(roster.get(targets[0]).unwrap().side, Side::Enemy);
        }
    }

    #[test]
    fn test_zero_aggro_never_picked() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut roster = roster();
        set_aggro(&mut roster, 2, 0.0);
        set_aggro(&mut roster, 3, 0.0);

        for mode in [TargetMode::RandomEnemy, TargetMode::RandomEnemyTrue] {
            for _ in 0..20 {
                let targets = select_targets(&roster, UnitId(0), &attack(mode), &ChainState::default(), None, &mut rng);
                assert_eq!(targets, vec![UnitId(4)]);
            }
        }
    }

    #[test]
    fn test_weighted_pick_favors_taunt() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut roster = roster();
        set_aggro(&mut roster, 4, 50.0);

        let mut taunted = 0;
        for _ in 0..200 {
            let targets = select_targets(
                &roster,
                UnitId(0),
                &attack(TargetMode::RandomEnemy),
                &ChainState::default(),
                None,
                &mut rng,
            );
            if targets == vec![UnitId(4)] {
                taunted += 1;
            }
        }
        // 5000 / 5200 expected
        assert!(taunted > 170);
    }

    #[test]
    fn test_all_enemies_with_zero_threat_is_empty() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut roster = roster();
        for id in 2..=4 {
            set_aggro(&mut roster, id, 0.0);
        }
        let targets = select_targets(
            &roster,
            UnitId(0),
            &attack(TargetMode::AllEnemies),
            &ChainState::default(),
            None,
            &mut rng,
        );
        assert!(targets.is_empty());
    }

    #[test]
    fn test_all_allies() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let targets = select_targets(
            &roster(),
            UnitId(0),
            &buff(TargetMode::AllAllies),
            &ChainState::default(),
            None,
            &mut rng,
        );
        assert_eq!(targets, vec![UnitId(0), UnitId(1)]);
    }

    #[test]
    fn test_lowest_health_ties_take_first() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut roster = roster();
        roster.get_mut(UnitId(3)).unwrap().resources.health.set(40.0);
        roster.get_mut(UnitId(4)).unwrap().resources.health.set(40.0);

        let targets = select_targets(
            &roster,
            UnitId(0),
            &attack(TargetMode::LowestHppEnemy),
            &ChainState::default(),
            None,
            &mut rng,
        );
        assert_eq!(targets, vec![UnitId(3)]);
    }

    #[test]
    fn test_chain_modes() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let roster = roster();
        let chain = ChainState {
            targets: vec![UnitId(2), UnitId(3)],
            hits: vec![UnitId(3)],
        };

        let same = select_targets(&roster, UnitId(0), &attack(TargetMode::Same), &chain, None, &mut rng);
        assert_eq!(same, vec![UnitId(2), UnitId(3)]);

        let linked = select_targets(&roster, UnitId(0), &attack(TargetMode::Linked), &chain, None, &mut rng);
        assert_eq!(linked, vec![UnitId(3)]);

        let after_hit = select_targets(&roster, UnitId(0), &buff(TargetMode::SelfAfterHit), &chain, None, &mut rng);
        assert_eq!(after_hit, vec![UnitId(0)]);

        let missed = select_targets(
            &roster,
            UnitId(0),
            &buff(TargetMode::SelfAfterHit),
            &ChainState::default(),
            None,
            &mut rng,
        );
        assert!(missed.is_empty());
    }

    #[test]
    fn test_reaction_uses_forced_target() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let roster = roster();
        let targets = select_targets(
            &roster,
            UnitId(2),
            &attack(TargetMode::Reaction).with_splash(2),
            &ChainState::default(),
            Some(UnitId(1)),
            &mut rng,
        );
        assert_eq!(targets, vec![UnitId(1)]);

        let none = select_targets(
            &roster,
            UnitId(2),
            &attack(TargetMode::Reaction),
            &ChainState::default(),
            None,
            &mut rng,
        );
        assert!(none.is_empty());
    }

    #[test]
    fn test_splash_adds_distinct_targets() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut roster = roster();
        set_aggro(&mut roster, 4, 0.0);

        let targets = select_targets(
            &roster,
            UnitId(0),
            &attack(TargetMode::LowestHppEnemy).with_splash(5),
            &ChainState::default(),
            None,
            &mut rng,
        );
        // Unit 2 is primary, unit 3 splashes, unit 4 has no threat
        assert_eq!(targets, vec![UnitId(2), UnitId(3)]);
    }

    #[test]
    fn test_dead_actor_selects_nothing() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut roster = roster();
        roster.get_mut(UnitId(0)).unwrap().resources.health.clear();
        let targets = select_targets(
            &roster,
            UnitId(0),
            &attack(TargetMode::AllEnemies),
            &ChainState::default(),
            None,
            &mut rng,
        );
        assert!(targets.is_empty());
    }
}
