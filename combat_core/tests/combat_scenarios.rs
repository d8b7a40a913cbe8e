//! Integration tests: catalog -> units -> cards -> resolution -> outcome
//!
//! These drive the engine through its public API, one scenario per test.

use combat_core::action::{Action, ActionKind, Card, Comparison, ConditionSubject, Conditional};
use combat_core::config::{default_catalog, Catalog, CombatConstants};
use combat_core::damage::DamageTemplate;
use combat_core::engine::CombatEngine;
use combat_core::log::{CombatLog, LogCategory, SharedLog};
use combat_core::resource::ResourceKind;
use combat_core::status::{StatusKind, StatusTemplate};
use combat_core::targeting::ChainState;
use combat_core::types::{ActionType, Classification, DamageType, Remaining, Side, TargetMode, TriggerMoment, UnitId};
use combat_core::unit::{CombatUnit, UnitTemplate, WeaponType};
use std::sync::{Arc, Mutex};

/// Helper to print a separator
fn separator(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("  {}", title);
    println!("{}\n", "=".repeat(60));
}

/// Route engine traces to the test output
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn sword(base_damage: f64) -> Arc<WeaponType> {
    Arc::new(WeaponType {
        name: "sword".to_string(),
        base_damage,
        pierce: 0.0,
        crush: 0.0,
        damage_types: vec![DamageType::Physical],
    })
}

fn strike(multiplier: f64) -> Action {
    Action::new("strike", ActionType::Melee, ActionKind::WeaponAttack { multiplier }).hostile(TargetMode::RandomEnemy)
}

/// Catalog holding only the enrage and drained cards
fn base_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    let frenzy = catalog
        .add_action(
            Action::new("frenzy_strike", ActionType::Melee, ActionKind::WeaponAttack { multiplier: 1.0 })
                .hostile(TargetMode::RandomEnemy),
        )
        .unwrap();
    let breathe = catalog
        .add_action(Action::new(
            "catch_breath",
            ActionType::Utility,
            ActionKind::AdjustResource {
                resource: ResourceKind::Spirit,
                quantity: 1.0,
            },
        ))
        .unwrap();
    catalog.add_card(Card::new("enraged_frenzy", vec![frenzy])).unwrap();
    catalog.add_card(Card::new("drained", vec![breathe])).unwrap();
    catalog
}

fn constants() -> CombatConstants {
    let mut constants = CombatConstants::default();
    constants.turns.jitter = 0.0;
    constants
}

fn engine_with_log(seed: u64) -> (CombatEngine, SharedLog) {
    let shared: SharedLog = Arc::new(Mutex::new(CombatLog::new()));
    let engine = CombatEngine::new(Arc::new(base_catalog()), constants(), seed)
        .unwrap()
        .with_log_sink(Box::new(shared.clone()));
    (engine, shared)
}

struct UnitSpec {
    level: u32,
    speed: u32,
    health: u32,
    armor: u32,
    weapon: Option<Arc<WeaponType>>,
    deck: Vec<Card>,
}

impl Default for UnitSpec {
    fn default() -> Self {
        UnitSpec {
            level: 1,
            speed: 100,
            health: 100,
            armor: 0,
            weapon: None,
            deck: Vec::new(),
        }
    }
}

fn build(name: &str, side: Side, spec: UnitSpec) -> CombatUnit {
    UnitTemplate {
        kind: name.to_lowercase(),
        name: name.to_string(),
        level: spec.level,
        speed: spec.speed,
        weapon: spec.weapon,
        health: spec.health,
        armor: spec.armor,
        armor_max: spec.armor.max(100),
        spirit: 10,
        rage_max: 100,
        enrage_duration: 2,
        deck: spec.deck.into_iter().map(Arc::new).collect(),
    }
    .build(UnitId(0), side)
}

fn health(engine: &CombatEngine, id: UnitId) -> f64 {
    engine.unit(id).map_or(0.0, |u| u.resources.health.current())
}

fn status_apply(name: &str, hostile: bool, template: StatusTemplate) -> Action {
    let action = Action::new(name, ActionType::Spell, ActionKind::StatusApply(template));
    if hostile {
        action.hostile(TargetMode::RandomEnemy)
    } else {
        action
    }
}

#[test]
fn test_scenario_a_weapon_attack_through_armor() {
    let (mut engine, _) = engine_with_log(1);
    let actor = engine.add_unit(build(
        "Knight",
        Side::Friendly,
        UnitSpec {
            level: 2,
            weapon: Some(sword(20.0)),
            ..UnitSpec::default()
        },
    ));
    let target = engine.add_unit(build(
        "Wolf",
        Side::Enemy,
        UnitSpec {
            health: 50,
            armor: 10,
            ..UnitSpec::default()
        },
    ));

    let chain = engine
        .resolve_action(actor, Arc::new(strike(1.0)), ChainState::default())
        .unwrap();

    let wolf = engine.unit(target).unwrap();
    assert!((wolf.resources.armor.current() - 0.0).abs() < f64::EPSILON);
    assert!((wolf.resources.health.current() - 38.0).abs() < f64::EPSILON);
    assert_eq!(chain.targets, vec![target]);
    assert_eq!(chain.hits, vec![target]);
}

#[test]
fn test_scenario_b_periodic_damage_for_three_rounds() {
    let (mut engine, _) = engine_with_log(2);
    let caster = engine.add_unit(build("Shaman", Side::Friendly, UnitSpec::default()));
    let target = engine.add_unit(build("Bandit", Side::Enemy, UnitSpec::default()));

    let poison = status_apply(
        "poison_dart",
        true,
        StatusTemplate {
            name: "poison".to_string(),
            classification: Classification::Poison,
            beneficial: false,
            duration: Remaining::Finite(3),
            charges: Remaining::Finite(1),
            kind: StatusKind::PeriodicDamage {
                template: DamageTemplate {
                    amount: 5.0,
                    damage_types: vec![DamageType::Chaos],
                    pierce: 0.0,
                    crush: 0.0,
                },
            },
        },
    );
    engine
        .resolve_action(caster, Arc::new(poison), ChainState::default())
        .unwrap();

    let mut history = Vec::new();
    for _ in 0..4 {
        engine.begin_round();
        engine.end_round().unwrap();
        history.push(health(&engine, target));
    }

    assert_eq!(history, vec![95.0, 90.0, 85.0, 85.0]);
    assert!(engine.unit(target).unwrap().status.is_empty());
}

#[test]
fn test_scenario_b_periodic_healing() {
    let (mut engine, _) = engine_with_log(3);
    let mut hurt = build("Knight", Side::Friendly, UnitSpec::default());
    hurt.resources.health.set(50.0);
    hurt.status.attach(
        StatusTemplate {
            name: "regrowth".to_string(),
            classification: Classification::Magic,
            beneficial: true,
            duration: Remaining::Finite(3),
            charges: Remaining::Unlimited,
            kind: StatusKind::PeriodicDamage {
                template: DamageTemplate {
                    amount: -5.0,
                    damage_types: vec![],
                    pierce: 1.0,
                    crush: 0.0,
                },
            },
        }
        .instantiate(UnitId(99)),
    );
    let id = engine.add_unit(hurt);

    for _ in 0..4 {
        engine.end_round().unwrap();
    }
    assert!((health(&engine, id) - 65.0).abs() < f64::EPSILON);
}

#[test]
fn test_scenario_c_dispel_removes_one_of_two_at_random() {
    let mut removed_names = Vec::new();

    for seed in 0..40 {
        let (mut engine, _) = engine_with_log(seed);
        let cleric = engine.add_unit(build("Cleric", Side::Friendly, UnitSpec::default()));
        let mut cursed = build("Knight", Side::Friendly, UnitSpec::default());
        for name in ["slowed", "weakened"] {
            cursed.status.attach(
                StatusTemplate {
                    name: name.to_string(),
                    classification: Classification::Magic,
                    beneficial: false,
                    duration: Remaining::Finite(3),
                    charges: Remaining::Unlimited,
                    kind: StatusKind::AggroModification { multiplier: 1.0 },
                }
                .instantiate(UnitId(50)),
            );
        }
        let cursed = engine.add_unit(cursed);

        let cleanse = Action::new(
            "cleanse",
            ActionType::Spell,
            ActionKind::Dispel {
                clears_beneficial: false,
                count: Some(1),
                classification: None,
            },
        )
        .friendly(TargetMode::Same);
        let chain = ChainState {
            targets: vec![cursed],
            hits: vec![cursed],
        };
        engine.resolve_action(cleric, Arc::new(cleanse), chain).unwrap();

        let remaining = engine.unit(cursed).unwrap().status.effects();
        assert_eq!(remaining.len(), 1);
        removed_names.push(if remaining[0].name == "slowed" { "weakened" } else { "slowed" });
    }

    assert!(removed_names.contains(&"slowed"));
    assert!(removed_names.contains(&"weakened"));
}

#[test]
fn test_scenario_d_finisher_scales_by_focus_and_spends_it() {
    let (mut engine, _) = engine_with_log(4);
    let mut rogue = build(
        "Rogue",
        Side::Friendly,
        UnitSpec {
            weapon: Some(sword(20.0)),
            ..UnitSpec::default()
        },
    );
    rogue.resources.focus.set(2.0);
    let rogue = engine.add_unit(rogue);
    let target = engine.add_unit(build("Brute", Side::Enemy, UnitSpec::default()));

    let execute = Action::new(
        "execute",
        ActionType::Melee,
        ActionKind::Finisher {
            inner: Arc::new(strike(1.0)),
            scale_table: [50, 100, 150, 200],
        },
    )
    .hostile(TargetMode::RandomEnemy);
    engine.resolve_action(rogue, Arc::new(execute), ChainState::default()).unwrap();

    assert!((health(&engine, target) - 70.0).abs() < f64::EPSILON);
    assert!(engine.unit(rogue).unwrap().resources.focus.is_empty());
}

#[test]
fn test_finisher_spends_focus_on_miss() {
    let (mut engine, _) = engine_with_log(5);
    let mut rogue = build("Rogue", Side::Friendly, UnitSpec::default());
    rogue.resources.focus.set(3.0);
    let rogue = engine.add_unit(rogue);
    let target = engine.add_unit(build("Brute", Side::Enemy, UnitSpec::default()));

    let execute = Action::new(
        "execute",
        ActionType::Melee,
        ActionKind::Finisher {
            inner: Arc::new(strike(1.0).with_hit_chance(0)),
            scale_table: [50, 100, 150, 200],
        },
    )
    .hostile(TargetMode::RandomEnemy);
    let chain = engine.resolve_action(rogue, Arc::new(execute), ChainState::default()).unwrap();

    assert!(chain.hits.is_empty());
    assert!((health(&engine, target) - 100.0).abs() < f64::EPSILON);
    assert!(engine.unit(rogue).unwrap().resources.focus.is_empty());
}

fn counter_stance() -> StatusTemplate {
    let counter = Action::new("counter", ActionType::Melee, ActionKind::WeaponAttack { multiplier: 1.0 })
        .hostile(TargetMode::Reaction);
    StatusTemplate {
        name: "riposte".to_string(),
        classification: Classification::Innate,
        beneficial: true,
        duration: Remaining::Finite(2),
        charges: Remaining::Unlimited,
        kind: StatusKind::ActionTrigger {
            moment: TriggerMoment::OnGetHit,
            action_types: vec![],
            damage_types: vec![],
            reactions: vec![Arc::new(counter)],
        },
    }
}

#[test]
fn test_scenario_e_counter_targets_the_attacker() {
    let (mut engine, log) = engine_with_log(6);
    let attacker = engine.add_unit(build("Knight", Side::Friendly, UnitSpec::default()));
    let bystander = engine.add_unit(build("Mage", Side::Friendly, UnitSpec::default()));
    let mut defender = build("Duelist", Side::Enemy, UnitSpec::default());
    defender.status.attach(counter_stance().instantiate(UnitId(77)));
    let defender = engine.add_unit(defender);

    engine
        .resolve_action(attacker, Arc::new(strike(1.0)), ChainState::default())
        .unwrap();

    // Unarmed strike: 5 each way
    assert!((health(&engine, defender) - 95.0).abs() < f64::EPSILON);
    assert!((health(&engine, attacker) - 95.0).abs() < f64::EPSILON);
    assert!((health(&engine, bystander) - 100.0).abs() < f64::EPSILON);

    let log = log.lock().unwrap();
    assert_eq!(log.filter_by_category(LogCategory::Reaction).len(), 1);
}

#[test]
fn test_reactions_resolve_before_next_card_action() {
    let (mut engine, log) = engine_with_log(7);
    let jab = Action::new("jab", ActionType::Melee, ActionKind::WeaponAttack { multiplier: 1.0 })
        .hostile(TargetMode::RandomEnemy);
    let hook = Action::new("hook", ActionType::Melee, ActionKind::WeaponAttack { multiplier: 1.0 })
        .hostile(TargetMode::Same);
    let combo = Card::new("combo", vec![Arc::new(jab), Arc::new(hook)]);

    let attacker = engine.add_unit(build("Knight", Side::Friendly, UnitSpec::default()));
    let mut defender = build("Duelist", Side::Enemy, UnitSpec::default());
    defender.status.attach(counter_stance().instantiate(UnitId(77)));
    engine.add_unit(defender);

    engine.play_card(attacker, &combo).unwrap();

    let log = log.lock().unwrap();
    let hits: Vec<&str> = log
        .filter_by_category(LogCategory::Damage)
        .into_iter()
        .map(|e| e.message.as_str())
        .collect();
    assert_eq!(hits.len(), 4);
    assert!(hits[0].contains("with jab"));
    assert!(hits[1].contains("with counter"));
    assert!(hits[2].contains("with hook"));
    assert!(hits[3].contains("with counter"));
}

#[test]
fn test_reactions_do_not_chain_by_default() {
    let (mut engine, _) = engine_with_log(8);
    let mut knight = build("Knight", Side::Friendly, UnitSpec::default());
    knight.status.attach(counter_stance().instantiate(UnitId(70)));
    let knight = engine.add_unit(knight);
    let mut duelist = build("Duelist", Side::Enemy, UnitSpec::default());
    duelist.status.attach(counter_stance().instantiate(UnitId(71)));
    let duelist = engine.add_unit(duelist);

    engine
        .resolve_action(knight, Arc::new(strike(1.0)), ChainState::default())
        .unwrap();

    // One strike, one counter; the counter does not provoke another
    assert!((health(&engine, duelist) - 95.0).abs() < f64::EPSILON);
    assert!((health(&engine, knight) - 95.0).abs() < f64::EPSILON);
}

#[test]
fn test_charge_batching_spends_one_charge_per_card() {
    let (mut engine, _) = engine_with_log(9);
    let mut knight = build("Knight", Side::Friendly, UnitSpec::default());
    knight.status.attach(
        StatusTemplate {
            name: "empowered".to_string(),
            classification: Classification::Magic,
            beneficial: true,
            duration: Remaining::Finite(5),
            charges: Remaining::Finite(3),
            kind: StatusKind::DamageModification {
                applies_as_actor: true,
                scale: 2.0,
                additive: 0.0,
                affected_types: vec![],
                added_types: vec![],
            },
        }
        .instantiate(UnitId(60)),
    );
    let knight = engine.add_unit(knight);
    let target = engine.add_unit(build("Brute", Side::Enemy, UnitSpec::default()));

    let flurry = Card::new(
        "flurry",
        vec![Arc::new(strike(1.0)), Arc::new(strike(1.0)), Arc::new(strike(1.0))],
    );
    engine.play_card(knight, &flurry).unwrap();

    // Three doubled unarmed strikes
    assert!((health(&engine, target) - 70.0).abs() < f64::EPSILON);
    let effect = engine.unit(knight).unwrap().status.get("empowered", UnitId(60)).unwrap();
    assert_eq!(effect.charges, Remaining::Finite(2));
}

#[test]
fn test_enrage_override_every_turn_until_cleared() {
    init_tracing();
    let (mut engine, log) = engine_with_log(10);
    let calm = Card::new("guard", vec![]);
    let mut brute = build(
        "Brute",
        Side::Friendly,
        UnitSpec {
            deck: vec![calm],
            ..UnitSpec::default()
        },
    );
    brute.resources.rage.fill();
    let brute = engine.add_unit(brute);
    engine.add_unit(build(
        "Dummy",
        Side::Enemy,
        UnitSpec {
            health: 1000,
            ..UnitSpec::default()
        },
    ));

    engine.end_round().unwrap();
    for _ in 0..2 {
        engine.take_turn(brute).unwrap();
        engine.end_round().unwrap();
    }
    engine.take_turn(brute).unwrap();

    let log = log.lock().unwrap();
    let plays: Vec<&str> = log
        .filter_by_category(LogCategory::Card)
        .into_iter()
        .map(|e| e.message.as_str())
        .collect();
    assert_eq!(plays.len(), 3);
    assert!(plays[0].ends_with("plays enraged_frenzy"));
    assert!(plays[1].ends_with("plays enraged_frenzy"));
    assert!(plays[2].ends_with("plays guard"));
    assert!(engine.unit(brute).unwrap().resources.rage.is_empty());
}

#[test]
fn test_deck_exhaustion_skips_one_draw() {
    let (mut engine, _) = engine_with_log(11);
    let unit = build(
        "Knight",
        Side::Friendly,
        UnitSpec {
            deck: vec![Card::new("one", vec![]), Card::new("two", vec![])],
            ..UnitSpec::default()
        },
    );
    let id = engine.add_unit(unit);

    assert!(engine.next_card(id).unwrap().is_some());
    assert!(engine.next_card(id).unwrap().is_some());
    assert!(engine.next_card(id).unwrap().is_none());
    assert_eq!(engine.unit(id).unwrap().deck.cursor(), 0);
    assert!(engine.next_card(id).unwrap().is_some());
}

#[test]
fn test_cantrip_draws_one_extra_card() {
    let (mut engine, log) = engine_with_log(12);
    let quick = Card::new("quick", vec![]).cantrip();
    let deck = vec![quick.clone(), quick.clone(), quick];
    let id = engine.add_unit(build(
        "Rogue",
        Side::Friendly,
        UnitSpec {
            deck,
            ..UnitSpec::default()
        },
    ));

    engine.take_turn(id).unwrap();

    assert_eq!(engine.unit(id).unwrap().deck.cursor(), 2);
    assert_eq!(log.lock().unwrap().filter_by_category(LogCategory::Card).len(), 2);
}

#[test]
fn test_turn_order_slow_unit_last() {
    let mut constants = CombatConstants::default();
    constants.turns.jitter = 0.10;
    let mut engine = CombatEngine::new(Arc::new(base_catalog()), constants, 13).unwrap();

    let slow = engine.add_unit(build(
        "Slow",
        Side::Friendly,
        UnitSpec {
            speed: 50,
            ..UnitSpec::default()
        },
    ));
    let fast_a = engine.add_unit(build("FastA", Side::Friendly, UnitSpec::default()));
    let fast_b = engine.add_unit(build("FastB", Side::Enemy, UnitSpec::default()));

    for _ in 0..20 {
        let order = engine.turn_order();
        assert_eq!(order.len(), 3);
        assert_eq!(order[2], slow);
        assert!(order[..2].contains(&fast_a));
        assert!(order[..2].contains(&fast_b));
    }
}

#[test]
fn test_conditional_target_filter() {
    let (mut engine, _) = engine_with_log(14);
    let medic = engine.add_unit(build("Medic", Side::Friendly, UnitSpec::default()));
    let mut hurt = build("Knight", Side::Friendly, UnitSpec::default());
    hurt.resources.health.set(40.0);
    let hurt = engine.add_unit(hurt);
    let healthy = engine.add_unit(build("Mage", Side::Friendly, UnitSpec::default()));

    let triage = Action::new("triage", ActionType::Heal, ActionKind::Heal { base_quantity: 10.0 })
        .friendly(TargetMode::Same)
        .with_condition(Conditional {
            subject: ConditionSubject::Target,
            resource: ResourceKind::Health,
            comparison: Comparison::AtMost,
            threshold: 50.0,
            percentage: true,
        });
    let chain = ChainState {
        targets: vec![hurt, healthy, medic],
        hits: vec![],
    };
    let chain = engine.resolve_action(medic, Arc::new(triage), chain).unwrap();

    assert_eq!(chain.hits, vec![hurt]);
    assert!((health(&engine, hurt) - 50.0).abs() < f64::EPSILON);
}

#[test]
fn test_blind_actor_always_misses() {
    let (mut engine, _) = engine_with_log(15);
    let mut archer = build("Archer", Side::Friendly, UnitSpec::default());
    archer.status.attach(
        StatusTemplate {
            name: "blinded".to_string(),
            classification: Classification::Magic,
            beneficial: false,
            duration: Remaining::Finite(2),
            charges: Remaining::Finite(1),
            kind: StatusKind::ChanceToHitModification {
                applies_as_actor: true,
                scaling_percent: -100,
                affected_action_types: vec![ActionType::Melee],
            },
        }
        .instantiate(UnitId(40)),
    );
    let archer = engine.add_unit(archer);
    let target = engine.add_unit(build("Wolf", Side::Enemy, UnitSpec::default()));

    let volley = Card::new("volley", vec![Arc::new(strike(1.0)), Arc::new(strike(1.0))]);
    engine.play_card(archer, &volley).unwrap();

    assert!((health(&engine, target) - 100.0).abs() < f64::EPSILON);
    // One charge for the whole card, so the effect is gone
    assert!(engine.unit(archer).unwrap().status.is_empty());
}

#[test]
fn test_killed_target_leaves_roster_immediately() {
    let (mut engine, _) = engine_with_log(16);
    let knight = engine.add_unit(build(
        "Knight",
        Side::Friendly,
        UnitSpec {
            weapon: Some(sword(50.0)),
            ..UnitSpec::default()
        },
    ));
    let wolf = engine.add_unit(build(
        "Wolf",
        Side::Enemy,
        UnitSpec {
            health: 20,
            ..UnitSpec::default()
        },
    ));

    let follow_up = Action::new("follow_up", ActionType::Melee, ActionKind::WeaponAttack { multiplier: 1.0 })
        .hostile(TargetMode::Same);
    let card = Card::new("double", vec![Arc::new(strike(1.0)), Arc::new(follow_up)]);
    engine.play_card(knight, &card).unwrap();

    assert!(engine.unit(wolf).is_none());
    assert_eq!(engine.casualties().len(), 1);
    assert_eq!(engine.winner(), Some(Side::Friendly));
}

#[test]
fn test_combat_end_one_side_standing() {
    init_tracing();
    let (mut engine, _) = engine_with_log(17);
    let card = Card::new("strike", vec![Arc::new(strike(1.0))]);
    engine.add_unit(build(
        "Knight",
        Side::Friendly,
        UnitSpec {
            weapon: Some(sword(30.0)),
            deck: vec![card.clone()],
            ..UnitSpec::default()
        },
    ));
    engine.add_unit(build(
        "Rat",
        Side::Enemy,
        UnitSpec {
            health: 10,
            speed: 10,
            deck: vec![card],
            ..UnitSpec::default()
        },
    ));

    let outcome = engine.execute().unwrap();
    assert_eq!(outcome.winner, Some(Side::Friendly));
    assert_eq!(outcome.rounds, 1);
    assert_eq!(outcome.casualties.len(), 1);
    assert_eq!(outcome.casualties[0].name, "Rat");
}

#[test]
fn test_simultaneous_wipe_currently_declares_enemy_winner() {
    let (mut engine, _) = engine_with_log(18);
    let doom = StatusTemplate {
        name: "doom".to_string(),
        classification: Classification::Mental,
        beneficial: false,
        duration: Remaining::Finite(1),
        charges: Remaining::Unlimited,
        kind: StatusKind::PeriodicDamage {
            template: DamageTemplate {
                amount: 500.0,
                damage_types: vec![],
                pierce: 1.0,
                crush: 0.0,
            },
        },
    };
    for side in [Side::Friendly, Side::Enemy] {
        let mut unit = build("Doomed", side, UnitSpec::default());
        unit.status.attach(doom.instantiate(UnitId(90)));
        engine.add_unit(unit);
    }

    engine.begin_round();
    engine.end_round().unwrap();

    assert!(engine.is_over());
    assert_eq!(engine.roster().len(), 0);
    assert_eq!(engine.outcome().winner, Some(Side::Enemy));
}

#[test]
fn test_round_cap_ends_without_winner() {
    let mut constants = constants();
    constants.turns.max_rounds = 5;
    let mut engine = CombatEngine::new(Arc::new(base_catalog()), constants, 19).unwrap();
    let wait = Card::new("wait", vec![]);
    for side in [Side::Friendly, Side::Enemy] {
        engine.add_unit(build(
            "Pacifist",
            side,
            UnitSpec {
                deck: vec![wait.clone()],
                ..UnitSpec::default()
            },
        ));
    }

    let outcome = engine.execute().unwrap();
    assert_eq!(outcome.winner, None);
    assert_eq!(outcome.rounds, 5);
    assert_eq!(outcome.survivors.len(), 2);
}

#[test]
fn test_summoned_units_fight_and_leave() {
    let (mut engine, _) = engine_with_log(20);
    let mut catalog = base_catalog();
    catalog
        .add_unit(UnitTemplate {
            kind: "wolf".to_string(),
            name: "Wolf".to_string(),
            level: 1,
            speed: 120,
            weapon: None,
            health: 20,
            armor: 0,
            armor_max: 0,
            spirit: 0,
            rage_max: 50,
            enrage_duration: 2,
            deck: vec![Arc::new(Card::new("bite", vec![Arc::new(strike(1.0))]))],
        })
        .unwrap();
    engine = engine.with_factory(Arc::new(catalog));

    let druid = engine.add_unit(build("Druid", Side::Friendly, UnitSpec::default()));
    let target = engine.add_unit(build("Bandit", Side::Enemy, UnitSpec::default()));
    let call = Action::new(
        "call_wolf",
        ActionType::Spell,
        ActionKind::Summon {
            count: 1,
            summon_kind: "wolf".to_string(),
            duration: 2,
        },
    );
    engine.resolve_action(druid, Arc::new(call), ChainState::default()).unwrap();

    let wolf = engine
        .roster()
        .iter()
        .find(|u| u.kind == "wolf")
        .map(|u| u.id)
        .unwrap();
    assert!(engine.unit(wolf).unwrap().is_temporary);
    assert_eq!(engine.unit(wolf).unwrap().side, Side::Friendly);

    engine.take_turn(wolf).unwrap();
    assert!((health(&engine, target) - 95.0).abs() < f64::EPSILON);

    engine.end_round().unwrap();
    assert!(engine.unit(wolf).is_some());
    engine.end_round().unwrap();
    assert!(engine.unit(wolf).is_none());
}

fn run_default_combat(seed: u64) -> (String, Vec<String>) {
    let catalog = Arc::new(default_catalog().unwrap());
    let shared: SharedLog = Arc::new(Mutex::new(CombatLog::new()));
    let mut engine = CombatEngine::new(catalog, CombatConstants::default(), seed)
        .unwrap()
        .with_log_sink(Box::new(shared.clone()));

    for kind in ["knight", "rogue", "mage"] {
        engine.spawn(kind, Side::Friendly).unwrap();
    }
    for kind in ["bandit", "brute", "shaman"] {
        engine.spawn(kind, Side::Enemy).unwrap();
    }

    let outcome = engine.execute().unwrap();
    let log = shared.lock().unwrap();
    let lines = log.entries().iter().map(|e| e.message.clone()).collect();
    (serde_json::to_string(&outcome).unwrap(), lines)
}

#[test]
fn test_default_catalog_combat_is_deterministic() {
    init_tracing();
    separator("Default catalog combat");

    let (first, lines) = run_default_combat(42);
    let (second, _) = run_default_combat(42);
    assert_eq!(first, second);

    for line in lines.iter().rev().take(10).rev() {
        println!("  {}", line);
    }
    println!("\n  {}", first);
}

#[test]
fn test_default_catalog_combats_finish() {
    for seed in 0..10 {
        let (outcome, lines) = run_default_combat(seed);
        assert!(!lines.is_empty());
        assert!(outcome.contains("\"rounds\""));
    }
}
