//! CombatEngine - Rounds, turns and the combat state machine
//!
//! A combat loops RoundStart → TurnOrder → UnitTurn* → RoundEnd until one
//! side has no living units or the round cap is reached. The engine owns the
//! roster, the RNG and the log; nothing is shared between engines.

mod error;
mod resolve;
mod result;

pub use error::CombatError;
pub use resolve::{base_packet, effective_hit_chance};
pub use result::{CombatOutcome, UnitSummary};

use crate::action::Card;
use crate::config::{Catalog, CombatConstants};
use crate::log::{LogCategory, LogSink, Logger, Severity, TracingSink};
use crate::targeting::ChainState;
use crate::types::{Side, UnitId};
use crate::unit::{CombatUnit, Roster, UnitFactory};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;

/// Turn-based combat between two sides
pub struct CombatEngine {
    constants: CombatConstants,
    factory: Arc<dyn UnitFactory>,
    roster: Roster,
    rng: ChaCha8Rng,
    logger: Logger,
    round: u32,
    casualties: Vec<UnitSummary>,
    enrage_card: Arc<Card>,
    drained_card: Arc<Card>,
}

impl CombatEngine {
    /// Create an engine using the catalog as unit factory.
    ///
    /// Fails if the enrage or drained card named in `constants` is missing.
    pub fn new(catalog: Arc<Catalog>, constants: CombatConstants, seed: u64) -> Result<Self, CombatError> {
        let enrage_card = lookup_card(&catalog, &constants.cards.enrage_card)?;
        let drained_card = lookup_card(&catalog, &constants.cards.drained_card)?;
        let logger = Logger::new(constants.log.clone(), Box::new(TracingSink));

        Ok(CombatEngine {
            constants,
            factory: catalog,
            roster: Roster::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            logger,
            round: 0,
            casualties: Vec::new(),
            enrage_card,
            drained_card,
        })
    }

    /// Produce units (including summons) from another factory
    pub fn with_factory(mut self, factory: Arc<dyn UnitFactory>) -> Self {
        self.factory = factory;
        self
    }

    /// Send log entries to `sink` instead of `tracing`
    pub fn with_log_sink(mut self, sink: Box<dyn LogSink>) -> Self {
        self.logger.set_sink(sink);
        self
    }

    pub fn constants(&self) -> &CombatConstants {
        &self.constants
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn unit(&self, id: UnitId) -> Option<&CombatUnit> {
        self.roster.get(id)
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut CombatUnit> {
        self.roster.get_mut(id)
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    /// Units that died so far, in order of death
    pub fn casualties(&self) -> &[UnitSummary] {
        &self.casualties
    }

    /// Build a unit of `kind` through the factory and add it to the roster
    pub fn spawn(&mut self, kind: &str, side: Side) -> Result<UnitId, CombatError> {
        let id = self.roster.allocate_id();
        let unit = self
            .factory
            .create_unit(kind, id, side)
            .ok_or_else(|| CombatError::UnknownUnitKind(kind.to_string()))?;
        self.roster.insert(unit);
        let message = format!("{} joins the {:?} side", self.label(id), side);
        self.log(LogCategory::Turn, Severity::Debug, message);
        Ok(id)
    }

    /// Add a prebuilt unit under a fresh id
    pub fn add_unit(&mut self, mut unit: CombatUnit) -> UnitId {
        unit.id = self.roster.allocate_id();
        let id = unit.id;
        self.roster.insert(unit);
        id
    }

    /// Run the whole combat to its end
    pub fn execute(&mut self) -> Result<CombatOutcome, CombatError> {
        if self.roster.count_living(Side::Friendly) == 0 || self.roster.count_living(Side::Enemy) == 0 {
            return Err(CombatError::EmptyRoster);
        }
        tracing::debug!(units = self.roster.len(), "combat starting");
        self.shuffle_decks();

        while !self.is_over() && self.round < self.constants.turns.max_rounds {
            let order = self.begin_round();
            for id in order {
                if self.is_over() {
                    break;
                }
                if !self.roster.is_alive(id) {
                    continue;
                }
                self.take_turn(id)?;
                self.cleanup();
            }
            if !self.is_over() {
                self.end_round()?;
            }
        }

        let outcome = self.outcome();
        self.log(LogCategory::Outcome, Severity::Info, outcome.summary());
        tracing::debug!(rounds = outcome.rounds, winner = ?outcome.winner, "combat finished");
        Ok(outcome)
    }

    /// Shuffle every deck and reset its cursor
    pub fn shuffle_decks(&mut self) {
        for unit in self.roster.iter_mut() {
            unit.deck.shuffle(&mut self.rng);
        }
    }

    /// Whether either side has no living units
    pub fn is_over(&self) -> bool {
        self.roster.count_living(Side::Friendly) == 0 || self.roster.count_living(Side::Enemy) == 0
    }

    /// Winning side once combat is over.
    ///
    /// When both sides are wiped at once the enemy side is declared winner.
    pub fn winner(&self) -> Option<Side> {
        let friendly = self.roster.count_living(Side::Friendly);
        let enemy = self.roster.count_living(Side::Enemy);
        match (friendly, enemy) {
            (0, _) => Some(Side::Enemy),
            (_, 0) => Some(Side::Friendly),
            _ => None,
        }
    }

    pub fn outcome(&self) -> CombatOutcome {
        CombatOutcome {
            winner: self.winner(),
            rounds: self.round,
            survivors: self.roster.living().map(UnitSummary::survivor).collect(),
            casualties: self.casualties.clone(),
        }
    }

    /// Start the next round and return the turn order
    pub fn begin_round(&mut self) -> Vec<UnitId> {
        self.round += 1;
        self.log(LogCategory::Round, Severity::Info, format!("Round {} begins", self.round));
        self.turn_order()
    }

    /// Living units sorted by jittered speed, fastest first
    pub fn turn_order(&mut self) -> Vec<UnitId> {
        let jitter = self.constants.turns.jitter.abs();
        let mut order: Vec<(UnitId, f64)> = self
            .roster
            .living()
            .map(|unit| (unit.id, unit.speed as f64 * (1.0 + self.rng.gen_range(-jitter..=jitter))))
            .collect();
        order.sort_by(|a, b| b.1.total_cmp(&a.1));

        tracing::trace!(round = self.round, ?order, "turn order");
        order.into_iter().map(|(id, _)| id).collect()
    }

    /// One unit's turn: prevention roll, card, optional cantrip card
    pub fn take_turn(&mut self, id: UnitId) -> Result<(), CombatError> {
        let unit = self.roster.get_mut(id).ok_or(CombatError::UnitNotFound(id))?;

        if unit.status.is_action_prevented(&mut self.rng) {
            let message = format!("{} is prevented from acting", self.label(id));
            self.log(LogCategory::Turn, Severity::Info, message);
        } else if let Some(card) = self.next_card(id)? {
            self.play_card(id, &card)?;
            if card.cantrip && self.roster.is_alive(id) {
                if let Some(extra) = self.next_card(id)? {
                    self.play_card(id, &extra)?;
                }
            }
        }

        if let Some(unit) = self.roster.get_mut(id) {
            for name in unit.status.tick_after_card() {
                let message = format!("{} wears off {}", name, self.label(id));
                self.log(LogCategory::Status, Severity::Debug, message);
            }
        }
        Ok(())
    }

    /// Pick the card a unit plays next.
    ///
    /// Enraged units always get the enrage card. Otherwise the deck is drawn;
    /// an exhausted deck reshuffles and yields `None`. A card the unit cannot
    /// pay for is swapped for the drained card.
    pub fn next_card(&mut self, id: UnitId) -> Result<Option<Arc<Card>>, CombatError> {
        let unit = self.roster.get_mut(id).ok_or(CombatError::UnitNotFound(id))?;

        let card = if !unit.resources.enrage_timer.is_empty() {
            Arc::clone(&self.enrage_card)
        } else {
            match unit.deck.draw(&mut self.rng) {
                Some(card) if card.spirit_cost as f64 > unit.resources.spirit.current() => {
                    let message = format!("{} cannot pay for {}", self.label(id), card.name);
                    self.log(LogCategory::Card, Severity::Debug, message);
                    Arc::clone(&self.drained_card)
                }
                Some(card) => {
                    unit.resources.spirit.adjust(-(card.spirit_cost as f64));
                    card
                }
                None => {
                    let message = format!("{} reshuffles their deck", self.label(id));
                    self.log(LogCategory::Card, Severity::Debug, message);
                    return Ok(None);
                }
            }
        };

        if let Some(unit) = self.roster.get_mut(id) {
            unit.resources.rage.adjust(card.rage_generated as f64);
        }
        Ok(Some(card))
    }

    /// Resolve every action of a card in order, then spend the charges the
    /// card used on every unit
    pub fn play_card(&mut self, id: UnitId, card: &Card) -> Result<(), CombatError> {
        let message = format!("{} plays {}", self.label(id), card.name);
        self.log(LogCategory::Card, Severity::Info, message);

        let mut chain = ChainState::default();
        for action in &card.actions {
            if !self.roster.is_alive(id) {
                break;
            }
            chain = self.resolve_action(id, Arc::clone(action), chain)?;
        }

        self.drain_charge_usage();
        Ok(())
    }

    /// Round end: summon timers, enrage, spirit, periodic effects, status ticks
    pub fn end_round(&mut self) -> Result<(), CombatError> {
        self.expire_summons();
        self.update_enrage();

        let regen = self.constants.resources.spirit_regen_percent;
        for unit in self.roster.iter_mut() {
            unit.resources.spirit.adjust_percent(regen);
        }

        self.apply_periodic_effects();
        self.drain_charge_usage();

        for id in self.roster.ids() {
            let expired = match self.roster.get_mut(id) {
                Some(unit) => unit.status.tick_end_of_round(),
                None => continue,
            };
            for name in expired {
                let message = format!("{} wears off {}", name, self.label(id));
                self.log(LogCategory::Status, Severity::Debug, message);
            }
        }

        self.cleanup();
        let message = format!("Round {} ends", self.round);
        self.log(LogCategory::Round, Severity::Debug, message);
        Ok(())
    }

    /// Remove every dead unit, recording casualties
    pub fn cleanup(&mut self) {
        for unit in self.roster.remove_dead() {
            self.record_death(unit);
        }
    }

    fn expire_summons(&mut self) {
        let expired: Vec<UnitId> = self
            .roster
            .iter_mut()
            .filter(|unit| unit.is_alive())
            .filter_map(|unit| unit.tick_duration().then_some(unit.id))
            .collect();
        for id in expired {
            let message = format!("{} departs", self.label(id));
            self.roster.remove(id);
            self.log(LogCategory::Summon, Severity::Info, message);
        }
    }

    fn update_enrage(&mut self) {
        let mut messages = Vec::new();
        for unit in self.roster.iter_mut() {
            let resources = &mut unit.resources;
            if !resources.enrage_timer.is_empty() {
                resources.enrage_timer.adjust(-1.0);
                if resources.enrage_timer.is_empty() {
                    resources.rage.clear();
                    messages.push(format!("{}{} calms down", unit.name, unit.id));
                }
            } else if resources.rage.max() > 0 && resources.rage.is_full() && resources.enrage_timer.max() > 0 {
                resources.enrage_timer.fill();
                messages.push(format!("{}{} becomes enraged", unit.name, unit.id));
            }
        }
        for message in messages {
            self.log(LogCategory::Turn, Severity::Info, message);
        }
    }

    fn apply_periodic_effects(&mut self) {
        for id in self.roster.ids() {
            let packets = match self.roster.get(id) {
                Some(unit) if unit.is_alive() => unit.status.periodic_packets(),
                _ => continue,
            };
            for (name, packet) in packets {
                if !self.roster.is_alive(id) {
                    break;
                }
                let source = packet.source_id;
                let Some((damage, outcome)) = self.deliver_packet(source, id, packet) else {
                    continue;
                };
                let category = if damage.is_healing() {
                    LogCategory::Healing
                } else {
                    LogCategory::Damage
                };
                let message = format!(
                    "{} affects {} for {:.0} ({})",
                    name,
                    self.label(id),
                    damage.amount().abs(),
                    outcome.summary()
                );
                self.log(category, Severity::Info, message);
            }
            self.remove_if_dead(id);
        }
    }

    fn drain_charge_usage(&mut self) {
        for id in self.roster.ids() {
            let spent = match self.roster.get_mut(id) {
                Some(unit) => unit.status.tick_charge_usage(),
                None => continue,
            };
            for name in spent {
                let message = format!("{} on {} runs out of charges", name, self.label(id));
                self.log(LogCategory::Status, Severity::Debug, message);
            }
        }
    }

    /// Build a summoned unit and add it to the roster
    fn summon(&mut self, kind: &str, side: Side, duration: u32) -> Result<UnitId, CombatError> {
        let id = self.roster.allocate_id();
        let mut unit = self
            .factory
            .create_unit(kind, id, side)
            .ok_or_else(|| CombatError::UnknownSummonKind(kind.to_string()))?;
        unit.make_temporary(duration);
        unit.deck.shuffle(&mut self.rng);
        self.roster.insert(unit);
        Ok(id)
    }

    /// Take a unit out of the roster as soon as its health hits zero
    fn remove_if_dead(&mut self, id: UnitId) {
        if self.roster.get(id).map_or(false, |u| !u.is_alive()) {
            if let Some(unit) = self.roster.remove(id) {
                self.record_death(unit);
            }
        }
    }

    fn record_death(&mut self, unit: CombatUnit) {
        let message = format!("{}{} dies", unit.name, unit.id);
        self.casualties.push(UnitSummary::casualty(&unit, self.round));
        self.log(LogCategory::Death, Severity::Info, message);
    }

    fn label(&self, id: UnitId) -> String {
        match self.roster.get(id) {
            Some(unit) => format!("{}{}", unit.name, unit.id),
            None => id.to_string(),
        }
    }

    fn log(&mut self, category: LogCategory, severity: Severity, message: impl Into<String>) {
        self.logger.log(self.round, category, severity, message);
    }
}

impl std::fmt::Debug for CombatEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombatEngine")
            .field("round", &self.round)
            .field("units", &self.roster.len())
            .field("casualties", &self.casualties.len())
            .finish()
    }
}

fn lookup_card(catalog: &Catalog, name: &str) -> Result<Arc<Card>, CombatError> {
    catalog
        .card(name)
        .cloned()
        .ok_or_else(|| CombatError::MissingCard(name.to_string()))
}
