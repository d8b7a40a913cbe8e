//! Catalog - Resolved weapons, actions, cards and unit templates

use super::rows::{ActionKindRow, ActionRow, CardRow, CatalogConfig, StatusKindRow, StatusRow, UnitRow};
use super::ConfigError;
use crate::action::{Action, ActionKind, Card};
use crate::damage::DamageTemplate;
use crate::status::{StatusKind, StatusTemplate};
use crate::types::{Remaining, Side, UnitId};
use crate::unit::{CombatUnit, UnitFactory, UnitTemplate, WeaponType};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Immutable descriptors shared by every combat.
///
/// Rows are ingested in dependency order: weapons, plain actions, finishers,
/// reaction-trigger status applies, cards, unit templates. Any bad row fails
/// the whole load.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    weapons: HashMap<String, Arc<WeaponType>>,
    actions: HashMap<String, Arc<Action>>,
    cards: HashMap<String, Arc<Card>>,
    units: HashMap<String, UnitTemplate>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve every row of a parsed catalog file
    pub fn from_config(config: CatalogConfig) -> Result<Self, ConfigError> {
        let mut catalog = Catalog::new();

        for weapon in config.weapons {
            catalog.add_weapon(weapon)?;
        }

        let (finishers, rest): (Vec<ActionRow>, Vec<ActionRow>) = config
            .actions
            .into_iter()
            .partition(|row| matches!(row.kind, ActionKindRow::Finisher { .. }));
        let (triggers, plain): (Vec<ActionRow>, Vec<ActionRow>) =
            rest.into_iter().partition(|row| is_trigger_apply(row));

        for row in plain.into_iter().chain(finishers).chain(triggers) {
            let action = catalog.resolve_action(row)?;
            catalog.add_action(action)?;
        }

        for row in config.cards {
            let card = catalog.resolve_card(row)?;
            catalog.add_card(card)?;
        }

        for row in config.units {
            let template = catalog.resolve_unit(row)?;
            catalog.add_unit(template)?;
        }

        catalog.check_summon_kinds()?;
        Ok(catalog)
    }

    pub fn weapon(&self, name: &str) -> Option<&Arc<WeaponType>> {
        self.weapons.get(name)
    }

    pub fn action(&self, name: &str) -> Option<&Arc<Action>> {
        self.actions.get(name)
    }

    pub fn card(&self, name: &str) -> Option<&Arc<Card>> {
        self.cards.get(name)
    }

    pub fn unit_template(&self, kind: &str) -> Option<&UnitTemplate> {
        self.units.get(kind)
    }

    pub fn action_count(&self) -> usize {
        self.actions.len()
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    /// Unit kinds, sorted
    pub fn unit_kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.units.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    pub fn add_weapon(&mut self, weapon: WeaponType) -> Result<Arc<WeaponType>, ConfigError> {
        if self.weapons.contains_key(&weapon.name) {
            return Err(ConfigError::DuplicateWeapon(weapon.name));
        }
        if !split_in_range(weapon.pierce, weapon.crush) {
            return Err(ConfigError::InvalidRow {
                name: weapon.name,
                reason: "pierce and crush must be within 0-1".to_string(),
            });
        }
        let weapon = Arc::new(weapon);
        self.weapons.insert(weapon.name.clone(), Arc::clone(&weapon));
        Ok(weapon)
    }

    /// Validate and register an action
    pub fn add_action(&mut self, action: Action) -> Result<Arc<Action>, ConfigError> {
        if self.actions.contains_key(&action.name) {
            return Err(ConfigError::DuplicateAction(action.name));
        }
        validate_action(&action)?;
        for referenced in action.referenced_actions() {
            if !self.actions.contains_key(&referenced.name) {
                return Err(ConfigError::UnknownAction {
                    referenced_by: action.name.clone(),
                    name: referenced.name.clone(),
                });
            }
        }
        let action = Arc::new(action);
        self.actions.insert(action.name.clone(), Arc::clone(&action));
        Ok(action)
    }

    pub fn add_card(&mut self, card: Card) -> Result<Arc<Card>, ConfigError> {
        if self.cards.contains_key(&card.name) {
            return Err(ConfigError::DuplicateCard(card.name));
        }
        let card = Arc::new(card);
        self.cards.insert(card.name.clone(), Arc::clone(&card));
        Ok(card)
    }

    pub fn add_unit(&mut self, template: UnitTemplate) -> Result<(), ConfigError> {
        if self.units.contains_key(&template.kind) {
            return Err(ConfigError::DuplicateUnit(template.kind));
        }
        if template.deck.is_empty() {
            return Err(ConfigError::InvalidRow {
                name: template.kind,
                reason: "deck is empty".to_string(),
            });
        }
        self.units.insert(template.kind.clone(), template);
        Ok(())
    }

    fn lookup_action(&self, referenced_by: &str, name: &str) -> Result<Arc<Action>, ConfigError> {
        self.actions.get(name).cloned().ok_or_else(|| ConfigError::UnknownAction {
            referenced_by: referenced_by.to_string(),
            name: name.to_string(),
        })
    }

    fn lookup_card(&self, referenced_by: &str, name: &str) -> Result<Arc<Card>, ConfigError> {
        self.cards.get(name).cloned().ok_or_else(|| ConfigError::UnknownCard {
            referenced_by: referenced_by.to_string(),
            name: name.to_string(),
        })
    }

    fn resolve_action(&self, row: ActionRow) -> Result<Action, ConfigError> {
        let kind = match row.kind {
            ActionKindRow::WeaponAttack { multiplier } => ActionKind::WeaponAttack { multiplier },
            ActionKindRow::NonweaponAttack {
                base_quantity,
                damage_types,
                pierce,
                crush,
            } => ActionKind::NonweaponAttack {
                base_quantity,
                damage_types,
                pierce,
                crush,
            },
            ActionKindRow::Heal { base_quantity } => ActionKind::Heal { base_quantity },
            ActionKindRow::ArmorGrant { base_quantity } => ActionKind::ArmorGrant { base_quantity },
            ActionKindRow::AdjustResource { resource, quantity } => {
                ActionKind::AdjustResource { resource, quantity }
            }
            ActionKindRow::StatusApply { status } => {
                ActionKind::StatusApply(self.resolve_status(&row.name, row.hostile, status)?)
            }
            ActionKindRow::Summon {
                count,
                summon_kind,
                duration,
            } => ActionKind::Summon {
                count,
                summon_kind,
                duration,
            },
            ActionKindRow::Dispel {
                clears_beneficial,
                count,
                classification,
            } => ActionKind::Dispel {
                clears_beneficial,
                count,
                classification,
            },
            ActionKindRow::Finisher { inner, scale_table } => ActionKind::Finisher {
                inner: self.lookup_action(&row.name, &inner)?,
                scale_table,
            },
        };

        Ok(Action {
            name: row.name,
            action_type: row.action_type,
            hostile: row.hostile,
            target: row.target,
            splash: row.splash,
            hit_chance: row.hit_chance,
            condition: row.condition,
            kind,
        })
    }

    fn resolve_status(&self, action_name: &str, hostile: bool, row: StatusRow) -> Result<StatusTemplate, ConfigError> {
        let kind = match row.effect {
            StatusKindRow::PeriodicDamage {
                amount,
                damage_types,
                pierce,
                crush,
            } => StatusKind::PeriodicDamage {
                template: DamageTemplate {
                    amount,
                    damage_types,
                    pierce,
                    crush,
                },
            },
            StatusKindRow::DamageModification {
                applies_as_actor,
                scale,
                additive,
                affected_types,
                added_types,
            } => StatusKind::DamageModification {
                applies_as_actor,
                scale,
                additive,
                affected_types,
                added_types,
            },
            StatusKindRow::AggroModification { multiplier } => StatusKind::AggroModification { multiplier },
            StatusKindRow::ChanceToHitModification {
                applies_as_actor,
                scaling_percent,
                affected_action_types,
            } => StatusKind::ChanceToHitModification {
                applies_as_actor,
                scaling_percent,
                affected_action_types,
            },
            StatusKindRow::ActionPrevention { stun_chance } => StatusKind::ActionPrevention { stun_chance },
            StatusKindRow::ActionTrigger {
                moment,
                action_types,
                damage_types,
                reactions,
            } => StatusKind::ActionTrigger {
                moment,
                action_types,
                damage_types,
                reactions: reactions
                    .iter()
                    .map(|name| self.lookup_action(action_name, name))
                    .collect::<Result<Vec<_>, _>>()?,
            },
        };

        Ok(StatusTemplate {
            name: row.name,
            classification: row.classification,
            beneficial: row.beneficial.unwrap_or(!hostile),
            duration: Remaining::from_option(row.duration),
            charges: Remaining::from_option(row.charges),
            kind,
        })
    }

    fn resolve_card(&self, row: CardRow) -> Result<Card, ConfigError> {
        let actions = row
            .actions
            .iter()
            .map(|name| self.lookup_action(&row.name, name))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Card {
            name: row.name,
            spirit_cost: row.spirit_cost,
            rage_generated: row.rage_generated,
            cantrip: row.cantrip,
            actions,
        })
    }

    fn resolve_unit(&self, row: UnitRow) -> Result<UnitTemplate, ConfigError> {
        let weapon = match &row.weapon {
            Some(name) => Some(self.weapons.get(name).cloned().ok_or_else(|| ConfigError::UnknownWeapon {
                referenced_by: row.kind.clone(),
                name: name.clone(),
            })?),
            None => None,
        };
        let deck = row
            .deck
            .iter()
            .map(|name| self.lookup_card(&row.kind, name))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(UnitTemplate {
            armor_max: row.armor_max.unwrap_or(row.armor).max(row.armor),
            kind: row.kind,
            name: row.name,
            level: row.level,
            speed: row.speed,
            weapon,
            health: row.health,
            armor: row.armor,
            spirit: row.spirit,
            rage_max: row.rage_max,
            enrage_duration: row.enrage_duration,
            deck,
        })
    }

    /// Every summon action must name a known unit kind
    fn check_summon_kinds(&self) -> Result<(), ConfigError> {
        let mut names: Vec<&String> = self.actions.keys().collect();
        names.sort();
        for name in names {
            if let ActionKind::Summon { summon_kind, .. } = &self.actions[name].kind {
                if !self.units.contains_key(summon_kind) {
                    return Err(ConfigError::UnknownUnit {
                        referenced_by: name.clone(),
                        name: summon_kind.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl UnitFactory for Catalog {
    fn create_unit(&self, kind: &str, id: UnitId, side: Side) -> Option<CombatUnit> {
        self.units.get(kind).map(|template| template.build(id, side))
    }
}

fn is_trigger_apply(row: &ActionRow) -> bool {
    matches!(
        &row.kind,
        ActionKindRow::StatusApply {
            status: StatusRow {
                effect: StatusKindRow::ActionTrigger { .. },
                ..
            }
        }
    )
}

fn validate_action(action: &Action) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidRow {
        name: action.name.clone(),
        reason,
    };

    if !(0..=100).contains(&action.hit_chance) {
        return Err(invalid(format!("hit_chance {} outside 0-100", action.hit_chance)));
    }
    match &action.kind {
        ActionKind::StatusApply(template) => match &template.kind {
            StatusKind::ActionPrevention { stun_chance } if *stun_chance > 100 => {
                Err(invalid(format!("stun_chance {} above 100", stun_chance)))
            }
            StatusKind::AggroModification { multiplier } if *multiplier < 0.0 => {
                Err(invalid("negative aggro multiplier".to_string()))
            }
            StatusKind::PeriodicDamage { template: damage } if !split_in_range(damage.pierce, damage.crush) => {
                Err(invalid(format!("status {}: pierce and crush must be within 0-1", template.name)))
            }
            _ => Ok(()),
        },
        ActionKind::Finisher { inner, .. } if matches!(inner.kind, ActionKind::Finisher { .. }) => {
            Err(invalid("a finisher cannot wrap another finisher".to_string()))
        }
        ActionKind::NonweaponAttack { pierce, crush, .. } if !split_in_range(*pierce, *crush) => {
            Err(invalid("pierce and crush must be within 0-1".to_string()))
        }
        _ => Ok(()),
    }
}

fn split_in_range(pierce: f64, crush: f64) -> bool {
    (0.0..=1.0).contains(&pierce) && (0.0..=1.0).contains(&crush)
}

/// Load a catalog from a TOML file
pub fn load_catalog(path: &Path) -> Result<Catalog, ConfigError> {
    let config: CatalogConfig = super::load_toml(path)?;
    Catalog::from_config(config)
}

/// Load a catalog from a TOML string
pub fn parse_catalog(content: &str) -> Result<Catalog, ConfigError> {
    let config: CatalogConfig = super::parse_toml(content)?;
    Catalog::from_config(config)
}

/// Load a catalog from a JSON string
pub fn parse_catalog_json(content: &str) -> Result<Catalog, ConfigError> {
    let config: CatalogConfig = serde_json::from_str(content)?;
    Catalog::from_config(config)
}

/// The catalog bundled with the crate
pub fn default_catalog() -> Result<Catalog, ConfigError> {
    let toml = include_str!("../../config/catalog.toml");
    parse_catalog(toml)
}
