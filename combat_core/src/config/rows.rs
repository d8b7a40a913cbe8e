//! Catalog rows as they appear in data files
//!
//! Rows refer to each other by name. [`super::Catalog`] resolves the names
//! into shared references.
//!
//! Every row has a fixed set of fields and an unknown field fails the load.
//! Action and status rows are a shared header plus a tagged payload; both
//! halves are read with `deny_unknown_fields`.

use crate::action::Conditional;
use crate::resource::ResourceKind;
use crate::types::{ActionType, Classification, DamageType, TargetMode, TriggerMoment};
use crate::unit::WeaponType;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Whole catalog file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    #[serde(default)]
    pub weapons: Vec<WeaponType>,
    #[serde(default)]
    pub actions: Vec<ActionRow>,
    #[serde(default)]
    pub cards: Vec<CardRow>,
    #[serde(default)]
    pub units: Vec<UnitRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionRow {
    pub name: String,
    pub action_type: ActionType,
    pub hostile: bool,
    pub target: TargetMode,
    pub splash: u32,
    pub hit_chance: i32,
    pub condition: Option<Conditional>,
    #[serde(flatten)]
    pub kind: ActionKindRow,
}

/// Header fields shared by every action kind
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ActionHeader {
    name: String,
    action_type: ActionType,
    #[serde(default)]
    hostile: bool,
    #[serde(default = "default_target")]
    target: TargetMode,
    #[serde(default)]
    splash: u32,
    #[serde(default = "default_hit_chance")]
    hit_chance: i32,
    #[serde(default)]
    condition: Option<Conditional>,
}

const ACTION_HEADER_FIELDS: &[&str] = &["name", "action_type", "hostile", "target", "splash", "hit_chance", "condition"];

impl<'de> Deserialize<'de> for ActionRow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (header, kind): (ActionHeader, ActionKindRow) =
            split_row(deserializer, ACTION_HEADER_FIELDS, "action")?;
        Ok(ActionRow {
            name: header.name,
            action_type: header.action_type,
            hostile: header.hostile,
            target: header.target,
            splash: header.splash,
            hit_chance: header.hit_chance,
            condition: header.condition,
            kind,
        })
    }
}

/// Read a row as a map and deserialize the header keys and the remaining
/// keys separately, so each half can reject fields it does not know.
fn split_row<'de, D, H, K>(deserializer: D, header_fields: &[&str], what: &str) -> Result<(H, K), D::Error>
where
    D: Deserializer<'de>,
    H: DeserializeOwned,
    K: DeserializeOwned,
{
    let row = Map::<String, Value>::deserialize(deserializer)?;
    let name = row.get("name").and_then(Value::as_str).unwrap_or("?").to_string();
    let (header, payload): (Map<String, Value>, Map<String, Value>) =
        row.into_iter().partition(|(key, _)| header_fields.contains(&key.as_str()));

    let header = H::deserialize(Value::Object(header))
        .map_err(|e| D::Error::custom(format!("{} '{}': {}", what, name, e)))?;
    let payload = K::deserialize(Value::Object(payload))
        .map_err(|e| D::Error::custom(format!("{} '{}': {}", what, name, e)))?;
    Ok((header, payload))
}

fn default_target() -> TargetMode {
    TargetMode::SelfOnly
}
fn default_hit_chance() -> i32 {
    100
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum ActionKindRow {
    WeaponAttack {
        #[serde(default = "default_multiplier")]
        multiplier: f64,
    },
    NonweaponAttack {
        base_quantity: f64,
        #[serde(default)]
        damage_types: Vec<DamageType>,
        #[serde(default)]
        pierce: f64,
        #[serde(default)]
        crush: f64,
    },
    Heal {
        base_quantity: f64,
    },
    ArmorGrant {
        base_quantity: f64,
    },
    AdjustResource {
        resource: ResourceKind,
        quantity: f64,
    },
    StatusApply {
        status: StatusRow,
    },
    Summon {
        #[serde(default = "default_count")]
        count: u32,
        summon_kind: String,
        duration: u32,
    },
    Dispel {
        #[serde(default)]
        clears_beneficial: bool,
        #[serde(default)]
        count: Option<u32>,
        #[serde(default)]
        classification: Option<Classification>,
    },
    Finisher {
        /// Name of the action to scale
        inner: String,
        scale_table: [u32; 4],
    },
}

fn default_multiplier() -> f64 {
    1.0
}
fn default_count() -> u32 {
    1
}

/// Status effect carried by a status-apply action
#[derive(Debug, Clone, Serialize)]
pub struct StatusRow {
    pub name: String,
    pub classification: Classification,
    /// Defaults to the opposite of the action's hostility
    pub beneficial: Option<bool>,
    /// Rounds; absent means unlimited
    pub duration: Option<u32>,
    /// Cards; absent means unlimited
    pub charges: Option<u32>,
    #[serde(flatten)]
    pub effect: StatusKindRow,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct StatusHeader {
    name: String,
    classification: Classification,
    #[serde(default)]
    beneficial: Option<bool>,
    #[serde(default)]
    duration: Option<u32>,
    #[serde(default)]
    charges: Option<u32>,
}

const STATUS_HEADER_FIELDS: &[&str] = &["name", "classification", "beneficial", "duration", "charges"];

impl<'de> Deserialize<'de> for StatusRow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (header, effect): (StatusHeader, StatusKindRow) =
            split_row(deserializer, STATUS_HEADER_FIELDS, "status")?;
        Ok(StatusRow {
            name: header.name,
            classification: header.classification,
            beneficial: header.beneficial,
            duration: header.duration,
            charges: header.charges,
            effect,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case", deny_unknown_fields)]
pub enum StatusKindRow {
    PeriodicDamage {
        amount: f64,
        #[serde(default)]
        damage_types: Vec<DamageType>,
        #[serde(default)]
        pierce: f64,
        #[serde(default)]
        crush: f64,
    },
    DamageModification {
        #[serde(default)]
        applies_as_actor: bool,
        #[serde(default = "default_multiplier")]
        scale: f64,
        #[serde(default)]
        additive: f64,
        #[serde(default)]
        affected_types: Vec<DamageType>,
        #[serde(default)]
        added_types: Vec<DamageType>,
    },
    AggroModification {
        multiplier: f64,
    },
    ChanceToHitModification {
        #[serde(default)]
        applies_as_actor: bool,
        scaling_percent: i32,
        #[serde(default)]
        affected_action_types: Vec<ActionType>,
    },
    ActionPrevention {
        stun_chance: u32,
    },
    ActionTrigger {
        moment: TriggerMoment,
        #[serde(default)]
        action_types: Vec<ActionType>,
        #[serde(default)]
        damage_types: Vec<DamageType>,
        /// Names of the reaction actions
        reactions: Vec<String>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CardRow {
    pub name: String,
    #[serde(default)]
    pub spirit_cost: u32,
    #[serde(default)]
    pub rage_generated: u32,
    #[serde(default)]
    pub cantrip: bool,
    /// Action names in resolution order
    pub actions: Vec<String>,
}

/// Unit template row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnitRow {
    pub kind: String,
    pub name: String,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default = "default_speed")]
    pub speed: u32,
    #[serde(default)]
    pub weapon: Option<String>,
    pub health: u32,
    #[serde(default)]
    pub armor: u32,
    /// Defaults to the starting armor
    #[serde(default)]
    pub armor_max: Option<u32>,
    #[serde(default = "default_spirit")]
    pub spirit: u32,
    #[serde(default = "default_rage_max")]
    pub rage_max: u32,
    #[serde(default = "default_enrage_duration")]
    pub enrage_duration: u32,
    /// Card names; repeats put several copies in the deck
    pub deck: Vec<String>,
}

fn default_level() -> u32 {
    1
}
fn default_speed() -> u32 {
    100
}
fn default_spirit() -> u32 {
    10
}
fn default_rage_max() -> u32 {
    100
}
fn default_enrage_duration() -> u32 {
    3
}
