//! Configuration loading from TOML and JSON files

mod catalog;
mod constants;
mod rows;

pub use catalog::{default_catalog, load_catalog, parse_catalog, parse_catalog_json, Catalog};
pub use constants::{
    CardConstants, CombatConstants, DamageConstants, ReactionConstants, ResourceConstants, TurnConstants,
};
pub use rows::{ActionKindRow, ActionRow, CardRow, CatalogConfig, StatusKindRow, StatusRow, UnitRow};

use std::fs;
use std::path::Path;
use thiserror::Error;

/// Configuration loading error
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Configuration validation error: {0}")]
    ValidationError(String),
    #[error("Duplicate weapon: {0}")]
    DuplicateWeapon(String),
    #[error("Duplicate action: {0}")]
    DuplicateAction(String),
    #[error("Duplicate card: {0}")]
    DuplicateCard(String),
    #[error("Duplicate unit kind: {0}")]
    DuplicateUnit(String),
    #[error("{referenced_by} references unknown action '{name}'")]
    UnknownAction { referenced_by: String, name: String },
    #[error("{referenced_by} references unknown card '{name}'")]
    UnknownCard { referenced_by: String, name: String },
    #[error("{referenced_by} references unknown weapon '{name}'")]
    UnknownWeapon { referenced_by: String, name: String },
    #[error("{referenced_by} references unknown unit kind '{name}'")]
    UnknownUnit { referenced_by: String, name: String },
    #[error("Invalid row '{name}': {reason}")]
    InvalidRow { name: String, reason: String },
}

/// Load a TOML file and deserialize it
pub fn load_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Load a TOML string and deserialize it
pub fn parse_toml<T: serde::de::DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    let config: T = toml::from_str(content)?;
    Ok(config)
}

/// Load and validate combat constants from a TOML file
pub fn load_constants(path: &Path) -> Result<CombatConstants, ConfigError> {
    let constants: CombatConstants = load_toml(path)?;
    constants.validate()?;
    Ok(constants)
}

/// Load and validate combat constants from a TOML string
pub fn parse_constants(content: &str) -> Result<CombatConstants, ConfigError> {
    let constants: CombatConstants = parse_toml(content)?;
    constants.validate()?;
    Ok(constants)
}
