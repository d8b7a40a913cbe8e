//! Card - A cost plus an ordered list of actions

use super::Action;
use std::sync::Arc;

/// A bundle of actions drawn from a deck and resolved together
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub name: String,
    /// Spirit paid when played; 0 means free
    pub spirit_cost: u32,
    /// Rage gained by the drawer
    pub rage_generated: u32,
    /// Lets the drawer play one more card this turn
    pub cantrip: bool,
    pub actions: Vec<Arc<Action>>,
}

impl Card {
    pub fn new(name: impl Into<String>, actions: Vec<Arc<Action>>) -> Self {
        Card {
            name: name.into(),
            spirit_cost: 0,
            rage_generated: 0,
            cantrip: false,
            actions,
        }
    }

    pub fn with_spirit_cost(mut self, cost: u32) -> Self {
        self.spirit_cost = cost;
        self
    }

    pub fn with_rage(mut self, rage: u32) -> Self {
        self.rage_generated = rage;
        self
    }

    pub fn cantrip(mut self) -> Self {
        self.cantrip = true;
        self
    }
}
