//! Conditional - Resource threshold predicates on actions

use crate::resource::{ResourceKind, ResourcePools};
use serde::{Deserialize, Serialize};

/// Whose resources the condition reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionSubject {
    Actor,
    Target,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    AtLeast,
    AtMost,
}

/// A resource threshold evaluated against the actor or the target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Conditional {
    pub subject: ConditionSubject,
    pub resource: ResourceKind,
    pub comparison: Comparison,
    pub threshold: f64,
    /// Compare against the percentage of max instead of the raw value
    #[serde(default)]
    pub percentage: bool,
}

impl Conditional {
    pub fn evaluate(&self, pools: &ResourcePools) -> bool {
        let pool = pools.get(self.resource);
        let value = if self.percentage {
            pool.percent()
        } else {
            pool.current()
        };
        match self.comparison {
            Comparison::AtLeast => value >= self.threshold,
            Comparison::AtMost => value <= self.threshold,
        }
    }
}
