//! ResourcePool - A clamped current/max resource

use serde::{Deserialize, Serialize};

/// A single numeric resource such as health or armor
///
/// `current` is kept within `0..=max` by every mutator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourcePool {
    current: f64,
    max: u32,
}

impl ResourcePool {
    /// Create a pool filled to its maximum
    pub fn full(max: u32) -> Self {
        ResourcePool {
            current: max as f64,
            max,
        }
    }

    /// Create an empty pool
    pub fn empty(max: u32) -> Self {
        ResourcePool { current: 0.0, max }
    }

    /// Create a pool with an explicit starting value (clamped)
    pub fn with_current(current: f64, max: u32) -> Self {
        let mut pool = ResourcePool::empty(max);
        pool.set(current);
        pool
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// Current as a fraction of max (0.0 - 1.0), 0 when max is 0
    pub fn fraction(&self) -> f64 {
        if self.max == 0 {
            return 0.0;
        }
        self.current / self.max as f64
    }

    /// Current as a percentage of max (0 - 100)
    pub fn percent(&self) -> f64 {
        self.fraction() * 100.0
    }

    /// Set the current value, clamped to the pool bounds
    pub fn set(&mut self, value: f64) {
        self.current = value.clamp(0.0, self.max as f64);
    }

    /// Add a signed delta, returning the change actually applied
    pub fn adjust(&mut self, delta: f64) -> f64 {
        let before = self.current;
        self.set(before + delta);
        self.current - before
    }

    /// Add a percentage of max (may be negative)
    pub fn adjust_percent(&mut self, percent: f64) -> f64 {
        self.adjust(self.max as f64 * percent / 100.0)
    }

    /// Change the maximum, re-clamping current
    pub fn set_max(&mut self, max: u32) {
        self.max = max;
        self.set(self.current);
    }

    pub fn fill(&mut self) {
        self.current = self.max as f64;
    }

    pub fn clear(&mut self) {
        self.current = 0.0;
    }

    pub fn is_empty(&self) -> bool {
        self.current <= 0.0
    }

    pub fn is_full(&self) -> bool {
        self.current >= self.max as f64
    }
}
