//! Combat logging
//!
//! The engine reports what happens as (category, severity, message) entries.
//! Entries pass through a [`LogFilter`] before reaching a [`LogSink`]; logging
//! never influences resolution.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// How important an entry is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// Types of combat log events for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogCategory {
    /// Round start and end
    Round,
    /// Turn order and turn flow
    Turn,
    /// Cards drawn and played
    Card,
    /// Action resolution, hits and misses
    Action,
    Damage,
    Healing,
    /// Status effects applied, expired or dispelled
    Status,
    Reaction,
    Summon,
    Death,
    /// Combat result
    Outcome,
}

/// A single entry in the combat log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Round the entry was recorded in (0 before the first round)
    pub round: u32,
    pub category: LogCategory,
    pub severity: Severity,
    pub message: String,
}

/// Receives filtered log entries
pub trait LogSink: Send {
    fn record(&mut self, entry: LogEntry);
}

/// Which entries reach the sink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogFilter {
    #[serde(default = "default_min_severity")]
    pub min_severity: Severity,
    /// Categories of interest; empty means all
    #[serde(default)]
    pub categories: Vec<LogCategory>,
}

impl Default for LogFilter {
    fn default() -> Self {
        LogFilter {
            min_severity: default_min_severity(),
            categories: Vec::new(),
        }
    }
}

fn default_min_severity() -> Severity {
    Severity::Info
}

impl LogFilter {
    pub fn allows(&self, category: LogCategory, severity: Severity) -> bool {
        severity >= self.min_severity && (self.categories.is_empty() || self.categories.contains(&category))
    }
}

/// In-memory log storing all entries in chronological order
#[derive(Debug, Clone, Default)]
pub struct CombatLog {
    entries: Vec<LogEntry>,
}

impl CombatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Get entries filtered by category
    pub fn filter_by_category(&self, category: LogCategory) -> Vec<&LogEntry> {
        self.entries.iter().filter(|e| e.category == category).collect()
    }

    /// Whether any entry contains the given text
    pub fn contains(&self, text: &str) -> bool {
        self.entries.iter().any(|e| e.message.contains(text))
    }
}

impl LogSink for CombatLog {
    fn record(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }
}

/// A log shared with the caller, who can read it after combat
pub type SharedLog = Arc<Mutex<CombatLog>>;

impl LogSink for SharedLog {
    fn record(&mut self, entry: LogEntry) {
        if let Ok(mut log) = self.lock() {
            log.record(entry);
        }
    }
}

/// Forwards entries to `tracing` at the matching level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn record(&mut self, entry: LogEntry) {
        let category = format!("{:?}", entry.category);
        match entry.severity {
            Severity::Trace => tracing::trace!(round = entry.round, category = %category, "{}", entry.message),
            Severity::Debug => tracing::debug!(round = entry.round, category = %category, "{}", entry.message),
            Severity::Info => tracing::info!(round = entry.round, category = %category, "{}", entry.message),
            Severity::Warn => tracing::warn!(round = entry.round, category = %category, "{}", entry.message),
            Severity::Error => tracing::error!(round = entry.round, category = %category, "{}", entry.message),
        }
    }
}

/// Filter plus sink, owned by the engine
pub struct Logger {
    filter: LogFilter,
    sink: Box<dyn LogSink>,
}

impl Logger {
    pub fn new(filter: LogFilter, sink: Box<dyn LogSink>) -> Self {
        Logger { filter, sink }
    }

    pub fn filter(&self) -> &LogFilter {
        &self.filter
    }

    pub fn set_sink(&mut self, sink: Box<dyn LogSink>) {
        self.sink = sink;
    }

    pub fn log(&mut self, round: u32, category: LogCategory, severity: Severity, message: impl Into<String>) {
        if !self.filter.allows(category, severity) {
            return;
        }
        self.sink.record(LogEntry {
            round,
            category,
            severity,
            message: message.into(),
        });
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger").field("filter", &self.filter).finish()
    }
}
