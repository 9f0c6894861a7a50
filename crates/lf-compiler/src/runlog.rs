//! Explicit logging handle threaded through the loader and pipeline.
//!
//! Library code never calls the `log` macros directly; it writes through a
//! [`RunLog`] it was given. The binary hands in a [`LogFacade`], tests hand
//! in a [`MemoryLog`] and inspect what was recorded.

use std::sync::Mutex;

use log::Level;

pub trait RunLog: Send + Sync {
    fn record(&self, level: Level, message: &str);

    fn debug(&self, message: &str) {
        self.record(Level::Debug, message);
    }

    fn info(&self, message: &str) {
        self.record(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.record(Level::Warn, message);
    }

    fn error(&self, message: &str) {
        self.record(Level::Error, message);
    }
}

/// Forwards to the `log` facade under a fixed target.
#[derive(Debug, Clone)]
pub struct LogFacade {
    target: String,
}

impl LogFacade {
    pub fn new(target: impl Into<String>) -> Self {
        Self { target: target.into() }
    }
}

impl RunLog for LogFacade {
    fn record(&self, level: Level, message: &str) {
        log::log!(target: self.target.as_str(), level, "{}", message);
    }
}

/// Collects records in memory.
#[derive(Debug, Default)]
pub struct MemoryLog {
    records: Mutex<Vec<(Level, String)>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<(Level, String)> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn messages_at(&self, level: Level) -> Vec<String> {
        self.records()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }
}

impl RunLog for MemoryLog {
    fn record(&self, level: Level, message: &str) {
        let mut records = match self.records.lock() {
            Ok(records) => records,
            Err(poisoned) => poisoned.into_inner(),
        };
        records.push((level, message.to_string()));
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLog;

impl RunLog for NullLog {
    fn record(&self, _level: Level, _message: &str) {}
}
