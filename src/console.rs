//! User-facing process log.
//!
//! Every pipeline step reports progress and per-file faults through a
//! [`ProcessLog`] handed in by the caller. [`ConsoleLog`] prints colored,
//! timestamped lines; [`MemoryLog`] keeps entries for inspection.

use crate::constants::LOG_TIMESTAMP_FORMAT;
use chrono::Local;
use colored::*;
use std::sync::Mutex;

/// Severity of a process log message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
    Success,
}

/// Sink for user-facing messages. Implementations must not fail.
///
/// Shared with the blocking worker that compiles files, hence `Send + Sync`.
pub trait ProcessLog: Send + Sync {
    fn log(&self, level: LogLevel, message: &str);

    fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    fn warning(&self, message: &str) {
        self.log(LogLevel::Warning, message);
    }

    fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    fn success(&self, message: &str) {
        self.log(LogLevel::Success, message);
    }
}

/// Colored terminal output with a local timestamp prefix
#[derive(Debug, Default, Clone)]
pub struct ConsoleLog {
    quiet: bool,
}

impl ConsoleLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Suppress info lines; warnings, errors and successes still print
    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }
}

impl ProcessLog for ConsoleLog {
    fn log(&self, level: LogLevel, message: &str) {
        if self.quiet && level == LogLevel::Info {
            return;
        }

        let stamp = format!("[{}]", Local::now().format(LOG_TIMESTAMP_FORMAT)).bright_black();
        match level {
            LogLevel::Info => println!("{} {}", stamp, message),
            LogLevel::Warning => println!("{} {}", stamp, message.yellow()),
            LogLevel::Error => eprintln!("{} {}", stamp, message.red()),
            LogLevel::Success => println!("{} {}", stamp, message.green()),
        }
    }
}

/// Collects messages in memory
#[derive(Debug, Default)]
pub struct MemoryLog {
    entries: Mutex<Vec<(LogLevel, String)>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(LogLevel, String)> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Messages logged at `level`, in order
    pub fn messages(&self, level: LogLevel) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }

    pub fn count(&self, level: LogLevel) -> usize {
        self.messages(level).len()
    }
}

impl ProcessLog for MemoryLog {
    fn log(&self, level: LogLevel, message: &str) {
        let mut entries = match self.entries.lock() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.push((level, message.to_string()));
    }
}
