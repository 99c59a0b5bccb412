//! Log Record Module
//!
//! Text form of a single mutating command in the append-only log.

use std::fmt;

// == Log Record ==
/// One durable mutation, rendered as a single log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogRecord {
    /// `SET <key> <value>`
    Set { key: String, value: String },
}

impl LogRecord {
    /// Creates a SET record.
    pub fn set(key: impl Into<String>, value: impl Into<String>) -> Self {
        LogRecord::Set {
            key: key.into(),
            value: value.into(),
        }
    }

    // == Parse ==
    /// Parses one log line.
    ///
    /// Only lines made of exactly three whitespace-separated tokens, the first
    /// being `SET`, are recognized. Anything else yields `None` so replay can
    /// skip it.
    pub fn parse(line: &str) -> Option<Self> {
        let mut tokens = line.split_whitespace();
        let verb = tokens.next()?;
        let key = tokens.next()?;
        let value = tokens.next()?;

        if tokens.next().is_some() || verb != "SET" {
            return None;
        }

        Some(LogRecord::set(key, value))
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogRecord::Set { key, value } => write!(f, "SET {} {}", key, value),
        }
    }
}
