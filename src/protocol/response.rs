//! Reply encoding for the cache server protocol

use std::fmt;

use crate::protocol::ParseError;

/// A single-line reply. [`Response::to_line`] adds the terminating newline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// SET accepted
    Ok,
    /// GET hit
    Value(String),
    /// GET miss
    Nil,
    InvalidCommand,
    SetUsage,
    UnknownCommand,
}

impl Response {
    /// Wire form including the trailing `\n`.
    pub fn to_line(&self) -> String {
        format!("{}\n", self)
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Ok => f.write_str("OK"),
            Response::Value(value) => f.write_str(value),
            Response::Nil => f.write_str("nil"),
            Response::InvalidCommand => f.write_str("Invalid command"),
            Response::SetUsage => f.write_str("Usage: SET key value"),
            Response::UnknownCommand => f.write_str("Unknown Command"),
        }
    }
}

impl From<ParseError> for Response {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::Invalid => Response::InvalidCommand,
            ParseError::SetUsage => Response::SetUsage,
            ParseError::Unknown(_) => Response::UnknownCommand,
        }
    }
}

impl From<Option<String>> for Response {
    fn from(value: Option<String>) -> Self {
        value.map_or(Response::Nil, Response::Value)
    }
}
