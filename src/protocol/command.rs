//! Request parsing for the cache server protocol
//!
//! Turns one line of client input into a [`Command`].

use std::fmt;

/// A well-formed client command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `SET <key> <value>`; tokens after the value are ignored
    Set { key: String, value: String },
    /// `GET <key>`
    Get { key: String },
}

/// Why a line could not be turned into a [`Command`].
///
/// None of these close the connection; each maps to a diagnostic reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Blank line, or a known verb with no key
    Invalid,
    /// `SET` with a key but no value
    SetUsage,
    /// Verb is neither `SET` nor `GET`
    Unknown(String),
}

impl Command {
    /// Parses a single request line.
    ///
    /// Tokens are separated by any whitespace. Only the verb is
    /// case-insensitive; keys and values are taken verbatim.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(verb) = tokens.first() else {
            return Err(ParseError::Invalid);
        };

        match verb.to_ascii_uppercase().as_str() {
            "SET" => match tokens.as_slice() {
                [_, key, value, ..] => Ok(Command::Set {
                    key: key.to_string(),
                    value: value.to_string(),
                }),
                [_, _] => Err(ParseError::SetUsage),
                _ => Err(ParseError::Invalid),
            },
            "GET" => match tokens.as_slice() {
                [_, key, ..] => Ok(Command::Get {
                    key: key.to_string(),
                }),
                _ => Err(ParseError::Invalid),
            },
            _ => Err(ParseError::Unknown(verb.to_string())),
        }
    }

    /// Upper-case verb, for logging.
    pub fn verb(&self) -> &'static str {
        match self {
            Command::Set { .. } => "SET",
            Command::Get { .. } => "GET",
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Invalid => f.write_str("invalid command"),
            ParseError::SetUsage => f.write_str("SET without a value"),
            ParseError::Unknown(verb) => write!(f, "unknown command {}", verb),
        }
    }
}
