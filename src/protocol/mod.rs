//! Wire protocol for the cache server
//!
//! Newline-terminated text commands and the single-line replies sent back.
//!
//! | Request           | Reply                   |
//! |-------------------|-------------------------|
//! | `SET key value`   | `OK`                    |
//! | `GET key`         | `value` or `nil`        |
//! | too few tokens    | `Invalid command`       |
//! | `SET key`         | `Usage: SET key value`  |
//! | unknown verb      | `Unknown Command`       |

pub mod command;
pub mod response;

// Re-export commonly used types
pub use command::{Command, ParseError};
pub use response::Response;
