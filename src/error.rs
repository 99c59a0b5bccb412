//! Error types for the cache server
//!
//! Provides unified error handling using thiserror.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache server.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Appending to the persistence log failed.
    ///
    /// The in-memory mutation that triggered the append has already been applied.
    #[error("Persistence error: {0}")]
    Persistence(#[source] io::Error),

    /// Reading the persistence log at startup failed
    #[error("Replay of {path} failed: {source}")]
    Replay {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

// == Result Type Alias ==
/// Convenience Result type for the cache server.
pub type Result<T> = std::result::Result<T, CacheError>;
