//! Persistence Module
//!
//! Append-only command log (AOF) and its startup replay.
//!
//! The log is plain text with one record per line, e.g. `SET key value`.
//! There is no header, checksum, or compaction; file order is the total
//! order of mutations.

mod aof;
mod record;
mod replay;

pub use aof::{AofWriter, FsyncPolicy};
pub use record::LogRecord;
pub use replay::replay;

/// File name used when no log path is configured.
pub const DEFAULT_AOF_FILE: &str = "cache.aof";
