//! AOF Cache - An in-memory cache server with append-only persistence
//!
//! Serves a line-oriented TCP protocol over an LRU cache with TTL expiration,
//! journaling every SET to an append-only file that is replayed on startup.

pub mod cache;
pub mod config;
pub mod error;
pub mod persistence;
pub mod protocol;
pub mod server;
pub mod tasks;

pub use config::Config;
pub use server::{Server, ServerState};
pub use tasks::spawn_reaper;
