//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Reaper: removes expired cache entries at a fixed interval

mod reaper;

pub use reaper::spawn_reaper;
