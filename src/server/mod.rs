//! Server Module
//!
//! TCP listener, per-connection command loop and the state they share.

mod handler;
mod listener;
mod state;

pub use handler::{handle_connection, MAX_LINE_LEN};
pub use listener::Server;
pub use state::ServerState;
