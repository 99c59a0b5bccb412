//! Shared server state
//!
//! Applies parsed commands to the shared cache.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::warn;

use crate::cache::{CacheStore, SharedCache};
use crate::error::CacheError;
use crate::protocol::{Command, Response};

/// State shared by every connection task.
///
/// Connections hold no cache state of their own; everything goes through
/// `cache`.
#[derive(Clone)]
pub struct ServerState {
    /// Thread-safe cache store
    pub cache: SharedCache,
    /// TTL given to every SET
    pub entry_ttl: Duration,
}

impl ServerState {
    /// Creates a new ServerState owning the given cache store.
    pub fn new(cache: CacheStore, entry_ttl: Duration) -> Self {
        Self {
            cache: Arc::new(Mutex::new(cache)),
            entry_ttl,
        }
    }

    /// Runs one command against the cache and builds its reply.
    ///
    /// A failed log append is logged and still answered with `OK`: the write
    /// is already visible in memory and durability is best-effort.
    pub async fn execute(&self, command: Command) -> Response {
        match command {
            Command::Set { key, value } => {
                let result = self
                    .cache
                    .lock()
                    .await
                    .set(key, value, self.entry_ttl, false);

                match result {
                    Ok(()) => Response::Ok,
                    Err(CacheError::Persistence(err)) => {
                        warn!(error = %err, "failed to append SET to log, keeping in-memory write");
                        Response::Ok
                    }
                    Err(err) => {
                        warn!(error = %err, "SET rejected");
                        Response::InvalidCommand
                    }
                }
            }
            Command::Get { key } => Response::from(self.cache.lock().await.get(&key)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{AofWriter, FsyncPolicy};
    use std::fs;

    fn set(key: &str, value: &str) -> Command {
        Command::Set {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    fn get(key: &str) -> Command {
        Command::Get {
            key: key.to_string(),
        }
    }

    #[tokio::test]
    async fn test_execute_set_and_get() {
        let state = ServerState::new(CacheStore::new(100), Duration::from_secs(3600));

        assert_eq!(state.execute(set("x", "10")).await, Response::Ok);
        assert_eq!(
            state.execute(get("x")).await,
            Response::Value("10".to_string())
        );
        assert_eq!(state.execute(get("y")).await, Response::Nil);
    }

    #[tokio::test]
    async fn test_execute_applies_entry_ttl() {
        let state = ServerState::new(CacheStore::new(100), Duration::from_millis(1));

        state.execute(set("x", "10")).await;
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(state.execute(get("x")).await, Response::Nil);
    }

    #[tokio::test]
    async fn test_execute_journals_set() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.aof");
        let aof = AofWriter::open(&path, FsyncPolicy::Never).unwrap();
        let state = ServerState::new(CacheStore::with_aof(100, aof), Duration::from_secs(3600));

        state.execute(set("x", "10")).await;
        state.execute(get("x")).await;

        assert_eq!(fs::read_to_string(&path).unwrap(), "SET x 10\n");
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_execute_set_answers_ok_when_append_fails() {
        let aof = AofWriter::open("/dev/full", FsyncPolicy::Never).unwrap();
        let state = ServerState::new(CacheStore::with_aof(100, aof), Duration::from_secs(3600));

        assert_eq!(state.execute(set("k", "v")).await, Response::Ok);
        assert_eq!(
            state.execute(get("k")).await,
            Response::Value("v".to_string())
        );
    }
}
