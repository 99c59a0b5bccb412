//! TCP server
//!
//! Owns the listener and wires persistence, cache and reaper together.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, info_span, Instrument};

use crate::cache::CacheStore;
use crate::config::Config;
use crate::persistence::{self, AofWriter};
use crate::server::{handle_connection, ServerState};
use crate::tasks::spawn_reaper;

/// A bound, fully initialized cache server.
pub struct Server {
    listener: TcpListener,
    state: ServerState,
    reaper: JoinHandle<()>,
    /// Max connection semaphore.
    ///
    /// Each connection task holds a permit until it finishes; the accept loop
    /// waits for a free permit before accepting the next client.
    limit_connections: Arc<Semaphore>,
}

impl Server {
    /// Builds the server in startup order.
    ///
    /// # Startup Sequence
    /// 1. Open (or create) the append-only log
    /// 2. Replay it into a fresh cache; an unreadable log aborts startup
    /// 3. Start the expiry reaper
    /// 4. Bind the TCP listener
    pub async fn bind(config: &Config) -> anyhow::Result<Self> {
        let aof = AofWriter::open(&config.aof_path, config.aof_fsync).with_context(|| {
            format!(
                "failed to open append-only log {}",
                config.aof_path.display()
            )
        })?;

        let records = persistence::replay(&config.aof_path)
            .context("refusing to start from an unreadable append-only log")?;

        let mut store = CacheStore::with_aof(config.max_entries, aof);
        let applied = store.apply_replay(records, config.entry_ttl())?;
        info!(
            applied,
            entries = store.len(),
            max_entries = store.capacity(),
            "cache restored from append-only log"
        );

        let state = ServerState::new(store, config.entry_ttl());
        let reaper = spawn_reaper(state.cache.clone(), config.cleanup_interval());

        let addr = config.listen_addr();
        let listener = match TcpListener::bind(&addr).await {
            Ok(listener) => listener,
            Err(err) => {
                reaper.abort();
                return Err(err).with_context(|| format!("failed to bind {}", addr));
            }
        };

        Ok(Self {
            listener,
            state,
            reaper,
            limit_connections: Arc::new(Semaphore::new(config.max_connections)),
        })
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// State shared with connection tasks.
    pub fn state(&self) -> &ServerState {
        &self.state
    }

    /// Accepts connections until the process exits.
    pub async fn run(self) -> anyhow::Result<()> {
        self.run_until(std::future::pending()).await
    }

    /// Accepts connections until `shutdown` resolves, then stops the reaper
    /// and closes the append-only log.
    ///
    /// Each accepted connection runs in its own task, concurrently with all
    /// other clients and the reaper.
    pub async fn run_until<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()>,
    {
        let Server {
            listener,
            state,
            reaper,
            limit_connections,
        } = self;

        if let Ok(addr) = listener.local_addr() {
            info!("Server listening on {}", addr);
        }

        tokio::pin!(shutdown);

        loop {
            let permit = tokio::select! {
                _ = &mut shutdown => break,
                permit = limit_connections.clone().acquire_owned() => {
                    permit.context("connection limiter closed")?
                }
            };

            let (socket, peer) = tokio::select! {
                _ = &mut shutdown => break,
                accepted = listener.accept() => match accepted {
                    Ok(accepted) => accepted,
                    Err(err) => {
                        error!("Accept error: {}", err);
                        continue;
                    }
                },
            };

            if let Err(err) = socket.set_nodelay(true) {
                debug!(error = %err, "failed to set TCP_NODELAY");
            }

            let state = state.clone();
            let span = info_span!("connection", peer = %peer);
            tokio::spawn(
                async move {
                    debug!("client connected");
                    match handle_connection(socket, state).await {
                        Ok(()) => debug!("client disconnected"),
                        Err(err) => debug!(error = %err, "connection closed on I/O error"),
                    }
                    drop(permit);
                }
                .instrument(span),
            );
        }

        info!("stopping accept loop");
        reaper.abort();

        let mut cache = state.cache.lock().await;
        let stats = cache.stats();
        info!(
            entries = stats.total_entries,
            hits = stats.hits,
            misses = stats.misses,
            evictions = stats.evictions,
            expirations = stats.expirations,
            "final cache statistics"
        );
        cache.close_log().context("failed to close append-only log")?;

        Ok(())
    }
}
