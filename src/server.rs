#![cfg(feature = "std")]

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::{DEFAULT_STATS_FILE, MAX_MATCHES, MAX_PLAYERS};
use crate::directory::PlayerDirectory;
use crate::dispatcher::Dispatcher;
use crate::skeleton::{SharedDispatcher, Skeleton};
use crate::stats_store;
use crate::transport::in_memory::InMemoryTransport;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    /// File backing the shared-memory segment.
    pub segment: PathBuf,
    pub stats_file: PathBuf,
    pub max_matches: usize,
    pub max_players: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            #[cfg(unix)]
            segment: crate::transport::shm::default_segment_path(),
            #[cfg(not(unix))]
            segment: std::env::temp_dir().join(crate::config::DEFAULT_SEGMENT_NAME),
            stats_file: PathBuf::from(DEFAULT_STATS_FILE),
            max_matches: MAX_MATCHES,
            max_players: MAX_PLAYERS,
        }
    }
}

/// Owns the dispatcher and hands out channels to it.
pub struct Server {
    config: ServerConfig,
    dispatcher: SharedDispatcher,
}

impl Server {
    /// A server with an empty player directory.
    pub fn new(config: ServerConfig) -> Self {
        let players = PlayerDirectory::new(config.max_players);
        Self::with_players(config, players)
    }

    /// A server whose directory is loaded from the configured stats file.
    pub fn load(config: ServerConfig) -> anyhow::Result<Self> {
        let players = stats_store::load(&config.stats_file, config.max_players)?;
        Ok(Self::with_players(config, players))
    }

    fn with_players(config: ServerConfig, players: PlayerDirectory) -> Self {
        let dispatcher = Dispatcher::with_players(players, config.max_matches);
        Self {
            config,
            dispatcher: Arc::new(Mutex::new(dispatcher)),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> SharedDispatcher {
        Arc::clone(&self.dispatcher)
    }

    /// Open a private in-process channel to the server. The server end is
    /// served by its own task until the returned end is dropped.
    pub fn connect(&self) -> InMemoryTransport {
        let (server_end, client_end) = InMemoryTransport::pair();
        let mut skeleton = Skeleton::new(self.dispatcher(), server_end);
        tokio::spawn(async move {
            match skeleton.run().await {
                Ok(served) => log::debug!("in-process client left after {} requests", served),
                Err(e) => log::warn!("in-process channel failed: {:#}", e),
            }
        });
        client_end
    }

    /// Write player totals to the configured stats file.
    pub async fn save(&self) -> anyhow::Result<()> {
        let dispatcher = self.dispatcher.lock().await;
        stats_store::save(&self.config.stats_file, dispatcher.players())
    }

    /// Serve the shared-memory segment until `shutdown` resolves, then save
    /// the stats. The stats are saved and the segment removed even when the
    /// channel fails.
    #[cfg(unix)]
    pub async fn serve_shared_memory<F>(&self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()>,
    {
        let transport = crate::transport::shm::ShmTransport::create(&self.config.segment)?;
        let mut skeleton = Skeleton::new(self.dispatcher(), transport);
        log::info!(
            "server running (max {} games, {} players)",
            self.config.max_matches,
            self.config.max_players
        );
        let served = tokio::select! {
            served = skeleton.run() => served.map(|n| {
                log::info!("channel closed after {} requests", n);
            }),
            _ = shutdown => {
                log::info!("shutting down");
                Ok(())
            }
        };
        drop(skeleton);
        let saved = self.save().await;
        if let Err(e) = &served {
            log::error!("shared-memory channel failed: {:#}", e);
        }
        served.and(saved)
    }
}
